mod completion;
mod driver;
mod error;
mod meta;
mod scope;
mod util;
mod work;

pub use ::anyhow::Context;
pub use completion::*;
pub use driver::*;
pub use error::*;
pub use meta::*;
pub use scope::*;
pub use util::*;
pub use work::*;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
