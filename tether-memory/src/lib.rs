mod connection;
mod driver;
mod pool;

pub use connection::*;
pub use driver::*;
pub use pool::*;
