mod borrowed;
mod leased;
mod misbehaving;
mod scripted;

pub use borrowed::borrowed;
pub use leased::leased;
use log::LevelFilter;
pub use misbehaving::misbehaving;
pub use scripted::*;
use std::env;
use tether_core::Driver;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Runs the driver agnostic suite against `manager`.
///
/// The manager must be able to lease at least one connection at a time and
/// release it successfully.
pub async fn execute_tests<D: Driver>(driver: &D, manager: &D::Manager) {
    leased(driver, manager).await;
    borrowed(driver, manager).await;
    misbehaving(driver, manager).await;
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}
