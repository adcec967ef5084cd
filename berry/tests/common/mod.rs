#![allow(dead_code)]

pub mod fixtures;

pub use berry::test_support::{
    initialized_pn532_device, initialized_rc522_device, seed_pn532_init, seed_pn532_target,
    seed_rc522_target,
};

/// Route `log` output to the test harness when RUST_LOG is set.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
