// berry/src/device/mod.rs

pub mod builder;
pub mod handle;
pub mod models;

pub use builder::DeviceBuilder;
pub use handle::{Device, Initialized, Uninitialized};
pub use models::TagReader;
