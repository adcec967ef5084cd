// berry/src/transport/mod.rs

pub mod mock;
pub mod traits;

pub use mock::{MockDelay, MockRegisterBus, MockSerialLink};
pub use traits::{Delay, Level, RegisterBus, SerialLink, StdDelay};
