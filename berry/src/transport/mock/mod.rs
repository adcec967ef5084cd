// berry/src/transport/mock/mod.rs

//! Simulated controllers for unit and integration tests.

mod delay;
mod register;
mod serial;

pub use delay::MockDelay;
pub use register::{MockRegisterBus, TagReply, MOCK_VERSION};
pub use serial::{MockSerialLink, Reply};
