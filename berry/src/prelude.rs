// berry/src/prelude.rs

pub use crate::card::{Tag, TagFamily};
pub use crate::device::{Device, DeviceBuilder, Initialized, Uninitialized};
pub use crate::device::models::{Pn532, Pn532Config, Rc522, TagReader};
pub use crate::protocol::{Direction, Frame};
pub use crate::transport::{Delay, Level, RegisterBus, SerialLink, StdDelay};
pub use crate::{
    Atqa, BaudRate, BlockData, ControllerKind, Error, ErrorKind, FirmwareVersion, KeyType,
    MifareKey, PageData, Result, Sak, Uid,
};

// Re-export small utilities for convenience
pub use crate::utils::{bytes_to_hex, bytes_to_hex_spaced, ms, parse_hex};
