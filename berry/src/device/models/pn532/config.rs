// berry/src/device/models/pn532/config.rs

//! PN532 configuration and protocol constants

use crate::types::BaudRate;
use crate::utils::timeout::DEFAULT_TIMEOUT_MS;

/// Marker preceding a frame written to the controller
pub const MARKER_DATA_WRITE: u8 = 0x01;
/// Marker requesting the one-byte status word
pub const MARKER_STATUS_READ: u8 = 0x02;
/// Marker preceding a frame read from the controller
pub const MARKER_DATA_READ: u8 = 0x03;

/// Status byte reported when a frame is waiting to be read
pub const STATUS_READY: u8 = 0x01;

/// Chip select settle time (ms)
pub const SELECT_SETTLE_MS: u32 = 2;

/// Settle time after an Ultralight/NTAG page write is acknowledged (ms)
pub const PAGE_WRITE_SETTLE_MS: u32 = 10;

/// Bytes clocked in when reading a response frame
pub const RESPONSE_BUFFER_LEN: usize = 64;

/// Largest data block InDataExchange accepts
pub const DATA_EXCHANGE_MAX_LEN: usize = 62;

/// Default target number when none has been listed yet
pub const DEFAULT_TARGET: u8 = 0x01;

pub const CMD_GET_FIRMWARE_VERSION: u8 = 0x02;
pub const CMD_SAM_CONFIGURATION: u8 = 0x14;
pub const CMD_RF_CONFIGURATION: u8 = 0x32;
pub const CMD_IN_DATA_EXCHANGE: u8 = 0x40;
pub const CMD_IN_LIST_PASSIVE_TARGET: u8 = 0x4A;
pub const CMD_IN_RELEASE: u8 = 0x52;

/// SAMConfiguration: normal mode
pub const SAM_MODE_NORMAL: u8 = 0x01;
/// SAMConfiguration: timeout in 50 ms units (20 = 1 s)
pub const SAM_TIMEOUT: u8 = 0x14;
/// SAMConfiguration: drive the IRQ pin
pub const SAM_USE_IRQ: u8 = 0x01;

/// RFConfiguration item 5: MaxRetries
pub const RF_ITEM_MAX_RETRIES: u8 = 0x05;
/// MxRtyATR default
pub const RF_MAX_RETRY_ATR: u8 = 0xFF;
/// MxRtyPSL default
pub const RF_MAX_RETRY_PSL: u8 = 0x01;

/// Mask of the error bits in an InDataExchange status byte
pub const STATUS_ERROR_MASK: u8 = 0x3F;

/// Runtime settings for a PN532 backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pn532Config {
    /// Ready timeout for ordinary commands (ms, 0 = wait forever)
    pub timeout_ms: u32,
    /// How long discovery waits for a target to be reported (ms)
    pub detect_timeout_ms: u32,
    /// Modulation used for passive target detection
    pub baud: BaudRate,
    /// MxRtyPassiveActivation written during initialization, if any
    pub activation_retries: Option<u8>,
}

impl Default for Pn532Config {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            detect_timeout_ms: DEFAULT_TIMEOUT_MS,
            baud: BaudRate::Iso14443a,
            activation_retries: None,
        }
    }
}

impl Pn532Config {
    pub fn with_timeout(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_detect_timeout(mut self, timeout_ms: u32) -> Self {
        self.detect_timeout_ms = timeout_ms;
        self
    }

    pub fn with_baud(mut self, baud: BaudRate) -> Self {
        self.baud = baud;
        self
    }

    pub fn with_activation_retries(mut self, retries: u8) -> Self {
        self.activation_retries = Some(retries);
        self
    }
}
