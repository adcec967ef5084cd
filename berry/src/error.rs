// berry/src/error.rs

use thiserror::Error;

/// Which step of a two-phase Mifare write was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum WritePhase {
    /// WRITE command + address
    #[display(fmt = "command")]
    Command,
    /// 16 data bytes + CRC
    #[display(fmt = "data")]
    Data,
}

/// Common error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("device not found")]
    DeviceNotFound,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid packet length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("checksum mismatch: expected {expected:#04x}, got {actual:#04x}")]
    ChecksumMismatch { expected: u8, actual: u8 },
    #[error("frame format error: {0}")]
    FrameFormat(String),

    #[error("unexpected response code: expected {expected:#04x}, got {actual:#04x}")]
    UnexpectedResponse { expected: u8, actual: u8 },

    #[error("unexpected response length: expected {expected} bits, got {actual}")]
    UnexpectedBitLength { expected: u16, actual: u16 },

    #[error("controller error register reported {flags:#04x}")]
    ControllerError { flags: u8 },

    #[error("tag returned status {status:#04x}")]
    TagStatus { status: u8 },

    #[error("no acknowledgement received")]
    NoAck,

    #[error("operation timed out")]
    Timeout,

    #[error("no tag found")]
    TagNotFound,

    #[error("expected exactly one target, found {found}")]
    TargetCount { found: u8 },

    #[error("tag collision")]
    TagCollision,

    #[error("incomplete selection: expected 24 bits, got {actual}")]
    IncompleteSelection { actual: u16 },

    #[error("crc mismatch: expected {expected:#06x}, got {actual:#06x}")]
    CrcMismatch { expected: u16, actual: u16 },

    #[error("bcc mismatch: expected {expected:#04x}, got {actual:#04x}")]
    BccMismatch { expected: u8, actual: u8 },

    #[error("write rejected during {phase} phase (ack {ack:#04x})")]
    WriteRejected { phase: WritePhase, ack: u8 },

    #[error("authentication failed for block {block}")]
    AuthenticationFailed { block: u8 },

    #[error("block {block} is not covered by the current authentication")]
    NotAuthenticated { block: u8 },

    #[error("no sector of this tag is authenticated")]
    NoAuthenticatedSector,

    #[error("{unit} {index} out of range {min}..={max}")]
    OutOfRange {
        unit: &'static str,
        index: u16,
        min: u16,
        max: u16,
    },

    #[error("payload too long: max {max}, got {actual}")]
    PayloadTooLong { max: usize, actual: usize },

    #[error("tag handle is stale; discover the tag again")]
    StaleTag,

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
}

/// Coarse classification of [`Error`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The underlying byte or pin transfer failed
    Transport,
    /// Preamble, checksum, direction byte or bit-length mismatch
    Framing,
    /// No acknowledgement, not ready, or a bounded poll ran out
    NoResponse,
    /// No tag answered
    TagAbsent,
    /// More than one tag answered
    Collision,
    /// CRC/BCC mismatch or a write that was not acknowledged
    Integrity,
    /// Key or mode rejected by the tag
    Authentication,
    /// Rejected before any bus I/O
    Parameter,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::DeviceNotFound | Error::Transport(_) => ErrorKind::Transport,
            Error::InvalidLength { .. }
            | Error::ChecksumMismatch { .. }
            | Error::FrameFormat(_)
            | Error::UnexpectedResponse { .. }
            | Error::UnexpectedBitLength { .. }
            | Error::ControllerError { .. }
            | Error::TagStatus { .. }
            | Error::IncompleteSelection { .. } => ErrorKind::Framing,
            Error::NoAck | Error::Timeout => ErrorKind::NoResponse,
            Error::TagNotFound | Error::TargetCount { .. } => ErrorKind::TagAbsent,
            Error::TagCollision => ErrorKind::Collision,
            Error::CrcMismatch { .. } | Error::BccMismatch { .. } | Error::WriteRejected { .. } => {
                ErrorKind::Integrity
            }
            Error::AuthenticationFailed { .. }
            | Error::NotAuthenticated { .. }
            | Error::NoAuthenticatedSector => ErrorKind::Authentication,
            Error::OutOfRange { .. }
            | Error::PayloadTooLong { .. }
            | Error::StaleTag
            | Error::UnsupportedOperation(_) => ErrorKind::Parameter,
        }
    }

    pub(crate) fn out_of_range(unit: &'static str, index: u16, min: u16, max: u16) -> Self {
        Error::OutOfRange {
            unit,
            index,
            min,
            max,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
