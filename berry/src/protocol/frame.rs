// berry/src/protocol/frame.rs

use crate::constants::{
    ACK_FRAME, CONTROLLER_TO_HOST, FRAME_MAX_PAYLOAD_LEN, FRAME_OVERHEAD, FRAME_POSTAMBLE,
    FRAME_PREAMBLE, HOST_TO_CONTROLLER,
};
use crate::protocol::checksum::{frame_dcs, lcs};
use crate::{Error, Result};

/// Frame direction (TFI byte)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    HostToController,
    ControllerToHost,
}

impl Direction {
    pub fn as_byte(&self) -> u8 {
        match self {
            Direction::HostToController => HOST_TO_CONTROLLER,
            Direction::ControllerToHost => CONTROLLER_TO_HOST,
        }
    }

    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            HOST_TO_CONTROLLER => Some(Direction::HostToController),
            CONTROLLER_TO_HOST => Some(Direction::ControllerToHost),
            _ => None,
        }
    }
}

/// Controller frame helper. Provides encode/decode of the wire frame
/// Format: [Preamble(3)] [Len(1)] [LCS(1)] [TFI(1)] [Payload(n)] [DCS(1)] [Postamble(1)]
/// Preamble: 0x00 0x00 0xFF, Len = n + 1
/// Postamble: 0x00
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub direction: Direction,
    pub payload: Vec<u8>,
}

impl Frame {
    /// Encode a payload into a full wire frame
    pub fn encode(direction: Direction, payload: &[u8]) -> Result<Vec<u8>> {
        if payload.len() > FRAME_MAX_PAYLOAD_LEN {
            return Err(Error::PayloadTooLong {
                max: FRAME_MAX_PAYLOAD_LEN,
                actual: payload.len(),
            });
        }

        let tfi = direction.as_byte();
        let len = (payload.len() + 1) as u8;
        let mut out = Vec::with_capacity(FRAME_OVERHEAD + payload.len());
        out.extend_from_slice(&FRAME_PREAMBLE);
        out.push(len);
        out.push(lcs(len));
        out.push(tfi);
        out.extend_from_slice(payload);
        out.push(frame_dcs(tfi, payload));
        out.push(FRAME_POSTAMBLE);
        Ok(out)
    }

    /// Encode a host -> controller command frame
    pub fn command(payload: &[u8]) -> Result<Vec<u8>> {
        Self::encode(Direction::HostToController, payload)
    }

    /// Decode a complete wire frame; trailing bytes are an error.
    pub fn decode(frame: &[u8]) -> Result<Frame> {
        let (decoded, used) = Self::decode_prefix(frame)?;
        if used != frame.len() {
            return Err(Error::InvalidLength {
                expected: used,
                actual: frame.len(),
            });
        }
        Ok(decoded)
    }

    /// Decode the frame at the start of `buf`, returning it together with
    /// the number of bytes it occupied. Reads from the controller are
    /// fixed-size so the buffer usually carries padding after the frame.
    pub fn decode_prefix(buf: &[u8]) -> Result<(Frame, usize)> {
        if buf.len() < FRAME_OVERHEAD {
            return Err(Error::InvalidLength {
                expected: FRAME_OVERHEAD,
                actual: buf.len(),
            });
        }

        if buf[..3] != FRAME_PREAMBLE {
            return Err(Error::FrameFormat("invalid preamble".into()));
        }

        let len = buf[3];
        let lcs_actual = buf[4];
        let lcs_expected = lcs(len);
        if lcs_actual != lcs_expected {
            return Err(Error::ChecksumMismatch {
                expected: lcs_expected,
                actual: lcs_actual,
            });
        }
        if len == 0 {
            return Err(Error::FrameFormat("missing direction byte".into()));
        }

        // LEN covers TFI + payload
        let required_len = FRAME_OVERHEAD - 1 + len as usize;
        if buf.len() < required_len {
            return Err(Error::InvalidLength {
                expected: required_len,
                actual: buf.len(),
            });
        }

        let tfi = buf[5];
        let direction = Direction::from_byte(tfi)
            .ok_or_else(|| Error::FrameFormat(format!("invalid direction byte {:#04x}", tfi)))?;

        let payload_start = 6usize;
        let payload_end = payload_start + (len as usize - 1);
        let payload = &buf[payload_start..payload_end];

        let dcs_actual = buf[payload_end];
        let dcs_expected = frame_dcs(tfi, payload);
        if dcs_actual != dcs_expected {
            return Err(Error::ChecksumMismatch {
                expected: dcs_expected,
                actual: dcs_actual,
            });
        }

        if buf[payload_end + 1] != FRAME_POSTAMBLE {
            return Err(Error::FrameFormat("invalid postamble".into()));
        }

        Ok((
            Frame {
                direction,
                payload: payload.to_vec(),
            },
            required_len,
        ))
    }

    /// True when `buf` is exactly the acknowledgement frame.
    pub fn is_ack(buf: &[u8]) -> bool {
        buf == ACK_FRAME
    }
}
