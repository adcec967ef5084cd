// berry/src/types.rs

use crate::Error;
use std::convert::TryFrom;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tag UID - 4, 7 or 10 bytes depending on the cascade level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Uid {
    bytes: [u8; 10],
    len: u8,
}

impl Uid {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The four UID bytes used for Mifare Classic authentication. For
    /// double/triple size UIDs this is the last cascade level.
    pub fn auth_bytes(&self) -> [u8; 4] {
        let b = self.as_bytes();
        let mut out = [0u8; 4];
        out.copy_from_slice(&b[b.len() - 4..]);
        out
    }

    pub fn to_hex(&self) -> String {
        crate::utils::bytes_to_hex(self.as_bytes())
    }
}

impl TryFrom<&[u8]> for Uid {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        match bytes.len() {
            4 | 7 | 10 => {
                let mut arr = [0u8; 10];
                arr[..bytes.len()].copy_from_slice(bytes);
                Ok(Self {
                    bytes: arr,
                    len: bytes.len() as u8,
                })
            }
            n => Err(Error::InvalidLength {
                expected: if n < 4 { 4 } else { 7 },
                actual: n,
            }),
        }
    }
}

impl From<[u8; 4]> for Uid {
    fn from(b: [u8; 4]) -> Self {
        let mut bytes = [0u8; 10];
        bytes[..4].copy_from_slice(&b);
        Self { bytes, len: 4 }
    }
}

impl std::fmt::Display for Uid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&crate::utils::bytes_to_hex_spaced(self.as_bytes()))
    }
}

/// ATQA / SENS_RES - 2 bytes, kept in the order they arrived on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Atqa([u8; 2]);

impl Atqa {
    pub fn from_bytes(bytes: [u8; 2]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 2] {
        &self.0
    }
}

/// SAK / SEL_RES
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::From)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sak(u8);

impl Sak {
    pub fn as_u8(&self) -> u8 {
        self.0
    }

    /// Cascade bit: the UID has more bytes at the next cascade level
    pub fn uid_incomplete(&self) -> bool {
        self.0 & 0x04 != 0
    }
}

/// Mifare Classic key slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum KeyType {
    #[display(fmt = "A")]
    A,
    #[display(fmt = "B")]
    B,
}

impl KeyType {
    /// Mifare authentication command byte (0x60 / 0x61)
    pub fn auth_command(&self) -> u8 {
        match self {
            KeyType::A => crate::protocol::mifare::AUTH_A,
            KeyType::B => crate::protocol::mifare::AUTH_B,
        }
    }
}

/// 6-byte Mifare Classic key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MifareKey([u8; 6]);

impl MifareKey {
    /// Factory default transport key
    pub const DEFAULT: Self = Self([0xFF; 6]);
    /// Public key A of the MAD sector
    pub const MAD: Self = Self([0xA0, 0xA1, 0xA2, 0xA3, 0xA4, 0xA5]);
    /// Public key A of NFC Forum NDEF sectors
    pub const NDEF: Self = Self([0xD3, 0xF7, 0xD3, 0xF7, 0xD3, 0xF7]);

    pub const fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }
}

impl std::str::FromStr for MifareKey {
    type Err = Error;

    /// Parses six hex bytes, e.g. `"FF FF FF FF FF FF"` or `"a0:a1:a2:a3:a4:a5"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = crate::utils::parse_hex(s)?;
        let arr: [u8; 6] = bytes.as_slice().try_into().map_err(|_| Error::InvalidLength {
            expected: 6,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }
}

/// BlockData (16 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BlockData([u8; 16]);

impl BlockData {
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        crate::utils::bytes_to_hex_spaced(self.as_bytes())
    }

    pub fn to_ascii_safe(&self) -> String {
        self.0
            .iter()
            .map(|&b| {
                if b.is_ascii_graphic() || b == b' ' {
                    b as char
                } else {
                    '.'
                }
            })
            .collect()
    }
}

impl TryFrom<&[u8]> for BlockData {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; 16] = bytes.try_into().map_err(|_| Error::InvalidLength {
            expected: 16,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }
}

/// PageData (4 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PageData([u8; 4]);

impl PageData {
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl TryFrom<&[u8]> for PageData {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; 4] = bytes.try_into().map_err(|_| Error::InvalidLength {
            expected: 4,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }
}

/// Which controller backs a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ControllerKind {
    #[display(fmt = "PN532")]
    Pn532,
    #[display(fmt = "MFRC522")]
    Rc522,
}

/// Target bit rate / modulation for passive target detection (BrTy)
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BaudRate {
    /// 106 kbps type A (ISO/IEC 14443 Type A)
    #[default]
    Iso14443a = 0x00,
    /// 212 kbps FeliCa
    Felica212 = 0x01,
    /// 424 kbps FeliCa
    Felica424 = 0x02,
    /// 106 kbps type B (ISO/IEC 14443-3B)
    Iso14443b = 0x03,
    /// 106 kbps Innovision Jewel
    Jewel = 0x04,
}

/// Firmware information reported by the PN532
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FirmwareVersion {
    pub ic: u8,
    pub version: u8,
    pub revision: u8,
    pub support: u8,
}

impl FirmwareVersion {
    /// Packed as IC | Ver | Rev | Support, most significant first
    pub fn as_u32(&self) -> u32 {
        u32::from_be_bytes([self.ic, self.version, self.revision, self.support])
    }
}
