// berry/src/card/mod.rs

use crate::types::{Atqa, KeyType, MifareKey, Sak, Uid};

mod info;
pub use info::TagInfo;

pub mod sector;

/// Memory organisation of a tag, derived from its SAK.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagFamily {
    /// 16-byte blocks, sector keys (Mini / 1K / 4K)
    MifareClassic,
    /// 4-byte pages (Ultralight, NTAG2xx)
    Ultralight,
    /// Anything else (ISO-DEP, DESFire, ...)
    Unknown,
}

impl TagFamily {
    pub fn from_sak(sak: Sak) -> Self {
        match sak.as_u8() {
            0x08 | 0x09 | 0x18 | 0x88 | 0x19 | 0x28 | 0x38 => TagFamily::MifareClassic,
            0x00 => TagFamily::Ultralight,
            _ => TagFamily::Unknown,
        }
    }
}

/// Key material that unlocked a sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authentication {
    pub block: u8,
    pub key_type: KeyType,
    pub key: MifareKey,
}

/// Handle to a discovered, selected tag.
///
/// A tag is only valid on the device that discovered it and only until
/// that device runs another discovery, halts the tag, or fails an
/// operation. The device enforces this through the session stamp.
#[derive(Debug, Clone)]
pub struct Tag {
    info: TagInfo,
    family: TagFamily,
    auth: Option<Authentication>,
    session: u32,
}

impl Tag {
    pub(crate) fn new(info: TagInfo, session: u32) -> Self {
        Self {
            family: TagFamily::from_sak(info.sak),
            info,
            auth: None,
            session,
        }
    }

    pub fn uid(&self) -> &Uid {
        &self.info.uid
    }
    pub fn atqa(&self) -> Atqa {
        self.info.atqa
    }
    pub fn sak(&self) -> Sak {
        self.info.sak
    }
    pub fn family(&self) -> TagFamily {
        self.family
    }
    pub fn info(&self) -> TagInfo {
        self.info
    }

    /// Current authentication, if any
    pub fn authentication(&self) -> Option<&Authentication> {
        self.auth.as_ref()
    }

    /// Whether the last successful authentication covers `block`.
    pub fn is_authenticated_for(&self, block: u8) -> bool {
        self.auth
            .map(|a| sector::sector_of(a.block) == sector::sector_of(block))
            .unwrap_or(false)
    }

    pub(crate) fn session(&self) -> u32 {
        self.session
    }

    pub(crate) fn set_authentication(&mut self, auth: Authentication) {
        self.auth = Some(auth);
    }

    pub(crate) fn clear_authentication(&mut self) {
        self.auth = None;
    }
}
