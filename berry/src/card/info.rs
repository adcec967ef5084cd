use crate::types::{Atqa, Sak, Uid};

/// What a controller learned about a tag while discovering and selecting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagInfo {
    pub atqa: Atqa,
    pub sak: Sak,
    pub uid: Uid,
}

impl TagInfo {
    pub fn new(atqa: Atqa, sak: Sak, uid: Uid) -> Self {
        Self { atqa, sak, uid }
    }

    pub fn atqa(&self) -> Atqa {
        self.atqa
    }

    pub fn sak(&self) -> Sak {
        self.sak
    }

    pub fn uid(&self) -> &Uid {
        &self.uid
    }
}

impl From<&crate::card::Tag> for TagInfo {
    fn from(tag: &crate::card::Tag) -> Self {
        tag.info
    }
}
