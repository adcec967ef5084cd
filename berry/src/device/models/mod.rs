// berry/src/device/models/mod.rs

use log::debug;

use crate::Result;
use crate::card::TagInfo;
use crate::protocol::ndef;
use crate::types::{BlockData, ControllerKind, KeyType, MifareKey, PageData, Uid};

pub mod limits;
pub mod pn532;
pub mod rc522;

pub use pn532::{Pn532, Pn532Config};
pub use rc522::Rc522;

/// Capabilities shared by every controller backend.
///
/// A backend talks to at most one tag at a time: `discover` activates it
/// and every other call addresses that tag until the next `discover` or
/// `halt`.
pub trait TagReader {
    /// Which controller this is
    fn kind(&self) -> ControllerKind;

    /// Bring the controller to an operational state.
    fn initialize(&mut self) -> Result<()>;

    /// Find and select a single tag. `Ok(None)` when the field is empty.
    fn discover(&mut self) -> Result<Option<TagInfo>>;

    /// Mifare Classic authentication of the sector containing `block`.
    fn authenticate(
        &mut self,
        uid: &Uid,
        block: u8,
        key_type: KeyType,
        key: &MifareKey,
    ) -> Result<()>;

    fn read_block(&mut self, block: u8) -> Result<BlockData>;

    fn write_block(&mut self, block: u8, data: &BlockData) -> Result<()>;

    /// Ultralight / NTAG page read
    fn read_page(&mut self, page: u8) -> Result<PageData>;

    /// Ultralight / NTAG page write
    fn write_page(&mut self, page: u8, data: &PageData) -> Result<()>;

    /// Put the tag to sleep.
    fn halt(&mut self) -> Result<()>;

    /// Write a URI record into `sector` (1..=15) of a Classic tag whose
    /// sector is already authenticated. The layout is validated before
    /// anything is written.
    fn write_classic_ndef_uri(&mut self, sector: u8, prefix: u8, uri: &[u8]) -> Result<()> {
        let first = limits::ndef_sector_first_block(sector)?;
        let layout = ndef::classic_uri_layout(prefix, uri)?;
        for (i, block) in layout.iter().enumerate() {
            self.write_block(first + i as u8, &BlockData::from_bytes(*block))?;
        }
        debug!("ndef uri ({} bytes) written to sector {}", uri.len(), sector);
        Ok(())
    }

    /// Write a URI record starting at page 4 of an NTAG2xx.
    fn write_ntag_ndef_uri(&mut self, prefix: u8, uri: &[u8]) -> Result<()> {
        let pages = ndef::ntag_uri_pages(prefix, uri)?;
        for (i, page) in pages.iter().enumerate() {
            self.write_page(ndef::NTAG_FIRST_PAGE + i as u8, &PageData::from_bytes(*page))?;
        }
        debug!("ndef uri ({} bytes) written to {} pages", uri.len(), pages.len());
        Ok(())
    }

    /// Lay out the MAD in sector 0 (blocks 1..=3) so sectors 1..=15 are
    /// announced as NDEF. Sector 0 must be authenticated.
    fn format_classic_ndef(&mut self) -> Result<()> {
        for (i, block) in ndef::CLASSIC_MAD_BLOCKS.iter().enumerate() {
            self.write_block(1 + i as u8, &BlockData::from_bytes(*block))?;
        }
        Ok(())
    }
}

impl<T: TagReader + ?Sized> TagReader for Box<T> {
    fn kind(&self) -> ControllerKind {
        (**self).kind()
    }
    fn initialize(&mut self) -> Result<()> {
        (**self).initialize()
    }
    fn discover(&mut self) -> Result<Option<TagInfo>> {
        (**self).discover()
    }
    fn authenticate(
        &mut self,
        uid: &Uid,
        block: u8,
        key_type: KeyType,
        key: &MifareKey,
    ) -> Result<()> {
        (**self).authenticate(uid, block, key_type, key)
    }
    fn read_block(&mut self, block: u8) -> Result<BlockData> {
        (**self).read_block(block)
    }
    fn write_block(&mut self, block: u8, data: &BlockData) -> Result<()> {
        (**self).write_block(block, data)
    }
    fn read_page(&mut self, page: u8) -> Result<PageData> {
        (**self).read_page(page)
    }
    fn write_page(&mut self, page: u8, data: &PageData) -> Result<()> {
        (**self).write_page(page, data)
    }
    fn halt(&mut self) -> Result<()> {
        (**self).halt()
    }
}
