// berry/src/device/handle.rs

use std::marker::PhantomData;

use log::{debug, warn};

use crate::card::{Authentication, Tag, TagFamily, sector};
use crate::device::models::{TagReader, limits};
use crate::error::ErrorKind;
use crate::types::{BlockData, ControllerKind, KeyType, MifareKey, PageData};
use crate::{Error, Result};

/// Type-state markers
pub struct Uninitialized;
pub struct Initialized;

/// Device handle that enforces initialization state at compile time.
///
/// Every discovery, halt and failed tag operation starts a new session;
/// [`Tag`] handles from an older session are rejected with
/// [`Error::StaleTag`].
pub struct Device<State = Uninitialized> {
    reader: Box<dyn TagReader>,
    session: u32,
    _state: PhantomData<State>,
}

impl<State> Device<State> {
    /// Which controller backs this device
    pub fn kind(&self) -> ControllerKind {
        self.reader.kind()
    }
}

impl Device<Uninitialized> {
    /// Wrap an existing backend. Mostly useful for tests and custom
    /// controllers; see [`crate::DeviceBuilder`] for the usual path.
    pub fn new_with_reader(reader: Box<dyn TagReader>) -> Self {
        Self {
            reader,
            session: 0,
            _state: PhantomData,
        }
    }

    /// Run the controller's init sequence. Returns an initialized Device on
    /// success.
    pub fn initialize(self) -> Result<Device<Initialized>> {
        let mut this = self;
        this.reader.initialize()?;
        debug!("{} initialized", this.reader.kind());

        Ok(Device {
            reader: this.reader,
            session: this.session,
            _state: PhantomData,
        })
    }
}

impl Device<Initialized> {
    /// Look for a single tag in the field. Any tag handle obtained earlier
    /// becomes stale, whether or not a new tag is found.
    pub fn discover(&mut self) -> Result<Option<Tag>> {
        self.invalidate();
        let found = self.reader.discover()?;
        Ok(found.map(|info| {
            debug!("tag {} (sak {:#04x})", info.uid(), info.sak().as_u8());
            Tag::new(info, self.session)
        }))
    }

    /// Authenticate the sector holding `block`. On success the key is
    /// remembered on the tag; on failure the tag must be discovered again.
    pub fn authenticate(
        &mut self,
        tag: &mut Tag,
        block: u8,
        key_type: KeyType,
        key: &MifareKey,
    ) -> Result<()> {
        self.check_session(tag)?;
        if tag.family() != TagFamily::MifareClassic {
            return Err(Error::UnsupportedOperation(format!(
                "authentication on {:?} tag",
                tag.family()
            )));
        }
        let uid = *tag.uid();
        match self.guarded(|r| r.authenticate(&uid, block, key_type, key)) {
            Ok(()) => {
                tag.set_authentication(Authentication {
                    block,
                    key_type,
                    key: *key,
                });
                Ok(())
            }
            Err(e) => {
                tag.clear_authentication();
                Err(e)
            }
        }
    }

    pub fn read_block(&mut self, tag: &Tag, block: u8) -> Result<BlockData> {
        self.check_block_access(tag, block)?;
        self.guarded(|r| r.read_block(block))
    }

    pub fn write_block(&mut self, tag: &Tag, block: u8, data: &BlockData) -> Result<()> {
        self.check_block_access(tag, block)?;
        self.guarded(|r| r.write_block(block, data))
    }

    pub fn read_page(&mut self, tag: &Tag, page: u8) -> Result<PageData> {
        self.check_session(tag)?;
        self.guarded(|r| r.read_page(page))
    }

    pub fn write_page(&mut self, tag: &Tag, page: u8, data: &PageData) -> Result<()> {
        self.check_session(tag)?;
        self.guarded(|r| r.write_page(page, data))
    }

    /// Write a URI record in the layout the tag family expects.
    ///
    /// Classic tags receive it in the sector covered by the current
    /// authentication; Ultralight / NTAG tags from page 4 on.
    pub fn write_ndef_uri(&mut self, tag: &Tag, prefix: u8, uri: &[u8]) -> Result<()> {
        match tag.family() {
            TagFamily::MifareClassic => {
                let block = tag
                    .authentication()
                    .map(|a| a.block)
                    .ok_or(Error::NoAuthenticatedSector)?;
                self.write_classic_ndef_uri(tag, sector::sector_of(block), prefix, uri)
            }
            TagFamily::Ultralight => self.write_ntag_ndef_uri(tag, prefix, uri),
            TagFamily::Unknown => Err(Error::UnsupportedOperation(
                "ndef on unknown tag family".into(),
            )),
        }
    }

    /// Write a URI record into `sector` of a Classic tag. The sector must
    /// be authenticated.
    pub fn write_classic_ndef_uri(
        &mut self,
        tag: &Tag,
        sector: u8,
        prefix: u8,
        uri: &[u8],
    ) -> Result<()> {
        self.check_session(tag)?;
        let first = limits::ndef_sector_first_block(sector)?;
        if !tag.is_authenticated_for(first) {
            return Err(Error::NotAuthenticated { block: first });
        }
        self.guarded(|r| r.write_classic_ndef_uri(sector, prefix, uri))
    }

    pub fn write_ntag_ndef_uri(&mut self, tag: &Tag, prefix: u8, uri: &[u8]) -> Result<()> {
        self.check_session(tag)?;
        self.guarded(|r| r.write_ntag_ndef_uri(prefix, uri))
    }

    /// Write the NDEF MAD into sector 0 of a Classic tag.
    pub fn format_ndef(&mut self, tag: &Tag) -> Result<()> {
        self.check_block_access(tag, 1)?;
        if tag.family() != TagFamily::MifareClassic {
            return Err(Error::UnsupportedOperation(
                "ndef format needs a Mifare Classic tag".into(),
            ));
        }
        self.guarded(|r| r.format_classic_ndef())
    }

    /// Put the tag to sleep. The handle is consumed; the tag has to be
    /// discovered again.
    pub fn halt(&mut self, tag: Tag) -> Result<()> {
        self.check_session(&tag)?;
        let result = self.reader.halt();
        self.invalidate();
        result
    }

    /// Direct access to the backend, bypassing tag bookkeeping.
    pub fn reader_mut(&mut self) -> &mut dyn TagReader {
        &mut *self.reader
    }

    fn invalidate(&mut self) {
        self.session = self.session.wrapping_add(1);
    }

    fn check_session(&self, tag: &Tag) -> Result<()> {
        if tag.session() != self.session {
            return Err(Error::StaleTag);
        }
        Ok(())
    }

    fn check_block_access(&self, tag: &Tag, block: u8) -> Result<()> {
        self.check_session(tag)?;
        if tag.family() == TagFamily::MifareClassic && !tag.is_authenticated_for(block) {
            return Err(Error::NotAuthenticated { block });
        }
        Ok(())
    }

    /// Run a tag operation; anything but a rejected argument ends the
    /// session.
    fn guarded<T>(&mut self, op: impl FnOnce(&mut dyn TagReader) -> Result<T>) -> Result<T> {
        let result = op(&mut *self.reader);
        if let Err(e) = &result {
            if e.kind() != ErrorKind::Parameter {
                warn!("tag operation failed, session ended: {}", e);
                self.invalidate();
            }
        }
        result
    }
}
