// berry/src/device/models/pn532/tags.rs

//! Mifare Classic, Ultralight and NTAG2xx operations tunnelled through
//! InDataExchange.

use log::debug;

use super::Pn532;
use super::config::{PAGE_WRITE_SETTLE_MS, STATUS_ERROR_MASK};
use crate::device::models::limits;
use crate::protocol::mifare;
use crate::protocol::parser;
use crate::transport::{Delay, SerialLink};
use crate::types::{BlockData, KeyType, MifareKey, PageData, Uid};
use crate::{Error, Result};

impl<L: SerialLink, D: Delay> Pn532<L, D> {
    /// Authenticate `block` with a Mifare Classic key. A non-zero status
    /// from the tag is an authentication failure.
    pub fn mifare_authenticate(
        &mut self,
        uid: &Uid,
        block: u8,
        key_type: KeyType,
        key: &MifareKey,
    ) -> Result<()> {
        let mut data = Vec::with_capacity(2 + 6 + uid.len());
        data.push(key_type.auth_command());
        data.push(block);
        data.extend_from_slice(key.as_bytes());
        data.extend_from_slice(uid.as_bytes());

        let (status, _) = self.exchange_status(&data)?;
        if status != 0 {
            debug!("pn532 auth block {} key {} rejected ({:#04x})", block, key_type, status);
            return Err(Error::AuthenticationFailed { block });
        }
        debug!("pn532 authenticated block {} with key {}", block, key_type);
        Ok(())
    }

    pub fn mifare_read_block(&mut self, block: u8) -> Result<BlockData> {
        let data = self.in_data_exchange(&[mifare::READ, block])?;
        Ok(BlockData::from_bytes(parser::array_at::<16>(&data, 0)?))
    }

    pub fn mifare_write_block(&mut self, block: u8, data: &BlockData) -> Result<()> {
        let mut cmd = Vec::with_capacity(18);
        cmd.push(mifare::WRITE);
        cmd.push(block);
        cmd.extend_from_slice(data.as_bytes());
        self.in_data_exchange(&cmd)?;
        Ok(())
    }

    /// Ultralight page read. READ returns four pages; only the first is
    /// kept.
    pub fn ultralight_read_page(&mut self, page: u8) -> Result<PageData> {
        if page >= limits::ULTRALIGHT_PAGES {
            return Err(Error::out_of_range(
                "page",
                page as u16,
                0,
                limits::ULTRALIGHT_PAGES as u16 - 1,
            ));
        }
        self.read_page_unchecked(page)
    }

    pub fn ultralight_write_page(&mut self, page: u8, data: &PageData) -> Result<()> {
        if page >= limits::ULTRALIGHT_PAGES {
            return Err(Error::out_of_range(
                "page",
                page as u16,
                0,
                limits::ULTRALIGHT_PAGES as u16 - 1,
            ));
        }
        self.write_page_unchecked(page, data)
    }

    /// NTAG2xx page read (pages 0..231).
    pub fn ntag_read_page(&mut self, page: u8) -> Result<PageData> {
        limits::check_ntag_read(page)?;
        self.read_page_unchecked(page)
    }

    /// NTAG2xx page write (user pages 4..=225).
    pub fn ntag_write_page(&mut self, page: u8, data: &PageData) -> Result<()> {
        limits::check_ntag_write(page)?;
        self.write_page_unchecked(page, data)
    }

    fn read_page_unchecked(&mut self, page: u8) -> Result<PageData> {
        let data = self.in_data_exchange(&[mifare::READ, page])?;
        Ok(PageData::from_bytes(parser::array_at::<4>(&data, 0)?))
    }

    fn write_page_unchecked(&mut self, page: u8, data: &PageData) -> Result<()> {
        let d = data.as_bytes();
        let cmd = [mifare::ULTRALIGHT_WRITE, page, d[0], d[1], d[2], d[3]];
        let tg = self.target.unwrap_or(super::config::DEFAULT_TARGET);
        let payload = super::commands::in_data_exchange(tg, &cmd);
        self.send_command(&payload, self.config.timeout_ms)?;
        self.delay.delay_ms(PAGE_WRITE_SETTLE_MS);
        let resp = self.read_response(payload[0])?;
        let status = parser::byte_at(&resp, 0)?;
        if status & STATUS_ERROR_MASK != 0 {
            return Err(Error::TagStatus { status });
        }
        Ok(())
    }
}
