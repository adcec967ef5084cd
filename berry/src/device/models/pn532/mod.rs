// berry/src/device/models/pn532/mod.rs

//! PN532 backend driven over a bit-banged serial link.
//!
//! Every exchange with the controller has the same shape: write a command
//! frame, wait for the status word to report ready, read the
//! acknowledgement frame, wait for ready again and read the response
//! frame. Any failing step aborts the call; nothing is retried.

mod commands;
pub mod config;
mod tags;

use log::{debug, trace};

pub use config::Pn532Config;

use crate::card::TagInfo;
use crate::constants::ACK_FRAME;
use crate::device::models::TagReader;
use crate::protocol::parser;
use crate::protocol::{Direction, Frame};
use crate::transport::{Delay, Level, SerialLink};
use crate::types::{
    Atqa, BaudRate, BlockData, ControllerKind, FirmwareVersion, KeyType, MifareKey, PageData,
    Sak, Uid,
};
use crate::utils::timeout::{LIST_TARGET_TIMEOUT_MS, READY_POLL_INTERVAL_MS};
use crate::{Error, Result};

use config::*;

/// PN532 controller on a [`SerialLink`].
pub struct Pn532<L, D> {
    link: L,
    delay: D,
    config: Pn532Config,
    target: Option<u8>,
}

impl<L: SerialLink, D: Delay> Pn532<L, D> {
    pub fn new(link: L, delay: D) -> Self {
        Self::with_config(link, delay, Pn532Config::default())
    }

    pub fn with_config(link: L, delay: D, config: Pn532Config) -> Self {
        Self {
            link,
            delay,
            config,
            target: None,
        }
    }

    pub fn config(&self) -> &Pn532Config {
        &self.config
    }

    pub fn set_config(&mut self, config: Pn532Config) {
        self.config = config;
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }

    /// Target number of the last listed tag
    pub fn target(&self) -> Option<u8> {
        self.target
    }

    pub fn into_parts(self) -> (L, D) {
        (self.link, self.delay)
    }

    // ---- pin level -------------------------------------------------------

    fn select(&mut self) -> Result<()> {
        self.link.set_select(Level::Low)?;
        self.delay.delay_ms(SELECT_SETTLE_MS);
        Ok(())
    }

    fn deselect(&mut self) -> Result<()> {
        self.link.set_select(Level::High)
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.link.set_clock(Level::High)?;
        for i in 0..8 {
            self.link.set_clock(Level::Low)?;
            self.link.set_mosi(Level::from_bit(byte & (1 << i) != 0))?;
            self.link.set_clock(Level::High)?;
        }
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8> {
        let mut byte = 0u8;
        self.link.set_clock(Level::High)?;
        for i in 0..8 {
            if self.link.read_miso()?.is_high() {
                byte |= 1 << i;
            }
            self.link.set_clock(Level::Low)?;
            self.link.set_clock(Level::High)?;
        }
        Ok(byte)
    }

    /// Run `f` with the chip selected, deselecting afterwards even when
    /// `f` fails.
    fn transaction<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.select()?;
        let out = f(self);
        let released = self.deselect();
        let value = out?;
        released?;
        Ok(value)
    }

    // ---- frame engine ----------------------------------------------------

    /// Frame `payload` host -> controller and clock it out.
    pub fn write_command(&mut self, payload: &[u8]) -> Result<()> {
        let frame = Frame::command(payload)?;
        trace!("pn532 >> {}", crate::utils::bytes_to_hex_spaced(&frame));
        self.transaction(|this| {
            this.write_byte(MARKER_DATA_WRITE)?;
            frame.iter().try_for_each(|&b| this.write_byte(b))
        })
    }

    /// Clock in `buf.len()` bytes of the pending frame.
    pub fn read_data(&mut self, buf: &mut [u8]) -> Result<()> {
        self.transaction(|this| {
            this.write_byte(MARKER_DATA_READ)?;
            for b in buf.iter_mut() {
                *b = this.read_byte()?;
            }
            Ok(())
        })?;
        trace!("pn532 << {}", crate::utils::bytes_to_hex_spaced(buf));
        Ok(())
    }

    pub fn read_ack(&mut self) -> Result<bool> {
        let mut buf = [0u8; 6];
        self.read_data(&mut buf)?;
        Ok(buf == ACK_FRAME)
    }

    pub fn is_ready(&mut self) -> Result<bool> {
        let status = self.transaction(|this| {
            this.write_byte(MARKER_STATUS_READ)?;
            this.read_byte()
        })?;
        Ok(status == STATUS_READY)
    }

    /// Poll the status word until ready. Elapsed time is counted in poll
    /// intervals rather than measured; `timeout_ms == 0` never gives up.
    pub fn wait_ready(&mut self, timeout_ms: u32) -> Result<bool> {
        let mut elapsed = 0u32;
        loop {
            if self.is_ready()? {
                return Ok(true);
            }
            if timeout_ms != 0 {
                elapsed = elapsed.saturating_add(READY_POLL_INTERVAL_MS);
                if elapsed > timeout_ms {
                    return Ok(false);
                }
            }
            self.delay.delay_ms(READY_POLL_INTERVAL_MS);
        }
    }

    /// Write, wait, read the acknowledgement, wait for the response.
    /// `false` if any step fails.
    pub fn send_command_check_ack(&mut self, payload: &[u8], timeout_ms: u32) -> Result<bool> {
        match self.send_command(payload, timeout_ms) {
            Ok(()) => Ok(true),
            Err(Error::Timeout) | Err(Error::NoAck) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Like [`send_command_check_ack`](Self::send_command_check_ack) but
    /// reports which step failed.
    pub fn send_command(&mut self, payload: &[u8], timeout_ms: u32) -> Result<()> {
        self.send_and_ack(payload, timeout_ms)?;
        if !self.wait_ready(timeout_ms)? {
            return Err(Error::Timeout);
        }
        Ok(())
    }

    fn send_and_ack(&mut self, payload: &[u8], timeout_ms: u32) -> Result<()> {
        self.write_command(payload)?;
        if !self.wait_ready(timeout_ms)? {
            return Err(Error::Timeout);
        }
        if !self.read_ack()? {
            return Err(Error::NoAck);
        }
        Ok(())
    }

    /// Read the pending response frame and check it answers `command`.
    /// Returns the bytes after the response code.
    pub fn read_response(&mut self, command: u8) -> Result<Vec<u8>> {
        let mut buf = [0u8; RESPONSE_BUFFER_LEN];
        self.read_data(&mut buf)?;
        let (frame, _) = Frame::decode_prefix(&buf)?;
        if frame.direction != Direction::ControllerToHost {
            return Err(Error::FrameFormat(format!(
                "expected controller-to-host frame, got {:#04x}",
                frame.direction.as_byte()
            )));
        }
        parser::expect_response_to(&frame.payload, command)?;
        Ok(frame.payload[1..].to_vec())
    }

    /// Send a command and return its response data.
    pub fn call(&mut self, payload: &[u8]) -> Result<Vec<u8>> {
        let command = *payload.first().ok_or(Error::InvalidLength {
            expected: 1,
            actual: 0,
        })?;
        self.send_command(payload, self.config.timeout_ms)?;
        self.read_response(command)
    }

    // ---- generic commands ------------------------------------------------

    pub fn firmware_version(&mut self) -> Result<FirmwareVersion> {
        let data = self.call(commands::get_firmware_version())?;
        let [ic, version, revision, support] = parser::array_at::<4>(&data, 0)?;
        let fw = FirmwareVersion {
            ic,
            version,
            revision,
            support,
        };
        debug!("pn532 firmware {:#010x}", fw.as_u32());
        Ok(fw)
    }

    /// Normal mode, 1 s virtual card timeout, IRQ pin in use.
    pub fn sam_config(&mut self) -> Result<()> {
        self.call(commands::sam_configuration())?;
        Ok(())
    }

    /// Bound how often the controller retries passive activation
    /// (0xFF = forever).
    pub fn set_passive_activation_retries(&mut self, max: u8) -> Result<()> {
        self.call(&commands::set_max_retries(max))?;
        Ok(())
    }

    // ---- ISO14443A -------------------------------------------------------

    /// Wait for exactly one target at `baud`. The wait for the response
    /// is bounded by `detect_timeout_ms`; running out of it means no tag.
    pub fn read_passive_target(&mut self, baud: BaudRate) -> Result<TagInfo> {
        let payload = commands::in_list_passive_target(baud as u8);
        self.send_and_ack(&payload, self.config.timeout_ms)?;
        if !self.wait_ready(self.config.detect_timeout_ms)? {
            return Err(Error::TagNotFound);
        }
        let data = self.read_response(CMD_IN_LIST_PASSIVE_TARGET)?;
        self.parse_target(&data)
    }

    /// List one ISO14443A target, waiting up to 30 s, and return its
    /// target number.
    pub fn in_list_passive_target(&mut self) -> Result<u8> {
        let payload = commands::in_list_passive_target(BaudRate::Iso14443a as u8);
        self.send_and_ack(&payload, self.config.timeout_ms)?;
        if !self.wait_ready(LIST_TARGET_TIMEOUT_MS)? {
            return Err(Error::Timeout);
        }
        let data = self.read_response(CMD_IN_LIST_PASSIVE_TARGET)?;
        let found = parser::byte_at(&data, 0)?;
        if found != 1 {
            return Err(Error::TargetCount { found });
        }
        let tg = parser::byte_at(&data, 1)?;
        self.target = Some(tg);
        Ok(tg)
    }

    // NbTg | Tg | SENS_RES(2) | SEL_RES | NFCIDLength | NFCID
    fn parse_target(&mut self, data: &[u8]) -> Result<TagInfo> {
        match parser::byte_at(data, 0)? {
            0 => return Err(Error::TagNotFound),
            1 => {}
            found => return Err(Error::TargetCount { found }),
        }
        let tg = parser::byte_at(data, 1)?;
        let atqa = Atqa::from_bytes(parser::array_at::<2>(data, 2)?);
        let sak = Sak::from(parser::byte_at(data, 4)?);
        let uid_len = parser::byte_at(data, 5)? as usize;
        let uid = Uid::try_from(parser::slice_at(data, 6, uid_len)?)?;
        self.target = Some(tg);
        debug!("pn532 target {} uid {} sak {:#04x}", tg, uid, sak.as_u8());
        Ok(TagInfo::new(atqa, sak, uid))
    }

    fn exchange_status(&mut self, data: &[u8]) -> Result<(u8, Vec<u8>)> {
        if data.len() > DATA_EXCHANGE_MAX_LEN {
            return Err(Error::PayloadTooLong {
                max: DATA_EXCHANGE_MAX_LEN,
                actual: data.len(),
            });
        }
        let tg = self.target.unwrap_or(DEFAULT_TARGET);
        let resp = self.call(&commands::in_data_exchange(tg, data))?;
        let status = parser::byte_at(&resp, 0)?;
        Ok((status, resp[1..].to_vec()))
    }

    /// Exchange `data` (at most 62 bytes) with the listed target.
    pub fn in_data_exchange(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        let (status, resp) = self.exchange_status(data)?;
        if status & STATUS_ERROR_MASK != 0 {
            return Err(Error::TagStatus { status });
        }
        Ok(resp)
    }

    /// Release the listed target.
    pub fn in_release(&mut self) -> Result<()> {
        let tg = self.target.take().unwrap_or(DEFAULT_TARGET);
        let resp = self.call(&commands::in_release(tg))?;
        let status = parser::byte_at(&resp, 0)?;
        if status & STATUS_ERROR_MASK != 0 {
            return Err(Error::TagStatus { status });
        }
        Ok(())
    }
}

impl<L: SerialLink, D: Delay> TagReader for Pn532<L, D> {
    fn kind(&self) -> ControllerKind {
        ControllerKind::Pn532
    }

    fn initialize(&mut self) -> Result<()> {
        self.firmware_version()?;
        self.sam_config()?;
        if let Some(retries) = self.config.activation_retries {
            self.set_passive_activation_retries(retries)?;
        }
        Ok(())
    }

    fn discover(&mut self) -> Result<Option<TagInfo>> {
        match self.read_passive_target(self.config.baud) {
            Ok(info) => Ok(Some(info)),
            Err(Error::TagNotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn authenticate(
        &mut self,
        uid: &Uid,
        block: u8,
        key_type: KeyType,
        key: &MifareKey,
    ) -> Result<()> {
        self.mifare_authenticate(uid, block, key_type, key)
    }

    fn read_block(&mut self, block: u8) -> Result<BlockData> {
        self.mifare_read_block(block)
    }

    fn write_block(&mut self, block: u8, data: &BlockData) -> Result<()> {
        self.mifare_write_block(block, data)
    }

    fn read_page(&mut self, page: u8) -> Result<PageData> {
        self.ntag_read_page(page)
    }

    fn write_page(&mut self, page: u8, data: &PageData) -> Result<()> {
        self.ntag_write_page(page, data)
    }

    fn halt(&mut self) -> Result<()> {
        self.in_release()
    }
}
