// berry/src/device/models/rc522/tags.rs

//! ISO14443-3 activation and Mifare / NTAG operations on top of the
//! MFRC522 command engine.

use log::{debug, warn};

use super::Rc522;
use super::config::{Command, MF_CRYPTO1_ON, Register};
use crate::card::TagInfo;
use crate::device::models::{TagReader, limits};
use crate::error::WritePhase;
use crate::protocol::mifare;
use crate::transport::{Delay, RegisterBus};
use crate::types::{
    Atqa, BlockData, ControllerKind, KeyType, MifareKey, PageData, Sak, Uid,
};
use crate::{Error, ErrorKind, Result};

/// Bits in an ATQA
const ATQA_BITS: u16 = 16;
/// UID CLn (4) + BCC
const ANTICOLLISION_BITS: u16 = 40;
/// SAK + CRC_A
const SELECT_BITS: u16 = 24;
/// 16 data bytes + CRC_A
const READ_BITS: u16 = 144;
/// Mifare ACK / NAK
const ACK_BITS: u16 = 4;
/// Bits sent of a REQA / WUPA short frame
const SHORT_FRAME_BITS: u8 = 7;

const CASCADE_LEVELS: [u8; 3] = [
    mifare::CASCADE_LEVEL_1,
    mifare::CASCADE_LEVEL_2,
    mifare::CASCADE_LEVEL_3,
];

fn check_ack(data: &[u8], bits: u16, phase: WritePhase) -> Result<()> {
    let ack = data.first().copied().unwrap_or(0);
    if bits != ACK_BITS || ack & 0x0F != mifare::ACK_NIBBLE {
        return Err(Error::WriteRejected { phase, ack });
    }
    Ok(())
}

impl<B: RegisterBus, D: Delay> Rc522<B, D> {
    /// REQA (0x26) or WUPA (0x52) as a 7-bit short frame.
    pub fn request(&mut self, req_code: u8) -> Result<Atqa> {
        let data = self
            .transceive_bits(&[req_code], SHORT_FRAME_BITS)?
            .expect_bits(ATQA_BITS)?;
        Ok(Atqa::from_bytes([data[0], data[1]]))
    }

    /// Anticollision at one cascade level; returns the four UID bytes of
    /// that level after checking the BCC.
    pub fn anticollision(&mut self, cascade: u8) -> Result<[u8; 4]> {
        let data = self
            .transceive(&[cascade, mifare::NVB_ANTICOLLISION])?
            .expect_bits(ANTICOLLISION_BITS)?;
        let uid = [data[0], data[1], data[2], data[3]];
        let expected = mifare::bcc(&uid);
        if data[4] != expected {
            return Err(Error::BccMismatch {
                expected,
                actual: data[4],
            });
        }
        Ok(uid)
    }

    /// SELECT at one cascade level. Anything but a 24-bit answer is an
    /// incomplete selection.
    pub fn select(&mut self, cascade: u8, uid: &[u8; 4]) -> Result<Sak> {
        let mut cmd = [0u8; 7];
        cmd[0] = cascade;
        cmd[1] = mifare::NVB_SELECT;
        cmd[2..6].copy_from_slice(uid);
        cmd[6] = mifare::bcc(uid);
        let frame = self.with_crc(&cmd)?;
        self.clear_bitmask(Register::Status2, MF_CRYPTO1_ON)?;
        let resp = self.transceive(&frame)?;
        if resp.bits() != SELECT_BITS {
            return Err(Error::IncompleteSelection {
                actual: resp.bits(),
            });
        }
        Ok(Sak::from(resp.data()[0]))
    }

    /// Full activation of the single tag that answered `atqa`: walk the
    /// cascade levels until the SAK reports a complete UID.
    pub fn select_tag(&mut self, atqa: Atqa) -> Result<TagInfo> {
        let mut uid = Vec::with_capacity(10);
        for &cascade in CASCADE_LEVELS.iter() {
            let part = self.anticollision(cascade)?;
            let sak = self.select(cascade, &part)?;
            if !sak.uid_incomplete() {
                uid.extend_from_slice(&part);
                let uid = Uid::try_from(uid.as_slice())?;
                debug!("rc522 selected uid {} sak {:#04x}", uid, sak.as_u8());
                return Ok(TagInfo::new(atqa, sak, uid));
            }
            if part[0] != mifare::CASCADE_TAG {
                return Err(Error::FrameFormat(format!(
                    "expected cascade tag at level {:#04x}, got {:#04x}",
                    cascade, part[0]
                )));
            }
            uid.extend_from_slice(&part[1..]);
        }
        Err(Error::FrameFormat("uid longer than three cascade levels".into()))
    }

    /// MFAuthent with `[mode, block, key, uid]`; success iff Crypto1 is
    /// on afterwards.
    pub fn mifare_authenticate(
        &mut self,
        key_type: KeyType,
        block: u8,
        key: &MifareKey,
        uid: &[u8; 4],
    ) -> Result<()> {
        let mut payload = [0u8; 12];
        payload[0] = key_type.auth_command();
        payload[1] = block;
        payload[2..8].copy_from_slice(key.as_bytes());
        payload[8..].copy_from_slice(uid);
        self.execute_command(Command::MfAuthent, &payload)?;
        if self.read_register(Register::Status2)? & MF_CRYPTO1_ON == 0 {
            return Err(Error::AuthenticationFailed { block });
        }
        debug!("rc522 authenticated block {} with key {}", block, key_type);
        Ok(())
    }

    fn read_sixteen(&mut self, addr: u8) -> Result<[u8; 16]> {
        let frame = self.with_crc(&[mifare::READ, addr])?;
        let data = self.transceive(&frame)?.expect_bits(READ_BITS)?;
        self.verify_crc(&data)?;
        let mut out = [0u8; 16];
        out.copy_from_slice(&data[..16]);
        Ok(out)
    }

    /// Read one block of a Classic 1K (blocks 0..64).
    pub fn mifare_read_block(&mut self, addr: u8) -> Result<BlockData> {
        limits::check_rc522_block(addr)?;
        Ok(BlockData::from_bytes(self.read_sixteen(addr)?))
    }

    /// Two-phase write. Neither phase is rolled back if the other fails.
    pub fn mifare_write_block(&mut self, addr: u8, data: &BlockData) -> Result<()> {
        limits::check_rc522_block(addr)?;

        let frame = self.with_crc(&[mifare::WRITE, addr])?;
        let resp = self.transceive(&frame)?;
        check_ack(resp.data(), resp.bits(), WritePhase::Command)?;

        let frame = self.with_crc(data.as_bytes())?;
        let resp = self.transceive(&frame)?;
        check_ack(resp.data(), resp.bits(), WritePhase::Data)
    }

    /// NTAG2xx page read (pages 0..231).
    pub fn ntag_read_page(&mut self, page: u8) -> Result<PageData> {
        limits::check_ntag_read(page)?;
        let data = self.read_sixteen(page)?;
        Ok(PageData::from_bytes([data[0], data[1], data[2], data[3]]))
    }

    /// NTAG2xx page write (user pages 4..=225).
    pub fn ntag_write_page(&mut self, page: u8, data: &PageData) -> Result<()> {
        limits::check_ntag_write(page)?;
        let d = data.as_bytes();
        let frame = self.with_crc(&[mifare::ULTRALIGHT_WRITE, page, d[0], d[1], d[2], d[3]])?;
        let resp = self.transceive(&frame)?;
        check_ack(resp.data(), resp.bits(), WritePhase::Data)
    }

    /// HLTA. A halted tag does not answer, so tag-level errors are
    /// expected and only logged; bus failures are returned.
    pub fn halt_tag(&mut self) -> Result<()> {
        let frame = self.with_crc(&[mifare::HALT, 0x00])?;
        match self.transceive(&frame) {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::Transport => return Err(e),
            Err(e) => warn!("rc522 halt: {}", e),
        }
        self.clear_bitmask(Register::Status2, MF_CRYPTO1_ON)
    }
}

impl<B: RegisterBus, D: Delay> TagReader for Rc522<B, D> {
    fn kind(&self) -> ControllerKind {
        ControllerKind::Rc522
    }

    fn initialize(&mut self) -> Result<()> {
        self.reset()?;
        self.enable_antenna()?;
        debug!("rc522 version {:#04x}", self.version()?);
        Ok(())
    }

    fn discover(&mut self) -> Result<Option<TagInfo>> {
        let found = self
            .request(mifare::REQ_IDLE)
            .and_then(|atqa| self.select_tag(atqa));
        match found {
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
        self.mifare_authenticate(key_type, block, key, &uid.auth_bytes())
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
        self.halt_tag()
    }
}
