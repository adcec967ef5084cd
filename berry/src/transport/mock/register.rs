// berry/src/transport/mock/register.rs

//! Register-file model of an MFRC522 for driving the RC522 backend in
//! tests.
//!
//! Only what the driver relies on is modelled: the 64-byte FIFO, the
//! set/clear semantics of the IRQ registers, the CRC coprocessor, soft
//! reset, and the Transceive / MFAuthent commands. Tag answers are
//! scripted per transceive.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::protocol::checksum::crc_a;
use crate::transport::traits::RegisterBus;
use crate::{Error, Result};

const COMMAND: usize = 0x01;
const COM_IRQ: usize = 0x04;
const DIV_IRQ: usize = 0x05;
const ERROR: usize = 0x06;
const STATUS2: usize = 0x08;
const FIFO_DATA: usize = 0x09;
const FIFO_LEVEL: usize = 0x0A;
const CONTROL: usize = 0x0C;
const BIT_FRAMING: usize = 0x0D;
const TX_CONTROL: usize = 0x14;
const CRC_RESULT_H: usize = 0x21;
const CRC_RESULT_L: usize = 0x22;
const VERSION: usize = 0x37;

const CMD_IDLE: u8 = 0x00;
const CMD_CALC_CRC: u8 = 0x03;
const CMD_TRANSCEIVE: u8 = 0x0C;
const CMD_MF_AUTHENT: u8 = 0x0E;
const CMD_SOFT_RESET: u8 = 0x0F;

const FIFO_CAPACITY: usize = 64;

/// Version register value of a genuine MFRC522 v2.0
pub const MOCK_VERSION: u8 = 0x92;

/// Scripted tag answer for one transceive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagReply {
    /// Bytes received; `last_bits` valid bits in the final byte (0 = 8)
    Data { bytes: Vec<u8>, last_bits: u8 },
    /// Timer expired before anything was received
    Timeout,
    /// Collision detected by the receiver
    Collision,
    /// Error register flags (protocol / parity / overflow)
    ErrorFlags(u8),
    /// No IRQ is ever raised
    Silent,
}

impl TagReply {
    /// Whole bytes
    pub fn bytes(bytes: &[u8]) -> Self {
        TagReply::Data {
            bytes: bytes.to_vec(),
            last_bits: 0,
        }
    }

    /// A single 4-bit answer (Mifare ACK / NAK)
    pub fn nibble(value: u8) -> Self {
        TagReply::Data {
            bytes: vec![value & 0x0F],
            last_bits: 4,
        }
    }

    /// Bytes followed by their CRC_A, as a tag sends them
    pub fn with_crc(bytes: &[u8]) -> Self {
        let mut v = bytes.to_vec();
        v.extend_from_slice(&crc_a(bytes).to_le_bytes());
        TagReply::Data {
            bytes: v,
            last_bits: 0,
        }
    }
}

#[derive(Debug)]
struct ChipState {
    regs: [u8; 64],
    fifo: VecDeque<u8>,
    transceive_armed: bool,
    script: VecDeque<TagReply>,
    auth_results: VecDeque<bool>,
    transceived: Vec<Vec<u8>>,
    auth_requests: Vec<Vec<u8>>,
    writes: Vec<(u8, u8)>,
    comirq_reads: usize,
    soft_resets: usize,
    fail_register: Option<u8>,
}

impl Default for ChipState {
    fn default() -> Self {
        let mut s = Self {
            regs: [0u8; 64],
            fifo: VecDeque::new(),
            transceive_armed: false,
            script: VecDeque::new(),
            auth_results: VecDeque::new(),
            transceived: Vec::new(),
            auth_requests: Vec::new(),
            writes: Vec::new(),
            comirq_reads: 0,
            soft_resets: 0,
            fail_register: None,
        };
        s.power_on();
        s
    }
}

impl ChipState {
    fn power_on(&mut self) {
        self.regs = [0u8; 64];
        self.regs[COMMAND] = 0x20;
        self.regs[COM_IRQ] = 0x14;
        self.regs[TX_CONTROL] = 0x80;
        self.regs[VERSION] = MOCK_VERSION;
        self.fifo.clear();
        self.transceive_armed = false;
    }

    fn check(&self, reg: u8) -> Result<()> {
        match self.fail_register {
            Some(r) if r == reg => Err(Error::Transport(format!(
                "mock bus failure on register {:#04x}",
                reg
            ))),
            _ => Ok(()),
        }
    }

    fn read(&mut self, reg: u8) -> Result<u8> {
        self.check(reg)?;
        let r = reg as usize;
        Ok(match r {
            FIFO_DATA => self.fifo.pop_front().unwrap_or(0),
            FIFO_LEVEL => self.fifo.len() as u8,
            COM_IRQ => {
                self.comirq_reads += 1;
                self.regs[r]
            }
            _ => self.regs[r],
        })
    }

    fn write(&mut self, reg: u8, value: u8) -> Result<()> {
        self.check(reg)?;
        self.writes.push((reg, value));
        let r = reg as usize;
        match r {
            COMMAND => self.command(value),
            COM_IRQ | DIV_IRQ => {
                // bit 7 selects set (1) or clear (0) for the masked bits
                if value & 0x80 != 0 {
                    self.regs[r] |= value & 0x7F;
                } else {
                    self.regs[r] &= !value;
                }
            }
            FIFO_DATA => {
                if self.fifo.len() < FIFO_CAPACITY {
                    self.fifo.push_back(value);
                } else {
                    self.regs[ERROR] |= 0x10;
                }
            }
            FIFO_LEVEL => {
                if value & 0x80 != 0 {
                    self.fifo.clear();
                    self.regs[ERROR] &= !0x10;
                }
            }
            BIT_FRAMING => {
                self.regs[r] = value;
                if value & 0x80 != 0 && self.transceive_armed {
                    self.transceive_armed = false;
                    self.exchange();
                }
            }
            VERSION => {}
            _ => self.regs[r] = value,
        }
        Ok(())
    }

    fn command(&mut self, value: u8) {
        let cmd = value & 0x0F;
        self.regs[COMMAND] = (self.regs[COMMAND] & 0xF0) | cmd;
        match cmd {
            CMD_IDLE => self.transceive_armed = false,
            CMD_SOFT_RESET => {
                self.soft_resets += 1;
                self.power_on();
            }
            CMD_CALC_CRC => {
                let data: Vec<u8> = self.fifo.drain(..).collect();
                let [lo, hi] = crc_a(&data).to_le_bytes();
                self.regs[CRC_RESULT_L] = lo;
                self.regs[CRC_RESULT_H] = hi;
                self.regs[DIV_IRQ] |= 0x04;
                self.regs[COMMAND] &= 0xF0;
            }
            CMD_TRANSCEIVE => {
                self.regs[ERROR] = 0;
                self.transceive_armed = true;
            }
            CMD_MF_AUTHENT => {
                self.regs[ERROR] = 0;
                let payload: Vec<u8> = self.fifo.drain(..).collect();
                self.auth_requests.push(payload);
                if self.auth_results.pop_front().unwrap_or(true) {
                    self.regs[STATUS2] |= 0x08;
                } else {
                    self.regs[STATUS2] &= !0x08;
                }
                self.regs[COM_IRQ] |= 0x10;
                self.regs[COMMAND] &= 0xF0;
            }
            _ => {}
        }
    }

    fn exchange(&mut self) {
        let sent: Vec<u8> = self.fifo.drain(..).collect();
        self.transceived.push(sent);
        match self.script.pop_front().unwrap_or(TagReply::Timeout) {
            TagReply::Data { bytes, last_bits } => {
                self.fifo.extend(bytes.into_iter().take(FIFO_CAPACITY));
                self.regs[CONTROL] = (self.regs[CONTROL] & !0x07) | (last_bits & 0x07);
                self.regs[COM_IRQ] |= 0x30;
            }
            TagReply::Timeout => self.regs[COM_IRQ] |= 0x01,
            TagReply::Collision => {
                self.regs[ERROR] |= 0x08;
                self.regs[COM_IRQ] |= 0x32;
            }
            TagReply::ErrorFlags(flags) => {
                self.regs[ERROR] |= flags;
                self.regs[COM_IRQ] |= 0x32;
            }
            TagReply::Silent => {}
        }
    }
}

/// Simulated MFRC522 behind a [`RegisterBus`]. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockRegisterBus {
    chip: Rc<RefCell<ChipState>>,
}

impl MockRegisterBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the tag's answer to the next transceive
    pub fn push_reply(&self, reply: TagReply) {
        self.chip.borrow_mut().script.push_back(reply);
    }

    /// Queue the outcome of the next MFAuthent (default: success)
    pub fn push_auth_result(&self, ok: bool) {
        self.chip.borrow_mut().auth_results.push_back(ok);
    }

    /// Fail every access to `reg` with a transport error
    pub fn fail_on_register(&self, reg: Option<u8>) {
        self.chip.borrow_mut().fail_register = reg;
    }

    /// Frames handed to the tag, one per transceive
    pub fn transceived(&self) -> Vec<Vec<u8>> {
        self.chip.borrow().transceived.clone()
    }

    pub fn last_transceived(&self) -> Option<Vec<u8>> {
        self.chip.borrow().transceived.last().cloned()
    }

    /// FIFO contents at each MFAuthent
    pub fn auth_requests(&self) -> Vec<Vec<u8>> {
        self.chip.borrow().auth_requests.clone()
    }

    /// Every register write in order
    pub fn writes(&self) -> Vec<(u8, u8)> {
        self.chip.borrow().writes.clone()
    }

    /// Current value of a register without side effects
    pub fn peek(&self, reg: u8) -> u8 {
        self.chip.borrow().regs[(reg & 0x3F) as usize]
    }

    /// Set a register directly, bypassing write semantics
    pub fn poke(&self, reg: u8, value: u8) {
        self.chip.borrow_mut().regs[(reg & 0x3F) as usize] = value;
    }

    pub fn comirq_reads(&self) -> usize {
        self.chip.borrow().comirq_reads
    }

    pub fn soft_resets(&self) -> usize {
        self.chip.borrow().soft_resets
    }

    pub fn clear_log(&self) {
        let mut c = self.chip.borrow_mut();
        c.writes.clear();
        c.transceived.clear();
        c.auth_requests.clear();
        c.comirq_reads = 0;
    }
}

fn register_of(addr: u8) -> u8 {
    (addr >> 1) & 0x3F
}

impl RegisterBus for MockRegisterBus {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let (&addr, values) = bytes.split_first().ok_or_else(|| Error::InvalidLength {
            expected: 2,
            actual: 0,
        })?;
        let reg = register_of(addr);
        let mut chip = self.chip.borrow_mut();
        for &v in values {
            chip.write(reg, v)?;
        }
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        if buf.is_empty() {
            return Ok(());
        }
        let reg = register_of(buf[0]);
        let mut chip = self.chip.borrow_mut();
        // byte 0 clocks the address in; every following byte clocks one
        // register value out
        buf[0] = 0;
        for b in buf[1..].iter_mut() {
            *b = chip.read(reg)?;
        }
        Ok(())
    }
}
