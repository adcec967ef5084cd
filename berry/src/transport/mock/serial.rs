// berry/src/transport/mock/serial.rs

//! Pin-level PN532 simulator.
//!
//! Decodes the bit-banged traffic the driver produces (LSB first, data
//! latched on the rising clock edge) back into bytes, answers the status
//! and data-read markers, and replies to each written command frame with
//! an acknowledgement followed by the next scripted reply.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::constants::ACK_FRAME;
use crate::protocol::{Direction, Frame};
use crate::transport::traits::{Level, SerialLink};
use crate::{Error, Result};

const MARKER_DATA_WRITE: u8 = 0x01;
const MARKER_STATUS_READ: u8 = 0x02;
const MARKER_DATA_READ: u8 = 0x03;

/// What the simulated controller does after acknowledging a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// ACK, then a D5 frame carrying this payload (response code first)
    Frame(Vec<u8>),
    /// ACK, then these exact bytes
    Raw(Vec<u8>),
    /// ACK and nothing else
    AckOnly,
    /// A malformed acknowledgement
    Nack,
    /// Never becomes ready
    Silent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Marker,
    Write,
    Status,
    Read,
}

#[derive(Debug)]
struct SimState {
    selected: bool,
    clock: Level,
    mosi: Level,
    mode: Mode,
    in_byte: u8,
    in_bits: u8,
    out_index: usize,
    out_bit: u8,
    status_byte: u8,
    written: Vec<u8>,
    outbox: VecDeque<Vec<u8>>,
    script: VecDeque<Reply>,
    commands: Vec<Vec<u8>>,
    frames: Vec<Vec<u8>>,
    status_reads: usize,
    data_reads: usize,
    failing: bool,
}

impl Default for SimState {
    fn default() -> Self {
        Self {
            selected: false,
            clock: Level::High,
            mosi: Level::Low,
            mode: Mode::Marker,
            in_byte: 0,
            in_bits: 0,
            out_index: 0,
            out_bit: 0,
            status_byte: 0,
            written: Vec::new(),
            outbox: VecDeque::new(),
            script: VecDeque::new(),
            commands: Vec::new(),
            frames: Vec::new(),
            status_reads: 0,
            data_reads: 0,
            failing: false,
        }
    }
}

impl SimState {
    fn check(&self) -> Result<()> {
        if self.failing {
            Err(Error::Transport("mock serial link failure".into()))
        } else {
            Ok(())
        }
    }

    fn begin(&mut self) {
        self.mode = Mode::Marker;
        self.in_byte = 0;
        self.in_bits = 0;
        self.out_index = 0;
        self.out_bit = 0;
        self.written.clear();
    }

    fn end(&mut self) {
        match self.mode {
            Mode::Write => self.complete_write(),
            Mode::Read if self.out_index > 0 || self.out_bit > 0 => {
                self.outbox.pop_front();
            }
            _ => {}
        }
        self.mode = Mode::Marker;
    }

    fn rising_edge(&mut self) {
        match self.mode {
            Mode::Marker | Mode::Write => {
                if self.mosi.is_high() {
                    self.in_byte |= 1 << self.in_bits;
                }
                self.in_bits += 1;
                if self.in_bits == 8 {
                    let b = self.in_byte;
                    self.in_byte = 0;
                    self.in_bits = 0;
                    self.take_byte(b);
                }
            }
            Mode::Status | Mode::Read => {
                self.out_bit += 1;
                if self.out_bit == 8 {
                    self.out_bit = 0;
                    self.out_index += 1;
                }
            }
        }
    }

    fn take_byte(&mut self, b: u8) {
        if self.mode == Mode::Write {
            self.written.push(b);
            return;
        }
        self.mode = match b {
            MARKER_DATA_WRITE => Mode::Write,
            MARKER_STATUS_READ => {
                self.status_reads += 1;
                self.status_byte = if self.outbox.is_empty() { 0x00 } else { 0x01 };
                Mode::Status
            }
            MARKER_DATA_READ => {
                self.data_reads += 1;
                Mode::Read
            }
            // unknown marker: treat the rest of the transaction as data
            _ => Mode::Write,
        };
    }

    fn current_out(&self) -> u8 {
        match self.mode {
            Mode::Status => self.status_byte,
            Mode::Read => self
                .outbox
                .front()
                .and_then(|m| m.get(self.out_index).copied())
                .unwrap_or(0),
            _ => 0,
        }
    }

    fn complete_write(&mut self) {
        let raw = std::mem::take(&mut self.written);
        let decoded = Frame::decode_prefix(&raw);
        self.frames.push(raw);
        let frame = match decoded {
            Ok((f, _)) if f.direction == Direction::HostToController => f,
            _ => return,
        };
        self.commands.push(frame.payload);

        match self.script.pop_front().unwrap_or(Reply::AckOnly) {
            Reply::Frame(payload) => {
                self.outbox.push_back(ACK_FRAME.to_vec());
                // payloads are test-controlled and well below the frame limit
                if let Ok(bytes) = Frame::encode(Direction::ControllerToHost, &payload) {
                    self.outbox.push_back(bytes);
                }
            }
            Reply::Raw(bytes) => {
                self.outbox.push_back(ACK_FRAME.to_vec());
                self.outbox.push_back(bytes);
            }
            Reply::AckOnly => self.outbox.push_back(ACK_FRAME.to_vec()),
            Reply::Nack => self
                .outbox
                .push_back(vec![0x00, 0x00, 0xFF, 0xFF, 0x00, 0x00]),
            Reply::Silent => {}
        }
    }
}

/// Simulated PN532 behind a [`SerialLink`]. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockSerialLink {
    state: Rc<RefCell<SimState>>,
}

impl MockSerialLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the reply to the next command frame
    pub fn push_reply(&self, reply: Reply) {
        self.state.borrow_mut().script.push_back(reply);
    }

    /// Shorthand for `push_reply(Reply::Frame(payload))`
    pub fn push_frame(&self, payload: &[u8]) {
        self.push_reply(Reply::Frame(payload.to_vec()));
    }

    /// Make every pin operation fail with a transport error
    pub fn set_failing(&self, failing: bool) {
        self.state.borrow_mut().failing = failing;
    }

    /// Payloads (command code first) of every well-formed command frame
    pub fn commands(&self) -> Vec<Vec<u8>> {
        self.state.borrow().commands.clone()
    }

    pub fn last_command(&self) -> Option<Vec<u8>> {
        self.state.borrow().commands.last().cloned()
    }

    /// Raw bytes that followed each data-write marker
    pub fn written_frames(&self) -> Vec<Vec<u8>> {
        self.state.borrow().frames.clone()
    }

    /// Number of status-read transactions seen
    pub fn status_reads(&self) -> usize {
        self.state.borrow().status_reads
    }

    /// Number of data-read transactions seen
    pub fn data_reads(&self) -> usize {
        self.state.borrow().data_reads
    }

    /// Messages waiting to be read
    pub fn pending(&self) -> usize {
        self.state.borrow().outbox.len()
    }

    pub fn reset_counters(&self) {
        let mut s = self.state.borrow_mut();
        s.status_reads = 0;
        s.data_reads = 0;
    }
}

impl SerialLink for MockSerialLink {
    fn set_select(&mut self, level: Level) -> Result<()> {
        let mut s = self.state.borrow_mut();
        s.check()?;
        match (s.selected, level) {
            (false, Level::Low) => {
                s.selected = true;
                s.begin();
            }
            (true, Level::High) => {
                s.selected = false;
                s.end();
            }
            _ => {}
        }
        Ok(())
    }

    fn set_clock(&mut self, level: Level) -> Result<()> {
        let mut s = self.state.borrow_mut();
        s.check()?;
        let rising = s.clock == Level::Low && level == Level::High;
        s.clock = level;
        if rising && s.selected {
            s.rising_edge();
        }
        Ok(())
    }

    fn set_mosi(&mut self, level: Level) -> Result<()> {
        let mut s = self.state.borrow_mut();
        s.check()?;
        s.mosi = level;
        Ok(())
    }

    fn read_miso(&mut self) -> Result<Level> {
        let s = self.state.borrow();
        s.check()?;
        if !s.selected {
            return Ok(Level::Low);
        }
        let bit = (s.current_out() >> s.out_bit) & 0x01;
        Ok(Level::from_bit(bit == 1))
    }
}
