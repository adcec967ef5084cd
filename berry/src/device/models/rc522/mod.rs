// berry/src/device/models/rc522/mod.rs

//! MFRC522 backend driven through single register transactions.

pub mod config;
mod tags;

use log::trace;

use crate::protocol::parser;
use crate::transport::{Delay, RegisterBus};
use crate::{Error, Result};

use config::*;

pub use config::{Command, Register};

/// What `execute_command` got back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResponse {
    /// Command finished with nothing to read (everything but Transceive)
    Done,
    /// Bytes read out of the FIFO and the number of valid bits received
    Transceived { data: Vec<u8>, bits: u16 },
}

impl CommandResponse {
    pub fn data(&self) -> &[u8] {
        match self {
            CommandResponse::Done => &[],
            CommandResponse::Transceived { data, .. } => data,
        }
    }

    pub fn bits(&self) -> u16 {
        match self {
            CommandResponse::Done => 0,
            CommandResponse::Transceived { bits, .. } => *bits,
        }
    }

    /// Data, provided exactly `expected` bits were received.
    pub fn expect_bits(self, expected: u16) -> Result<Vec<u8>> {
        match self {
            CommandResponse::Transceived { data, bits } if bits == expected => Ok(data),
            other => Err(Error::UnexpectedBitLength {
                expected,
                actual: other.bits(),
            }),
        }
    }
}

/// MFRC522 controller on a [`RegisterBus`].
pub struct Rc522<B, D> {
    bus: B,
    delay: D,
}

impl<B: RegisterBus, D: Delay> Rc522<B, D> {
    pub fn new(bus: B, delay: D) -> Self {
        Self { bus, delay }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }

    pub fn into_parts(self) -> (B, D) {
        (self.bus, self.delay)
    }

    // lowest level API

    pub fn read_register(&mut self, reg: Register) -> Result<u8> {
        let mut buf = [reg.read_address(), 0];
        self.bus.read(&mut buf)?;
        trace!("rc522 {:?} -> {:#04x}", reg, buf[1]);
        Ok(buf[1])
    }

    pub fn write_register(&mut self, reg: Register, value: u8) -> Result<()> {
        trace!("rc522 {:?} <- {:#04x}", reg, value);
        self.bus.write(&[reg.write_address(), value])
    }

    fn rmw<F>(&mut self, reg: Register, f: F) -> Result<()>
    where
        F: FnOnce(u8) -> u8,
    {
        let value = self.read_register(reg)?;
        self.write_register(reg, f(value))
    }

    pub fn set_bitmask(&mut self, reg: Register, mask: u8) -> Result<()> {
        self.rmw(reg, |v| v | mask)
    }

    pub fn clear_bitmask(&mut self, reg: Register, mask: u8) -> Result<()> {
        self.rmw(reg, |v| v & !mask)
    }

    fn command(&mut self, command: Command) -> Result<()> {
        self.write_register(Register::Command, command as u8)
    }

    fn flush_fifo(&mut self) -> Result<()> {
        self.set_bitmask(Register::FifoLevel, FLUSH_BUFFER)
    }

    fn write_fifo(&mut self, data: &[u8]) -> Result<()> {
        data.iter()
            .try_for_each(|&b| self.write_register(Register::FifoData, b))
    }

    /// Soft reset, antenna cycle, then the timer / modulation setup.
    pub fn reset(&mut self) -> Result<()> {
        self.command(Command::SoftReset)?;
        self.delay.delay_ms(RESET_SETTLE_MS);
        self.clear_bitmask(Register::TxControl, ANTENNA_ON)?;
        self.delay.delay_ms(RESET_SETTLE_MS);
        self.set_bitmask(Register::TxControl, ANTENNA_ON)?;
        for (reg, value) in INIT_SEQUENCE {
            self.write_register(reg, value)?;
        }
        Ok(())
    }

    pub fn enable_antenna(&mut self) -> Result<()> {
        let value = self.read_register(Register::TxControl)?;
        if value & ANTENNA_ON != ANTENNA_ON {
            self.write_register(Register::TxControl, value | ANTENNA_ON)?;
        }
        Ok(())
    }

    pub fn disable_antenna(&mut self) -> Result<()> {
        self.clear_bitmask(Register::TxControl, ANTENNA_ON)
    }

    /// Silicon version (0x91 = v1.0, 0x92 = v2.0)
    pub fn version(&mut self) -> Result<u8> {
        self.read_register(Register::Version)
    }

    /// Run `command` with `data` in the FIFO and wait for it to finish.
    ///
    /// ComIrq is polled [`COMMAND_POLLS`] times, [`COMMAND_POLL_INTERVAL_US`]
    /// apart; running out of polls means no tag answered.
    pub fn execute_command(&mut self, command: Command, data: &[u8]) -> Result<CommandResponse> {
        let irq_en = command.irq_enable();
        let wait = command.completion_irq();

        self.write_register(Register::ComIEn, irq_en | IRQ_INV)?;
        // bit 7 clear: the masked request bits are cleared
        self.write_register(Register::ComIrq, COM_IRQ_ALL)?;
        self.flush_fifo()?;
        self.command(Command::Idle)?;
        self.write_fifo(data)?;
        self.command(command)?;
        if command == Command::Transceive {
            self.set_bitmask(Register::BitFraming, START_SEND)?;
        }

        let mut irq = None;
        for _ in 0..COMMAND_POLLS {
            let n = self.read_register(Register::ComIrq)?;
            if n & TIMER_IRQ != 0 || n & wait != 0 {
                irq = Some(n);
                break;
            }
            self.delay.delay_us(COMMAND_POLL_INTERVAL_US);
        }
        self.clear_bitmask(Register::BitFraming, START_SEND)?;

        let irq = irq.ok_or(Error::TagNotFound)?;

        let err = self.read_register(Register::Error)?;
        if err & COLL_ERR != 0 {
            return Err(Error::TagCollision);
        }
        if err & (BUFFER_OVFL | PROTOCOL_ERR | PARITY_ERR) != 0 {
            return Err(Error::ControllerError { flags: err });
        }
        if irq & irq_en & TIMER_IRQ != 0 {
            return Err(Error::TagNotFound);
        }
        if command != Command::Transceive {
            return Ok(CommandResponse::Done);
        }

        let level = self.read_register(Register::FifoLevel)?;
        let last_bits = self.read_register(Register::Control)? & RX_LAST_BITS;
        let bits = parser::received_bits(level, last_bits);
        let n = (level as usize).clamp(1, MAX_RESPONSE_LEN);
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            out.push(self.read_register(Register::FifoData)?);
        }
        trace!(
            "rc522 transceive {} -> {} ({} bits)",
            crate::utils::bytes_to_hex_spaced(data),
            crate::utils::bytes_to_hex_spaced(&out),
            bits
        );
        Ok(CommandResponse::Transceived { data: out, bits })
    }

    /// Transceive whole bytes.
    pub fn transceive(&mut self, data: &[u8]) -> Result<CommandResponse> {
        self.transceive_bits(data, 0)
    }

    /// Transceive where only `tx_last_bits` bits of the final byte are sent
    /// (0 = all eight).
    pub fn transceive_bits(&mut self, data: &[u8], tx_last_bits: u8) -> Result<CommandResponse> {
        self.write_register(Register::BitFraming, tx_last_bits & 0x07)?;
        self.execute_command(Command::Transceive, data)
    }

    /// CRC_A of `data` computed by the coprocessor.
    pub fn calculate_crc(&mut self, data: &[u8]) -> Result<u16> {
        self.write_register(Register::DivIrq, CRC_IRQ)?;
        self.command(Command::Idle)?;
        self.flush_fifo()?;
        self.write_fifo(data)?;
        self.command(Command::CalcCrc)?;

        let mut done = false;
        for _ in 0..CRC_POLLS {
            if self.read_register(Register::DivIrq)? & CRC_IRQ != 0 {
                done = true;
                break;
            }
        }
        if !done {
            return Err(Error::Timeout);
        }

        let lo = self.read_register(Register::CrcResultL)?;
        let hi = self.read_register(Register::CrcResultH)?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    /// `data` followed by its CRC_A, little-endian
    fn with_crc(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        let crc = self.calculate_crc(data)?;
        let mut v = Vec::with_capacity(data.len() + 2);
        v.extend_from_slice(data);
        v.extend_from_slice(&crc.to_le_bytes());
        Ok(v)
    }

    /// Check the trailing two bytes of `frame` against the coprocessor CRC.
    fn verify_crc(&mut self, frame: &[u8]) -> Result<()> {
        let split = frame.len().saturating_sub(2);
        let (body, tail) = frame.split_at(split);
        if tail.len() != 2 {
            return Err(Error::InvalidLength {
                expected: 2,
                actual: frame.len(),
            });
        }
        let expected = self.calculate_crc(body)?;
        let actual = u16::from_le_bytes([tail[0], tail[1]]);
        if expected != actual {
            return Err(Error::CrcMismatch { expected, actual });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::checksum::crc_a;
    use crate::transport::mock::{MockDelay, MockRegisterBus, TagReply, MOCK_VERSION};

    fn driver() -> (Rc522<MockRegisterBus, MockDelay>, MockRegisterBus, MockDelay) {
        let bus = MockRegisterBus::new();
        let delay = MockDelay::new();
        (Rc522::new(bus.clone(), delay.clone()), bus, delay)
    }

    #[test]
    fn reset_writes_init_sequence() {
        let (mut rc, bus, delay) = driver();
        rc.reset().unwrap();
        assert_eq!(bus.soft_resets(), 1);
        assert_eq!(delay.ms_calls(), vec![10, 10]);
        let writes = bus.writes();
        let tail: Vec<(u8, u8)> = writes[writes.len() - 10..].to_vec();
        let expected: Vec<(u8, u8)> = INIT_SEQUENCE
            .iter()
            .map(|&(r, v)| (r as u8, v))
            .collect();
        assert_eq!(tail, expected);
        assert_eq!(bus.peek(Register::TxControl as u8) & ANTENNA_ON, ANTENNA_ON);
    }

    #[test]
    fn antenna_toggle_is_idempotent() {
        let (mut rc, bus, _) = driver();
        rc.enable_antenna().unwrap();
        rc.enable_antenna().unwrap();
        assert_eq!(bus.peek(0x14), 0x83);
        rc.disable_antenna().unwrap();
        rc.disable_antenna().unwrap();
        assert_eq!(bus.peek(0x14), 0x80);
    }

    #[test]
    fn version_register() {
        let (mut rc, _, _) = driver();
        assert_eq!(rc.version().unwrap(), MOCK_VERSION);
    }

    #[test]
    fn transceive_reports_bit_length() {
        let (mut rc, bus, _) = driver();
        bus.push_reply(TagReply::Data {
            bytes: vec![0x0A],
            last_bits: 4,
        });
        let resp = rc.transceive(&[0xA0, 0x04, 0x00, 0x00]).unwrap();
        assert_eq!(resp.bits(), 4);
        assert_eq!(resp.data(), &[0x0A]);
    }

    #[test]
    fn transceive_caps_fifo_read() {
        let (mut rc, bus, _) = driver();
        bus.push_reply(TagReply::bytes(&[0x55; 24]));
        let resp = rc.transceive(&[0x30, 0x00]).unwrap();
        assert_eq!(resp.data().len(), MAX_RESPONSE_LEN);
        assert_eq!(resp.bits(), 24 * 8);
    }

    #[test]
    fn timeout_irq_is_tag_not_found() {
        let (mut rc, bus, _) = driver();
        bus.push_reply(TagReply::Timeout);
        assert!(matches!(rc.transceive(&[0x26]), Err(Error::TagNotFound)));
    }

    #[test]
    fn collision_and_controller_errors() {
        let (mut rc, bus, _) = driver();
        bus.push_reply(TagReply::Collision);
        assert!(matches!(rc.transceive(&[0x93, 0x20]), Err(Error::TagCollision)));
        bus.push_reply(TagReply::ErrorFlags(PARITY_ERR));
        assert!(matches!(
            rc.transceive(&[0x93, 0x20]),
            Err(Error::ControllerError { flags: 0x02 })
        ));
    }

    #[test]
    fn silent_tag_exhausts_poll_budget() {
        let (mut rc, bus, delay) = driver();
        bus.push_reply(TagReply::Silent);
        assert!(matches!(rc.transceive(&[0x26]), Err(Error::TagNotFound)));
        assert_eq!(bus.comirq_reads(), COMMAND_POLLS as usize);
        assert_eq!(delay.us_calls().len(), COMMAND_POLLS as usize);
    }

    #[test]
    fn start_send_cleared_after_poll() {
        let (mut rc, bus, _) = driver();
        bus.push_reply(TagReply::bytes(&[0x04, 0x00]));
        rc.transceive(&[0x26]).unwrap();
        assert_eq!(bus.peek(Register::BitFraming as u8) & START_SEND, 0);
    }

    #[test]
    fn non_transceive_returns_done() {
        let (mut rc, bus, _) = driver();
        let payload = [0x60, 4, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 1, 2, 3, 4];
        let resp = rc.execute_command(Command::MfAuthent, &payload).unwrap();
        assert_eq!(resp, CommandResponse::Done);
        assert_eq!(bus.auth_requests().len(), 1);
    }

    #[test]
    fn crc_matches_reference() {
        let (mut rc, _, _) = driver();
        assert_eq!(rc.calculate_crc(&[0x50, 0x00]).unwrap(), 0xCD57);
        assert_eq!(rc.calculate_crc(&[0x30, 0x00]).unwrap(), crc_a(&[0x30, 0x00]));
    }

    #[test]
    fn bus_failure_propagates() {
        let (mut rc, bus, _) = driver();
        bus.fail_on_register(Some(Register::ComIrq as u8));
        assert!(matches!(rc.transceive(&[0x26]), Err(Error::Transport(_))));
    }

    #[test]
    fn expect_bits_mismatch() {
        let resp = CommandResponse::Transceived {
            data: vec![0x08],
            bits: 8,
        };
        assert!(matches!(
            resp.expect_bits(24),
            Err(Error::UnexpectedBitLength {
                expected: 24,
                actual: 8,
            })
        ));
    }
}
