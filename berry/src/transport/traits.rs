// berry/src/transport/traits.rs

use crate::Result;

/// Logic level of a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl Level {
    pub fn from_bit(bit: bool) -> Self {
        if bit { Level::High } else { Level::Low }
    }

    pub fn is_high(&self) -> bool {
        matches!(self, Level::High)
    }
}

/// Pin-level serial link used by the PN532 backend.
///
/// The controller is driven by toggling four lines by hand: a chip select,
/// a clock, data towards the controller and data from the controller.
/// Implementations only move the lines; all timing lives in the driver.
pub trait SerialLink {
    /// Drive the (active low) chip select line
    fn set_select(&mut self, level: Level) -> Result<()>;

    /// Drive the clock line
    fn set_clock(&mut self, level: Level) -> Result<()>;

    /// Drive the host -> controller data line
    fn set_mosi(&mut self, level: Level) -> Result<()>;

    /// Sample the controller -> host data line
    fn read_miso(&mut self) -> Result<Level>;
}

/// Byte bus used by the MFRC522 backend. Each call is one transaction
/// with chip select asserted for its whole length.
pub trait RegisterBus {
    /// Shift out `bytes`, discarding whatever comes back
    fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Full-duplex transfer: shift out `buf` and replace it in place with
    /// the bytes shifted in.
    fn read(&mut self, buf: &mut [u8]) -> Result<()>;
}

/// Blocking sleeps
pub trait Delay {
    fn delay_ms(&mut self, ms: u32);
    fn delay_us(&mut self, us: u32);
}

/// [`Delay`] backed by `std::thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl Delay for StdDelay {
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(crate::utils::ms(ms as u64));
    }

    fn delay_us(&mut self, us: u32) {
        std::thread::sleep(std::time::Duration::from_micros(us as u64));
    }
}

impl<T: SerialLink + ?Sized> SerialLink for Box<T> {
    fn set_select(&mut self, level: Level) -> Result<()> {
        (**self).set_select(level)
    }
    fn set_clock(&mut self, level: Level) -> Result<()> {
        (**self).set_clock(level)
    }
    fn set_mosi(&mut self, level: Level) -> Result<()> {
        (**self).set_mosi(level)
    }
    fn read_miso(&mut self) -> Result<Level> {
        (**self).read_miso()
    }
}

impl<T: RegisterBus + ?Sized> RegisterBus for Box<T> {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write(bytes)
    }
    fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        (**self).read(buf)
    }
}

impl<T: Delay + ?Sized> Delay for Box<T> {
    fn delay_ms(&mut self, ms: u32) {
        (**self).delay_ms(ms)
    }
    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us)
    }
}
