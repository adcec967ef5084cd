// berry/src/device/models/rc522/config.rs

//! MFRC522 registers, commands and tuning values

/// Register addresses (datasheet section 9)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Register {
    Command = 0x01,
    ComIEn = 0x02,
    DivIEn = 0x03,
    ComIrq = 0x04,
    DivIrq = 0x05,
    Error = 0x06,
    Status1 = 0x07,
    Status2 = 0x08,
    FifoData = 0x09,
    FifoLevel = 0x0A,
    WaterLevel = 0x0B,
    Control = 0x0C,
    BitFraming = 0x0D,
    Coll = 0x0E,
    Mode = 0x11,
    TxMode = 0x12,
    RxMode = 0x13,
    TxControl = 0x14,
    TxAsk = 0x15,
    TxSel = 0x16,
    RxSel = 0x17,
    RxThreshold = 0x18,
    Demod = 0x19,
    Mifare = 0x1C,
    SerialSpeed = 0x1F,
    CrcResultH = 0x21,
    CrcResultL = 0x22,
    ModWidth = 0x24,
    RfCfg = 0x26,
    GsN = 0x27,
    CwGsCfg = 0x28,
    ModGsCfg = 0x29,
    TMode = 0x2A,
    TPrescaler = 0x2B,
    TReloadH = 0x2C,
    TReloadL = 0x2D,
    Version = 0x37,
}

const READ: u8 = 1 << 7;

impl Register {
    pub fn read_address(&self) -> u8 {
        ((*self as u8) << 1) & 0x7E | READ
    }

    pub fn write_address(&self) -> u8 {
        ((*self as u8) << 1) & 0x7E
    }
}

/// Commands written to the Command register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    Idle = 0x00,
    CalcCrc = 0x03,
    Transmit = 0x04,
    Receive = 0x08,
    Transceive = 0x0C,
    MfAuthent = 0x0E,
    SoftReset = 0x0F,
}

impl Command {
    /// ComIEn bits enabled while the command runs
    pub fn irq_enable(&self) -> u8 {
        match self {
            Command::MfAuthent => 0x12,
            Command::Transceive => 0x77,
            _ => 0x00,
        }
    }

    /// ComIrq bits that mean the command finished
    pub fn completion_irq(&self) -> u8 {
        match self {
            Command::MfAuthent => IDLE_IRQ,
            Command::Transceive => RX_IRQ | IDLE_IRQ,
            _ => 0x00,
        }
    }
}

// ComIrq bits
pub const TIMER_IRQ: u8 = 1 << 0;
pub const ERR_IRQ: u8 = 1 << 1;
pub const IDLE_IRQ: u8 = 1 << 4;
pub const RX_IRQ: u8 = 1 << 5;
/// Writing ComIrq/DivIrq with this bit set sets the masked bits; clear clears them
pub const IRQ_SET: u8 = 1 << 7;
/// ComIEn: IRQ pin inverted
pub const IRQ_INV: u8 = 1 << 7;
/// All ComIrq request bits
pub const COM_IRQ_ALL: u8 = 0x7F;

// DivIrq bits
pub const CRC_IRQ: u8 = 1 << 2;

// Error register bits
pub const PROTOCOL_ERR: u8 = 1 << 0;
pub const PARITY_ERR: u8 = 1 << 1;
pub const COLL_ERR: u8 = 1 << 3;
pub const BUFFER_OVFL: u8 = 1 << 4;

/// FIFOLevel: flush the FIFO
pub const FLUSH_BUFFER: u8 = 1 << 7;
/// BitFraming: start transmission of transceive data
pub const START_SEND: u8 = 1 << 7;
/// Control: valid bits in the last received byte
pub const RX_LAST_BITS: u8 = 0x07;
/// Status2: Crypto1 unit active (authenticated)
pub const MF_CRYPTO1_ON: u8 = 1 << 3;
/// TxControl: Tx1RFEn | Tx2RFEn
pub const ANTENNA_ON: u8 = 0x03;

/// ComIrq polls per command
pub const COMMAND_POLLS: u32 = 150;
/// Pause between ComIrq polls (µs)
pub const COMMAND_POLL_INTERVAL_US: u32 = 200;
/// DivIrq polls per CRC calculation (no pause)
pub const CRC_POLLS: u32 = 254;
/// Settle time after soft reset and between antenna toggles (ms)
pub const RESET_SETTLE_MS: u32 = 10;

/// Largest response read out of the FIFO (16 data + 2 CRC)
pub const MAX_RESPONSE_LEN: usize = 18;

/// Register values written after a soft reset, in order
pub const INIT_SEQUENCE: [(Register, u8); 10] = [
    // TAuto, prescaler 0xD3E: ~6.78 kHz timer
    (Register::TMode, 0x8D),
    (Register::TPrescaler, 0x3E),
    // reload 30 -> ~4.4 ms timeout
    (Register::TReloadL, 0x1E),
    (Register::TReloadH, 0x00),
    // force 100 % ASK
    (Register::TxAsk, 0x40),
    // CRC preset 0x6363
    (Register::Mode, 0x3D),
    (Register::RxThreshold, 0x84),
    (Register::RfCfg, 0x68),
    (Register::GsN, 0xFF),
    (Register::CwGsCfg, 0x2F),
];
