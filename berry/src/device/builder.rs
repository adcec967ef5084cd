// berry/src/device/builder.rs

use crate::device::handle::{Device, Initialized, Uninitialized};
use crate::device::models::{Pn532, Pn532Config, Rc522, TagReader};
use crate::transport::{Delay, RegisterBus, SerialLink};
use crate::{Error, Result};

type ReaderFactory = Box<dyn FnOnce(Pn532Config) -> Box<dyn TagReader>>;

/// Helper to construct a Device for exactly one controller.
pub struct DeviceBuilder {
    factory: Option<ReaderFactory>,
    pn532_config: Pn532Config,
}

impl Default for DeviceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceBuilder {
    pub fn new() -> Self {
        Self {
            factory: None,
            pn532_config: Pn532Config::default(),
        }
    }

    /// Use a PN532 on a bit-banged serial link.
    pub fn with_pn532<L, D>(mut self, link: L, delay: D) -> Self
    where
        L: SerialLink + 'static,
        D: Delay + 'static,
    {
        self.factory = Some(Box::new(
            move |config: Pn532Config| -> Box<dyn TagReader> {
                Box::new(Pn532::with_config(link, delay, config))
            },
        ));
        self
    }

    /// Use an MFRC522 on a register bus.
    pub fn with_rc522<B, D>(mut self, bus: B, delay: D) -> Self
    where
        B: RegisterBus + 'static,
        D: Delay + 'static,
    {
        self.factory = Some(Box::new(move |_: Pn532Config| -> Box<dyn TagReader> {
            Box::new(Rc522::new(bus, delay))
        }));
        self
    }

    /// Provide an already-constructed backend.
    pub fn with_reader(mut self, reader: Box<dyn TagReader>) -> Self {
        self.factory = Some(Box::new(move |_: Pn532Config| reader));
        self
    }

    /// Settings for the PN532 backend; ignored by the others.
    pub fn pn532_config(mut self, config: Pn532Config) -> Self {
        self.pn532_config = config;
        self
    }

    /// Consume the builder and return an uninitialized Device.
    /// Requires a controller to be chosen; otherwise returns DeviceNotFound.
    pub fn build_uninitialized(self) -> Result<Device<Uninitialized>> {
        match self.factory {
            Some(make) => Ok(Device::new_with_reader(make(self.pn532_config))),
            None => Err(Error::DeviceNotFound),
        }
    }

    /// Build and initialize in one step.
    pub fn build(self) -> Result<Device<Initialized>> {
        self.build_uninitialized()?.initialize()
    }
}
