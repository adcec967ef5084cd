// berry/src/transport/mock/delay.rs

use std::cell::RefCell;
use std::rc::Rc;

use crate::transport::traits::Delay;

#[derive(Debug, Default)]
struct DelayLog {
    ms: Vec<u32>,
    us: Vec<u32>,
}

/// Delay that returns immediately and records every requested sleep.
///
/// Clones share the same log, so a test can keep one handle while the
/// driver owns another.
#[derive(Debug, Default, Clone)]
pub struct MockDelay {
    log: Rc<RefCell<DelayLog>>,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Millisecond sleeps in call order
    pub fn ms_calls(&self) -> Vec<u32> {
        self.log.borrow().ms.clone()
    }

    /// Microsecond sleeps in call order
    pub fn us_calls(&self) -> Vec<u32> {
        self.log.borrow().us.clone()
    }

    /// Total simulated time in microseconds
    pub fn total_us(&self) -> u64 {
        let log = self.log.borrow();
        log.ms.iter().map(|&m| m as u64 * 1000).sum::<u64>()
            + log.us.iter().map(|&u| u as u64).sum::<u64>()
    }

    pub fn clear(&self) {
        let mut log = self.log.borrow_mut();
        log.ms.clear();
        log.us.clear();
    }
}

impl Delay for MockDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.log.borrow_mut().ms.push(ms);
    }

    fn delay_us(&mut self, us: u32) {
        self.log.borrow_mut().us.push(us);
    }
}
