use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use atomic_float::AtomicF64;

/// Wall time in seconds from an arbitrary epoch.
pub trait TimeSource: Send {
    fn now(&self) -> f64;
}

pub struct SystemTimeSource {
    start: Instant,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Settable time source. Clones share the same underlying value, so a test
/// can keep one handle and hand another to a driver thread.
#[derive(Clone, Default)]
pub struct ManualTimeSource {
    current: Arc<AtomicF64>,
}

impl ManualTimeSource {
    pub fn new(start: f64) -> Self {
        Self {
            current: Arc::new(AtomicF64::new(start)),
        }
    }

    pub fn set(&self, secs: f64) {
        self.current.store(secs, Ordering::Release);
    }

    pub fn advance(&self, delta: f64) {
        self.current.fetch_add(delta, Ordering::AcqRel);
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> f64 {
        self.current.load(Ordering::Acquire)
    }
}
