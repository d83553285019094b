use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time source for timed transitions.
pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock. Clones share the same time, so a test can keep one
/// handle while the game owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// One-shot level advance scheduled when a level is cleared.
///
/// `generation` is the game session it was scheduled in; a restart starts a
/// new session, so an advance from an older one must be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeferredAdvance {
    pub due: Duration,
    pub generation: u64,
}

impl DeferredAdvance {
    pub fn new(now: Duration, delay: Duration, generation: u64) -> Self {
        Self {
            due: now + delay,
            generation,
        }
    }

    pub fn is_due(&self, now: Duration) -> bool {
        now >= self.due
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }
}
