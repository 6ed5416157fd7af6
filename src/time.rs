//! Real-time clock for the production loop.
//!
//! The host's frame callback fires at a variable rate. `FrameClock` turns
//! monotonic timestamps into elapsed seconds so production follows wall time
//! instead of counting frames.

use std::cell::Cell;
use std::rc::Rc;

/// Time source the session reads from.
pub trait Clock {
    /// Monotonic milliseconds (e.g. `performance.now()`).
    fn monotonic_ms(&self) -> f64;
    /// Milliseconds since the Unix epoch, for save timestamps.
    fn unix_ms(&self) -> f64;
}

pub struct FrameClock {
    /// Timestamp of the last update (ms), None until the first frame
    last_timestamp: Option<f64>,
    /// Total seconds handed out since creation
    pub total_secs: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_timestamp: None,
            total_secs: 0.0,
        }
    }

    /// Feed a monotonic timestamp. Returns seconds since the previous call.
    ///
    /// The first frame after creation or `reset` returns 0. A timestamp
    /// earlier than the previous one also returns 0.
    pub fn update(&mut self, now_ms: f64) -> f64 {
        let delta_ms = match self.last_timestamp {
            Some(prev) => (now_ms - prev).max(0.0),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);
        let secs = delta_ms / 1000.0;
        self.total_secs += secs;
        secs
    }

    /// Forget the last timestamp (the loop was stopped).
    pub fn reset(&mut self) {
        self.last_timestamp = None;
    }

    pub fn is_running(&self) -> bool {
        self.last_timestamp.is_some()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// `std::time` based clock for native hosts.
#[cfg(not(target_arch = "wasm32"))]
pub struct SystemClock {
    start: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn monotonic_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    fn unix_ms(&self) -> f64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0.0, |d| d.as_secs_f64() * 1000.0)
    }
}

/// Hand-driven clock. Clones share the same time, so a test (or a host with
/// its own timer) can keep one handle and give another to the session.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    monotonic: Rc<Cell<f64>>,
    unix: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(unix_ms: f64) -> Self {
        Self {
            monotonic: Rc::new(Cell::new(0.0)),
            unix: Rc::new(Cell::new(unix_ms)),
        }
    }

    /// Move both clocks forward.
    pub fn advance_ms(&self, ms: f64) {
        self.monotonic.set(self.monotonic.get() + ms);
        self.unix.set(self.unix.get() + ms);
    }

    pub fn advance_secs(&self, secs: f64) {
        self.advance_ms(secs * 1000.0);
    }

    /// Move only wall time, as if the game were closed meanwhile.
    pub fn skip_wall_ms(&self, ms: f64) {
        self.unix.set(self.unix.get() + ms);
    }
}

impl Clock for ManualClock {
    fn monotonic_ms(&self) -> f64 {
        self.monotonic.get()
    }

    fn unix_ms(&self) -> f64 {
        self.unix.get()
    }
}
