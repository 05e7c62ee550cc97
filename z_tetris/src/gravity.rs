/// Accumulates frame time and tells when the piece should fall one row
///
/// Feed it the frame driver's timestamps with `advance`. The first call
/// after creation or `rearm` only records the timestamp, so time spent
/// paused never turns into a burst of drops.
#[derive(Debug, Clone, Default)]
pub struct DropTimer {
    counter_ms: u64,
    last_ms: Option<u64>,
}

impl DropTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the time elapsed since the previous call; returns true and
    /// resets the counter once it exceeds `interval_ms`
    pub fn advance(&mut self, now_ms: u64, interval_ms: u64) -> bool {
        let delta = match self.last_ms {
            Some(last) => now_ms.saturating_sub(last),
            None => 0,
        };
        self.last_ms = Some(now_ms);
        self.counter_ms += delta;
        if self.counter_ms > interval_ms {
            self.counter_ms = 0;
            true
        } else {
            false
        }
    }

    /// Forget the previous timestamp; the next `advance` has a zero delta
    pub fn rearm(&mut self) {
        self.last_ms = None;
    }

    /// Drop the accumulated time as well
    pub fn reset(&mut self) {
        self.counter_ms = 0;
        self.last_ms = None;
    }

    pub fn counter_ms(&self) -> u64 {
        self.counter_ms
    }
}
