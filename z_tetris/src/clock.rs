/// Play time of one game, excluding pauses
#[derive(Debug, Clone)]
pub struct PlayClock {
    started_ms: u64,
    paused_total_ms: u64,
    paused_since: Option<u64>,
    stopped_at: Option<u64>,
}

impl PlayClock {
    pub fn start(now_ms: u64) -> Self {
        Self {
            started_ms: now_ms,
            paused_total_ms: 0,
            paused_since: None,
            stopped_at: None,
        }
    }

    pub fn pause(&mut self, now_ms: u64) {
        if self.paused_since.is_none() && self.stopped_at.is_none() {
            self.paused_since = Some(now_ms);
        }
    }

    pub fn resume(&mut self, now_ms: u64) {
        if let Some(since) = self.paused_since.take() {
            self.paused_total_ms += now_ms.saturating_sub(since);
        }
    }

    /// Freeze the clock; later reads return the time at `now_ms`
    pub fn stop(&mut self, now_ms: u64) {
        if self.stopped_at.is_none() {
            self.stopped_at = Some(self.elapsed_ms(now_ms));
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_since.is_some()
    }

    /// Wall time since start minus paused time; an open pause counts as paused
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        if let Some(stopped) = self.stopped_at {
            return stopped;
        }
        let end = self.paused_since.unwrap_or(now_ms);
        end.saturating_sub(self.started_ms)
            .saturating_sub(self.paused_total_ms)
    }
}
