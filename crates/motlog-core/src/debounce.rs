/// Width of the per-button debounce window, in microseconds.
pub const DEBOUNCE_WINDOW_US: u64 = 1_000_000;

/// Per-button press filter.
///
/// Each button owns its own gate, so a press on one button never widens or
/// narrows the window of another. The very first press is always accepted;
/// after that a press only passes once at least the full window has elapsed
/// since the last accepted press.
pub struct DebounceGate {
    window_us: u64,
    last_accepted_us: Option<u64>,
}

impl DebounceGate {
    pub const fn new(window_us: u64) -> Self {
        Self {
            window_us,
            last_accepted_us: None,
        }
    }

    /// Offers a press observed at `now_us` (a monotonic timestamp in
    /// microseconds) to the gate. Returns `true` if the press should be
    /// acted on, `false` if it falls inside the debounce window.
    pub fn accept(&mut self, now_us: u64) -> bool {
        match self.last_accepted_us {
            Some(last) if now_us.saturating_sub(last) < self.window_us => false,
            _ => {
                self.last_accepted_us = Some(now_us);
                true
            }
        }
    }
}

impl Default for DebounceGate {
    fn default() -> Self {
        Self::new(DEBOUNCE_WINDOW_US)
    }
}
