use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::ThreadModeRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::Instant;
use portable_atomic::{AtomicBool, Ordering};

pub static CLOCK_SET: AtomicBool = AtomicBool::new(false);

/// Wall clock extrapolated from the monotonic timer.
///
/// `set` records a reference datetime together with the instant it arrived;
/// `now` extrapolates from that anchor. Until the first `set` the clock has
/// no meaningful value and `now` returns `None`.
pub struct Clock {
    anchor: Mutex<ThreadModeRawMutex, RefCell<(time::PrimitiveDateTime, Instant)>>,
}

impl Clock {
    pub const fn new() -> Self {
        Self {
            anchor: Mutex::new(RefCell::new((
                time::PrimitiveDateTime::MIN,
                Instant::from_ticks(0),
            ))),
        }
    }

    pub fn set(&self, now: time::PrimitiveDateTime) {
        self.anchor.lock(|f| *f.borrow_mut() = (now, Instant::now()));
        CLOCK_SET.store(true, Ordering::SeqCst);
    }

    pub fn now(&self) -> Option<time::PrimitiveDateTime> {
        if !CLOCK_SET.load(Ordering::SeqCst) {
            return None;
        }
        let (base, at) = self.anchor.lock(|f| *f.borrow());
        let elapsed = Instant::now().duration_since(at);
        Some(base + time::Duration::microseconds(elapsed.as_micros() as i64))
    }
}
