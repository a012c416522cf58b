use portable_atomic::{AtomicBool, Ordering};

/// Shared run state for the appliance.
///
/// One instance lives for the whole life of the firmware and is shared
/// between the input tasks (buttons, console RX) and the coordinator loop.
/// Every field is an independent atomic so writers never block each other.
pub struct SystemState {
    /// A volume is currently mounted.
    volume_mounted: AtomicBool,
    /// The operator has asked for recording to be on.
    logging_requested: AtomicBool,
    /// A capture session is writing records right now.
    session_active: AtomicBool,
    /// A mount/unmount toggle is pending from the volume button.
    volume_toggle: AtomicBool,
}

impl SystemState {
    pub const fn new() -> Self {
        Self {
            volume_mounted: AtomicBool::new(false),
            logging_requested: AtomicBool::new(false),
            session_active: AtomicBool::new(false),
            volume_toggle: AtomicBool::new(false),
        }
    }

    pub fn volume_mounted(&self) -> bool {
        self.volume_mounted.load(Ordering::SeqCst)
    }

    pub fn set_volume_mounted(&self, mounted: bool) {
        self.volume_mounted.store(mounted, Ordering::SeqCst);
    }

    pub fn logging_requested(&self) -> bool {
        self.logging_requested.load(Ordering::SeqCst)
    }

    /// Flips the recording request and returns the new value.
    pub fn toggle_logging_requested(&self) -> bool {
        !self.logging_requested.fetch_xor(true, Ordering::SeqCst)
    }

    pub fn session_active(&self) -> bool {
        self.session_active.load(Ordering::SeqCst)
    }

    pub fn set_session_active(&self, active: bool) {
        self.session_active.store(active, Ordering::SeqCst);
    }

    /// Marks a mount/unmount toggle as pending.
    pub fn request_volume_toggle(&self) {
        self.volume_toggle.store(true, Ordering::SeqCst);
    }

    /// Consumes a pending mount/unmount toggle, if any.
    pub fn take_volume_toggle(&self) -> bool {
        self.volume_toggle.swap(false, Ordering::SeqCst)
    }
}

impl Default for SystemState {
    fn default() -> Self {
        Self::new()
    }
}
