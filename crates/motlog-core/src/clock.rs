/// Calendar time handed to [`WallClock::set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockSetting {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// Settable wall-clock time source, used to timestamp files on the volume.
pub trait WallClock {
    type Error: core::fmt::Debug;

    /// Sets the clock. Fails when the setting is not a valid calendar time.
    fn set(&mut self, setting: ClockSetting) -> Result<(), Self::Error>;
}
