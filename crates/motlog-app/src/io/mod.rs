//! Peripheral-backed implementations of the collaborator traits the
//! coordinator runs against.

use motlog_core::{ClockSetting, Platform, WallClock};
use time::{Date, Month, PrimitiveDateTime, Time};

pub mod buzzer;
pub mod console;
pub mod display;
pub mod leds;
pub mod sensor;
pub mod storage;

// Re-exports
pub use buzzer::*;
pub use console::*;
pub use display::*;
pub use leds::*;
pub use sensor::*;
pub use storage::*;

/// Marker tying the collaborator traits to the nRF52840 peripherals.
pub enum NrfPlatform {}

impl Platform for NrfPlatform {
    type Volume = SdVolume;
    type Sensor = ImuSensor;
    type Screen = OledScreen;
    type Console = SerialConsole;
    type Leds = RgbLed;
    type Buzzer = PinBuzzer;
    type Clock = SystemClock;
    type Delay = embassy_time::Delay;
}

/// Feeds `setrtc` values into the global [`crate::CLOCK`].
pub struct SystemClock;

impl WallClock for SystemClock {
    type Error = time::error::ComponentRange;

    fn set(&mut self, setting: ClockSetting) -> Result<(), Self::Error> {
        let month = Month::try_from(setting.month)?;
        let date = Date::from_calendar_date(i32::from(setting.year), month, setting.day)?;
        let time_of_day = Time::from_hms(setting.hour, setting.minute, setting.second)?;
        crate::CLOCK.set(PrimitiveDateTime::new(date, time_of_day));
        Ok(())
    }
}
