use embassy_nrf::gpio::{AnyPin, Level, Output, OutputDrive};
use embassy_nrf::Peri;
use embassy_time::Timer;
use motlog_core::{LedState, Leds};

/// Common-cathode RGB indicator on three GPIOs, driven high to light.
pub struct RgbLed {
    red: Output<'static>,
    green: Output<'static>,
    blue: Output<'static>,
}

impl RgbLed {
    pub fn new(
        red: Peri<'static, AnyPin>,
        green: Peri<'static, AnyPin>,
        blue: Peri<'static, AnyPin>,
    ) -> Self {
        Self {
            red: Output::new(red, Level::Low, OutputDrive::Standard),
            green: Output::new(green, Level::Low, OutputDrive::Standard),
            blue: Output::new(blue, Level::Low, OutputDrive::Standard),
        }
    }

    fn set_rgb(&mut self, red: bool, green: bool, blue: bool) {
        self.red.set_level(if red { Level::High } else { Level::Low });
        self.green.set_level(if green { Level::High } else { Level::Low });
        self.blue.set_level(if blue { Level::High } else { Level::Low });
    }
}

impl Leds for RgbLed {
    async fn set(&mut self, state: LedState) {
        match state {
            LedState::Init => self.set_rgb(true, true, false),
            LedState::Ready => self.set_rgb(false, true, false),
            LedState::Recording => self.set_rgb(true, false, false),
            LedState::VolumeActivity => {
                self.set_rgb(false, false, true);
                Timer::after_millis(200).await;
                self.set_rgb(false, false, false);
                Timer::after_millis(200).await;
            }
            LedState::Error => {
                for _ in 0..3 {
                    self.set_rgb(true, false, true);
                    Timer::after_millis(200).await;
                    self.set_rgb(false, false, false);
                    Timer::after_millis(200).await;
                }
            }
        }
    }
}
