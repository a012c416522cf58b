use embassy_nrf::gpio::{AnyPin, Level, Output, OutputDrive};
use embassy_nrf::Peri;
use embassy_time::Timer;
use motlog_core::Buzzer;

/// Passive piezo buzzer bit-banged from a GPIO.
///
/// Timing rides on the 32.768 kHz tick, so pitch above ~2 kHz lands a
/// little flat. Good enough for feedback tones.
pub struct PinBuzzer {
    pin: Output<'static>,
}

impl PinBuzzer {
    pub fn new(pin: Peri<'static, AnyPin>) -> Self {
        Self {
            pin: Output::new(pin, Level::Low, OutputDrive::Standard),
        }
    }
}

impl Buzzer for PinBuzzer {
    async fn tone(&mut self, freq_hz: u32, duration_ms: u32) {
        if freq_hz == 0 {
            Timer::after_millis(u64::from(duration_ms)).await;
            return;
        }
        let half_period_us = 500_000 / u64::from(freq_hz);
        let cycles = u64::from(freq_hz) * u64::from(duration_ms) / 1000;
        for _ in 0..cycles {
            self.pin.set_high();
            Timer::after_micros(half_period_us).await;
            self.pin.set_low();
            Timer::after_micros(half_period_us).await;
        }
    }
}
