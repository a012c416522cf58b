/// States of the RGB status indicator.
///
/// The mapping from state to colour and blink pattern belongs to the
/// implementation; steady states stay put until the next call, one-shot
/// patterns ([`LedState::VolumeActivity`], [`LedState::Error`]) run to
/// completion and leave the indicator dark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedState {
    /// Steady amber: starting up, or a volume transition in progress.
    Init,
    /// Steady green: idle and ready.
    Ready,
    /// Steady red: capture session running.
    Recording,
    /// One blue blink: the volume was just touched.
    VolumeActivity,
    /// Three magenta blinks: something failed.
    Error,
}

pub trait Leds {
    async fn set(&mut self, state: LedState);
}

/// Square-wave sounder. A frequency of zero is a rest: silence held for
/// the full duration.
pub trait Buzzer {
    async fn tone(&mut self, freq_hz: u32, duration_ms: u32);
}

/// Short confirmation beeps: `count` pips at 1 kHz with a gap after each.
pub async fn beep<B: Buzzer>(buzzer: &mut B, count: u32) {
    for _ in 0..count {
        buzzer.tone(1000, 100).await;
        buzzer.tone(0, 150).await;
    }
}

/// Descending three-note success chime.
pub async fn chime_success<B: Buzzer>(buzzer: &mut B) {
    buzzer.tone(1000, 150).await;
    buzzer.tone(700, 150).await;
    buzzer.tone(500, 200).await;
}

/// Low error buzz.
pub async fn error_tone<B: Buzzer>(buzzer: &mut B) {
    buzzer.tone(400, 500).await;
}

/// Brief high chirp acknowledging a shortcut key.
pub async fn ack_chirp<B: Buzzer>(buzzer: &mut B) {
    buzzer.tone(1200, 80).await;
}
