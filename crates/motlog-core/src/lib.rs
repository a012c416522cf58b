//! Hardware-independent logic for the motlog data logger.
//!
//! Everything that decides *what* the appliance does lives here: the
//! coordinator loop, the capture session, the console command set and the
//! feedback patterns. Everything that touches real hardware is abstracted
//! behind the collaborator traits collected in [`Platform`], so the whole
//! crate runs (and is tested) on the host.

#![no_std]
#![allow(async_fn_in_trait)]

mod clock;
mod command;
mod console;
mod coordinator;
mod debounce;
mod feedback;
pub mod lifecycle;
mod platform;
mod record;
mod screen;
mod sensor;
pub mod session;
mod state;
mod volume;

pub use clock::{ClockSetting, WallClock};
pub use command::{dispatch_line, Args, Command};
pub use console::{Console, LineEditor, CLEAR_SCREEN, LINE_CAPACITY, PROMPT};
pub use coordinator::{Coordinator, IDLE_TICK_MS, POST_SESSION_PAUSE_MS};
pub use debounce::{DebounceGate, DEBOUNCE_WINDOW_US};
pub use feedback::{ack_chirp, beep, chime_success, error_tone, Buzzer, LedState, Leds};
pub use platform::{Devices, Platform};
pub use record::{
    format_record, ACCEL_SCALE, CSV_HEADER, GYRO_SCALE, LOG_FILE_NAME, RECORD_CAPACITY,
};
pub use screen::{show_recording, show_status, Screen, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use sensor::{MotionSensor, RawSample};
pub use session::{SessionError, RECORD_TICK_MS};
pub use state::SystemState;
pub use volume::{EntryInfo, VolumeError, VolumeService, VolumeSet, VolumeSpace, MAX_VOLUMES};
