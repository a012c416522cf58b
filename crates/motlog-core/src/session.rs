//! Capture sessions: the open → record → close lifecycle.

use embedded_hal_async::delay::DelayNs;

use crate::console::Console;
use crate::feedback::{self, LedState, Leds};
use crate::platform::{Devices, Platform};
use crate::record::{self, CSV_HEADER, LOG_FILE_NAME};
use crate::screen;
use crate::sensor::MotionSensor;
use crate::state::SystemState;
use crate::volume::{VolumeError, VolumeService};

/// Delay between records, in milliseconds.
pub const RECORD_TICK_MS: u32 = 500;

/// Why a capture session ended early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionError<E> {
    /// The log file could not be opened; no session ran.
    Open(VolumeError),
    /// A write failed mid-session. The file was closed best-effort.
    Write(VolumeError),
    /// The sensor failed mid-session. The file was closed best-effort.
    Sensor(E),
}

/// Runs one capture session on the default volume.
///
/// Opens the log file fresh, writes the CSV header and then one record per
/// tick until the recording request is withdrawn. Returns the number of
/// records written. The session flag is raised only while the file is
/// open, and a session aborted by a collaborator failure does not withdraw
/// the recording request; the operator decides what happens next.
pub async fn run<P: Platform>(
    devices: &mut Devices<P>,
    state: &SystemState,
) -> Result<u32, SessionError<<P::Sensor as MotionSensor>::Error>> {
    let opened = match devices.volumes.resolve(None) {
        Some((_, volume)) => Some(volume.open_write(LOG_FILE_NAME)),
        None => None,
    };
    let mut file = match opened {
        Some(Ok(file)) => file,
        Some(Err(err)) => {
            report_open_failure(devices).await;
            return Err(SessionError::Open(err));
        }
        None => {
            report_open_failure(devices).await;
            return Err(SessionError::Open(VolumeError::NotFound));
        }
    };

    state.set_session_active(true);

    if let Err(err) = write_all(devices, &mut file, CSV_HEADER.as_bytes()) {
        abort(devices, file, state).await;
        return Err(SessionError::Write(err));
    }

    devices.leds.set(LedState::Recording).await;
    feedback::beep(&mut devices.buzzer, 1).await;

    let mut samples: u32 = 0;
    while state.logging_requested() {
        let sample = match devices.sensor.read_raw().await {
            Ok(sample) => sample,
            Err(err) => {
                abort(devices, file, state).await;
                return Err(SessionError::Sensor(err));
            }
        };

        samples += 1;
        let row = record::format_record(samples, &sample);
        if let Err(err) = write_all(devices, &mut file, row.as_bytes()) {
            abort(devices, file, state).await;
            return Err(SessionError::Write(err));
        }

        screen::show_recording(&mut devices.screen, samples);
        devices.leds.set(LedState::VolumeActivity).await;
        devices.leds.set(LedState::Recording).await;
        devices.delay.delay_ms(RECORD_TICK_MS).await;
    }

    // Close failures are ignored: the data rows are already on the medium
    // and there is nothing actionable left to do with the handle.
    let _ = close_default(devices, file);
    state.set_session_active(false);

    feedback::beep(&mut devices.buzzer, 2).await;
    devices.leds.set(LedState::Ready).await;

    Ok(samples)
}

fn write_all<P: Platform>(
    devices: &mut Devices<P>,
    file: &mut <P::Volume as VolumeService>::File,
    data: &[u8],
) -> Result<(), VolumeError> {
    match devices.volumes.resolve(None) {
        Some((_, volume)) => volume.write(file, data),
        None => Err(VolumeError::NotFound),
    }
}

fn close_default<P: Platform>(
    devices: &mut Devices<P>,
    file: <P::Volume as VolumeService>::File,
) -> Result<(), VolumeError> {
    match devices.volumes.resolve(None) {
        Some((_, volume)) => volume.close(file),
        None => Err(VolumeError::NotFound),
    }
}

/// Feedback for a log file that would not open: the session never started.
async fn report_open_failure<P: Platform>(devices: &mut Devices<P>) {
    screen::show_status(&mut devices.screen, "ERROR", None);
    devices
        .console
        .print("Could not open the log file\r\n")
        .await;
    devices.leds.set(LedState::Error).await;
    feedback::beep(&mut devices.buzzer, 3).await;
}

/// Tears a broken session down: closes the file best-effort, drops the
/// session flag and reports the failure.
async fn abort<P: Platform>(
    devices: &mut Devices<P>,
    file: <P::Volume as VolumeService>::File,
    state: &SystemState,
) {
    let _ = close_default(devices, file);
    state.set_session_active(false);
    screen::show_status(&mut devices.screen, "ERROR", None);
    devices.leds.set(LedState::Error).await;
    feedback::error_tone(&mut devices.buzzer).await;
}
