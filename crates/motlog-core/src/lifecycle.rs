//! Mounting, unmounting, formatting and capacity reporting.
//!
//! Every operation resolves its target through the volume registry, drives
//! the backend, and mirrors the outcome on the display, the status LED,
//! the sounder and the console. The same handlers back both console
//! commands and the volume button.

use crate::console::Console;
use crate::feedback::{self, Buzzer, LedState, Leds};
use crate::platform::{Devices, Platform};
use crate::screen;
use crate::state::SystemState;
use crate::volume::{VolumeError, VolumeService};

/// Reports a failed volume operation on every feedback surface.
async fn report_failure<P: Platform>(devices: &mut Devices<P>, operation: &str, err: VolumeError) {
    screen::show_status(&mut devices.screen, "ERROR", None);
    devices.leds.set(LedState::Error).await;
    feedback::error_tone(&mut devices.buzzer).await;
    devices
        .console
        .print_fmt(format_args!(
            "{} error: {} ({})\r\n",
            operation,
            err.describe(),
            err.code()
        ))
        .await;
}

/// Prints the complaint for a name that matched no registered volume.
async fn report_unknown<P: Platform>(devices: &mut Devices<P>, name: Option<&str>) {
    match name {
        Some(name) => {
            devices
                .console
                .print_fmt(format_args!("Unknown volume \"{}\"\r\n", name))
                .await
        }
        None => devices.console.print("No volumes registered\r\n").await,
    }
}

/// Mounts a volume and records the new state.
pub async fn mount<P: Platform>(devices: &mut Devices<P>, state: &SystemState, name: Option<&str>) {
    let outcome = match devices.volumes.resolve(name) {
        Some((label, volume)) => Some((label, volume.mount())),
        None => None,
    };
    match outcome {
        Some((label, Ok(()))) => {
            state.set_volume_mounted(true);
            screen::show_status(&mut devices.screen, "SD mounted", None);
            devices.leds.set(LedState::Init).await;
            devices.buzzer.tone(800, 200).await;
            devices
                .console
                .print_fmt(format_args!("Volume \"{}\" mounted\r\n", label))
                .await;
        }
        Some((_, Err(err))) => report_failure(devices, "mount", err).await,
        None => report_unknown(devices, name).await,
    }
}

/// Unmounts a volume and records the new state.
pub async fn unmount<P: Platform>(
    devices: &mut Devices<P>,
    state: &SystemState,
    name: Option<&str>,
) {
    let outcome = match devices.volumes.resolve(name) {
        Some((label, volume)) => Some((label, volume.unmount())),
        None => None,
    };
    match outcome {
        Some((label, Ok(()))) => {
            state.set_volume_mounted(false);
            screen::show_status(&mut devices.screen, "SD unmounted", None);
            devices.leds.set(LedState::Init).await;
            feedback::beep(&mut devices.buzzer, 2).await;
            devices
                .console
                .print_fmt(format_args!("Volume \"{}\" unmounted\r\n", label))
                .await;
        }
        Some((_, Err(err))) => report_failure(devices, "unmount", err).await,
        None => report_unknown(devices, name).await,
    }
}

/// Creates a fresh filesystem on a volume.
pub async fn format<P: Platform>(devices: &mut Devices<P>, name: Option<&str>) {
    let outcome = match devices.volumes.resolve(name) {
        Some((label, volume)) => Some((label, volume.format())),
        None => None,
    };
    match outcome {
        Some((label, result)) => {
            devices
                .console
                .print_fmt(format_args!("Formatting volume \"{}\"...\r\n", label))
                .await;
            match result {
                Ok(()) => {
                    screen::show_status(&mut devices.screen, "SUCCESS", None);
                    feedback::chime_success(&mut devices.buzzer).await;
                    devices.console.print("Format complete\r\n").await;
                }
                Err(err) => report_failure(devices, "format", err).await,
            }
        }
        None => report_unknown(devices, name).await,
    }
}

/// Reports total and free space on a volume.
pub async fn report_free_space<P: Platform>(devices: &mut Devices<P>, name: Option<&str>) {
    let outcome = match devices.volumes.resolve(name) {
        Some((_, volume)) => Some(volume.free_space()),
        None => None,
    };
    match outcome {
        Some(Ok(space)) => {
            screen::show_status(&mut devices.screen, "SUCCESS", None);
            devices.leds.set(LedState::VolumeActivity).await;
            devices
                .console
                .print_fmt(format_args!(
                    "{:>10} KiB total drive space.\r\n{:>10} KiB available.\r\n",
                    space.total_kib(),
                    space.free_kib()
                ))
                .await;
        }
        Some(Err(err)) => report_failure(devices, "getfree", err).await,
        None => report_unknown(devices, name).await,
    }
}

/// Handles a press of the volume button: unmounts when mounted, mounts
/// when not, announcing the transition before it starts.
pub async fn toggle<P: Platform>(devices: &mut Devices<P>, state: &SystemState) {
    devices.leds.set(LedState::Init).await;

    let mounted = devices
        .volumes
        .resolve(None)
        .map(|(_, v)| v.is_mounted())
        .unwrap_or(false);

    if mounted {
        screen::show_status(&mut devices.screen, "Unmounting", Some("volume..."));
        devices
            .console
            .print("\r\nUnmounting volume (button B)...\r\n")
            .await;
        unmount(devices, state, None).await;
    } else {
        screen::show_status(&mut devices.screen, "Mounting", Some("volume..."));
        devices
            .console
            .print("\r\nMounting volume (button B)...\r\n")
            .await;
        mount(devices, state, None).await;
    }
}
