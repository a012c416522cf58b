//! The main appliance loop.
//!
//! One coordinator owns all the collaborators and drives everything that
//! is not an interrupt: console input, pending button work, capture
//! sessions and the idle display. Input tasks only flip flags in
//! [`SystemState`]; the coordinator is the single place where those flags
//! turn into actions, so volume and file operations never race each other.

use embedded_hal_async::delay::DelayNs;

use crate::command::{self, Args, Command};
use crate::console::{Console, LineEditor, CLEAR_SCREEN, PROMPT};
use crate::feedback::{self, LedState, Leds};
use crate::lifecycle;
use crate::platform::{Devices, Platform};
use crate::record::LOG_FILE_NAME;
use crate::screen;
use crate::sensor::MotionSensor;
use crate::session;
use crate::state::SystemState;

/// Delay between loop iterations while idle, in milliseconds.
pub const IDLE_TICK_MS: u32 = 500;

/// Pause after a capture session ends before the loop resumes, in
/// milliseconds.
pub const POST_SESSION_PAUSE_MS: u32 = 1000;

/// Single-key console shortcuts, honoured only while the command line is
/// empty.
const SHORTCUTS: [u8; 5] = [b'c', b'd', b'e', b'g', b'h'];

pub struct Coordinator<'a, P: Platform> {
    devices: Devices<P>,
    state: &'a SystemState,
    editor: LineEditor,
}

impl<'a, P: Platform> Coordinator<'a, P> {
    pub fn new(devices: Devices<P>, state: &'a SystemState) -> Self {
        Self {
            devices,
            state,
            editor: LineEditor::new(),
        }
    }

    /// One-time bring-up feedback: boot panel, init colour, sensor reset,
    /// console banner and the first prompt.
    pub async fn startup(&mut self, banner: &str) {
        screen::show_status(&mut self.devices.screen, "Starting...", None);
        self.devices.leds.set(LedState::Init).await;

        if self.devices.sensor.reset().await.is_err() {
            screen::show_status(&mut self.devices.screen, "ERROR", None);
            self.devices.leds.set(LedState::Error).await;
            feedback::error_tone(&mut self.devices.buzzer).await;
        }

        self.devices.console.print(banner).await;
        self.devices.console.print("\r\n").await;
        self.devices.console.print(CLEAR_SCREEN).await;
        command::dispatch_line("help", &mut self.devices, self.state).await;
        self.devices.console.print(PROMPT).await;
    }

    /// One pass of the appliance loop. Split out from [`Coordinator::run`]
    /// so the whole decision ladder is testable without the idle delay.
    pub async fn run_once(&mut self) {
        // Console input first: at most one byte per pass. A byte that
        // completes a line runs its command before anything else happens.
        let mut shortcut = None;
        if let Some(byte) = self.devices.console.poll_byte() {
            if self.editor.is_empty() && SHORTCUTS.contains(&byte) {
                shortcut = Some(byte);
            } else if let Some(line) = self.editor.feed(byte, &mut self.devices.console).await {
                command::dispatch_line(&line, &mut self.devices, self.state).await;
                self.devices.console.print("\r\n").await;
                self.devices.console.print(PROMPT).await;
            }
        }

        if self.state.take_volume_toggle() {
            lifecycle::toggle(&mut self.devices, self.state).await;
        } else if let Some(key) = shortcut {
            self.run_shortcut(key).await;
        } else if self.state.logging_requested()
            && !self.state.session_active()
            && self.state.volume_mounted()
        {
            let _ = session::run(&mut self.devices, self.state).await;
            self.devices.delay.delay_ms(POST_SESSION_PAUSE_MS).await;
        } else {
            self.render_idle().await;
        }
    }

    /// Runs forever: startup feedback, then the loop with its idle tick.
    pub async fn run(&mut self, banner: &str) -> ! {
        self.startup(banner).await;
        loop {
            self.run_once().await;
            self.devices.delay.delay_ms(IDLE_TICK_MS).await;
        }
    }

    async fn run_shortcut(&mut self, key: u8) {
        match key {
            b'c' => {
                screen::show_status(&mut self.devices.screen, "Listing", Some("files..."));
                feedback::ack_chirp(&mut self.devices.buzzer).await;
                self.dispatch(Command::Ls, "").await;
            }
            b'd' => {
                screen::show_status(&mut self.devices.screen, "Reading", Some("log file..."));
                feedback::ack_chirp(&mut self.devices.buzzer).await;
                self.dispatch(Command::Cat, LOG_FILE_NAME).await;
            }
            b'e' => {
                screen::show_status(&mut self.devices.screen, "Checking", Some("free space..."));
                feedback::ack_chirp(&mut self.devices.buzzer).await;
                self.dispatch(Command::GetFree, "").await;
            }
            b'g' => {
                screen::show_status(&mut self.devices.screen, "Formatting", Some("volume..."));
                feedback::ack_chirp(&mut self.devices.buzzer).await;
                self.dispatch(Command::Format, "").await;
            }
            b'h' => {
                feedback::ack_chirp(&mut self.devices.buzzer).await;
                self.dispatch(Command::Help, "").await;
            }
            _ => {}
        }
        self.devices.console.print("\r\n").await;
        self.devices.console.print(PROMPT).await;
    }

    async fn dispatch(&mut self, command: Command, arg_line: &str) {
        let mut args = Args::new(arg_line);
        command
            .run(&mut args, &mut self.devices, self.state)
            .await;
    }

    /// Idle feedback: ready colour, and a panel that says whether the
    /// appliance is ready for commands or still waiting for a volume.
    async fn render_idle(&mut self) {
        self.devices.leds.set(LedState::Ready).await;
        if self.state.volume_mounted() {
            screen::show_status(&mut self.devices.screen, "Ready", Some("awaiting command"));
        } else {
            screen::show_status(&mut self.devices.screen, "Awaiting", Some("mount"));
        }
    }

    /// Hands the collaborators back, mostly so tests can inspect them.
    pub fn into_devices(self) -> Devices<P> {
        self.devices
    }
}
