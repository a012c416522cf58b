//! Line console command set.

use crate::clock::{ClockSetting, WallClock};
use crate::console::Console;
use crate::feedback::{self, LedState, Leds};
use crate::lifecycle;
use crate::platform::{Devices, Platform};
use crate::screen;
use crate::state::SystemState;
use crate::volume::{EntryInfo, VolumeService};

/// Iterator over whitespace-separated tokens of a command line.
pub struct Args<'a> {
    tokens: core::str::SplitAsciiWhitespace<'a>,
}

impl<'a> Args<'a> {
    pub fn new(line: &'a str) -> Self {
        Self {
            tokens: line.split_ascii_whitespace(),
        }
    }

    pub fn next(&mut self) -> Option<&'a str> {
        self.tokens.next()
    }
}

/// Every command the console understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    SetRtc,
    Format,
    Mount,
    Unmount,
    GetFree,
    Ls,
    Cat,
    Help,
}

impl Command {
    pub const ALL: [Command; 8] = [
        Command::SetRtc,
        Command::Format,
        Command::Mount,
        Command::Unmount,
        Command::GetFree,
        Command::Ls,
        Command::Cat,
        Command::Help,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Command::SetRtc => "setrtc",
            Command::Format => "format",
            Command::Mount => "mount",
            Command::Unmount => "unmount",
            Command::GetFree => "getfree",
            Command::Ls => "ls",
            Command::Cat => "cat",
            Command::Help => "help",
        }
    }

    pub fn usage(self) -> &'static str {
        match self {
            Command::SetRtc => "setrtc <DD> <MM> <YY> <hh> <mm> <ss>: set the real-time clock",
            Command::Format => "format [<volume>]: create a FAT filesystem on the volume",
            Command::Mount => "mount [<volume>]: mount the volume",
            Command::Unmount => "unmount [<volume>]: unmount the volume",
            Command::GetFree => "getfree [<volume>]: report total and free space",
            Command::Ls => "ls [<path>]: list directory contents",
            Command::Cat => "cat <file>: print the contents of a file",
            Command::Help => "help: show this summary",
        }
    }

    pub fn find(name: &str) -> Option<Command> {
        Command::ALL.iter().copied().find(|c| c.name() == name)
    }

    pub async fn run<P: Platform>(
        self,
        args: &mut Args<'_>,
        devices: &mut Devices<P>,
        state: &SystemState,
    ) {
        match self {
            Command::SetRtc => set_rtc(args, devices).await,
            Command::Format => lifecycle::format(devices, args.next()).await,
            Command::Mount => lifecycle::mount(devices, state, args.next()).await,
            Command::Unmount => lifecycle::unmount(devices, state, args.next()).await,
            Command::GetFree => lifecycle::report_free_space(devices, args.next()).await,
            Command::Ls => list_directory(args, devices).await,
            Command::Cat => show_file(args.next(), devices).await,
            Command::Help => help(devices).await,
        }
    }
}

/// Tokenises `line` and runs the command it names, if any. Unknown
/// commands get a console complaint and nothing else.
pub async fn dispatch_line<P: Platform>(
    line: &str,
    devices: &mut Devices<P>,
    state: &SystemState,
) {
    let mut args = Args::new(line);
    let name = match args.next() {
        Some(name) => name,
        None => return,
    };
    match Command::find(name) {
        Some(command) => command.run(&mut args, devices, state).await,
        None => {
            devices
                .console
                .print_fmt(format_args!("Command \"{}\" not found\r\n", name))
                .await
        }
    }
}

/// Parses the next argument as a number, complaining on the console when
/// it is missing or not a number.
async fn next_number<P: Platform>(
    args: &mut Args<'_>,
    devices: &mut Devices<P>,
    what: &str,
) -> Option<u16> {
    match args.next() {
        None => {
            devices
                .console
                .print_fmt(format_args!("Missing argument <{}>\r\n", what))
                .await;
            None
        }
        Some(token) => match token.parse::<u16>() {
            Ok(value) => Some(value),
            Err(_) => {
                devices
                    .console
                    .print_fmt(format_args!("Invalid argument <{}>: \"{}\"\r\n", what, token))
                    .await;
                None
            }
        },
    }
}

/// `setrtc <DD> <MM> <YY> <hh> <mm> <ss>`: two-digit year, offset from
/// 2000.
async fn set_rtc<P: Platform>(args: &mut Args<'_>, devices: &mut Devices<P>) {
    let Some(day) = next_number(args, devices, "DD").await else {
        return;
    };
    let Some(month) = next_number(args, devices, "MM").await else {
        return;
    };
    let Some(year) = next_number(args, devices, "YY").await else {
        return;
    };
    let Some(hour) = next_number(args, devices, "hh").await else {
        return;
    };
    let Some(minute) = next_number(args, devices, "mm").await else {
        return;
    };
    let Some(second) = next_number(args, devices, "ss").await else {
        return;
    };

    let setting = ClockSetting {
        year: 2000 + year,
        month: month as u8,
        day: day as u8,
        hour: hour as u8,
        minute: minute as u8,
        second: second as u8,
    };
    match devices.clock.set(setting) {
        Ok(()) => devices.console.print("RTC updated\r\n").await,
        Err(_) => devices.console.print("setrtc: invalid date/time\r\n").await,
    }
}

/// `ls [<path>]`: lists a directory on the default volume.
async fn list_directory<P: Platform>(args: &mut Args<'_>, devices: &mut Devices<P>) {
    let path = args.next().unwrap_or("");

    devices
        .console
        .print_fmt(format_args!(
            "Directory Listing: {}\r\n",
            if path.is_empty() { "/" } else { path }
        ))
        .await;

    // Entries are buffered so the listing can go out over the async
    // console after the borrow on the volume ends.
    let mut entries: heapless::Vec<EntryInfo, 16> = heapless::Vec::new();
    let mut truncated = false;
    let listed = match devices.volumes.resolve(None) {
        Some((_, volume)) => Some(volume.list_dir(path, &mut |entry| {
            if entries.push(entry.clone()).is_err() {
                truncated = true;
            }
        })),
        None => None,
    };

    match listed {
        Some(Ok(())) => {
            for entry in &entries {
                devices
                    .console
                    .print_fmt(format_args!(
                        "{} [{}] [size={}]\r\n",
                        entry.name,
                        entry.attribute(),
                        entry.size
                    ))
                    .await;
            }
            if truncated {
                devices.console.print("(listing truncated)\r\n").await;
            }
            devices.leds.set(LedState::VolumeActivity).await;
        }
        Some(Err(err)) => {
            screen::show_status(&mut devices.screen, "ERROR", None);
            devices.leds.set(LedState::Error).await;
            feedback::error_tone(&mut devices.buzzer).await;
            devices
                .console
                .print_fmt(format_args!(
                    "ls error: {} ({})\r\n",
                    err.describe(),
                    err.code()
                ))
                .await;
        }
        None => devices.console.print("No volumes registered\r\n").await,
    }
}

/// `cat <file>`: streams a file from the default volume to the console.
async fn show_file<P: Platform>(name: Option<&str>, devices: &mut Devices<P>) {
    let name = match name {
        Some(name) => name,
        None => {
            devices.console.print("Missing argument <file>\r\n").await;
            return;
        }
    };

    let opened = match devices.volumes.resolve(None) {
        Some((_, volume)) => Some(volume.open_read(name)),
        None => None,
    };
    let mut file = match opened {
        Some(Ok(file)) => file,
        Some(Err(err)) => {
            screen::show_status(&mut devices.screen, "ERROR", None);
            devices.leds.set(LedState::Error).await;
            feedback::error_tone(&mut devices.buzzer).await;
            devices
                .console
                .print_fmt(format_args!(
                    "cat error: {} ({})\r\n",
                    err.describe(),
                    err.code()
                ))
                .await;
            return;
        }
        None => {
            devices.console.print("No volumes registered\r\n").await;
            return;
        }
    };

    loop {
        let mut buf = [0u8; 128];
        let read = match devices.volumes.resolve(None) {
            Some((_, volume)) => volume.read(&mut file, &mut buf),
            None => break,
        };
        match read {
            Ok(0) => break,
            Ok(n) => {
                let _ = devices.console.write(&buf[..n]).await;
            }
            Err(err) => {
                devices
                    .console
                    .print_fmt(format_args!(
                        "\r\ncat error: {} ({})\r\n",
                        err.describe(),
                        err.code()
                    ))
                    .await;
                break;
            }
        }
    }
    let _ = match devices.volumes.resolve(None) {
        Some((_, volume)) => volume.close(file),
        None => Ok(()),
    };
    devices.console.print("\r\n").await;
}

/// `help`: command summary plus the button and shortcut map.
async fn help<P: Platform>(devices: &mut Devices<P>) {
    devices.console.print("Available commands:\r\n").await;
    for command in Command::ALL {
        devices
            .console
            .print_fmt(format_args!("  {}\r\n", command.usage()))
            .await;
    }
    devices
        .console
        .print(
            "Shortcuts: c = ls, d = cat the log file, e = getfree, g = format, h = help\r\n\
             Button A toggles recording; button B mounts/unmounts the volume\r\n",
        )
        .await;
}
