//! End-to-end tests of the coordinator, the capture session, the volume
//! lifecycle and the command interpreter, run against an in-memory
//! platform.

use std::collections::VecDeque;

use embedded_hal_async::delay::DelayNs;
use motlog_core::{
    dispatch_line, ClockSetting, Console, Coordinator, Devices, EntryInfo, LedState,
    MotionSensor, Platform, RawSample, Screen, SessionError, SystemState, VolumeError,
    VolumeService, VolumeSet, VolumeSpace, WallClock, Buzzer, Leds, CSV_HEADER,
    RECORD_TICK_MS,
};

// ---------------------------------------------------------------------------
// Mock collaborators
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct MemVolume {
    mounted: bool,
    files: Vec<(String, Vec<u8>)>,
    mount_error: Option<VolumeError>,
    unmount_error: Option<VolumeError>,
    format_error: Option<VolumeError>,
    open_error: Option<VolumeError>,
    free_error: Option<VolumeError>,
    /// 1-based index of the write call that should fail, counting every
    /// write since construction.
    fail_write_at: Option<usize>,
    free: VolumeSpace,
    writes: usize,
    format_calls: usize,
    free_space_calls: usize,
}

impl MemVolume {
    fn mounted_with_free(free: VolumeSpace) -> Self {
        Self {
            mounted: true,
            free,
            ..Self::default()
        }
    }

    fn file(&self, name: &str) -> Option<&[u8]> {
        self.files
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, data)| data.as_slice())
    }
}

struct MemFile {
    index: usize,
    pos: usize,
}

impl VolumeService for MemVolume {
    type File = MemFile;

    fn mount(&mut self) -> Result<(), VolumeError> {
        if let Some(err) = self.mount_error {
            return Err(err);
        }
        if self.mounted {
            return Err(VolumeError::AlreadyMounted);
        }
        self.mounted = true;
        Ok(())
    }

    fn unmount(&mut self) -> Result<(), VolumeError> {
        if let Some(err) = self.unmount_error {
            return Err(err);
        }
        if !self.mounted {
            return Err(VolumeError::NotMounted);
        }
        self.mounted = false;
        Ok(())
    }

    fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn format(&mut self) -> Result<(), VolumeError> {
        self.format_calls += 1;
        if let Some(err) = self.format_error {
            return Err(err);
        }
        self.files.clear();
        Ok(())
    }

    fn free_space(&mut self) -> Result<VolumeSpace, VolumeError> {
        self.free_space_calls += 1;
        match self.free_error {
            Some(err) => Err(err),
            None => Ok(self.free),
        }
    }

    fn open_write(&mut self, name: &str) -> Result<Self::File, VolumeError> {
        if let Some(err) = self.open_error {
            return Err(err);
        }
        if !self.mounted {
            return Err(VolumeError::NotMounted);
        }
        let index = match self.files.iter().position(|(n, _)| n == name) {
            Some(index) => {
                self.files[index].1.clear();
                index
            }
            None => {
                self.files.push((name.to_owned(), Vec::new()));
                self.files.len() - 1
            }
        };
        Ok(MemFile { index, pos: 0 })
    }

    fn open_read(&mut self, name: &str) -> Result<Self::File, VolumeError> {
        if !self.mounted {
            return Err(VolumeError::NotMounted);
        }
        match self.files.iter().position(|(n, _)| n == name) {
            Some(index) => Ok(MemFile { index, pos: 0 }),
            None => Err(VolumeError::NotFound),
        }
    }

    fn write(&mut self, file: &mut Self::File, data: &[u8]) -> Result<(), VolumeError> {
        self.writes += 1;
        if self.fail_write_at == Some(self.writes) {
            return Err(VolumeError::WriteFailed);
        }
        self.files[file.index].1.extend_from_slice(data);
        Ok(())
    }

    fn read(&mut self, file: &mut Self::File, buf: &mut [u8]) -> Result<usize, VolumeError> {
        let data = &self.files[file.index].1;
        let n = buf.len().min(data.len() - file.pos);
        buf[..n].copy_from_slice(&data[file.pos..file.pos + n]);
        file.pos += n;
        Ok(n)
    }

    fn close(&mut self, _file: Self::File) -> Result<(), VolumeError> {
        Ok(())
    }

    fn list_dir(
        &mut self,
        _path: &str,
        sink: &mut dyn FnMut(&EntryInfo),
    ) -> Result<(), VolumeError> {
        if !self.mounted {
            return Err(VolumeError::NotMounted);
        }
        for (name, data) in &self.files {
            let info = EntryInfo {
                name: heapless::String::try_from(name.as_str()).unwrap(),
                is_directory: false,
                is_read_only: false,
                size: data.len() as u32,
            };
            sink(&info);
        }
        Ok(())
    }
}

struct MockSensor {
    sample: RawSample,
    fail_at: Option<u32>,
    reads: u32,
}

impl MockSensor {
    fn steady(sample: RawSample) -> Self {
        Self {
            sample,
            fail_at: None,
            reads: 0,
        }
    }
}

#[derive(Debug)]
struct SensorFault;

impl MotionSensor for MockSensor {
    type Error = SensorFault;

    async fn reset(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn read_raw(&mut self) -> Result<RawSample, Self::Error> {
        self.reads += 1;
        if self.fail_at == Some(self.reads) {
            return Err(SensorFault);
        }
        Ok(self.sample)
    }
}

#[derive(Default)]
struct MockScreen {
    texts: Vec<String>,
    clears: usize,
    flushes: usize,
}

impl Screen for MockScreen {
    type Error = core::convert::Infallible;

    fn clear(&mut self) {
        self.clears += 1;
    }

    fn rect(&mut self, _x: i32, _y: i32, _width: u32, _height: u32) {}

    fn text(&mut self, text: &str, _x: i32, _y: i32) {
        self.texts.push(text.to_owned());
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.flushes += 1;
        Ok(())
    }
}

#[derive(Default)]
struct MockConsole {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
}

impl MockConsole {
    fn with_input(s: &str) -> Self {
        Self {
            rx: s.bytes().collect(),
            tx: Vec::new(),
        }
    }

    fn output(&self) -> String {
        String::from_utf8_lossy(&self.tx).into_owned()
    }
}

impl Console for MockConsole {
    type Error = core::convert::Infallible;

    fn poll_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    async fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.tx.extend_from_slice(bytes);
        Ok(())
    }
}

#[derive(Default)]
struct MockLeds {
    states: Vec<LedState>,
}

impl Leds for MockLeds {
    async fn set(&mut self, state: LedState) {
        self.states.push(state);
    }
}

#[derive(Default)]
struct MockBuzzer {
    tones: Vec<(u32, u32)>,
}

impl Buzzer for MockBuzzer {
    async fn tone(&mut self, freq_hz: u32, duration_ms: u32) {
        self.tones.push((freq_hz, duration_ms));
    }
}

#[derive(Default)]
struct MockClock {
    settings: Vec<ClockSetting>,
    reject: bool,
}

#[derive(Debug)]
struct BadSetting;

impl WallClock for MockClock {
    type Error = BadSetting;

    fn set(&mut self, setting: ClockSetting) -> Result<(), Self::Error> {
        if self.reject {
            return Err(BadSetting);
        }
        self.settings.push(setting);
        Ok(())
    }
}

/// Delay that never sleeps. Each record-tick delay decrements a budget;
/// when it runs out, the recording request is withdrawn, ending the
/// session the way a button press would.
struct TickDelay {
    state: &'static SystemState,
    record_ticks_left: u32,
}

impl DelayNs for TickDelay {
    async fn delay_ns(&mut self, _ns: u32) {}

    async fn delay_ms(&mut self, ms: u32) {
        if ms == RECORD_TICK_MS && self.state.logging_requested() {
            self.record_ticks_left = self.record_ticks_left.saturating_sub(1);
            if self.record_ticks_left == 0 {
                self.state.toggle_logging_requested();
            }
        }
    }
}

enum MockPlatform {}

impl Platform for MockPlatform {
    type Volume = MemVolume;
    type Sensor = MockSensor;
    type Screen = MockScreen;
    type Console = MockConsole;
    type Leds = MockLeds;
    type Buzzer = MockBuzzer;
    type Clock = MockClock;
    type Delay = TickDelay;
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

const FULL_SCALE: RawSample = RawSample {
    accel: [16384, -16384, 0],
    gyro: [131, -131, 0],
    temp: 0,
};

fn leak_state() -> &'static SystemState {
    Box::leak(Box::new(SystemState::new()))
}

fn make_devices(
    state: &'static SystemState,
    volume: MemVolume,
    record_ticks: u32,
) -> Devices<MockPlatform> {
    let mut volumes = VolumeSet::new();
    volumes.register("sd0", volume).unwrap();
    Devices {
        volumes,
        sensor: MockSensor::steady(FULL_SCALE),
        screen: MockScreen::default(),
        console: MockConsole::default(),
        leds: MockLeds::default(),
        buzzer: MockBuzzer::default(),
        clock: MockClock::default(),
        delay: TickDelay {
            state,
            record_ticks_left: record_ticks,
        },
    }
}

fn default_volume(devices: &mut Devices<MockPlatform>) -> &mut MemVolume {
    devices.volumes.resolve(None).unwrap().1
}

// ---------------------------------------------------------------------------
// Capture sessions
// ---------------------------------------------------------------------------

#[futures_test::test]
async fn capture_session_writes_header_and_rows() {
    let state = leak_state();
    let mut devices = make_devices(state, MemVolume::mounted_with_free(VolumeSpace::default()), 3);
    state.set_volume_mounted(true);
    state.toggle_logging_requested();

    let written = motlog_core::session::run(&mut devices, state).await.unwrap();
    assert_eq!(written, 3);

    let volume = default_volume(&mut devices);
    let content = String::from_utf8(volume.file("imu_data.csv").unwrap().to_vec()).unwrap();
    let expected_row = "1.0000,-1.0000,0.0000,1.0000,-1.0000,0.0000\n";
    assert_eq!(
        content,
        format!(
            "{}1,{row}2,{row}3,{row}",
            CSV_HEADER,
            row = expected_row
        )
    );

    assert!(!state.session_active());
    assert!(!state.logging_requested());
    // Start beep, then the double beep when closing.
    assert_eq!(
        devices.buzzer.tones,
        vec![
            (1000, 100),
            (0, 150),
            (1000, 100),
            (0, 150),
            (1000, 100),
            (0, 150)
        ]
    );
    assert_eq!(devices.leds.states.last(), Some(&LedState::Ready));
}

#[futures_test::test]
async fn session_reuses_the_file_name_and_truncates() {
    let state = leak_state();
    let mut volume = MemVolume::mounted_with_free(VolumeSpace::default());
    volume.files.push(("imu_data.csv".to_owned(), b"old content".to_vec()));
    let mut devices = make_devices(state, volume, 1);
    state.set_volume_mounted(true);
    state.toggle_logging_requested();

    motlog_core::session::run(&mut devices, state).await.unwrap();

    let volume = default_volume(&mut devices);
    let content = volume.file("imu_data.csv").unwrap();
    assert!(content.starts_with(CSV_HEADER.as_bytes()));
    assert_eq!(volume.files.len(), 1);
}

#[futures_test::test]
async fn open_failure_reports_and_keeps_the_request() {
    let state = leak_state();
    let mut volume = MemVolume::mounted_with_free(VolumeSpace::default());
    volume.open_error = Some(VolumeError::DeviceError);
    let mut devices = make_devices(state, volume, 3);
    state.set_volume_mounted(true);
    state.toggle_logging_requested();

    let err = motlog_core::session::run(&mut devices, state).await.unwrap_err();
    assert!(matches!(err, SessionError::Open(VolumeError::DeviceError)));

    // The request stays up so the operator decides what happens next.
    assert!(state.logging_requested());
    assert!(!state.session_active());
    // Triple beep.
    assert_eq!(
        devices.buzzer.tones,
        vec![
            (1000, 100),
            (0, 150),
            (1000, 100),
            (0, 150),
            (1000, 100),
            (0, 150)
        ]
    );
    assert!(devices.screen.texts.iter().any(|t| t == "ERROR"));
    assert!(devices
        .console
        .output()
        .contains("Could not open the log file"));
    assert_eq!(devices.leds.states.last(), Some(&LedState::Error));
}

#[futures_test::test]
async fn write_failure_aborts_the_session() {
    let state = leak_state();
    let mut volume = MemVolume::mounted_with_free(VolumeSpace::default());
    // Header is write #1; the first record row fails.
    volume.fail_write_at = Some(2);
    let mut devices = make_devices(state, volume, 5);
    state.set_volume_mounted(true);
    state.toggle_logging_requested();

    let err = motlog_core::session::run(&mut devices, state).await.unwrap_err();
    assert!(matches!(err, SessionError::Write(VolumeError::WriteFailed)));
    assert!(!state.session_active());
    assert!(state.logging_requested());
    assert_eq!(devices.leds.states.last(), Some(&LedState::Error));
    assert!(devices.buzzer.tones.contains(&(400, 500)));
}

#[futures_test::test]
async fn sensor_failure_aborts_the_session() {
    let state = leak_state();
    let mut devices = make_devices(state, MemVolume::mounted_with_free(VolumeSpace::default()), 5);
    devices.sensor.fail_at = Some(2);
    state.set_volume_mounted(true);
    state.toggle_logging_requested();

    let err = motlog_core::session::run(&mut devices, state).await.unwrap_err();
    assert!(matches!(err, SessionError::Sensor(SensorFault)));
    assert!(!state.session_active());

    // The first record made it to the volume before the fault.
    let volume = default_volume(&mut devices);
    let content = String::from_utf8(volume.file("imu_data.csv").unwrap().to_vec()).unwrap();
    assert_eq!(content.lines().count(), 2);
}

// ---------------------------------------------------------------------------
// Coordinator loop
// ---------------------------------------------------------------------------

#[futures_test::test]
async fn coordinator_runs_a_session_when_requested() {
    let state = leak_state();
    let volume = MemVolume::mounted_with_free(VolumeSpace::default());
    let devices = make_devices(state, volume, 2);
    let mut coordinator = Coordinator::new(devices, state);
    state.set_volume_mounted(true);
    state.toggle_logging_requested();

    coordinator.run_once().await;

    let mut devices = coordinator.into_devices();
    let volume = default_volume(&mut devices);
    let content = String::from_utf8(volume.file("imu_data.csv").unwrap().to_vec()).unwrap();
    assert_eq!(content.lines().count(), 3); // header + 2 rows
    assert!(!state.logging_requested());
}

#[futures_test::test]
async fn capture_waits_for_a_mounted_volume() {
    let state = leak_state();
    let devices = make_devices(state, MemVolume::default(), 3);
    let mut coordinator = Coordinator::new(devices, state);
    state.toggle_logging_requested();

    coordinator.run_once().await;

    let mut devices = coordinator.into_devices();
    assert_eq!(devices.sensor.reads, 0);
    assert!(default_volume(&mut devices).files.is_empty());
    // The pass fell through to idle feedback instead.
    assert_eq!(devices.leds.states.last(), Some(&LedState::Ready));
    assert!(state.logging_requested());
}

#[futures_test::test]
async fn idle_pass_shows_the_waiting_panel() {
    let state = leak_state();
    let devices = make_devices(state, MemVolume::default(), 0);
    let mut coordinator = Coordinator::new(devices, state);

    coordinator.run_once().await;

    let devices = coordinator.into_devices();
    assert_eq!(devices.leds.states.last(), Some(&LedState::Ready));
    assert!(devices.screen.texts.iter().any(|t| t == "Awaiting"));
    assert!(devices.screen.texts.iter().any(|t| t == "mount"));
    assert!(devices.screen.flushes > 0);
}

#[futures_test::test]
async fn idle_panel_announces_readiness_once_mounted() {
    let state = leak_state();
    let devices = make_devices(state, MemVolume::mounted_with_free(VolumeSpace::default()), 0);
    let mut coordinator = Coordinator::new(devices, state);
    state.set_volume_mounted(true);

    coordinator.run_once().await;

    let mut devices = coordinator.into_devices();
    assert!(devices.screen.texts.iter().any(|t| t == "Ready"));
    assert!(devices.screen.texts.iter().any(|t| t == "awaiting command"));
    // Mounted but not requested: no session may start.
    assert_eq!(devices.sensor.reads, 0);
    assert!(default_volume(&mut devices).files.is_empty());
}

#[futures_test::test]
async fn volume_button_mounts_then_unmounts() {
    let state = leak_state();
    let devices = make_devices(state, MemVolume::default(), 0);
    let mut coordinator = Coordinator::new(devices, state);

    state.request_volume_toggle();
    coordinator.run_once().await;
    assert!(state.volume_mounted());

    state.request_volume_toggle();
    coordinator.run_once().await;
    assert!(!state.volume_mounted());

    let mut devices = coordinator.into_devices();
    assert!(!default_volume(&mut devices).mounted);
    let output = devices.console.output();
    assert!(output.contains("Mounting volume (button B)"));
    assert!(output.contains("Volume \"sd0\" mounted"));
    assert!(output.contains("Unmounting volume (button B)"));
    assert!(output.contains("Volume \"sd0\" unmounted"));
    assert!(devices.buzzer.tones.contains(&(800, 200)));
}

#[futures_test::test]
async fn mount_failure_reports_on_every_surface() {
    let state = leak_state();
    let mut volume = MemVolume::default();
    volume.mount_error = Some(VolumeError::NotReady);
    let devices = make_devices(state, volume, 0);
    let mut coordinator = Coordinator::new(devices, state);

    state.request_volume_toggle();
    coordinator.run_once().await;

    assert!(!state.volume_mounted());
    let devices = coordinator.into_devices();
    assert!(devices
        .console
        .output()
        .contains("mount error: medium not ready (2)"));
    assert!(devices.screen.texts.iter().any(|t| t == "ERROR"));
    assert!(devices.buzzer.tones.contains(&(400, 500)));
    assert!(devices.leds.states.contains(&LedState::Error));
}

#[futures_test::test]
async fn toggle_takes_priority_over_a_pending_shortcut() {
    let state = leak_state();
    let mut devices = make_devices(state, MemVolume::default(), 0);
    devices.console = MockConsole::with_input("c");
    let mut coordinator = Coordinator::new(devices, state);

    state.request_volume_toggle();
    coordinator.run_once().await;

    // The toggle ran; the shortcut byte was consumed without acting.
    assert!(state.volume_mounted());
    let devices = coordinator.into_devices();
    assert!(!devices.buzzer.tones.contains(&(1200, 80)));
}

// ---------------------------------------------------------------------------
// Shortcuts
// ---------------------------------------------------------------------------

#[futures_test::test]
async fn shortcut_lists_files_from_an_empty_line() {
    let state = leak_state();
    let mut volume = MemVolume::mounted_with_free(VolumeSpace::default());
    volume.files.push(("imu_data.csv".to_owned(), vec![0u8; 42]));
    let mut devices = make_devices(state, volume, 0);
    devices.console = MockConsole::with_input("c");
    let mut coordinator = Coordinator::new(devices, state);

    coordinator.run_once().await;

    let devices = coordinator.into_devices();
    let output = devices.console.output();
    assert!(output.contains("Directory Listing: /"));
    assert!(output.contains("imu_data.csv [writable file] [size=42]"));
    assert!(devices.buzzer.tones.contains(&(1200, 80)));
    assert!(devices.screen.texts.iter().any(|t| t == "Listing"));
}

#[futures_test::test]
async fn shortcut_bytes_are_plain_input_mid_line() {
    let state = leak_state();
    let mut devices = make_devices(state, MemVolume::default(), 0);
    devices.console = MockConsole::with_input("xc\r");
    let mut coordinator = Coordinator::new(devices, state);

    coordinator.run_once().await;
    coordinator.run_once().await;
    coordinator.run_once().await;

    let devices = coordinator.into_devices();
    let output = devices.console.output();
    // "c" was buffered into the line, not run as a shortcut.
    assert!(!devices.buzzer.tones.contains(&(1200, 80)));
    assert!(output.contains("Command \"xc\" not found"));
}

#[futures_test::test]
async fn shortcut_reads_the_log_file() {
    let state = leak_state();
    let mut volume = MemVolume::mounted_with_free(VolumeSpace::default());
    volume
        .files
        .push(("imu_data.csv".to_owned(), b"1,2,3\n".to_vec()));
    let mut devices = make_devices(state, volume, 0);
    devices.console = MockConsole::with_input("d");
    let mut coordinator = Coordinator::new(devices, state);

    coordinator.run_once().await;

    let devices = coordinator.into_devices();
    assert!(devices.console.output().contains("1,2,3"));
    assert!(devices.screen.texts.iter().any(|t| t == "Reading"));
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[futures_test::test]
async fn getfree_reports_the_default_volume() {
    let state = leak_state();
    // 8 sectors of 512 bytes per cluster: 4 KiB each, two reserved entries.
    let volume = MemVolume::mounted_with_free(VolumeSpace {
        total_clusters: 250_002,
        free_clusters: 62_500,
        cluster_sectors: 8,
    });
    let mut devices = make_devices(state, volume, 0);

    dispatch_line("getfree", &mut devices, state).await;

    let output = devices.console.output();
    assert!(output.contains("1000000 KiB total drive space."));
    assert!(output.contains("250000 KiB available."));
    assert_eq!(default_volume(&mut devices).free_space_calls, 1);
}

#[futures_test::test]
async fn getfree_routes_to_the_named_volume() {
    let state = leak_state();
    let mut devices = make_devices(state, MemVolume::mounted_with_free(VolumeSpace::default()), 0);
    devices
        .volumes
        .register(
            "sd1",
            MemVolume::mounted_with_free(VolumeSpace {
                total_clusters: 127,
                free_clusters: 25,
                cluster_sectors: 8,
            }),
        )
        .ok()
        .unwrap();

    dispatch_line("getfree sd1", &mut devices, state).await;

    assert!(devices.console.output().contains("500 KiB total"));
    assert_eq!(devices.volumes.resolve(Some("sd1")).unwrap().1.free_space_calls, 1);
    assert_eq!(devices.volumes.resolve(Some("sd0")).unwrap().1.free_space_calls, 0);
}

#[futures_test::test]
async fn unknown_volume_is_reported() {
    let state = leak_state();
    let mut devices = make_devices(state, MemVolume::default(), 0);

    dispatch_line("getfree sd9", &mut devices, state).await;

    assert!(devices.console.output().contains("Unknown volume \"sd9\""));
}

#[futures_test::test]
async fn unknown_command_is_reported() {
    let state = leak_state();
    let mut devices = make_devices(state, MemVolume::default(), 0);

    dispatch_line("bogus arg", &mut devices, state).await;

    assert!(devices
        .console
        .output()
        .contains("Command \"bogus\" not found"));
}

#[futures_test::test]
async fn setrtc_sets_the_clock() {
    let state = leak_state();
    let mut devices = make_devices(state, MemVolume::default(), 0);

    dispatch_line("setrtc 17 3 25 14 30 0", &mut devices, state).await;

    assert_eq!(
        devices.clock.settings,
        vec![ClockSetting {
            year: 2025,
            month: 3,
            day: 17,
            hour: 14,
            minute: 30,
            second: 0,
        }]
    );
    assert!(devices.console.output().contains("RTC updated"));
}

#[futures_test::test]
async fn setrtc_missing_argument_is_reported() {
    let state = leak_state();
    let mut devices = make_devices(state, MemVolume::default(), 0);

    dispatch_line("setrtc 17 3", &mut devices, state).await;

    assert!(devices.console.output().contains("Missing argument <YY>"));
    assert!(devices.clock.settings.is_empty());
}

#[futures_test::test]
async fn setrtc_rejects_non_numeric_arguments() {
    let state = leak_state();
    let mut devices = make_devices(state, MemVolume::default(), 0);

    dispatch_line("setrtc aa 3 25 14 30 0", &mut devices, state).await;

    assert!(devices.console.output().contains("Invalid argument <DD>"));
    assert!(devices.clock.settings.is_empty());
}

#[futures_test::test]
async fn setrtc_rejects_impossible_dates() {
    let state = leak_state();
    let mut devices = make_devices(state, MemVolume::default(), 0);
    devices.clock.reject = true;

    dispatch_line("setrtc 31 2 25 14 30 0", &mut devices, state).await;

    assert!(devices.console.output().contains("setrtc: invalid date/time"));
}

#[futures_test::test]
async fn cat_streams_file_content() {
    let state = leak_state();
    let mut volume = MemVolume::mounted_with_free(VolumeSpace::default());
    volume
        .files
        .push(("notes.txt".to_owned(), b"hello from the card".to_vec()));
    let mut devices = make_devices(state, volume, 0);

    dispatch_line("cat notes.txt", &mut devices, state).await;

    assert!(devices.console.output().contains("hello from the card"));
}

#[futures_test::test]
async fn cat_missing_file_is_reported() {
    let state = leak_state();
    let mut devices = make_devices(state, MemVolume::mounted_with_free(VolumeSpace::default()), 0);

    dispatch_line("cat nope.txt", &mut devices, state).await;

    let devices_output = devices.console.output();
    assert!(devices_output.contains("cat error: not found (1)"));
    assert!(devices.buzzer.tones.contains(&(400, 500)));
}

#[futures_test::test]
async fn format_is_confirmed_with_a_chime() {
    let state = leak_state();
    let mut devices = make_devices(state, MemVolume::mounted_with_free(VolumeSpace::default()), 0);

    dispatch_line("format", &mut devices, state).await;

    assert_eq!(default_volume(&mut devices).format_calls, 1);
    let output = devices.console.output();
    assert!(output.contains("Formatting volume \"sd0\""));
    assert!(output.contains("Format complete"));
    assert_eq!(
        devices.buzzer.tones,
        vec![(1000, 150), (700, 150), (500, 200)]
    );
}

#[futures_test::test]
async fn mount_command_reflects_backend_failure() {
    let state = leak_state();
    let mut volume = MemVolume::default();
    volume.mount_error = Some(VolumeError::BadFormat);
    let mut devices = make_devices(state, volume, 0);

    dispatch_line("mount", &mut devices, state).await;

    assert!(!state.volume_mounted());
    assert!(devices
        .console
        .output()
        .contains("mount error: no recognisable filesystem (3)"));
}

#[futures_test::test]
async fn redundant_mount_and_unmount_report_the_backend_result() {
    let state = leak_state();
    let mut devices = make_devices(state, MemVolume::default(), 0);

    dispatch_line("unmount", &mut devices, state).await;
    assert!(devices
        .console
        .output()
        .contains("unmount error: volume not mounted (10)"));
    assert!(!state.volume_mounted());

    dispatch_line("mount", &mut devices, state).await;
    assert!(state.volume_mounted());

    dispatch_line("mount", &mut devices, state).await;
    assert!(devices
        .console
        .output()
        .contains("mount error: volume already mounted (11)"));
    assert!(state.volume_mounted());
}

#[futures_test::test]
async fn help_lists_every_command() {
    let state = leak_state();
    let mut devices = make_devices(state, MemVolume::default(), 0);

    dispatch_line("help", &mut devices, state).await;

    let output = devices.console.output();
    for name in ["setrtc", "format", "mount", "unmount", "getfree", "ls", "cat", "help"] {
        assert!(output.contains(name), "help output missing {}", name);
    }
    assert!(output.contains("Button A toggles recording"));
}

// ---------------------------------------------------------------------------
// Startup
// ---------------------------------------------------------------------------

#[futures_test::test]
async fn startup_prints_banner_help_and_prompt() {
    let state = leak_state();
    let devices = make_devices(state, MemVolume::default(), 0);
    let mut coordinator = Coordinator::new(devices, state);

    coordinator.startup("motlog 0.1.0").await;

    let devices = coordinator.into_devices();
    let output = devices.console.output();
    assert!(output.starts_with("motlog 0.1.0"));
    assert!(output.contains("Available commands:"));
    assert!(output.ends_with("> "));
    assert!(devices.screen.texts.iter().any(|t| t == "Starting..."));
    assert!(devices.screen.clears > 0);
    assert_eq!(devices.leds.states.first(), Some(&LedState::Init));
}
