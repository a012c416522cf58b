//! Tests for the pure pieces: record formatting, debouncing, the volume
//! registry and the console line editor.

use std::collections::VecDeque;

use motlog_core::{
    format_record, Console, DebounceGate, LineEditor, RawSample, VolumeSet, CSV_HEADER,
    DEBOUNCE_WINDOW_US, LINE_CAPACITY, PROMPT,
};

// ---------------------------------------------------------------------------
// Record formatting
// ---------------------------------------------------------------------------

#[test]
fn header_matches_expected_layout() {
    assert_eq!(
        CSV_HEADER,
        "numero_amostra,accel_x,accel_y,accel_z,giro_x,giro_y,giro_z\n"
    );
}

#[test]
fn full_scale_sample_formats_with_four_decimals() {
    let sample = RawSample {
        accel: [16384, -16384, 0],
        gyro: [131, -131, 0],
        temp: 0,
    };
    assert_eq!(
        format_record(1, &sample).as_str(),
        "1,1.0000,-1.0000,0.0000,1.0000,-1.0000,0.0000\n"
    );
}

#[test]
fn fractional_values_round_to_four_decimals() {
    let sample = RawSample {
        accel: [8192, 0, 0],
        gyro: [262, 0, 0],
        temp: 0,
    };
    assert_eq!(
        format_record(7, &sample).as_str(),
        "7,0.5000,0.0000,0.0000,2.0000,0.0000,0.0000\n"
    );
}

#[test]
fn sample_index_is_preserved_verbatim() {
    let sample = RawSample::default();
    let row = format_record(123456, &sample);
    assert!(row.starts_with("123456,"));
    assert!(row.ends_with('\n'));
}

// ---------------------------------------------------------------------------
// Debounce gate
// ---------------------------------------------------------------------------

#[test]
fn first_press_is_always_accepted() {
    let mut gate = DebounceGate::default();
    assert!(gate.accept(5_000));
}

#[test]
fn presses_inside_the_window_are_rejected() {
    let mut gate = DebounceGate::default();
    assert!(gate.accept(0));
    assert!(!gate.accept(DEBOUNCE_WINDOW_US - 1));
}

#[test]
fn press_exactly_at_the_window_edge_is_accepted() {
    let mut gate = DebounceGate::default();
    assert!(gate.accept(0));
    assert!(gate.accept(DEBOUNCE_WINDOW_US));
}

#[test]
fn rejected_presses_do_not_stretch_the_window() {
    let mut gate = DebounceGate::default();
    assert!(gate.accept(0));
    assert!(!gate.accept(400_000));
    // The window is measured from the last accepted press, not the last
    // attempt.
    assert!(gate.accept(DEBOUNCE_WINDOW_US));
}

#[test]
fn gates_are_independent_per_button() {
    let mut record_gate = DebounceGate::default();
    let mut volume_gate = DebounceGate::default();
    assert!(record_gate.accept(100));
    // A press on the other button lands inside the first one's window and
    // must still pass.
    assert!(volume_gate.accept(200));
}

// ---------------------------------------------------------------------------
// Volume registry
// ---------------------------------------------------------------------------

#[test]
fn first_registered_volume_is_the_default() {
    let mut set: VolumeSet<u8> = VolumeSet::new();
    set.register("sd0", 10).unwrap();
    set.register("sd1", 20).unwrap();
    let (name, value) = set.resolve(None).unwrap();
    assert_eq!(name, "sd0");
    assert_eq!(*value, 10);
}

#[test]
fn volumes_resolve_by_name() {
    let mut set: VolumeSet<u8> = VolumeSet::new();
    set.register("sd0", 10).unwrap();
    set.register("sd1", 20).unwrap();
    let (name, value) = set.resolve(Some("sd1")).unwrap();
    assert_eq!(name, "sd1");
    assert_eq!(*value, 20);
}

#[test]
fn unknown_names_do_not_resolve() {
    let mut set: VolumeSet<u8> = VolumeSet::new();
    set.register("sd0", 10).unwrap();
    assert!(set.resolve(Some("sd9")).is_none());
}

#[test]
fn registry_rejects_volumes_beyond_capacity() {
    let mut set: VolumeSet<u8> = VolumeSet::new();
    set.register("sd0", 0).unwrap();
    set.register("sd1", 1).unwrap();
    assert_eq!(set.register("sd2", 2), Err(2));
}

// ---------------------------------------------------------------------------
// Line editor
// ---------------------------------------------------------------------------

struct EchoConsole {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
}

impl EchoConsole {
    fn new() -> Self {
        Self {
            rx: VecDeque::new(),
            tx: Vec::new(),
        }
    }

    fn output(&self) -> String {
        String::from_utf8_lossy(&self.tx).into_owned()
    }
}

impl Console for EchoConsole {
    type Error = core::convert::Infallible;

    fn poll_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    async fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.tx.extend_from_slice(bytes);
        Ok(())
    }
}

async fn feed_str(editor: &mut LineEditor, console: &mut EchoConsole, s: &str) -> Option<String> {
    let mut completed = None;
    for byte in s.bytes() {
        if let Some(line) = editor.feed(byte, console).await {
            completed = Some(line.as_str().to_owned());
        }
    }
    completed
}

#[futures_test::test]
async fn printable_bytes_are_echoed_and_buffered() {
    let mut editor = LineEditor::new();
    let mut console = EchoConsole::new();
    let line = feed_str(&mut editor, &mut console, "mount sd0\r").await;
    assert_eq!(line.as_deref(), Some("mount sd0"));
    assert_eq!(console.output(), "mount sd0\r\n");
}

#[futures_test::test]
async fn empty_line_reprints_the_prompt() {
    let mut editor = LineEditor::new();
    let mut console = EchoConsole::new();
    let line = feed_str(&mut editor, &mut console, "\r").await;
    assert!(line.is_none());
    assert_eq!(console.output(), format!("\r\n{}", PROMPT));
}

#[futures_test::test]
async fn backspace_removes_the_last_byte() {
    let mut editor = LineEditor::new();
    let mut console = EchoConsole::new();
    let line = feed_str(&mut editor, &mut console, "ab\x08c\r").await;
    assert_eq!(line.as_deref(), Some("ac"));
}

#[futures_test::test]
async fn delete_behaves_like_backspace() {
    let mut editor = LineEditor::new();
    let mut console = EchoConsole::new();
    let line = feed_str(&mut editor, &mut console, "ab\x7fc\r").await;
    assert_eq!(line.as_deref(), Some("ac"));
}

#[futures_test::test]
async fn control_bytes_are_discarded() {
    let mut editor = LineEditor::new();
    let mut console = EchoConsole::new();
    let line = feed_str(&mut editor, &mut console, "a\x01\x1bb\r").await;
    assert_eq!(line.as_deref(), Some("ab"));
    // Discarded bytes are not echoed either.
    assert_eq!(console.output(), "ab\r\n");
}

#[futures_test::test]
async fn bytes_beyond_capacity_are_dropped() {
    let mut editor = LineEditor::new();
    let mut console = EchoConsole::new();
    for _ in 0..LINE_CAPACITY + 20 {
        assert!(editor.feed(b'a', &mut console).await.is_none());
    }
    let line = editor.feed(b'\r', &mut console).await.unwrap();
    assert_eq!(line.len(), LINE_CAPACITY);
}

#[futures_test::test]
async fn line_is_cleared_after_completion() {
    let mut editor = LineEditor::new();
    let mut console = EchoConsole::new();
    feed_str(&mut editor, &mut console, "first\r").await;
    assert!(editor.is_empty());
    let line = feed_str(&mut editor, &mut console, "second\r").await;
    assert_eq!(line.as_deref(), Some("second"));
}
