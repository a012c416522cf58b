use heapless::String;

/// Display width in pixels.
pub const SCREEN_WIDTH: u32 = 128;
/// Display height in pixels.
pub const SCREEN_HEIGHT: u32 = 64;

/// Inset of the status panel border from the display edge.
const BORDER_INSET: i32 = 3;

/// Monochrome status display.
///
/// Drawing happens into an off-screen buffer; nothing reaches the panel
/// until [`Screen::flush`]. Buffered drawing cannot fail, only the flush
/// can.
pub trait Screen {
    type Error: core::fmt::Debug;

    /// Clears the draw buffer.
    fn clear(&mut self);

    /// Draws a 1-pixel rectangle outline.
    fn rect(&mut self, x: i32, y: i32, width: u32, height: u32);

    /// Draws `text` with its top-left corner at (`x`, `y`).
    fn text(&mut self, text: &str, x: i32, y: i32);

    /// Pushes the draw buffer to the panel.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Draws the standard bordered status panel: up to two short lines inside
/// a frame. The flush is best-effort; a dead display must not take the
/// appliance down with it.
pub fn show_status<S: Screen>(screen: &mut S, line1: &str, line2: Option<&str>) {
    screen.clear();
    screen.rect(
        BORDER_INSET,
        BORDER_INSET,
        SCREEN_WIDTH - 2 * BORDER_INSET as u32,
        SCREEN_HEIGHT - 2 * BORDER_INSET as u32,
    );
    screen.text(line1, 10, 20);
    if let Some(line2) = line2 {
        screen.text(line2, 30, 30);
    }
    let _ = screen.flush();
}

/// Draws the borderless recording screen with a live sample count.
pub fn show_recording<S: Screen>(screen: &mut S, samples: u32) {
    use core::fmt::Write;

    let mut count: String<24> = String::new();
    let _ = write!(count, "Samples: {}", samples);

    screen.clear();
    screen.text("Recording...", 10, 20);
    screen.text(&count, 10, 35);
    let _ = screen.flush();
}
