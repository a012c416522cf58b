use heapless::String;

/// Prompt printed whenever the console is ready for a command.
pub const PROMPT: &str = "> ";

/// ANSI sequence that clears the terminal and homes the cursor.
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Maximum length of one command line.
pub const LINE_CAPACITY: usize = 256;

/// Byte-oriented operator console.
///
/// Reception is polled so the coordinator can interleave console input with
/// its other duties; transmission is async and assumed to be ordered.
pub trait Console {
    type Error: core::fmt::Debug;

    /// Returns the next received byte, if one is waiting.
    fn poll_byte(&mut self) -> Option<u8>;

    async fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Best-effort string output. Console failures are not worth stalling
    /// the appliance over, so errors are swallowed.
    async fn print(&mut self, s: &str) {
        let _ = self.write(s.as_bytes()).await;
    }

    /// Best-effort formatted output, staged through a bounded buffer.
    async fn print_fmt(&mut self, args: core::fmt::Arguments<'_>) {
        let mut staged: String<LINE_CAPACITY> = String::new();
        let _ = core::fmt::write(&mut staged, args);
        let _ = self.write(staged.as_bytes()).await;
    }
}

/// Accumulates console bytes into command lines.
///
/// Printable and whitespace bytes are echoed and buffered, backspace and
/// delete echo and drop the last byte, carriage return terminates the
/// line. Anything else is discarded. Bytes beyond the line capacity are
/// echoed but not stored.
pub struct LineEditor {
    buf: String<LINE_CAPACITY>,
}

impl LineEditor {
    pub const fn new() -> Self {
        Self { buf: String::new() }
    }

    /// True when no bytes have been buffered on the current line.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Feeds one received byte. Returns the completed line when `byte` is a
    /// carriage return and the buffer is non-empty; the buffer is left
    /// empty afterwards. A carriage return on an empty line just reprints
    /// the prompt.
    pub async fn feed<C: Console>(&mut self, byte: u8, console: &mut C) -> Option<String<LINE_CAPACITY>> {
        match byte {
            b'\r' => {
                console.print("\r\n").await;
                if self.buf.is_empty() {
                    console.print(PROMPT).await;
                    None
                } else {
                    Some(core::mem::take(&mut self.buf))
                }
            }
            0x08 | 0x7f => {
                let _ = console.write(&[byte]).await;
                self.buf.pop();
                None
            }
            b if b.is_ascii_graphic() || b.is_ascii_whitespace() => {
                let _ = console.write(&[b]).await;
                let _ = self.buf.push(b as char);
                None
            }
            _ => None,
        }
    }
}

impl Default for LineEditor {
    fn default() -> Self {
        Self::new()
    }
}
