use embassy_nrf::twim::Twim;
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use motlog_core::Screen;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};

/// The panel did not acknowledge a buffer transfer.
#[derive(Debug, Clone, Copy)]
pub struct FlushError;

type Display = Ssd1306<
    I2CInterface<Twim<'static>>,
    DisplaySize128x64,
    BufferedGraphicsMode<DisplaySize128x64>,
>;

/// 128x64 SSD1306 status panel on its own I2C bus.
pub struct OledScreen {
    display: Display,
}

impl OledScreen {
    pub fn new(bus: Twim<'static>) -> Self {
        let interface = I2CDisplayInterface::new(bus);
        let display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        Self { display }
    }

    /// One-time panel setup. The appliance keeps running headless when
    /// this fails; later flushes are swallowed by the drawing helpers.
    pub fn init(&mut self) -> Result<(), FlushError> {
        self.display.init().map_err(|_| FlushError)
    }
}

impl Screen for OledScreen {
    type Error = FlushError;

    fn clear(&mut self) {
        self.display.clear_buffer();
    }

    fn rect(&mut self, x: i32, y: i32, width: u32, height: u32) {
        let outline = Rectangle::new(Point::new(x, y), Size::new(width, height))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1));
        let _ = outline.draw(&mut self.display);
    }

    fn text(&mut self, text: &str, x: i32, y: i32) {
        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        let _ = Text::with_baseline(text, Point::new(x, y), style, Baseline::Top)
            .draw(&mut self.display);
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.display.flush().map_err(|_| FlushError)
    }
}
