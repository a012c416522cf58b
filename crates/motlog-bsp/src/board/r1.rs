use embassy_nrf::interrupt::Priority;
use embassy_nrf::peripherals::{
    self, NVMC, P0_16, PWM0, RNG, RTC2, SAADC, TIMER0, TIMER2, WDT,
};
use embassy_nrf::Peri;

/// Pins for the two user buttons. Both are active low with external
/// pull-ups on the board.
pub struct ButtonResources {
    /// Record button: starts and stops a logging session.
    pub record: Peri<'static, peripherals::P0_11>,
    /// Volume button: mounts and unmounts the SD card.
    pub volume: Peri<'static, peripherals::P0_12>,
}

/// Pins for the common-cathode RGB status LED.
pub struct RgbLedResources {
    pub red: Peri<'static, peripherals::P0_13>,
    pub green: Peri<'static, peripherals::P0_14>,
    pub blue: Peri<'static, peripherals::P0_15>,
}

/// Peripherals for the line console UART.
pub struct ConsoleResources {
    pub uarte: Peri<'static, peripherals::UARTE0>,
    /// Timer used by the buffered UART driver for RX idle detection.
    pub timer: Peri<'static, peripherals::TIMER1>,
    pub ppi_ch0: Peri<'static, peripherals::PPI_CH0>,
    pub ppi_ch1: Peri<'static, peripherals::PPI_CH1>,
    pub ppi_group: Peri<'static, peripherals::PPI_GROUP0>,
    pub rxd: Peri<'static, peripherals::P0_08>,
    pub txd: Peri<'static, peripherals::P0_06>,
}

/// Peripherals for the I2C bus carrying the motion sensor.
pub struct ImuBusResources {
    pub twim: Peri<'static, peripherals::TWISPI0>,
    pub sda: Peri<'static, peripherals::P0_26>,
    pub scl: Peri<'static, peripherals::P0_27>,
}

/// Peripherals for the I2C bus carrying the OLED display.
pub struct DisplayBusResources {
    pub twim: Peri<'static, peripherals::TWISPI1>,
    pub sda: Peri<'static, peripherals::P1_08>,
    pub scl: Peri<'static, peripherals::P1_09>,
}

/// Peripherals for the SD card SPI bus.
pub struct SdCardResources {
    pub sclk: Peri<'static, peripherals::P0_19>,
    pub mosi: Peri<'static, peripherals::P0_20>,
    pub miso: Peri<'static, peripherals::P0_21>,
    pub cs: Peri<'static, peripherals::P0_22>,
    /// Card-detect switch in the socket, active low.
    pub detect: Peri<'static, peripherals::P0_23>,
    pub spim: Peri<'static, peripherals::SPI2>,
}

/// Represents all the peripherals and pins available on the motlog board.
pub struct Motlog {
    /// User buttons.
    pub buttons: ButtonResources,
    /// RGB status LED.
    pub rgb_led: RgbLedResources,
    /// Pin driving the piezo buzzer.
    pub buzzer: Peri<'static, P0_16>,
    /// Peripherals for the console UART.
    pub console_resources: ConsoleResources,
    /// Peripherals for the motion sensor I2C bus.
    pub imu_bus_resources: ImuBusResources,
    /// Peripherals for the display I2C bus.
    pub display_bus_resources: DisplayBusResources,
    /// Peripherals for the SD card.
    pub sd_card_resources: SdCardResources,
    /// Watchdog Timer.
    pub wdt: Peri<'static, WDT>,
    /// Real-Time Clock 2.
    pub rtc2: Peri<'static, RTC2>,
    /// Non-Volatile Memory Controller.
    pub nvmc: Peri<'static, NVMC>,
    /// Random Number Generator.
    pub rng: Peri<'static, RNG>,
    /// Successive Approximation Analog-to-Digital Converter.
    pub saadc: Peri<'static, SAADC>,
    /// Pulse-Width Modulation 0.
    pub pwm0: Peri<'static, PWM0>,
    /// Timer 0.
    pub timer0: Peri<'static, TIMER0>,
    /// Timer 2.
    pub timer2: Peri<'static, TIMER2>,
}

impl Default for Motlog {
    fn default() -> Self {
        let mut config = embassy_nrf::config::Config::default();
        config.gpiote_interrupt_priority = Priority::P2;
        config.time_interrupt_priority = Priority::P2;
        Self::new(config)
    }
}

impl Motlog {
    /// Create a new instance based on HAL configuration
    pub fn new(config: embassy_nrf::config::Config) -> Self {
        let p = embassy_nrf::init(config);

        Self {
            buttons: ButtonResources { record: p.P0_11, volume: p.P0_12 },
            rgb_led: RgbLedResources {
                red: p.P0_13,
                green: p.P0_14,
                blue: p.P0_15,
            },
            buzzer: p.P0_16,
            console_resources: ConsoleResources {
                uarte: p.UARTE0,
                timer: p.TIMER1,
                ppi_ch0: p.PPI_CH0,
                ppi_ch1: p.PPI_CH1,
                ppi_group: p.PPI_GROUP0,
                rxd: p.P0_08,
                txd: p.P0_06,
            },
            imu_bus_resources: ImuBusResources {
                twim: p.TWISPI0,
                sda: p.P0_26,
                scl: p.P0_27,
            },
            display_bus_resources: DisplayBusResources {
                twim: p.TWISPI1,
                sda: p.P1_08,
                scl: p.P1_09,
            },
            sd_card_resources: SdCardResources {
                sclk: p.P0_19,
                mosi: p.P0_20,
                miso: p.P0_21,
                cs: p.P0_22,
                detect: p.P0_23,
                spim: p.SPI2,
            },
            wdt: p.WDT,
            rtc2: p.RTC2,
            nvmc: p.NVMC,
            rng: p.RNG,
            saadc: p.SAADC,
            pwm0: p.PWM0,
            timer0: p.TIMER0,
            timer2: p.TIMER2,
        }
    }
}
