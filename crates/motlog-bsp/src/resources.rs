use crate::board::{
    ConsoleResources, DisplayBusResources, ImuBusResources, SdCardResources,
};
use embassy_nrf::{
    bind_interrupts,
    buffered_uarte::{self, BufferedUarte},
    gpio::{Level, Output, OutputDrive},
    interrupt::{self, InterruptExt},
    peripherals, spim, twim, uarte,
};
use embedded_hal_bus::spi::ExclusiveDevice;
use embedded_sdmmc::SdCard;
use mpu_6050::Mpu6050;
use static_cell::ConstStaticCell;

/// Motion sensor driver over its dedicated I2C bus.
pub type Imu<'a> = Mpu6050<twim::Twim<'a>, embassy_time::Delay>;

/// SD card driver over its dedicated SPI bus.
pub type Card<'a> = SdCard<
    ExclusiveDevice<spim::Spim<'a>, Output<'a>, embassy_time::Delay>,
    embassy_time::Delay,
>;

bind_interrupts!(struct TwimIrqs {
    TWISPI0 => twim::InterruptHandler<peripherals::TWISPI0>;
    TWISPI1 => twim::InterruptHandler<peripherals::TWISPI1>;
});

bind_interrupts!(struct SpiIrq {
    SPI2 => spim::InterruptHandler<peripherals::SPI2>;
});

bind_interrupts!(struct UarteIrq {
    UARTE0_UART0 => buffered_uarte::InterruptHandler<peripherals::UARTE0>;
});

impl ImuBusResources {
    /// Brings up the sensor I2C bus and returns the motion sensor driver.
    pub fn configure<'a>(&'a mut self) -> Imu<'a> {
        let config = twim::Config::default();
        interrupt::TWISPI0.set_priority(interrupt::Priority::P3);
        static RAM_BUFFER: ConstStaticCell<[u8; 32]> =
            ConstStaticCell::new([0; 32]);

        let bus = twim::Twim::new(
            self.twim.reborrow(),
            TwimIrqs,
            self.sda.reborrow(),
            self.scl.reborrow(),
            config,
            RAM_BUFFER.take(),
        );
        Mpu6050::new(bus, embassy_time::Delay)
    }
}

impl DisplayBusResources {
    /// Brings up the display I2C bus. The display driver stack lives in the
    /// application; only the bus is a board concern.
    pub fn get_bus<'a>(&'a mut self) -> twim::Twim<'a> {
        let config = twim::Config::default();
        interrupt::TWISPI1.set_priority(interrupt::Priority::P3);
        static RAM_BUFFER: ConstStaticCell<[u8; 32]> =
            ConstStaticCell::new([0; 32]);

        twim::Twim::new(
            self.twim.reborrow(),
            TwimIrqs,
            self.sda.reborrow(),
            self.scl.reborrow(),
            config,
            RAM_BUFFER.take(),
        )
    }
}

impl ConsoleResources {
    /// Brings up the console UART at 115200 8N1.
    pub fn configure<'a>(&'a mut self) -> BufferedUarte<'a> {
        let mut config = uarte::Config::default();
        config.baudrate = uarte::Baudrate::BAUD115200;
        config.parity = uarte::Parity::EXCLUDED;
        interrupt::UARTE0_UART0.set_priority(interrupt::Priority::P3);

        static RX_BUFFER: ConstStaticCell<[u8; 256]> =
            ConstStaticCell::new([0; 256]);
        static TX_BUFFER: ConstStaticCell<[u8; 256]> =
            ConstStaticCell::new([0; 256]);

        BufferedUarte::new(
            self.uarte.reborrow(),
            self.timer.reborrow(),
            self.ppi_ch0.reborrow(),
            self.ppi_ch1.reborrow(),
            self.ppi_group.reborrow(),
            UarteIrq,
            self.rxd.reborrow(),
            self.txd.reborrow(),
            config,
            RX_BUFFER.take(),
            TX_BUFFER.take(),
        )
    }
}

impl SdCardResources {
    pub fn get_card<'a>(&'a mut self) -> Card<'a> {
        let mut config = spim::Config::default();
        config.mode = spim::MODE_0;
        // Cards must be clocked below 400 kHz until they are initialised,
        // and the bus speed is fixed for the driver's lifetime.
        config.frequency = spim::Frequency::K250;
        interrupt::SPI2.set_priority(interrupt::Priority::P3);

        let cs_pin = Output::new(
            self.cs.reborrow(),
            Level::High,
            OutputDrive::Standard,
        );

        let spi = spim::Spim::new(
            self.spim.reborrow(),
            SpiIrq,
            self.sclk.reborrow(),
            self.miso.reborrow(),
            self.mosi.reborrow(),
            config,
        );

        let spi = ExclusiveDevice::new(spi, cs_pin, embassy_time::Delay)
            .expect("Failed to create SD card spi device.");
        SdCard::new(spi, embassy_time::Delay)
    }
}
