#![no_std]
#![no_main]
#![feature(type_alias_impl_trait)]
#![feature(impl_trait_in_assoc_type)]

use embassy_executor::Spawner;
use static_cell::StaticCell;

#[cfg(feature = "defmt")]
use defmt_rtt as _;
#[cfg(feature = "defmt")]
use panic_probe as _;
#[cfg(not(feature = "defmt"))]
use panic_reset as _;

use motlog_app::prelude::*;

// The bus and driver structs are parked in statics so the configure
// methods hand out drivers that live for the rest of the firmware.
static CONSOLE_RESOURCES: StaticCell<ConsoleResources> = StaticCell::new();
static IMU_BUS_RESOURCES: StaticCell<ImuBusResources> = StaticCell::new();
static DISPLAY_BUS_RESOURCES: StaticCell<DisplayBusResources> = StaticCell::new();
static SD_CARD_RESOURCES: StaticCell<SdCardResources> = StaticCell::new();
static SD_CARD: StaticCell<AppCard> = StaticCell::new();
static RX_QUEUE: RxQueue = RxQueue::new();

// Application main entry point. The spawner can be used to start async tasks.
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("In main!");
    // First we initialize our board.
    let board = Motlog::default();

    spawner.must_spawn(watchdog_task(board.wdt));

    let imu_bus_resources = IMU_BUS_RESOURCES.init(board.imu_bus_resources);
    let sensor = ImuSensor::new(imu_bus_resources.configure());

    let display_bus_resources =
        DISPLAY_BUS_RESOURCES.init(board.display_bus_resources);
    let mut screen = OledScreen::new(display_bus_resources.get_bus());
    if screen.init().is_err() {
        // Keep going headless; the drawing helpers swallow flush errors.
        warn!("Display init failed");
    }

    let console_resources = CONSOLE_RESOURCES.init(board.console_resources);
    let (rx, tx) = console_resources.configure().split();
    let console = SerialConsole::new(tx, RX_QUEUE.receiver());
    spawner.must_spawn(console_rx_task(rx, &RX_QUEUE));

    let sd_card_resources = SD_CARD_RESOURCES.init(board.sd_card_resources);
    let card = SD_CARD.init(sd_card_resources.get_card());
    let mut volumes = VolumeSet::new();
    volumes.register("sd0", SdVolume::new(card)).ok().unwrap();

    spawner.must_spawn(button_record_task(
        board.buttons.record.into(),
        &SYSTEM_STATE,
    ));
    spawner.must_spawn(button_volume_task(
        board.buttons.volume.into(),
        &SYSTEM_STATE,
    ));

    let devices = Devices::<NrfPlatform> {
        volumes,
        sensor,
        screen,
        console,
        leds: RgbLed::new(
            board.rgb_led.red.into(),
            board.rgb_led.green.into(),
            board.rgb_led.blue.into(),
        ),
        buzzer: PinBuzzer::new(board.buzzer.into()),
        clock: SystemClock,
        delay: embassy_time::Delay,
    };
    spawner.must_spawn(coordinator_task(devices, &SYSTEM_STATE));
}
