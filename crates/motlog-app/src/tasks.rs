use embassy_nrf::buffered_uarte::BufferedUarteRx;
use embassy_nrf::gpio::{AnyPin, Input, Pull};
use embassy_nrf::peripherals::WDT;
use embassy_nrf::wdt::{self, Watchdog};
use embassy_nrf::Peri;
use embassy_time::{Duration, Instant, Timer};
use embedded_io_async::Read;
use motlog_core::{Coordinator, DebounceGate, Devices, SystemState};

use crate::io::{NrfPlatform, RxQueue};
use crate::{error, info, warn};

// Keeps the appliance alive
#[embassy_executor::task]
pub async fn watchdog_task(wdt: Peri<'static, WDT>) {
    let mut wdt_config = wdt::Config::default();
    wdt_config.timeout_ticks = 32768 * 5; // 5 seconds
    let (_wdt, [mut handle]) = match Watchdog::try_new(wdt, wdt_config) {
        Ok(x) => x,
        Err(_) => {
            error!("Watchdog already running with a different layout, waiting for reset");
            loop {
                cortex_m::asm::wfe();
            }
        }
    };
    loop {
        handle.pet();
        Timer::after(Duration::from_secs(2)).await;
    }
}

/// Record button: each accepted press flips the recording request.
#[embassy_executor::task]
pub async fn button_record_task(btn_pin: Peri<'static, AnyPin>, state: &'static SystemState) {
    let mut button = Input::new(btn_pin, Pull::Up);
    let mut gate = DebounceGate::default();
    loop {
        button.wait_for_falling_edge().await;
        if !gate.accept(Instant::now().as_micros()) {
            continue;
        }
        let requested = state.toggle_logging_requested();
        info!("Record button pressed, logging_requested={}", requested);
    }
}

/// Volume button: each accepted press queues a mount/unmount toggle for
/// the coordinator.
#[embassy_executor::task]
pub async fn button_volume_task(btn_pin: Peri<'static, AnyPin>, state: &'static SystemState) {
    let mut button = Input::new(btn_pin, Pull::Up);
    let mut gate = DebounceGate::default();
    loop {
        button.wait_for_falling_edge().await;
        if !gate.accept(Instant::now().as_micros()) {
            continue;
        }
        state.request_volume_toggle();
        info!("Volume button pressed");
    }
}

/// Drains the UARTE into the console byte queue the coordinator polls.
#[embassy_executor::task]
pub async fn console_rx_task(mut rx: BufferedUarteRx<'static>, queue: &'static RxQueue) {
    let mut buf = [0u8; 16];
    loop {
        match rx.read(&mut buf).await {
            Ok(n) => {
                for &byte in &buf[..n] {
                    queue.send(byte).await;
                }
            }
            Err(_) => {
                warn!("Console RX error");
                Timer::after_millis(10).await;
            }
        }
    }
}

#[embassy_executor::task]
pub async fn coordinator_task(devices: Devices<NrfPlatform>, state: &'static SystemState) {
    let mut coordinator = Coordinator::new(devices, state);
    coordinator
        .run(concat!("motlog ", env!("FW_VERSION")))
        .await
}
