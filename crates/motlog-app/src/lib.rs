#![no_std]
#![feature(type_alias_impl_trait)]
#![feature(impl_trait_in_assoc_type)]

mod clock;
pub mod io;
pub mod tasks;
mod util;

use motlog_core::SystemState;

pub const HW_VERSION: &str = env!("HW_VERSION");
pub const FW_VERSION: &str = env!("FW_VERSION");

/// Wall-clock time, anchored by the `setrtc` console command.
pub static CLOCK: clock::Clock = clock::Clock::new();

/// Flags shared between the button tasks and the coordinator.
pub static SYSTEM_STATE: SystemState = SystemState::new();

pub mod prelude {
    pub use super::{
        error, info, io::*, tasks::*, warn, CLOCK, FW_VERSION, HW_VERSION,
        SYSTEM_STATE,
    };
    pub use embassy_executor::Spawner;
    pub use embassy_nrf::gpio::Pin;
    pub use embassy_time::{Duration, Timer};

    pub use motlog_bsp::{
        ButtonResources, ConsoleResources, DisplayBusResources,
        ImuBusResources, Motlog, RgbLedResources, SdCardResources,
    };
    pub use motlog_core::{
        Coordinator, Devices, SystemState, VolumeSet,
    };
}
