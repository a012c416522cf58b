use embedded_hal_async::delay::DelayNs;

use crate::clock::WallClock;
use crate::console::Console;
use crate::feedback::{Buzzer, Leds};
use crate::screen::Screen;
use crate::sensor::MotionSensor;
use crate::volume::{VolumeService, VolumeSet};

/// The set of collaborators a deployment provides.
///
/// The firmware implements this over the real peripherals; the tests
/// implement it over mocks. Bundling the associated types here keeps the
/// coordinator generic over exactly one parameter.
pub trait Platform {
    type Volume: VolumeService;
    type Sensor: MotionSensor;
    type Screen: Screen;
    type Console: Console;
    type Leds: Leds;
    type Buzzer: Buzzer;
    type Clock: WallClock;
    type Delay: DelayNs;
}

/// Owned collaborator instances for one platform.
///
/// Fields are public so command handlers can borrow several collaborators
/// at once without going through accessors.
pub struct Devices<P: Platform> {
    pub volumes: VolumeSet<P::Volume>,
    pub sensor: P::Sensor,
    pub screen: P::Screen,
    pub console: P::Console,
    pub leds: P::Leds,
    pub buzzer: P::Buzzer,
    pub clock: P::Clock,
    pub delay: P::Delay,
}
