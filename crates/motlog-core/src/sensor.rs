/// One raw reading from the motion sensor, straight off the wire.
///
/// Values are signed 16-bit register pairs; scaling into physical units
/// happens when a record is formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    /// Acceleration, X/Y/Z.
    pub accel: [i16; 3],
    /// Angular rate, X/Y/Z.
    pub gyro: [i16; 3],
    /// Die temperature.
    pub temp: i16,
}

/// A 6-axis motion sensor.
pub trait MotionSensor {
    type Error: core::fmt::Debug;

    /// Puts the sensor back into a known configuration.
    async fn reset(&mut self) -> Result<(), Self::Error>;

    /// Reads one accelerometer + gyroscope sample.
    async fn read_raw(&mut self) -> Result<RawSample, Self::Error>;
}
