use motlog_core::{MotionSensor, RawSample};

/// MPU-6050 behind the dedicated sensor I2C bus.
pub struct ImuSensor {
    imu: motlog_bsp::Imu<'static>,
}

impl ImuSensor {
    pub fn new(imu: motlog_bsp::Imu<'static>) -> Self {
        Self { imu }
    }
}

impl MotionSensor for ImuSensor {
    type Error = mpu_6050::Error<embassy_nrf::twim::Error>;

    async fn reset(&mut self) -> Result<(), Self::Error> {
        self.imu.init().await
    }

    async fn read_raw(&mut self) -> Result<RawSample, Self::Error> {
        let data = self.imu.read_sample().await?;
        Ok(RawSample {
            accel: [data.accel_x, data.accel_y, data.accel_z],
            gyro: [data.gyro_x, data.gyro_y, data.gyro_z],
            temp: data.temp,
        })
    }
}
