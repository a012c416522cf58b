#![no_std]

//! Async driver for the InvenSense MPU-6050 6-axis IMU.
//!
//! Speaks plain register-level I2C through `embedded-hal-async`. The
//! driver covers what a data logger needs: reset into a known
//! configuration and burst reads of the accelerometer, gyroscope and
//! temperature registers. At the default full-scale settings the parts
//! report 16384 LSB/g and 131 LSB/(deg/s).

use embedded_hal_async::{delay::DelayNs, i2c::I2c};

/// Default I2C address with AD0 pulled low.
pub const DEFAULT_ADDRESS: u8 = 0x68;

/// Expected WHO_AM_I response.
const WHO_AM_I_VALUE: u8 = 0x68;

mod reg {
    pub const PWR_MGMT_1: u8 = 0x6b;
    pub const ACCEL_XOUT_H: u8 = 0x3b;
    pub const TEMP_OUT_H: u8 = 0x41;
    pub const GYRO_XOUT_H: u8 = 0x43;
    pub const WHO_AM_I: u8 = 0x75;
}

/// PWR_MGMT_1 bit that triggers a full device reset.
const DEVICE_RESET: u8 = 0x80;

/// Raw sensor data structure
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorData {
    pub accel_x: i16,
    pub accel_y: i16,
    pub accel_z: i16,
    pub gyro_x: i16,
    pub gyro_y: i16,
    pub gyro_z: i16,
    pub temp: i16,
}

#[derive(derive_more::From, Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<I2cError> {
    I2c(I2cError),
    InvalidWhoAmI,
}

pub struct Mpu6050<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
}

impl<I2C: I2c, D: DelayNs> Mpu6050<I2C, D> {
    /// Creates a driver for a device at the default address.
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::new_with_address(i2c, delay, DEFAULT_ADDRESS)
    }

    /// Creates a driver for a device with AD0 strapped high (or any other
    /// non-default address).
    pub fn new_with_address(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
        }
    }

    /// Resets the device and checks it answers with the right identity.
    pub async fn init(&mut self) -> Result<(), Error<I2C::Error>> {
        self.reset().await?;
        if self.who_am_i().await? != WHO_AM_I_VALUE {
            return Err(Error::InvalidWhoAmI);
        }
        Ok(())
    }

    /// Resets the device, then takes it out of sleep.
    ///
    /// The part needs time to stabilise after each step; the delays used
    /// here are the data-sheet start-up figures rounded up.
    pub async fn reset(&mut self) -> Result<(), Error<I2C::Error>> {
        self.i2c
            .write(self.address, &[reg::PWR_MGMT_1, DEVICE_RESET])
            .await?;
        self.delay.delay_ms(100).await;
        // Clearing PWR_MGMT_1 leaves sleep mode with the internal
        // oscillator selected.
        self.i2c.write(self.address, &[reg::PWR_MGMT_1, 0x00]).await?;
        self.delay.delay_ms(10).await;
        Ok(())
    }

    /// Reads the WHO_AM_I register.
    pub async fn who_am_i(&mut self) -> Result<u8, Error<I2C::Error>> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[reg::WHO_AM_I], &mut buf)
            .await?;
        Ok(buf[0])
    }

    /// Reads one accelerometer + gyroscope + temperature sample.
    pub async fn read_sample(&mut self) -> Result<SensorData, Error<I2C::Error>> {
        let mut accel = [0u8; 6];
        let mut gyro = [0u8; 6];
        let mut temp = [0u8; 2];

        self.i2c
            .write_read(self.address, &[reg::ACCEL_XOUT_H], &mut accel)
            .await?;
        self.i2c
            .write_read(self.address, &[reg::GYRO_XOUT_H], &mut gyro)
            .await?;
        self.i2c
            .write_read(self.address, &[reg::TEMP_OUT_H], &mut temp)
            .await?;

        Ok(SensorData {
            accel_x: i16::from_be_bytes([accel[0], accel[1]]),
            accel_y: i16::from_be_bytes([accel[2], accel[3]]),
            accel_z: i16::from_be_bytes([accel[4], accel[5]]),
            gyro_x: i16::from_be_bytes([gyro[0], gyro[1]]),
            gyro_y: i16::from_be_bytes([gyro[2], gyro[3]]),
            gyro_z: i16::from_be_bytes([gyro[4], gyro[5]]),
            temp: i16::from_be_bytes([temp[0], temp[1]]),
        })
    }

    /// Releases the bus and delay.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }
}
