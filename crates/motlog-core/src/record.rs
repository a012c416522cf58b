use heapless::String;

use crate::sensor::RawSample;

/// Name of the log file on the default volume.
pub const LOG_FILE_NAME: &str = "imu_data.csv";

/// Header row written at the start of every capture session.
pub const CSV_HEADER: &str = "numero_amostra,accel_x,accel_y,accel_z,giro_x,giro_y,giro_z\n";

/// Accelerometer LSB per g at the +/-2 g full-scale setting.
pub const ACCEL_SCALE: f32 = 16384.0;

/// Gyroscope LSB per degree/second at the +/-250 deg/s full-scale setting.
pub const GYRO_SCALE: f32 = 131.0;

/// Largest possible formatted record: a ten-digit index plus six signed
/// values with four decimals, commas and the trailing newline.
pub const RECORD_CAPACITY: usize = 96;

/// Formats one CSV record.
///
/// `index` is the 1-based sample number within the session. Raw axis values
/// are scaled into g and degrees/second and printed with four decimal
/// places, matching the header layout.
pub fn format_record(index: u32, sample: &RawSample) -> String<RECORD_CAPACITY> {
    use core::fmt::Write;

    let [ax, ay, az] = sample.accel.map(|v| f32::from(v) / ACCEL_SCALE);
    let [gx, gy, gz] = sample.gyro.map(|v| f32::from(v) / GYRO_SCALE);

    let mut row = String::new();
    // Cannot overflow: RECORD_CAPACITY covers the widest row.
    let _ = write!(
        row,
        "{},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4}\n",
        index, ax, ay, az, gx, gy, gz
    );
    row
}
