/*
 * Filename: data.rs
 * Description: the raw reply frame and the values decoded from it.
 */

use crate::crc::crc8;
use crate::sensor_status::SensorStatus;

/// Length of a measurement reply: status, 5 data bytes, CRC.
pub const FRAME_LEN: usize = 7;

/// Raw values are 20 bits wide and scaled by 2^20.
pub const RAW_BITS: u32 = 20;
const RAW_MASK: u32 = (1 << RAW_BITS) - 1;

/// The 7 bytes returned by one measurement read.
///
/// ```text
/// | Byte | 7 6 5 4 3 2 1 0 |
/// |------|-----------------|
/// |  0   | S S S S S S S S |  Status
/// |  1   | H H H H H H H H |  Humidity[19:12]
/// |  2   | H H H H H H H H |  Humidity[11:4]
/// |  3   | H H H H T T T T |  Humidity[3:0] | Temp[19:16]
/// |  4   | T T T T T T T T |  Temp[15:8]
/// |  5   | T T T T T T T T |  Temp[7:0]
/// |  6   | C C C C C C C C |  CRC[7:0]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFrame {
    bytes: [u8; FRAME_LEN],
}

impl RawFrame {
    pub fn new(bytes: [u8; FRAME_LEN]) -> Self {
        RawFrame { bytes }
    }

    pub fn bytes(&self) -> &[u8; FRAME_LEN] {
        &self.bytes
    }

    pub fn status(&self) -> SensorStatus {
        SensorStatus::new(self.bytes[0])
    }

    /// The CRC the sensor sent in byte 6.
    pub fn received_crc(&self) -> u8 {
        self.bytes[6]
    }

    /// The CRC computed locally over bytes 0 to 5.
    pub fn computed_crc(&self) -> u8 {
        crc8(&self.bytes[..6])
    }

    pub fn crc_ok(&self) -> bool {
        self.computed_crc() == self.received_crc()
    }

    /// Unpacks the two 20-bit fields from bytes 1 to 5.
    pub fn reading(&self) -> RawReading {
        let b = &self.bytes;

        //humidity is the top 20 bits of the 24-bit window b1..b3,
        //the low nibble of b3 belongs to temperature.
        let humidity = (u32::from(b[1]) << 16 | u32::from(b[2]) << 8 | u32::from(b[3])) >> 4;

        let temperature =
            u32::from(b[3] & 0x0F) << 16 | u32::from(b[4]) << 8 | u32::from(b[5]);

        RawReading {
            humidity,
            temperature,
        }
    }
}

/// Unscaled humidity and temperature as read off the wire.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawReading {
    pub humidity: u32,
    pub temperature: u32,
}

impl RawReading {
    /// Values wider than 20 bits are masked down.
    pub fn new(humidity: u32, temperature: u32) -> Self {
        RawReading {
            humidity: humidity & RAW_MASK,
            temperature: temperature & RAW_MASK,
        }
    }

    /// Converts to %RH and degrees Celsius, truncating toward zero before the
    /// -50 offset is applied.
    pub fn to_measurement(&self) -> Measurement {
        //both products stay below 2^28 so u32 is enough.
        let humidity = ((self.humidity & RAW_MASK) * 100) >> RAW_BITS;
        let temperature = ((self.temperature & RAW_MASK) * 200) >> RAW_BITS;

        Measurement {
            humidity: humidity as u8,
            temperature: temperature as i16 - 50,
        }
    }
}

/// A decoded reading.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    /// Relative humidity in percent, 0 to 100.
    pub humidity: u8,
    /// Temperature in degrees Celsius, -50 to 150.
    pub temperature: i16,
}
