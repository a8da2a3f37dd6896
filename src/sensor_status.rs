//Bits and their meanings, check the AHT21 datasheet
//URL: www.aosong.com
/*
 * bit[7]: Busy
 * bit[6:5]: 00: NOR mode, 01: CYC mode, 1x: CMD mode
 * bit[4]: Reserved
 * bit[3]: CAL Enable
 * bit[2:0]: Reserved
*/

//This means it's a primitive enum representation; aka uint8_t
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitMasks {
    Busy = 1 << 7,
    Mode = (1 << 6) | (1 << 5),
    CycMode = 1 << 5,
    CmdMode = 1 << 6,
    CalEnabled = 1 << 3,
}

/// Working mode reported in bits 6:5 of the status byte.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkingMode {
    Normal,
    Cycle,
    Command,
}

/// A single status byte, as returned first in every reply.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorStatus {
    pub status: u8,
}

impl SensorStatus {
    pub fn new(status: u8) -> SensorStatus {
        SensorStatus { status }
    }

    /// The sensor is still converting.
    pub fn is_busy(&self) -> bool {
        self.status & BitMasks::Busy as u8 != 0
    }

    /// Calibration coefficients are loaded.
    pub fn is_calibration_enabled(&self) -> bool {
        self.status & BitMasks::CalEnabled as u8 != 0
    }

    pub fn mode(&self) -> WorkingMode {
        match self.status & BitMasks::Mode as u8 {
            0 => WorkingMode::Normal,
            m if m == BitMasks::CycMode as u8 => WorkingMode::Cycle,
            _ => WorkingMode::Command,
        }
    }

    pub fn is_normal_mode(&self) -> bool {
        self.mode() == WorkingMode::Normal
    }
}
