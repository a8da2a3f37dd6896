//We have sepreate consts for the command bytes (used while testing) and
//the full command frames that actually go out on the bus.
pub const READ_STATUS: u8 = 0x71;
pub const INIT_SENSOR: u8 = 0xBE;
pub const TRIG_MEASURE: u8 = 0xAC;
pub const SOFT_RESET: u8 = 0xBA;

/// Initialize: `0xBE` followed by its two parameter bytes.
pub const INITIALIZE: [u8; 3] = [INIT_SENSOR, 0x08, 0x00];

/// Trigger measurement: `0xAC` followed by its two parameter bytes.
//The datasheet calls the 0x33 & 0x00 bytes parameters of it.
//Doesn't really say or explain anything else about it.
pub const TRIGGER_MEASUREMENT: [u8; 3] = [TRIG_MEASURE, 0x33, 0x00];

/// Soft reset, no parameters.
pub const RESET: [u8; 1] = [SOFT_RESET];

/// Request a single status byte.
pub const STATUS: [u8; 1] = [READ_STATUS];

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ReadStatus = READ_STATUS,
    Initialize = INIT_SENSOR,
    TriggerMeasurement = TRIG_MEASURE,
    SoftReset = SOFT_RESET,
}

impl Command {
    /// The exact bytes written to the sensor for this command.
    pub const fn bytes(self) -> &'static [u8] {
        match self {
            Command::ReadStatus => &STATUS,
            Command::Initialize => &INITIALIZE,
            Command::TriggerMeasurement => &TRIGGER_MEASUREMENT,
            Command::SoftReset => &RESET,
        }
    }
}
