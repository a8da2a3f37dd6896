use core::fmt;

/// Errors returned by the driver, generic over the bus error `E`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// A bus write or read failed while talking to an initialised sensor.
    Transport(E),
    /// Every poll attempt still reported the busy bit.
    Busy,
    /// The CRC sent by the sensor does not match the data.
    Integrity { computed: u8, received: u8 },
    /// Bringing the sensor up failed on the bus.
    Init(E),
    /// The sensor did not report calibration after being initialised.
    NotCalibrated,
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Transport(e) => write!(f, "bus transfer failed: {:?}", e),
            Error::Busy => f.write_str("sensor still busy after polling"),
            Error::Integrity { computed, received } => write!(
                f,
                "CRC mismatch: calculated 0x{:02X}, received 0x{:02X}",
                computed, received
            ),
            Error::Init(e) => write!(f, "sensor initialisation failed: {:?}", e),
            Error::NotCalibrated => f.write_str("sensor not calibrated after initialisation"),
        }
    }
}
