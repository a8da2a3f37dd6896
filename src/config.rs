/// AHT21 sensor address
pub const SENSOR_ADDR: u8 = 0b0011_1000; // = 0x38

/// Settle time after triggering before the first poll.
pub const MEASUREMENT_DELAY_MS: u32 = 100;
/// The sensor needs at least this long to convert.
pub const MIN_MEASUREMENT_DELAY_MS: u32 = 75;
pub const POLL_INTERVAL_MS: u32 = 10;
pub const MAX_POLL_ATTEMPTS: u8 = 10;
/// Wait after the Initialize command.
pub const INIT_DELAY_MS: u32 = 10;
/// The datasheet gives 20 ms or less for a soft reset.
pub const SOFT_RESET_DELAY_MS: u32 = 20;

/// When the Initialize command is sent.
///
/// The datasheet only asks for the calibration bit to be checked once at
/// power on, while the kernel driver this crate replaces initialises
/// unconditionally when the device is attached. Both are available.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitPolicy {
    /// Initialize once when the session is opened.
    #[default]
    Unconditional,
    /// Read the status word when opening and initialize only if the
    /// calibration bit is clear.
    WhenUncalibrated,
    /// Initialize when opening and again before every measurement.
    EveryMeasurement,
}

/// Configuration settings for an AHT21 session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub address: u8,
    pub init_policy: InitPolicy,
    pub measurement_delay_ms: u32,
    pub poll_interval_ms: u32,
    pub max_poll_attempts: u8,
    pub init_delay_ms: u32,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bus address, only needed behind address translating hardware.
    pub fn address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    pub fn init_policy(mut self, policy: InitPolicy) -> Self {
        self.init_policy = policy;
        self
    }

    /// Sets the settle time before polling, never below
    /// [`MIN_MEASUREMENT_DELAY_MS`].
    pub fn measurement_delay_ms(mut self, ms: u32) -> Self {
        self.measurement_delay_ms = ms.max(MIN_MEASUREMENT_DELAY_MS);
        self
    }

    pub fn poll_interval_ms(mut self, ms: u32) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    /// Sets how many 7 byte reads are made before giving up on a busy
    /// sensor. At least one read is always made.
    pub fn max_poll_attempts(mut self, attempts: u8) -> Self {
        self.max_poll_attempts = attempts.max(1);
        self
    }

    /// Sets the wait after Initialize, never below [`INIT_DELAY_MS`].
    pub fn init_delay_ms(mut self, ms: u32) -> Self {
        self.init_delay_ms = ms.max(INIT_DELAY_MS);
        self
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            address: SENSOR_ADDR,
            init_policy: InitPolicy::default(),
            measurement_delay_ms: MEASUREMENT_DELAY_MS,
            poll_interval_ms: POLL_INTERVAL_MS,
            max_poll_attempts: MAX_POLL_ATTEMPTS,
            init_delay_ms: INIT_DELAY_MS,
        }
    }
}
