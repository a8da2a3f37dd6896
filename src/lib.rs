//! AHT21 temperature and humidity sensor driver.
//!
//! Blocking, `no_std` driver built on the [`embedded-hal`] 1.0 [`I2c`] and
//! [`DelayNs`] traits. A [`Sensor`] owns the bus handle and the delay for one
//! physical sensor; [`Sensor::read_measurement`] runs a full cycle (trigger,
//! wait, poll the busy bit, CRC check, decode) and returns a [`Measurement`].
//!
//! ```text
//!           Start (open)
//!                │
//!                ▼
//!   Command::Initialize (0xBE 0x08 0x00)   see InitPolicy
//!                │
//!                ▼
//!            Wait 10 ms
//!                │
//!                ▼
//!   read_measurement  ──► measure.rs
//! ```
//!
//! Retrying a failed measurement is left to the caller: [`Error::Busy`] and
//! [`Error::Integrity`] both mean "try the whole thing again", while
//! [`Error::Transport`] usually means the sensor is not there.
//!
//! # Optional Features
//! - `defmt`: Implements `defmt::Format` for the reading types
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//! [`I2c`]: embedded_hal::i2c::I2c
//! [`DelayNs`]: embedded_hal::delay::DelayNs

#![cfg_attr(not(test), no_std)]

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c;
use log::{debug, error, info};

//The sensor's availble i2c commands
pub mod commands;
use crate::commands::{INITIALIZE, RESET, STATUS};

//Import the module with the Sensor status functions/struct
mod sensor_status;
pub use crate::sensor_status::{BitMasks, SensorStatus, WorkingMode};

mod config;
pub use crate::config::*;

pub mod crc;

mod data;
pub use crate::data::{Measurement, RawFrame, RawReading, FRAME_LEN};

mod error;
pub use crate::error::Error;

mod measure;

mod report;
pub use crate::report::{Report, ReportReader};

/// One AHT21 on the bus.
///
/// Holds the bus, the delay provider and the configuration for the lifetime
/// of the session. Nothing else is kept between measurements.
pub struct Sensor<I2C, D> {
    i2c: I2C,
    delay: D,
    config: Config,
}

impl<E, I2C, D> Sensor<I2C, D>
where
    I2C: i2c::I2c<Error = E>,
    D: DelayNs,
{
    /// Wraps the bus without talking to the sensor. Call [`Sensor::init`]
    /// before measuring, or use [`Sensor::open`] to do both.
    pub fn new(i2c: I2C, delay: D, config: Config) -> Self {
        Sensor { i2c, delay, config }
    }

    /// Creates the session and brings the sensor up according to
    /// `config.init_policy`.
    pub fn open(i2c: I2C, delay: D, config: Config) -> Result<Self, Error<E>> {
        let mut sensor = Sensor::new(i2c, delay, config);
        sensor.init()?;
        Ok(sensor)
    }

    /// Brings the sensor up according to the configured [`InitPolicy`].
    pub fn init(&mut self) -> Result<(), Error<E>> {
        match self.config.init_policy {
            InitPolicy::Unconditional | InitPolicy::EveryMeasurement => self.initialize(),
            InitPolicy::WhenUncalibrated => {
                if self.status().map_err(Error::Init)?.is_calibration_enabled() {
                    debug!("AHT21 already calibrated, skipping initialization");
                    return Ok(());
                }
                self.initialize()?;
                if !self.status().map_err(Error::Init)?.is_calibration_enabled() {
                    error!("AHT21 still not calibrated after initialization");
                    return Err(Error::NotCalibrated);
                }
                Ok(())
            }
        }
    }

    /// Runs one full measurement cycle.
    pub fn read_measurement(&mut self) -> Result<Measurement, Error<E>> {
        if self.config.init_policy == InitPolicy::EveryMeasurement {
            self.initialize()?;
        }
        measure::measure(&mut self.i2c, &mut self.delay, &self.config)
    }

    /// Asks the sensor for its status byte.
    pub fn read_status(&mut self) -> Result<SensorStatus, Error<E>> {
        self.status().map_err(Error::Transport)
    }

    /// Sends the soft reset command, waits for it to finish and brings the
    /// sensor up again.
    pub fn soft_reset(&mut self) -> Result<(), Error<E>> {
        info!("Resetting AHT21 sensor");
        self.i2c
            .write(self.config.address, &RESET)
            .map_err(Error::Transport)?;
        self.delay.delay_ms(SOFT_RESET_DELAY_MS);
        self.init()
    }

    /// Starts a read cycle that serves one formatted measurement.
    pub fn reader(&mut self) -> ReportReader<'_, I2C, D> {
        ReportReader::new(self)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Ends the session and gives back the bus and the delay.
    pub fn close(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn initialize(&mut self) -> Result<(), Error<E>> {
        info!("Initializing AHT21 sensor");
        self.i2c
            .write(self.config.address, &INITIALIZE)
            .map_err(|e| {
                error!("Failed to initialize sensor");
                Error::Init(e)
            })?;
        self.delay.delay_ms(self.config.init_delay_ms);
        Ok(())
    }

    fn status(&mut self) -> Result<SensorStatus, E> {
        let mut buf = [0];
        self.i2c.write(self.config.address, &STATUS)?;
        self.i2c.read(self.config.address, &mut buf)?;
        Ok(SensorStatus::new(buf[0]))
    }
}

#[cfg(test)]
mod sensor_test {
    use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};
    use embedded_hal_mock::eh1::delay::{CheckedDelay, NoopDelay, Transaction as DelayTx};
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    use super::*;

    const CALIBRATED: u8 = BitMasks::CalEnabled as u8;

    fn init() -> I2cTransaction {
        I2cTransaction::write(SENSOR_ADDR, vec![commands::INIT_SENSOR, 0x08, 0x00])
    }

    fn trigger() -> I2cTransaction {
        I2cTransaction::write(SENSOR_ADDR, vec![commands::TRIG_MEASURE, 0x33, 0x00])
    }

    fn status(byte: u8) -> [I2cTransaction; 2] {
        [
            I2cTransaction::write(SENSOR_ADDR, vec![commands::READ_STATUS]),
            I2cTransaction::read(SENSOR_ADDR, vec![byte]),
        ]
    }

    fn good_frame() -> I2cTransaction {
        I2cTransaction::read(SENSOR_ADDR, vec![0x1C, 0x65, 0xB4, 0x25, 0xCD, 0x26, 0xC6])
    }

    const GOOD: Measurement = Measurement {
        humidity: 39,
        temperature: 22,
    };

    #[test]
    fn open_sends_initialize() {
        let mut i2c = I2cMock::new(&[init()]);
        let mut delay = CheckedDelay::new(&[DelayTx::delay_ms(10)]);

        let sensor = Sensor::open(i2c.clone(), &mut delay, Config::default());
        assert!(sensor.is_ok());
        drop(sensor);

        i2c.done();
        delay.done();
    }

    #[test]
    fn open_fails() {
        let mut i2c = I2cMock::new(&[init().with_error(ErrorKind::NoAcknowledge(
            NoAcknowledgeSource::Address,
        ))]);

        let sensor = Sensor::open(i2c.clone(), NoopDelay, Config::default());
        assert_eq!(
            sensor.err(),
            Some(Error::Init(ErrorKind::NoAcknowledge(
                NoAcknowledgeSource::Address
            )))
        );
        i2c.done();
    }

    #[test]
    fn open_then_measure_twice() {
        let expectations = [init(), trigger(), good_frame(), trigger(), good_frame()];
        let mut i2c = I2cMock::new(&expectations);
        let mut delay = CheckedDelay::new(&[
            DelayTx::delay_ms(10),
            DelayTx::delay_ms(100),
            DelayTx::delay_ms(100),
        ]);

        let mut sensor = Sensor::open(i2c.clone(), &mut delay, Config::default()).unwrap();
        assert_eq!(sensor.read_measurement(), Ok(GOOD));
        assert_eq!(sensor.read_measurement(), Ok(GOOD));
        drop(sensor);

        i2c.done();
        delay.done();
    }

    #[test]
    fn measurement_errors_are_not_retried() {
        let expectations = [
            init(),
            trigger(),
            I2cTransaction::read(SENSOR_ADDR, vec![0x1C, 0x65, 0xB4, 0x25, 0xCD, 0x26, 0xC7]),
            trigger().with_error(ErrorKind::Bus),
            trigger(),
            good_frame(),
        ];
        let mut i2c = I2cMock::new(&expectations);

        let mut sensor = Sensor::open(i2c.clone(), NoopDelay, Config::default()).unwrap();
        assert_eq!(
            sensor.read_measurement(),
            Err(Error::Integrity {
                computed: 0xC6,
                received: 0xC7
            })
        );
        assert_eq!(
            sensor.read_measurement(),
            Err(Error::Transport(ErrorKind::Bus))
        );
        //the session is still usable
        assert_eq!(sensor.read_measurement(), Ok(GOOD));

        i2c.done();
    }

    #[test]
    fn every_measurement_policy() {
        let expectations = [init(), init(), trigger(), good_frame()];
        let mut i2c = I2cMock::new(&expectations);
        let mut delay = CheckedDelay::new(&[
            DelayTx::delay_ms(10),
            DelayTx::delay_ms(10),
            DelayTx::delay_ms(100),
        ]);

        let config = Config::new().init_policy(InitPolicy::EveryMeasurement);
        let mut sensor = Sensor::open(i2c.clone(), &mut delay, config).unwrap();
        assert_eq!(sensor.read_measurement(), Ok(GOOD));
        drop(sensor);

        i2c.done();
        delay.done();
    }

    #[test]
    fn every_measurement_policy_init_fails() {
        let expectations = [init(), init().with_error(ErrorKind::Other)];
        let mut i2c = I2cMock::new(&expectations);

        let config = Config::new().init_policy(InitPolicy::EveryMeasurement);
        let mut sensor = Sensor::open(i2c.clone(), NoopDelay, config).unwrap();
        assert_eq!(
            sensor.read_measurement(),
            Err(Error::Init(ErrorKind::Other))
        );

        i2c.done();
    }

    #[test]
    fn when_uncalibrated_skips_init() {
        let [w, r] = status(0x18);
        let mut i2c = I2cMock::new(&[w, r]);
        let no_delays: [DelayTx; 0] = [];
        let mut delay = CheckedDelay::new(&no_delays);

        let config = Config::new().init_policy(InitPolicy::WhenUncalibrated);
        assert!(Sensor::open(i2c.clone(), &mut delay, config).is_ok());

        i2c.done();
        delay.done();
    }

    #[test]
    fn when_uncalibrated_initializes() {
        let [w0, r0] = status(0x00);
        let [w1, r1] = status(CALIBRATED);
        let mut i2c = I2cMock::new(&[w0, r0, init(), w1, r1, trigger(), good_frame()]);

        let config = Config::new().init_policy(InitPolicy::WhenUncalibrated);
        let mut sensor = Sensor::open(i2c.clone(), NoopDelay, config).unwrap();
        //no init before the measurement itself
        assert_eq!(sensor.read_measurement(), Ok(GOOD));

        i2c.done();
    }

    #[test]
    fn when_uncalibrated_never_calibrates() {
        let [w0, r0] = status(0x00);
        let [w1, r1] = status(0x00);
        let mut i2c = I2cMock::new(&[w0, r0, init(), w1, r1]);

        let config = Config::new().init_policy(InitPolicy::WhenUncalibrated);
        let sensor = Sensor::open(i2c.clone(), NoopDelay, config);
        assert_eq!(sensor.err(), Some(Error::NotCalibrated));

        i2c.done();
    }

    #[test]
    fn when_uncalibrated_status_fails() {
        let mut i2c = I2cMock::new(&[I2cTransaction::write(
            SENSOR_ADDR,
            vec![commands::READ_STATUS],
        )
        .with_error(ErrorKind::Other)]);

        let config = Config::new().init_policy(InitPolicy::WhenUncalibrated);
        let sensor = Sensor::open(i2c.clone(), NoopDelay, config);
        assert_eq!(sensor.err(), Some(Error::Init(ErrorKind::Other)));

        i2c.done();
    }

    #[test]
    fn get_status() {
        let [w, r] = status(BitMasks::Busy as u8 | CALIBRATED);
        let mut i2c = I2cMock::new(&[w, r]);

        let mut sensor = Sensor::new(i2c.clone(), NoopDelay, Config::default());
        let s = sensor.read_status().unwrap();
        assert!(s.is_busy());
        assert!(s.is_calibration_enabled());

        i2c.done();
    }

    #[test]
    fn soft_reset() {
        let expectations = [
            init(),
            I2cTransaction::write(SENSOR_ADDR, vec![commands::SOFT_RESET]),
            init(),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut delay = CheckedDelay::new(&[
            DelayTx::delay_ms(10),
            DelayTx::delay_ms(20),
            DelayTx::delay_ms(10),
        ]);

        let mut sensor = Sensor::open(i2c.clone(), &mut delay, Config::default()).unwrap();
        assert!(sensor.soft_reset().is_ok());
        drop(sensor);

        i2c.done();
        delay.done();
    }

    #[test]
    fn close_returns_bus() {
        let i2c = I2cMock::new(&[init()]);

        let sensor = Sensor::open(i2c, NoopDelay, Config::default()).unwrap();
        assert_eq!(sensor.config(), &Config::default());
        let (mut bus, _delay) = sensor.close();

        //closing does not touch the wire
        bus.done();
    }
}
