//! One measurement cycle: trigger, settle, poll until not busy, check the
//! CRC and decode.
//!
//! ```text
//! Command::TriggerMeasurement (0xAC 0x33 0x00)
//!                  │
//!                  ▼
//!       Wait measurement_delay_ms
//!                  │
//!                  ▼
//!          Read 7 bytes  ◄──── Wait poll_interval_ms
//!                  │                    ▲
//!                  ▼                    │
//!             Busy bit ──► Yes ─────────┘  (max_poll_attempts reads)
//!                  │
//!                  ▼
//!             CRC good ──► No ──► Error::Integrity
//!                  │
//!                  ▼
//!        Calc Humidity and Temp
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{debug, error, warn};

use crate::commands::TRIGGER_MEASUREMENT;
use crate::config::Config;
use crate::data::{Measurement, RawFrame, FRAME_LEN};
use crate::error::Error;

pub(crate) fn measure<I2C, D>(
    i2c: &mut I2C,
    delay: &mut D,
    config: &Config,
) -> Result<Measurement, Error<I2C::Error>>
where
    I2C: I2c,
    D: DelayNs,
{
    i2c.write(config.address, &TRIGGER_MEASUREMENT)
        .map_err(|e| {
            error!("Failed to trigger measurement: {:?}", e);
            Error::Transport(e)
        })?;

    delay.delay_ms(config.measurement_delay_ms);

    let frame = poll(i2c, delay, config)?;

    if !frame.crc_ok() {
        error!(
            "CRC check failed: calculated 0x{:02X}, received 0x{:02X}",
            frame.computed_crc(),
            frame.received_crc()
        );
        return Err(Error::Integrity {
            computed: frame.computed_crc(),
            received: frame.received_crc(),
        });
    }

    let raw = frame.reading();
    let measurement = raw.to_measurement();
    debug!(
        "Raw humidity: {}, raw temperature: {}",
        raw.humidity, raw.temperature
    );
    debug!(
        "Calculated humidity: {}%, temperature: {}C",
        measurement.humidity, measurement.temperature
    );
    Ok(measurement)
}

// Reads whole frames until the busy bit clears or the attempts run out.
fn poll<I2C, D>(
    i2c: &mut I2C,
    delay: &mut D,
    config: &Config,
) -> Result<RawFrame, Error<I2C::Error>>
where
    I2C: I2c,
    D: DelayNs,
{
    let attempts = config.max_poll_attempts.max(1);

    for attempt in 1..=attempts {
        let mut buf = [0u8; FRAME_LEN];
        i2c.read(config.address, &mut buf).map_err(|e| {
            error!("Failed to read measurement data: {:?}", e);
            Error::Transport(e)
        })?;

        let frame = RawFrame::new(buf);
        if !frame.status().is_busy() {
            return Ok(frame);
        }

        debug!("Measurement in progress ({}/{}), retrying", attempt, attempts);
        if attempt < attempts {
            delay.delay_ms(config.poll_interval_ms);
        }
    }

    warn!("Sensor still busy after {} reads", attempts);
    Err(Error::Busy)
}
