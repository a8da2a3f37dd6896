//! Text output for hosts that expose the sensor as a readable stream.
//!
//! The format is `"<temperature> <humidity>\n"` in whole degrees Celsius and
//! whole percent. One read cycle yields one line and then end of stream.

use core::fmt::Write;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use heapless::String;

use crate::data::Measurement;
use crate::error::Error;
use crate::Sensor;

const REPORT_CAPACITY: usize = 32;

/// A measurement formatted as one line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    text: String<REPORT_CAPACITY>,
}

impl Report {
    pub fn new(measurement: &Measurement) -> Self {
        let mut text: String<REPORT_CAPACITY> = String::new();
        //"-50 100\n" is the longest line the decoded ranges can produce.
        let _ = writeln!(text, "{} {}", measurement.temperature, measurement.humidity);
        Report { text }
    }

    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }
}

/// One read cycle over a [`Sensor`].
///
/// The first [`read`](ReportReader::read) takes a measurement; the line is
/// then handed out across as many reads as the caller's buffer needs, after
/// which every read returns `Ok(0)`.
pub struct ReportReader<'a, I2C, D> {
    sensor: &'a mut Sensor<I2C, D>,
    report: Option<Report>,
    position: usize,
}

impl<'a, E, I2C, D> ReportReader<'a, I2C, D>
where
    I2C: I2c<Error = E>,
    D: DelayNs,
{
    pub(crate) fn new(sensor: &'a mut Sensor<I2C, D>) -> Self {
        ReportReader {
            sensor,
            report: None,
            position: 0,
        }
    }

    /// Copies the next part of the line into `buf` and returns how many bytes
    /// were written. A failed measurement is returned as is and the next
    /// call measures again.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error<E>> {
        let report = match self.report.take() {
            Some(report) => report,
            None => Report::new(&self.sensor.read_measurement()?),
        };

        let remaining = &report.as_bytes()[self.position..];
        let len = remaining.len().min(buf.len());
        buf[..len].copy_from_slice(&remaining[..len]);
        self.position += len;

        self.report = Some(report);
        Ok(len)
    }

    /// True once the whole line has been read.
    pub fn is_finished(&self) -> bool {
        match &self.report {
            Some(report) => self.position >= report.as_bytes().len(),
            None => false,
        }
    }
}
