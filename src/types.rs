use core::fmt;

use crate::constants::{ABC_CLOSE, ABC_OPEN, WORKING_MODE_CONTINUOUS, WORKING_MODE_SINGLE};

/// Switch state of the sensor's automatic baseline correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbcState {
    /// ABC is running: the sensor periodically re-anchors its baseline.
    Open,
    /// ABC is switched off.
    Close,
}

impl AbcState {
    pub(crate) fn to_wire(self) -> u8 {
        match self {
            AbcState::Open => ABC_OPEN,
            AbcState::Close => ABC_CLOSE,
        }
    }

    pub(crate) fn from_wire(byte: u8) -> Option<AbcState> {
        match byte {
            ABC_OPEN => Some(AbcState::Open),
            ABC_CLOSE => Some(AbcState::Close),
            _ => None,
        }
    }
}

/// Automatic baseline correction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbcParams {
    /// Whether automatic baseline correction is running.
    pub state: AbcState,
    /// Days between baseline corrections, 1 to 7.
    pub cycle_days: u8,
    /// Baseline concentration in ppm, 400 to 1499.
    pub baseline_ppm: u16,
}

/// Measurement scheduling mode of the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkingMode {
    /// One measurement per trigger.
    SingleShot,
    /// Free-running periodic measurement.
    Continuous,
}

impl WorkingMode {
    pub(crate) fn to_wire(self) -> u8 {
        match self {
            WorkingMode::SingleShot => WORKING_MODE_SINGLE,
            WorkingMode::Continuous => WORKING_MODE_CONTINUOUS,
        }
    }

    pub(crate) fn from_wire(byte: u8) -> Option<WorkingMode> {
        match byte {
            WORKING_MODE_SINGLE => Some(WorkingMode::SingleShot),
            WORKING_MODE_CONTINUOUS => Some(WorkingMode::Continuous),
            _ => None,
        }
    }
}

/// Measurement timing as reported by the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasurementPeriod {
    /// Seconds between measurements, 1 to 600.
    pub seconds: u16,
    /// Number of samples smoothed into each reported value.
    pub smoothing: u8,
}

/// Sensor serial number: five 16-bit fields, reported big-endian.
///
/// `Display` renders each field as a zero-padded four-digit decimal group and
/// concatenates them, which is how the vendor prints serial numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialNumber(pub [u16; 5]);

impl SerialNumber {
    pub(crate) fn from_payload(payload: &[u8]) -> SerialNumber {
        let mut fields = [0u16; 5];
        for (field, chunk) in fields.iter_mut().zip(payload.chunks_exact(2)) {
            *field = u16::from_be_bytes([chunk[0], chunk[1]]);
        }
        SerialNumber(fields)
    }
}

impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for field in self.0 {
            write!(f, "{field:04}")?;
        }
        Ok(())
    }
}
