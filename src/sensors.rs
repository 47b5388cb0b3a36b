//! Raw ADC count to engineering unit conversion.
//!
//! These are uncalibrated linear placeholders; real probes need per-device
//! calibration.

use crate::hal::SensorReading;

/// ADC count treated as the neutral pH point
const PH_NEUTRAL_RAW: f32 = 512.0;

pub fn temperature_from_raw(raw: u16) -> f32 {
    20.0 + raw as f32 * 0.1
}

pub fn ph_from_raw(raw: u16) -> f32 {
    7.0 + (raw as f32 - PH_NEUTRAL_RAW) * 0.01
}

pub fn tds_from_raw(raw: u16) -> f32 {
    raw as f32 * 0.5
}

/// Convert one raw sample of the three probes
pub fn reading_from_raw(temperature: u16, ph: u16, tds: u16) -> SensorReading {
    SensorReading {
        temperature: temperature_from_raw(temperature),
        ph: ph_from_raw(ph),
        tds: tds_from_raw(tds),
    }
}
