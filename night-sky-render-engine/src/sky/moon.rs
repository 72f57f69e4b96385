use crate::sky::time::ObservationTime;
use serde::Serialize;
use std::f64::consts::TAU;
use std::fmt;

pub const SYNODIC_MONTH_DAYS: f64 = 29.530_588_853;

/// New moon of 2000-01-06 18:14 UTC.
const REFERENCE_NEW_MOON_JD: f64 = 2_451_550.259_7;

/// Lunar phase in [0, 1): 0 new, 0.25 first quarter, 0.5 full, 0.75 last quarter.
pub fn moon_phase(time: &ObservationTime) -> f64 {
    ((time.julian_date() - REFERENCE_NEW_MOON_JD) / SYNODIC_MONTH_DAYS).rem_euclid(1.0)
}

/// Illuminated fraction of the disc for a phase.
pub fn illuminated_fraction(phase: f64) -> f64 {
    ((1.0 - (TAU * phase).cos()) / 2.0).clamp(0.0, 1.0)
}

/// Host-supplied illumination, clamped. Non-finite input counts as a dark sky.
pub fn clamp_illumination(fraction: f64) -> f64 {
    if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoonPhaseName {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhaseName {
    pub fn from_phase(phase: f64) -> Self {
        match phase {
            p if p < 0.03 || p > 0.97 => Self::NewMoon,
            p if p < 0.22 => Self::WaxingCrescent,
            p if p < 0.28 => Self::FirstQuarter,
            p if p < 0.47 => Self::WaxingGibbous,
            p if p < 0.53 => Self::FullMoon,
            p if p < 0.72 => Self::WaningGibbous,
            p if p < 0.78 => Self::LastQuarter,
            _ => Self::WaningCrescent,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NewMoon => "New Moon",
            Self::WaxingCrescent => "Waxing Crescent",
            Self::FirstQuarter => "First Quarter",
            Self::WaxingGibbous => "Waxing Gibbous",
            Self::FullMoon => "Full Moon",
            Self::WaningGibbous => "Waning Gibbous",
            Self::LastQuarter => "Last Quarter",
            Self::WaningCrescent => "Waning Crescent",
        }
    }
}

impl fmt::Display for MoonPhaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoonConditions {
    pub phase: f64,
    pub illumination: f64,
    pub phase_name: MoonPhaseName,
}

impl MoonConditions {
    pub fn at(time: &ObservationTime) -> Self {
        let phase = moon_phase(time);
        Self {
            phase,
            illumination: illuminated_fraction(phase),
            phase_name: MoonPhaseName::from_phase(phase),
        }
    }
}
