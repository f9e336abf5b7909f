//! Parsing of unit and fluid labels coming from the presentation layer.
//!
//! Labels are matched case-insensitively with whitespace removed. Unknown
//! labels are rejected, never mapped to a default; the error carries the
//! closest known label when one is similar enough.

use std::str::FromStr;

use strsim::jaro_winkler;

use super::UnitError;
use crate::models::{ConcentrationUnit, DoseUnit, FluidType};

/// Minimum Jaro-Winkler similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.85;

/// Accepted spellings of each dose unit (normalized form).
const DOSE_UNIT_ALIASES: &[(&str, DoseUnit)] = &[
    // mcg/kg/min
    ("mcg/kg/min", DoseUnit::McgPerKgPerMin),
    ("µg/kg/min", DoseUnit::McgPerKgPerMin),
    ("μg/kg/min", DoseUnit::McgPerKgPerMin),
    ("ug/kg/min", DoseUnit::McgPerKgPerMin),
    ("mcg/kg/minute", DoseUnit::McgPerKgPerMin),
    // mcg/kg/h
    ("mcg/kg/h", DoseUnit::McgPerKgPerHour),
    ("mcg/kg/hr", DoseUnit::McgPerKgPerHour),
    ("µg/kg/h", DoseUnit::McgPerKgPerHour),
    ("μg/kg/h", DoseUnit::McgPerKgPerHour),
    ("ug/kg/h", DoseUnit::McgPerKgPerHour),
    ("ug/kg/hr", DoseUnit::McgPerKgPerHour),
    // mg/kg/min
    ("mg/kg/min", DoseUnit::MgPerKgPerMin),
    ("mg/kg/minute", DoseUnit::MgPerKgPerMin),
    // mg/kg/h
    ("mg/kg/h", DoseUnit::MgPerKgPerHour),
    ("mg/kg/hr", DoseUnit::MgPerKgPerHour),
    ("mg/kg/hour", DoseUnit::MgPerKgPerHour),
    // mg/kg/day
    ("mg/kg/day", DoseUnit::MgPerKgPerDay),
    ("mg/kg/d", DoseUnit::MgPerKgPerDay),
    ("mg/kg/24h", DoseUnit::MgPerKgPerDay),
    // U/kg/h
    ("u/kg/h", DoseUnit::UnitsPerKgPerHour),
    ("u/kg/hr", DoseUnit::UnitsPerKgPerHour),
    ("iu/kg/h", DoseUnit::UnitsPerKgPerHour),
    ("iu/kg/hr", DoseUnit::UnitsPerKgPerHour),
    // mU/kg/min
    ("mu/kg/min", DoseUnit::MilliunitsPerKgPerMin),
    ("miu/kg/min", DoseUnit::MilliunitsPerKgPerMin),
    // Bolus
    ("mcg/kg", DoseUnit::McgPerKg),
    ("µg/kg", DoseUnit::McgPerKg),
    ("μg/kg", DoseUnit::McgPerKg),
    ("ug/kg", DoseUnit::McgPerKg),
    ("mg/kg", DoseUnit::MgPerKg),
    ("u/kg", DoseUnit::UnitsPerKg),
    ("iu/kg", DoseUnit::UnitsPerKg),
];

/// Accepted spellings of each carrier fluid (normalized form).
const FLUID_ALIASES: &[(&str, FluidType)] = &[
    ("nacl0.9%", FluidType::Saline),
    ("nacl0.9", FluidType::Saline),
    ("0.9%nacl", FluidType::Saline),
    ("ns", FluidType::Saline),
    ("saline", FluidType::Saline),
    ("normalsaline", FluidType::Saline),
    ("lrs", FluidType::LactatedRingers),
    ("lr", FluidType::LactatedRingers),
    ("lactatedringer's", FluidType::LactatedRingers),
    ("lactatedringers", FluidType::LactatedRingers),
    ("hartmann", FluidType::LactatedRingers),
    ("d5w", FluidType::Dextrose5),
    ("g5", FluidType::Dextrose5),
    ("dextrose5%", FluidType::Dextrose5),
    ("5%dextrose", FluidType::Dextrose5),
    ("plasma-lyte", FluidType::PlasmaLyte),
    ("plasmalyte", FluidType::PlasmaLyte),
    ("normosol-r", FluidType::PlasmaLyte),
    ("nacl0.45%", FluidType::HalfSaline),
    ("0.45%nacl", FluidType::HalfSaline),
    ("halfsaline", FluidType::HalfSaline),
    ("d2.5/nacl0.45%", FluidType::Dextrose25HalfSaline),
    ("2.5%dextrose/0.45%nacl", FluidType::Dextrose25HalfSaline),
    ("sterilewater", FluidType::SterileWater),
    ("water", FluidType::SterileWater),
    ("swfi", FluidType::SterileWater),
];

/// Lowercase and strip whitespace.
fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Look up a label in an alias table.
fn lookup<T: Copy>(table: &[(&str, T)], label: &str) -> Option<T> {
    let normalized = normalize_label(label);
    table
        .iter()
        .find(|(alias, _)| *alias == normalized)
        .map(|(_, value)| *value)
}

/// Closest alias above the suggestion threshold, rendered via `display`.
fn suggest<T: Copy>(
    table: &[(&str, T)],
    label: &str,
    display: impl Fn(T) -> String,
) -> Option<String> {
    let normalized = normalize_label(label);
    table
        .iter()
        .map(|(alias, value)| (jaro_winkler(&normalized, alias), *value))
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(_, value)| display(value))
}

impl FromStr for DoseUnit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(DOSE_UNIT_ALIASES, s).ok_or_else(|| UnitError::Unknown {
            label: s.to_string(),
            suggestion: suggest(DOSE_UNIT_ALIASES, s, |u| u.label().to_string()),
        })
    }
}

impl FromStr for FluidType {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(FLUID_ALIASES, s).ok_or_else(|| UnitError::UnknownFluid {
            label: s.to_string(),
            suggestion: suggest(FLUID_ALIASES, s, |f| f.label().to_string()),
        })
    }
}

impl FromStr for ConcentrationUnit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "mg/ml" => Ok(ConcentrationUnit::MgPerMl),
            "mcg/ml" | "µg/ml" | "μg/ml" | "ug/ml" => Ok(ConcentrationUnit::McgPerMl),
            _ => Err(UnitError::Unknown {
                label: s.to_string(),
                suggestion: None,
            }),
        }
    }
}
