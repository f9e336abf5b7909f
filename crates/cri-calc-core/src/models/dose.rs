//! Dose and dose unit models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unit family of a dose unit.
///
/// Doses are only ever converted within a family: a rate has no
/// time-neutral bridge to a single injected amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitFamily {
    /// Rate-based units (mass per kg per time)
    Cri,
    /// Mass-based units (mass per kg)
    Bolus,
}

impl fmt::Display for UnitFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitFamily::Cri => write!(f, "CRI"),
            UnitFamily::Bolus => write!(f, "bolus"),
        }
    }
}

/// Closed set of supported dose units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoseUnit {
    #[serde(rename = "mcg/kg/min")]
    McgPerKgPerMin,
    #[serde(rename = "mcg/kg/h")]
    McgPerKgPerHour,
    #[serde(rename = "mg/kg/min")]
    MgPerKgPerMin,
    #[serde(rename = "mg/kg/h")]
    MgPerKgPerHour,
    #[serde(rename = "mg/kg/day")]
    MgPerKgPerDay,
    #[serde(rename = "U/kg/h")]
    UnitsPerKgPerHour,
    #[serde(rename = "mU/kg/min")]
    MilliunitsPerKgPerMin,
    #[serde(rename = "mcg/kg")]
    McgPerKg,
    #[serde(rename = "mg/kg")]
    MgPerKg,
    #[serde(rename = "U/kg")]
    UnitsPerKg,
}

impl DoseUnit {
    /// Rate-based units, in display order.
    pub const CRI: [DoseUnit; 7] = [
        DoseUnit::McgPerKgPerMin,
        DoseUnit::McgPerKgPerHour,
        DoseUnit::MgPerKgPerMin,
        DoseUnit::MgPerKgPerHour,
        DoseUnit::MgPerKgPerDay,
        DoseUnit::UnitsPerKgPerHour,
        DoseUnit::MilliunitsPerKgPerMin,
    ];

    /// Mass-based units, in display order.
    pub const BOLUS: [DoseUnit; 3] = [DoseUnit::McgPerKg, DoseUnit::MgPerKg, DoseUnit::UnitsPerKg];

    /// Every supported unit.
    pub fn all() -> impl Iterator<Item = DoseUnit> {
        Self::CRI.into_iter().chain(Self::BOLUS)
    }

    /// Canonical label (e.g. "mcg/kg/min").
    pub fn label(self) -> &'static str {
        match self {
            DoseUnit::McgPerKgPerMin => "mcg/kg/min",
            DoseUnit::McgPerKgPerHour => "mcg/kg/h",
            DoseUnit::MgPerKgPerMin => "mg/kg/min",
            DoseUnit::MgPerKgPerHour => "mg/kg/h",
            DoseUnit::MgPerKgPerDay => "mg/kg/day",
            DoseUnit::UnitsPerKgPerHour => "U/kg/h",
            DoseUnit::MilliunitsPerKgPerMin => "mU/kg/min",
            DoseUnit::McgPerKg => "mcg/kg",
            DoseUnit::MgPerKg => "mg/kg",
            DoseUnit::UnitsPerKg => "U/kg",
        }
    }

    /// Family this unit belongs to.
    pub fn family(self) -> UnitFamily {
        match self {
            DoseUnit::McgPerKg | DoseUnit::MgPerKg | DoseUnit::UnitsPerKg => UnitFamily::Bolus,
            _ => UnitFamily::Cri,
        }
    }

    /// Base unit of this unit's family.
    pub fn base(self) -> DoseUnit {
        match self.family() {
            UnitFamily::Cri => DoseUnit::MgPerKgPerHour,
            UnitFamily::Bolus => DoseUnit::MgPerKg,
        }
    }

    /// Whether the unit counts activity units (U, mU) rather than mass.
    ///
    /// These are converted as if 1 U = 1 mg. That holds for the drugs the
    /// reference data declares in units (insulin, vasopressin) only because
    /// their ranges and stocks are also expressed in units, never because
    /// a unit weighs a milligram.
    pub fn is_unit_based(self) -> bool {
        matches!(
            self,
            DoseUnit::UnitsPerKgPerHour | DoseUnit::MilliunitsPerKgPerMin | DoseUnit::UnitsPerKg
        )
    }

    /// Mass unit an activity unit is converted as, under 1 U = 1 mg.
    pub fn mass_equivalent(self) -> Option<DoseUnit> {
        match self {
            DoseUnit::UnitsPerKgPerHour => Some(DoseUnit::MgPerKgPerHour),
            DoseUnit::MilliunitsPerKgPerMin => Some(DoseUnit::McgPerKgPerMin),
            DoseUnit::UnitsPerKg => Some(DoseUnit::MgPerKg),
            _ => None,
        }
    }
}

impl fmt::Display for DoseUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A prescribed dose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dose {
    pub value: f64,
    pub unit: DoseUnit,
}

impl Dose {
    pub fn new(value: f64, unit: DoseUnit) -> Self {
        Self { value, unit }
    }
}

impl fmt::Display for Dose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}
