//! Stock concentration, vehicle and carrier fluid models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unit of a labeled stock concentration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConcentrationUnit {
    #[serde(rename = "mg/mL")]
    MgPerMl,
    #[serde(rename = "mcg/mL")]
    McgPerMl,
}

impl ConcentrationUnit {
    pub fn label(self) -> &'static str {
        match self {
            ConcentrationUnit::MgPerMl => "mg/mL",
            ConcentrationUnit::McgPerMl => "mcg/mL",
        }
    }
}

impl fmt::Display for ConcentrationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Labeled concentration of a drug as supplied (vial, ampoule).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockConcentration {
    pub value: f64,
    pub unit: ConcentrationUnit,
    /// Display label (e.g., "Ketamine 100 mg/mL")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl StockConcentration {
    pub fn mg_per_ml(value: f64) -> Self {
        Self {
            value,
            unit: ConcentrationUnit::MgPerMl,
            label: None,
        }
    }

    pub fn mcg_per_ml(value: f64) -> Self {
        Self {
            value,
            unit: ConcentrationUnit::McgPerMl,
            label: None,
        }
    }

    /// Concentration expressed in mcg/mL.
    pub fn as_mcg_per_ml(&self) -> f64 {
        match self.unit {
            ConcentrationUnit::MgPerMl => self.value * 1000.0,
            ConcentrationUnit::McgPerMl => self.value,
        }
    }
}

impl fmt::Display for StockConcentration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => f.write_str(label),
            None => write!(f, "{} {}", self.value, self.unit),
        }
    }
}

/// Carrier fluids a bag vehicle can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FluidType {
    #[serde(rename = "NaCl 0.9%")]
    Saline,
    #[serde(rename = "LRS")]
    LactatedRingers,
    #[serde(rename = "D5W")]
    Dextrose5,
    #[serde(rename = "Plasma-Lyte")]
    PlasmaLyte,
    #[serde(rename = "NaCl 0.45%")]
    HalfSaline,
    #[serde(rename = "D2.5/NaCl 0.45%")]
    Dextrose25HalfSaline,
    #[serde(rename = "Sterile water")]
    SterileWater,
}

impl FluidType {
    pub const ALL: [FluidType; 7] = [
        FluidType::Saline,
        FluidType::LactatedRingers,
        FluidType::Dextrose5,
        FluidType::PlasmaLyte,
        FluidType::HalfSaline,
        FluidType::Dextrose25HalfSaline,
        FluidType::SterileWater,
    ];

    /// Canonical label, identical to the serialized form.
    pub fn label(self) -> &'static str {
        match self {
            FluidType::Saline => "NaCl 0.9%",
            FluidType::LactatedRingers => "LRS",
            FluidType::Dextrose5 => "D5W",
            FluidType::PlasmaLyte => "Plasma-Lyte",
            FluidType::HalfSaline => "NaCl 0.45%",
            FluidType::Dextrose25HalfSaline => "D2.5/NaCl 0.45%",
            FluidType::SterileWater => "Sterile water",
        }
    }
}

impl fmt::Display for FluidType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Container the final admixture is prepared in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Vehicle {
    Syringe { volume_ml: f64 },
    Bag { volume_ml: f64, fluid: FluidType },
}

impl Vehicle {
    pub fn volume_ml(&self) -> f64 {
        match self {
            Vehicle::Syringe { volume_ml } | Vehicle::Bag { volume_ml, .. } => *volume_ml,
        }
    }

    /// Carrier fluid, if the vehicle is a bag.
    pub fn fluid(&self) -> Option<FluidType> {
        match self {
            Vehicle::Syringe { .. } => None,
            Vehicle::Bag { fluid, .. } => Some(*fluid),
        }
    }
}
