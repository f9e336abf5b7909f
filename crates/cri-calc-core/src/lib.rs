//! CRI-Calc Core Library
//!
//! Veterinary dosing engine for continuous rate infusions (CRI) and bolus
//! injections.
//!
//! # Architecture
//!
//! ```text
//! Dose + weight + stock + vehicle (from the UI)
//!                 │
//!         Unit Conversion ──── UnsupportedUnit
//!                 │
//!            Validation ────── InvalidInput
//!                 │
//!       ┌─────────┴─────────┐
//!       ▼                   ▼
//!   CRI engine         Bolus engine
//!       │                   │
//!       └─────────┬─────────┘
//!                 │  result + derivation steps + warnings
//!       ┌─────────┴─────────┐
//!       ▼                   ▼
//!  Dose-range         Fluid compatibility
//!  classifier            lookup
//!       └─────────┬─────────┘
//!                 ▼
//!        Numeric formatting (display)
//! ```
//!
//! # Core Principle
//!
//! **Safety annotations never alter a volume.** Range and compatibility
//! verdicts are advisory; physically impossible outcomes are returned as
//! warnings next to the computed numbers, and the caller decides.
//!
//! # Modules
//!
//! - [`models`]: Domain types (Dose, StockConcentration, Vehicle, DrugReference, results)
//! - [`units`]: Dose unit conversion and label parsing
//! - [`format`]: Locale-aware number parsing and display rounding
//! - [`calc`]: Validation, CRI and bolus engines
//! - [`safety`]: Dose-range classifier and fluid compatibility lookup
//! - [`sanity`]: Explicit self-test

pub mod calc;
pub mod format;
pub mod models;
pub mod safety;
pub mod sanity;
pub mod units;

// Re-export commonly used types
pub use calc::{calculate_bolus, calculate_cri, CalcError, InputField};
pub use format::{
    format_for_display, is_partial_valid_input, parse_locale_number, parse_optional_number,
    round_for, FormatConfig, ValueCategory,
};
pub use models::{
    BolusInput, BolusResult, CalcWarning, CompatibilityLevel, CompatibilityProfile,
    CompatibilityVerdict, CriInput, CriResult, Delivery, DerivationStep, Dose, DoseRange,
    DoseUnit, DrugReference, FluidType, RangeLevel, RangeStatus, StockConcentration, Vehicle,
};
pub use safety::{assess_bolus, assess_cri, check_fluid_compatibility, classify_dose};
pub use sanity::run_sanity_checks;
pub use units::{convert, UnitError};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum CriCalcError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported unit: {0}")]
    UnsupportedUnit(String),

    #[error("Unknown fluid: {0}")]
    UnknownFluid(String),

    #[error("Reference data error: {0}")]
    ReferenceData(String),
}

impl From<CalcError> for CriCalcError {
    fn from(e: CalcError) -> Self {
        match e {
            CalcError::InvalidInput { .. } => CriCalcError::InvalidInput(e.to_string()),
            CalcError::UnsupportedUnit(unit) => unit.into(),
        }
    }
}

impl From<UnitError> for CriCalcError {
    fn from(e: UnitError) -> Self {
        match e {
            UnitError::UnknownFluid { .. } => CriCalcError::UnknownFluid(e.to_string()),
            _ => CriCalcError::UnsupportedUnit(e.to_string()),
        }
    }
}

impl From<models::ReferenceError> for CriCalcError {
    fn from(e: models::ReferenceError) -> Self {
        CriCalcError::ReferenceData(e.to_string())
    }
}

// =========================================================================
// Exported Functions
// =========================================================================

/// Convert a dose magnitude between two unit labels of the same family.
#[uniffi::export]
pub fn convert_dose_units(value: f64, from: String, to: String) -> Result<f64, CriCalcError> {
    let from: DoseUnit = from.parse()?;
    let to: DoseUnit = to.parse()?;
    Ok(convert(value, from, to)?)
}

/// Calculate CRI preparation instructions.
#[uniffi::export]
pub fn compute_cri(input: FfiCriInput) -> Result<FfiCriResult, CriCalcError> {
    let input = CriInput::try_from(input)?;
    let result = calculate_cri(&input)?;
    Ok(result.into())
}

/// Calculate bolus preparation instructions.
#[uniffi::export]
pub fn compute_bolus(input: FfiBolusInput) -> Result<FfiBolusResult, CriCalcError> {
    let input = BolusInput::try_from(input)?;
    let result = calculate_bolus(&input)?;
    Ok(result.into())
}

/// Calculate a CRI for a drug given as reference JSON and annotate it.
///
/// With `bag_fluid` the vehicle is a bag of that fluid, otherwise a syringe.
#[uniffi::export]
pub fn assess_cri_for_drug(
    drug_json: String,
    input: FfiCriInput,
    bag_fluid: Option<String>,
) -> Result<FfiCriAssessment, CriCalcError> {
    let drug = DrugReference::from_json(&drug_json)?;
    let input = CriInput::try_from(input)?;
    let vehicle = match bag_fluid {
        Some(label) => Vehicle::Bag {
            volume_ml: input.vehicle_volume_ml,
            fluid: label.parse()?,
        },
        None => Vehicle::Syringe {
            volume_ml: input.vehicle_volume_ml,
        },
    };
    let assessment = assess_cri(&drug, &input, &vehicle)?;
    Ok(FfiCriAssessment {
        drug: assessment.drug,
        result: assessment.result.into(),
        range: assessment.range.into(),
        compatibility: assessment.compatibility.map(|c| c.into()),
    })
}

/// Classify a dose against declared ranges. Never fails.
#[uniffi::export]
pub fn classify_dose_range(value: f64, unit: String, ranges: Vec<FfiDoseRange>) -> FfiRangeStatus {
    let unit: DoseUnit = match unit.parse() {
        Ok(unit) => unit,
        Err(e) => return RangeStatus::unknown(e.to_string()).into(),
    };
    // Ranges with unknown labels are dropped, like missing data
    let ranges: Vec<DoseRange> = ranges
        .into_iter()
        .filter_map(|r| DoseRange::try_from(r).ok())
        .collect();
    classify_dose(value, unit, &ranges).into()
}

/// Check a carrier fluid against a compatibility profile. Never fails.
#[uniffi::export]
pub fn check_fluid(
    candidate: Option<String>,
    profile: Option<FfiCompatibilityProfile>,
) -> FfiCompatibilityVerdict {
    let candidate = match candidate.map(|label| label.parse::<FluidType>()).transpose() {
        Ok(fluid) => fluid,
        Err(e) => {
            return FfiCompatibilityVerdict {
                level: CompatibilityLevel::Caution.as_str().to_string(),
                reason: format!("{}; selection required", e),
            }
        }
    };
    let profile = profile.and_then(|p| CompatibilityProfile::try_from(p).ok());
    check_fluid_compatibility(candidate, profile.as_ref()).into()
}

/// Parse a number typed with a decimal comma or point (0 when invalid).
#[uniffi::export]
pub fn parse_number(text: String) -> f64 {
    parse_locale_number(&text)
}

/// Whether text is a valid number while the user is still typing.
#[uniffi::export]
pub fn is_partial_number(text: String) -> bool {
    is_partial_valid_input(&text)
}

/// Round and render a value for display.
#[uniffi::export]
pub fn format_number(value: f64, category: FfiValueCategory) -> String {
    format_for_display(value, category.into())
}

/// Run the engine self-test.
#[uniffi::export]
pub fn self_test() -> bool {
    run_sanity_checks()
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe value category.
#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum FfiValueCategory {
    Volume,
    Dose,
    Concentration,
    Rate,
    Weight,
}

impl From<FfiValueCategory> for ValueCategory {
    fn from(category: FfiValueCategory) -> Self {
        match category {
            FfiValueCategory::Volume => ValueCategory::Volume,
            FfiValueCategory::Dose => ValueCategory::Dose,
            FfiValueCategory::Concentration => ValueCategory::Concentration,
            FfiValueCategory::Rate => ValueCategory::Rate,
            FfiValueCategory::Weight => ValueCategory::Weight,
        }
    }
}

/// FFI-safe CRI input. Exactly one of pump rate or duration is used;
/// pump rate wins when both are set.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCriInput {
    pub dose: f64,
    pub dose_unit: String,
    pub weight_kg: f64,
    pub stock_value: f64,
    pub stock_unit: String,
    pub vehicle_volume_ml: f64,
    pub pump_rate_ml_per_hour: Option<f64>,
    pub duration_hours: Option<f64>,
}

impl TryFrom<FfiCriInput> for CriInput {
    type Error = CriCalcError;

    fn try_from(input: FfiCriInput) -> Result<Self, Self::Error> {
        let delivery = match (input.pump_rate_ml_per_hour, input.duration_hours) {
            (Some(rate), _) => Delivery::PumpRate(rate),
            (None, Some(hours)) => Delivery::Duration(hours),
            (None, None) => {
                return Err(CriCalcError::InvalidInput(
                    "pump rate or duration is required".into(),
                ))
            }
        };
        Ok(CriInput {
            dose: Dose::new(input.dose, input.dose_unit.parse()?),
            weight_kg: input.weight_kg,
            stock: StockConcentration {
                value: input.stock_value,
                unit: input.stock_unit.parse()?,
                label: None,
            },
            vehicle_volume_ml: input.vehicle_volume_ml,
            delivery,
        })
    }
}

/// FFI-safe bolus input.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBolusInput {
    pub dose: f64,
    pub dose_unit: String,
    pub weight_kg: f64,
    pub stock_value: f64,
    pub stock_unit: String,
    pub final_volume_ml: Option<f64>,
}

impl TryFrom<FfiBolusInput> for BolusInput {
    type Error = CriCalcError;

    fn try_from(input: FfiBolusInput) -> Result<Self, Self::Error> {
        Ok(BolusInput {
            dose: Dose::new(input.dose, input.dose_unit.parse()?),
            weight_kg: input.weight_kg,
            stock: StockConcentration {
                value: input.stock_value,
                unit: input.stock_unit.parse()?,
                label: None,
            },
            final_volume_ml: input.final_volume_ml,
        })
    }
}

/// FFI-safe derivation step.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDerivationStep {
    pub label: String,
    pub formula: String,
    pub example: String,
}

impl From<DerivationStep> for FfiDerivationStep {
    fn from(step: DerivationStep) -> Self {
        Self {
            label: step.label,
            formula: step.formula,
            example: step.example,
        }
    }
}

/// FFI-safe CRI result (full precision).
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCriResult {
    pub mass_mg_per_hour: f64,
    pub required_conc_mg_per_ml: f64,
    pub final_conc_mg_per_ml: f64,
    pub pump_rate_ml_per_hour: f64,
    pub drug_volume_ml: f64,
    pub diluent_volume_ml: f64,
    pub steps: Vec<FfiDerivationStep>,
    pub warnings: Vec<String>,
}

impl From<CriResult> for FfiCriResult {
    fn from(result: CriResult) -> Self {
        Self {
            mass_mg_per_hour: result.mass_mg_per_hour,
            required_conc_mg_per_ml: result.required_conc_mg_per_ml,
            final_conc_mg_per_ml: result.final_conc_mg_per_ml,
            pump_rate_ml_per_hour: result.pump_rate_ml_per_hour,
            drug_volume_ml: result.drug_volume_ml,
            diluent_volume_ml: result.diluent_volume_ml,
            steps: result.steps.into_iter().map(|s| s.into()).collect(),
            warnings: result.warnings.iter().map(|w| w.to_string()).collect(),
        }
    }
}

/// FFI-safe bolus result (full precision).
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBolusResult {
    pub total_dose_mg: f64,
    pub drug_volume_ml: f64,
    pub final_volume_ml: Option<f64>,
    pub diluent_volume_ml: Option<f64>,
    pub steps: Vec<FfiDerivationStep>,
    pub warnings: Vec<String>,
}

impl From<BolusResult> for FfiBolusResult {
    fn from(result: BolusResult) -> Self {
        Self {
            total_dose_mg: result.total_dose_mg,
            drug_volume_ml: result.drug_volume_ml,
            final_volume_ml: result.final_volume_ml,
            diluent_volume_ml: result.diluent_volume_ml,
            steps: result.steps.into_iter().map(|s| s.into()).collect(),
            warnings: result.warnings.iter().map(|w| w.to_string()).collect(),
        }
    }
}

/// FFI-safe dose range.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDoseRange {
    pub min: f64,
    pub max: f64,
    pub unit: String,
}

impl TryFrom<FfiDoseRange> for DoseRange {
    type Error = CriCalcError;

    fn try_from(range: FfiDoseRange) -> Result<Self, Self::Error> {
        Ok(DoseRange::new(range.min, range.max, range.unit.parse()?)?)
    }
}

/// FFI-safe range status.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRangeStatus {
    pub level: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub unit: Option<String>,
    pub message: String,
}

impl From<RangeStatus> for FfiRangeStatus {
    fn from(status: RangeStatus) -> Self {
        Self {
            level: status.level.as_str().to_string(),
            min: status.min,
            max: status.max,
            unit: status.unit.map(|u| u.label().to_string()),
            message: status.message,
        }
    }
}

/// FFI-safe compatibility profile.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCompatibilityProfile {
    pub preferred: String,
    pub compatible: Vec<String>,
    pub avoid: Vec<String>,
    pub notes: Option<String>,
}

impl TryFrom<FfiCompatibilityProfile> for CompatibilityProfile {
    type Error = CriCalcError;

    fn try_from(profile: FfiCompatibilityProfile) -> Result<Self, Self::Error> {
        let parse_all = |labels: Vec<String>| -> Result<Vec<FluidType>, CriCalcError> {
            labels
                .iter()
                .map(|l| l.parse::<FluidType>().map_err(CriCalcError::from))
                .collect()
        };
        Ok(CompatibilityProfile {
            preferred: profile.preferred.parse()?,
            compatible: parse_all(profile.compatible)?,
            avoid: parse_all(profile.avoid)?,
            notes: profile.notes,
        })
    }
}

/// FFI-safe compatibility verdict.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCompatibilityVerdict {
    pub level: String,
    pub reason: String,
}

impl From<CompatibilityVerdict> for FfiCompatibilityVerdict {
    fn from(verdict: CompatibilityVerdict) -> Self {
        Self {
            level: verdict.level.as_str().to_string(),
            reason: verdict.reason,
        }
    }
}

/// FFI-safe annotated CRI.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCriAssessment {
    pub drug: String,
    pub result: FfiCriResult,
    pub range: FfiRangeStatus,
    pub compatibility: Option<FfiCompatibilityVerdict>,
}
