//! Continuous rate infusion engine.

use tracing::{debug, warn};

use super::{ensure_positive, validate_cri_input, CalcResult, InputField};
use crate::format::{format_for_display, ValueCategory};
use crate::models::{CalcWarning, CriInput, CriResult, Delivery, DerivationStep};
use crate::units::to_mcg_per_kg_per_hour;

/// Compute preparation instructions for a CRI.
///
/// 1. Dose → mcg/kg/h, × weight → mcg/h → mg/h
/// 2. Pump rate: explicit, or vehicle volume ÷ duration
/// 3. Required concentration = mg/h ÷ mL/h
/// 4. Drug volume = required mcg/mL × vehicle mL ÷ stock mcg/mL
/// 5. Diluent volume = vehicle − drug volume
pub fn calculate_cri(input: &CriInput) -> CalcResult<CriResult> {
    validate_cri_input(input)?;

    let vehicle_ml = input.vehicle_volume_ml;
    let dose_mcg_kg_h = to_mcg_per_kg_per_hour(input.dose.value, input.dose.unit)?;
    let mcg_per_hour = dose_mcg_kg_h * input.weight_kg;
    let mg_per_hour = mcg_per_hour / 1000.0;

    let pump_rate = match input.delivery {
        Delivery::PumpRate(rate) => rate,
        // Tiny durations can push the derived rate to infinity
        Delivery::Duration(hours) => ensure_positive(InputField::Duration, vehicle_ml / hours)?,
    };

    let required_conc_mg_ml = mg_per_hour / pump_rate;
    let stock_mcg_ml = input.stock.as_mcg_per_ml();
    let drug_volume_ml = required_conc_mg_ml * 1000.0 * vehicle_ml / stock_mcg_ml;
    let diluent_volume_ml = vehicle_ml - drug_volume_ml;
    let final_conc_mg_ml = drug_volume_ml * stock_mcg_ml / vehicle_ml / 1000.0;

    let mut warnings = Vec::new();
    if drug_volume_ml < 0.0 {
        warnings.push(CalcWarning::NegativeDrugVolume { drug_volume_ml });
    }
    if drug_volume_ml > vehicle_ml {
        warnings.push(CalcWarning::DrugVolumeExceedsVehicle {
            drug_volume_ml,
            vehicle_volume_ml: vehicle_ml,
        });
    }
    if diluent_volume_ml < 0.0 {
        warnings.push(CalcWarning::NegativeDiluentVolume { diluent_volume_ml });
    }
    for warning in &warnings {
        warn!(dose = %input.dose, weight_kg = input.weight_kg, "CRI warning: {}", warning);
    }

    let result = CriResult {
        dose_mcg_per_kg_per_hour: dose_mcg_kg_h,
        mass_mg_per_hour: mg_per_hour,
        required_conc_mg_per_ml: required_conc_mg_ml,
        final_conc_mg_per_ml: final_conc_mg_ml,
        pump_rate_ml_per_hour: pump_rate,
        vehicle_volume_ml: vehicle_ml,
        drug_volume_ml,
        diluent_volume_ml,
        steps: Vec::new(),
        warnings,
    };

    let steps = cri_steps(input, &result);
    debug!(
        dose = %input.dose,
        weight_kg = input.weight_kg,
        mg_per_hour,
        pump_rate,
        drug_volume_ml,
        diluent_volume_ml,
        "CRI calculated"
    );

    Ok(CriResult { steps, ..result })
}

/// Derivation trace for display; has no effect on the numbers.
fn cri_steps(input: &CriInput, r: &CriResult) -> Vec<DerivationStep> {
    let dose = &input.dose;
    let stock_mcg_ml = input.stock.as_mcg_per_ml();
    let vol = |v: f64| format_for_display(v, ValueCategory::Volume);
    let dose_fmt = |v: f64| format_for_display(v, ValueCategory::Dose);
    let conc = |v: f64| format_for_display(v, ValueCategory::Concentration);
    let rate = |v: f64| format_for_display(v, ValueCategory::Rate);

    let mut steps = Vec::with_capacity(9);

    if dose.unit.is_unit_based() {
        steps.push(DerivationStep::new(
            "Unit assumption",
            "1 U = 1 mg (U and mU doses are scaled like mass)",
            match dose.unit.mass_equivalent() {
                Some(mass) => format!("{} is converted as {}", dose.unit, mass),
                None => dose.unit.to_string(),
            },
        ));
    }

    steps.push(DerivationStep::new(
        "Dose normalization",
        format!("dose ({}) → mcg/kg/h", dose.unit),
        format!(
            "{} {} = {} mcg/kg/h",
            dose_fmt(dose.value),
            dose.unit,
            dose_fmt(r.dose_mcg_per_kg_per_hour)
        ),
    ));

    steps.push(DerivationStep::new(
        "Total mass per hour",
        "mcg/kg/h × weight (kg) ÷ 1000 = mg/h",
        format!(
            "{} × {} ÷ 1000 = {} mg/h",
            dose_fmt(r.dose_mcg_per_kg_per_hour),
            format_for_display(input.weight_kg, ValueCategory::Weight),
            dose_fmt(r.mass_mg_per_hour)
        ),
    ));

    steps.push(match input.delivery {
        Delivery::PumpRate(_) => DerivationStep::new(
            "Pump rate",
            "explicit pump rate (mL/h)",
            format!("{} mL/h", rate(r.pump_rate_ml_per_hour)),
        ),
        Delivery::Duration(hours) => DerivationStep::new(
            "Pump rate",
            "vehicle volume (mL) ÷ duration (h) = mL/h",
            format!(
                "{} ÷ {} = {} mL/h",
                vol(r.vehicle_volume_ml),
                rate(hours),
                rate(r.pump_rate_ml_per_hour)
            ),
        ),
    });

    steps.push(DerivationStep::new(
        "Required concentration",
        "mg/h ÷ pump rate (mL/h) = mg/mL",
        format!(
            "{} ÷ {} = {} mg/mL",
            dose_fmt(r.mass_mg_per_hour),
            rate(r.pump_rate_ml_per_hour),
            conc(r.required_conc_mg_per_ml)
        ),
    ));

    steps.push(DerivationStep::new(
        "Stock concentration",
        format!("{} → mcg/mL", input.stock.unit),
        format!(
            "{} {} = {} mcg/mL",
            conc(input.stock.value),
            input.stock.unit,
            conc(stock_mcg_ml)
        ),
    ));

    steps.push(DerivationStep::new(
        "Drug volume",
        "(required mcg/mL × vehicle mL) ÷ stock mcg/mL",
        format!(
            "({} × {}) ÷ {} = {} mL",
            conc(r.required_conc_mg_per_ml * 1000.0),
            vol(r.vehicle_volume_ml),
            conc(stock_mcg_ml),
            vol(r.drug_volume_ml)
        ),
    ));

    steps.push(DerivationStep::new(
        "Diluent volume",
        "vehicle mL − drug volume mL",
        format!(
            "{} − {} = {} mL",
            vol(r.vehicle_volume_ml),
            vol(r.drug_volume_ml),
            vol(r.diluent_volume_ml)
        ),
    ));

    steps.push(DerivationStep::new(
        "Final concentration",
        "(drug volume × stock mcg/mL ÷ vehicle mL) ÷ 1000 = mg/mL",
        format!(
            "({} × {} ÷ {}) ÷ 1000 = {} mg/mL",
            vol(r.drug_volume_ml),
            conc(stock_mcg_ml),
            vol(r.vehicle_volume_ml),
            conc(r.final_conc_mg_per_ml)
        ),
    ));

    steps
}
