//! Bolus injection engine.

use tracing::{debug, warn};

use super::{validate_bolus_input, CalcResult};
use crate::format::{format_for_display, ValueCategory};
use crate::models::{BolusInput, BolusResult, CalcWarning, DerivationStep};
use crate::units::to_mg_per_kg;

/// Compute the volume to draw for a single injected dose, optionally
/// diluted to a final volume.
pub fn calculate_bolus(input: &BolusInput) -> CalcResult<BolusResult> {
    validate_bolus_input(input)?;

    let dose_mg_kg = to_mg_per_kg(input.dose.value, input.dose.unit)?;
    let total_dose_mg = dose_mg_kg * input.weight_kg;
    let stock_mcg_ml = input.stock.as_mcg_per_ml();
    let drug_volume_ml = total_dose_mg * 1000.0 / stock_mcg_ml;

    let mut warnings = Vec::new();
    let diluent_volume_ml = input.final_volume_ml.map(|final_ml| {
        let diluent = final_ml - drug_volume_ml;
        if diluent < 0.0 {
            warnings.push(CalcWarning::FinalVolumeBelowDrugVolume {
                drug_volume_ml,
                final_volume_ml: final_ml,
            });
        }
        diluent
    });
    for warning in &warnings {
        warn!(dose = %input.dose, weight_kg = input.weight_kg, "Bolus warning: {}", warning);
    }

    let result = BolusResult {
        dose_mg_per_kg: dose_mg_kg,
        total_dose_mg,
        drug_volume_ml,
        final_volume_ml: input.final_volume_ml,
        diluent_volume_ml,
        steps: Vec::new(),
        warnings,
    };

    let steps = bolus_steps(input, &result);
    debug!(
        dose = %input.dose,
        weight_kg = input.weight_kg,
        total_dose_mg,
        drug_volume_ml,
        "Bolus calculated"
    );

    Ok(BolusResult { steps, ..result })
}

fn bolus_steps(input: &BolusInput, r: &BolusResult) -> Vec<DerivationStep> {
    let dose = &input.dose;
    let stock_mcg_ml = input.stock.as_mcg_per_ml();
    let vol = |v: f64| format_for_display(v, ValueCategory::Volume);
    let dose_fmt = |v: f64| format_for_display(v, ValueCategory::Dose);
    let conc = |v: f64| format_for_display(v, ValueCategory::Concentration);

    let mut steps = Vec::with_capacity(6);

    if let Some(mass) = dose.unit.mass_equivalent() {
        steps.push(DerivationStep::new(
            "Unit assumption",
            "1 U = 1 mg (U doses are scaled like mass)",
            format!("{} is converted as {}", dose.unit, mass),
        ));
    }

    steps.push(DerivationStep::new(
        "Dose normalization",
        format!("dose ({}) → mg/kg", dose.unit),
        format!(
            "{} {} = {} mg/kg",
            dose_fmt(dose.value),
            dose.unit,
            dose_fmt(r.dose_mg_per_kg)
        ),
    ));

    steps.push(DerivationStep::new(
        "Total dose",
        "mg/kg × weight (kg) = mg",
        format!(
            "{} × {} = {} mg",
            dose_fmt(r.dose_mg_per_kg),
            format_for_display(input.weight_kg, ValueCategory::Weight),
            dose_fmt(r.total_dose_mg)
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
        "(total mg × 1000) ÷ stock mcg/mL",
        format!(
            "({} × 1000) ÷ {} = {} mL",
            dose_fmt(r.total_dose_mg),
            conc(stock_mcg_ml),
            vol(r.drug_volume_ml)
        ),
    ));

    if let (Some(final_ml), Some(diluent_ml)) = (r.final_volume_ml, r.diluent_volume_ml) {
        steps.push(DerivationStep::new(
            "Diluent volume",
            "final volume mL − drug volume mL",
            format!("{} − {} = {} mL", vol(final_ml), vol(r.drug_volume_ml), vol(diluent_ml)),
        ));
    }

    steps
}
