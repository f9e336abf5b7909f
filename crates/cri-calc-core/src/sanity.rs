//! Self-test of the conversion and calculation paths.
//!
//! Nothing runs at load time. Hosts call [`run_sanity_checks`] from an
//! explicit startup hook (see the `cri-sanity` binary) or from tests.

use tracing::{error, info};

use crate::calc::{calculate_bolus, calculate_cri};
use crate::format::parse_locale_number;
use crate::models::{BolusInput, CriInput, Delivery, Dose, DoseUnit, StockConcentration};
use crate::units::convert;

/// Values used for the round-trip identity check.
const ROUND_TRIP_VALUES: [f64; 7] = [0.0, 0.001, 0.1, 1.0, 10.0, 100.0, 1000.0];

/// Relative tolerance of the round-trip identity.
const ROUND_TRIP_TOLERANCE: f64 = 1e-5;

/// Outcome of a single named check.
#[derive(Debug, Clone, PartialEq)]
pub struct SanityCheck {
    pub name: String,
    pub passed: bool,
    pub detail: String,
}

fn check(name: impl Into<String>, passed: bool, detail: impl Into<String>) -> SanityCheck {
    SanityCheck {
        name: name.into(),
        passed,
        detail: detail.into(),
    }
}

fn close(actual: f64, expected: f64, tolerance: f64) -> bool {
    (actual - expected).abs() <= tolerance
}

fn known_conversion(value: f64, from: DoseUnit, to: DoseUnit, expected: f64) -> SanityCheck {
    let name = format!("{} {} = {} {}", value, from, expected, to);
    match convert(value, from, to) {
        Ok(actual) => check(name, close(actual, expected, 1e-9), format!("got {}", actual)),
        Err(e) => check(name, false, e.to_string()),
    }
}

fn round_trip_checks() -> Vec<SanityCheck> {
    let mut checks = Vec::new();
    for family in [&DoseUnit::CRI[..], &DoseUnit::BOLUS[..]] {
        for &a in family {
            for &b in family {
                let failures: Vec<String> = ROUND_TRIP_VALUES
                    .iter()
                    .filter_map(|&v| {
                        let back = convert(v, a, b).and_then(|x| convert(x, b, a));
                        match back {
                            Ok(back) if close(back, v, ROUND_TRIP_TOLERANCE * v.abs()) => None,
                            Ok(back) => Some(format!("{} → {}", v, back)),
                            Err(e) => Some(e.to_string()),
                        }
                    })
                    .collect();
                checks.push(check(
                    format!("round trip {} ↔ {}", a, b),
                    failures.is_empty(),
                    failures.join(", "),
                ));
            }
        }
    }
    checks
}

fn parser_checks() -> Vec<SanityCheck> {
    [("1,2,3", 0.0), ("1.2.3", 0.0), ("1,23", 1.23), ("", 0.0)]
        .into_iter()
        .map(|(text, expected)| {
            let actual = parse_locale_number(text);
            check(
                format!("parse {:?}", text),
                actual == expected,
                format!("got {}", actual),
            )
        })
        .collect()
}

fn scenario_checks() -> Vec<SanityCheck> {
    let mut checks = Vec::new();

    let scenario_a = CriInput {
        dose: Dose::new(0.5, DoseUnit::MgPerKgPerHour),
        weight_kg: 5.5,
        stock: StockConcentration::mg_per_ml(100.0),
        vehicle_volume_ml: 60.0,
        delivery: Delivery::PumpRate(5.0),
    };
    checks.push(match calculate_cri(&scenario_a) {
        Ok(r) => check(
            "CRI 0.5 mg/kg/h, 5.5 kg, 100 mg/mL",
            close(r.drug_volume_ml, 0.33, 0.01),
            format!("drug volume {}", r.drug_volume_ml),
        ),
        Err(e) => check("CRI 0.5 mg/kg/h, 5.5 kg, 100 mg/mL", false, e.to_string()),
    });

    let scenario_b = CriInput {
        dose: Dose::new(5.0, DoseUnit::McgPerKgPerHour),
        stock: StockConcentration::mcg_per_ml(50.0),
        ..scenario_a
    };
    checks.push(match calculate_cri(&scenario_b) {
        Ok(r) => check(
            "CRI 5 mcg/kg/h, 5.5 kg, 50 mcg/mL",
            close(r.drug_volume_ml, 6.6, 0.05),
            format!("drug volume {}", r.drug_volume_ml),
        ),
        Err(e) => check("CRI 5 mcg/kg/h, 5.5 kg, 50 mcg/mL", false, e.to_string()),
    });

    let scenario_d = BolusInput {
        dose: Dose::new(2.0, DoseUnit::MgPerKg),
        weight_kg: 5.0,
        stock: StockConcentration::mg_per_ml(20.0),
        final_volume_ml: Some(10.0),
    };
    checks.push(match calculate_bolus(&scenario_d) {
        Ok(r) => check(
            "Bolus 2 mg/kg, 5 kg, 20 mg/mL, diluted to 10 mL",
            r.total_dose_mg == 10.0 && r.drug_volume_ml == 0.5 && r.diluent_volume_ml == Some(9.5),
            format!(
                "total {} mg, drug {} mL, diluent {:?} mL",
                r.total_dose_mg, r.drug_volume_ml, r.diluent_volume_ml
            ),
        ),
        Err(e) => check("Bolus 2 mg/kg, 5 kg, 20 mg/mL, diluted to 10 mL", false, e.to_string()),
    });

    checks
}

/// Run every check and return the individual outcomes.
pub fn sanity_report() -> Vec<SanityCheck> {
    let mut checks = vec![
        known_conversion(1.0, DoseUnit::McgPerKgPerMin, DoseUnit::MgPerKgPerHour, 0.06),
        known_conversion(1000.0, DoseUnit::McgPerKgPerHour, DoseUnit::MgPerKgPerHour, 1.0),
        known_conversion(1.0, DoseUnit::MgPerKgPerMin, DoseUnit::MgPerKgPerHour, 60.0),
        known_conversion(24.0, DoseUnit::MgPerKgPerDay, DoseUnit::MgPerKgPerHour, 1.0),
        known_conversion(1000.0, DoseUnit::McgPerKg, DoseUnit::MgPerKg, 1.0),
    ];
    checks.extend(round_trip_checks());
    checks.extend(parser_checks());
    checks.extend(scenario_checks());
    checks
}

/// Run every check, log failures, and report whether all passed.
pub fn run_sanity_checks() -> bool {
    let report = sanity_report();
    let failed: Vec<&SanityCheck> = report.iter().filter(|c| !c.passed).collect();

    for check in &failed {
        error!(check = %check.name, detail = %check.detail, "Sanity check failed");
    }
    info!(
        total = report.len(),
        failed = failed.len(),
        "Sanity checks completed"
    );

    failed.is_empty()
}
