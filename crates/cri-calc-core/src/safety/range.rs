//! Dose-range classification.

use crate::format::{format_for_display, ValueCategory};
use crate::models::{DoseRange, DoseUnit, RangeLevel, RangeStatus};
use crate::units::convert;

/// Relative slack on converted bounds, matching the conversion round-trip tolerance.
const BOUND_TOLERANCE: f64 = 1e-5;

/// Classify a candidate dose against a drug's declared ranges.
///
/// A range declared in the candidate's unit wins; otherwise the first
/// declared range is converted into the candidate's unit. Bounds are
/// inclusive. Never fails: missing or incomparable data yields
/// [`RangeLevel::Unknown`].
pub fn classify_dose(value: f64, unit: DoseUnit, ranges: &[DoseRange]) -> RangeStatus {
    let Some(range) = ranges.iter().find(|r| r.unit == unit).or_else(|| ranges.first()) else {
        return RangeStatus::unknown("No recommended range declared for this drug");
    };
    if !value.is_finite() {
        return RangeStatus::unknown("Dose is not a valid number");
    }

    let bounds = convert(range.min, range.unit, unit)
        .and_then(|min| convert(range.max, range.unit, unit).map(|max| (min, max)));
    let (min, max) = match bounds {
        Ok(bounds) => bounds,
        Err(_) => {
            return RangeStatus::unknown(format!(
                "Recommended range is declared in {} ({}) and cannot be compared with {} ({})",
                range.unit,
                range.unit.family(),
                unit,
                unit.family()
            ))
        }
    };

    let level = if value < min - BOUND_TOLERANCE * min.abs() {
        RangeLevel::Below
    } else if value > max + BOUND_TOLERANCE * max.abs() {
        RangeLevel::Above
    } else {
        RangeLevel::Within
    };

    let position = match level {
        RangeLevel::Below => "Below",
        RangeLevel::Above => "Above",
        _ => "Within",
    };
    let mut message = format!(
        "{} recommended range ({}–{} {})",
        position,
        format_for_display(min, ValueCategory::Dose),
        format_for_display(max, ValueCategory::Dose),
        unit
    );
    if let Some(indication) = &range.indication {
        message.push_str(&format!(" for {}", indication));
    }

    RangeStatus {
        level,
        min: Some(min),
        max: Some(max),
        unit: Some(unit),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(value: f64, unit: DoseUnit, ranges: &[DoseRange]) -> RangeLevel {
        classify_dose(value, unit, ranges).level
    }

    fn ranges() -> Vec<DoseRange> {
        vec![
            DoseRange::new(1.0, 5.0, DoseUnit::McgPerKgPerMin).unwrap(),
            DoseRange::new(0.1, 0.6, DoseUnit::MgPerKgPerHour).unwrap(),
        ]
    }

    #[test]
    fn test_exact_unit_match() {
        let status = classify_dose(0.3, DoseUnit::MgPerKgPerHour, &ranges());
        assert_eq!(status.level, RangeLevel::Within);
        assert_eq!(status.min, Some(0.1));
        assert_eq!(status.max, Some(0.6));
        assert_eq!(status.unit, Some(DoseUnit::MgPerKgPerHour));
    }

    #[test]
    fn test_boundaries_inclusive() {
        assert_eq!(level(1.0, DoseUnit::McgPerKgPerMin, &ranges()), RangeLevel::Within);
        assert_eq!(level(5.0, DoseUnit::McgPerKgPerMin, &ranges()), RangeLevel::Within);
        assert_eq!(level(0.99, DoseUnit::McgPerKgPerMin, &ranges()), RangeLevel::Below);
        assert_eq!(level(5.01, DoseUnit::McgPerKgPerMin, &ranges()), RangeLevel::Above);
    }

    #[test]
    fn test_converted_boundaries_inclusive() {
        let narrow = vec![DoseRange::new(0.1, 0.7, DoseUnit::McgPerKgPerMin).unwrap()];
        let wide = vec![DoseRange::new(2.0, 10.0, DoseUnit::McgPerKgPerMin).unwrap()];

        // 10 mcg/kg/min = 14.4 mg/kg/day
        assert_eq!(level(14.4, DoseUnit::MgPerKgPerDay, &wide), RangeLevel::Within);
        // 0.1 mcg/kg/min = 0.144 mg/kg/day
        assert_eq!(level(0.144, DoseUnit::MgPerKgPerDay, &narrow), RangeLevel::Within);
        // 0.7 mcg/kg/min = 42 mcg/kg/h
        assert_eq!(level(42.0, DoseUnit::McgPerKgPerHour, &narrow), RangeLevel::Within);

        assert_eq!(level(14.5, DoseUnit::MgPerKgPerDay, &wide), RangeLevel::Above);
        assert_eq!(level(0.143, DoseUnit::MgPerKgPerDay, &narrow), RangeLevel::Below);
    }

    #[test]
    fn test_converts_first_range() {
        // First range is 1–5 mcg/kg/min = 60–300 mcg/kg/h
        let status = classify_dose(400.0, DoseUnit::McgPerKgPerHour, &ranges());
        assert_eq!(status.level, RangeLevel::Above);
        assert!((status.min.unwrap() - 60.0).abs() < 1e-9);
        assert!((status.max.unwrap() - 300.0).abs() < 1e-9);
        assert_eq!(status.message, "Above recommended range (60,000–300,000 mcg/kg/h)");
    }

    #[test]
    fn test_unknown_cases() {
        assert_eq!(classify_dose(1.0, DoseUnit::MgPerKg, &[]).level, RangeLevel::Unknown);
        assert_eq!(
            classify_dose(f64::NAN, DoseUnit::McgPerKgPerMin, &ranges()).level,
            RangeLevel::Unknown
        );

        let status = classify_dose(2.0, DoseUnit::MgPerKg, &ranges());
        assert_eq!(status.level, RangeLevel::Unknown);
        assert!(status.message.contains("cannot be compared"));
        assert_eq!(status.min, None);
    }

    #[test]
    fn test_indication_in_message() {
        let ranges = vec![DoseRange::new(0.5, 2.0, DoseUnit::MgPerKg)
            .unwrap()
            .with_indication("sedation")];
        let status = classify_dose(0.2, DoseUnit::MgPerKg, &ranges);
        assert_eq!(status.level, RangeLevel::Below);
        assert_eq!(status.message, "Below recommended range (0,500–2,000 mg/kg) for sedation");
    }
}
