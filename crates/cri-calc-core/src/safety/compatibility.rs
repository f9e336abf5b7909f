//! Carrier fluid compatibility lookup.
//!
//! Precedence (first match wins):
//! 1. listed under avoid → incompatible
//! 2. preferred fluid → compatible
//! 3. listed as compatible → caution
//! 4. anything else → caution

use crate::models::{CompatibilityLevel, CompatibilityProfile, CompatibilityVerdict, FluidType};

/// Check a carrier fluid against a drug's compatibility profile.
///
/// Never fails; missing data is reported as a caution verdict.
pub fn check_fluid_compatibility(
    candidate: Option<FluidType>,
    profile: Option<&CompatibilityProfile>,
) -> CompatibilityVerdict {
    let Some(fluid) = candidate else {
        return verdict(
            CompatibilityLevel::Caution,
            "No carrier fluid selected; selection required".into(),
        );
    };
    let Some(profile) = profile else {
        return verdict(
            CompatibilityLevel::Caution,
            format!("No compatibility data for {}; use cautiously", fluid),
        );
    };

    let (level, reason) = if profile.avoid.contains(&fluid) {
        (
            CompatibilityLevel::Incompatible,
            format!("{} is incompatible with this drug; do not use", fluid),
        )
    } else if profile.preferred == fluid {
        (
            CompatibilityLevel::Compatible,
            format!("{} is the preferred fluid (maximal stability)", fluid),
        )
    } else if profile.compatible.contains(&fluid) {
        (
            CompatibilityLevel::Caution,
            format!(
                "{} is usable; verify stability, infusion time and light protection (preferred: {})",
                fluid, profile.preferred
            ),
        )
    } else {
        (
            CompatibilityLevel::Caution,
            format!(
                "{} is not specified for this drug; use cautiously (preferred: {})",
                fluid, profile.preferred
            ),
        )
    };

    let reason = match &profile.notes {
        Some(notes) => format!("{}. {}", reason, notes),
        None => reason,
    };
    verdict(level, reason)
}

fn verdict(level: CompatibilityLevel, reason: String) -> CompatibilityVerdict {
    CompatibilityVerdict { level, reason }
}
