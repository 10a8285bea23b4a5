//! Orbital input generators for property-based testing
//!
//! Ranges stay inside what the TLE columns can hold, so every generated
//! input is one the forger must accept under either validation policy.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use tle_forge::{BeltSpec, DragTerms, OrbitalParameters};

// ============================================================================
// Orbit Generators
// ============================================================================

/// Altitude in meters, low LEO up to beyond GEO
pub fn altitude_m() -> impl Strategy<Value = f64> {
    160_000.0..40_000_000.0
}

/// LEO altitude in meters
pub fn altitude_leo_m() -> impl Strategy<Value = f64> {
    300_000.0..2_000_000.0
}

/// Eccentricity well inside [0, 1)
pub fn eccentricity() -> impl Strategy<Value = f64> {
    0.0..0.999
}

/// Near-circular eccentricity (0-0.01)
pub fn eccentricity_circular() -> impl Strategy<Value = f64> {
    0.0..0.01
}

/// Inclination in degrees (0-180)
pub fn inclination_deg() -> impl Strategy<Value = f64> {
    0.0..=180.0
}

/// RAAN in degrees (0-360)
pub fn raan_deg() -> impl Strategy<Value = f64> {
    0.0..360.0
}

/// Argument of perigee in degrees (0-360)
pub fn arg_perigee_deg() -> impl Strategy<Value = f64> {
    0.0..360.0
}

/// Mean anomaly in degrees (0-360)
pub fn mean_anomaly_deg() -> impl Strategy<Value = f64> {
    0.0..360.0
}

// ============================================================================
// Time Generators
// ============================================================================

/// Epoch between 2000 and 2056 with nanosecond resolution
pub fn epoch() -> impl Strategy<Value = DateTime<Utc>> {
    // 2000-01-01T00:00:00Z .. 2057-01-01T00:00:00Z
    (946_684_800i64..2_745_360_000i64, 0u32..1_000_000_000u32).prop_map(|(secs, nanos)| {
        Utc.timestamp_opt(secs, nanos)
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    })
}

// ============================================================================
// Field Generators
// ============================================================================

/// Magnitudes the 8-column scientific field holds without clamping, either sign
pub fn scientific_value() -> impl Strategy<Value = f64> {
    (any::<bool>(), 1.0f64..10.0, -8i32..=8).prop_map(|(negative, mantissa, exponent)| {
        let value = mantissa * 10f64.powi(exponent);
        if negative {
            -value
        } else {
            value
        }
    })
}

/// First derivative of mean motion (|n'| < 0.01)
pub fn mean_motion_dot() -> impl Strategy<Value = f64> {
    -0.01..0.01
}

/// Drag terms, each either zero or a representable value
pub fn drag_terms() -> impl Strategy<Value = DragTerms> {
    let scientific_or_zero = || prop_oneof![Just(0.0), scientific_value()];
    (mean_motion_dot(), scientific_or_zero(), scientific_or_zero()).prop_map(
        |(mean_motion_dot, mean_motion_ddot, bstar)| DragTerms {
            mean_motion_dot,
            mean_motion_ddot,
            bstar,
        },
    )
}

// ============================================================================
// Satellite ID Generators
// ============================================================================

/// NORAD ID (5-digit range)
pub fn catalog_number() -> impl Strategy<Value = u32> {
    0u32..=99_999u32
}

/// Generic satellite name
pub fn sat_name() -> impl Strategy<Value = String> {
    "[A-Z]{1,3}-[0-9]{1,4}".prop_map(|s| s.to_string())
}

// ============================================================================
// Composite Generators
// ============================================================================

/// Complete orbital parameter set, near-circular
pub fn orbital_parameters() -> impl Strategy<Value = OrbitalParameters> {
    (
        sat_name(),
        altitude_m(),
        eccentricity_circular(),
        inclination_deg(),
        raan_deg(),
        arg_perigee_deg(),
        mean_anomaly_deg(),
        epoch(),
    )
        .prop_map(|(name, altitude_m, eccentricity, inclination, raan, argp, anomaly, epoch)| {
            OrbitalParameters {
                name,
                altitude_m,
                eccentricity,
                inclination_deg: inclination,
                raan_deg: raan,
                arg_perigee_deg: argp,
                mean_anomaly_deg: anomaly,
                epoch,
            }
        })
}

/// Belt shape (sats per plane, plane count); 36 planes at 10° still fit
pub fn belt_shape() -> impl Strategy<Value = (u32, u32)> {
    (1u32..=24, 1u32..=36)
}

/// Complete belt description with the default 10° plane spacing
pub fn belt_spec() -> impl Strategy<Value = BeltSpec> {
    (
        belt_shape(),
        altitude_leo_m(),
        eccentricity_circular(),
        inclination_deg(),
        arg_perigee_deg(),
        epoch(),
    )
        .prop_map(|((sats, planes), altitude_m, ecc, inc, argp, epoch)| {
            BeltSpec::new(sats, planes, altitude_m / 1000.0, inc, epoch)
                .with_eccentricity(ecc)
                .with_arg_perigee(argp)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn test_epoch_years_fit_two_digits(t in epoch()) {
            use chrono::Datelike;
            prop_assert!((2000..=2056).contains(&t.year()));
        }

        #[test]
        fn test_scientific_value_bounds(v in scientific_value()) {
            prop_assert!(v.abs() >= 1e-8);
            prop_assert!(v.abs() < 1e9);
        }

        #[test]
        fn test_belt_spec_bounds(spec in belt_spec()) {
            prop_assert!(spec.sats_per_plane >= 1);
            prop_assert!(spec.len() <= 24 * 36);
            prop_assert!(spec.altitude_km >= 300.0);
        }
    }
}
