//! Orbital parameter input and the circular-orbit mean motion

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Earth gravitational parameter μ (m³/s², IAU 2015 nominal)
pub const GM_EARTH: f64 = 3.986004e14;

/// Earth reference radius (m, IAU 2015 nominal equatorial)
pub const R_EARTH: f64 = 6_378_100.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Simplified orbital parameters of one synthetic satellite
///
/// Angles are degrees and are written as given: nothing is wrapped into
/// `[0, 360)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitalParameters {
    /// Name line of the record, free text
    pub name: String,
    /// Altitude above [`R_EARTH`] in meters
    pub altitude_m: f64,
    pub eccentricity: f64,
    pub inclination_deg: f64,
    pub raan_deg: f64,
    pub arg_perigee_deg: f64,
    pub mean_anomaly_deg: f64,
    pub epoch: DateTime<Utc>,
}

impl OrbitalParameters {
    /// Circular orbit at `altitude_m` with every angle at zero
    pub fn circular(name: impl Into<String>, altitude_m: f64, epoch: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            altitude_m,
            eccentricity: 0.0,
            inclination_deg: 0.0,
            raan_deg: 0.0,
            arg_perigee_deg: 0.0,
            mean_anomaly_deg: 0.0,
            epoch,
        }
    }

    pub fn with_eccentricity(mut self, eccentricity: f64) -> Self {
        self.eccentricity = eccentricity;
        self
    }

    pub fn with_inclination(mut self, inclination_deg: f64) -> Self {
        self.inclination_deg = inclination_deg;
        self
    }

    pub fn with_raan(mut self, raan_deg: f64) -> Self {
        self.raan_deg = raan_deg;
        self
    }

    pub fn with_arg_perigee(mut self, arg_perigee_deg: f64) -> Self {
        self.arg_perigee_deg = arg_perigee_deg;
        self
    }

    pub fn with_mean_anomaly(mut self, mean_anomaly_deg: f64) -> Self {
        self.mean_anomaly_deg = mean_anomaly_deg;
        self
    }

    /// Semi-major axis in meters
    pub fn semi_major_axis_m(&self) -> f64 {
        R_EARTH + self.altitude_m
    }

    /// Mean motion in rev/day
    pub fn mean_motion(&self) -> f64 {
        mean_motion_rev_per_day(self.altitude_m)
    }
}

/// Mean motion (rev/day) of a circular orbit `altitude_m` above [`R_EARTH`]
///
/// n = sqrt(μ/a³) in rad/s, converted to rev/day
pub fn mean_motion_rev_per_day(altitude_m: f64) -> f64 {
    let sma_m = R_EARTH + altitude_m;
    let n_rad_s = (GM_EARTH / sma_m.powi(3)).sqrt();
    n_rad_s * SECONDS_PER_DAY / (2.0 * PI)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_leo_mean_motion() {
        // 400 km: ~92.6 min period
        let n = mean_motion_rev_per_day(400_000.0);
        assert!((n - 15.5575348107).abs() < 1e-8, "{n}");
    }

    #[test]
    fn test_geo_mean_motion() {
        // geostationary altitude is about one revolution per sidereal day
        let n = mean_motion_rev_per_day(35_786_000.0);
        assert!((n - 1.0027).abs() < 1e-3, "{n}");
    }

    #[test]
    fn test_mean_motion_decreases_with_altitude() {
        let low = mean_motion_rev_per_day(300_000.0);
        let high = mean_motion_rev_per_day(1_200_000.0);
        assert!(low > high);
    }

    #[test]
    fn test_builder_and_serde() {
        let epoch = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let params = OrbitalParameters::circular("SAT-1", 550_000.0, epoch)
            .with_inclination(53.0)
            .with_raan(10.0)
            .with_mean_anomaly(90.0);
        assert_eq!(params.semi_major_axis_m(), 6_928_100.0);
        assert_eq!(params.mean_motion(), mean_motion_rev_per_day(550_000.0));

        let json = serde_json::to_string(&params).unwrap();
        let back: OrbitalParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }
}
