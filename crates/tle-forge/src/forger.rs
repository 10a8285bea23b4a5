//! Satellite Record Forger
//!
//! Assembles encoder fields into complete three-line records:
//!
//! - catalog identity from the forger's [`IdentitySource`]
//! - epoch as `YYDDD.DDDDDDDD`
//! - mean motion from the circular-orbit approximation
//! - drag terms from [`ForgeConfig::drag`] (zero unless configured)
//! - ephemeris type 0, element set 1, revolution number 1
//!
//! Each element line must come out at exactly 68 columns before its checksum
//! digit. Anything else means a field overflowed its columns, and the record
//! is rejected with [`ForgeError::LineWidth`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, error};

use crate::config::ForgeConfig;
use crate::elements::OrbitalParameters;
use crate::encoder::{
    append_checksum, checksum_matches, encode_eccentricity, encode_epoch,
    encode_leading_zero_scientific, encode_signed_fraction, try_encode_eccentricity,
    try_encode_leading_zero_scientific, try_encode_signed_fraction,
};
use crate::identity::{IdentitySource, PlaceholderIdentity, SatelliteIdentity};
use crate::{ForgeError, Result, LINE_DATA_WIDTH};

const EPHEMERIS_TYPE: u8 = 0;
const ELEMENT_SET_NUMBER: u32 = 1;
const REVOLUTION_NUMBER: u32 = 1;

const MAX_CATALOG_NUMBER: u32 = 99_999;
const DESIGNATOR_WIDTH: usize = 8;

/// A finished three-line TLE record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TleRecord {
    pub name: String,
    /// Line 1 including its checksum digit (69 columns)
    pub line1: String,
    /// Line 2 including its checksum digit (69 columns)
    pub line2: String,
}

impl TleRecord {
    /// `name`, line 1 and line 2 joined by newlines, no trailing newline
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    pub fn lines(&self) -> [&str; 3] {
        [&self.name, &self.line1, &self.line2]
    }

    /// Both element lines end in their own checksum digit
    pub fn checksums_valid(&self) -> bool {
        checksum_matches(&self.line1) && checksum_matches(&self.line2)
    }
}

impl fmt::Display for TleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}\n{}", self.name, self.line1, self.line2)
    }
}

/// Forges TLE records with one configuration and one identity source
#[derive(Debug, Clone)]
pub struct TleForger<I = PlaceholderIdentity> {
    config: ForgeConfig,
    identities: I,
}

impl TleForger<PlaceholderIdentity> {
    /// Placeholder identity, permissive validation, zero drag terms
    pub fn new() -> Self {
        Self {
            config: ForgeConfig::default(),
            identities: PlaceholderIdentity::new(),
        }
    }
}

impl Default for TleForger<PlaceholderIdentity> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: IdentitySource> TleForger<I> {
    pub fn with_identities(config: ForgeConfig, identities: I) -> Self {
        Self { config, identities }
    }

    pub fn with_config(mut self, config: ForgeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ForgeConfig {
        &self.config
    }

    pub fn into_identities(self) -> I {
        self.identities
    }

    pub(crate) fn next_identity(&mut self) -> SatelliteIdentity {
        self.identities.next_identity()
    }

    pub(crate) fn rewind_identities(&mut self, count: u32) {
        self.identities.rewind(count)
    }

    /// Forge one record, drawing the next identity from the source
    ///
    /// A failed record hands its identity back, so the source only advances
    /// on success.
    pub fn forge(&mut self, params: &OrbitalParameters) -> Result<TleRecord> {
        let identity = self.identities.next_identity();
        let record = format_record(params, &identity, &self.config);
        if record.is_err() {
            self.identities.rewind(1);
        }
        record
    }
}

/// Forge a record with the sandbox defaults and return its three-line text
///
/// Placeholder identity (`00000`, `U`, `25001A`), zero drag terms and no
/// input validation beyond the 68-column check on each element line.
#[allow(clippy::too_many_arguments)]
pub fn forge_single(
    name: &str,
    altitude_m: f64,
    eccentricity: f64,
    inclination_deg: f64,
    raan_deg: f64,
    argp_deg: f64,
    anomaly_deg: f64,
    epoch: DateTime<Utc>,
) -> Result<String> {
    let params = OrbitalParameters {
        name: name.to_string(),
        altitude_m,
        eccentricity,
        inclination_deg,
        raan_deg,
        arg_perigee_deg: argp_deg,
        mean_anomaly_deg: anomaly_deg,
        epoch,
    };
    TleForger::new().forge(&params).map(|record| record.to_text())
}

/// Format one record from parameters and an already assigned identity
pub(crate) fn format_record(
    params: &OrbitalParameters,
    identity: &SatelliteIdentity,
    config: &ForgeConfig,
) -> Result<TleRecord> {
    let strict = config.validation.is_strict();
    if strict {
        validate_strict(params, identity)?;
    }

    let drag = &config.drag;
    let (mm_dot, mm_ddot, bstar, eccentricity) = if strict {
        (
            try_encode_signed_fraction("mean_motion_dot", drag.mean_motion_dot)?,
            try_encode_leading_zero_scientific("mean_motion_ddot", drag.mean_motion_ddot)?,
            try_encode_leading_zero_scientific("bstar", drag.bstar)?,
            try_encode_eccentricity(params.eccentricity)?,
        )
    } else {
        (
            encode_signed_fraction(drag.mean_motion_dot),
            encode_leading_zero_scientific(drag.mean_motion_ddot),
            encode_leading_zero_scientific(drag.bstar),
            encode_eccentricity(params.eccentricity),
        )
    };

    let epoch = encode_epoch(&params.epoch);
    let mean_motion = params.mean_motion();

    let line1 = format!(
        "1 {:05}{} {:8} {:14} {} {} {} {} {:4}",
        identity.catalog_number,
        identity.classification,
        identity.international_designator,
        epoch,
        mm_dot,
        mm_ddot,
        bstar,
        EPHEMERIS_TYPE,
        ELEMENT_SET_NUMBER
    );
    check_width(1, &line1)?;

    let line2 = format!(
        "2 {:05} {:8.4} {:8.4} {:7} {:8.4} {:8.4} {:11.8}{:05}",
        identity.catalog_number,
        params.inclination_deg,
        params.raan_deg,
        eccentricity,
        params.arg_perigee_deg,
        params.mean_anomaly_deg,
        mean_motion,
        REVOLUTION_NUMBER
    );
    check_width(2, &line2)?;

    let record = TleRecord {
        name: params.name.clone(),
        line1: append_checksum(&line1),
        line2: append_checksum(&line2),
    };
    debug!(name = %record.name, catalog = identity.catalog_number, "forged TLE record");
    Ok(record)
}

fn check_width(line: u8, text: &str) -> Result<()> {
    // TLE columns are bytes; a multi-byte character shifts every later field
    let actual = text.len();
    if actual == LINE_DATA_WIDTH {
        return Ok(());
    }
    error!(line, actual, text, "TLE line is not 68 characters before checksum");
    Err(ForgeError::LineWidth {
        line,
        actual,
        text: text.to_string(),
    })
}

fn validate_strict(params: &OrbitalParameters, identity: &SatelliteIdentity) -> Result<()> {
    let finite_fields = [
        ("altitude_m", params.altitude_m),
        ("inclination_deg", params.inclination_deg),
        ("raan_deg", params.raan_deg),
        ("arg_perigee_deg", params.arg_perigee_deg),
        ("mean_anomaly_deg", params.mean_anomaly_deg),
        ("mean_motion", params.mean_motion()),
    ];
    for (field, value) in finite_fields {
        if !value.is_finite() {
            return Err(ForgeError::NonFinite { field, value });
        }
    }

    if identity.catalog_number > MAX_CATALOG_NUMBER {
        return Err(ForgeError::CatalogNumberOutOfRange(identity.catalog_number));
    }
    let designator = &identity.international_designator;
    if !designator.is_ascii() {
        return Err(ForgeError::DesignatorNotAscii(designator.clone()));
    }
    if designator.len() > DESIGNATOR_WIDTH {
        return Err(ForgeError::DesignatorTooLong(designator.clone()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DragTerms, ValidationPolicy};
    use crate::identity::{Classification, SequentialIdentity};
    use chrono::TimeZone;

    fn new_year_2025() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn polar_400km() -> OrbitalParameters {
        OrbitalParameters::circular("Test", 400_000.0, new_year_2025()).with_inclination(90.0)
    }

    #[test]
    fn test_forge_single_reference_record() {
        let text =
            forge_single("Test", 400_000.0, 0.0, 90.0, 0.0, 0.0, 0.0, new_year_2025()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Test");
        assert_eq!(
            lines[1],
            "1 00000U 25001A   25001.00000000 +.00000000  00000-0  00000-0 0    10"
        );
        assert_eq!(
            lines[2],
            "2 00000  90.0000   0.0000 0000000   0.0000   0.0000 15.55753481000016"
        );
    }

    #[test]
    fn test_forge_single_inclined_eccentric() {
        let epoch = Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap();
        let text =
            forge_single("ISS-like", 420_000.0, 0.0005, 51.64, 247.46, 130.54, 325.03, epoch)
                .unwrap();
        assert_eq!(
            text,
            "ISS-like\n\
             1 00000U 25001A   25074.50000000 +.00000000  00000-0  00000-0 0    15\n\
             2 00000  51.6400 247.4600 0005000 130.5400 325.0300 15.48892997000015"
        );
    }

    #[test]
    fn test_record_widths_and_checksums() {
        let record = TleForger::new().forge(&polar_400km()).unwrap();
        assert_eq!(record.line1.len(), 69);
        assert_eq!(record.line2.len(), 69);
        assert!(record.checksums_valid());
        assert_eq!(record.lines()[0], "Test");
    }

    #[test]
    fn test_record_fields_in_their_columns() {
        let record = TleForger::new().forge(&polar_400km()).unwrap();
        let expected_mm = format!("{:11.8}", crate::mean_motion_rev_per_day(400_000.0));
        assert_eq!(&record.line2[52..63], expected_mm);
        assert_eq!(&record.line2[26..33], "0000000");
        assert_eq!(record.line2[8..16].trim(), "90.0000");
        assert_eq!(&record.line1[18..32], "25001.00000000");
    }

    #[test]
    fn test_forging_is_deterministic() {
        let params = polar_400km().with_raan(123.4567).with_mean_anomaly(89.1);
        let first = TleForger::new().forge(&params).unwrap();
        let second = TleForger::new().forge(&params).unwrap();
        assert_eq!(first.to_text(), second.to_text());
    }

    #[test]
    fn test_drag_terms_and_sequential_identity() {
        let drag = DragTerms {
            mean_motion_dot: -0.00002182,
            mean_motion_ddot: 0.0,
            bstar: 2.8098e-5,
        };
        let mut forger = TleForger::with_identities(
            ForgeConfig::default().drag(drag),
            SequentialIdentity::new(90000, 2026, 42),
        );
        let record = forger.forge(&polar_400km()).unwrap();
        assert_eq!(
            record.line1,
            "1 90000U 26042A   25001.00000000 -.00002182  00000-0  28098-5 0    11"
        );
        assert_eq!(
            record.line2,
            "2 90000  90.0000   0.0000 0000000   0.0000   0.0000 15.55753481000015"
        );

        let next = forger.forge(&polar_400km()).unwrap();
        assert!(next.line1.starts_with("1 90001U 26042B  "));
    }

    #[test]
    fn test_classification_column() {
        let identity = SatelliteIdentity {
            classification: Classification::Secret,
            ..SatelliteIdentity::placeholder()
        };
        let mut forger = TleForger::with_identities(
            ForgeConfig::default(),
            PlaceholderIdentity::fixed(identity),
        );
        let record = forger.forge(&polar_400km()).unwrap();
        assert_eq!(&record.line1[7..8], "S");
        assert!(record.checksums_valid());
    }

    #[test]
    fn test_overwide_angle_is_line_width_error() {
        let params = polar_400km().with_raan(1000.0);
        match TleForger::new().forge(&params) {
            Err(ForgeError::LineWidth { line, actual, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(actual, 69);
            }
            other => panic!("expected line 2 width error, got {:?}", other),
        }
    }

    #[test]
    fn test_oversized_catalog_number_is_line_width_error() {
        let identity = SatelliteIdentity {
            catalog_number: 123_456,
            ..SatelliteIdentity::placeholder()
        };
        let mut forger = TleForger::with_identities(
            ForgeConfig::default(),
            PlaceholderIdentity::fixed(identity),
        );
        assert!(matches!(
            forger.forge(&polar_400km()),
            Err(ForgeError::LineWidth { line: 1, actual: 69, .. })
        ));
    }

    #[test]
    fn test_permissive_nan_drag_is_line_width_error() {
        let drag = DragTerms {
            bstar: f64::NAN,
            ..DragTerms::default()
        };
        let mut forger = TleForger::new().with_config(ForgeConfig::default().drag(drag));
        assert!(matches!(
            forger.forge(&polar_400km()),
            Err(ForgeError::LineWidth { line: 1, actual: 63, .. })
        ));
    }

    #[test]
    fn test_permissive_passes_garbage_eccentricity() {
        // 1.5 formats as "5000000" and still fits its columns
        let params = polar_400km().with_eccentricity(1.5);
        let record = TleForger::new().forge(&params).unwrap();
        assert_eq!(&record.line2[26..33], "5000000");

        // negative eccentricity widens the field and trips the width check
        let params = polar_400km().with_eccentricity(-0.001);
        assert!(matches!(
            TleForger::new().forge(&params),
            Err(ForgeError::LineWidth { line: 2, .. })
        ));
    }

    #[test]
    fn test_strict_policy_rejects_out_of_domain_inputs() {
        let mut forger = TleForger::new().with_config(ForgeConfig::strict());
        assert_eq!(forger.config().validation, ValidationPolicy::Strict);

        assert_eq!(
            forger.forge(&polar_400km().with_eccentricity(1.5)),
            Err(ForgeError::EccentricityOutOfRange(1.5))
        );
        assert!(matches!(
            forger.forge(&polar_400km().with_inclination(f64::NAN)),
            Err(ForgeError::NonFinite { field: "inclination_deg", .. })
        ));

        let drag = DragTerms {
            bstar: 1e-15,
            ..DragTerms::default()
        };
        let mut forger = TleForger::new().with_config(ForgeConfig::strict().drag(drag));
        assert!(matches!(
            forger.forge(&polar_400km()),
            Err(ForgeError::ExponentOutOfRange { field: "bstar", .. })
        ));
    }

    #[test]
    fn test_strict_policy_rejects_oversized_identity() {
        let identity = SatelliteIdentity {
            catalog_number: 100_000,
            ..SatelliteIdentity::placeholder()
        };
        let mut forger =
            TleForger::with_identities(ForgeConfig::strict(), PlaceholderIdentity::fixed(identity));
        assert_eq!(
            forger.forge(&polar_400km()),
            Err(ForgeError::CatalogNumberOutOfRange(100_000))
        );

        let identity = SatelliteIdentity {
            international_designator: "2025001ABC".to_string(),
            ..SatelliteIdentity::placeholder()
        };
        let mut forger =
            TleForger::with_identities(ForgeConfig::strict(), PlaceholderIdentity::fixed(identity));
        assert!(matches!(
            forger.forge(&polar_400km()),
            Err(ForgeError::DesignatorTooLong(_))
        ));
    }

    #[test]
    fn test_failed_record_does_not_consume_identity() {
        let mut forger = TleForger::with_identities(
            ForgeConfig::default(),
            SequentialIdentity::new(90000, 2026, 42),
        );
        assert!(forger.forge(&polar_400km().with_raan(1000.0)).is_err());

        let record = forger.forge(&polar_400km()).unwrap();
        assert!(record.line1.starts_with("1 90000U 26042A  "));
    }

    #[test]
    fn test_non_ascii_designator_is_rejected() {
        // 'Å' is one char but two bytes, so line 1 is 69 columns wide
        let identity = SatelliteIdentity {
            international_designator: "25001Å".to_string(),
            ..SatelliteIdentity::placeholder()
        };

        let mut strict = TleForger::with_identities(
            ForgeConfig::strict(),
            PlaceholderIdentity::fixed(identity.clone()),
        );
        assert_eq!(
            strict.forge(&polar_400km()),
            Err(ForgeError::DesignatorNotAscii("25001Å".to_string()))
        );

        let mut permissive = TleForger::with_identities(
            ForgeConfig::default(),
            PlaceholderIdentity::fixed(identity),
        );
        assert!(matches!(
            permissive.forge(&polar_400km()),
            Err(ForgeError::LineWidth { line: 1, actual: 69, .. })
        ));
    }

    #[test]
    fn test_strict_policy_accepts_valid_record() {
        let mut strict = TleForger::new().with_config(ForgeConfig::strict());
        let mut permissive = TleForger::new();
        let params = polar_400km().with_eccentricity(0.0012).with_arg_perigee(270.0);
        assert_eq!(strict.forge(&params), permissive.forge(&params));
    }
}
