//! Synthetic TLE Forge
//!
//! Forges syntactically valid, checksum-correct Two-Line Element sets from a
//! simplified set of orbital parameters, for feeding SGP4 propagators in
//! simulation and test pipelines.
//!
//! # Record layout
//!
//! ```text
//! <name line, free text>
//! 1 NNNNNC IIIIIIII EEYYY.FFFFFFFF +.DDDDDDDD  SSSSS+E  SSSSS+E T EEEE<checksum>
//! 2 NNNNN III.IIII RRR.RRRR EEEEEEE AAA.AAAA MMM.MMMM NN.NNNNNNNNRRRRR<checksum>
//! ```
//!
//! Both element lines carry exactly 68 data columns followed by one checksum
//! digit. A line that does not come out at 68 columns is a hard error.
//!
//! # Belts
//!
//! A belt is a grid of satellites: `plane_count` planes spaced in RAAN, each
//! holding `sats_per_plane` satellites evenly spaced in mean anomaly.
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//!
//! let epoch = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
//! let tles = tle_forge::forge_belt(4, 3, 550.0, 0.0, 53.0, 0.0, epoch).unwrap();
//! assert_eq!(tles.len(), 12);
//! assert!(tles[5].starts_with("SystemC_Belt_1_Plane_2_Satellite_2\n"));
//! ```

use thiserror::Error;

pub mod belt;
pub mod config;
pub mod elements;
pub mod encoder;
pub mod forger;
pub mod identity;

pub use belt::{forge_belt, Belt, BeltMember, BeltSpec};
pub use config::{DragTerms, ForgeConfig, ValidationPolicy};
pub use elements::{mean_motion_rev_per_day, OrbitalParameters, GM_EARTH, R_EARTH};
pub use forger::{forge_single, TleForger, TleRecord};
pub use identity::{
    Classification, IdentityConfig, IdentitySource, PlaceholderIdentity, SatelliteIdentity,
    SequentialIdentity,
};

/// Data columns of an element line, checksum excluded
pub const LINE_DATA_WIDTH: usize = 68;

/// Element line width including the trailing checksum digit
pub const LINE_WIDTH: usize = LINE_DATA_WIDTH + 1;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForgeError {
    #[error("line {line} is {actual} bytes long before checksum, expected 68: '{text}'")]
    LineWidth { line: u8, actual: usize, text: String },
    #[error("eccentricity {0} outside [0, 1)")]
    EccentricityOutOfRange(f64),
    #[error("{field} = {value:e} needs an exponent outside -9..=9")]
    ExponentOutOfRange { field: &'static str, value: f64 },
    #[error("{field} = {value} has no representation without a leading integer digit")]
    FractionOutOfRange { field: &'static str, value: f64 },
    #[error("{field} is not finite: {value}")]
    NonFinite { field: &'static str, value: f64 },
    #[error("catalog number {0} does not fit in 5 digits")]
    CatalogNumberOutOfRange(u32),
    #[error("international designator '{0}' is longer than 8 bytes")]
    DesignatorTooLong(String),
    #[error("international designator '{0}' is not ASCII")]
    DesignatorNotAscii(String),
    #[error("invalid belt: {0}")]
    InvalidBelt(String),
}

pub type Result<T> = std::result::Result<T, ForgeError>;
