//! Forge CLI support
//!
//! Job files, flag overrides and catalog output for the `forge-tles` binary.
//! A job file is JSON with a required `belt` section and optional `identity`
//! and `forge` sections:
//!
//! ```json
//! {
//!   "belt": {
//!     "sats_per_plane": 22,
//!     "plane_count": 72,
//!     "altitude_km": 550.0,
//!     "inclination_deg": 53.0,
//!     "epoch": "2025-01-01T00:00:00Z"
//!   },
//!   "identity": { "kind": "sequential", "first_catalog_number": 90000 },
//!   "forge": { "validation": "strict" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tle_forge::{BeltSpec, ForgeConfig, IdentityConfig};

pub mod loader;
pub mod output;

pub use loader::{load_job, BeltOverrides};
pub use output::write_catalog;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing belt parameter --{0} (no job file supplies it)")]
    MissingParameter(&'static str),
    #[error(transparent)]
    Forge(#[from] tle_forge::ForgeError),
}

pub type Result<T> = std::result::Result<T, CliError>;

/// Everything needed to forge one belt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForgeJob {
    pub belt: BeltSpec,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub forge: ForgeConfig,
}

impl ForgeJob {
    pub fn new(belt: BeltSpec) -> Self {
        Self {
            belt,
            identity: IdentityConfig::default(),
            forge: ForgeConfig::default(),
        }
    }
}
