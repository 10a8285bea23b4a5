//! Job file loading and flag overrides

use crate::{CliError, ForgeJob, Result};
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tle_forge::BeltSpec;
use tracing::{debug, info};

/// Load a forge job from a JSON file
pub fn load_job(path: impl AsRef<Path>) -> Result<ForgeJob> {
    let path = path.as_ref();
    info!("Loading forge job from {:?}", path);

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let job: ForgeJob = serde_json::from_reader(reader)?;

    debug!(
        belt = %job.belt.name,
        planes = job.belt.plane_count,
        sats_per_plane = job.belt.sats_per_plane,
        "job loaded"
    );
    Ok(job)
}

/// Belt parameters given on the command line
///
/// Every field left `None` keeps the job file's value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BeltOverrides {
    pub name: Option<String>,
    pub sats_per_plane: Option<u32>,
    pub plane_count: Option<u32>,
    pub altitude_km: Option<f64>,
    pub eccentricity: Option<f64>,
    pub inclination_deg: Option<f64>,
    pub arg_perigee_deg: Option<f64>,
    pub plane_spacing_deg: Option<f64>,
    pub epoch: Option<DateTime<Utc>>,
}

impl BeltOverrides {
    /// Apply the overrides on top of `base`
    ///
    /// Without a base the shape, altitude and inclination must all be given;
    /// a missing epoch falls back to `default_epoch`.
    pub fn resolve(self, base: Option<BeltSpec>, default_epoch: DateTime<Utc>) -> Result<BeltSpec> {
        let mut spec = match base {
            Some(spec) => spec,
            None => BeltSpec::new(
                self.sats_per_plane
                    .ok_or(CliError::MissingParameter("sats-per-plane"))?,
                self.plane_count.ok_or(CliError::MissingParameter("planes"))?,
                self.altitude_km
                    .ok_or(CliError::MissingParameter("altitude-km"))?,
                self.inclination_deg
                    .ok_or(CliError::MissingParameter("inclination"))?,
                self.epoch.unwrap_or(default_epoch),
            ),
        };

        if let Some(name) = self.name {
            spec.name = name;
        }
        if let Some(n) = self.sats_per_plane {
            spec.sats_per_plane = n;
        }
        if let Some(p) = self.plane_count {
            spec.plane_count = p;
        }
        if let Some(alt) = self.altitude_km {
            spec.altitude_km = alt;
        }
        if let Some(ecc) = self.eccentricity {
            spec.eccentricity = ecc;
        }
        if let Some(inc) = self.inclination_deg {
            spec.inclination_deg = inc;
        }
        if let Some(argp) = self.arg_perigee_deg {
            spec.arg_perigee_deg = argp;
        }
        if let Some(spacing) = self.plane_spacing_deg {
            spec.plane_spacing_deg = spacing;
        }
        if let Some(epoch) = self.epoch {
            spec.epoch = epoch;
        }
        Ok(spec)
    }
}
