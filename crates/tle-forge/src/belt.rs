//! Belt forging
//!
//! A belt spreads `plane_count` orbital planes in RAAN (`plane_spacing_deg`
//! apart, 10° by default) and puts `sats_per_plane` satellites in each plane,
//! evenly spaced in mean anomaly. Eccentricity, inclination, argument of
//! perigee, altitude and epoch are shared by every satellite.
//!
//! Records come back plane-major, satellite-minor. Identities are drawn in
//! that order before any formatting, and the records themselves are
//! formatted in parallel and collected back in order.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use tracing::info;

use crate::elements::OrbitalParameters;
use crate::forger::{format_record, TleForger, TleRecord};
use crate::identity::IdentitySource;
use crate::{ForgeError, Result};

/// Name prefix of belt members when none is given
pub const DEFAULT_BELT_NAME: &str = "SystemC_Belt_1";

/// RAAN step between consecutive planes when none is given
pub const DEFAULT_PLANE_SPACING_DEG: f64 = 10.0;

fn default_belt_name() -> String {
    DEFAULT_BELT_NAME.to_string()
}

fn default_plane_spacing() -> f64 {
    DEFAULT_PLANE_SPACING_DEG
}

/// Shape and shared orbit of a belt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeltSpec {
    #[serde(default = "default_belt_name")]
    pub name: String,
    pub sats_per_plane: u32,
    pub plane_count: u32,
    pub altitude_km: f64,
    #[serde(default)]
    pub eccentricity: f64,
    pub inclination_deg: f64,
    #[serde(default)]
    pub arg_perigee_deg: f64,
    #[serde(default = "default_plane_spacing")]
    pub plane_spacing_deg: f64,
    pub epoch: DateTime<Utc>,
}

impl BeltSpec {
    /// Circular belt with the default name and 10° plane spacing
    pub fn new(
        sats_per_plane: u32,
        plane_count: u32,
        altitude_km: f64,
        inclination_deg: f64,
        epoch: DateTime<Utc>,
    ) -> Self {
        Self {
            name: default_belt_name(),
            sats_per_plane,
            plane_count,
            altitude_km,
            eccentricity: 0.0,
            inclination_deg,
            arg_perigee_deg: 0.0,
            plane_spacing_deg: DEFAULT_PLANE_SPACING_DEG,
            epoch,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_eccentricity(mut self, eccentricity: f64) -> Self {
        self.eccentricity = eccentricity;
        self
    }

    pub fn with_arg_perigee(mut self, arg_perigee_deg: f64) -> Self {
        self.arg_perigee_deg = arg_perigee_deg;
        self
    }

    pub fn with_plane_spacing(mut self, plane_spacing_deg: f64) -> Self {
        self.plane_spacing_deg = plane_spacing_deg;
        self
    }

    /// Total number of satellites
    pub fn len(&self) -> usize {
        self.sats_per_plane as usize * self.plane_count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mean anomaly step between neighbours in a plane (degrees)
    pub fn anomaly_step_deg(&self) -> f64 {
        360.0 / self.sats_per_plane as f64
    }

    /// Orbital parameters of every member, plane-major
    pub fn members(&self) -> Result<Vec<(u32, u32, OrbitalParameters)>> {
        if self.sats_per_plane == 0 {
            return Err(ForgeError::InvalidBelt(format!(
                "'{}' needs at least one satellite per plane",
                self.name
            )));
        }

        let step = self.anomaly_step_deg();
        let altitude_m = self.altitude_km * 1000.0;
        let mut members = Vec::with_capacity(self.len());

        for plane_idx in 0..self.plane_count {
            let raan_deg = plane_idx as f64 * self.plane_spacing_deg;
            for satellite_idx in 0..self.sats_per_plane {
                let params = OrbitalParameters {
                    name: format!(
                        "{}_Plane_{}_Satellite_{}",
                        self.name,
                        plane_idx + 1,
                        satellite_idx + 1
                    ),
                    altitude_m,
                    eccentricity: self.eccentricity,
                    inclination_deg: self.inclination_deg,
                    raan_deg,
                    arg_perigee_deg: self.arg_perigee_deg,
                    mean_anomaly_deg: satellite_idx as f64 * step,
                    epoch: self.epoch,
                };
                members.push((plane_idx, satellite_idx, params));
            }
        }
        Ok(members)
    }
}

/// One forged satellite of a belt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeltMember {
    /// Zero-based plane index
    pub plane_index: u32,
    /// Zero-based position within the plane
    pub slot_index: u32,
    pub raan_deg: f64,
    pub mean_anomaly_deg: f64,
    pub record: TleRecord,
}

/// Forged belt, plane-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Belt {
    pub name: String,
    pub members: Vec<BeltMember>,
}

impl Belt {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &TleRecord> {
        self.members.iter().map(|m| &m.record)
    }

    /// Three-line text of every record, in belt order
    pub fn to_texts(&self) -> Vec<String> {
        self.records().map(TleRecord::to_text).collect()
    }

    /// All records as one 3LE catalog, newline separated
    pub fn to_text(&self) -> String {
        self.to_texts().join("\n")
    }

    /// Write the belt as a 3LE catalog file, one newline-terminated line each
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for record in self.records() {
            writeln!(writer, "{}", record)?;
        }
        writer.flush()
    }
}

impl<I: IdentitySource> TleForger<I> {
    /// Forge every member of `spec`
    ///
    /// Any record that fails aborts the whole belt, and every identity the
    /// belt drew is handed back to the source.
    pub fn forge_belt(&mut self, spec: &BeltSpec) -> Result<Belt> {
        let jobs: Vec<_> = spec
            .members()?
            .into_iter()
            .map(|(plane_index, slot_index, params)| {
                (plane_index, slot_index, params, self.next_identity())
            })
            .collect();

        let drawn = jobs.len() as u32;
        let config = self.config();
        let members = jobs
            .into_par_iter()
            .map(|(plane_index, slot_index, params, identity)| {
                format_record(&params, &identity, config).map(|record| BeltMember {
                    plane_index,
                    slot_index,
                    raan_deg: params.raan_deg,
                    mean_anomaly_deg: params.mean_anomaly_deg,
                    record,
                })
            })
            .collect::<Result<Vec<_>>>();
        let members = match members {
            Ok(members) => members,
            Err(err) => {
                self.rewind_identities(drawn);
                return Err(err);
            }
        };

        info!(
            belt = %spec.name,
            planes = spec.plane_count,
            sats_per_plane = spec.sats_per_plane,
            records = members.len(),
            "forged belt"
        );

        Ok(Belt {
            name: spec.name.clone(),
            members,
        })
    }
}

/// Forge a belt with the sandbox defaults and return each record's text
///
/// Members are named `SystemC_Belt_1_Plane_{p}_Satellite_{s}` (1-based),
/// planes sit 10° apart in RAAN and `altitude_km` is shared by all.
pub fn forge_belt(
    num_sats_per_plane: u32,
    plane_count: u32,
    altitude_km: f64,
    eccentricity: f64,
    inclination_deg: f64,
    argp_deg: f64,
    epoch: DateTime<Utc>,
) -> Result<Vec<String>> {
    let spec = BeltSpec::new(num_sats_per_plane, plane_count, altitude_km, inclination_deg, epoch)
        .with_eccentricity(eccentricity)
        .with_arg_perigee(argp_deg);
    TleForger::new()
        .forge_belt(&spec)
        .map(|belt| belt.to_texts())
}
