//! Synthetic TLE Forge CLI
//!
//! Forges single records or whole belts and writes them as a 3LE catalog.
//!
//! Usage:
//!   forge-tles single --name SAT-1 --altitude-m 550000 --inclination 53
//!   forge-tles belt --sats-per-plane 22 --planes 72 --altitude-km 550 \
//!                   --inclination 53 --output belt.tle
//!   forge-tles belt --config job.json --strict \
//!                   --identity sequential --first-catalog 90000

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use forge_cli::{load_job, write_catalog, BeltOverrides};
use std::path::PathBuf;
use tle_forge::{ForgeConfig, IdentityConfig, OrbitalParameters, TleForger, ValidationPolicy};
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(
    name = "forge-tles",
    about = "Forge synthetic two-line element sets for simulation"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Reject inputs the TLE columns cannot represent
    #[arg(long, global = true)]
    strict: bool,

    /// Catalog identity scheme
    #[arg(long, value_enum, global = true)]
    identity: Option<IdentityKind>,

    /// First catalog number for sequential identities
    #[arg(long, global = true, default_value_t = 90_000)]
    first_catalog: u32,

    /// Launch year of the sequential international designator
    #[arg(long, global = true, default_value_t = 2025)]
    launch_year: i32,

    /// Launch number of the sequential international designator
    #[arg(long, global = true, default_value_t = 1)]
    launch_number: u16,

    /// Output 3LE file (stdout when omitted)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum IdentityKind {
    Placeholder,
    Sequential,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Forge one record
    Single {
        #[arg(long)]
        name: String,

        /// Altitude above the equatorial radius (m)
        #[arg(long)]
        altitude_m: f64,

        #[arg(long, default_value_t = 0.0)]
        eccentricity: f64,

        /// Inclination (deg)
        #[arg(long, default_value_t = 0.0)]
        inclination: f64,

        /// Right ascension of the ascending node (deg)
        #[arg(long, default_value_t = 0.0)]
        raan: f64,

        /// Argument of perigee (deg)
        #[arg(long, default_value_t = 0.0)]
        arg_perigee: f64,

        /// Mean anomaly (deg)
        #[arg(long, default_value_t = 0.0)]
        mean_anomaly: f64,

        /// Epoch, RFC 3339 (now when omitted)
        #[arg(long)]
        epoch: Option<DateTime<Utc>>,
    },
    /// Forge a multi-plane belt
    Belt(BeltArgs),
}

#[derive(Args, Debug)]
struct BeltArgs {
    /// JSON job file; flags below override its belt section
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    sats_per_plane: Option<u32>,

    #[arg(long)]
    planes: Option<u32>,

    #[arg(long)]
    altitude_km: Option<f64>,

    #[arg(long)]
    eccentricity: Option<f64>,

    /// Inclination (deg)
    #[arg(long)]
    inclination: Option<f64>,

    /// Argument of perigee (deg)
    #[arg(long)]
    arg_perigee: Option<f64>,

    /// RAAN step between planes (deg)
    #[arg(long)]
    plane_spacing: Option<f64>,

    /// Epoch, RFC 3339 (now when omitted)
    #[arg(long)]
    epoch: Option<DateTime<Utc>>,
}

impl BeltArgs {
    fn overrides(&self) -> BeltOverrides {
        BeltOverrides {
            name: self.name.clone(),
            sats_per_plane: self.sats_per_plane,
            plane_count: self.planes,
            altitude_km: self.altitude_km,
            eccentricity: self.eccentricity,
            inclination_deg: self.inclination,
            arg_perigee_deg: self.arg_perigee,
            plane_spacing_deg: self.plane_spacing,
            epoch: self.epoch,
        }
    }
}

impl CommonArgs {
    /// Apply `--strict` and `--identity` on top of file or default settings
    fn apply(&self, identity: &mut IdentityConfig, forge: &mut ForgeConfig) {
        if self.strict {
            forge.validation = ValidationPolicy::Strict;
        }
        match self.identity {
            Some(IdentityKind::Placeholder) => *identity = IdentityConfig::Placeholder,
            Some(IdentityKind::Sequential) => {
                *identity = IdentityConfig::Sequential {
                    first_catalog_number: self.first_catalog,
                    launch_year: self.launch_year,
                    launch_number: self.launch_number,
                }
            }
            None => {}
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over -v
    let level = if cli.common.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match &cli.command {
        Command::Single {
            name,
            altitude_m,
            eccentricity,
            inclination,
            raan,
            arg_perigee,
            mean_anomaly,
            epoch,
        } => {
            let epoch = epoch.unwrap_or_else(Utc::now);
            let params = OrbitalParameters::circular(name.clone(), *altitude_m, epoch)
                .with_eccentricity(*eccentricity)
                .with_inclination(*inclination)
                .with_raan(*raan)
                .with_arg_perigee(*arg_perigee)
                .with_mean_anomaly(*mean_anomaly);

            let mut identity = IdentityConfig::default();
            let mut forge = ForgeConfig::default();
            cli.common.apply(&mut identity, &mut forge);

            let mut forger = TleForger::with_identities(forge, identity.build());
            let record = forger
                .forge(&params)
                .with_context(|| format!("forging {}", params.name))?;
            write_catalog([&record], cli.common.output.as_deref())?;
            info!(name = %record.name, "forged record");
        }
        Command::Belt(args) => {
            let base = args
                .config
                .as_ref()
                .map(|path| load_job(path).with_context(|| format!("loading {:?}", path)))
                .transpose()?;

            let (belt, mut identity, mut forge) = match base {
                Some(job) => (Some(job.belt), job.identity, job.forge),
                None => (None, IdentityConfig::default(), ForgeConfig::default()),
            };
            let spec = args.overrides().resolve(belt, Utc::now())?;
            cli.common.apply(&mut identity, &mut forge);

            info!("{}", "=".repeat(60));
            info!(
                "Forging {} ({} planes x {} satellites, {:.1} km, {:.2} deg)",
                spec.name,
                spec.plane_count,
                spec.sats_per_plane,
                spec.altitude_km,
                spec.inclination_deg
            );
            info!("{}", "=".repeat(60));

            let mut forger = TleForger::with_identities(forge, identity.build());
            let belt = forger
                .forge_belt(&spec)
                .with_context(|| format!("forging belt {}", spec.name))?;
            let written = write_catalog(belt.records(), cli.common.output.as_deref())?;

            info!("Total forged: {}", written);
        }
    }

    Ok(())
}
