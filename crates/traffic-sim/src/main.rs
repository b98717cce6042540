//! Headless Space Traffic Simulation Driver
//!
//! Runs the simulation core at a fixed cadence without any rendering
//! layer: generate the field, tick, log proximity pairs, optionally emit
//! each snapshot as a JSON line for downstream consumers.
//!
//! Usage:
//!   traffic-sim --ticks 120 --interval-ms 500 --threshold-km 100
//!   traffic-sim --leo-count 10 --geo-count 10 --seed 7 --json

use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use tracing::info;
use traffic_sim::{
    initialize, tick, SimConfig, DEFAULT_GEO_ALTITUDE_KM, DEFAULT_LOW_ALTITUDE_KM,
    DEFAULT_THRESHOLD_KM,
};

#[derive(Parser, Debug)]
#[command(
    name = "traffic-sim",
    about = "Headless driver for the space traffic simulation core"
)]
struct Args {
    /// Number of low-orbit satellites
    #[arg(long, default_value_t = 50)]
    leo_count: usize,

    /// Number of geostationary satellites
    #[arg(long, default_value_t = 50)]
    geo_count: usize,

    /// Low shell altitude in km
    #[arg(long, default_value_t = DEFAULT_LOW_ALTITUDE_KM)]
    leo_altitude_km: f64,

    /// Geostationary shell altitude in km
    #[arg(long, default_value_t = DEFAULT_GEO_ALTITUDE_KM)]
    geo_altitude_km: f64,

    /// Proximity threshold in km
    #[arg(short, long, default_value_t = DEFAULT_THRESHOLD_KM)]
    threshold_km: f64,

    /// Azimuth advance per tick in degrees
    #[arg(long, default_value_t = 0.5)]
    step_deg: f64,

    /// Number of ticks to run
    #[arg(long, default_value_t = 120)]
    ticks: u64,

    /// Delay between ticks in milliseconds (0 = run flat out)
    #[arg(long, default_value_t = 500)]
    interval_ms: u64,

    /// Seed for the field generator (omit for OS entropy)
    #[arg(long)]
    seed: Option<u64>,

    /// Emit each snapshot as a JSON line on stdout
    #[arg(long)]
    json: bool,

    /// Log this satellite's summary every tick (e.g. LEO_1)
    #[arg(long)]
    watch: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "traffic_sim=debug,info"
    } else {
        "traffic_sim=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string()),
        )
        .init();

    let config = SimConfig {
        low_count: args.leo_count,
        geo_count: args.geo_count,
        low_altitude_km: args.leo_altitude_km,
        geo_altitude_km: args.geo_altitude_km,
        delta_azimuth_rad: args.step_deg.to_radians(),
        initial_threshold_km: args.threshold_km,
        seed: args.seed,
    };

    let mut state = initialize(&config)?;
    info!(
        "running {} ticks at {} ms, threshold {} km",
        args.ticks, args.interval_ms, args.threshold_km
    );

    let mut peak_pairs = 0usize;
    for _ in 0..args.ticks {
        let snapshot = tick(&mut state, args.threshold_km, config.delta_azimuth_rad);

        for pair in &snapshot.pairs {
            info!(
                "collision risk: {} <-> {} at {:.1} km",
                pair.a, pair.b, pair.distance_km
            );
        }
        peak_pairs = peak_pairs.max(snapshot.pairs.len());

        if let Some(id) = args.watch.as_deref() {
            match snapshot.find_by_id(id) {
                Some(sat) => info!(
                    "{} | {:?} | altitude {:.1} km | ({:.0}, {:.0}, {:.0})",
                    sat.id, sat.class, sat.altitude_km, sat.x, sat.y, sat.z
                ),
                None => info!("{} not found in field", id),
            }
        }

        if args.json {
            println!("{}", serde_json::to_string(&snapshot)?);
        }

        if args.interval_ms > 0 {
            std::thread::sleep(Duration::from_millis(args.interval_ms));
        }
    }

    info!(
        "done: {} ticks, peak {} simultaneous proximity pairs",
        state.ticks(),
        peak_pairs
    );
    Ok(())
}
