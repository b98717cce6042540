//! Space Traffic Simulation Core
//!
//! Orchestrates one simulation tick end-to-end: advance the orbital state,
//! screen the population for proximity pairs, and hand back an immutable
//! [`Snapshot`] for the rendering layer to consume and discard.
//!
//! The core is synchronous and single-threaded. An external driver (the
//! excluded presentation layer, or the bundled headless CLI) calls
//! [`initialize`] once and then [`tick`] per refresh, supplying the current
//! threshold fresh on every call; the core never interprets why a tick was
//! requested.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use proximity_screening::detect;
use satellite_field::factory;

pub use proximity_screening::ProximityPair;
pub use satellite_field::{
    FieldError, OrbitState, Satellite, SatelliteClass, DEFAULT_DELTA_AZIMUTH_RAD,
    DEFAULT_GEO_ALTITUDE_KM, DEFAULT_LOW_ALTITUDE_KM, EARTH_RADIUS_KM,
};

/// Default proximity threshold before any user adjustment, in km.
pub const DEFAULT_THRESHOLD_KM: f64 = 100.0;

/// Threshold control range surfaced to the UI layer. The core itself
/// accepts any non-negative threshold.
pub const THRESHOLD_MIN_KM: f64 = 10.0;
pub const THRESHOLD_MAX_KM: f64 = 500.0;
pub const THRESHOLD_STEP_KM: f64 = 10.0;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] FieldError),
    #[error("Invalid configuration: {name} is {value} (must be finite)")]
    NonFiniteParameter { name: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, SimError>;

/// Startup configuration for the simulation core.
///
/// Counts are `usize`, so the negative-count failure mode is
/// unrepresentable; altitudes and rates are validated by [`initialize`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub low_count: usize,
    pub geo_count: usize,
    pub low_altitude_km: f64,
    pub geo_altitude_km: f64,
    /// Azimuth advance per tick in radians (the animation speed).
    pub delta_azimuth_rad: f64,
    /// Threshold used before the host supplies its own.
    pub initial_threshold_km: f64,
    /// Seed for the field generator; `None` draws one from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            low_count: 50,
            geo_count: 50,
            low_altitude_km: DEFAULT_LOW_ALTITUDE_KM,
            geo_altitude_km: DEFAULT_GEO_ALTITUDE_KM,
            delta_azimuth_rad: DEFAULT_DELTA_AZIMUTH_RAD,
            initial_threshold_km: DEFAULT_THRESHOLD_KM,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Check the configuration without building anything.
    pub fn validate(&self) -> Result<()> {
        satellite_field::validate_altitude(self.low_altitude_km)?;
        satellite_field::validate_altitude(self.geo_altitude_km)?;
        if !self.delta_azimuth_rad.is_finite() {
            return Err(SimError::NonFiniteParameter {
                name: "delta_azimuth_rad",
                value: self.delta_azimuth_rad,
            });
        }
        if !self.initial_threshold_km.is_finite() {
            return Err(SimError::NonFiniteParameter {
                name: "initial_threshold_km",
                value: self.initial_threshold_km,
            });
        }
        Ok(())
    }
}

/// Per-satellite summary at snapshot time. Coordinates are km, flattened
/// for the consumer boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SatelliteSummary {
    pub id: String,
    pub class: SatelliteClass,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub altitude_km: f64,
}

impl From<&Satellite> for SatelliteSummary {
    fn from(sat: &Satellite) -> Self {
        let p = sat.position();
        Self {
            id: sat.id.clone(),
            class: sat.class,
            x: p.x,
            y: p.y,
            z: p.z,
            altitude_km: sat.altitude_km(),
        }
    }
}

/// Immutable per-tick output: every satellite's position plus the
/// proximity pairs and the threshold that produced them. Each snapshot
/// fully supersedes the previous one; the core retains no history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Ordinal of the tick that produced this snapshot.
    pub tick: u64,
    /// Summaries in population order (low shell first).
    pub satellites: Vec<SatelliteSummary>,
    pub pairs: Vec<ProximityPair>,
    /// The threshold the pair set was screened with, after clamping.
    pub threshold_km: f64,
}

impl Snapshot {
    /// Lookup supporting externally-driven selection (e.g. a click on a
    /// rendered point). Absence is `None`, never an error.
    pub fn find_by_id(&self, id: &str) -> Option<&SatelliteSummary> {
        self.satellites.iter().find(|s| s.id == id)
    }
}

/// One-time setup: validate the configuration and generate both shell
/// populations into a fresh [`OrbitState`].
pub fn initialize(config: &SimConfig) -> Result<OrbitState> {
    config.validate()?;

    let mut rng = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_os_rng(),
    };

    let mut satellites = factory::generate(
        config.low_count,
        config.low_altitude_km,
        SatelliteClass::Low,
        &mut rng,
    );
    satellites.extend(factory::generate(
        config.geo_count,
        config.geo_altitude_km,
        SatelliteClass::Geostationary,
        &mut rng,
    ));

    info!(
        "generated satellite field: {} LEO at {} km, {} GEO at {} km",
        config.low_count, config.low_altitude_km, config.geo_count, config.geo_altitude_km
    );

    Ok(OrbitState::new(satellites))
}

/// Run one tick: advance the orbital state, screen for proximity pairs,
/// and assemble the snapshot.
///
/// A negative `threshold_km` is clamped to zero rather than rejected, so a
/// transient bad value from a UI control can never halt the animation
/// loop; the clamped value is what the snapshot records.
pub fn tick(state: &mut OrbitState, threshold_km: f64, delta_azimuth_rad: f64) -> Snapshot {
    let threshold_km = if threshold_km < 0.0 {
        warn!(
            "negative proximity threshold {} km clamped to 0",
            threshold_km
        );
        0.0
    } else {
        threshold_km
    };

    state.advance(delta_azimuth_rad);
    let pairs = detect(state.satellites(), threshold_km);
    debug!(
        "tick {}: {} proximity pairs at {} km",
        state.ticks(),
        pairs.len(),
        threshold_km
    );

    Snapshot {
        tick: state.ticks(),
        satellites: state.satellites().iter().map(SatelliteSummary::from).collect(),
        pairs,
        threshold_km,
    }
}

/// Convenience wrapper owning the configuration and orbital state, for
/// hosts that drive the simulation at the configured speed.
pub struct Simulation {
    config: SimConfig,
    state: OrbitState,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Result<Self> {
        let state = initialize(&config)?;
        Ok(Self { config, state })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn state(&self) -> &OrbitState {
        &self.state
    }

    /// Tick at the configured animation speed with the caller's current
    /// threshold.
    pub fn step(&mut self, threshold_km: f64) -> Snapshot {
        tick(&mut self.state, threshold_km, self.config.delta_azimuth_rad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::TAU;

    fn seeded_config() -> SimConfig {
        SimConfig {
            low_count: 12,
            geo_count: 8,
            seed: Some(99),
            ..SimConfig::default()
        }
    }

    #[test]
    fn initialize_rejects_bad_altitudes() {
        let config = SimConfig {
            low_altitude_km: -2000.0,
            ..seeded_config()
        };
        assert!(matches!(
            initialize(&config),
            Err(SimError::InvalidConfiguration(_))
        ));

        let config = SimConfig {
            geo_altitude_km: 0.0,
            ..seeded_config()
        };
        assert!(initialize(&config).is_err());
    }

    #[test]
    fn initialize_rejects_non_finite_rates() {
        let config = SimConfig {
            delta_azimuth_rad: f64::NAN,
            ..seeded_config()
        };
        assert!(matches!(
            initialize(&config),
            Err(SimError::NonFiniteParameter { name: "delta_azimuth_rad", .. })
        ));

        let config = SimConfig {
            initial_threshold_km: f64::INFINITY,
            ..seeded_config()
        };
        assert!(initialize(&config).is_err());
    }

    #[test]
    fn initialize_builds_both_shells_in_order() {
        let state = initialize(&seeded_config()).unwrap();
        assert_eq!(state.len(), 20);
        assert_eq!(state.satellites()[0].id, "LEO_1");
        assert_eq!(state.satellites()[11].id, "LEO_12");
        assert_eq!(state.satellites()[12].id, "GEO_1");
        assert_eq!(state.satellites()[19].id, "GEO_8");
    }

    #[test]
    fn initialize_is_reproducible_for_a_seed() {
        let a = initialize(&seeded_config()).unwrap();
        let b = initialize(&seeded_config()).unwrap();
        for (x, y) in a.satellites().iter().zip(b.satellites()) {
            assert_eq!(x.id, y.id);
            assert_eq!(x.position(), y.position());
        }
    }

    #[test]
    fn empty_population_ticks_cleanly() {
        let config = SimConfig {
            low_count: 0,
            geo_count: 0,
            ..seeded_config()
        };
        let mut state = initialize(&config).unwrap();
        let snapshot = tick(&mut state, DEFAULT_THRESHOLD_KM, DEFAULT_DELTA_AZIMUTH_RAD);
        assert!(snapshot.satellites.is_empty());
        assert!(snapshot.pairs.is_empty());
        assert_eq!(snapshot.tick, 1);
    }

    #[test]
    fn snapshot_carries_summaries_and_threshold() {
        let mut state = initialize(&seeded_config()).unwrap();
        let snapshot = tick(&mut state, 250.0, DEFAULT_DELTA_AZIMUTH_RAD);

        assert_eq!(snapshot.satellites.len(), 20);
        assert_eq!(snapshot.threshold_km, 250.0);
        for summary in &snapshot.satellites {
            let expected = match summary.class {
                SatelliteClass::Low => DEFAULT_LOW_ALTITUDE_KM,
                SatelliteClass::Geostationary => DEFAULT_GEO_ALTITUDE_KM,
            };
            assert_relative_eq!(summary.altitude_km, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn negative_threshold_is_clamped_not_fatal() {
        let mut state = initialize(&seeded_config()).unwrap();
        let snapshot = tick(&mut state, -75.0, DEFAULT_DELTA_AZIMUTH_RAD);
        assert_eq!(snapshot.threshold_km, 0.0);
        assert!(snapshot.pairs.is_empty());
    }

    #[test]
    fn full_revolution_tick_restores_positions() {
        let mut state = initialize(&seeded_config()).unwrap();
        let before: Vec<_> = state.satellites().iter().map(|s| s.position()).collect();

        let snapshot = tick(&mut state, DEFAULT_THRESHOLD_KM, TAU);
        for (summary, prev) in snapshot.satellites.iter().zip(&before) {
            assert_relative_eq!(summary.x, prev.x, epsilon = 1e-6);
            assert_relative_eq!(summary.y, prev.y, epsilon = 1e-6);
            assert_relative_eq!(summary.z, prev.z, epsilon = 1e-6);
        }
    }

    #[test]
    fn find_by_id_hits_and_misses() {
        let mut state = initialize(&seeded_config()).unwrap();
        let snapshot = tick(&mut state, DEFAULT_THRESHOLD_KM, DEFAULT_DELTA_AZIMUTH_RAD);

        let hit = snapshot.find_by_id("GEO_3").unwrap();
        assert_eq!(hit.class, SatelliteClass::Geostationary);
        assert_relative_eq!(hit.altitude_km, DEFAULT_GEO_ALTITUDE_KM, epsilon = 1e-9);

        assert!(snapshot.find_by_id("GEO_999").is_none());
        assert!(snapshot.find_by_id("").is_none());
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let mut state = initialize(&seeded_config()).unwrap();
        let snapshot = tick(&mut state, DEFAULT_THRESHOLD_KM, DEFAULT_DELTA_AZIMUTH_RAD);

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.tick, snapshot.tick);
        assert_eq!(back.threshold_km, snapshot.threshold_km);
        assert_eq!(back.satellites, snapshot.satellites);
        assert_eq!(back.pairs, snapshot.pairs);
    }

    #[test]
    fn simulation_wrapper_steps_at_configured_speed() {
        let mut sim = Simulation::new(seeded_config()).unwrap();
        let first = sim.step(DEFAULT_THRESHOLD_KM);
        let second = sim.step(DEFAULT_THRESHOLD_KM);
        assert_eq!(first.tick, 1);
        assert_eq!(second.tick, 2);
        assert_eq!(sim.state().ticks(), 2);
    }

    #[test]
    fn coincident_pair_appears_for_positive_threshold_only() {
        // Two hand-built satellites at the same point on the low shell.
        let sats = vec![
            Satellite::new("LEO_1".into(), SatelliteClass::Low, 8371.0, 1.0, 2.0),
            Satellite::new("LEO_2".into(), SatelliteClass::Low, 8371.0, 1.0, 2.0),
        ];
        let mut state = OrbitState::new(sats);

        let risky = tick(&mut state, 10.0, 0.0);
        assert_eq!(risky.pairs.len(), 1);
        assert_eq!(risky.pairs[0].a, "LEO_1");
        assert_eq!(risky.pairs[0].b, "LEO_2");

        let none = tick(&mut state, 0.0, 0.0);
        assert!(none.pairs.is_empty());
    }
}
