//! Satellite Field Library
//!
//! Synthetic two-shell satellite population (low orbit + geostationary) on
//! fixed-radius spherical shells, with per-tick azimuthal propagation.
//!
//! Each satellite keeps a fixed orbital radius and polar angle for its
//! lifetime; only the azimuth angle advances, so every satellite circles a
//! fixed latitude-like band of its shell.

use nalgebra::Vector3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Baseline low-shell altitude in kilometers.
pub const DEFAULT_LOW_ALTITUDE_KM: f64 = 2000.0;

/// Baseline geostationary-shell altitude in kilometers.
pub const DEFAULT_GEO_ALTITUDE_KM: f64 = 35786.0;

/// Baseline per-tick azimuth step: 0.5 degrees in radians.
pub const DEFAULT_DELTA_AZIMUTH_RAD: f64 = 0.5 * std::f64::consts::PI / 180.0;

const TWO_PI: f64 = std::f64::consts::TAU;

#[derive(Error, Debug)]
pub enum FieldError {
    #[error("Invalid shell altitude: {0} km (must be positive and finite)")]
    InvalidAltitude(f64),
}

pub type Result<T> = std::result::Result<T, FieldError>;

/// Validate a shell altitude before building a population on it.
pub fn validate_altitude(altitude_km: f64) -> Result<()> {
    if !altitude_km.is_finite() || altitude_km <= 0.0 {
        return Err(FieldError::InvalidAltitude(altitude_km));
    }
    Ok(())
}

/// Orbital shell class, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SatelliteClass {
    Low,
    Geostationary,
}

impl SatelliteClass {
    /// Short tag used as the id prefix and shown to consumers.
    pub fn label(&self) -> &'static str {
        match self {
            SatelliteClass::Low => "LEO",
            SatelliteClass::Geostationary => "GEO",
        }
    }
}

/// One tracked object on a spherical shell.
///
/// `radius_km` and `polar_angle` never change after creation. The azimuth
/// angle (and the Cartesian position derived from it) is advanced only by
/// [`OrbitState::advance`]; read access goes through [`Satellite::position`].
#[derive(Debug, Clone)]
pub struct Satellite {
    /// Stable identifier, `<class label>_<1-based ordinal>` (e.g. `LEO_7`).
    pub id: String,
    pub class: SatelliteClass,
    /// Orbital radius in km: Earth radius + shell altitude.
    pub radius_km: f64,
    /// Polar angle in radians, drawn once from [0, PI].
    pub polar_angle: f64,
    /// Azimuth angle in radians, kept wrapped in [0, 2*PI).
    azimuth_angle: f64,
    /// Cartesian position in km, cached from the angles above.
    position: Vector3<f64>,
}

impl Satellite {
    /// Build a satellite from its primary attributes. Populations are
    /// normally produced by [`factory::generate`]; this is public so hosts
    /// and tests can assemble hand-picked configurations.
    pub fn new(
        id: String,
        class: SatelliteClass,
        radius_km: f64,
        polar_angle: f64,
        azimuth_angle: f64,
    ) -> Self {
        let mut sat = Self {
            id,
            class,
            radius_km,
            polar_angle,
            azimuth_angle: wrap_azimuth(azimuth_angle),
            position: Vector3::zeros(),
        };
        sat.recompute_position();
        sat
    }

    pub fn azimuth_angle(&self) -> f64 {
        self.azimuth_angle
    }

    /// Current Cartesian position in km.
    pub fn position(&self) -> Vector3<f64> {
        self.position
    }

    /// Height above the Earth sphere in km.
    pub fn altitude_km(&self) -> f64 {
        self.radius_km - EARTH_RADIUS_KM
    }

    pub(crate) fn advance_azimuth(&mut self, delta_rad: f64) {
        self.azimuth_angle = wrap_azimuth(self.azimuth_angle + delta_rad);
        self.recompute_position();
    }

    /// Standard spherical-to-Cartesian conversion.
    fn recompute_position(&mut self) {
        let (theta, phi, r) = (self.polar_angle, self.azimuth_angle, self.radius_km);
        self.position = Vector3::new(
            r * theta.sin() * phi.cos(),
            r * theta.sin() * phi.sin(),
            r * theta.cos(),
        );
    }
}

/// Wrap an angle into [0, 2*PI).
fn wrap_azimuth(rad: f64) -> f64 {
    let wrapped = rad.rem_euclid(TWO_PI);
    // rem_euclid rounds up to exactly 2*PI for tiny negative remainders
    if wrapped >= TWO_PI {
        0.0
    } else {
        wrapped
    }
}

pub mod factory {
    //! Deterministic-shape, randomized-content generation of shell
    //! populations.

    use super::*;
    use std::f64::consts::PI;

    /// Generate `count` satellites on the shell at `altitude_km`.
    ///
    /// Polar angles are uniform in [0, PI], azimuth angles uniform in
    /// [0, 2*PI); ids are `<label>_<1-based index>`. Entropy comes from the
    /// passed RNG only, so a seeded generator reproduces the field exactly.
    /// `count = 0` yields an empty population.
    pub fn generate<R: Rng>(
        count: usize,
        altitude_km: f64,
        class: SatelliteClass,
        rng: &mut R,
    ) -> Vec<Satellite> {
        let radius_km = EARTH_RADIUS_KM + altitude_km;
        let mut satellites = Vec::with_capacity(count);

        for ordinal in 1..=count {
            let polar_angle = rng.random_range(0.0..=PI);
            let azimuth_angle = rng.random_range(0.0..TWO_PI);
            let id = format!("{}_{}", class.label(), ordinal);
            satellites.push(Satellite::new(
                id,
                class,
                radius_km,
                polar_angle,
                azimuth_angle,
            ));
        }

        satellites
    }
}

/// The mutable population of satellites plus the per-tick propagation rule.
///
/// Sole owner of the satellites' mutable state: azimuths and cached
/// positions change only through [`OrbitState::advance`], and the `&mut`
/// receiver keeps at most one writer at a time.
#[derive(Debug, Clone)]
pub struct OrbitState {
    satellites: Vec<Satellite>,
    ticks: u64,
}

impl OrbitState {
    /// Take ownership of a freshly generated population.
    pub fn new(satellites: Vec<Satellite>) -> Self {
        Self {
            satellites,
            ticks: 0,
        }
    }

    pub fn satellites(&self) -> &[Satellite] {
        &self.satellites
    }

    pub fn len(&self) -> usize {
        self.satellites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.satellites.is_empty()
    }

    /// Number of `advance` calls applied so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advance every satellite's azimuth by `delta_azimuth_rad` (wrapped
    /// into [0, 2*PI)) and recompute Cartesian positions. A delta of zero
    /// leaves angles and positions untouched; negative deltas step
    /// retrograde.
    pub fn advance(&mut self, delta_azimuth_rad: f64) {
        for sat in &mut self.satellites {
            sat.advance_azimuth(delta_azimuth_rad);
        }
        self.ticks += 1;
    }
}
