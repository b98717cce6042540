//! Proximity Screening Library
//!
//! Pairwise conjunction screening over the current satellite population:
//! every unordered pair whose Euclidean separation falls below the active
//! threshold is reported as a collision risk.
//!
//! The scan is exhaustive and quadratic in population size by design. At
//! the scale this core targets (tens to low hundreds of satellites) the
//! simplicity and determinism are worth more than asymptotics; if that
//! ever changes, a spatial index can replace the loop behind the same
//! [`detect`] contract.

use satellite_field::Satellite;
use serde::{Deserialize, Serialize};

/// Two satellites currently closer than the active threshold.
///
/// Pairs are unordered and reported once each, with the lower
/// population-index satellite in `a`. `distance_km` is the separation
/// measured at screening time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProximityPair {
    pub a: String,
    pub b: String,
    pub distance_km: f64,
}

/// Scan every unordered pair `(i, j)`, `i < j`, and report those with
/// Euclidean distance strictly below `threshold_km`.
///
/// The screen compares squared distances and takes the square root only
/// for reported pairs. Results come back in ascending `(i, j)` order, so a
/// fixed population and threshold always produce the identical list.
///
/// Empty and single-element populations yield no pairs, as does any
/// threshold at or below zero.
pub fn detect(satellites: &[Satellite], threshold_km: f64) -> Vec<ProximityPair> {
    if threshold_km <= 0.0 {
        return Vec::new();
    }
    let threshold_sq = threshold_km * threshold_km;
    let mut pairs = Vec::new();

    for i in 0..satellites.len() {
        for j in (i + 1)..satellites.len() {
            let d_sq = (satellites[i].position() - satellites[j].position()).norm_squared();
            if d_sq < threshold_sq {
                pairs.push(ProximityPair {
                    a: satellites[i].id.clone(),
                    b: satellites[j].id.clone(),
                    distance_km: d_sq.sqrt(),
                });
            }
        }
    }

    pairs
}
