//! Synthetic neighbour scatter around a center coordinate.

use std::f64::consts::TAU;

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::estimator::{
    clamp_to, AdverseRegion, EnvironmentalEstimator, EnvironmentalSample, HUMIDITY_RANGE,
    RADIATION_RANGE,
};
use crate::feasibility::NEIGHBOR_RADIATION_THRESHOLD_W_M2;
use crate::geo::Coordinate;
use crate::rng::{coordinate_rng, RngExt};

/// Closest a neighbour may be placed to the center.
pub const MIN_DISTANCE_KM: f64 = 0.1;
// Half the equatorial circumference.
const MAX_DISTANCE_KM: f64 = 20_037.5;

const ADVERSE_RADIATION_SIGMA: f64 = 20.0;
const ADVERSE_TEMPERATURE_SIGMA: f64 = 2.0;
const ADVERSE_HUMIDITY_SIGMA: f64 = 5.0;
const ADVERSE_TEMPERATURE_RANGE: (f64, f64) = (0.0, 50.0);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeighborPoint {
    pub coordinate: Coordinate,
    pub sample: EnvironmentalSample,
    pub feasible: bool,
}

impl EnvironmentalEstimator {
    /// Generates exactly `count` points within `radius_km` of `center`, in
    /// generation order. The stream is keyed by `center`, so repeated calls
    /// return the same scatter.
    pub fn neighbors(
        &self,
        center: &Coordinate,
        radius_km: f64,
        count: usize,
        month: u32,
    ) -> Vec<NeighborPoint> {
        let radius_km = radius_km.max(MIN_DISTANCE_KM).min(MAX_DISTANCE_KM);
        let mut rng = coordinate_rng(center);
        let adverse = self.adverse_at(center).copied();
        let noise = adverse.map(AdverseNoise::new);

        debug!(
            %center,
            radius_km,
            count,
            adverse = adverse.is_some(),
            "generating neighbour points"
        );

        let mut points = Vec::with_capacity(count);
        for _ in 0..count {
            let angle = rng.uniform(0.0, TAU);
            let distance = rng.gen_range(MIN_DISTANCE_KM..=radius_km);
            let coordinate = center.offset(distance, angle);

            let point = match &noise {
                Some(noise) => NeighborPoint {
                    coordinate,
                    sample: noise.draw(&mut rng),
                    feasible: false,
                },
                None => {
                    let sample = self.estimate(&coordinate, month);
                    NeighborPoint {
                        coordinate,
                        sample,
                        feasible: sample.radiation_w_m2 > NEIGHBOR_RADIATION_THRESHOLD_W_M2,
                    }
                }
            };
            points.push(point);
        }
        points
    }
}

struct AdverseNoise {
    base: EnvironmentalSample,
}

impl AdverseNoise {
    fn new(region: AdverseRegion) -> Self {
        Self {
            base: region.sample,
        }
    }

    fn draw<R: Rng>(&self, rng: &mut R) -> EnvironmentalSample {
        let mut perturb = |mean: f64, sigma: f64| {
            let z: f64 = rng.sample(StandardNormal);
            mean + sigma * z
        };
        let radiation = perturb(self.base.radiation_w_m2, ADVERSE_RADIATION_SIGMA);
        let temperature = perturb(self.base.temperature_c, ADVERSE_TEMPERATURE_SIGMA);
        let humidity = perturb(self.base.humidity_pct, ADVERSE_HUMIDITY_SIGMA);
        EnvironmentalSample {
            radiation_w_m2: clamp_to(radiation, RADIATION_RANGE),
            temperature_c: clamp_to(temperature, ADVERSE_TEMPERATURE_RANGE),
            humidity_pct: clamp_to(humidity, HUMIDITY_RANGE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_requested_count() {
        let estimator = EnvironmentalEstimator::new();
        let center = Coordinate::new(4.711, -74.072);
        for count in [0, 1, 20, 57] {
            assert_eq!(estimator.neighbors(&center, 5.0, count, 6).len(), count);
        }
    }

    #[test]
    fn tiny_radius_collapses_to_minimum_distance() {
        let estimator = EnvironmentalEstimator::new();
        let center = Coordinate::new(4.711, -74.072);
        for point in estimator.neighbors(&center, 0.0, 10, 6) {
            let d = center.approx_distance_km(&point.coordinate);
            assert!((d - MIN_DISTANCE_KM).abs() < 1e-6);
        }
    }

    #[test]
    fn feasibility_flag_tracks_radiation() {
        let estimator = EnvironmentalEstimator::new();
        let center = Coordinate::new(-33.45, -70.66);
        for point in estimator.neighbors(&center, 10.0, 40, 1) {
            assert_eq!(point.feasible, point.sample.radiation_w_m2 > 650.0);
        }
    }

    #[test]
    fn adverse_scatter_stays_near_fixture() {
        let estimator = EnvironmentalEstimator::new();
        let center = Coordinate::new(4.244, -74.144);
        for point in estimator.neighbors(&center, 5.0, 100, 3) {
            assert!(!point.feasible);
            assert!(point.sample.radiation_w_m2 >= 200.0);
            assert!(point.sample.temperature_c >= 0.0);
            assert!(point.sample.humidity_pct <= 100.0);
        }
    }
}
