pub mod analysis;
pub mod config;
pub mod error;
pub mod estimator;
pub mod export;
pub mod feasibility;
pub mod geo;
pub mod neighbors;
pub mod rng;
pub mod telemetry;
pub mod web;

pub use analysis::{Analysis, AnalysisRequest};
pub use estimator::{AdverseRegion, EnvironmentalEstimator, EnvironmentalSample};
pub use feasibility::{FeasibilityVerdict, Verdict};
pub use geo::Coordinate;
pub use neighbors::NeighborPoint;

/// [`EnvironmentalEstimator::estimate`] with the built-in adverse fixture.
pub fn estimate(coord: &Coordinate, month: u32) -> EnvironmentalSample {
    EnvironmentalEstimator::new().estimate(coord, month)
}

pub fn feasibility(sample: &EnvironmentalSample) -> FeasibilityVerdict {
    feasibility::assess(sample)
}

/// [`EnvironmentalEstimator::neighbors`] with the built-in adverse fixture.
pub fn neighbors(
    center: &Coordinate,
    radius_km: f64,
    count: usize,
    month: u32,
) -> Vec<NeighborPoint> {
    EnvironmentalEstimator::new().neighbors(center, radius_km, count, month)
}
