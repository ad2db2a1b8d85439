//! One-shot site analysis: conditions at the site, its verdict and the
//! neighbour scatter, bundled for the CLI and the HTTP API.

use chrono::{DateTime, Datelike, Local};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::estimator::{EnvironmentalEstimator, EnvironmentalSample};
use crate::feasibility::FeasibilityVerdict;
use crate::geo::Coordinate;
use crate::neighbors::NeighborPoint;

pub const DEFAULT_RADIUS_KM: f64 = 5.0;
pub const DEFAULT_NEIGHBOR_COUNT: usize = 20;
pub const MIN_RADIUS_KM: f64 = 0.1;
pub const MAX_RADIUS_KM: f64 = 20.0;
pub const MAX_NEIGHBOR_COUNT: usize = 1_000;

pub fn current_month() -> u32 {
    Local::now().month()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub coordinate: Coordinate,
    pub radius_km: f64,
    pub neighbor_count: usize,
    pub month: u32,
}

impl AnalysisRequest {
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            radius_km: DEFAULT_RADIUS_KM,
            neighbor_count: DEFAULT_NEIGHBOR_COUNT,
            month: current_month(),
        }
    }

    /// Radius clamped to [`MIN_RADIUS_KM`, `MAX_RADIUS_KM`].
    pub fn with_radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = if radius_km.is_nan() {
            DEFAULT_RADIUS_KM
        } else {
            radius_km.clamp(MIN_RADIUS_KM, MAX_RADIUS_KM)
        };
        self
    }

    /// Count capped at [`MAX_NEIGHBOR_COUNT`].
    pub fn with_neighbor_count(mut self, count: usize) -> Self {
        self.neighbor_count = count.min(MAX_NEIGHBOR_COUNT);
        self
    }

    pub fn with_month(mut self, month: u32) -> Self {
        self.month = month.clamp(1, 12);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub request: AnalysisRequest,
    pub sample: EnvironmentalSample,
    pub verdict: FeasibilityVerdict,
    pub neighbors: Vec<NeighborPoint>,
    pub feasible_count: usize,
    pub analyzed_at: DateTime<Local>,
}

impl Analysis {
    pub fn run(estimator: &EnvironmentalEstimator, request: AnalysisRequest) -> Self {
        let sample = estimator.estimate(&request.coordinate, request.month);
        let verdict = estimator.feasibility(&sample);
        let neighbors = estimator.neighbors(
            &request.coordinate,
            request.radius_km,
            request.neighbor_count,
            request.month,
        );
        let feasible_count = neighbors.iter().filter(|point| point.feasible).count();

        info!(
            coordinate = %request.coordinate,
            verdict = %verdict.verdict,
            score = verdict.score,
            feasible_count,
            total = neighbors.len(),
            "analysis complete"
        );

        Self {
            request,
            sample,
            verdict,
            neighbors,
            feasible_count,
            analyzed_at: Local::now(),
        }
    }

    /// Feasible neighbours, strongest radiation first.
    pub fn feasible_neighbors(&self) -> Vec<NeighborPoint> {
        let mut points: Vec<_> = self
            .neighbors
            .iter()
            .filter(|point| point.feasible)
            .copied()
            .collect();
        points.sort_by(|a, b| b.sample.radiation_w_m2.total_cmp(&a.sample.radiation_w_m2));
        points
    }
}
