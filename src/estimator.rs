use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::feasibility::{self, FeasibilityVerdict};
use crate::geo::Coordinate;
use crate::rng::{coordinate_rng, RngExt};

pub const RADIATION_RANGE: (f64, f64) = (200.0, 1200.0);
pub const TEMPERATURE_RANGE: (f64, f64) = (-30.0, 50.0);
pub const HUMIDITY_RANGE: (f64, f64) = (5.0, 100.0);

const VARIATION_RANGE: (f64, f64) = (0.8, 1.2);

/// Synthetic environmental conditions at a single point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalSample {
    pub radiation_w_m2: f64,
    pub temperature_c: f64,
    pub humidity_pct: f64,
}

impl EnvironmentalSample {
    /// Builds a sample with every metric clamped to its valid range.
    pub fn clamped(radiation_w_m2: f64, temperature_c: f64, humidity_pct: f64) -> Self {
        Self {
            radiation_w_m2: clamp_to(radiation_w_m2, RADIATION_RANGE),
            temperature_c: clamp_to(temperature_c, TEMPERATURE_RANGE),
            humidity_pct: clamp_to(humidity_pct, HUMIDITY_RANGE),
        }
    }
}

/// Fixed override returning poor conditions around a reference point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdverseRegion {
    pub center: Coordinate,
    pub tolerance_deg: f64,
    pub sample: EnvironmentalSample,
}

impl AdverseRegion {
    pub fn contains(&self, coord: &Coordinate) -> bool {
        (coord.latitude - self.center.latitude).abs() < self.tolerance_deg
            && (coord.longitude - self.center.longitude).abs() < self.tolerance_deg
    }
}

impl Default for AdverseRegion {
    fn default() -> Self {
        Self {
            center: Coordinate::new(4.244, -74.144),
            tolerance_deg: 0.01,
            sample: EnvironmentalSample {
                radiation_w_m2: 280.0,
                temperature_c: 6.5,
                humidity_pct: 92.0,
            },
        }
    }
}

/// Derives synthetic conditions, verdicts and neighbour scatters from
/// coordinates. Stateless apart from the optional adverse override, which
/// defaults to the built-in fixture.
#[derive(Debug, Clone)]
pub struct EnvironmentalEstimator {
    adverse: Option<AdverseRegion>,
}

impl Default for EnvironmentalEstimator {
    fn default() -> Self {
        Self {
            adverse: Some(AdverseRegion::default()),
        }
    }
}

impl EnvironmentalEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_adverse_region(mut self, region: Option<AdverseRegion>) -> Self {
        self.adverse = region;
        self
    }

    pub fn adverse_region(&self) -> Option<&AdverseRegion> {
        self.adverse.as_ref()
    }

    /// The adverse region containing `coord`, if any.
    pub fn adverse_at(&self, coord: &Coordinate) -> Option<&AdverseRegion> {
        self.adverse.as_ref().filter(|region| region.contains(coord))
    }

    /// Synthetic conditions at `coord` for calendar `month` (1-12).
    pub fn estimate(&self, coord: &Coordinate, month: u32) -> EnvironmentalSample {
        if let Some(region) = self.adverse_at(coord) {
            trace!(%coord, "adverse region override");
            let sample = region.sample;
            return EnvironmentalSample::clamped(
                sample.radiation_w_m2,
                sample.temperature_c,
                sample.humidity_pct,
            );
        }

        let latitude_factor = (coord.latitude.abs() / 90.0).min(1.0);
        let longitude_factor = coord.longitude.rem_euclid(360.0) / 360.0;
        let seasonal = seasonal_factor(coord.latitude, month);

        let radiation_base = 800.0 + 400.0 * (1.0 - latitude_factor) * seasonal;
        let temperature_base = 25.0 - 40.0 * latitude_factor + 10.0 * seasonal;
        let humidity_base = 60.0 - 30.0 * longitude_factor + 20.0 * (1.0 - latitude_factor);

        let variation = coordinate_rng(coord).uniform(VARIATION_RANGE.0, VARIATION_RANGE.1);

        let radiation = radiation_base * variation;
        let temperature = temperature_base * (0.9 + 0.2 * (1.0 - variation));
        let humidity = humidity_base * (0.8 + 0.4 * (variation - 0.8) / 0.4);

        EnvironmentalSample::clamped(round1(radiation), round1(temperature), round1(humidity))
    }

    pub fn feasibility(&self, sample: &EnvironmentalSample) -> FeasibilityVerdict {
        feasibility::assess(sample)
    }
}

/// Cosine seasonal curve peaking in June north of the equator and in
/// December elsewhere.
pub fn seasonal_factor(latitude: f64, month: u32) -> f64 {
    let month = f64::from(month.clamp(1, 12));
    let phase = if latitude > 0.0 { month - 6.0 } else { month };
    0.5 + 0.5 * (2.0 * PI * phase / 12.0).cos()
}

pub(crate) fn clamp_to(value: f64, (min, max): (f64, f64)) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
