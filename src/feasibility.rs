//! Solar feasibility scoring.
//!
//! Each metric contributes points; the total maps onto a three-way verdict.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::estimator::EnvironmentalSample;

pub const RADIATION_OPTIMAL_W_M2: f64 = 700.0;
pub const RADIATION_ACCEPTABLE_W_M2: f64 = 500.0;
pub const TEMPERATURE_OPTIMAL_C: (f64, f64) = (10.0, 35.0);
pub const TEMPERATURE_ACCEPTABLE_C: (f64, f64) = (-5.0, 40.0);
pub const HUMIDITY_LIMIT_PCT: f64 = 80.0;

/// Neighbour points above this radiation are flagged feasible.
pub const NEIGHBOR_RADIATION_THRESHOLD_W_M2: f64 = 650.0;

const FEASIBLE_SCORE: u8 = 4;
const CONDITIONAL_SCORE: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Feasible,
    Conditional,
    NotFeasible,
}

impl Verdict {
    pub fn from_score(score: u8) -> Self {
        if score >= FEASIBLE_SCORE {
            Verdict::Feasible
        } else if score >= CONDITIONAL_SCORE {
            Verdict::Conditional
        } else {
            Verdict::NotFeasible
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Verdict::Feasible => "Excellent conditions for solar panels",
            Verdict::Conditional => "Acceptable conditions with some limitations",
            Verdict::NotFeasible => "Conditions not suitable for solar energy",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Feasible => "FEASIBLE",
            Verdict::Conditional => "CONDITIONAL",
            Verdict::NotFeasible => "NOT_FEASIBLE",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Points awarded per criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub radiation: u8,
    pub temperature: u8,
    pub humidity: u8,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u8 {
        self.radiation + self.temperature + self.humidity
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityVerdict {
    pub verdict: Verdict,
    pub message: String,
    pub score: u8,
    pub breakdown: ScoreBreakdown,
}

pub fn score(sample: &EnvironmentalSample) -> ScoreBreakdown {
    let radiation = if sample.radiation_w_m2 > RADIATION_OPTIMAL_W_M2 {
        2
    } else if sample.radiation_w_m2 > RADIATION_ACCEPTABLE_W_M2 {
        1
    } else {
        0
    };

    let temperature = within(sample.temperature_c, TEMPERATURE_OPTIMAL_C)
        .then_some(2)
        .or_else(|| within(sample.temperature_c, TEMPERATURE_ACCEPTABLE_C).then_some(1))
        .unwrap_or(0);

    let humidity = u8::from(sample.humidity_pct < HUMIDITY_LIMIT_PCT);

    ScoreBreakdown {
        radiation,
        temperature,
        humidity,
    }
}

pub fn assess(sample: &EnvironmentalSample) -> FeasibilityVerdict {
    let breakdown = score(sample);
    let total = breakdown.total();
    let verdict = Verdict::from_score(total);
    FeasibilityVerdict {
        verdict,
        message: verdict.message().to_string(),
        score: total,
        breakdown,
    }
}

fn within(value: f64, (low, high): (f64, f64)) -> bool {
    (low..=high).contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(radiation: f64, temperature: f64, humidity: f64) -> EnvironmentalSample {
        EnvironmentalSample {
            radiation_w_m2: radiation,
            temperature_c: temperature,
            humidity_pct: humidity,
        }
    }

    #[test]
    fn ideal_site_is_feasible() {
        let result = assess(&sample(750.2, 25.3, 65.0));
        assert_eq!(result.verdict, Verdict::Feasible);
        assert_eq!(result.score, 5);
    }

    #[test]
    fn adverse_fixture_is_not_feasible() {
        // 280 W/m², 6.5 °C, 92 %: only the wide temperature band scores
        let result = assess(&sample(280.0, 6.5, 92.0));
        assert_eq!(result.breakdown.radiation, 0);
        assert_eq!(result.breakdown.temperature, 1);
        assert_eq!(result.breakdown.humidity, 0);
        assert_eq!(result.verdict, Verdict::NotFeasible);
    }

    #[test]
    fn thresholds_are_strict_for_radiation() {
        assert_eq!(score(&sample(700.0, 0.0, 100.0)).radiation, 1);
        assert_eq!(score(&sample(700.1, 0.0, 100.0)).radiation, 2);
        assert_eq!(score(&sample(500.0, 0.0, 100.0)).radiation, 0);
    }

    #[test]
    fn temperature_bands_are_inclusive() {
        assert_eq!(score(&sample(0.0, 10.0, 100.0)).temperature, 2);
        assert_eq!(score(&sample(0.0, 35.0, 100.0)).temperature, 2);
        assert_eq!(score(&sample(0.0, -5.0, 100.0)).temperature, 1);
        assert_eq!(score(&sample(0.0, 40.0, 100.0)).temperature, 1);
        assert_eq!(score(&sample(0.0, 40.1, 100.0)).temperature, 0);
    }

    #[test]
    fn conditional_band() {
        let result = assess(&sample(600.0, 0.0, 90.0));
        assert_eq!(result.score, 2);
        assert_eq!(result.verdict, Verdict::Conditional);
        assert_eq!(result.message, Verdict::Conditional.message());
    }

    #[test]
    fn label_matches_serialized_form() {
        for verdict in [Verdict::Feasible, Verdict::Conditional, Verdict::NotFeasible] {
            let json = serde_json::to_string(&verdict).unwrap();
            assert_eq!(json, format!("\"{}\"", verdict.label()));
        }
    }

    #[test]
    fn monotonic_in_radiation() {
        let mut previous = 0;
        let mut radiation = 400.0;
        while radiation <= 800.0 {
            let current = assess(&sample(radiation, 25.0, 50.0)).score;
            assert!(current >= previous, "score dropped at {radiation}");
            previous = current;
            radiation += 5.0;
        }
    }
}
