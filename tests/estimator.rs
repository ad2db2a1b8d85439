use solarscope::{
    estimate, feasibility, Coordinate, EnvironmentalEstimator, EnvironmentalSample, Verdict,
};

fn grid() -> impl Iterator<Item = Coordinate> {
    (-9..=9).flat_map(|i| {
        (-18..=18).map(move |j| Coordinate::new(i as f64 * 10.0 + 0.123, j as f64 * 10.0 - 0.456))
    })
}

#[test]
fn samples_stay_within_ranges() {
    let estimator = EnvironmentalEstimator::new();
    for coord in grid() {
        for month in 1..=12 {
            let sample = estimator.estimate(&coord, month);
            assert!(
                (200.0..=1200.0).contains(&sample.radiation_w_m2),
                "{coord} month {month}: {sample:?}"
            );
            assert!((-30.0..=50.0).contains(&sample.temperature_c));
            assert!((5.0..=100.0).contains(&sample.humidity_pct));
        }
    }
}

#[test]
fn estimate_is_bit_identical_across_calls() {
    for coord in grid() {
        let first = estimate(&coord, 3);
        let second = estimate(&coord, 3);
        assert_eq!(first.radiation_w_m2.to_bits(), second.radiation_w_m2.to_bits());
        assert_eq!(first.temperature_c.to_bits(), second.temperature_c.to_bits());
        assert_eq!(first.humidity_pct.to_bits(), second.humidity_pct.to_bits());
    }
}

#[test]
fn bogota_radiation_is_stable() {
    let bogota = Coordinate::new(4.711, -74.072);
    let expected = estimate(&bogota, 6).radiation_w_m2;
    for _ in 0..10 {
        assert_eq!(estimate(&bogota, 6).radiation_w_m2, expected);
    }
    // June near the equator: base 800 + 400 * 0.948 ≈ 1179, scaled by 0.8-1.2
    assert!(expected >= 940.0);
}

#[test]
fn adverse_coordinate_is_fixed_for_every_month() {
    let sumapaz = Coordinate::new(4.244, -74.144);
    for month in 1..=12 {
        let sample = estimate(&sumapaz, month);
        assert_eq!(
            sample,
            EnvironmentalSample {
                radiation_w_m2: 280.0,
                temperature_c: 6.5,
                humidity_pct: 92.0,
            }
        );
        assert_eq!(feasibility(&sample).verdict, Verdict::NotFeasible);
    }
}

#[test]
fn feasibility_never_drops_as_radiation_rises() {
    let mut previous = 0;
    for step in 0..=400 {
        let sample = EnvironmentalSample {
            radiation_w_m2: 400.0 + step as f64,
            temperature_c: 25.0,
            humidity_pct: 50.0,
        };
        let score = feasibility(&sample).score;
        assert!(score >= previous);
        previous = score;
    }
    assert_eq!(previous, 5);
}

#[test]
fn seasons_shift_radiation_by_hemisphere() {
    let estimator = EnvironmentalEstimator::new();
    let north = Coordinate::new(40.0, 10.0);
    let south = Coordinate::new(-40.0, 10.0);
    assert!(
        estimator.estimate(&north, 6).radiation_w_m2 > estimator.estimate(&north, 12).radiation_w_m2
    );
    assert!(
        estimator.estimate(&south, 12).radiation_w_m2 > estimator.estimate(&south, 6).radiation_w_m2
    );
}
