//! Tests for the Argo accessor
//!
//! Shared fixtures build small collections of points shaped like the
//! measurements served for two floats.

pub mod normalize_tests;

use crate::constants::PROFILE_COORDINATES;
use crate::dataset::Dataset;
use chrono::NaiveDate;
use polars::prelude::*;

pub const FLOAT_A: i64 = 6901234;
pub const FLOAT_B: i64 = 6905678;

/// Float A: 3 measurements in cycle 1. Float B: 5 in cycle 1, 2 in cycle 2.
/// Rows are interleaved so grouping has to keep each profile's row order.
pub fn two_float_points() -> Dataset {
    let platforms = [
        FLOAT_B, FLOAT_A, FLOAT_B, FLOAT_B, FLOAT_A, FLOAT_B, FLOAT_B, FLOAT_A, FLOAT_B, FLOAT_B,
    ];
    let cycles = [1i64, 1, 2, 1, 1, 1, 2, 1, 1, 1];
    let pres = [5.0, 10.0, 1.0, 15.0, 20.0, 25.0, 2.0, 30.0, 35.0, 45.0];

    let latitude: Vec<f64> = platforms
        .iter()
        .zip(&cycles)
        .map(|(&p, &c)| match (p, c) {
            (FLOAT_A, _) => 10.0,
            (_, 1) => 20.0,
            _ => 21.0,
        })
        .collect();
    let longitude: Vec<f64> = latitude.iter().map(|lat| -lat - 20.0).collect();
    let time: Vec<i64> = cycles.iter().map(|&c| profile_time(c)).collect();

    let frame = df!(
        "PLATFORM_NUMBER" => platforms.iter().map(|&p| p as f64).collect::<Vec<_>>(),
        "CYCLE_NUMBER" => cycles,
        "PRES" => pres,
        "TEMP_QC" => ["1", "1", "2", " ", "1", "4", "1", "1", "1", " "],
        "DATA_MODE" => ["R", "R", "D", "R", "R", "R", "D", "R", "R", "R"],
        "latitude" => latitude,
        "longitude" => longitude,
        "time" => time
    )
    .unwrap();

    let mut dataset = Dataset::from_point_frame(&frame, PROFILE_COORDINATES).unwrap();
    let time = dataset
        .get("time")
        .unwrap()
        .data()
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
        .unwrap();
    dataset.replace_data("time", time).unwrap();
    dataset.set_attr("Conventions", "Argo-3.1 CF-1.6");
    dataset
}

/// Milliseconds since the epoch of a cycle's surfacing
pub fn profile_time(cycle: i64) -> i64 {
    NaiveDate::from_ymd_opt(2020, 1, cycle as u32)
        .unwrap()
        .and_hms_opt(6, 30, 0)
        .unwrap()
        .and_utc()
        .timestamp_millis()
}

pub fn floats(dataset: &Dataset, name: &str) -> Vec<Option<f64>> {
    let series = dataset
        .get(name)
        .unwrap()
        .data()
        .cast(&DataType::Float64)
        .unwrap();
    series.f64().unwrap().into_iter().collect()
}

pub fn ints(dataset: &Dataset, name: &str) -> Vec<Option<i64>> {
    let series = dataset
        .get(name)
        .unwrap()
        .data()
        .cast(&DataType::Int64)
        .unwrap();
    series.i64().unwrap().into_iter().collect()
}

pub fn texts(dataset: &Dataset, name: &str) -> Vec<Option<String>> {
    dataset
        .get(name)
        .unwrap()
        .data()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect()
}

/// NaN-aware comparison of float columns
pub fn assert_floats_eq(actual: &[Option<f64>], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "length of {actual:?}");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        match a {
            Some(a) if e.is_nan() => assert!(a.is_nan(), "cell {i}: {a} is not NaN"),
            Some(a) => assert_eq!(a, e, "cell {i}"),
            None => panic!("cell {i}: null, expected {e}"),
        }
    }
}
