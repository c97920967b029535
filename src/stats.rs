use crate::series::Point;
use chrono::{NaiveDateTime, NaiveTime, Timelike};
use std::collections::BTreeMap;

/// Running arithmetic mean.
#[derive(Debug, Default)]
pub struct Accumulator {
    n_vals: usize,
    mean: f64,
}

impl Accumulator {
    pub fn add(&mut self, val: f64) {
        self.n_vals += 1;
        self.mean += (val - self.mean) / self.n_vals as f64;
    }

    pub fn mean(&self) -> f64 {
        if self.n_vals == 0 {
            return f64::NAN;
        }
        self.mean
    }
}

/// Mean of each calendar day, keyed at midnight.
pub fn daily_mean(points: &[Point]) -> Vec<Point> {
    bucket_mean(points, |time| time.date().and_time(NaiveTime::MIN))
}

/// Mean of each clock hour, keyed at the full hour.
///
/// Applied to wind direction this is a plain arithmetic mean, so hours with
/// readings on both sides of north average towards south.
pub fn hourly_mean(points: &[Point]) -> Vec<Point> {
    bucket_mean(points, |time| {
        NaiveTime::from_hms_opt(time.hour(), 0, 0)
            .map_or(time, |hour| time.date().and_time(hour))
    })
}

/// Mean per bucket, skipping buckets without data.
fn bucket_mean(points: &[Point], key: impl Fn(NaiveDateTime) -> NaiveDateTime) -> Vec<Point> {
    let mut buckets: BTreeMap<NaiveDateTime, Accumulator> = BTreeMap::new();
    for &(time, val) in points {
        buckets.entry(key(time)).or_default().add(val);
    }
    buckets
        .into_iter()
        .map(|(start, acc)| (start, acc.mean()))
        .collect()
}

/// Rain gauge readings and the rainfall between them.
#[derive(Debug, Default, PartialEq)]
pub struct Rainfall {
    /// Cumulative gauge values, zero readings removed.
    pub gauge: Vec<Point>,
    /// Increase since the previous gauge value; the first is zero.
    pub increments: Vec<Point>,
}

/// Derive per-interval rainfall from a cumulative rain gauge.
///
/// A zero gauge value means the sensor had no reading and is skipped.
/// Decreases (counter resets) are clipped to zero.
pub fn rainfall(gauge: &[Point]) -> Rainfall {
    let gauge: Vec<Point> = gauge.iter().copied().filter(|&(_, val)| val != 0.0).collect();

    let mut prev: Option<f64> = None;
    let increments = gauge
        .iter()
        .map(|&(time, val)| {
            let diff = prev.map_or(0.0, |prev| (val - prev).max(0.0));
            prev = Some(val);
            (time, diff)
        })
        .collect();

    Rainfall { gauge, increments }
}
