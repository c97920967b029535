//! The cleaned, chronological series of readings and its month buckets.

use crate::loader::Table;
use crate::schema::{Channel, Schema};
use anyhow::Result;
use chrono::{Datelike, NaiveDateTime};

/// A timestamped value of one channel.
pub type Point = (NaiveDateTime, f64);

/// One cleaned row, holding the mapped channels in schema slot order.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub time: NaiveDateTime,
    pub values: Vec<f64>,
}

/// Every reading of a run, sorted by time.
///
/// Contains no row with a missing value and no row whose humidity reads
/// zero (the station's "no reading" marker).
#[derive(Debug)]
pub struct Series {
    schema: Schema,
    readings: Vec<Reading>,
}

/// The readings of one calendar month.
#[derive(Debug, Clone, Copy)]
pub struct MonthBucket<'a> {
    pub year: i32,
    pub month: u32,
    pub readings: &'a [Reading],
}

impl Series {
    /// Concatenate, sort and clean the tables produced by the loader.
    pub fn merge(schema: Schema, tables: Vec<Table>) -> Result<Self> {
        let humidity = schema.column(Channel::Humidity)?;

        let mut rows: Vec<_> = tables.into_iter().flat_map(|table| table.rows).collect();
        let n_rows = rows.len();
        // Stable, so equal timestamps keep file order.
        rows.sort_by_key(|row| row.time);

        let mut n_missing = 0;
        let mut n_no_reading = 0;
        let mut readings = Vec::with_capacity(n_rows);
        for row in rows {
            let Some(cells) = row.cells.into_iter().collect::<Option<Vec<f64>>>() else {
                n_missing += 1;
                continue;
            };
            if cells[humidity] == 0.0 {
                n_no_reading += 1;
                continue;
            }
            readings.push(Reading {
                time: row.time,
                values: schema.project(&cells),
            });
        }

        log::info!(
            "kept {} of {n_rows} rows ({n_missing} incomplete, {n_no_reading} without humidity reading)",
            readings.len()
        );

        Ok(Self { schema, readings })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Partition the series by calendar month, in chronological order.
    pub fn months(&self) -> Vec<MonthBucket<'_>> {
        self.readings
            .chunk_by(|a, b| month_of(a.time) == month_of(b.time))
            .map(|readings| {
                let (year, month) = month_of(readings[0].time);
                MonthBucket {
                    year,
                    month,
                    readings,
                }
            })
            .collect()
    }
}

impl MonthBucket<'_> {
    /// Month label in `YYYY-MM` form.
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

fn month_of(time: NaiveDateTime) -> (i32, u32) {
    (time.year(), time.month())
}

/// The values in `slot` of every reading, paired with their timestamps.
pub fn points(readings: &[Reading], slot: usize) -> Vec<Point> {
    readings.iter().map(|r| (r.time, r.values[slot])).collect()
}
