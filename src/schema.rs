//! Named measurement channels and their position in the input columns.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::{collections::BTreeMap, fmt, str::FromStr};

/// One named numeric measurement stream of a weather station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Channel {
    Temperature,
    Humidity,
    RainGauge,
    WindAvg,
    WindGust,
    WindDirection,
    BatteryVoltage,
    SoilTemperature,
    SoilMoisture,
    WaterTemperature,
}

impl Channel {
    pub const ALL: [Channel; 10] = [
        Channel::Temperature,
        Channel::Humidity,
        Channel::RainGauge,
        Channel::WindAvg,
        Channel::WindGust,
        Channel::WindDirection,
        Channel::BatteryVoltage,
        Channel::SoilTemperature,
        Channel::SoilMoisture,
        Channel::WaterTemperature,
    ];

    /// Channels every station variant must provide.
    pub const REQUIRED: [Channel; 7] = [
        Channel::Temperature,
        Channel::Humidity,
        Channel::RainGauge,
        Channel::WindAvg,
        Channel::WindGust,
        Channel::WindDirection,
        Channel::BatteryVoltage,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Channel::Temperature => "temperature",
            Channel::Humidity => "humidity",
            Channel::RainGauge => "rain_gauge",
            Channel::WindAvg => "wind_avg",
            Channel::WindGust => "wind_gust",
            Channel::WindDirection => "wind_direction",
            Channel::BatteryVoltage => "battery_voltage",
            Channel::SoilTemperature => "soil_temperature",
            Channel::SoilMoisture => "soil_moisture",
            Channel::WaterTemperature => "water_temperature",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Channel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match Channel::ALL.iter().find(|ch| ch.name() == s) {
            Some(&ch) => Ok(ch),
            None => bail!("unknown channel {s:?}"),
        }
    }
}

/// Sensor-set configuration of a station, i.e. a preset column layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Weather sensor only.
    Compact,
    /// Weather sensor plus auxiliary fields, as exported by default.
    #[default]
    Standard,
    /// Standard layout plus soil and water probes.
    Soil,
}

impl Variant {
    /// Number of data columns following the timestamp.
    pub fn columns(self) -> usize {
        match self {
            Variant::Compact => 7,
            Variant::Standard => 12,
            Variant::Soil => 16,
        }
    }

    pub fn channels(self) -> &'static [(Channel, usize)] {
        use Channel::*;
        match self {
            Variant::Compact => &[
                (Temperature, 0),
                (Humidity, 1),
                (RainGauge, 2),
                (WindAvg, 3),
                (WindGust, 4),
                (WindDirection, 5),
                (BatteryVoltage, 6),
            ],
            Variant::Standard => &[
                (Temperature, 0),
                (WindAvg, 5),
                (Humidity, 6),
                (RainGauge, 8),
                (WindGust, 9),
                (WindDirection, 10),
                (BatteryVoltage, 11),
            ],
            Variant::Soil => &[
                (Temperature, 0),
                (WindAvg, 5),
                (Humidity, 6),
                (RainGauge, 8),
                (WindGust, 9),
                (WindDirection, 10),
                (BatteryVoltage, 11),
                (SoilTemperature, 12),
                (SoilMoisture, 13),
                (WaterTemperature, 14),
            ],
        }
    }
}

/// Column layout resolved once from the configuration.
///
/// Every mapped channel has a raw column index (position among the data
/// columns of an input row) and a slot (position in [`crate::series::Reading::values`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    columns: usize,
    channels: Vec<(Channel, usize)>,
}

impl Schema {
    /// Build a schema from a column count and a channel → column map.
    ///
    /// # Errors
    /// Returns an error if a column index is out of range, if two channels
    /// share a column or if a required channel is missing.
    pub fn new(columns: usize, map: &BTreeMap<Channel, usize>) -> Result<Self> {
        let mut channels: Vec<(Channel, usize)> = Vec::with_capacity(map.len());
        for (&ch, &col) in map {
            if col >= columns {
                bail!("column {col} of channel {ch} is out of range for {columns} data columns");
            }
            if let Some((other, _)) = channels.iter().find(|(_, c)| *c == col) {
                bail!("channels {other} and {ch} both map to column {col}");
            }
            channels.push((ch, col));
        }
        for ch in Channel::REQUIRED {
            if !map.contains_key(&ch) {
                bail!("required channel {ch} is not mapped to a column");
            }
        }
        Ok(Self { columns, channels })
    }

    pub fn from_variant(variant: Variant) -> Result<Self> {
        let map = variant.channels().iter().copied().collect();
        Self::new(variant.columns(), &map)
            .with_context(|| format!("invalid preset for {variant:?}"))
    }

    /// Number of data columns expected after the timestamp.
    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn has(&self, ch: Channel) -> bool {
        self.channels.iter().any(|&(c, _)| c == ch)
    }

    /// Raw column index of `ch`.
    pub fn column(&self, ch: Channel) -> Result<usize> {
        match self.channels.iter().find(|&&(c, _)| c == ch) {
            Some(&(_, col)) => Ok(col),
            None => bail!("channel {ch} is not part of the station column map"),
        }
    }

    /// Position of `ch` in the values of a reading.
    pub fn slot(&self, ch: Channel) -> Result<usize> {
        match self.channels.iter().position(|&(c, _)| c == ch) {
            Some(slot) => Ok(slot),
            None => bail!("channel {ch} is not part of the station column map"),
        }
    }

    /// Pick the mapped channels out of a full row of data columns.
    pub fn project(&self, cells: &[f64]) -> Vec<f64> {
        self.channels.iter().map(|&(_, col)| cells[col]).collect()
    }
}
