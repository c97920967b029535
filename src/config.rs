use crate::i18n::Language;
use crate::schema::{Channel, Schema, Variant};
use anyhow::{Context, Result, bail};
use plotters::style::RGBColor;
use serde::Deserialize;
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Debug,
    fs,
    ops::RangeBounds,
    path::{Path, PathBuf},
};

/// Report configuration parameters.
///
/// Loaded from a TOML file and validated before use.
/// See [`Config::from_file`] for loading. Every key is optional and falls
/// back to the [`Default`] value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory scanned for input files.
    pub input_dir: PathBuf,
    /// Extension of the input files, without the dot.
    pub extension: String,
    /// Path of the generated document.
    pub output_file: PathBuf,

    /// Station location, appended to the report title.
    pub location: String,
    /// Language of every title and label.
    pub language: Language,

    /// `strftime`-style format of the timestamp column.
    pub timestamp_format: String,

    /// Column layout of the station.
    pub station: StationConfig,

    /// Channel (or `average`) to `#rrggbb` color overrides.
    pub colors: BTreeMap<String, String>,

    /// Channels drawn with a daily mean overlay.
    pub daily_average: Vec<String>,
}

/// Column layout of the station: a preset optionally amended per channel.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StationConfig {
    pub variant: Variant,
    /// Number of data columns; defaults to the preset's count.
    pub columns: Option<usize>,
    /// Channel name to column index, on top of the preset.
    pub channels: BTreeMap<String, usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("datacake_csv"),
            extension: "csv".to_string(),
            output_file: PathBuf::from("weather_report.html"),
            location: "<Location>".to_string(),
            language: Language::En,
            timestamp_format: "%a, %d %b %Y %H:%M:%S".to_string(),
            station: StationConfig::default(),
            colors: BTreeMap::new(),
            daily_average: [
                Channel::Temperature,
                Channel::Humidity,
                Channel::SoilTemperature,
                Channel::SoilMoisture,
                Channel::WaterTemperature,
            ]
            .iter()
            .map(|ch| ch.name().to_string())
            .collect(),
        }
    }
}

/// Colors of every channel plus the one used for mean overlays.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: BTreeMap<Channel, RGBColor>,
    average: RGBColor,
}

impl Palette {
    pub fn color(&self, ch: Channel) -> RGBColor {
        self.colors.get(&ch).copied().unwrap_or(RGBColor(0, 0, 0))
    }

    pub fn average(&self) -> RGBColor {
        self.average
    }
}

const DEFAULT_COLORS: [(&str, &str); 11] = [
    ("temperature", "#ff0000"),
    ("humidity", "#87ceeb"),
    ("rain_gauge", "#0000ff"),
    ("wind_avg", "#008000"),
    ("wind_gust", "#00ff00"),
    ("wind_direction", "#808080"),
    ("battery_voltage", "#ffa500"),
    ("soil_temperature", "#8b4513"),
    ("soil_moisture", "#2e8b57"),
    ("water_temperature", "#1e90ff"),
    ("average", "#000000"),
];

impl Config {
    /// Load a [`Config`] from a file.
    ///
    /// The file must be TOML-encoded. Performs validation on all parameters
    /// before returning.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents = fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let config: Config = toml::from_str(&contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.extension.is_empty() {
            bail!("input file extension must not be empty");
        }
        if self.timestamp_format.trim().is_empty() {
            bail!("timestamp format must not be empty");
        }

        self.schema().context("invalid station column map")?;
        self.palette().context("invalid colors")?;
        self.averaged().context("invalid daily average channels")?;

        Ok(())
    }

    /// Resolve the station column map into a [`Schema`].
    pub fn schema(&self) -> Result<Schema> {
        let station = &self.station;
        if station.columns.is_none() && station.channels.is_empty() {
            return Schema::from_variant(station.variant);
        }

        let columns = station.columns.unwrap_or(station.variant.columns());
        check_num(columns, 1..=64).context("invalid number of data columns")?;

        let mut map: BTreeMap<Channel, usize> =
            station.variant.channels().iter().copied().collect();
        for (name, &col) in &station.channels {
            let ch: Channel = name.parse()?;
            map.insert(ch, col);
        }

        Schema::new(columns, &map)
    }

    pub fn palette(&self) -> Result<Palette> {
        let mut colors = BTreeMap::new();
        let mut average = RGBColor(0, 0, 0);

        let defaults = DEFAULT_COLORS.iter().map(|&(k, v)| (k, v));
        let overrides = self.colors.iter().map(|(k, v)| (k.as_str(), v.as_str()));
        for (key, hex) in defaults.chain(overrides) {
            let color = parse_color(hex).with_context(|| format!("invalid color of {key}"))?;
            if key == "average" {
                average = color;
            } else {
                colors.insert(key.parse::<Channel>()?, color);
            }
        }

        Ok(Palette { colors, average })
    }

    pub fn averaged(&self) -> Result<BTreeSet<Channel>> {
        self.daily_average.iter().map(|name| name.parse()).collect()
    }
}

fn parse_color(hex: &str) -> Result<RGBColor> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        bail!("color must be written as #rrggbb, but is {hex:?}");
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16);
    Ok(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = Config::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.schema().unwrap().columns(), 12);
        assert_eq!(cfg.palette().unwrap().color(Channel::Humidity), RGBColor(0x87, 0xce, 0xeb));
    }

    #[test]
    fn parses_partial_toml() {
        let cfg: Config = toml::from_str(
            r##"
location = "Garden"
language = "de"

[station]
variant = "compact"

[colors]
average = "#123456"
"##,
        )
        .unwrap();
        cfg.validate().unwrap();

        assert_eq!(cfg.language, Language::De);
        assert_eq!(cfg.extension, "csv");
        assert_eq!(cfg.schema().unwrap().columns(), 7);
        assert_eq!(cfg.palette().unwrap().average(), RGBColor(0x12, 0x34, 0x56));
    }

    #[test]
    fn plain_variant_uses_its_preset() {
        let mut cfg = Config::default();
        cfg.station.variant = Variant::Soil;
        assert_eq!(cfg.schema().unwrap(), Schema::from_variant(Variant::Soil).unwrap());

        cfg.station.columns = Some(16);
        let schema = cfg.schema().unwrap();
        assert_eq!(schema, Schema::from_variant(Variant::Soil).unwrap());
        assert!(schema.has(Channel::WaterTemperature));
    }

    #[test]
    fn channel_overrides_extend_preset() {
        let cfg: Config = toml::from_str(
            r#"
[station]
variant = "standard"
columns = 14

[station.channels]
water_temperature = 13
"#,
        )
        .unwrap();
        let schema = cfg.schema().unwrap();
        assert_eq!(schema.column(Channel::WaterTemperature).unwrap(), 13);
        assert_eq!(schema.column(Channel::Humidity).unwrap(), 6);
    }

    #[test]
    fn rejects_index_beyond_columns() {
        let cfg: Config = toml::from_str(
            r#"
[station]
variant = "compact"

[station.channels]
battery_voltage = 9
"#,
        )
        .unwrap();
        let err = cfg.validate().unwrap_err();
        assert!(format!("{err:#}").contains("out of range"));
    }

    #[test]
    fn rejects_unknown_channel_name() {
        let cfg: Config = toml::from_str("daily_average = [\"pressure\"]").unwrap();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_bad_color() {
        let cfg: Config = toml::from_str("[colors]\ntemperature = \"red\"").unwrap();
        let err = cfg.validate().unwrap_err();
        assert!(format!("{err:#}").contains("#rrggbb"));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(toml::from_str::<Config>("input = \"x\"").is_err());
    }
}
