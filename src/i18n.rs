//! Static label tables for the supported report languages.

use clap::ValueEnum;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    De,
}

/// Every piece of text that appears on a report page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    WeatherReport,
    AnnualOverview,
    MonthlyReports,
    AirTemperatureHumidity,
    Temperature,
    Humidity,
    DailyAvg,
    Rain,
    RainAmount,
    RainGauge,
    Wind,
    WindAverage,
    WindGusts,
    WindDirection,
    BatteryVoltage,
    Voltage,
    Soil,
    SoilTemperature,
    SoilMoisture,
    WaterTemperature,
}

impl Language {
    pub fn text(self, label: Label) -> &'static str {
        match self {
            Language::En => english(label),
            Language::De => german(label),
        }
    }
}

fn english(label: Label) -> &'static str {
    match label {
        Label::WeatherReport => "Weather Report",
        Label::AnnualOverview => "Annual Overview",
        Label::MonthlyReports => "Monthly Reports",
        Label::AirTemperatureHumidity => "Air Temperature and Humidity",
        Label::Temperature => "Temperature [°C]",
        Label::Humidity => "Relative Humidity [%]",
        Label::DailyAvg => "Daily Avg.",
        Label::Rain => "Rain",
        Label::RainAmount => "Rain [mm]",
        Label::RainGauge => "Rain [mm] (Rain Gauge)",
        Label::Wind => "Wind",
        Label::WindAverage => "Average [m/s]",
        Label::WindGusts => "Gusts [m/s]",
        Label::WindDirection => "Direction [°]",
        Label::BatteryVoltage => "Battery Voltage",
        Label::Voltage => "Voltage [mV]",
        Label::Soil => "Soil Temperature and Moisture",
        Label::SoilTemperature => "Soil Temperature [°C]",
        Label::SoilMoisture => "Soil Moisture [%]",
        Label::WaterTemperature => "Water Temperature [°C]",
    }
}

fn german(label: Label) -> &'static str {
    match label {
        Label::WeatherReport => "Wetterbericht",
        Label::AnnualOverview => "Jahresübersicht",
        Label::MonthlyReports => "Monatsberichte",
        Label::AirTemperatureHumidity => "Lufttemperatur und -feuchte",
        Label::Temperature => "Temperatur [°C]",
        Label::Humidity => "rel. Feuchte [%]",
        Label::DailyAvg => "tägl. Durchschnitt",
        Label::Rain => "Regen",
        Label::RainAmount => "Regen [mm]",
        Label::RainGauge => "Regen [mm] (Regenmesser)",
        Label::Wind => "Wind",
        Label::WindAverage => "Durchschnitt [m/s]",
        Label::WindGusts => "Böen [m/s]",
        Label::WindDirection => "Richtung [°]",
        Label::BatteryVoltage => "Batteriespannung",
        Label::Voltage => "Spannung [mV]",
        Label::Soil => "Bodentemperatur und -feuchte",
        Label::SoilTemperature => "Bodentemperatur [°C]",
        Label::SoilMoisture => "Bodenfeuchte [%]",
        Label::WaterTemperature => "Wassertemperatur [°C]",
    }
}
