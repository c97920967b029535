//! Report layout: which pages are produced, in which order, with what data.

use crate::config::{Config, Palette};
use crate::i18n::{Label, Language};
use crate::schema::Channel;
use crate::series::{self, Point, Reading, Series};
use crate::stats;
use anyhow::{Context, Result};
use plotters::style::RGBColor;
use std::collections::BTreeSet;

/// One page of the report, independent of how it is drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    /// Centered full-page text.
    Title { text: String, font_size: u32 },
    /// Vertically stacked plots sharing a time axis.
    Chart { title: String, panels: Vec<Panel> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub y_label: String,
    pub traces: Vec<Trace>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub label: String,
    pub color: RGBColor,
    pub style: TraceStyle,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceStyle {
    Line { width: u32 },
    Bars,
}

impl Page {
    pub fn title(&self) -> &str {
        match self {
            Page::Title { text, .. } => text,
            Page::Chart { title, .. } => title,
        }
    }
}

/// Destination of report pages, in order.
pub trait PageSink {
    fn add_page(&mut self, page: &Page) -> Result<()>;
}

/// What a report run produced.
#[derive(Debug, Default, PartialEq)]
pub struct Summary {
    pub months: Vec<String>,
}

/// Builds the title, overview and monthly sections of a report.
pub struct Reporter {
    lang: Language,
    location: String,
    palette: Palette,
    averaged: BTreeSet<Channel>,
}

impl Reporter {
    pub fn new(cfg: &Config) -> Result<Self> {
        Ok(Self {
            lang: cfg.language,
            location: cfg.location.clone(),
            palette: cfg.palette().context("failed to resolve palette")?,
            averaged: cfg.averaged().context("failed to resolve daily average channels")?,
        })
    }

    /// Report title including the station location.
    pub fn title(&self) -> String {
        let title = format!("{} {}", self.tr(Label::WeatherReport), self.location);
        title.trim_end().to_string()
    }

    /// Emit every page of the report for `series` into `sink`.
    pub fn write<S: PageSink>(&self, series: &Series, sink: &mut S) -> Result<Summary> {
        let mut out = Emitter { sink };
        let mut summary = Summary::default();

        // Title
        out.title(&self.title(), 24)?;
        out.title(self.tr(Label::AnnualOverview), 18)?;

        // Overview
        for page in self.metric_pages(series, series.readings(), None)? {
            out.emit(page)?;
        }

        // Monthly
        out.title(self.tr(Label::MonthlyReports), 18)?;
        for bucket in series.months() {
            let label = bucket.label();
            log::info!("writing {label} ({} readings)", bucket.readings.len());
            out.title(&label, 16)?;
            for page in self.metric_pages(series, bucket.readings, Some(&label))? {
                out.emit(page)?;
            }
            summary.months.push(label);
        }

        Ok(summary)
    }

    /// Pages of every metric group for `readings`, titles suffixed by `period`.
    fn metric_pages(
        &self,
        series: &Series,
        readings: &[Reading],
        period: Option<&str>,
    ) -> Result<Vec<Page>> {
        let view = View { series, readings };
        let title = |label: Label| match period {
            Some(period) => format!("{} {period}", self.tr(label)),
            None => self.tr(label).to_string(),
        };

        let mut pages = vec![Page::Chart {
            title: title(Label::AirTemperatureHumidity),
            panels: vec![
                self.measurement(&view, Channel::Temperature, Label::Temperature)?,
                self.measurement(&view, Channel::Humidity, Label::Humidity)?,
            ],
        }];

        match self.rain_panels(&view)? {
            Some(panels) => pages.push(Page::Chart {
                title: title(Label::Rain),
                panels,
            }),
            None => log::warn!("no rain gauge readings for {:?}, skipping rain chart", title(Label::Rain)),
        }

        pages.push(Page::Chart {
            title: title(Label::Wind),
            panels: self.wind_panels(&view)?,
        });

        pages.push(Page::Chart {
            title: title(Label::BatteryVoltage),
            panels: vec![self.measurement(&view, Channel::BatteryVoltage, Label::Voltage)?],
        });

        let schema = series.schema();
        let mut soil = Vec::new();
        for (ch, label) in [
            (Channel::SoilTemperature, Label::SoilTemperature),
            (Channel::SoilMoisture, Label::SoilMoisture),
        ] {
            if schema.has(ch) {
                soil.push(self.measurement(&view, ch, label)?);
            }
        }
        if !soil.is_empty() {
            pages.push(Page::Chart {
                title: title(Label::Soil),
                panels: soil,
            });
        }

        if schema.has(Channel::WaterTemperature) {
            pages.push(Page::Chart {
                title: title(Label::WaterTemperature),
                panels: vec![self.measurement(&view, Channel::WaterTemperature, Label::WaterTemperature)?],
            });
        }

        Ok(pages)
    }

    /// Raw values of `ch`, with a daily mean overlay if configured.
    fn measurement(&self, view: &View, ch: Channel, label: Label) -> Result<Panel> {
        let points = view.points(ch)?;
        let name = self.tr(label);

        let overlay = self.averaged.contains(&ch).then(|| Trace {
            label: format!("{} {name}", self.tr(Label::DailyAvg)),
            color: self.palette.average(),
            style: TraceStyle::Line { width: 2 },
            points: stats::daily_mean(&points),
        });
        let mut traces = vec![Trace {
            label: name.to_string(),
            color: self.palette.color(ch),
            style: TraceStyle::Line { width: 1 },
            points,
        }];
        traces.extend(overlay);

        Ok(Panel {
            y_label: name.to_string(),
            traces,
        })
    }

    /// Rainfall bars above the cumulative gauge, or `None` if the gauge never
    /// reported.
    fn rain_panels(&self, view: &View) -> Result<Option<Vec<Panel>>> {
        let rain = stats::rainfall(&view.points(Channel::RainGauge)?);
        if rain.gauge.is_empty() {
            return Ok(None);
        }

        let color = self.palette.color(Channel::RainGauge);
        let amount = self.tr(Label::RainAmount);
        let gauge = self.tr(Label::RainGauge);
        Ok(Some(vec![
            Panel {
                y_label: amount.to_string(),
                traces: vec![Trace {
                    label: amount.to_string(),
                    color,
                    style: TraceStyle::Bars,
                    points: rain.increments,
                }],
            },
            Panel {
                y_label: gauge.to_string(),
                traces: vec![Trace {
                    label: gauge.to_string(),
                    color,
                    style: TraceStyle::Line { width: 1 },
                    points: rain.gauge,
                }],
            },
        ]))
    }

    /// Gusts and average speed, then the hourly mean direction.
    fn wind_panels(&self, view: &View) -> Result<Vec<Panel>> {
        let speed = |ch: Channel, label: Label| -> Result<Trace> {
            Ok(Trace {
                label: self.tr(label).to_string(),
                color: self.palette.color(ch),
                style: TraceStyle::Line { width: 2 },
                points: view.points(ch)?,
            })
        };
        let direction = self.tr(Label::WindDirection);

        Ok(vec![
            Panel {
                y_label: self.tr(Label::WindAverage).to_string(),
                traces: vec![
                    speed(Channel::WindGust, Label::WindGusts)?,
                    speed(Channel::WindAvg, Label::WindAverage)?,
                ],
            },
            Panel {
                y_label: direction.to_string(),
                traces: vec![Trace {
                    label: direction.to_string(),
                    color: self.palette.color(Channel::WindDirection),
                    style: TraceStyle::Line { width: 1 },
                    points: stats::hourly_mean(&view.points(Channel::WindDirection)?),
                }],
            },
        ])
    }

    fn tr(&self, label: Label) -> &'static str {
        self.lang.text(label)
    }
}

/// Readings of the whole series or of one month.
struct View<'a> {
    series: &'a Series,
    readings: &'a [Reading],
}

impl View<'_> {
    fn points(&self, ch: Channel) -> Result<Vec<Point>> {
        let slot = self.series.schema().slot(ch)?;
        Ok(series::points(self.readings, slot))
    }
}

struct Emitter<'a, S> {
    sink: &'a mut S,
}

impl<S: PageSink> Emitter<'_, S> {
    fn title(&mut self, text: &str, font_size: u32) -> Result<()> {
        self.emit(Page::Title {
            text: text.to_string(),
            font_size,
        })
    }

    fn emit(&mut self, page: Page) -> Result<()> {
        self.sink
            .add_page(&page)
            .with_context(|| format!("failed to add page {:?}", page.title()))
    }
}
