use crate::config::Config;
use crate::document::Document;
use crate::loader::Loader;
use crate::report::Reporter;
use crate::schema::Schema;
use crate::series::Series;
use anyhow::{Context, Result, bail};

pub struct Manager {
    cfg: Config,
    schema: Schema,
}

impl Manager {
    pub fn new(cfg: Config) -> Result<Self> {
        cfg.validate().context("failed to validate cfg")?;
        let schema = cfg.schema().context("failed to resolve schema")?;
        log::info!("{schema:#?}");

        Ok(Self { cfg, schema })
    }

    /// Load, merge and clean every input file.
    pub fn load_series(&self) -> Result<Series> {
        let loader = Loader::new(self.schema.columns(), &self.cfg.timestamp_format);
        let tables = loader
            .load_dir(&self.cfg.input_dir, &self.cfg.extension)
            .context("failed to load input files")?;

        let series =
            Series::merge(self.schema.clone(), tables).context("failed to merge input files")?;
        if series.is_empty() {
            bail!("no valid readings in {:?}", self.cfg.input_dir);
        }

        Ok(series)
    }

    pub fn render_report(&self) -> Result<()> {
        let series = self.load_series()?;
        let reporter = Reporter::new(&self.cfg).context("failed to construct reporter")?;

        let output_file = &self.cfg.output_file;
        let mut document = Document::create(output_file, &reporter.title())
            .context("failed to create document")?;
        log::info!("created {output_file:?}");

        let summary = reporter
            .write(&series, &mut document)
            .context("failed to write report")?;

        let n_pages = document.finish().context("failed to finish document")?;
        log::info!(
            "wrote {n_pages} pages covering {} months to {output_file:?}",
            summary.months.len()
        );

        Ok(())
    }

    pub fn summarize(&self) -> Result<()> {
        let series = self.load_series()?;

        let readings = series.readings();
        if let (Some(first), Some(last)) = (readings.first(), readings.last()) {
            log::info!(
                "{} readings from {} to {}",
                series.len(),
                first.time,
                last.time
            );
        }

        for bucket in series.months() {
            let readings = bucket.readings;
            if let (Some(first), Some(last)) = (readings.first(), readings.last()) {
                log::info!(
                    "{}: {} readings from {} to {}",
                    bucket.label(),
                    readings.len(),
                    first.time,
                    last.time
                );
            }
        }

        Ok(())
    }
}
