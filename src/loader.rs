//! Discovery and parsing of exported sensor-log files.

use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord, Trim};
use glob::{Pattern, glob};
use std::path::{Path, PathBuf};

/// One parsed input line: the timestamp and every data column.
///
/// `None` marks a missing value; such rows are dropped by the cleaner.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub time: NaiveDateTime,
    pub cells: Vec<Option<f64>>,
}

/// All rows of one input file, in file order.
#[derive(Debug)]
pub struct Table {
    pub file: PathBuf,
    pub rows: Vec<Row>,
}

pub struct Loader<'a> {
    columns: usize,
    timestamp_format: &'a str,
}

impl<'a> Loader<'a> {
    pub fn new(columns: usize, timestamp_format: &'a str) -> Self {
        Self {
            columns,
            timestamp_format,
        }
    }

    /// Parse every `*.<extension>` file in `dir`.
    ///
    /// # Errors
    /// Fails on the first file that cannot be read or parsed, or if the
    /// directory holds no matching file at all.
    pub fn load_dir<P: AsRef<Path>>(&self, dir: P, extension: &str) -> Result<Vec<Table>> {
        let dir = dir.as_ref();
        let files = find_files(dir, extension).context("failed to find input files")?;
        if files.is_empty() {
            bail!("no *.{extension} files found in {dir:?}");
        }

        let mut tables = Vec::with_capacity(files.len());
        for file in files {
            let table = self
                .read_table(&file)
                .with_context(|| format!("failed to load {file:?}"))?;
            log::info!("loaded {} rows from {:?}", table.rows.len(), table.file);
            tables.push(table);
        }

        Ok(tables)
    }

    pub fn read_table<P: AsRef<Path>>(&self, file: P) -> Result<Table> {
        let file = file.as_ref();
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_path(file)
            .with_context(|| format!("failed to open {file:?}"))?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.context("failed to read record")?;
            let line = record.position().map_or(0, |pos| pos.line());
            let row = self
                .parse_record(&record)
                .with_context(|| format!("invalid record on line {line}"))?;
            rows.push(row);
        }

        Ok(Table {
            file: file.to_path_buf(),
            rows,
        })
    }

    fn parse_record(&self, record: &StringRecord) -> Result<Row> {
        let n_fields = record.len();
        if n_fields < self.columns + 1 {
            bail!(
                "expected a timestamp and {} data columns, but found {n_fields} fields; \
                 does the station column map match the input?",
                self.columns
            );
        }

        let stamp = &record[0];
        let time = NaiveDateTime::parse_from_str(stamp, self.timestamp_format)
            .with_context(|| format!("failed to parse timestamp {stamp:?}"))?;

        let cells = (1..=self.columns)
            .map(|i| parse_cell(&record[i]).with_context(|| format!("invalid value in column {i}")))
            .collect::<Result<Vec<_>>>()?;

        Ok(Row { time, cells })
    }
}

fn parse_cell(field: &str) -> Result<Option<f64>> {
    if field.is_empty() || field.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    let val: f64 = field
        .parse()
        .with_context(|| format!("{field:?} is not a number"))?;
    Ok(Some(val))
}

fn find_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let dir_str = dir.to_str().context("input directory is not valid UTF-8")?;
    let pattern = Path::new(&Pattern::escape(dir_str)).join(format!("*.{extension}"));
    let pattern = pattern.to_str().context("pattern is not valid UTF-8")?;
    let mut files: Vec<PathBuf> = glob(pattern)
        .context("failed to glob input files")?
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    Ok(files)
}
