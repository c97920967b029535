//! The paginated output document: one HTML file, one inline SVG per page.

use crate::chart::{self, PAGE_SIZE};
use crate::report::{Page, PageSink};
use anyhow::{Context, Result};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

const EPILOGUE: &str = "</body>\n</html>\n";

/// Open output document.
///
/// The header is written on creation and the footer on [`Document::finish`].
/// If the document is dropped before that (e.g. on an error path), the footer
/// is still written so the file stays well-formed.
pub struct Document {
    file: PathBuf,
    writer: Option<BufWriter<File>>,
    n_pages: usize,
}

impl Document {
    pub fn create<P: AsRef<Path>>(file: P, title: &str) -> Result<Self> {
        let file = file.as_ref();
        let handle = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
        let mut writer = BufWriter::new(handle);

        let (width, height) = PAGE_SIZE;
        write!(
            writer,
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n\
             <style>\n\
             @page {{ size: {width}px {height}px; margin: 0; }}\n\
             section.page {{ width: {width}px; height: {height}px; page-break-after: always; }}\n\
             </style>\n</head>\n<body>\n",
            escape(title)
        )
        .context("failed to write document header")?;

        Ok(Self {
            file: file.to_path_buf(),
            writer: Some(writer),
            n_pages: 0,
        })
    }

    /// Write the footer and flush. Returns the number of pages written.
    pub fn finish(mut self) -> Result<usize> {
        self.close()?;
        Ok(self.n_pages)
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer
                .write_all(EPILOGUE.as_bytes())
                .context("failed to write document footer")?;
            writer.flush().context("failed to flush writer stream")?;
        }
        Ok(())
    }
}

impl PageSink for Document {
    fn add_page(&mut self, page: &Page) -> Result<()> {
        let svg = chart::render_svg(page).context("failed to render page")?;
        let writer = self.writer.as_mut().context("document is already finished")?;
        writeln!(
            writer,
            "<section class=\"page\" data-title=\"{}\">\n{svg}\n</section>",
            escape(page.title())
        )
        .context("failed to write page")?;
        self.n_pages += 1;
        Ok(())
    }
}

impl Drop for Document {
    fn drop(&mut self) {
        if self.writer.is_none() {
            return;
        }
        log::warn!(
            "closing incomplete document {:?} after {} pages",
            self.file,
            self.n_pages
        );
        if let Err(error) = self.close() {
            log::error!("{error:#}");
        }
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
