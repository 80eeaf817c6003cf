//! Spreadsheet export of committed segments
//!
//! Every commit rewrites the whole workbook: one `results` sheet with a
//! `segment_name | url | label` header and one row per segment. There is no
//! append mode.

use labeler_common::Segment;
use rust_xlsxwriter::{Workbook, XlsxError};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SHEET_NAME: &str = "results";

/// Header cells and column widths, in column order
const COLUMNS: [(&str, f64); 3] = [("segment_name", 40.0), ("url", 80.0), ("label", 15.0)];

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export task failed: {0}")]
    Join(String),
}

/// Writes segments to an `.xlsx` file at a fixed path
#[derive(Debug, Clone)]
pub struct XlsxExporter {
    path: PathBuf,
}

impl XlsxExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the workbook, replacing any existing file
    ///
    /// Blocking; use [`XlsxExporter::export`] from async code.
    pub fn write(&self, segments: &[Segment]) -> Result<(), ExportError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        for (col, (header, width)) in COLUMNS.iter().enumerate() {
            let col = col as u16;
            worksheet.write_string(0, col, *header)?;
            worksheet.set_column_width(col, *width)?;
        }

        for (index, segment) in segments.iter().enumerate() {
            let row = index as u32 + 1;
            worksheet.write_string(row, 0, segment.segment_name.as_str())?;
            worksheet.write_string(row, 1, segment.url.as_str())?;
            worksheet.write_string(row, 2, segment.label.as_str())?;
        }

        workbook.save(&self.path)?;
        Ok(())
    }

    /// Write the workbook on the blocking thread pool
    pub async fn export(&self, segments: Vec<Segment>) -> Result<(), ExportError> {
        let exporter = self.clone();
        tokio::task::spawn_blocking(move || exporter.write(&segments))
            .await
            .map_err(|e| ExportError::Join(e.to_string()))?
    }
}
