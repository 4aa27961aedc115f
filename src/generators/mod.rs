pub mod detailed;
pub mod lines;
pub mod tabular;
pub mod text;

pub use detailed::{detailed_rows, detailed_sheet, DetailedWorkbookGenerator};
pub use lines::{header_lines, item_lines, ReportLine};
pub use tabular::{items_table, search_results_table, CellValue, TabularExport};
pub use text::{text_report, TextReportGenerator};

use chrono::NaiveDate;
use thiserror::Error;

use crate::formatting::file_date;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{0}")]
    Workbook(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    TextReport,
    DetailedWorkbook,
    SearchResults,
}

impl ReportKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            ReportKind::TextReport => "Reporte",
            ReportKind::DetailedWorkbook => "Solicitudes",
            ReportKind::SearchResults => "Busqueda",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportKind::TextReport => "txt",
            ReportKind::DetailedWorkbook | ReportKind::SearchResults => "xlsx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ReportKind::TextReport => "text/plain; charset=utf-8",
            ReportKind::DetailedWorkbook | ReportKind::SearchResults => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

/// Archivo listo para descargar.
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// `{Tipo}_{NE|SIN_NE}_{yyyy-MM-dd}.{ext}`
pub fn export_filename(kind: ReportKind, tracking_code: Option<&str>, date: NaiveDate) -> String {
    let tracking = match tracking_code.map(str::trim) {
        Some(code) if !code.is_empty() => code.replace(['/', '\\'], "-"),
        _ => "SIN_NE".to_string(),
    };
    format!(
        "{}_{}_{}.{}",
        kind.prefix(),
        tracking,
        file_date(date),
        kind.extension()
    )
}
