use chrono::{Local, NaiveDateTime};

use super::{ExportError, ExportFile, ReportKind};
use crate::excel::{ExcelGenerator, SheetBuilder, SheetLayout};
use crate::formatting::{datetime_cell, format_currency, or_na, yes_no};
use crate::models::{HeaderContext, LineItem, StoredRecord, NOT_AVAILABLE};

const MIN_COLUMN_WIDTH: usize = 10;
const MAX_COLUMN_WIDTH: usize = 50;
const SHEET_NAME: &str = "Resultados";

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    DateTime(NaiveDateTime),
    Bool(bool),
    Missing,
}

impl CellValue {
    pub fn text(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(text) if !text.is_empty() => CellValue::Text(text.to_string()),
            _ => CellValue::Missing,
        }
    }

    pub fn render(&self) -> String {
        match self {
            CellValue::Text(text) if text.trim().is_empty() => NOT_AVAILABLE.to_string(),
            CellValue::Text(text) => text.clone(),
            CellValue::DateTime(value) => datetime_cell(*value),
            CellValue::Bool(value) => yes_no(*value).to_string(),
            CellValue::Missing => NOT_AVAILABLE.to_string(),
        }
    }
}

/// Hoja única de resultados: encabezados fijos y filas ya proyectadas.
#[derive(Debug, Clone)]
pub struct TabularExport {
    pub filename: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl TabularExport {
    pub fn new(filename: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        TabularExport {
            filename: filename.into(),
            headers,
            rows,
        }
    }

    /// Filas como texto, completadas con `"N/A"` hasta el ancho de encabezados.
    pub fn rendered_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                (0..self.headers.len())
                    .map(|col| {
                        row.get(col)
                            .map(CellValue::render)
                            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
                    })
                    .collect()
            })
            .collect()
    }

    /// Ancho de cada columna según su contenido más largo, entre 10 y 50.
    pub fn column_widths(&self, rendered: &[Vec<String>]) -> Vec<(u16, f64)> {
        self.headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                let longest = rendered
                    .iter()
                    .filter_map(|row| row.get(col))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0);
                let width = longest.clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH);
                (col as u16, width as f64)
            })
            .collect()
    }

    pub fn layout(&self) -> SheetLayout {
        let rendered = self.rendered_rows();
        let widths = self.column_widths(&rendered);

        let mut builder = SheetBuilder::new(SHEET_NAME);
        builder
            .add_table(&self.headers, &rendered)
            .set_column_widths(widths)
            .freeze_top_row();
        builder.finish()
    }

    pub fn generate(&self) -> Result<ExportFile, ExportError> {
        let mut generator = ExcelGenerator::new();
        generator.add_sheet(&self.layout())?;

        Ok(ExportFile {
            filename: self.filename.clone(),
            content_type: ReportKind::SearchResults.content_type(),
            bytes: generator.save_to_buffer()?,
        })
    }
}

fn record_headers() -> Vec<String> {
    [
        "ID",
        "Número NE",
        "Referencia",
        "Gestor",
        "Destinatario",
        "Fecha",
        "Monto",
        "Moneda",
        "Monto en letras",
        "Consignatario",
        "No. de Declaración",
        "Banco",
        "No. de Cuenta",
        "Beneficiario (Cheque)",
        "Beneficiario (Transferencia)",
        "Pago de Impuestos",
        "Constancia de No Retención",
        "Creado por",
        "Fecha de creación",
    ]
    .iter()
    .map(|header| header.to_string())
    .collect()
}

fn record_row(
    header: &HeaderContext,
    item: &LineItem,
    created_by: Option<&str>,
    created_at: Option<NaiveDateTime>,
) -> Vec<CellValue> {
    let data = &item.data;
    let account_number = if data.suppresses_account() {
        CellValue::Missing
    } else {
        CellValue::text(data.account_number.as_deref())
    };

    vec![
        CellValue::Text(item.id.clone()),
        CellValue::text(Some(&header.tracking_code)),
        CellValue::text(header.reference.as_deref()),
        CellValue::text(Some(&header.manager)),
        CellValue::text(header.recipient.as_deref()),
        CellValue::Text(header.date.format("%Y-%m-%d").to_string()),
        CellValue::Text(format_currency(data.amount.as_ref(), data.currency.as_ref())),
        CellValue::text(data.currency.as_ref().map(|c| c.label())),
        CellValue::text(data.amount_in_words.as_deref()),
        CellValue::text(data.consignee.as_deref()),
        CellValue::text(data.declaration_number.as_deref()),
        CellValue::Text(
            data.bank
                .as_ref()
                .map(|bank| bank.display())
                .unwrap_or_else(|| or_na(None)),
        ),
        account_number,
        CellValue::text(data.check_payee.as_deref()),
        CellValue::text(data.transfer_payee.as_deref()),
        CellValue::Bool(data.tax_payment),
        CellValue::Bool(data.no_withholding),
        CellValue::text(created_by),
        created_at.map(CellValue::DateTime).unwrap_or(CellValue::Missing),
    ]
}

/// Proyección estándar de los registros guardados para la pantalla de búsqueda.
pub fn search_results_table(records: &[StoredRecord], filename: impl Into<String>) -> TabularExport {
    let rows = records
        .iter()
        .map(|record| {
            let created_at = record
                .created_at
                .to_datetime()
                .map(|dt| dt.with_timezone(&Local).naive_local());
            record_row(
                &record.header,
                &record.line_item(),
                Some(&record.created_by_email),
                created_at,
            )
        })
        .collect();

    TabularExport::new(filename, record_headers(), rows)
}

/// Misma proyección para una sesión del asistente aún sin guardar.
pub fn items_table(
    header: &HeaderContext,
    items: &[LineItem],
    filename: impl Into<String>,
) -> TabularExport {
    let rows = items
        .iter()
        .map(|item| record_row(header, item, None, None))
        .collect();

    TabularExport::new(filename, record_headers(), rows)
}
