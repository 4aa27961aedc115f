use chrono::NaiveDate;

use super::lines::{header_lines, item_lines, ReportLine};
use super::{export_filename, ExportError, ExportFile, ReportKind};
use crate::excel::{CellStyle, ExcelGenerator, Orientation, PageSetup, PaperSize, SheetLayout};
use crate::models::{HeaderContext, LineItem, NOT_AVAILABLE};

const TITLE: &str = "SOLICITUD DE CHEQUE / TRANSFERENCIA";
const COLUMN_WIDTH: f64 = 40.0;
const PRINT_ROWS: u32 = 50;

/// Filas `[etiqueta, valor]` de la hoja de una solicitud, en orden.
///
/// Los títulos de sección van en mayúsculas y terminan en `:`; los valores
/// largos van solos en la fila siguiente a su etiqueta.
pub fn detailed_rows(header: Option<&HeaderContext>, item: &LineItem) -> Vec<[String; 2]> {
    let mut rows = vec![[TITLE.to_string(), String::new()]];

    rows.push(["DATOS GENERALES:".to_string(), String::new()]);
    for line in header_lines(header) {
        push_line(&mut rows, &line);
    }

    for line in item_lines(item) {
        if matches!(line, ReportLine::Section(_)) {
            rows.push([String::new(), String::new()]);
        }
        push_line(&mut rows, &line);
    }
    rows
}

fn push_line(rows: &mut Vec<[String; 2]>, line: &ReportLine) {
    match line {
        ReportLine::Section(title) => rows.push([format!("{}:", title), String::new()]),
        ReportLine::Field { label, value } => rows.push([format!("{}:", label), value.clone()]),
        ReportLine::Long { label, value } => {
            rows.push([format!("{}:", label), String::new()]);
            rows.push([value.clone(), String::new()]);
        }
    }
}

fn is_section(text: &str) -> bool {
    text.ends_with(':')
        && text.chars().any(char::is_alphabetic)
        && text == text.to_uppercase()
}

fn has_value(text: &str) -> bool {
    !text.trim().is_empty() && text.trim() != NOT_AVAILABLE
}

/// Aplica las reglas de estilo a la lista de filas: título combinado y
/// centrado, secciones combinadas en negrita, etiquetas con `:` en negrita y
/// valores en negrita cuando tienen contenido.
pub fn detailed_sheet(name: &str, rows: &[[String; 2]]) -> SheetLayout {
    let mut layout = SheetLayout::new(name);
    let base = CellStyle::plain().wrap().top();
    let mut value_on_this_row = false;

    for (index, [label, value]) in rows.iter().enumerate() {
        let row = index as u32;

        if index == 0 {
            layout.set_cell(row, 0, label.clone(), base.clone().bold().center().merge_to(1));
            continue;
        }

        if value_on_this_row {
            value_on_this_row = false;
            let style = if has_value(label) { base.clone().bold() } else { base.clone() };
            layout.set_cell(row, 0, label.clone(), style);
            layout.set_cell(row, 1, value.clone(), base.clone());
            continue;
        }

        if value.is_empty() && is_section(label) {
            layout.set_cell(row, 0, label.clone(), base.clone().bold().merge_to(1));
            continue;
        }

        let is_label = label.ends_with(':');
        let label_style = if is_label { base.clone().bold() } else { base.clone() };
        layout.set_cell(row, 0, label.clone(), label_style);

        let value_style = if has_value(value) { base.clone().bold() } else { base.clone() };
        layout.set_cell(row, 1, value.clone(), value_style);

        if is_label && value.is_empty() {
            value_on_this_row = true;
        }
    }

    layout.set_column_width(0, COLUMN_WIDTH);
    layout.set_column_width(1, COLUMN_WIDTH);
    layout.page_setup = Some(PageSetup {
        paper: PaperSize::Letter,
        orientation: Orientation::Portrait,
        fit_to_pages: Some((1, 1)),
        print_rows: Some(PRINT_ROWS),
    });
    layout
}

/// Libro con una hoja por solicitud, `Solicitud 1`, `Solicitud 2`, ...
pub struct DetailedWorkbookGenerator;

impl DetailedWorkbookGenerator {
    pub fn layouts(header: Option<&HeaderContext>, items: &[LineItem]) -> Vec<SheetLayout> {
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let rows = detailed_rows(header, item);
                detailed_sheet(&format!("Solicitud {}", index + 1), &rows)
            })
            .collect()
    }

    pub fn generate(
        header: Option<&HeaderContext>,
        items: &[LineItem],
        today: NaiveDate,
    ) -> Result<ExportFile, ExportError> {
        let mut generator = ExcelGenerator::new();
        for layout in Self::layouts(header, items) {
            generator.add_sheet(&layout)?;
        }

        let tracking_code = header.map(|h| h.tracking_code.as_str());
        let date = header.map(|h| h.date).unwrap_or(today);

        Ok(ExportFile {
            filename: export_filename(ReportKind::DetailedWorkbook, tracking_code, date),
            content_type: ReportKind::DetailedWorkbook.content_type(),
            bytes: generator.save_to_buffer()?,
        })
    }
}
