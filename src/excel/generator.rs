use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use super::layout::{CellStyle, Orientation, SheetLayout};
use crate::generators::ExportError;

/// Traduce hojas declarativas a un libro XLSX en memoria.
pub struct ExcelGenerator {
    workbook: Workbook,
    sheet_count: usize,
}

impl ExcelGenerator {
    pub fn new() -> Self {
        ExcelGenerator {
            workbook: Workbook::new(),
            sheet_count: 0,
        }
    }

    pub fn add_sheet(&mut self, layout: &SheetLayout) -> Result<(), ExportError> {
        let mut worksheet = Worksheet::new();
        worksheet.set_name(&layout.name).map_err(xlsx_error)?;

        for (col, width) in layout.column_widths() {
            worksheet.set_column_width(col, width).map_err(xlsx_error)?;
        }

        for ((row, col), cell) in layout.cells() {
            let format = create_format(&cell.style);
            match cell.style.merge_to {
                Some(last_col) if last_col > col => {
                    worksheet
                        .merge_range(row, col, row, last_col, &cell.value, &format)
                        .map_err(xlsx_error)?;
                }
                _ => {
                    worksheet
                        .write_string_with_format(row, col, &cell.value, &format)
                        .map_err(xlsx_error)?;
                }
            }
        }

        if let Some(rows) = layout.freeze_rows {
            worksheet.set_freeze_panes(rows, 0).map_err(xlsx_error)?;
        }

        if let Some((first_row, first_col, last_row, last_col)) = layout.autofilter {
            worksheet
                .autofilter(first_row, first_col, last_row, last_col)
                .map_err(xlsx_error)?;
        }

        if let Some(setup) = &layout.page_setup {
            worksheet.set_paper_size(setup.paper.code());
            match setup.orientation {
                Orientation::Portrait => worksheet.set_portrait(),
                Orientation::Landscape => worksheet.set_landscape(),
            };
            if let Some((width, height)) = setup.fit_to_pages {
                worksheet.set_print_fit_to_pages(width, height);
            }
            if let Some(max_rows) = setup.print_rows {
                let last_row = layout.row_count().min(max_rows);
                let last_col = layout.column_count();
                if last_row > 0 && last_col > 0 {
                    worksheet
                        .set_print_area(0, 0, last_row - 1, last_col - 1)
                        .map_err(xlsx_error)?;
                }
            }
        }

        self.workbook.push_worksheet(worksheet);
        self.sheet_count += 1;
        Ok(())
    }

    pub fn sheet_count(&self) -> usize {
        self.sheet_count
    }

    pub fn save_to_buffer(mut self) -> Result<Vec<u8>, ExportError> {
        // Un libro sin hojas no abre en Excel.
        if self.sheet_count == 0 {
            self.workbook.add_worksheet();
        }

        self.workbook.save_to_buffer().map_err(|e| {
            ExportError::Workbook(format!("Error guardando el archivo Excel: {}", e))
        })
    }
}

impl Default for ExcelGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn create_format(style: &CellStyle) -> Format {
    let mut format = Format::new();
    if style.bold {
        format = format.set_bold();
    }
    if style.wrap {
        format = format.set_text_wrap();
    }
    if style.top {
        format = format.set_align(FormatAlign::Top);
    }
    if style.center {
        format = format.set_align(FormatAlign::Center);
    }
    if style.shaded {
        format = format
            .set_background_color(Color::RGB(0xE0E0E0))
            .set_border(FormatBorder::Thin);
    }
    format
}

fn xlsx_error(error: rust_xlsxwriter::XlsxError) -> ExportError {
    ExportError::Workbook(error.to_string())
}
