use super::layout::{CellStyle, SheetLayout};

/// Arma una hoja fila por fila, con un cursor como en una hoja manual.
pub struct SheetBuilder {
    layout: SheetLayout,
    current_row: u32,
}

impl SheetBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        SheetBuilder {
            layout: SheetLayout::new(name),
            current_row: 0,
        }
    }

    /// Encabezados sombreados seguidos de las filas, con autofiltro.
    pub fn add_table(&mut self, headers: &[String], rows: &[Vec<String>]) -> &mut Self {
        let header_row = self.current_row;
        let header_style = CellStyle::plain().bold().shaded();

        for (col, header) in headers.iter().enumerate() {
            self.layout
                .set_cell(header_row, col as u16, header.clone(), header_style.clone());
        }
        self.current_row += 1;

        for row in rows {
            for (col, value) in row.iter().enumerate() {
                self.layout
                    .set_cell(self.current_row, col as u16, value.clone(), CellStyle::plain());
            }
            self.current_row += 1;
        }

        if !headers.is_empty() {
            self.layout.autofilter = Some((
                header_row,
                0,
                self.current_row - 1,
                headers.len() as u16 - 1,
            ));
        }
        self
    }

    pub fn set_column_widths(&mut self, widths: Vec<(u16, f64)>) -> &mut Self {
        for (col, width) in widths {
            self.layout.set_column_width(col, width);
        }
        self
    }

    pub fn freeze_top_row(&mut self) -> &mut Self {
        self.layout.freeze_rows = Some(1);
        self
    }

    pub fn finish(self) -> SheetLayout {
        self.layout
    }
}
