use std::collections::BTreeMap;

/// Estilo declarativo de una celda.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellStyle {
    pub bold: bool,
    pub wrap: bool,
    pub top: bool,
    pub center: bool,
    pub shaded: bool,
    /// Última columna de una combinación horizontal que empieza en esta celda.
    pub merge_to: Option<u16>,
}

impl CellStyle {
    pub fn plain() -> Self {
        CellStyle::default()
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn wrap(mut self) -> Self {
        self.wrap = true;
        self
    }

    pub fn top(mut self) -> Self {
        self.top = true;
        self
    }

    pub fn center(mut self) -> Self {
        self.center = true;
        self
    }

    pub fn shaded(mut self) -> Self {
        self.shaded = true;
        self
    }

    pub fn merge_to(mut self, last_col: u16) -> Self {
        self.merge_to = Some(last_col);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub value: String,
    pub style: CellStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperSize {
    Letter,
    Legal,
    A4,
}

impl PaperSize {
    /// Código de tamaño de papel de Excel.
    pub fn code(&self) -> u8 {
        match self {
            PaperSize::Letter => 1,
            PaperSize::Legal => 5,
            PaperSize::A4 => 9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSetup {
    pub paper: PaperSize,
    pub orientation: Orientation,
    /// Páginas de ancho y alto a las que se ajusta la impresión.
    pub fit_to_pages: Option<(u16, u16)>,
    /// Filas incluidas en el área de impresión, contando desde la primera.
    pub print_rows: Option<u32>,
}

impl Default for PageSetup {
    fn default() -> Self {
        PageSetup {
            paper: PaperSize::Letter,
            orientation: Orientation::Portrait,
            fit_to_pages: None,
            print_rows: None,
        }
    }
}

/// Hoja descrita como datos. El generador la traduce a rust_xlsxwriter.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub name: String,
    cells: BTreeMap<(u32, u16), Cell>,
    column_widths: BTreeMap<u16, f64>,
    pub page_setup: Option<PageSetup>,
    pub freeze_rows: Option<u32>,
    pub autofilter: Option<(u32, u16, u32, u16)>,
}

impl SheetLayout {
    pub fn new(name: impl Into<String>) -> Self {
        SheetLayout {
            name: name.into(),
            cells: BTreeMap::new(),
            column_widths: BTreeMap::new(),
            page_setup: None,
            freeze_rows: None,
            autofilter: None,
        }
    }

    pub fn set_cell(&mut self, row: u32, col: u16, value: impl Into<String>, style: CellStyle) {
        self.cells.insert(
            (row, col),
            Cell {
                value: value.into(),
                style,
            },
        );
    }

    pub fn cell(&self, row: u32, col: u16) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    pub fn cells(&self) -> impl Iterator<Item = ((u32, u16), &Cell)> {
        self.cells.iter().map(|(pos, cell)| (*pos, cell))
    }

    pub fn set_column_width(&mut self, col: u16, width: f64) {
        self.column_widths.insert(col, width);
    }

    pub fn column_width(&self, col: u16) -> Option<f64> {
        self.column_widths.get(&col).copied()
    }

    pub fn column_widths(&self) -> impl Iterator<Item = (u16, f64)> + '_ {
        self.column_widths.iter().map(|(col, width)| (*col, *width))
    }

    pub fn row_count(&self) -> u32 {
        self.cells.keys().map(|(row, _)| row + 1).max().unwrap_or(0)
    }

    pub fn column_count(&self) -> u16 {
        self.cells
            .iter()
            .map(|((_, col), cell)| cell.style.merge_to.unwrap_or(*col).max(*col) + 1)
            .max()
            .unwrap_or(0)
    }
}
