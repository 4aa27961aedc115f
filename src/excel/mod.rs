pub mod builder;
pub mod generator;
pub mod layout;

pub use builder::SheetBuilder;
pub use generator::ExcelGenerator;
pub use layout::{Cell, CellStyle, Orientation, PageSetup, PaperSize, SheetLayout};
