pub mod api;
pub mod core;
pub mod excel;
pub mod formatting;
pub mod generators;
pub mod models;
pub mod storage;
pub mod wizard;

// Re-export commonly used types
pub use crate::core::{Amount, AppConfig, AppError, AppResult, Currency};
pub use crate::formatting::{amount_to_words, format_currency};
pub use crate::generators::{DetailedWorkbookGenerator, ExportFile, TabularExport, TextReportGenerator};
pub use crate::models::{HeaderContext, Identity, LineItem, LineItemData, StoredRecord};
pub use crate::storage::{RecordRepository, RecordStore};
pub use crate::wizard::{WizardStateMachine, WizardStep};
