pub mod common;
pub mod header;
pub mod identity;
pub mod item;
pub mod record;

pub use common::*;
pub use header::*;
pub use identity::*;
pub use item::*;
pub use record::*;
