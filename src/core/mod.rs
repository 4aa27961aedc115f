pub mod config;
pub mod error;
pub mod money;

pub use config::*;
pub use error::*;
pub use money::*;
