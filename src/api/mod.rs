pub mod handlers;
pub mod middleware;
pub mod state;
pub mod routes;
pub mod records_handler;
pub mod error;

pub use state::{ApiState, Metrics, WizardSession};
pub use routes::configure_routes;
pub use error::{ApiError, ApiResult};
