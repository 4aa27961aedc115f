use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::fmt;

use crate::core::AppError;
use crate::wizard::WizardError;

#[derive(Debug)]
pub struct ApiError {
    message: String,
    status_code: StatusCode,
    field: Option<String>,
}

impl ApiError {
    pub fn new(message: impl Into<String>, status_code: StatusCode) -> Self {
        ApiError {
            message: message.into(),
            status_code,
            field: None,
        }
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(message, StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(message, StatusCode::BAD_REQUEST)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(message, StatusCode::NOT_FOUND)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(message, StatusCode::FORBIDDEN)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(message, StatusCode::UNAUTHORIZED)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        let mut body = serde_json::json!({
            "error": self.message,
            "status": self.status_code.as_u16()
        });
        if let Some(field) = &self.field {
            body["field"] = serde_json::Value::String(field.clone());
        }
        HttpResponse::build(self.status_code).json(body)
    }

    fn status_code(&self) -> StatusCode {
        self.status_code
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let status_code = match &err {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Wizard(WizardError::MissingTrackingCode) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Wizard(WizardError::TrackingCodeLocked) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Config(_) => StatusCode::BAD_REQUEST,
            AppError::Storage(_) | AppError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status_code.is_server_error() {
            tracing::error!("Request failed: {}", err);
        }

        let field = match &err {
            AppError::Validation(validation) => Some(validation.field.clone()),
            _ => None,
        };

        ApiError {
            message: err.to_string(),
            status_code,
            field,
        }
    }
}

impl From<crate::core::ValidationError> for ApiError {
    fn from(err: crate::core::ValidationError) -> Self {
        AppError::from(err).into()
    }
}

impl From<WizardError> for ApiError {
    fn from(err: WizardError) -> Self {
        AppError::from(err).into()
    }
}

impl From<crate::storage::StorageError> for ApiError {
    fn from(err: crate::storage::StorageError) -> Self {
        AppError::from(err).into()
    }
}

impl From<crate::generators::ExportError> for ApiError {
    fn from(err: crate::generators::ExportError) -> Self {
        AppError::from(err).into()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ValidationError;

    #[test]
    fn maps_domain_errors_to_status_codes() {
        let validation: ApiError = ValidationError::new("manager", "requerido").into();
        assert_eq!(validation.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(validation.field.as_deref(), Some("manager"));

        let locked: ApiError = WizardError::TrackingCodeLocked.into();
        assert_eq!(locked.status_code(), StatusCode::CONFLICT);

        let missing: ApiError = AppError::NotFound("x".to_string()).into();
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
    }
}
