use actix_web::{dev::ServiceRequest, web, Error, HttpMessage, HttpRequest};
use actix_web_httpauth::extractors::bearer::{BearerAuth, Config};
use actix_web_httpauth::extractors::AuthenticationError;
use actix_web_httpauth::middleware::HttpAuthentication;
use std::future::{ready, Ready};

use crate::api::error::ApiError;
use crate::api::state::ApiState;
use crate::models::{Identity, Permission};

pub fn create_auth_middleware() -> HttpAuthentication<BearerAuth, fn(ServiceRequest, BearerAuth) -> Ready<Result<ServiceRequest, (Error, ServiceRequest)>>> {
    HttpAuthentication::bearer(validator)
}

/// Busca el token entre los configurados en `API_TOKENS` y deja la identidad
/// en las extensiones de la petición.
fn validator(
    req: ServiceRequest,
    credentials: BearerAuth,
) -> Ready<Result<ServiceRequest, (Error, ServiceRequest)>> {
    let token = credentials.token();

    let identity = req.app_data::<web::Data<ApiState>>().and_then(|state| {
        state
            .config
            .api_tokens
            .iter()
            .find(|grant| !token.is_empty() && grant.token == token)
            .map(|grant| grant.identity.clone())
    });

    match identity {
        Some(identity) => {
            tracing::debug!(user_id = %identity.id, "Request authenticated");
            req.extensions_mut().insert(identity);
            ready(Ok(req))
        }
        None => {
            tracing::warn!(path = %req.path(), "Rejected bearer token");
            let config = Config::default();
            ready(Err((AuthenticationError::from(config).into(), req)))
        }
    }
}

pub fn current_identity(req: &HttpRequest) -> Result<Identity, ApiError> {
    req.extensions()
        .get::<Identity>()
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("Sesión no autenticada"))
}

/// Identidad actual, exigiendo además un permiso.
pub fn require(req: &HttpRequest, permission: Permission) -> Result<Identity, ApiError> {
    let identity = current_identity(req)?;
    if identity.can(permission) {
        Ok(identity)
    } else {
        tracing::warn!(user_id = %identity.id, ?permission, "Permission denied");
        Err(ApiError::forbidden("El rol del usuario no permite esta acción"))
    }
}
