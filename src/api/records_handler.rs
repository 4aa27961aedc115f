use actix_web::{web, HttpRequest, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::error::{ApiError, ApiResult};
use super::handlers::download;
use super::middleware::auth::{current_identity, require};
use super::state::ApiState;
use crate::core::{Amount, Currency};
use crate::formatting::{amount_to_words, format_currency};
use crate::generators::{export_filename, search_results_table, ReportKind};
use crate::models::{Identity, Permission};
use crate::storage::SearchCriteria;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub tracking_code: Option<String>,
    pub manager: Option<String>,
    pub created_by: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl SearchQuery {
    /// Sin permiso global la búsqueda se limita a lo creado por el usuario.
    fn criteria_for(&self, identity: &Identity) -> SearchCriteria {
        let created_by = if identity.can(Permission::SearchAllRecords) {
            self.created_by.clone()
        } else {
            Some(identity.id.clone())
        };

        SearchCriteria {
            tracking_code: self.tracking_code.clone(),
            manager: self.manager.clone(),
            created_by,
            from: self.from,
            to: self.to,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AmountRequest {
    pub amount: Option<Amount>,
    pub currency: Option<Currency>,
}

pub async fn get_record(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let identity = require(&req, Permission::SearchRecords)?;
    let id = path.into_inner();

    let record = state
        .repository
        .find(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Registro {} no encontrado", id)))?;

    if record.created_by != identity.id && !identity.can(Permission::SearchAllRecords) {
        return Err(ApiError::forbidden("El registro pertenece a otro usuario"));
    }

    Ok(HttpResponse::Ok().json(record))
}

pub async fn search_records(
    req: HttpRequest,
    query: web::Query<SearchQuery>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let identity = require(&req, Permission::SearchRecords)?;
    let records = state.repository.search(&query.criteria_for(&identity)).await?;

    Ok(HttpResponse::Ok().json(json!({
        "total": records.len(),
        "records": records,
    })))
}

/// Resultados de búsqueda como hoja de cálculo plana.
pub async fn export_search(
    req: HttpRequest,
    query: web::Query<SearchQuery>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let identity = require(&req, Permission::ExportReports)?;
    let records = state.repository.search(&query.criteria_for(&identity)).await?;

    let filename = export_filename(
        ReportKind::SearchResults,
        query.tracking_code.as_deref(),
        state.clock.now().date(),
    );
    let file = search_results_table(&records, filename).generate()?;

    state.metrics.exports.with_label_values(&["search"]).inc();
    tracing::info!(filename = %file.filename, rows = records.len(), "Search results exported");

    Ok(download(file))
}

pub async fn amount_in_words(
    req: HttpRequest,
    body: web::Json<AmountRequest>,
) -> ApiResult<HttpResponse> {
    current_identity(&req)?;
    let AmountRequest { amount, currency } = body.into_inner();

    Ok(HttpResponse::Ok().json(json!({
        "words": amount_to_words(amount.as_ref(), currency.as_ref()),
        "formatted": format_currency(amount.as_ref(), currency.as_ref()),
    })))
}
