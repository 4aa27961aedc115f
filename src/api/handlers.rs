use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::error::{ApiError, ApiResult};
use super::middleware::auth::require;
use super::state::{ApiState, WizardSession};
use crate::generators::{DetailedWorkbookGenerator, ExportFile, TextReportGenerator};
use crate::models::{HeaderPatch, Identity, LineItem, LineItemData, Permission};
use crate::wizard::{check_transition, WizardStateMachine, WizardStep};

#[derive(Debug, Deserialize)]
pub struct StepRequest {
    pub step: WizardStep,
}

/// Ejecuta `f` sobre la sesión, reiniciándola antes si la identidad cambió.
///
/// Quien no puede editar el asistente no adopta sesiones ajenas: recibe 403
/// y la sesión queda intacta.
async fn with_session<R>(
    state: &ApiState,
    session_id: &str,
    identity: &Identity,
    f: impl FnOnce(&mut WizardStateMachine) -> R,
) -> ApiResult<R> {
    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(session_id)
        .ok_or_else(|| ApiError::not_found(format!("Sesión {} no encontrada", session_id)))?;

    let foreign = session
        .machine
        .owner()
        .map(|owner| owner.id != identity.id)
        .unwrap_or(true);
    if foreign && !identity.can(Permission::EditWizard) {
        tracing::warn!(session_id, user_id = %identity.id, "Read-only access to a foreign session");
        return Err(ApiError::forbidden("La sesión pertenece a otro usuario"));
    }

    session.touch(state.clock.now());
    if session.machine.on_owner_changed(Some(identity.clone())) {
        state.metrics.wizard_resets.inc();
    }
    Ok(f(&mut session.machine))
}

pub fn download(file: ExportFile) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(file.content_type)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file.filename)],
        })
        .body(file.bytes)
}

/// Abre una sesión nueva del asistente para el usuario actual.
pub async fn create_session(
    req: HttpRequest,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let identity = require(&req, Permission::EditWizard)?;
    state.evict_idle_sessions().await;

    let session_id = Uuid::new_v4().to_string();
    let machine = WizardStateMachine::new(Some(identity.clone()), state.clock.clone());
    let snapshot = machine.snapshot();

    {
        let mut sessions = state.sessions.write().await;
        sessions.insert(session_id.clone(), WizardSession::new(machine, state.clock.now()));
        state.metrics.open_sessions.set(sessions.len() as i64);
    }

    tracing::info!(session_id = %session_id, user_id = %identity.id, "Wizard session created");

    Ok(HttpResponse::Created().json(json!({
        "session_id": session_id,
        "state": snapshot,
    })))
}

/// Cierra la sesión y libera su estado.
pub async fn close_session(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let identity = require(&req, Permission::EditWizard)?;
    let session_id = path.into_inner();

    let mut sessions = state.sessions.write().await;
    if sessions.remove(&session_id).is_none() {
        return Err(ApiError::not_found(format!("Sesión {} no encontrada", session_id)));
    }
    state.metrics.open_sessions.set(sessions.len() as i64);

    tracing::info!(session_id = %session_id, user_id = %identity.id, "Wizard session closed");
    Ok(HttpResponse::NoContent().finish())
}

pub async fn get_session(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let identity = require(&req, Permission::EditWizard)?;
    let snapshot = with_session(&state, &path, &identity, |machine| machine.snapshot()).await?;
    Ok(HttpResponse::Ok().json(snapshot))
}

pub async fn update_header(
    req: HttpRequest,
    path: web::Path<String>,
    patch: web::Json<HeaderPatch>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let identity = require(&req, Permission::EditWizard)?;
    let patch = patch.into_inner();

    let header = with_session(&state, &path, &identity, |machine| {
        if machine.step() != WizardStep::InitialData {
            return Err(ApiError::new(
                format!("Los datos iniciales solo se editan en {}", WizardStep::InitialData),
                StatusCode::CONFLICT,
            ));
        }
        Ok(machine.set_header(patch)?.clone())
    })
    .await??;

    Ok(HttpResponse::Ok().json(header))
}

pub async fn change_step(
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<StepRequest>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let identity = require(&req, Permission::EditWizard)?;
    let target = body.into_inner().step;

    let snapshot = with_session(&state, &path, &identity, |machine| {
        if let Err(e) = check_transition(machine, target) {
            tracing::warn!(step = %target, "Transition refused: {}", e);
            return Err(ApiError::from(e));
        }
        machine.advance_to(target);
        Ok(machine.snapshot())
    })
    .await??;

    Ok(HttpResponse::Ok().json(snapshot))
}

pub async fn go_back(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let identity = require(&req, Permission::EditWizard)?;
    let snapshot = with_session(&state, &path, &identity, |machine| {
        machine.go_back();
        machine.snapshot()
    })
    .await?;
    Ok(HttpResponse::Ok().json(snapshot))
}

pub async fn review(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let identity = require(&req, Permission::EditWizard)?;
    let snapshot = with_session(&state, &path, &identity, |machine| {
        machine.review();
        machine.snapshot()
    })
    .await?;
    Ok(HttpResponse::Ok().json(snapshot))
}

pub async fn add_item(
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Json<LineItemData>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let identity = require(&req, Permission::EditWizard)?;
    let data = data.into_inner().with_derived_amount_in_words();

    let item = with_session(&state, &path, &identity, |machine| {
        machine.add_item(data).map(LineItem::clone)
    })
    .await??;

    Ok(HttpResponse::Created().json(item))
}

pub async fn update_item(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    data: web::Json<LineItemData>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let identity = require(&req, Permission::EditWizard)?;
    let (session_id, item_id) = path.into_inner();
    let item = LineItem {
        id: item_id.clone(),
        data: data.into_inner().with_derived_amount_in_words(),
    };

    let updated = with_session(&state, &session_id, &identity, |machine| {
        machine.update_item(item.clone())
    })
    .await?;

    if updated {
        Ok(HttpResponse::Ok().json(item))
    } else {
        Err(ApiError::not_found(format!("Solicitud {} no encontrada", item_id)))
    }
}

pub async fn delete_item(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let identity = require(&req, Permission::EditWizard)?;
    let (session_id, item_id) = path.into_inner();

    let removed = with_session(&state, &session_id, &identity, |machine| {
        machine.remove_item(&item_id)
    })
    .await?;

    if removed {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(ApiError::not_found(format!("Solicitud {} no encontrada", item_id)))
    }
}

pub async fn reset_session(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let identity = require(&req, Permission::EditWizard)?;
    let snapshot = with_session(&state, &path, &identity, |machine| {
        machine.reset();
        machine.snapshot()
    })
    .await?;

    state.metrics.wizard_resets.inc();
    Ok(HttpResponse::Ok().json(snapshot))
}

pub async fn export_text(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let identity = require(&req, Permission::ExportReports)?;
    let today = state.clock.now().date();
    let snapshot = with_session(&state, &path, &identity, |machine| machine.snapshot()).await?;

    let file = TextReportGenerator::generate(snapshot.header.as_ref(), &snapshot.items, today);
    state.metrics.exports.with_label_values(&["txt"]).inc();
    tracing::info!(filename = %file.filename, items = snapshot.items.len(), "Text report exported");

    Ok(download(file))
}

pub async fn export_workbook(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let identity = require(&req, Permission::ExportReports)?;
    let today = state.clock.now().date();
    let snapshot = with_session(&state, &path, &identity, |machine| machine.snapshot()).await?;

    let file = DetailedWorkbookGenerator::generate(snapshot.header.as_ref(), &snapshot.items, today)?;
    state.metrics.exports.with_label_values(&["xlsx"]).inc();
    tracing::info!(filename = %file.filename, items = snapshot.items.len(), "Workbook exported");

    Ok(download(file))
}

/// Guarda cada solicitud de la sesión y pasa a SUCCESS. Un guardado parcial
/// no revierte lo escrito.
pub async fn save_session(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let identity = require(&req, Permission::SaveRecords)?;
    let session_id = path.into_inner();

    let snapshot = with_session(&state, &session_id, &identity, |machine| {
        check_transition(machine, WizardStep::Success)?;
        Ok::<_, ApiError>(machine.snapshot())
    })
    .await??;

    let header = snapshot
        .header
        .as_ref()
        .ok_or_else(|| ApiError::bad_request("La sesión no tiene datos iniciales"))?;

    let report = state
        .repository
        .save_session(&identity, header, &snapshot.items)
        .await;

    state.metrics.records_saved.inc_by(report.saved.len() as u64);
    state.metrics.records_failed.inc_by(report.failed.len() as u64);

    let completed = if report.saved.is_empty() {
        false
    } else {
        with_session(&state, &session_id, &identity, |machine| {
            machine.complete_save(&snapshot)
        })
        .await?
    };

    let status = if report.failed.is_empty() {
        StatusCode::OK
    } else if report.saved.is_empty() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::MULTI_STATUS
    };

    Ok(HttpResponse::build(status).json(json!({
        "partial": report.is_partial(),
        "completed": completed,
        "saved": report.saved,
        "failed": report.failed,
    })))
}
