use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::sync::Arc;

use solicitudes_aduana::api::{configure_routes, ApiState};
use solicitudes_aduana::core::{parse_tokens, AppConfig};
use solicitudes_aduana::storage::MemoryRecordStore;
use solicitudes_aduana::wizard::FixedClock;

const ADMIN: &str = "tok-admin";
const GESTOR: &str = "tok-gestor";
const CONSULTA: &str = "tok-consulta";

fn state() -> web::Data<ApiState> {
    state_with_clock().0
}

fn state_with_clock() -> (web::Data<ApiState>, Arc<FixedClock>) {
    let config = AppConfig {
        api_tokens: parse_tokens(
            "tok-admin:u-admin:admin@agencia.ni:admin,\
             tok-gestor:u-gestor:gestor@agencia.ni:gestor,\
             tok-consulta:u-consulta:consulta@agencia.ni:consulta",
        )
        .unwrap(),
        ..AppConfig::default()
    };
    let clock = Arc::new(FixedClock::new(
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap(),
    ));
    let state =
        ApiState::with_store(config, Arc::new(MemoryRecordStore::new()), clock.clone()).unwrap();
    (web::Data::new(state), clock)
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

#[actix_web::test]
async fn health_is_public() {
    let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/ready").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn api_requires_a_known_token() {
    let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;

    for token in [None, Some("desconocido")] {
        let mut req = test::TestRequest::post().uri("/api/v1/wizard");
        if let Some(token) = token {
            req = req.insert_header(bearer(token));
        }
        let status = match test::try_call_service(&app, req.to_request()).await {
            Ok(resp) => resp.status(),
            Err(err) => err.as_response_error().status_code(),
        };
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

#[actix_web::test]
async fn consulta_cannot_open_a_wizard() {
    let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/wizard")
        .insert_header(bearer(CONSULTA))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn full_wizard_flow_exports_and_saves() {
    let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/wizard")
        .insert_header(bearer(GESTOR))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let session = created["session_id"].as_str().unwrap().to_string();
    assert_eq!(created["state"]["step"], "INITIAL_DATA");
    let base = format!("/api/v1/wizard/{}", session);

    // Sin datos iniciales no se puede avanzar.
    let req = test::TestRequest::post()
        .uri(&format!("{}/step", base))
        .insert_header(bearer(GESTOR))
        .set_json(json!({"step": "PRODUCT_LIST"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Tampoco agregar solicitudes.
    let req = test::TestRequest::post()
        .uri(&format!("{}/items", base))
        .insert_header(bearer(GESTOR))
        .set_json(json!({"amount": 10, "currency": "cordoba"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::put()
        .uri(&format!("{}/header", base))
        .insert_header(bearer(GESTOR))
        .set_json(json!({
            "tracking_code": "NE-77",
            "manager": "María López",
            "recipient": "Contabilidad"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri(&format!("{}/step", base))
        .insert_header(bearer(GESTOR))
        .set_json(json!({"step": "PRODUCT_LIST"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri(&format!("{}/items", base))
        .insert_header(bearer(GESTOR))
        .set_json(json!({
            "amount": 1500,
            "currency": "cordoba",
            "bank": {"kind": "no_bank"},
            "account_number": "123",
            "check_payee": "Aduana Central"
        }))
        .to_request();
    let item: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(item["id"], "NE-77-20261019-100000");
    assert_eq!(item["amount_in_words"], "MIL QUINIENTOS CON 00/100 CORDOBAS");

    let req = test::TestRequest::get()
        .uri(&format!("{}/export/txt", base))
        .insert_header(bearer(GESTOR))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("Reporte_NE-77_2026-10-19.txt"), "{}", disposition);
    let body = test::read_body(resp).await;
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("Monto: C$1,500.00"));
    assert!(!text.contains("No. de Cuenta"));

    let req = test::TestRequest::get()
        .uri(&format!("{}/export/xlsx", base))
        .insert_header(bearer(GESTOR))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri(&format!("{}/save", base))
        .insert_header(bearer(GESTOR))
        .to_request();
    let saved: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(saved["partial"], false);
    assert_eq!(saved["completed"], true);
    assert_eq!(saved["saved"], json!(["NE-77-20261019-100000"]));

    let req = test::TestRequest::get()
        .uri(&base)
        .insert_header(bearer(GESTOR))
        .to_request();
    let snapshot: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(snapshot["step"], "SUCCESS");

    let req = test::TestRequest::get()
        .uri("/api/v1/records?tracking_code=NE-77")
        .insert_header(bearer(GESTOR))
        .to_request();
    let found: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(found["total"], 1);

    // Otro usuario no ve registros ajenos; el administrador sí.
    let req = test::TestRequest::get()
        .uri("/api/v1/records")
        .insert_header(bearer(CONSULTA))
        .to_request();
    let found: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(found["total"], 0);

    let req = test::TestRequest::get()
        .uri("/api/v1/records/NE-77-20261019-100000")
        .insert_header(bearer(ADMIN))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/v1/records/export")
        .insert_header(bearer(ADMIN))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn another_identity_resets_the_session() {
    let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/wizard")
        .insert_header(bearer(GESTOR))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let base = format!("/api/v1/wizard/{}", created["session_id"].as_str().unwrap());

    let req = test::TestRequest::put()
        .uri(&format!("{}/header", base))
        .insert_header(bearer(GESTOR))
        .set_json(json!({"tracking_code": "NE-1", "manager": "Ana"}))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri(&format!("{}/items", base))
        .insert_header(bearer(GESTOR))
        .set_json(json!({"amount": "25.10", "currency": "dolar"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri(&base)
        .insert_header(bearer(ADMIN))
        .to_request();
    let snapshot: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(snapshot["items"], json!([]));
    assert_eq!(snapshot["header"], Value::Null);
    assert_eq!(snapshot["step"], "INITIAL_DATA");
}

#[actix_web::test]
async fn amount_in_words_utility() {
    let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/utils/amount-in-words")
        .insert_header(bearer(CONSULTA))
        .set_json(json!({"amount": 1234.5, "currency": "cordoba"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["words"], "MIL DOSCIENTOS TREINTA Y CUATRO CON 50/100 CORDOBAS");
    assert_eq!(body["formatted"], "C$1,234.50");
}

/// Abre una sesión de GESTOR con encabezado y una solicitud; devuelve su ruta.
macro_rules! open_session_with_item {
    ($app:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/v1/wizard")
            .insert_header(bearer(GESTOR))
            .to_request();
        let created: Value = test::call_and_read_body_json($app, req).await;
        let base = format!("/api/v1/wizard/{}", created["session_id"].as_str().unwrap());

        let req = test::TestRequest::put()
            .uri(&format!("{}/header", base))
            .insert_header(bearer(GESTOR))
            .set_json(json!({"tracking_code": "NE-5", "manager": "Ana"}))
            .to_request();
        test::call_service($app, req).await;

        let req = test::TestRequest::post()
            .uri(&format!("{}/items", base))
            .insert_header(bearer(GESTOR))
            .set_json(json!({"amount": 100, "currency": "dolar"}))
            .to_request();
        let resp = test::call_service($app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        base
    }};
}

#[actix_web::test]
async fn read_only_export_leaves_foreign_session_intact() {
    let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;
    let base = open_session_with_item!(&app);

    for format in ["txt", "xlsx"] {
        let req = test::TestRequest::get()
            .uri(&format!("{}/export/{}", base, format))
            .insert_header(bearer(CONSULTA))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    let req = test::TestRequest::get()
        .uri(&base)
        .insert_header(bearer(GESTOR))
        .to_request();
    let snapshot: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(snapshot["items"].as_array().unwrap().len(), 1);
    assert_eq!(snapshot["header"]["tracking_code"], "NE-5");
}

#[actix_web::test]
async fn closed_session_is_gone() {
    let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;
    let base = open_session_with_item!(&app);

    let req = test::TestRequest::delete()
        .uri(&base)
        .insert_header(bearer(GESTOR))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    for _ in 0..2 {
        let req = test::TestRequest::delete()
            .uri(&base)
            .insert_header(bearer(GESTOR))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    let req = test::TestRequest::get()
        .uri(&base)
        .insert_header(bearer(GESTOR))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn idle_sessions_are_evicted() {
    let (state, clock) = state_with_clock();
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure_routes)).await;
    let idle = open_session_with_item!(&app);
    let active = open_session_with_item!(&app);
    assert_eq!(state.sessions.read().await.len(), 2);

    clock.advance(60 * 60);
    let req = test::TestRequest::get()
        .uri(&active)
        .insert_header(bearer(GESTOR))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    clock.advance(61 * 60);
    assert_eq!(state.evict_idle_sessions().await, 1);
    assert_eq!(state.sessions.read().await.len(), 1);

    let req = test::TestRequest::get()
        .uri(&idle)
        .insert_header(bearer(GESTOR))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&active)
        .insert_header(bearer(GESTOR))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
