use actix_cors::Cors;
use actix_web::{web, HttpResponse};

use super::handlers;
use super::middleware::auth::create_auth_middleware;
use super::records_handler;
use super::state::ApiState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Health checks
        .route("/health", web::get().to(health_check))
        .route("/ready", web::get().to(readiness_check))
        .route("/metrics", web::get().to(metrics_endpoint))

        // API v1
        .service(
            web::scope("/api/v1")
                .wrap(create_auth_middleware())
                .wrap(
                    Cors::default()
                        .allowed_origin_fn(|origin, _req_head| {
                            origin.as_bytes().starts_with(b"http://localhost") ||
                            origin.as_bytes().starts_with(b"https://")
                        })
                        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
                        .allowed_headers(vec!["Content-Type", "Authorization"])
                        .expose_headers(vec!["Content-Disposition"])
                        .max_age(3600)
                )

                // Check/transfer request wizard
                .service(
                    web::scope("/wizard")
                        .route("", web::post().to(handlers::create_session))
                        .route("/{session_id}", web::get().to(handlers::get_session))
                        .route("/{session_id}", web::delete().to(handlers::close_session))
                        .route("/{session_id}/header", web::put().to(handlers::update_header))
                        .route("/{session_id}/step", web::post().to(handlers::change_step))
                        .route("/{session_id}/back", web::post().to(handlers::go_back))
                        .route("/{session_id}/review", web::post().to(handlers::review))
                        .route("/{session_id}/reset", web::post().to(handlers::reset_session))
                        .route("/{session_id}/items", web::post().to(handlers::add_item))
                        .route("/{session_id}/items/{item_id}", web::put().to(handlers::update_item))
                        .route("/{session_id}/items/{item_id}", web::delete().to(handlers::delete_item))
                        .route("/{session_id}/export/txt", web::get().to(handlers::export_text))
                        .route("/{session_id}/export/xlsx", web::get().to(handlers::export_workbook))
                        .route("/{session_id}/save", web::post().to(handlers::save_session))
                )

                // Saved records
                .service(
                    web::scope("/records")
                        .route("", web::get().to(records_handler::search_records))
                        .route("/export", web::get().to(records_handler::export_search))
                        .route("/{id}", web::get().to(records_handler::get_record))
                )

                .route("/utils/amount-in-words", web::post().to(records_handler::amount_in_words))
        );
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy"
    }))
}

async fn readiness_check(state: web::Data<ApiState>) -> HttpResponse {
    let (database, healthy) = match &state.database {
        Some(sqlite) => {
            if sqlite.ping().await {
                ("ok", true)
            } else {
                ("failed", false)
            }
        }
        None => ("memory", true),
    };

    if healthy {
        HttpResponse::Ok().json(serde_json::json!({
            "status": "ready",
            "checks": { "database": database }
        }))
    } else {
        HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "not_ready",
            "checks": { "database": database }
        }))
    }
}

async fn metrics_endpoint(state: web::Data<ApiState>) -> HttpResponse {
    use prometheus::{Encoder, TextEncoder};

    let encoder = TextEncoder::new();
    let mut metric_families = state.metrics.registry.gather();
    metric_families.extend(prometheus::gather());
    let mut buffer = vec![];

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return HttpResponse::InternalServerError().finish();
    }

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(buffer)
}
