use actix_web::{get, web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::{app_state::AppState, errors::AppError};

#[get("/")]
pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[get("/health/live")]
pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "alive" }))
}

/// Ready once the database answers a ping. In-memory deployments are always
/// ready.
#[get("/health/ready")]
pub async fn readiness(state: web::Data<AppState>) -> HttpResponse {
    let Some(db) = state.db.as_ref() else {
        return HttpResponse::Ok().json(json!({ "status": "ready", "database": "in-memory" }));
    };

    match db.health_check().await {
        Ok(()) => HttpResponse::Ok().json(json!({ "status": "ready", "database": "connected" })),
        Err(err) => {
            log::error!("Readiness check failed: {}", err);
            HttpResponse::ServiceUnavailable()
                .json(json!({ "status": "not_ready", "database": "unreachable" }))
        }
    }
}

/// Fallback for unmatched routes, so they get the usual JSON error body.
pub async fn not_found(req: HttpRequest) -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound(format!("Not Found - {}", req.path())))
}
