//! Banner and liveness / readiness probe.

use actix_web::{get, web, HttpResponse, Responder};
use serde_json::json;

use crate::http::AppState;

#[get("/")]
pub async fn root(state: web::Data<AppState>) -> impl Responder {
    let message = if state.demo_mode {
        "Football Stats Management System API - Demo Mode"
    } else {
        "Football Stats Management System API"
    };
    HttpResponse::Ok().json(json!({ "message": message }))
}

#[get("/healthz")]
pub async fn healthz(state: web::Data<AppState>) -> impl Responder {
    if let Err(e) = state.users.ping().await {
        log::warn!("health check failed: {e}");
        return HttpResponse::ServiceUnavailable().body("db");
    }
    HttpResponse::Ok().body("ok")
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(healthz);
}
