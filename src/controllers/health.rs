use actix_web::{web, HttpResponse, Responder};

use crate::AppState;

/// Version from Cargo.toml, available at compile time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/health").route(web::get().to(health_check)));
    cfg.service(web::resource("/api/health/storage").route(web::get().to(storage_status)));
}

async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": VERSION
    }))
}

async fn storage_status(state: web::Data<AppState>) -> impl Responder {
    let notes_dir = &state.config.notes_dir;

    HttpResponse::Ok().json(serde_json::json!({
        "notes_path": notes_dir.display().to_string(),
        "exists": notes_dir.exists()
    }))
}
