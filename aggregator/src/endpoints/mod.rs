mod decisions;
mod snapshots;

use actix_web::{HttpResponse, Responder, web};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
    snapshots::config(cfg);
    decisions::config(cfg);
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({"ok": true}))
}
