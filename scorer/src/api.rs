use actix_web::{App, HttpResponse, HttpServer, Responder, web};
use shared::api::ScoreQuery;
use shared::models::ScoreEntry;

use crate::state::State;

pub async fn run(state: State) -> Result<(), String> {
    tracing::info!(port=%state.config.port, "Starting api server");
    let port = state.config.port;
    let api_workers = state.config.api_workers;
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route("/score", web::get().to(score))
            .route("/health", web::get().to(health))
            .route("/", web::get().to(root))
    })
    .bind(("0.0.0.0", port))
    .map_err(|e| e.to_string())?
    .workers(api_workers)
    .run()
    .await
    .map_err(|e| e.to_string())
}

async fn root() -> impl Responder {
    HttpResponse::Ok().body("Hello from nodefit-scorer")
}

/// Liveness only: the process answers even while telemetry is failing.
async fn health() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

/// Current score. Minimal `{host, score}` by default, the full object
/// with `?verbose=1`.
async fn score(state: State, query: web::Query<ScoreQuery>) -> impl Responder {
    let current = state.snapshot();
    if query.verbose.unwrap_or(0) == 1 {
        HttpResponse::Ok().json(&*current)
    } else {
        HttpResponse::Ok().json(ScoreEntry {
            host: current.host.clone(),
            score: current.score,
        })
    }
}
