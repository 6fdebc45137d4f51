//! Read-only views over the two cached snapshots.

use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;

use crate::decision;
use crate::state::State;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/scores", web::get().to(scores))
        .route("/best", web::get().to(best))
        .route("/score", web::get().to(score))
        .route("/traffic", web::get().to(traffic))
        .route("/busiest", web::get().to(busiest));
}

#[derive(Deserialize)]
struct NodeQuery {
    node: Option<String>,
}

/// Current scores, sorted descending, sentinel entries last.
async fn scores(state: State) -> impl Responder {
    HttpResponse::Ok().json(&state.scores().items)
}

/// Highest-scoring node of the latest snapshot.
async fn best(state: State) -> impl Responder {
    let snapshot = state.scores();
    match snapshot.items.first() {
        Some(entry) => HttpResponse::Ok().json(entry),
        None => HttpResponse::Ok().json(json!({})),
    }
}

/// One node's current score.
async fn score(state: State, query: web::Query<NodeQuery>) -> impl Responder {
    let Some(node) = &query.node else {
        return HttpResponse::BadRequest().json(json!({"error": "node required"}));
    };
    let snapshot = state.scores();
    match snapshot.items.iter().find(|e| &e.host == node) {
        Some(entry) => HttpResponse::Ok().json(entry),
        None => HttpResponse::NotFound().json(json!({"error": "not found"})),
    }
}

/// Current traffic snapshot with its cycle timestamp.
async fn traffic(state: State) -> impl Responder {
    HttpResponse::Ok().json(&*state.traffic())
}

/// Node with the highest observed request rate.
async fn busiest(state: State) -> impl Responder {
    let snapshot = state.traffic();
    match decision::busiest(&snapshot.items) {
        Some(host) => HttpResponse::Ok().json(json!({"host": host})),
        None => HttpResponse::Ok().json(json!({})),
    }
}
