//! Routing decision queries.

use std::collections::HashSet;

use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;

use crate::decision::{self, DEFAULT_K, DEFAULT_THRESHOLD};
use crate::state::State;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/decision", web::get().to(decide))
        .route("/decision_auto", web::get().to(decide_auto));
}

#[derive(Deserialize)]
struct DecisionQuery {
    local: Option<String>,
    threshold: Option<i64>,
    k: Option<usize>,
    exclude: Option<String>,
}

impl DecisionQuery {
    fn excludes(&self) -> HashSet<String> {
        self.exclude
            .as_deref()
            .unwrap_or("")
            .split(',')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Decision for an explicit local node.
async fn decide(state: State, query: web::Query<DecisionQuery>) -> impl Responder {
    let Some(local) = &query.local else {
        return HttpResponse::BadRequest().json(json!({"error": "local required"}));
    };

    let snapshot = state.scores();
    let decision = decision::choose(
        &snapshot.items,
        local,
        query.threshold.unwrap_or(DEFAULT_THRESHOLD),
        query.k.unwrap_or(DEFAULT_K),
        &query.excludes(),
    );
    tracing::debug!(local=%local, reason=%decision.reason, "Decision served");
    HttpResponse::Ok().json(decision)
}

/// Decision with the local node derived from the busiest traffic node.
/// Explicitly reports "no traffic" instead of guessing when nothing has
/// been observed yet.
async fn decide_auto(state: State, query: web::Query<DecisionQuery>) -> impl Responder {
    let traffic = state.traffic();
    let Some(local) = decision::busiest(&traffic.items).map(str::to_string) else {
        return HttpResponse::ServiceUnavailable().json(json!({"error": "no traffic"}));
    };

    let snapshot = state.scores();
    let decision = decision::choose(
        &snapshot.items,
        &local,
        query.threshold.unwrap_or(DEFAULT_THRESHOLD),
        query.k.unwrap_or(DEFAULT_K),
        &HashSet::new(),
    );
    tracing::debug!(local=%local, reason=%decision.reason, "Auto decision served");
    HttpResponse::Ok().json(decision)
}
