//! # Score Poll Loop
//!
//! Discovers all scorer agents and polls each for its current score.
//! A node whose scorer fails to answer is recorded with the sentinel
//! score rather than omitted: "failing to report" stays distinguishable
//! from "does not exist".

use std::time::Duration;

use chrono::Utc;
use shared::api::ScoreSnapshot;
use shared::models::{ScoreEntry, SENTINEL_SCORE};
use tokio::time;

use crate::discovery;
use crate::state::State;

pub async fn run(state: State) -> Result<(), String> {
    tracing::info!(period=%state.config.scrape_period_secs, "Starting score poll loop");
    let mut interval = time::interval(Duration::from_secs(state.config.scrape_period_secs));
    loop {
        interval.tick().await;
        if let Err(err) = run_iteration(&state).await {
            // stale snapshot retained, retry next cycle
            tracing::warn!(error=%err, "Score poll failed");
        }
    }
}

pub async fn run_iteration(state: &State) -> Result<(), String> {
    let endpoints = discovery::list_endpoints(state, &state.config.scorer_label).await?;

    let mut items = Vec::with_capacity(endpoints.len());
    for ep in &endpoints {
        let url = format!("http://{}:{}/score", ep.addr, state.config.scorer_port);
        match fetch_score(state, &url).await {
            Ok(entry) => items.push(entry),
            Err(err) => {
                tracing::debug!(node=%ep.node, error=%err, "Scorer unreachable");
                items.push(ScoreEntry { host: ep.node.clone(), score: SENTINEL_SCORE });
            }
        }
    }

    // stable sort: ties keep discovery order, sentinel sinks to the end
    items.sort_by(|a, b| b.score.cmp(&a.score));

    tracing::debug!(nodes = items.len(), "Score snapshot refreshed");
    state.publish_scores(ScoreSnapshot { items, ts: Some(Utc::now()) });
    Ok(())
}

async fn fetch_score(state: &State, url: &str) -> Result<ScoreEntry, String> {
    let resp = state
        .client
        .get(url)
        .send()
        .await
        .map_err(|err| err.to_string())?;
    if !resp.status().is_success() {
        return Err(format!("HTTP {}", resp.status()));
    }
    resp.json::<ScoreEntry>().await.map_err(|err| err.to_string())
}
