//! # Score Refresh Loop
//!
//! Background task that periodically gathers telemetry for this node,
//! runs the score calculator and atomically publishes the result. A
//! failed iteration records the error on the exposed score but keeps
//! the last good values; it never stops the loop.

use std::time::Duration;

use chrono::Utc;
use shared::models::{Breakdown, NodeScore, RawMetrics};
use tokio::time;

use crate::score::{self, LatencyOutcome};
use crate::state::State;
use crate::telemetry;

/// Starts the periodic refresh loop.
pub async fn run(state: State) -> Result<(), String> {
    tracing::info!(interval=%state.config.interval_secs, "Starting refresh loop");
    let mut interval = time::interval(Duration::from_secs(state.config.interval_secs));
    loop {
        interval.tick().await;
        if let Err(err) = run_iteration(&state).await {
            tracing::warn!(error=%err, "Score refresh failed, serving stale score");
            state.record_error(err);
        }
    }
}

/// One refresh: gather usage and latency, compute, publish.
pub async fn run_iteration(state: &State) -> Result<(), String> {
    let config = &state.config;

    let usage =
        telemetry::fetch_node_usage(&state.client, state.kube_token.as_deref(), config).await?;
    let latency = telemetry::latency_outcome(&state.client, config).await;
    if let LatencyOutcome::Fallback(reason) = &latency {
        tracing::warn!(reason=%reason, "Latency sub-score fell back to neutral");
    }

    let s_cpu = score::resource_subscore(usage.usage_cpu, usage.alloc_cpu);
    let s_mem = score::resource_subscore(usage.usage_mem, usage.alloc_mem);
    let s_lat = latency.subscore();

    let combined = score::combine(&config.weights, config.scale, s_cpu, s_mem, s_lat);
    tracing::debug!(score=%combined, cpu=%s_cpu, mem=%s_mem, lat=%s_lat, "Score refreshed");

    state.publish(NodeScore {
        host: config.node_name.clone(),
        score: combined,
        breakdown: Breakdown { cpu: s_cpu, mem: s_mem, lat: s_lat },
        raw: RawMetrics {
            usage_cpu: usage.usage_cpu,
            alloc_cpu: usage.alloc_cpu,
            usage_mem: usage.usage_mem,
            alloc_mem: usage.alloc_mem,
            cpu_ratio: score::resource_ratio(usage.usage_cpu, usage.alloc_cpu),
            mem_ratio: score::resource_ratio(usage.usage_mem, usage.alloc_mem),
            median_latency_ms: latency.median_ms(),
        },
        timestamp: Utc::now(),
        error: None,
    });
    Ok(())
}
