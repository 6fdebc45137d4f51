//! # Telemetry Clients
//!
//! Fetches the raw inputs of a score computation: node usage and
//! allocatable capacity from the cluster metrics API, and a latency
//! signal from the latency service in the configured mode.

use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::api::{LatencyReport, LatencyScore, NodeMetrics, NodeObject};
use shared::quantity::{parse_cpu, parse_memory};

use crate::config::{Config, LatencyMode};
use crate::score::{self, FallbackReason, LatencyOutcome};

/// Usage and allocatable figures for one node, already parsed to
/// cores/bytes.
#[derive(Debug, Clone, Copy)]
pub struct NodeUsage {
    pub usage_cpu: f64,
    pub alloc_cpu: f64,
    pub usage_mem: f64,
    pub alloc_mem: f64,
}

/// Fetches current usage from the metrics API and allocatable capacity
/// from the node object.
pub async fn fetch_node_usage(
    client: &Client,
    token: Option<&str>,
    config: &Config,
) -> Result<NodeUsage, String> {
    let metrics_url = format!(
        "{}/apis/metrics.k8s.io/v1beta1/nodes/{}",
        config.kube_api_url, config.node_name
    );
    let metrics: NodeMetrics = get_json(client, &metrics_url, token).await?;

    let node_url = format!("{}/api/v1/nodes/{}", config.kube_api_url, config.node_name);
    let node: NodeObject = get_json(client, &node_url, token).await?;

    Ok(NodeUsage {
        usage_cpu: parse_cpu(&metrics.usage.cpu).map_err(|e| e.to_string())?,
        usage_mem: parse_memory(&metrics.usage.memory).map_err(|e| e.to_string())?,
        alloc_cpu: parse_cpu(&node.status.allocatable.cpu).map_err(|e| e.to_string())?,
        alloc_mem: parse_memory(&node.status.allocatable.memory).map_err(|e| e.to_string())?,
    })
}

/// Obtains the latency sub-score in the configured mode. Failures never
/// escape: they become a named fallback outcome.
pub async fn latency_outcome(client: &Client, config: &Config) -> LatencyOutcome {
    match config.latency_mode {
        LatencyMode::Prescored => {
            let url = config.lat_score_url_tmpl.replace("{node}", &config.node_name);
            match get_json::<LatencyScore>(client, &url, None).await {
                Ok(resp) => LatencyOutcome::Prescored(score::prescored_subscore(
                    resp.score,
                    config.l_score_scale,
                )),
                Err(err) => LatencyOutcome::Fallback(FallbackReason::RequestFailed(err)),
            }
        }
        LatencyMode::Raw => {
            let url = config.latency_url_tmpl.replace("{node}", &config.node_name);
            match get_json::<LatencyReport>(client, &url, None).await {
                Ok(report) => {
                    let samples: Vec<f64> = report.targets.values().copied().collect();
                    match score::raw_latency_subscore(&samples, config.l_ref_ms, config.alpha) {
                        Some((subscore, median_ms)) => {
                            LatencyOutcome::Measured { subscore, median_ms }
                        }
                        None => LatencyOutcome::Fallback(FallbackReason::NoTargets),
                    }
                }
                Err(err) => LatencyOutcome::Fallback(FallbackReason::RequestFailed(err)),
            }
        }
    }
}

async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    token: Option<&str>,
) -> Result<T, String> {
    let mut req = client.get(url);
    if let Some(token) = token {
        req = req.bearer_auth(token);
    }
    let resp = req
        .send()
        .await
        .map_err(|err| format!("{}: {}", url, err))?;
    if !resp.status().is_success() {
        return Err(format!("{}: HTTP {}", url, resp.status()));
    }
    resp.json::<T>()
        .await
        .map_err(|err| format!("{}: {}", url, err))
}
