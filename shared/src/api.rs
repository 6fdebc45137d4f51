use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ScoreEntry, TrafficSample};

/// Query parameters of the scorer `/score` endpoint.
#[derive(Deserialize, Debug)]
pub struct ScoreQuery {
    pub verbose: Option<u8>,
}

/// Pre-scored latency service response: `{host, score}`.
#[derive(Deserialize, Serialize, Debug)]
pub struct LatencyScore {
    pub host: String,
    pub score: f64,
}

/// Raw latency service response: round-trip milliseconds per peer.
#[derive(Deserialize, Serialize, Debug)]
pub struct LatencyReport {
    pub source: String,
    pub targets: HashMap<String, f64>,
}

/// One complete score poll cycle, as served by the aggregator.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ScoreSnapshot {
    pub items: Vec<ScoreEntry>,
    pub ts: Option<DateTime<Utc>>,
}

impl ScoreSnapshot {
    pub fn empty() -> Self {
        Self { items: Vec::new(), ts: None }
    }
}

/// One complete traffic poll cycle, as served by the aggregator.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TrafficSnapshot {
    pub items: Vec<TrafficSample>,
    pub ts: Option<DateTime<Utc>>,
}

impl TrafficSnapshot {
    pub fn empty() -> Self {
        Self { items: Vec::new(), ts: None }
    }
}

// ============================= KUBERNETES WIRE SUBSETS

// Only the fields the services actually read; everything else in the
// apiserver responses is ignored.

/// `GET /api/v1/namespaces/{ns}/pods?labelSelector=...`
#[derive(Deserialize, Debug)]
pub struct PodList {
    #[serde(default)]
    pub items: Vec<PodItem>,
}

#[derive(Deserialize, Debug)]
pub struct PodItem {
    #[serde(default)]
    pub spec: PodSpec,
    #[serde(default)]
    pub status: PodItemStatus,
}

#[derive(Deserialize, Debug, Default)]
pub struct PodSpec {
    #[serde(rename = "nodeName")]
    pub node_name: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct PodItemStatus {
    #[serde(rename = "podIP")]
    pub pod_ip: Option<String>,
}

/// `GET /api/v1/nodes/{name}` (allocatable capacity only).
#[derive(Deserialize, Debug)]
pub struct NodeObject {
    pub status: NodeObjectStatus,
}

#[derive(Deserialize, Debug)]
pub struct NodeObjectStatus {
    pub allocatable: ResourceQuantities,
}

/// `GET /apis/metrics.k8s.io/v1beta1/nodes/{name}`.
#[derive(Deserialize, Debug)]
pub struct NodeMetrics {
    pub usage: ResourceQuantities,
}

#[derive(Deserialize, Debug)]
pub struct ResourceQuantities {
    pub cpu: String,
    pub memory: String,
}
