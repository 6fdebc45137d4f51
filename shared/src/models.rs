use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Score reserved for nodes whose scorer could not be reached.
/// Always sorts below every real score.
pub const SENTINEL_SCORE: i64 = -1;

/// Full fitness report for one node, owned by its scorer agent.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NodeScore {
    pub host: String,
    pub score: i64,
    pub breakdown: Breakdown,
    pub raw: RawMetrics,
    pub timestamp: DateTime<Utc>,
    /// Set when the last refresh attempt failed. The score fields keep
    /// the last good values (stale-serve).
    pub error: Option<String>,
}

impl NodeScore {
    /// Payload served before the first refresh has completed.
    pub fn initial(host: String) -> Self {
        Self {
            host,
            score: 0,
            breakdown: Breakdown::default(),
            raw: RawMetrics::default(),
            timestamp: Utc::now(),
            error: None,
        }
    }
}

/// Normalized `[0,1]` contribution of each dimension. Informational,
/// never used in comparisons.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Breakdown {
    pub cpu: f64,
    pub mem: f64,
    pub lat: f64,
}

/// Last observed telemetry values behind a score. Informational only.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawMetrics {
    pub usage_cpu: f64,
    pub alloc_cpu: f64,
    pub usage_mem: f64,
    pub alloc_mem: f64,
    pub cpu_ratio: f64,
    pub mem_ratio: f64,
    pub median_latency_ms: Option<f64>,
}

/// Minimal score projection: what the aggregator caches and what
/// decisions are made of.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScoreEntry {
    pub host: String,
    pub score: i64,
}

/// Per-node request rate derived from two counter observations.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TrafficSample {
    pub host: String,
    pub rps: f64,
    pub total: u64,
}

/// Routing decision: a primary candidate plus an ordered fallback list.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Decision {
    pub primary: Option<ScoreEntry>,
    pub fallback: Vec<ScoreEntry>,
    pub reason: DecisionReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    LocalOk,
    LocalOverloaded,
    LocalMissing,
}

impl std::fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecisionReason::LocalOk => write!(f, "local_ok"),
            DecisionReason::LocalOverloaded => write!(f, "local_overloaded"),
            DecisionReason::LocalMissing => write!(f, "local_missing"),
        }
    }
}
