//! # Aggregator State
//!
//! Configuration, the shared HTTP client and the two cluster-wide
//! snapshots. Each poll loop builds a complete new snapshot off to the
//! side and swaps it in one guarded step; readers always see one
//! consistent poll cycle, never a mix of two.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Instant;

use actix_web::web::Data;
use reqwest::Client;
use shared::api::{ScoreSnapshot, TrafficSnapshot};

use crate::config::Config;

/// Thread safe wrapper
pub type State = Data<AggregatorState>;

pub fn new_state() -> State {
    Data::new(AggregatorState::new(Config::from_env()))
}

#[cfg(test)]
pub fn new_state_with(config: Config) -> State {
    Data::new(AggregatorState::new(config))
}

/// Cumulative counter totals from the previous traffic poll, kept to
/// turn counter deltas into rates.
#[derive(Debug, Default)]
pub struct PrevTotals {
    pub totals: HashMap<String, f64>,
    pub at: Option<Instant>,
}

pub struct AggregatorState {
    pub config: Config,
    pub client: Client,
    pub kube_token: Option<String>,
    scores: RwLock<Arc<ScoreSnapshot>>,
    traffic: RwLock<Arc<TrafficSnapshot>>,
    pub prev: Mutex<PrevTotals>,
}

impl AggregatorState {
    fn new(config: Config) -> Self {
        let client = shared::client::build_client(config.request_timeout_secs, &config.kube_ca_path);
        let kube_token = shared::client::load_token(&config.kube_token_path);
        Self {
            config,
            client,
            kube_token,
            scores: RwLock::new(Arc::new(ScoreSnapshot::empty())),
            traffic: RwLock::new(Arc::new(TrafficSnapshot::empty())),
            prev: Mutex::new(PrevTotals::default()),
        }
    }

    pub fn scores(&self) -> Arc<ScoreSnapshot> {
        self.scores.read().unwrap().clone()
    }

    pub fn publish_scores(&self, snapshot: ScoreSnapshot) {
        *self.scores.write().unwrap() = Arc::new(snapshot);
    }

    pub fn traffic(&self) -> Arc<TrafficSnapshot> {
        self.traffic.read().unwrap().clone()
    }

    pub fn publish_traffic(&self, snapshot: TrafficSnapshot) {
        *self.traffic.write().unwrap() = Arc::new(snapshot);
    }
}
