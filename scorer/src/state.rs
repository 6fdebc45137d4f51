//! # Scorer State
//!
//! Holds the configuration, the shared HTTP client and the current
//! [`NodeScore`]. The score is published as a guarded swap of an
//! immutable snapshot: readers always see one complete score, never a
//! half-updated one.

use std::sync::{Arc, RwLock};

use actix_web::web::Data;
use reqwest::Client;
use shared::models::NodeScore;

use crate::config::Config;

/// Thread safe wrapper
pub type State = Data<ScorerState>;

pub fn new_state() -> State {
    Data::new(ScorerState::new(Config::from_env()))
}

#[cfg(test)]
pub fn new_state_with(config: Config) -> State {
    Data::new(ScorerState::new(config))
}

pub struct ScorerState {
    pub config: Config,
    pub client: Client,
    pub kube_token: Option<String>,
    current: RwLock<Arc<NodeScore>>,
}

impl ScorerState {
    fn new(config: Config) -> Self {
        let client = shared::client::build_client(config.request_timeout_secs, &config.kube_ca_path);
        let kube_token = shared::client::load_token(&config.kube_token_path);
        let current = RwLock::new(Arc::new(NodeScore::initial(config.node_name.clone())));
        Self { config, client, kube_token, current }
    }

    /// Returns the current score snapshot.
    pub fn snapshot(&self) -> Arc<NodeScore> {
        self.current.read().unwrap().clone()
    }

    /// Replaces the current score with a freshly computed one.
    pub fn publish(&self, score: NodeScore) {
        *self.current.write().unwrap() = Arc::new(score);
    }

    /// Records a refresh failure. The last good score, breakdown and
    /// timestamp are kept (stale-serve); only the error field changes.
    pub fn record_error(&self, error: String) {
        let mut current = self.current.write().unwrap();
        let mut next = (**current).clone();
        next.error = Some(error);
        *current = Arc::new(next);
    }
}
