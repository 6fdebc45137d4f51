use std::env;

/// Aggregator configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Shared poll interval of the score and traffic loops, seconds.
    pub scrape_period_secs: u64,
    pub namespace: String,
    /// Label selector and port of the scorer agents.
    pub scorer_label: String,
    pub scorer_port: u16,
    /// Label selector and port of the traffic counter emitters.
    pub traffic_label: String,
    pub traffic_port: u16,
    /// Name of the request counter in the emitters' exposition.
    pub traffic_metric: String,
    pub kube_api_url: String,
    pub kube_token_path: String,
    pub kube_ca_path: String,
    pub request_timeout_secs: u64,
    pub api_workers: usize,
}

impl Config {
    /// Loads aggregator configuration from environment variables.
    ///
    /// Falls back to defaults when applicable.
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Some(p) = env::var("PORT").ok().and_then(|s| s.parse().ok()) {
            config.port = p;
        }
        if let Some(val) = env::var("SCRAPER_PERIOD").ok().and_then(|s| s.parse().ok()) {
            config.scrape_period_secs = val;
        }
        if let Ok(ns) = env::var("NAMESPACE") {
            config.namespace = ns;
        }

        if let Ok(label) = env::var("SCORER_LABEL") {
            config.scorer_label = label;
        }
        if let Some(p) = env::var("SCORER_PORT").ok().and_then(|s| s.parse().ok()) {
            config.scorer_port = p;
        }

        if let Ok(label) = env::var("TRAFFIC_LABEL") {
            config.traffic_label = label;
        }
        if let Some(p) = env::var("TRAFFIC_PORT").ok().and_then(|s| s.parse().ok()) {
            config.traffic_port = p;
        }
        if let Ok(metric) = env::var("TRAFFIC_METRIC") {
            config.traffic_metric = metric;
        }

        if let Ok(url) = env::var("KUBE_API_URL") {
            config.kube_api_url = url;
        }
        if let Ok(path) = env::var("KUBE_TOKEN_PATH") {
            config.kube_token_path = path;
        }
        if let Ok(path) = env::var("KUBE_CA_PATH") {
            config.kube_ca_path = path;
        }

        if let Some(val) = env::var("REQUEST_TIMEOUT_SEC").ok().and_then(|s| s.parse().ok()) {
            config.request_timeout_secs = val;
        }
        if let Some(val) = env::var("API_WORKERS").ok().and_then(|s| s.parse().ok()) {
            config.api_workers = val;
        }

        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            scrape_period_secs: 20,
            namespace: "default".to_string(),
            scorer_label: "app=nodefit-scorer".to_string(),
            scorer_port: 8081,
            traffic_label: "app=traffic-proxy".to_string(),
            traffic_port: 8080,
            traffic_metric: "proxy_requests_total".to_string(),
            kube_api_url: "https://kubernetes.default.svc".to_string(),
            kube_token_path: "/var/run/secrets/kubernetes.io/serviceaccount/token".to_string(),
            kube_ca_path: "/var/run/secrets/kubernetes.io/serviceaccount/ca.crt".to_string(),
            request_timeout_secs: 2,
            api_workers: 2,
        }
    }
}
