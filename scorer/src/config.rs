use std::env;

use crate::score::Weights;

/// How the latency sub-score is obtained. Selected once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyMode {
    /// The latency service returns a pre-computed `{host, score}`.
    Prescored,
    /// The latency service returns raw round-trip measurements;
    /// the scorer takes the median and maps it to `[0,1]`.
    Raw,
}

/// Scorer configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub node_name: String,
    pub interval_secs: u64,
    pub latency_mode: LatencyMode,
    /// Pre-scored mode endpoint, `{node}` substituted.
    pub lat_score_url_tmpl: String,
    /// Divisor applied to pre-computed scores above 1.
    pub l_score_scale: f64,
    /// Raw mode endpoint, `{node}` substituted.
    pub latency_url_tmpl: String,
    pub l_ref_ms: f64,
    pub alpha: f64,
    pub weights: Weights,
    pub scale: i64,
    pub kube_api_url: String,
    pub kube_token_path: String,
    pub kube_ca_path: String,
    pub request_timeout_secs: u64,
    pub api_workers: usize,
}

impl Config {
    /// Loads scorer configuration from environment variables.
    ///
    /// Falls back to defaults when applicable.
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Some(p) = env::var("PORT").ok().and_then(|s| s.parse().ok()) {
            config.port = p;
        }

        if let Ok(name) = env::var("NODE_NAME") {
            config.node_name = name;
        }

        if let Some(val) = env::var("INTERVAL_SEC").ok().and_then(|s| s.parse().ok()) {
            config.interval_secs = val;
        }

        if let Ok(mode) = env::var("LATENCY_MODE") {
            config.latency_mode = match mode.to_lowercase().as_str() {
                "raw" => LatencyMode::Raw,
                _ => LatencyMode::Prescored,
            };
        }

        if let Ok(tmpl) = env::var("LAT_SCORE_URL_TMPL") {
            config.lat_score_url_tmpl = tmpl;
        }
        if let Some(val) = env::var("L_SCORE_SCALE").ok().and_then(|s| s.parse().ok()) {
            config.l_score_scale = val;
        }
        if let Ok(tmpl) = env::var("LATENCY_URL_TMPL") {
            config.latency_url_tmpl = tmpl;
        }
        if let Some(val) = env::var("L_REF_MS").ok().and_then(|s| s.parse().ok()) {
            config.l_ref_ms = val;
        }
        if let Some(val) = env::var("ALPHA").ok().and_then(|s| s.parse().ok()) {
            config.alpha = val;
        }

        if let Some(val) = env::var("W_CPU").ok().and_then(|s| s.parse().ok()) {
            config.weights.cpu = val;
        }
        if let Some(val) = env::var("W_MEM").ok().and_then(|s| s.parse().ok()) {
            config.weights.mem = val;
        }
        if let Some(val) = env::var("W_LAT").ok().and_then(|s| s.parse().ok()) {
            config.weights.lat = val;
        }
        if let Some(val) = env::var("SCALE").ok().and_then(|s| s.parse().ok()) {
            config.scale = val;
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
            port: 8081,
            node_name: "unknown".to_string(),
            interval_secs: 60,
            latency_mode: LatencyMode::Prescored,
            lat_score_url_tmpl:
                "http://prober-svc.default.svc.cluster.local:8080/score?node={node}".to_string(),
            l_score_scale: 1000.0,
            latency_url_tmpl:
                "http://prober-svc.default.svc.cluster.local:8080/latency?source={node}"
                    .to_string(),
            l_ref_ms: 10.0,
            alpha: 1.0,
            weights: Weights { cpu: 0.4, mem: 0.3, lat: 0.3 },
            scale: 1000,
            kube_api_url: "https://kubernetes.default.svc".to_string(),
            kube_token_path: "/var/run/secrets/kubernetes.io/serviceaccount/token".to_string(),
            kube_ca_path: "/var/run/secrets/kubernetes.io/serviceaccount/ca.crt".to_string(),
            request_timeout_secs: 3,
            api_workers: 2,
        }
    }
}
