//! HTTP client setup shared by both services: fixed request timeout,
//! cluster CA trusted when present on disk, service account token for
//! apiserver calls.

use std::time::Duration;

use reqwest::Client;

/// Builds the client used for all telemetry and scrape calls.
pub fn build_client(timeout_secs: u64, ca_path: &str) -> Client {
    let mut builder = Client::builder().timeout(Duration::from_secs(timeout_secs));
    if let Ok(pem) = std::fs::read(ca_path) {
        match reqwest::Certificate::from_pem(&pem) {
            Ok(cert) => builder = builder.add_root_certificate(cert),
            Err(err) => tracing::warn!(error=%err, "Ignoring unreadable cluster CA"),
        }
    }
    match builder.build() {
        Ok(client) => client,
        Err(err) => {
            tracing::warn!(error=%err, "Falling back to default HTTP client");
            Client::new()
        }
    }
}

/// Reads the service account token, if any.
pub fn load_token(path: &str) -> Option<String> {
    std::fs::read_to_string(path)
        .ok()
        .map(|t| t.trim().to_string())
}
