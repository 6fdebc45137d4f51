//! # Traffic Poll Loop
//!
//! Scrapes the request counters of all traffic emitters and converts
//! counter deltas over actual elapsed wall-clock time into a per-node
//! requests-per-second estimate. Totals of several pods on the same
//! node add up; a counter reset clamps to zero rather than reporting
//! negative traffic.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::Utc;
use shared::api::TrafficSnapshot;
use shared::models::TrafficSample;
use tokio::time;

use crate::discovery;
use crate::state::{PrevTotals, State};

pub async fn run(state: State) -> Result<(), String> {
    tracing::info!(period=%state.config.scrape_period_secs, "Starting traffic poll loop");
    let mut interval = time::interval(Duration::from_secs(state.config.scrape_period_secs));
    loop {
        interval.tick().await;
        if let Err(err) = run_iteration(&state).await {
            tracing::warn!(error=%err, "Traffic poll failed");
        }
    }
}

pub async fn run_iteration(state: &State) -> Result<(), String> {
    let endpoints = discovery::list_endpoints(state, &state.config.traffic_label).await?;

    let mut per_node_total: HashMap<String, f64> = HashMap::new();
    for ep in &endpoints {
        let url = format!("http://{}:{}/metrics", ep.addr, state.config.traffic_port);
        match fetch_exposition(state, &url).await {
            Ok(body) => {
                let total = sum_counter(&body, &state.config.traffic_metric);
                *per_node_total.entry(ep.node.clone()).or_insert(0.0) += total;
            }
            // missed scrape: the node's previous total is neither
            // advanced nor reset
            Err(err) => tracing::debug!(node=%ep.node, error=%err, "Traffic endpoint unreachable"),
        }
    }

    let now = Instant::now();
    let mut items = {
        let mut prev = state.prev.lock().unwrap();
        let items = compute_rates(&per_node_total, &prev, now);
        prev.totals.extend(per_node_total);
        prev.at = Some(now);
        items
    };
    items.sort_by(|a, b| b.rps.total_cmp(&a.rps));

    tracing::debug!(nodes = items.len(), "Traffic snapshot refreshed");
    state.publish_traffic(TrafficSnapshot { items, ts: Some(Utc::now()) });
    Ok(())
}

async fn fetch_exposition(state: &State, url: &str) -> Result<String, String> {
    let resp = state
        .client
        .get(url)
        .send()
        .await
        .map_err(|err| err.to_string())?;
    if !resp.status().is_success() {
        return Err(format!("HTTP {}", resp.status()));
    }
    resp.text().await.map_err(|err| err.to_string())
}

/// Rate per node from the current totals and the previous cycle.
/// First-ever observation of a node yields 0; negative deltas (counter
/// reset) clamp to 0.
fn compute_rates(
    per_node_total: &HashMap<String, f64>,
    prev: &PrevTotals,
    now: Instant,
) -> Vec<TrafficSample> {
    let elapsed = prev
        .at
        .map(|at| now.duration_since(at).as_secs_f64().max(1e-4));

    per_node_total
        .iter()
        .map(|(node, total)| {
            let rps = match (elapsed, prev.totals.get(node)) {
                (Some(dt), Some(prev_total)) => (total - prev_total).max(0.0) / dt,
                _ => 0.0,
            };
            TrafficSample { host: node.clone(), rps, total: *total as u64 }
        })
        .collect()
}

/// Sums all series of `metric` in a text exposition body. Lines of any
/// other metric, comments and malformed lines are ignored.
fn sum_counter(body: &str, metric: &str) -> f64 {
    body.lines()
        .filter_map(|line| parse_counter_line(line, metric))
        .sum()
}

/// Parses `name{label="value",...} 123` into its numeric value when
/// `name` matches the counter of interest.
fn parse_counter_line(line: &str, metric: &str) -> Option<f64> {
    let line = line.trim();
    let rest = line.strip_prefix(metric)?;
    // reject longer metric names sharing the prefix
    if !rest.starts_with('{') && !rest.starts_with(' ') {
        return None;
    }
    let (_, value) = line.rsplit_once(' ')?;
    value.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {

    //! - exposition parsing: counter lines only, prefix collisions and
    //!   comments ignored
    //! - rate math: delta over elapsed, first observation 0, counter
    //!   reset clamps to 0
    //! - full iteration: pods on the same node sum, snapshot sorted by
    //!   rps, missed scrape retains the previous total, error status
    //!   counts as a miss

    use super::*;
    use crate::config::Config;
    use crate::state::new_state_with;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const EXPO: &str = "\
# HELP proxy_requests_total Total requests served
# TYPE proxy_requests_total counter
proxy_requests_total{node=\"a\",pod=\"p1\"} 100
proxy_requests_total{node=\"a\",pod=\"p2\"} 50
proxy_requests_by_client_total{node=\"a\",client=\"10.0.0.9\"} 7
";

    #[test]
    fn sums_only_the_counter_of_interest() {
        assert_eq!(sum_counter(EXPO, "proxy_requests_total"), 150.0);
    }

    #[test]
    fn rejects_prefix_collisions() {
        let body = "proxy_requests_total_created{node=\"a\"} 9\nproxy_requests_total{node=\"a\"} 3\n";
        assert_eq!(sum_counter(body, "proxy_requests_total"), 3.0);
    }

    #[test]
    fn ignores_malformed_lines() {
        let body = "proxy_requests_total{node=\"a\"} not-a-number\nproxy_requests_total 5\n";
        assert_eq!(sum_counter(body, "proxy_requests_total"), 5.0);
    }

    #[test]
    fn rate_from_two_observations() {
        // total 100 at t0, 150 at t0+5s -> 10 rps
        let now = Instant::now();
        let prev = PrevTotals {
            totals: HashMap::from([("a".to_string(), 100.0)]),
            at: Some(now - Duration::from_secs(5)),
        };
        let current = HashMap::from([("a".to_string(), 150.0)]);

        let items = compute_rates(&current, &prev, now);
        assert_eq!(items.len(), 1);
        assert!((items[0].rps - 10.0).abs() < 1e-9);
        assert_eq!(items[0].total, 150);
    }

    #[test]
    fn first_observation_is_zero() {
        // no previous cycle at all
        let now = Instant::now();
        let items = compute_rates(
            &HashMap::from([("a".to_string(), 100.0)]),
            &PrevTotals::default(),
            now,
        );
        assert_eq!(items[0].rps, 0.0);

        // previous cycle exists but this node is new
        let prev = PrevTotals {
            totals: HashMap::from([("b".to_string(), 10.0)]),
            at: Some(now - Duration::from_secs(5)),
        };
        let items = compute_rates(&HashMap::from([("a".to_string(), 100.0)]), &prev, now);
        assert_eq!(items[0].rps, 0.0);
    }

    #[test]
    fn counter_reset_clamps_to_zero() {
        let now = Instant::now();
        let prev = PrevTotals {
            totals: HashMap::from([("a".to_string(), 500.0)]),
            at: Some(now - Duration::from_secs(5)),
        };
        let items = compute_rates(&HashMap::from([("a".to_string(), 20.0)]), &prev, now);
        assert_eq!(items[0].rps, 0.0);
    }

    fn test_config(base: &str, traffic_port: u16) -> Config {
        Config {
            kube_api_url: base.to_string(),
            traffic_port,
            request_timeout_secs: 1,
            kube_token_path: "/nonexistent".to_string(),
            kube_ca_path: "/nonexistent".to_string(),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_iteration_sums_pods_per_node() {
        let server = MockServer::start().await;
        let port = server.address().port();

        // two pods of the same node
        Mock::given(method("GET"))
            .and(path("/api/v1/namespaces/default/pods"))
            .and(query_param("labelSelector", "app=traffic-proxy"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {"spec": {"nodeName": "node-a"}, "status": {"podIP": "127.0.0.1"}},
                    {"spec": {"nodeName": "node-a"}, "status": {"podIP": "127.0.0.1"}}
                ]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/metrics"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("proxy_requests_total{node=\"a\"} 100\n"),
            )
            .mount(&server)
            .await;

        let state = new_state_with(test_config(&server.uri(), port));
        run_iteration(&state).await.unwrap();

        let snap = state.traffic();
        assert_eq!(snap.items.len(), 1);
        assert_eq!(snap.items[0].host, "node-a");
        assert_eq!(snap.items[0].total, 200);
        assert_eq!(snap.items[0].rps, 0.0);
        assert!(snap.ts.is_some());
    }

    #[tokio::test]
    async fn test_error_status_counts_as_missed_scrape() {
        let server = MockServer::start().await;
        let port = server.address().port();

        Mock::given(method("GET"))
            .and(path("/api/v1/namespaces/default/pods"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {"spec": {"nodeName": "node-a"}, "status": {"podIP": "127.0.0.1"}}
                ]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/metrics"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let state = new_state_with(test_config(&server.uri(), port));
        run_iteration(&state).await.unwrap();

        assert!(state.traffic().items.is_empty());
    }

    #[tokio::test]
    async fn test_missed_scrape_retains_previous_total() {
        let server = MockServer::start().await;
        let port = server.address().port();

        Mock::given(method("GET"))
            .and(path("/api/v1/namespaces/default/pods"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {"spec": {"nodeName": "node-a"}, "status": {"podIP": "203.0.113.1"}}
                ]
            })))
            .mount(&server)
            .await;

        let state = new_state_with(test_config(&server.uri(), port));
        {
            let mut prev = state.prev.lock().unwrap();
            prev.totals.insert("node-a".to_string(), 400.0);
            prev.at = Some(Instant::now());
        }

        run_iteration(&state).await.unwrap();

        // node missed this cycle: absent from the snapshot, previous
        // total untouched for the next delta
        assert!(state.traffic().items.is_empty());
        let prev = state.prev.lock().unwrap();
        assert_eq!(prev.totals.get("node-a"), Some(&400.0));
    }
}
