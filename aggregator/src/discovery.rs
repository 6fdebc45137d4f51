//! # Cluster Discovery
//!
//! Resolves the current set of scorer and traffic-emitter endpoints by
//! listing pods matching a label selector. Pods that do not yet report
//! an address are skipped for this cycle and picked up on the next.

use shared::api::PodList;

use crate::state::AggregatorState;

/// A workload reachable for scraping: the node it runs on and its
/// network address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub node: String,
    pub addr: String,
}

/// Lists pods matching `label` in the configured namespace.
pub async fn list_endpoints(
    state: &AggregatorState,
    label: &str,
) -> Result<Vec<Endpoint>, String> {
    let url = format!(
        "{}/api/v1/namespaces/{}/pods",
        state.config.kube_api_url, state.config.namespace
    );

    let mut req = state.client.get(&url).query(&[("labelSelector", label)]);
    if let Some(token) = &state.kube_token {
        req = req.bearer_auth(token);
    }

    let resp = req
        .send()
        .await
        .map_err(|err| format!("pod list: {}", err))?;
    if !resp.status().is_success() {
        return Err(format!("pod list: HTTP {}", resp.status()));
    }
    let list: PodList = resp
        .json()
        .await
        .map_err(|err| format!("pod list: {}", err))?;

    let endpoints = list
        .items
        .into_iter()
        .filter_map(|pod| {
            let node = pod.spec.node_name?;
            let addr = pod.status.pod_ip?;
            Some(Endpoint { node, addr })
        })
        .collect();
    Ok(endpoints)
}
