//! # Decision Engine
//!
//! Pure, stateless routing policy over the current snapshots: a greedy,
//! threshold-gated load-shedding choice, not an optimal assignment. It
//! trades optimality for per-query simplicity over possibly-stale
//! cached data.

use std::collections::HashSet;

use shared::models::{Decision, DecisionReason, ScoreEntry, TrafficSample};

pub const DEFAULT_THRESHOLD: i64 = 500;
pub const DEFAULT_K: usize = 2;

/// Picks a primary target and up to `k` fallbacks from the score
/// snapshot (already sorted descending, sentinel last).
///
/// The local node keeps its own traffic when it is present, not
/// excluded, and at or above the threshold. Exclusion strictly
/// overrides eligibility: an excluded local node can never become
/// primary, and the local node is always removed from the re-routing
/// candidates.
pub fn choose(
    items: &[ScoreEntry],
    local_node: &str,
    threshold: i64,
    k: usize,
    excludes: &HashSet<String>,
) -> Decision {
    let local = items.iter().find(|e| e.host == local_node);
    let candidates: Vec<&ScoreEntry> =
        items.iter().filter(|e| !excludes.contains(&e.host)).collect();

    if let Some(local) = local {
        if !excludes.contains(&local.host) && local.score >= threshold {
            let fallback = candidates
                .iter()
                .filter(|e| e.host != local.host)
                .take(k)
                .map(|e| (*e).clone())
                .collect();
            return Decision {
                primary: Some(local.clone()),
                fallback,
                reason: DecisionReason::LocalOk,
            };
        }
    }

    let rest: Vec<&ScoreEntry> = candidates
        .into_iter()
        .filter(|e| local.is_none_or(|l| e.host != l.host))
        .collect();
    let primary = rest.first().map(|e| (*e).clone());
    let fallback = rest.iter().skip(1).take(k).map(|e| (*e).clone()).collect();
    Decision {
        primary,
        fallback,
        reason: if local.is_some() {
            DecisionReason::LocalOverloaded
        } else {
            DecisionReason::LocalMissing
        },
    }
}

/// Node with the highest observed request rate, if any traffic has
/// been observed at all.
pub fn busiest(samples: &[TrafficSample]) -> Option<&str> {
    samples.first().map(|s| s.host.as_str())
}
