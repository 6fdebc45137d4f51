//! # Score Calculator
//!
//! Pure score computation. No I/O: telemetry values come in, sub-scores
//! and a combined integer score come out.
//!
//! Scores are only comparable across nodes configured with identical
//! weights and scale; the calculator does not require weights to sum
//! to 1 and leaves calibration to the deployment.

use std::fmt;

/// Neutral sub-score used when the latency signal is unavailable.
pub const NEUTRAL_LATENCY: f64 = 0.5;

/// Usage/allocatable ratios are capped here to bound the effect of
/// transient overcommit.
const RATIO_CAP: f64 = 1.2;

/// Relative weight of each dimension in the combined score.
#[derive(Debug, Clone, Copy)]
pub struct Weights {
    pub cpu: f64,
    pub mem: f64,
    pub lat: f64,
}

/// Usage over allocatable, floored against zero capacity and capped
/// at [`RATIO_CAP`].
pub fn resource_ratio(usage: f64, alloc: f64) -> f64 {
    (usage / alloc.max(1e-9)).min(RATIO_CAP)
}

/// CPU/memory sub-score: the smaller the ratio, the higher the score.
pub fn resource_subscore(usage: f64, alloc: f64) -> f64 {
    (1.0 - resource_ratio(usage, alloc)).max(0.0)
}

/// Normalizes a pre-computed latency score to `[0,1]`. Values above 1
/// are assumed to be on the integer scale and divided down.
pub fn prescored_subscore(raw: f64, scale: f64) -> f64 {
    let s = if raw > 1.0 && scale > 0.0 { raw / scale } else { raw };
    s.clamp(0.0, 1.0)
}

/// Maps the median of raw round-trip measurements (ms) to `[0,1]`:
/// `1 / (1 + (median/ref_ms)^alpha)`. Returns `None` when there are no
/// measurements.
pub fn raw_latency_subscore(samples: &[f64], ref_ms: f64, alpha: f64) -> Option<(f64, f64)> {
    let med = median(samples)?;
    let sub = 1.0 / (1.0 + (med / ref_ms.max(0.1)).powf(alpha));
    Some((sub, med))
}

fn median(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Weighted combination, rounded onto the integer scale.
pub fn combine(weights: &Weights, scale: i64, s_cpu: f64, s_mem: f64, s_lat: f64) -> i64 {
    let score = weights.cpu * s_cpu + weights.mem * s_mem + weights.lat * s_lat;
    (scale as f64 * score).round() as i64
}

/// Outcome of computing the latency sub-score. The fallback condition
/// is a named variant so callers and tests can tell which path was
/// taken, not just the numeric value.
#[derive(Debug, Clone, PartialEq)]
pub enum LatencyOutcome {
    /// Pre-scored mode delivered a usable normalized score.
    Prescored(f64),
    /// Raw mode measured enough targets to take a median.
    Measured { subscore: f64, median_ms: f64 },
    /// The signal was unavailable; the neutral sub-score applies.
    Fallback(FallbackReason),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    RequestFailed(String),
    NoTargets,
}

impl LatencyOutcome {
    pub fn subscore(&self) -> f64 {
        match self {
            LatencyOutcome::Prescored(s) => *s,
            LatencyOutcome::Measured { subscore, .. } => *subscore,
            LatencyOutcome::Fallback(_) => NEUTRAL_LATENCY,
        }
    }

    pub fn median_ms(&self) -> Option<f64> {
        match self {
            LatencyOutcome::Measured { median_ms, .. } => Some(*median_ms),
            _ => None,
        }
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::RequestFailed(err) => write!(f, "request failed: {}", err),
            FallbackReason::NoTargets => write!(f, "no latency targets"),
        }
    }
}

#[cfg(test)]
mod tests {

    //! - resource sub-scores clamp to [0,1] and cap overcommit
    //! - pre-scored normalization divides large scores, clamps
    //! - raw latency median and formula, empty set yields None
    //! - combine is deterministic and rounds onto the scale
    //! - LatencyOutcome exposes which path was taken

    use super::*;

    #[test]
    fn resource_subscore_basic() {
        assert_eq!(resource_subscore(1.0, 4.0), 0.75);
        assert_eq!(resource_subscore(0.0, 4.0), 1.0);
    }

    #[test]
    fn resource_subscore_caps_overcommit() {
        // ratio capped at 1.2, never drives the score below 0
        assert_eq!(resource_ratio(10.0, 1.0), 1.2);
        assert_eq!(resource_subscore(10.0, 1.0), 0.0);
    }

    #[test]
    fn resource_subscore_zero_allocatable() {
        // denominator floored, no division blowup
        assert_eq!(resource_subscore(1.0, 0.0), 0.0);
    }

    #[test]
    fn prescored_normalizes_large_scores() {
        assert_eq!(prescored_subscore(1500.0, 1000.0), 1.0);
        assert_eq!(prescored_subscore(300.0, 1000.0), 0.3);
        assert_eq!(prescored_subscore(0.3, 1000.0), 0.3);
        assert_eq!(prescored_subscore(-2.0, 1000.0), 0.0);
    }

    #[test]
    fn raw_latency_formula() {
        // median 10ms at ref 10ms, alpha 1 -> 0.5
        let (sub, med) = raw_latency_subscore(&[10.0], 10.0, 1.0).unwrap();
        assert_eq!(sub, 0.5);
        assert_eq!(med, 10.0);

        // zero latency -> perfect score
        let (sub, _) = raw_latency_subscore(&[0.0], 10.0, 1.0).unwrap();
        assert_eq!(sub, 1.0);
    }

    #[test]
    fn raw_latency_median_even_count() {
        let (_, med) = raw_latency_subscore(&[4.0, 1.0, 3.0, 2.0], 10.0, 1.0).unwrap();
        assert_eq!(med, 2.5);
    }

    #[test]
    fn raw_latency_empty_targets() {
        assert!(raw_latency_subscore(&[], 10.0, 1.0).is_none());
    }

    #[test]
    fn combine_rounds_onto_scale() {
        let w = Weights { cpu: 0.4, mem: 0.3, lat: 0.3 };
        assert_eq!(combine(&w, 1000, 1.0, 1.0, 1.0), 1000);
        assert_eq!(combine(&w, 1000, 0.5, 0.5, 0.5), 500);
        assert_eq!(combine(&w, 1000, 0.0, 0.0, 0.0), 0);
        // deterministic
        assert_eq!(
            combine(&w, 1000, 0.1, 0.2, 0.3),
            combine(&w, 1000, 0.1, 0.2, 0.3)
        );
    }

    #[test]
    fn outcome_paths() {
        let measured = LatencyOutcome::Measured { subscore: 0.8, median_ms: 2.0 };
        assert_eq!(measured.subscore(), 0.8);
        assert_eq!(measured.median_ms(), Some(2.0));

        let fallback = LatencyOutcome::Fallback(FallbackReason::NoTargets);
        assert_eq!(fallback.subscore(), NEUTRAL_LATENCY);
        assert_eq!(fallback.median_ms(), None);
    }
}
