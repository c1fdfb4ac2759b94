//! Dominant Resource Fairness scoring with an aging term and a coarse
//! priority class. Pure: no I/O, no wall-clock read of its own — `now` is
//! always supplied by the caller so the function is deterministic in tests.

use chrono::{DateTime, Utc};

use crate::model::{ClusterSnapshot, JobRecord, ResourceKind, ScoredJob};

/// `max_k(request[k] / totals[k])` over kinds with positive cluster totals.
/// A kind with zero or absent total is skipped entirely, never treated as
/// an infinite share.
pub fn dominant_share(job: &JobRecord, cluster: &ClusterSnapshot) -> f64 {
    ResourceKind::ALL
        .iter()
        .filter_map(|&kind| {
            let total = cluster.totals.get(kind);
            (total > 0.0).then(|| job.request.get(kind) / total)
        })
        .fold(0.0_f64, f64::max)
}

/// `alpha * age_seconds`, with negative age (clock skew) clamped to zero.
pub fn aging_term(creation_instant: DateTime<Utc>, now: DateTime<Utc>, alpha: f64) -> f64 {
    let age_seconds = (now - creation_instant).num_milliseconds() as f64 / 1000.0;
    alpha * age_seconds.max(0.0)
}

/// `classWeight(priorityClass) + dominantShare - alpha * age_seconds`.
/// Lower score means higher priority.
pub fn score(job: &JobRecord, cluster: &ClusterSnapshot, now: DateTime<Utc>, alpha: f64) -> ScoredJob {
    let dominant_share = dominant_share(job, cluster);
    let aging_term = aging_term(job.creation_instant, now, alpha);
    let score = job.priority_class.weight() + dominant_share - aging_term;
    ScoredJob { job: job.clone(), dominant_share, aging_term, score }
}

/// Sorts scored jobs ascending by score, breaking ties by creation instant
/// ascending and then identity lexicographically. Stable across repeated
/// calls on identical input.
pub fn rank(mut scored: Vec<ScoredJob>) -> Vec<ScoredJob> {
    scored.sort_by(|a, b| {
        a.score
            .total_cmp(&b.score)
            .then_with(|| a.job.creation_instant.cmp(&b.job.creation_instant))
            .then_with(|| a.job.identity.cmp(&b.job.identity))
    });
    scored
}
