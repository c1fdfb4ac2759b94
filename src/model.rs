use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of resource kinds the scorer understands. Adding a kind is a
/// versioned change, not a runtime extension point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Cpu,
    Memory,
    Accelerator,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] =
        [ResourceKind::Cpu, ResourceKind::Memory, ResourceKind::Accelerator];

    fn index(self) -> usize {
        match self {
            ResourceKind::Cpu => 0,
            ResourceKind::Memory => 1,
            ResourceKind::Accelerator => 2,
        }
    }
}

/// A fixed-width numeric vector indexed by [`ResourceKind`]. A missing kind
/// reads as zero; this is the typed replacement for the source's
/// string-keyed resource dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceVector {
    values: [f64; 3],
}

impl ResourceVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: ResourceKind) -> f64 {
        self.values[kind.index()]
    }

    pub fn set(&mut self, kind: ResourceKind, amount: f64) {
        self.values[kind.index()] = amount;
    }

    pub fn with(mut self, kind: ResourceKind, amount: f64) -> Self {
        self.set(kind, amount);
        self
    }
}

/// A coarse, operator-visible override that dominates fine-grained scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PriorityClass {
    Urgent,
    Normal,
}

impl PriorityClass {
    /// `classWeight` from the scoring function. The spread between classes
    /// must exceed any realistic value of (dominantShare - aging).
    pub fn weight(self) -> f64 {
        match self {
            PriorityClass::Urgent => 0.0,
            PriorityClass::Normal => 1000.0,
        }
    }
}

/// A job's name/namespace pair, unique across the pending set observed in a
/// tick.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JobIdentity {
    pub namespace: String,
    pub name: String,
}

impl std::fmt::Display for JobIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Gang-scheduling metadata attached to a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GangInfo {
    pub enabled: bool,
    pub group_id: Option<String>,
}

impl GangInfo {
    pub fn none() -> Self {
        Self { enabled: false, group_id: None }
    }
}

/// The extracted, scorable view of a pending batch job. Constructed fresh
/// each tick and discarded at its end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub identity: JobIdentity,
    pub priority_class: PriorityClass,
    pub creation_instant: DateTime<Utc>,
    pub request: ResourceVector,
    pub gang: GangInfo,
}

/// Total and allocatable capacity aggregated across every node, immutable
/// for the tick it is taken in.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    pub totals: ResourceVector,
    pub allocatable: ResourceVector,
}

/// A job together with its computed dominant share, aging term, and final
/// score. Lower score means higher priority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredJob {
    pub job: JobRecord,
    pub dominant_share: f64,
    pub aging_term: f64,
    pub score: f64,
}

/// The outcome of one admission-object patch attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateOutcome {
    pub identity: JobIdentity,
    pub success: bool,
    pub reason: Option<String>,
}
