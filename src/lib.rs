pub mod config;
pub mod error;
pub mod gang;
pub mod model;
pub mod observer;
pub mod reconcile;
pub mod resource;
pub mod score;
pub mod updater;

pub use config::Config;
pub use error::ControllerError;
pub use model::{
    ClusterSnapshot, GangInfo, JobIdentity, JobRecord, PriorityClass, ResourceKind,
    ResourceVector, ScoredJob, UpdateOutcome,
};
pub use reconcile::{run, TickSummary};
