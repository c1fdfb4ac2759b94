use thiserror::Error;

/// Errors raised anywhere in the controller's scoring and synchronization
/// pipeline. Most variants are per-item and never abort a tick; see each
/// call site for how it is handled.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("malformed resource quantity `{0}`")]
    MalformedQuantity(String),

    #[error("failed to extract job record for `{namespace}/{name}`: {reason}")]
    ExtractFailed { namespace: String, name: String, reason: String },

    #[error("observation failed: {0}")]
    ObserveFailed(String),

    #[error("no admission object found for job `{namespace}/{name}`")]
    NotFound { namespace: String, name: String },

    #[error("patch failed for admission object of job `{namespace}/{name}`: {reason}")]
    PatchFailed { namespace: String, name: String, reason: String },

    #[error("failed to build kube client: {0}")]
    KubeClient(String),
}

pub type Result<T> = std::result::Result<T, ControllerError>;
