//! Lists pending batch jobs across all namespaces and extracts a
//! [`JobRecord`] from each. A job that cannot be converted is logged and
//! dropped; it never fails the tick.

use k8s_openapi::api::batch::v1::Job;
use kube::api::{Api, ListParams};
use kube::Client;

use crate::model::{GangInfo, JobIdentity, JobRecord, PriorityClass, ResourceKind, ResourceVector};
use crate::resource;

/// Lists pending jobs and extracts a [`JobRecord`] for each one that
/// succeeds. Extraction failures are logged at `warn!` and skipped.
pub async fn observe_jobs(client: Client) -> crate::error::Result<Vec<JobRecord>> {
    let api: Api<Job> = Api::all(client);
    let jobs = api
        .list(&ListParams::default())
        .await
        .map_err(|err| crate::error::ControllerError::ObserveFailed(err.to_string()))?;

    let mut records = Vec::new();
    for job in jobs.items {
        if !is_pending(&job) {
            continue;
        }
        let namespace = job.metadata.namespace.clone().unwrap_or_default();
        let name = job.metadata.name.clone().unwrap_or_default();
        match extract(&job) {
            Ok(record) => records.push(record),
            Err(err) => {
                tracing::warn!(namespace = %namespace, name = %name, error = %err, "skipping job: extraction failed");
            }
        }
    }
    Ok(records)
}

fn is_pending(job: &Job) -> bool {
    match job.status.as_ref().and_then(|status| status.conditions.as_ref()) {
        None => true,
        Some(conditions) if conditions.is_empty() => true,
        Some(conditions) => !conditions
            .iter()
            .any(|condition| matches!(condition.type_.as_str(), "Complete" | "Failed") && condition.status == "True"),
    }
}

fn extract(job: &Job) -> crate::error::Result<JobRecord> {
    let namespace = job.metadata.namespace.clone().unwrap_or_default();
    let name = job.metadata.name.clone().unwrap_or_default();
    let err = |reason: &str| crate::error::ControllerError::ExtractFailed {
        namespace: namespace.clone(),
        name: name.clone(),
        reason: reason.to_string(),
    };

    let creation_instant = job
        .metadata
        .creation_timestamp
        .as_ref()
        .map(|t| t.0)
        .ok_or_else(|| err("missing creation timestamp"))?;

    let annotations = job.metadata.annotations.clone().unwrap_or_default();
    let priority_class = if annotations.get("priority").map(String::as_str) == Some("approved") {
        PriorityClass::Urgent
    } else {
        PriorityClass::Normal
    };

    let gang_enabled = annotations
        .get("gang-scheduling")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    let gang_group_id = annotations.get("gang-id").cloned();
    let gang = GangInfo { enabled: gang_enabled, group_id: gang_group_id };

    let request = job
        .spec
        .as_ref()
        .and_then(|spec| spec.template.spec.as_ref())
        .and_then(|pod_spec| pod_spec.containers.first())
        .and_then(|container| container.resources.as_ref())
        .and_then(|resources| resources.requests.as_ref())
        .map(|requests| build_request_vector(requests))
        .unwrap_or_default();

    Ok(JobRecord {
        identity: JobIdentity { namespace, name },
        priority_class,
        creation_instant,
        request,
        gang,
    })
}

fn build_request_vector(
    requests: &std::collections::BTreeMap<String, k8s_openapi::apimachinery::pkg::api::resource::Quantity>,
) -> ResourceVector {
    let mut vector = ResourceVector::new();
    if let Some(cpu) = requests.get("cpu") {
        if let Ok(cores) = resource::parse_cpu(&cpu.0) {
            vector.set(ResourceKind::Cpu, cores);
        }
    }
    if let Some(memory) = requests.get("memory") {
        if let Ok(mebibytes) = resource::parse_memory(&memory.0) {
            vector.set(ResourceKind::Memory, mebibytes);
        }
    }
    if let Some(gpu) = requests.get("nvidia.com/gpu") {
        if let Ok(count) = resource::parse_accelerator(&gpu.0) {
            vector.set(ResourceKind::Accelerator, count);
        }
    }
    vector
}
