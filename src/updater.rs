//! Discovers the admission object for each ranked job and patches its
//! priority field and annotations, in bounded parallel batches.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use kube::api::{Api, ApiResource, DynamicObject, ListParams, Patch, PatchParams};
use kube::Client;
use serde_json::json;

use crate::config::Config;
use crate::model::{ScoredJob, UpdateOutcome};

const BATCH_SIZE: usize = 10;
const ANNOTATION_SCORE: &str = "drf-scheduler/priority-score";
const ANNOTATION_RANK: &str = "drf-scheduler/rank";
const ANNOTATION_UPDATED_BY: &str = "drf-scheduler/updated-by";

fn workload_resource(config: &Config) -> ApiResource {
    ApiResource {
        group: config.workload_group.clone(),
        version: config.workload_version.clone(),
        api_version: format!("{}/{}", config.workload_group, config.workload_version),
        kind: "Workload".to_string(),
        plural: config.workload_plural.clone(),
    }
}

/// Patches every ranked job's admission object, 10 at a time, batches run
/// sequentially in rank order so lower-score (higher-priority) jobs are
/// dispatched first.
pub async fn update_all(client: Client, config: &Config, ranked: &[ScoredJob]) -> Vec<UpdateOutcome> {
    let resource = workload_resource(config);
    let discovery_api: Api<DynamicObject> = Api::all_with(client.clone(), &resource);

    let objects = match discovery_api.list(&ListParams::default()).await {
        Ok(list) => list.items,
        Err(err) => {
            tracing::error!(error = %err, "failed to list admission objects; no updates issued");
            return ranked
                .iter()
                .map(|scored| {
                    let patch_err = crate::error::ControllerError::PatchFailed {
                        namespace: scored.job.identity.namespace.clone(),
                        name: scored.job.identity.name.clone(),
                        reason: format!("failed to list admission objects: {err}"),
                    };
                    UpdateOutcome {
                        identity: scored.job.identity.clone(),
                        success: false,
                        reason: Some(patch_err.to_string()),
                    }
                })
                .collect();
        }
    };
    let objects = Arc::new(objects);

    let strict_discovery = config.strict_discovery;
    run_in_batches(ranked, BATCH_SIZE, move |rank, scored| {
        let client = client.clone();
        let resource = resource.clone();
        let objects = objects.clone();
        Box::pin(async move { patch_one(client, resource, &objects, strict_discovery, rank, &scored).await })
    })
    .await
}

fn find_admission_object<'a>(
    objects: &'a [DynamicObject],
    namespace: &str,
    name: &str,
    strict: bool,
) -> Option<&'a DynamicObject> {
    objects.iter().find(|obj| {
        let obj_name = obj.metadata.name.as_deref().unwrap_or_default();
        if strict {
            obj_name == name && obj.metadata.namespace.as_deref() == Some(namespace)
        } else {
            obj_name.contains(name)
        }
    })
}

async fn patch_one(
    client: Client,
    resource: ApiResource,
    objects: &[DynamicObject],
    strict_discovery: bool,
    rank: usize,
    scored: &ScoredJob,
) -> UpdateOutcome {
    let identity = scored.job.identity.clone();
    let object = match find_admission_object(objects, &identity.namespace, &identity.name, strict_discovery) {
        Some(obj) => obj,
        None => {
            let err = crate::error::ControllerError::NotFound {
                namespace: identity.namespace.clone(),
                name: identity.name.clone(),
            };
            tracing::warn!(job = %identity, error = %err, "NOT_FOUND");
            return UpdateOutcome { identity, success: false, reason: Some(err.to_string()) };
        }
    };

    let object_name = object.metadata.name.clone().unwrap_or_default();
    let object_namespace = object.metadata.namespace.clone().unwrap_or_default();

    let priority = (scored.score * 1000.0).round() as i64;
    let patch = json!({
        "spec": { "priority": priority },
        "metadata": {
            "annotations": {
                ANNOTATION_SCORE: scored.score.to_string(),
                ANNOTATION_RANK: rank.to_string(),
                ANNOTATION_UPDATED_BY: "drf-controller",
            }
        }
    });

    let api: Api<DynamicObject> = Api::namespaced_with(client, &object_namespace, &resource);
    match api.patch(&object_name, &PatchParams::default(), &Patch::Merge(patch)).await {
        Ok(_) => UpdateOutcome { identity, success: true, reason: None },
        Err(err) => {
            let patch_err = crate::error::ControllerError::PatchFailed {
                namespace: identity.namespace.clone(),
                name: identity.name.clone(),
                reason: err.to_string(),
            };
            tracing::error!(job = %identity, error = %patch_err, "PATCH_FAILED");
            UpdateOutcome { identity, success: false, reason: Some(patch_err.to_string()) }
        }
    }
}

/// Runs `f` over `items` in sequential batches of `batch_size`, awaiting a
/// full batch's concurrent dispatch before starting the next. `f` receives
/// a 1-based rank (position of the item in the overall input). Extracted
/// from [`update_all`] so the bounded-concurrency property is testable
/// without a cluster.
pub(crate) async fn run_in_batches<T, F, R>(items: &[T], batch_size: usize, f: F) -> Vec<R>
where
    T: Clone,
    F: Fn(usize, T) -> futures::future::BoxFuture<'static, R>,
{
    let mut results = Vec::with_capacity(items.len());
    for (batch_index, batch) in items.chunks(batch_size).enumerate() {
        let base_rank = batch_index * batch_size + 1;
        let batch_results: Vec<R> = stream::iter(batch.iter().cloned().enumerate())
            .map(|(offset, item)| f(base_rank + offset, item))
            .buffer_unordered(batch_size)
            .collect()
            .await;
        results.extend(batch_results);
    }
    results
}
