//! Lists nodes and aggregates per-kind capacity and allocatable totals into
//! a single [`ClusterSnapshot`].

use k8s_openapi::api::core::v1::Node;
use kube::api::{Api, ListParams};
use kube::Client;

use crate::error::{ControllerError, Result};
use crate::model::{ClusterSnapshot, ResourceKind, ResourceVector};
use crate::resource;

/// Lists all nodes and sums `status.capacity` into `totals` and
/// `status.allocatable` into `allocatable`. A node contributing no value
/// for a kind contributes zero. Listing failure aborts the tick.
pub async fn observe_cluster(client: Client) -> Result<ClusterSnapshot> {
    let api: Api<Node> = Api::all(client);
    let nodes = api
        .list(&ListParams::default())
        .await
        .map_err(|err| ControllerError::ObserveFailed(err.to_string()))?;

    let mut totals = ResourceVector::new();
    let mut allocatable = ResourceVector::new();

    for node in nodes.items {
        if let Some(status) = &node.status {
            if let Some(capacity) = &status.capacity {
                accumulate(&mut totals, capacity);
            }
            if let Some(alloc) = &status.allocatable {
                accumulate(&mut allocatable, alloc);
            }
        }
    }

    Ok(ClusterSnapshot { totals, allocatable })
}

fn accumulate(
    vector: &mut ResourceVector,
    quantities: &std::collections::BTreeMap<String, k8s_openapi::apimachinery::pkg::api::resource::Quantity>,
) {
    if let Some(cpu) = quantities.get("cpu") {
        if let Ok(cores) = resource::parse_cpu(&cpu.0) {
            vector.set(ResourceKind::Cpu, vector.get(ResourceKind::Cpu) + cores);
        }
    }
    if let Some(memory) = quantities.get("memory") {
        if let Ok(mebibytes) = resource::parse_memory(&memory.0) {
            vector.set(ResourceKind::Memory, vector.get(ResourceKind::Memory) + mebibytes);
        }
    }
    if let Some(gpu) = quantities.get("nvidia.com/gpu") {
        if let Ok(count) = resource::parse_accelerator(&gpu.0) {
            vector.set(ResourceKind::Accelerator, vector.get(ResourceKind::Accelerator) + count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::api::resource::Quantity;

    #[test]
    fn accumulate_sums_known_kinds_and_ignores_absent() {
        let mut vector = ResourceVector::new();
        let mut quantities = std::collections::BTreeMap::new();
        quantities.insert("cpu".to_string(), Quantity("4".to_string()));
        quantities.insert("memory".to_string(), Quantity("8Gi".to_string()));
        accumulate(&mut vector, &quantities);
        assert_eq!(vector.get(ResourceKind::Cpu), 4.0);
        assert_eq!(vector.get(ResourceKind::Memory), 8192.0);
        assert_eq!(vector.get(ResourceKind::Accelerator), 0.0);
    }

    #[test]
    fn accumulate_is_additive_across_nodes() {
        let mut vector = ResourceVector::new();
        let mut first = std::collections::BTreeMap::new();
        first.insert("cpu".to_string(), Quantity("4".to_string()));
        let mut second = std::collections::BTreeMap::new();
        second.insert("cpu".to_string(), Quantity("8".to_string()));
        accumulate(&mut vector, &first);
        accumulate(&mut vector, &second);
        assert_eq!(vector.get(ResourceKind::Cpu), 12.0);
    }
}
