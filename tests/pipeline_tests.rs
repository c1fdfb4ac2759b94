use chrono::{Duration, Utc};
use drf_controller::{
    gang, score, ClusterSnapshot, GangInfo, JobIdentity, JobRecord, PriorityClass, ResourceKind,
    ResourceVector,
};

fn job(name: &str, class: PriorityClass, age_seconds: i64, gang: GangInfo, request: ResourceVector) -> JobRecord {
    JobRecord {
        identity: JobIdentity { namespace: "default".into(), name: name.into() },
        priority_class: class,
        creation_instant: Utc::now() - Duration::seconds(age_seconds),
        request,
        gang,
    }
}

fn snapshot(cpu: f64, gpu: f64, mem: f64) -> ClusterSnapshot {
    ClusterSnapshot {
        totals: ResourceVector::new()
            .with(ResourceKind::Cpu, cpu)
            .with(ResourceKind::Accelerator, gpu)
            .with(ResourceKind::Memory, mem),
        allocatable: ResourceVector::new(),
    }
}

#[test]
fn gang_admissibility_then_scoring_end_to_end() {
    let cluster = snapshot(32.0, 8.0, 131072.0);

    let g1a = job(
        "g1-a",
        PriorityClass::Normal,
        0,
        GangInfo { enabled: true, group_id: Some("g1".into()) },
        ResourceVector::new().with(ResourceKind::Cpu, 2.0),
    );
    let g1b = job(
        "g1-b",
        PriorityClass::Normal,
        0,
        GangInfo { enabled: true, group_id: Some("g1".into()) },
        ResourceVector::new().with(ResourceKind::Cpu, 2.0),
    );
    let h1 = job(
        "h1",
        PriorityClass::Urgent,
        0,
        GangInfo::none(),
        ResourceVector::new().with(ResourceKind::Cpu, 1.0),
    );

    // Full gang present: all three pass the filter.
    let admissible = gang::filter(vec![g1a.clone(), g1b.clone(), h1.clone()]);
    assert_eq!(admissible.len(), 3);

    let scored: Vec<_> = admissible
        .into_iter()
        .map(|j| score::score(&j, &cluster, Utc::now(), 0.1))
        .collect();
    let ranked = score::rank(scored);
    assert_eq!(ranked[0].job.identity.name, "h1"); // urgent dominates regardless of share

    // Partial gang: g1-a's sibling is missing, so the gang is dropped.
    let partial = gang::filter(vec![g1a, h1]);
    let names: Vec<_> = partial.iter().map(|j| j.identity.name.clone()).collect();
    assert_eq!(names, vec!["h1"]);
}

#[test]
fn empty_pending_set_scores_nothing() {
    let admissible = gang::filter(Vec::new());
    assert!(admissible.is_empty());
}

#[test]
fn ranking_total_order_is_reproducible() {
    let cluster = snapshot(32.0, 8.0, 131072.0);
    let jobs = vec![
        job("a", PriorityClass::Normal, 5, GangInfo::none(), ResourceVector::new().with(ResourceKind::Cpu, 1.0)),
        job("b", PriorityClass::Normal, 5, GangInfo::none(), ResourceVector::new().with(ResourceKind::Cpu, 1.0)),
        job("c", PriorityClass::Urgent, 0, GangInfo::none(), ResourceVector::new().with(ResourceKind::Cpu, 16.0)),
    ];
    let now = Utc::now();
    let scored: Vec<_> = jobs.iter().map(|j| score::score(j, &cluster, now, 0.1)).collect();

    let first_pass = score::rank(scored.clone());
    let second_pass = score::rank(scored);
    assert_eq!(first_pass, second_pass);
    // "a" and "b" are identical in class/age/share, broken by identity.
    let normal_order: Vec<_> = first_pass
        .iter()
        .filter(|s| s.job.priority_class == PriorityClass::Normal)
        .map(|s| s.job.identity.name.clone())
        .collect();
    assert_eq!(normal_order, vec!["a", "b"]);
}
