//! Drives one tick (observe -> filter -> score -> rank -> update), sleeps
//! the configured interval, and handles cooperative shutdown. Ticks never
//! overlap and no entity survives past the tick that created it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use kube::Client;
use tokio::sync::watch;

use crate::config::Config;
use crate::gang;
use crate::model::{JobRecord, ScoredJob};
use crate::observer;
use crate::score;
use crate::updater;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickSummary {
    pub tick: u64,
    pub observed: usize,
    pub admissible: usize,
    pub updated: usize,
    pub failed: usize,
}

/// Runs ticks until `shutdown` reports `true`. Shutdown is observed
/// promptly: it races the inter-tick sleep rather than only being checked
/// at the top of the loop.
pub async fn run(client: Client, config: Config, mut shutdown: watch::Receiver<bool>) {
    let tick_counter = AtomicU64::new(0);

    loop {
        if *shutdown.borrow() {
            tracing::info!("shutdown observed, exiting reconciliation loop");
            return;
        }

        let tick = tick_counter.fetch_add(1, Ordering::SeqCst) + 1;
        let summary = run_tick(tick, &client, &config).await;
        tracing::info!(
            tick = summary.tick,
            observed = summary.observed,
            admissible = summary.admissible,
            updated = summary.updated,
            failed = summary.failed,
            "Updated Kueue priorities for {}/{} jobs",
            summary.updated,
            summary.admissible,
        );

        let sleep = tokio::time::sleep(Duration::from_secs(config.scheduling_interval_secs));
        tokio::select! {
            _ = sleep => {}
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    tracing::info!("shutdown observed during sleep, exiting reconciliation loop");
                    return;
                }
            }
        }
    }
}

#[tracing::instrument(skip(client, config), fields(tick))]
async fn run_tick(tick: u64, client: &Client, config: &Config) -> TickSummary {
    let jobs = match observer::observe_jobs(client.clone()).await {
        Ok(jobs) => jobs,
        Err(err) => {
            tracing::error!(error = %err, "job observation failed; tick aborted");
            return TickSummary { tick, ..Default::default() };
        }
    };
    let observed = jobs.len();
    if jobs.is_empty() {
        return TickSummary { tick, observed, ..Default::default() };
    }

    let cluster = match observer::observe_cluster(client.clone()).await {
        Ok(cluster) => cluster,
        Err(err) => {
            tracing::error!(error = %err, "cluster observation failed; tick aborted");
            return TickSummary { tick, observed, ..Default::default() };
        }
    };

    let filtered: Vec<JobRecord> = gang::filter(jobs);
    let admissible = filtered.len();

    let now = Utc::now();
    let scored: Vec<ScoredJob> = filtered
        .into_iter()
        .map(|job| score::score(&job, &cluster, now, config.aging_alpha))
        .collect();
    let ranked = score::rank(scored);

    if !config.kueue_enabled {
        tracing::info!("Kueue integration disabled; scored and ranked but issued no updates");
        return TickSummary { tick, observed, admissible, ..Default::default() };
    }

    let outcomes = updater::update_all(client.clone(), config, &ranked).await;
    let updated = outcomes.iter().filter(|o| o.success).count();
    let failed = outcomes.len() - updated;

    TickSummary { tick, observed, admissible, updated, failed }
}
