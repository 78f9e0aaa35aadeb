//! Fetch command: one concurrent collection pass over all tracked profiles.
//!
//! Per-profile failures are logged and degrade to an empty item set rather
//! than propagated, so a single bad profile never aborts the run. Only
//! configuration and snapshot-write failures are fatal.

mod persist;
mod profile;
mod runner;

use std::sync::Arc;

use anyhow::Context as _;

use tokdash_apify::{ActorInput, ApifyClient};
use tokdash_core::AppConfig;

/// Shared, immutable dependencies for the per-profile fetch tasks: the Apify
/// client, the actor to run, and the base run input (profiles left empty).
pub(crate) struct FetchContext {
    pub client: ApifyClient,
    pub actor_id: String,
    pub base_input: ActorInput,
    pub run_wait_secs: u64,
    pub run_timeout_secs: u64,
}

impl FetchContext {
    pub(crate) fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let client = ApifyClient::new(
            &config.apify_api_token,
            // The request timeout must outlast the waitForFinish long-poll.
            config.request_timeout_secs.max(config.run_wait_secs + 10),
            config.max_retries,
            config.retry_backoff_base_ms,
        )
        .context("constructing Apify client")?;

        Ok(Self {
            client,
            actor_id: config.actor_id.clone(),
            base_input: ActorInput::from_config(config),
            run_wait_secs: config.run_wait_secs,
            run_timeout_secs: config.run_timeout_secs,
        })
    }
}

/// Fetch all tracked profiles concurrently, aggregate, and write the snapshot.
///
/// When `dry_run` is `true` the function prints the handles that would be
/// fetched and returns without contacting Apify.
///
/// # Errors
///
/// Returns an error if the profiles file cannot be loaded, the client cannot
/// be constructed, or the snapshot cannot be written. Per-profile fetch
/// failures are logged and degrade to empty results, not propagated.
pub(crate) async fn run_fetch(config: &AppConfig, dry_run: bool) -> anyhow::Result<()> {
    let profiles_file = tokdash_core::load_profiles(&config.profiles_path)?;
    let handles: Vec<String> = profiles_file
        .profiles
        .iter()
        .map(tokdash_core::ProfileConfig::normalized_handle)
        .collect();

    if handles.is_empty() {
        println!("no profiles configured; nothing to fetch");
        return Ok(());
    }

    if dry_run {
        println!(
            "dry-run: would fetch {} profiles: [{}]",
            handles.len(),
            handles.join(", ")
        );
        return Ok(());
    }

    let ctx = Arc::new(FetchContext::from_config(config)?);
    let items = runner::collect_all(&ctx, config.max_concurrent_profiles, &handles).await;

    let snapshot = tokdash_apify::aggregate(items, handles.len());
    persist::write_snapshot(&config.output_path, &snapshot)?;

    println!(
        "wrote {} videos across {} profiles to {}",
        snapshot.all_videos.len(),
        snapshot.profiles.len(),
        config.output_path.display()
    );
    Ok(())
}
