//! Concurrent fan-out over the tracked profiles.
//!
//! One task per profile, bounded concurrency, single barrier join. Tasks
//! share nothing mutable: each produces its own item list, and merging
//! happens here after all tasks are terminal.

use std::sync::Arc;

use futures::stream::{self, StreamExt};

use tokdash_apify::types::DatasetItem;

use super::{profile, FetchContext};

/// Fetches every handle concurrently and returns the union of all per-profile
/// item lists, in task completion order.
///
/// Each fetch runs inside `tokio::spawn` so that a panicking task surfaces as
/// a `JoinError` in [`collect_all_with`] instead of tearing down the
/// collector.
pub(crate) async fn collect_all(
    ctx: &Arc<FetchContext>,
    max_concurrent: usize,
    handles: &[String],
) -> Vec<DatasetItem> {
    collect_all_with(handles, max_concurrent, |handle| {
        let ctx = Arc::clone(ctx);
        tokio::spawn(profile::fetch_profile_items(ctx, handle))
    })
    .await
}

/// Collector core, generic over how a per-handle fetch task is spawned so the
/// fault handling can be exercised with tasks that misbehave on purpose.
///
/// Concurrency is bounded by `max_concurrent` (clamped to the handle count
/// and at least 1). A task that faults (`JoinError`, i.e. a panic) is logged
/// with the responsible handle and that profile contributes zero items.
/// Siblings are never cancelled.
///
/// Returns only after every spawned task has reached a terminal state.
async fn collect_all_with<F>(
    handles: &[String],
    max_concurrent: usize,
    spawn_fetch: F,
) -> Vec<DatasetItem>
where
    F: Fn(String) -> tokio::task::JoinHandle<Vec<DatasetItem>>,
{
    let concurrency = max_concurrent.min(handles.len()).max(1);

    let spawn_fetch = &spawn_fetch;
    let results: Vec<(String, Result<Vec<DatasetItem>, tokio::task::JoinError>)> =
        stream::iter(handles.iter().cloned())
            .map(move |handle| async move {
                // Spawn inside the buffered future so the bound applies to
                // running fetches, not just to result collection.
                let task = spawn_fetch(handle.clone());
                (handle, task.await)
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;

    let mut all_items: Vec<DatasetItem> = Vec::new();
    let mut empty_profiles: Vec<String> = Vec::new();

    for (handle, outcome) in results {
        match outcome {
            Ok(items) => {
                if items.is_empty() {
                    empty_profiles.push(handle);
                }
                all_items.extend(items);
            }
            Err(e) => {
                tracing::error!(profile = %handle, error = %e, "fetch task fault; profile contributes no items");
                empty_profiles.push(handle);
            }
        }
    }

    if !empty_profiles.is_empty() {
        // The snapshot cannot distinguish "no recent posts" from "fetch
        // failed", so name the gaps here.
        tracing::warn!(
            profiles = ?empty_profiles,
            total_profiles = handles.len(),
            "profiles contributed zero items this run"
        );
    }

    all_items
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
