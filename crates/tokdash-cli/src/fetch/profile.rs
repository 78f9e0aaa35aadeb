//! Per-profile fetch: one actor run per handle, failure absorbed locally.

use std::sync::Arc;

use tokdash_apify::types::DatasetItem;

use super::FetchContext;

/// Runs the scraper actor for a single profile and returns its raw items.
///
/// The run input is the shared base input with `profiles` overridden to the
/// singleton `[handle]`, so this profile's run is fully isolated from its
/// siblings.
///
/// Infallible by contract: every failure mode — submission error, a run that
/// ends FAILED/ABORTED, the per-run deadline, item retrieval — is logged with
/// the handle and converted to an empty item list. That uniform
/// degraded-but-valid result is what lets the collector merge results without
/// caring which profiles broke.
pub(crate) async fn fetch_profile_items(ctx: Arc<FetchContext>, handle: String) -> Vec<DatasetItem> {
    let input = ctx.base_input.for_profile(&handle);

    let run = match ctx
        .client
        .run_actor_to_completion(
            &ctx.actor_id,
            &input,
            ctx.run_wait_secs,
            ctx.run_timeout_secs,
        )
        .await
    {
        Ok(run) => run,
        Err(e) => {
            tracing::error!(profile = %handle, error = %e, "actor run failed; profile contributes no items");
            return Vec::new();
        }
    };

    match ctx.client.dataset_items(&run.default_dataset_id).await {
        Ok(items) => {
            tracing::info!(profile = %handle, run_id = %run.id, items = items.len(), "fetched profile items");
            items
        }
        Err(e) => {
            tracing::error!(profile = %handle, run_id = %run.id, error = %e, "dataset retrieval failed; profile contributes no items");
            Vec::new()
        }
    }
}
