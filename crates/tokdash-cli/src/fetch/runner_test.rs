use super::*;

use tokdash_apify::{ActorInput, ApifyClient};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn base_input() -> ActorInput {
    ActorInput {
        exclude_pinned_posts: false,
        oldest_post_date_unified: "60 days".to_string(),
        profile_scrape_sections: vec!["videos".to_string()],
        profile_sorting: "latest".to_string(),
        profiles: Vec::new(),
        proxy_country_code: "None".to_string(),
        results_per_page: 100,
        scrape_related_videos: false,
        should_download_avatars: true,
        should_download_covers: true,
        should_download_music_covers: false,
        should_download_slideshow_images: false,
        should_download_subtitles: false,
        should_download_videos: false,
    }
}

fn test_ctx(base_url: &str) -> Arc<FetchContext> {
    let client = ApifyClient::with_base_url("test-token", 30, 0, 0, base_url)
        .expect("client construction should not fail");
    Arc::new(FetchContext {
        client,
        actor_id: "actor-1".to_string(),
        base_input: base_input(),
        run_wait_secs: 1,
        run_timeout_secs: 30,
    })
}

fn succeeded_run(dataset: &str) -> serde_json::Value {
    serde_json::json!({
        "data": {
            "id": format!("run-{dataset}"),
            "status": "SUCCEEDED",
            "defaultDatasetId": dataset
        }
    })
}

/// Profile `a` returns two items, profile `b`'s run submission blows up with
/// a 500. The collector must still deliver `a`'s items and absorb `b`'s
/// failure without an error escaping.
#[tokio::test]
async fn failed_profile_is_isolated_from_siblings() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/acts/actor-1/runs"))
        .and(body_partial_json(serde_json::json!({ "profiles": ["a"] })))
        .respond_with(ResponseTemplate::new(201).set_body_json(succeeded_run("ds-a")))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v2/acts/actor-1/runs"))
        .and(body_partial_json(serde_json::json!({ "profiles": ["b"] })))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/datasets/ds-a/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": "1", "playCount": 100, "authorMeta": { "name": "a" } },
            { "id": "2", "playCount": 50, "authorMeta": { "name": "a" } }
        ])))
        .mount(&server)
        .await;

    let ctx = test_ctx(&server.uri());
    let handles = vec!["a".to_string(), "b".to_string()];
    let items = collect_all(&ctx, 8, &handles).await;

    assert_eq!(items.len(), 2, "only profile a contributes items");

    let snapshot = tokdash_apify::aggregate(items, handles.len());
    assert_eq!(snapshot.profiles.len(), 1);
    assert_eq!(snapshot.profiles["a"].videos.len(), 2);
    let plays: Vec<u64> = snapshot
        .all_videos
        .iter()
        .map(|v| v.stats.play_count)
        .collect();
    assert_eq!(plays, vec![100, 50]);
    assert_eq!(
        snapshot.metadata.profile_count, 2,
        "metadata reports configured profiles, including the failed one"
    );
}

/// No mocks mounted: every request 404s. The collector must come back with
/// an empty union rather than an error.
#[tokio::test]
async fn all_profiles_failing_yields_empty_union() {
    let server = MockServer::start().await;

    let ctx = test_ctx(&server.uri());
    let handles = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    let items = collect_all(&ctx, 2, &handles).await;

    assert!(items.is_empty());
}

/// One handle's task panics outright. The panic must surface as a join error
/// inside the collector, not tear it down: the sibling's items still arrive
/// and the faulting handle contributes nothing.
#[tokio::test]
async fn panicking_task_contributes_no_items_and_spares_siblings() {
    let handles = vec!["steady".to_string(), "volatile".to_string()];

    let items = collect_all_with(&handles, 2, |handle| {
        tokio::spawn(async move {
            if handle == "volatile" {
                panic!("fetch task for {handle} blew up");
            }
            let item: DatasetItem = serde_json::from_value(serde_json::json!({
                "id": "1",
                "playCount": 42,
                "authorMeta": { "name": "steady" }
            }))
            .expect("valid item json");
            vec![item]
        })
    })
    .await;

    assert_eq!(items.len(), 1, "the faulting handle is absorbed as empty");
    assert_eq!(items[0].author_meta.name.as_deref(), Some("steady"));
}

/// A run that ends FAILED (terminal but unsuccessful) degrades the same way
/// as a transport error: zero items for that profile.
#[tokio::test]
async fn failed_run_status_contributes_no_items() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/acts/actor-1/runs"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "data": { "id": "run-x", "status": "FAILED", "defaultDatasetId": "ds-x" }
        })))
        .mount(&server)
        .await;

    let ctx = test_ctx(&server.uri());
    let handles = vec!["a".to_string()];
    let items = collect_all(&ctx, 1, &handles).await;

    assert!(items.is_empty());
}
