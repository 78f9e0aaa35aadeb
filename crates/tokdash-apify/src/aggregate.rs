//! Folds raw dataset items into the normalized dashboard snapshot.
//!
//! Items arrive as one flat list (the union of all per-profile fetches, in
//! whatever order the fetch tasks completed). Aggregation groups them by the
//! embedded author, creates one author record per distinct handle, and builds
//! the global play-count ranking. This phase is single-threaded by design:
//! all shared-state mutation happens here, after collection, so the fetch
//! tasks never need to coordinate.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};

use tokdash_core::snapshot::{AuthorProfile, Snapshot, SnapshotMetadata, Video, VideoStats};

use crate::types::{AuthorMeta, DatasetItem};

/// Aggregates raw items into a [`Snapshot`] stamped with the current time.
///
/// `profile_count` is the number of *configured* profiles for the run, which
/// the snapshot metadata reports regardless of how many profiles actually
/// returned data.
#[must_use]
pub fn aggregate(items: Vec<DatasetItem>, profile_count: usize) -> Snapshot {
    aggregate_at(items, profile_count, Utc::now())
}

/// Aggregation core with an explicit timestamp, so tests can pin the clock.
///
/// Pure: identical `items` and `profile_count` always produce identical
/// `profiles` and `all_videos`.
///
/// Rules, in input order per item:
/// - an item whose `authorMeta.name` is absent or empty is discarded;
/// - the first item seen for an author creates that author's record from its
///   embedded metadata; later items never overwrite profile-level fields;
/// - each kept item yields one [`Video`], appended to both the author's list
///   and the ranking candidates, preserving input order;
/// - finally the ranking is sorted by play count descending. `sort_by` is
///   stable, so equal play counts keep their input order and the output is
///   deterministic across runs.
#[must_use]
pub fn aggregate_at(
    items: Vec<DatasetItem>,
    profile_count: usize,
    now: DateTime<Utc>,
) -> Snapshot {
    let mut profiles: BTreeMap<String, AuthorProfile> = BTreeMap::new();
    let mut all_videos: Vec<Video> = Vec::new();

    for item in items {
        let Some(author_name) = item.author_meta.name.clone().filter(|n| !n.is_empty()) else {
            continue;
        };

        let profile = profiles
            .entry(author_name.clone())
            .or_insert_with(|| author_profile_from(&item.author_meta, &author_name));

        let video = video_from(&item, &author_name);
        profile.videos.push(video.clone());
        all_videos.push(video);
    }

    all_videos.sort_by(|a, b| b.stats.play_count.cmp(&a.stats.play_count));

    Snapshot {
        metadata: SnapshotMetadata {
            last_updated: now.to_rfc3339_opts(SecondsFormat::Secs, true),
            profile_count,
        },
        profiles,
        all_videos,
    }
}

/// Author record from the first item seen for this handle. Numeric fields
/// were already defaulted to 0 at deserialization when absent.
fn author_profile_from(meta: &AuthorMeta, name: &str) -> AuthorProfile {
    AuthorProfile {
        name: name.to_owned(),
        nickname: meta.nick_name.clone(),
        avatar: meta.avatar.clone(),
        signature: meta.signature.clone(),
        fans: meta.fans,
        following: meta.following,
        heart: meta.heart,
        video: meta.video,
        videos: Vec::new(),
    }
}

fn video_from(item: &DatasetItem, author: &str) -> Video {
    Video {
        id: item.id.clone(),
        desc: item.text.clone(),
        create_time: item.create_time,
        create_time_iso: item.create_time_iso.clone(),
        stats: VideoStats {
            digg_count: item.digg_count,
            share_count: item.share_count,
            comment_count: item.comment_count,
            play_count: item.play_count,
            collect_count: item.collect_count,
        },
        video_url: item.web_video_url.clone(),
        cover_url: item.video_meta.cover_url.clone(),
        author: author.to_owned(),
    }
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
