//! Output snapshot model for the dashboard data file.
//!
//! The JSON shape is a compatibility contract with the dashboard that reads
//! `data.json`: top-level keys `metadata`, `profiles`, `all_videos`, with the
//! camelCase video field names emitted by the TikTok scraper. Field names must
//! not change without coordinating a dashboard migration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// ISO-8601 timestamp of the run that produced this snapshot.
    pub last_updated: String,
    /// Number of *configured* profiles, not the number that returned data.
    /// Under partial failure these can diverge; coverage gaps are surfaced
    /// in logs, not here, to keep the file shape stable for consumers.
    pub profile_count: usize,
}

/// Per-post engagement counters used for the global ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStats {
    pub digg_count: u64,
    pub share_count: u64,
    pub comment_count: u64,
    pub play_count: u64,
    pub collect_count: u64,
}

/// One normalized post. Appears once in its author's `videos` list and once
/// in the snapshot's `all_videos` ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: Option<String>,
    pub desc: Option<String>,
    #[serde(rename = "createTime")]
    pub create_time: Option<i64>,
    #[serde(rename = "createTimeISO")]
    pub create_time_iso: Option<String>,
    pub stats: VideoStats,
    #[serde(rename = "videoUrl")]
    pub video_url: Option<String>,
    #[serde(rename = "coverUrl")]
    pub cover_url: Option<String>,
    /// Handle of the owning author; resolves to a key in `Snapshot::profiles`.
    pub author: String,
}

/// One distinct author observed during a run.
///
/// The numeric fields are the provider-reported profile-level totals at fetch
/// time, not recomputed from the fetched posts — posts older than the fetch
/// window are excluded from `videos` while `fans` is current.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorProfile {
    pub name: String,
    pub nickname: Option<String>,
    pub avatar: Option<String>,
    pub signature: Option<String>,
    pub fans: u64,
    pub following: u64,
    pub heart: u64,
    pub video: u64,
    /// Posts in the order the provider returned them.
    pub videos: Vec<Video>,
}

/// The run's sole output: author records keyed by handle plus a global
/// ranking of every post sorted by play count descending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub metadata: SnapshotMetadata,
    pub profiles: BTreeMap<String, AuthorProfile>,
    pub all_videos: Vec<Video>,
}
