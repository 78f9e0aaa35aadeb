//! Apify request/response types for the TikTok profile scraper actor.
//!
//! ## Observed shape of dataset items
//!
//! The actor returns one flat item per video, with the author's profile-level
//! metadata embedded under `authorMeta` and video file details under
//! `videoMeta`. Items are not guaranteed to carry every field:
//!
//! - `authorMeta` may be an empty object (`{}`) when the actor could not
//!   resolve the profile; such items carry no usable author and are dropped
//!   during aggregation.
//! - Counter fields (`diggCount`, `playCount`, `fans`, ...) are plain
//!   integers when present and simply absent otherwise. `#[serde(default)]`
//!   maps absent to `0`, which is the defaulting rule the snapshot contract
//!   expects.
//! - `id` is a numeric string (TikTok video IDs exceed JavaScript's safe
//!   integer range, so the actor emits them as strings).
//! - `createTimeISO` is a millisecond-precision UTC string like
//!   `"2025-08-12T11:20:00.000Z"`; `createTime` is the same instant as epoch
//!   seconds.

use serde::{Deserialize, Serialize};

use tokdash_core::AppConfig;

/// Input document POSTed to the actor when starting a run.
///
/// Field names are the actor's wire contract. A base input is built once from
/// config with an empty `profiles` list; each fetch task derives its own via
/// [`ActorInput::for_profile`].
#[derive(Debug, Clone, Serialize)]
pub struct ActorInput {
    #[serde(rename = "excludePinnedPosts")]
    pub exclude_pinned_posts: bool,
    /// Fetch window, e.g. `"60 days"`.
    #[serde(rename = "oldestPostDateUnified")]
    pub oldest_post_date_unified: String,
    #[serde(rename = "profileScrapeSections")]
    pub profile_scrape_sections: Vec<String>,
    #[serde(rename = "profileSorting")]
    pub profile_sorting: String,
    pub profiles: Vec<String>,
    #[serde(rename = "proxyCountryCode")]
    pub proxy_country_code: String,
    #[serde(rename = "resultsPerPage")]
    pub results_per_page: u32,
    #[serde(rename = "scrapeRelatedVideos")]
    pub scrape_related_videos: bool,
    #[serde(rename = "shouldDownloadAvatars")]
    pub should_download_avatars: bool,
    #[serde(rename = "shouldDownloadCovers")]
    pub should_download_covers: bool,
    #[serde(rename = "shouldDownloadMusicCovers")]
    pub should_download_music_covers: bool,
    #[serde(rename = "shouldDownloadSlideshowImages")]
    pub should_download_slideshow_images: bool,
    #[serde(rename = "shouldDownloadSubtitles")]
    pub should_download_subtitles: bool,
    #[serde(rename = "shouldDownloadVideos")]
    pub should_download_videos: bool,
}

impl ActorInput {
    /// Base actor input from application config, with no profiles selected.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            exclude_pinned_posts: false,
            oldest_post_date_unified: format!("{} days", config.oldest_post_days),
            profile_scrape_sections: vec!["videos".to_string()],
            profile_sorting: "latest".to_string(),
            profiles: Vec::new(),
            proxy_country_code: "None".to_string(),
            results_per_page: config.results_per_page,
            scrape_related_videos: false,
            should_download_avatars: config.download_avatars,
            should_download_covers: config.download_covers,
            should_download_music_covers: false,
            should_download_slideshow_images: false,
            should_download_subtitles: false,
            should_download_videos: false,
        }
    }

    /// Per-profile input: identical configuration with `profiles` overridden
    /// to the singleton `[handle]`. One run per profile keeps failures
    /// isolated — a bad handle can only sink its own run.
    #[must_use]
    pub fn for_profile(&self, handle: &str) -> Self {
        let mut input = self.clone();
        input.profiles = vec![handle.to_string()];
        input
    }
}

/// Lifecycle status of an actor run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum RunStatus {
    #[serde(rename = "READY")]
    Ready,
    #[serde(rename = "RUNNING")]
    Running,
    #[serde(rename = "SUCCEEDED")]
    Succeeded,
    #[serde(rename = "FAILED")]
    Failed,
    #[serde(rename = "TIMING-OUT")]
    TimingOut,
    #[serde(rename = "TIMED-OUT")]
    TimedOut,
    #[serde(rename = "ABORTING")]
    Aborting,
    #[serde(rename = "ABORTED")]
    Aborted,
}

impl RunStatus {
    /// Terminal states: the run will make no further progress.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunStatus::Succeeded | RunStatus::Failed | RunStatus::TimedOut | RunStatus::Aborted
        )
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunStatus::Ready => "READY",
            RunStatus::Running => "RUNNING",
            RunStatus::Succeeded => "SUCCEEDED",
            RunStatus::Failed => "FAILED",
            RunStatus::TimingOut => "TIMING-OUT",
            RunStatus::TimedOut => "TIMED-OUT",
            RunStatus::Aborting => "ABORTING",
            RunStatus::Aborted => "ABORTED",
        };
        write!(f, "{s}")
    }
}

/// An actor run as reported by `POST /v2/acts/{id}/runs` and
/// `GET /v2/actor-runs/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ActorRun {
    pub id: String,
    pub status: RunStatus,
    #[serde(rename = "defaultDatasetId")]
    pub default_dataset_id: String,
}

/// Apify wraps single-object responses in a `data` envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct RunEnvelope {
    pub data: ActorRun,
}

/// Author metadata embedded in each dataset item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorMeta {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "nickName")]
    pub nick_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub fans: u64,
    #[serde(default)]
    pub following: u64,
    #[serde(default)]
    pub heart: u64,
    #[serde(default)]
    pub video: u64,
}

/// Video file metadata embedded in each dataset item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoMeta {
    #[serde(default, rename = "coverUrl")]
    pub cover_url: Option<String>,
}

/// One raw post-plus-author record from the actor's default dataset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetItem {
    #[serde(default)]
    pub id: Option<String>,
    /// Post caption.
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, rename = "createTime")]
    pub create_time: Option<i64>,
    #[serde(default, rename = "createTimeISO")]
    pub create_time_iso: Option<String>,
    #[serde(default, rename = "diggCount")]
    pub digg_count: u64,
    #[serde(default, rename = "shareCount")]
    pub share_count: u64,
    #[serde(default, rename = "commentCount")]
    pub comment_count: u64,
    #[serde(default, rename = "playCount")]
    pub play_count: u64,
    #[serde(default, rename = "collectCount")]
    pub collect_count: u64,
    #[serde(default, rename = "webVideoUrl")]
    pub web_video_url: Option<String>,
    #[serde(default, rename = "authorMeta")]
    pub author_meta: AuthorMeta,
    #[serde(default, rename = "videoMeta")]
    pub video_meta: VideoMeta,
}
