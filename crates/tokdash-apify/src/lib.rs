pub mod aggregate;
pub mod client;
pub mod error;
mod retry;
pub mod types;

pub use aggregate::{aggregate, aggregate_at};
pub use client::ApifyClient;
pub use error::ApifyError;
pub use types::{ActorInput, ActorRun, AuthorMeta, DatasetItem, RunStatus, VideoMeta};
