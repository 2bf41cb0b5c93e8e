pub mod duration;
pub mod item;
pub mod metadata;
pub mod pipeline;
pub mod publisher;
pub mod render;
pub mod source;

pub use duration::format_duration;
pub use item::{merge_metadata, normalize_row, parse_rows, Item, SourceRow};
pub use metadata::{fetch_metadata, MetadataError, MetadataMap, VideoApi, VideoMetadata, BATCH_SIZE};
pub use pipeline::{Pipeline, PipelineError, PipelineOptions, PublishOutcome, RunReport};
pub use publisher::{FtpPublisher, FtpSettings, PublishError, Publisher};
pub use render::{render_page, PageSettings};
pub use source::{SourceError, TableSource};
