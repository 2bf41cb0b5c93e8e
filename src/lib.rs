pub mod cli;
pub mod config;
pub mod core;
pub mod extractors;
pub mod utils;

pub use crate::core::{Item, Pipeline, PipelineOptions, RunReport, VideoMetadata};
pub use crate::extractors::{GoogleSheetSource, YouTubeDataApi};
