use crate::core::item::{merge_metadata, normalize_row, parse_rows, Item};
use crate::core::metadata::{fetch_metadata, MetadataMap, VideoApi};
use crate::core::publisher::Publisher;
use crate::core::render::{render_page, PageSettings};
use crate::core::source::{SourceError, TableSource};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("fetching the source table failed: {0}")]
    Source(#[from] SourceError),
    #[error("writing {} failed: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Published(String),
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub output_path: PathBuf,
    pub items: usize,
    pub identifiers: usize,
    pub enriched: usize,
    pub publish: PublishOutcome,
}

/// Everything one run needs, supplied by the caller.
pub struct PipelineOptions {
    pub api_key: Option<String>,
    pub placeholder_image: String,
    pub page: PageSettings,
    pub output_path: PathBuf,
}

pub struct Pipeline {
    source: Box<dyn TableSource>,
    video_api: Box<dyn VideoApi>,
    publisher: Option<Box<dyn Publisher>>,
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(
        source: Box<dyn TableSource>,
        video_api: Box<dyn VideoApi>,
        publisher: Option<Box<dyn Publisher>>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            source,
            video_api,
            publisher,
            options,
        }
    }

    /// Read the table and normalize every row, in order.
    pub async fn load_items(&self) -> Result<Vec<Item>, SourceError> {
        let text = self.source.fetch_csv().await?;
        let rows = parse_rows(&text)?;
        Ok(rows
            .iter()
            .map(|row| normalize_row(row, &self.options.placeholder_image))
            .collect())
    }

    /// Metadata for `ids`; any failure degrades to an empty map.
    async fn lookup_metadata(&self, ids: &[String]) -> MetadataMap {
        let api_key = self.options.api_key.as_deref();
        if !ids.is_empty() && api_key.map_or(true, str::is_empty) {
            info!("No YouTube API key configured, skipping metadata lookup");
        }

        match fetch_metadata(&*self.video_api, ids, api_key).await {
            Ok(metadata) => metadata,
            Err(err) => {
                warn!(
                    "YouTube metadata lookup failed, continuing without it ({} entries discarded): {}",
                    err.partial.len(),
                    err
                );
                MetadataMap::new()
            }
        }
    }

    /// Fetch, enrich, render, write and publish once.
    pub async fn run(&self) -> Result<RunReport, PipelineError> {
        let mut items = self.load_items().await?;
        let identifiers: Vec<String> = items
            .iter()
            .filter_map(|item| item.identifier.clone())
            .collect();
        info!("Loaded {} rows, {} with a video id", items.len(), identifiers.len());

        let metadata = self.lookup_metadata(&identifiers).await;
        let enriched = merge_metadata(&mut items, &metadata);

        let html = render_page(&items, &self.options.page);
        let output_path = self.options.output_path.clone();
        tokio::fs::write(&output_path, html)
            .await
            .map_err(|source| PipelineError::Write {
                path: output_path.clone(),
                source,
            })?;
        info!("Wrote {}", output_path.display());

        let publish = match &self.publisher {
            None => PublishOutcome::Skipped,
            Some(publisher) => match publisher.publish(&output_path).await {
                Ok(target) => {
                    info!("Published to {}", target);
                    PublishOutcome::Published(target)
                }
                Err(err) => {
                    warn!("Publishing failed, keeping local copy: {}", err);
                    PublishOutcome::Failed(err.to_string())
                }
            },
        };

        Ok(RunReport {
            output_path,
            items: items.len(),
            identifiers: identifiers.len(),
            enriched,
            publish,
        })
    }
}
