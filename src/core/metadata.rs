use async_trait::async_trait;
use std::collections::HashMap;

/// Upper bound on ids per request accepted by the videos endpoint.
pub const BATCH_SIZE: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoMetadata {
    /// ISO-8601 duration such as `PT1H2M30S`.
    pub raw_duration: Option<String>,
    /// ISO-8601 timestamp such as `2009-10-25T06:57:33Z`.
    pub published_at: Option<String>,
}

/// Metadata keyed by video id. A missing key means "unknown".
pub type MetadataMap = HashMap<String, VideoMetadata>;

/// One request against the video platform for a single batch of ids.
#[async_trait]
pub trait VideoApi: Send + Sync {
    async fn list_videos(
        &self,
        ids: &[String],
        api_key: &str,
    ) -> anyhow::Result<Vec<(String, VideoMetadata)>>;
}

#[derive(Debug, thiserror::Error)]
#[error("metadata request for batch {batch} failed: {source}")]
pub struct MetadataError {
    /// Zero-based index of the batch that failed.
    pub batch: usize,
    /// Everything merged from the batches before `batch`.
    pub partial: MetadataMap,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

/// Look up duration and publish time for every id, at most [`BATCH_SIZE`]
/// ids per request, in the order given.
///
/// Without an api key or without ids nothing is requested and the map is
/// empty. The first failing batch aborts the whole call; batches merged
/// before it travel with the error in [`MetadataError::partial`].
pub async fn fetch_metadata<A>(
    api: &A,
    ids: &[String],
    api_key: Option<&str>,
) -> Result<MetadataMap, MetadataError>
where
    A: VideoApi + ?Sized,
{
    let mut out = MetadataMap::new();

    let api_key = match api_key {
        Some(key) if !key.is_empty() => key,
        _ => return Ok(out),
    };

    for (batch, chunk) in ids.chunks(BATCH_SIZE).enumerate() {
        let videos = match api.list_videos(chunk, api_key).await {
            Ok(videos) => videos,
            Err(source) => {
                return Err(MetadataError {
                    batch,
                    partial: out,
                    source: source.into(),
                })
            }
        };

        tracing::debug!("Batch {}: {} of {} ids resolved", batch, videos.len(), chunk.len());
        for (id, metadata) in videos {
            out.entry(id).or_insert(metadata);
        }
    }

    Ok(out)
}
