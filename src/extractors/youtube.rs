use crate::core::metadata::{VideoApi, VideoMetadata};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Matches the id behind `?v=`, `&v=`, `/v/`, `youtu.be/` and `/embed/`.
static VIDEO_ID_IN_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:v=|/v/|youtu\.be/|/embed/)([A-Za-z0-9_-]{11})").expect("valid video id regex")
});

static BARE_VIDEO_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("valid bare id regex"));

/// Pull the 11-character video id out of a link, or accept the link itself
/// when it already is a bare id. The first recognised URL shape wins.
pub fn extract_video_id(link: Option<&str>) -> Option<String> {
    let link = link?;
    if link.is_empty() {
        return None;
    }

    if let Some(captures) = VIDEO_ID_IN_URL.captures(link) {
        return captures.get(1).map(|m| m.as_str().to_string());
    }

    let trimmed = link.trim();
    if BARE_VIDEO_ID.is_match(trimmed) {
        return Some(trimmed.to_string());
    }

    None
}

pub fn thumbnail_url(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{}/hqdefault.jpg", video_id)
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoResource>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoResource {
    id: Option<String>,
    content_details: Option<ContentDetails>,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    published_at: Option<String>,
}

/// YouTube Data API v3 client for the `videos` endpoint.
pub struct YouTubeDataApi {
    client: reqwest::Client,
    api_base: String,
}

impl YouTubeDataApi {
    pub fn new(api_base: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!("weekly-gallery/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    fn videos_url(&self, ids: &[String], api_key: &str) -> anyhow::Result<Url> {
        let url = Url::parse_with_params(
            &format!("{}/videos", self.api_base),
            &[
                ("part", "contentDetails,snippet"),
                ("id", ids.join(",").as_str()),
                ("key", api_key),
            ],
        )?;
        Ok(url)
    }
}

#[async_trait]
impl VideoApi for YouTubeDataApi {
    async fn list_videos(
        &self,
        ids: &[String],
        api_key: &str,
    ) -> anyhow::Result<Vec<(String, VideoMetadata)>> {
        let url = self.videos_url(ids, api_key)?;
        tracing::debug!("Requesting metadata for {} videos", ids.len());

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("YouTube API returned HTTP {}", response.status());
        }

        let body: VideoListResponse = response.json().await?;
        let videos = body
            .items
            .into_iter()
            .filter_map(|item| {
                let id = item.id?;
                let metadata = VideoMetadata {
                    raw_duration: item.content_details.and_then(|c| c.duration),
                    published_at: item.snippet.and_then(|s| s.published_at),
                };
                Some((id, metadata))
            })
            .collect();

        Ok(videos)
    }
}
