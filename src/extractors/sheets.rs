use crate::core::source::{SourceError, TableSource};
use async_trait::async_trait;
use std::time::Duration;

/// CSV export URL of one tab of a Google spreadsheet.
pub fn export_url(sheet_id: &str, gid: &str) -> String {
    format!(
        "https://docs.google.com/spreadsheets/d/{}/export?format=csv&gid={}",
        urlencode(sheet_id),
        urlencode(gid)
    )
}

fn urlencode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Reads a published spreadsheet tab through its CSV export.
pub struct GoogleSheetSource {
    client: reqwest::Client,
    url: String,
}

impl GoogleSheetSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!("weekly-gallery/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TableSource for GoogleSheetSource {
    async fn fetch_csv(&self) -> Result<String, SourceError> {
        tracing::debug!("Fetching spreadsheet export: {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status));
        }

        let bytes = response.bytes().await?;
        let text = String::from_utf8(bytes.to_vec())?;
        tracing::debug!("Spreadsheet export: {} bytes", text.len());
        Ok(text)
    }
}
