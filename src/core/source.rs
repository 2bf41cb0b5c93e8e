use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("could not reach the spreadsheet: {0}")]
    Http(#[from] reqwest::Error),
    #[error("spreadsheet export returned HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("spreadsheet export is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),
    #[error("spreadsheet export is not readable CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Where the gallery rows come from.
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Fetch the whole table as CSV text.
    async fn fetch_csv(&self) -> Result<String, SourceError>;
}
