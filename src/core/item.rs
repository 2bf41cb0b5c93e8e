use crate::core::duration::format_duration;
use crate::core::metadata::MetadataMap;
use crate::extractors::youtube::{extract_video_id, thumbnail_url};

/// One spreadsheet record as `(header, value)` pairs in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRow {
    fields: Vec<(String, String)>,
}

impl SourceRow {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// Case-insensitive field lookup.
    ///
    /// Precedence:
    /// 1. the column whose header is exactly `key`, if its value is non-empty;
    /// 2. the first column, in header order, whose header equals `key`
    ///    ignoring ASCII case and whose value is non-empty;
    /// 3. the empty string.
    ///
    /// Headers are trimmed before comparing.
    pub fn get(&self, key: &str) -> &str {
        let exact = self
            .fields
            .iter()
            .find(|(header, value)| header.trim() == key && !value.is_empty());
        if let Some((_, value)) = exact {
            return value;
        }

        self.fields
            .iter()
            .find(|(header, value)| header.trim().eq_ignore_ascii_case(key) && !value.is_empty())
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }
}

impl<K, V> FromIterator<(K, V)> for SourceRow
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Parse CSV text whose first record is the header row.
///
/// Short rows are padded with empty values; extra cells without a header
/// are dropped.
pub fn parse_rows(text: &str) -> Result<Vec<SourceRow>, csv::Error> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let fields = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), record.get(i).unwrap_or("").to_string()))
            .collect();
        rows.push(SourceRow::new(fields));
    }

    Ok(rows)
}

/// A gallery entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    pub title: String,
    pub link: String,
    pub identifier: Option<String>,
    pub thumbnail: String,
    /// Formatted clock string, e.g. `3:33`.
    pub duration: Option<String>,
    pub published_at: Option<String>,
}

/// Build an [`Item`] from a raw row. Never fails: missing columns give empty
/// strings, and links without a video id get `placeholder` as thumbnail.
pub fn normalize_row(row: &SourceRow, placeholder: &str) -> Item {
    let title = row.get("title").trim();
    let link = row.get("link").trim();

    let identifier = extract_video_id(Some(link));
    let thumbnail = match &identifier {
        Some(id) => thumbnail_url(id),
        None => placeholder.to_string(),
    };

    Item {
        title: title.to_string(),
        link: link.to_string(),
        identifier,
        thumbnail,
        duration: None,
        published_at: None,
    }
}

/// Attach formatted duration and publish time to every item whose id has
/// metadata. Returns how many items were enriched.
pub fn merge_metadata(items: &mut [Item], metadata: &MetadataMap) -> usize {
    let mut enriched = 0;
    for item in items.iter_mut() {
        let Some(meta) = item.identifier.as_ref().and_then(|id| metadata.get(id)) else {
            continue;
        };
        let duration = format_duration(meta.raw_duration.as_deref());
        item.duration = (!duration.is_empty()).then_some(duration);
        item.published_at = meta.published_at.clone();
        enriched += 1;
    }
    enriched
}
