pub mod sheets;
pub mod youtube;

pub use sheets::GoogleSheetSource;
pub use youtube::{extract_video_id, YouTubeDataApi};
