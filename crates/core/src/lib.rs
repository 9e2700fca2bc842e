pub mod dailymotion;

pub use dailymotion::{VideoLink, VideoSource, find_video_url};
