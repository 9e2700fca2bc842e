pub use myanime::{DEFAULT_EPISODE_PATTERN, DEFAULT_LISTING_URL, DEFAULT_SHOW_NAME};

pub const DEFAULT_EPISODES: &str = "551-600";

/// seconds between listing page requests.
pub const DEFAULT_PAGE_DELAY: &str = "0-2";

/// seconds to wait after each episode.
pub const DEFAULT_EPISODE_DELAY: &str = "15-30";

pub const DEFAULT_DOWNLOADER: &str = myanime_downloader::DEFAULT_PROGRAM;
