use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// player url embedded by newer episode pages.
pub static PLAYER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https://geo\.dailymotion\.com/player\.html\?video=([^"?]+)"#)
        .expect("dailymotion player regex must compile")
});

/// legacy embed url, only used when no player url is present.
pub static EMBED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https://www\.dailymotion\.com/embed/video/([^"?]+)"#)
        .expect("dailymotion embed regex must compile")
});

/// which of the known shapes a video url was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoSource {
    Player,
    Embed,
}

/// video host url found on an episode page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoLink {
    /// matched url, verbatim from the page source.
    pub url: String,
    /// dailymotion video id captured from the url.
    pub id: String,
    pub source: VideoSource,
}

/// searches an episode page for a dailymotion url.
///
/// the player pattern wins whenever it matches, even if an embed url appears earlier.
pub fn find_video_url(page_source: &str) -> Option<VideoLink> {
    let found = [(&*PLAYER_RE, VideoSource::Player), (&*EMBED_RE, VideoSource::Embed)]
        .into_iter()
        .find_map(|(re, source)| {
            re.captures(page_source).map(|caps| VideoLink {
                url: caps[0].to_string(),
                id: caps[1].to_string(),
                source,
            })
        });

    match &found {
        Some(link) => debug!(url = %link.url, source = ?link.source, "found video url"),
        None => debug!("no video url in page source"),
    }

    found
}
