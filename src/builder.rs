use crate::prelude::*;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36";

pub struct MyAnimeBuilder {
    base_url: String,
    episode_pattern: String,
    user_agent: String,
}

impl MyAnimeBuilder {
    /// creates a builder pointed at the default tag listing.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_LISTING_URL.to_string(),
            episode_pattern: DEFAULT_EPISODE_PATTERN.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// takes listing url and episode pattern from a show config.
    pub fn from_config(config: &ShowConfig) -> Self {
        Self::new()
            .base_url(&config.base_url)
            .episode_pattern(&config.episode_pattern)
    }

    /// sets the listing page that holds the newest episodes.
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim().to_string();
        self
    }

    /// sets the regex an episode page url must fully match.
    pub fn episode_pattern(mut self, pattern: &str) -> Self {
        self.episode_pattern = pattern.to_string();
        self
    }

    /// builds a [`MyAnimeClient`] using the configured options.
    pub fn build(&self) -> Result<MyAnimeClient> {
        let pattern = compile_episode_pattern(&self.episode_pattern)?;
        MyAnimeClient::new(&self.base_url, pattern, &self.user_agent)
    }
}

impl Default for MyAnimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
