use std::str::FromStr;

use crate::delay::Delay;
use crate::errors::MyAnimeError;
use crate::filter::DEFAULT_EPISODE_PATTERN;

pub const DEFAULT_LISTING_URL: &str = "https://myanime.live/tag/qin-chen/";
pub const DEFAULT_SHOW_NAME: &str = "Martial Master";

/// closed interval of episode numbers, `1 <= first <= last`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeRange {
    first: i32,
    last: i32,
}

impl EpisodeRange {
    pub fn new(first: i32, last: i32) -> crate::Result<Self> {
        if first < 1 {
            return Err(MyAnimeError::InvalidRange(format!(
                "episode numbers start at 1, got {first}"
            )));
        }
        if first > last {
            return Err(MyAnimeError::InvalidRange(
                "first episode cannot be greater than last".into(),
            ));
        }
        Ok(Self { first, last })
    }

    pub fn first(&self) -> i32 {
        self.first
    }

    pub fn last(&self) -> i32 {
        self.last
    }

    /// number of episodes the range covers.
    pub fn count(&self) -> usize {
        (self.last - self.first) as usize + 1
    }
}

impl FromStr for EpisodeRange {
    type Err = MyAnimeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parse = |raw: &str, what: &str| {
            raw.trim()
                .parse::<i32>()
                .map_err(|_| MyAnimeError::InvalidRange(format!("invalid {what}: {raw:?}")))
        };

        if let Some((first, last)) = s.split_once('-') {
            EpisodeRange::new(parse(first, "first episode")?, parse(last, "last episode")?)
        } else {
            let value = parse(s, "episode")?;
            EpisodeRange::new(value, value)
        }
    }
}

impl std::fmt::Display for EpisodeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.first == self.last {
            write!(f, "{}", self.first)
        } else {
            write!(f, "{}-{}", self.first, self.last)
        }
    }
}

/// everything a run needs to know about the show it downloads.
#[derive(Debug, Clone)]
pub struct ShowConfig {
    /// tag listing page, newest episodes first.
    pub base_url: String,
    /// used in output filenames.
    pub show_name: String,
    /// regex an episode page url must match in full.
    pub episode_pattern: String,
    pub range: EpisodeRange,
    /// wait between listing page requests.
    pub page_delay: Delay,
    /// wait after each processed episode.
    pub episode_delay: Delay,
}

impl ShowConfig {
    pub fn new(base_url: impl Into<String>, show_name: impl Into<String>, range: EpisodeRange) -> Self {
        Self {
            base_url: base_url.into(),
            show_name: show_name.into(),
            episode_pattern: DEFAULT_EPISODE_PATTERN.to_string(),
            range,
            page_delay: Delay::seconds(0, 2),
            episode_delay: Delay::seconds(15, 30),
        }
    }

    pub fn episode_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.episode_pattern = pattern.into();
        self
    }

    pub fn page_delay(mut self, delay: Delay) -> Self {
        self.page_delay = delay;
        self
    }

    pub fn episode_delay(mut self, delay: Delay) -> Self {
        self.episode_delay = delay;
        self
    }
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_LISTING_URL,
            DEFAULT_SHOW_NAME,
            EpisodeRange {
                first: 551,
                last: 600,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn episode_range_parses_range_and_single_episode() {
        let range: EpisodeRange = "551-600".parse().expect("range should parse");
        assert_eq!((range.first(), range.last()), (551, 600));
        assert_eq!(range.count(), 50);

        let single: EpisodeRange = "42".parse().expect("single episode should parse");
        assert_eq!((single.first(), single.last()), (42, 42));
        assert_eq!(single.to_string(), "42");
    }

    #[test]
    fn episode_range_rejects_reversed_bounds() {
        let err = "600-551"
            .parse::<EpisodeRange>()
            .expect_err("reversed range should fail");
        assert!(matches!(err, MyAnimeError::InvalidRange(_)));
        assert!("abc".parse::<EpisodeRange>().is_err());
    }

    #[test]
    fn episode_range_rejects_non_positive_episodes() {
        assert!(matches!(
            EpisodeRange::new(0, 10),
            Err(MyAnimeError::InvalidRange(_))
        ));
        assert!(EpisodeRange::new(i32::MIN, i32::MAX).is_err());
        assert!("0".parse::<EpisodeRange>().is_err());

        let widest = EpisodeRange::new(1, i32::MAX).expect("valid range");
        assert_eq!(widest.count(), i32::MAX as usize);
    }

    #[test]
    fn default_config_targets_martial_master() {
        let config = ShowConfig::default();
        assert_eq!(config.base_url, DEFAULT_LISTING_URL);
        assert_eq!(config.show_name, "Martial Master");
        assert_eq!(config.range.to_string(), "551-600");
        assert_eq!(config.page_delay, Delay::seconds(0, 2));
        assert_eq!(config.episode_delay, Delay::seconds(15, 30));
    }
}
