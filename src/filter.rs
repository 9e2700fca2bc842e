use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{MyAnimeError, Result};

/// episode-page pattern for the show the tool was first written for.
pub const DEFAULT_EPISODE_PATTERN: &str = r"https?://myanime\.live/\d{4}/\d{2}/\d{2}/(?:wu-shen-zhu-zai)?-?(?:martial-master)?(?:-anime)?-episode-\d{2,3}-english-sub/?";

static EPISODE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"episode-(\d+)").expect("episode number regex must compile"));

/// compiles an episode-page pattern so that it only accepts whole strings.
pub fn compile_episode_pattern(raw: &str) -> Result<Regex> {
    Ok(Regex::new(&format!("^(?:{raw})$"))?)
}

/// keeps the candidates that are episode pages, preserving their order.
pub fn filter_episode_links<I, S>(pattern: &Regex, candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    candidates
        .into_iter()
        .filter(|candidate| pattern.is_match(candidate.as_ref()))
        .map(|candidate| candidate.as_ref().to_string())
        .collect()
}

/// parses the number following the first `episode-` marker of an episode url.
pub fn episode_number(url: &str) -> Result<i32> {
    EPISODE_NUMBER_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i32>().ok())
        .ok_or_else(|| MyAnimeError::MissingEpisodeNumber {
            url: url.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_pattern() -> Regex {
        compile_episode_pattern(DEFAULT_EPISODE_PATTERN).expect("default pattern should compile")
    }

    #[test]
    fn filter_keeps_matching_links_in_order() {
        let pattern = default_pattern();
        let candidates = [
            "https://myanime.live/2025/01/12/martial-master-episode-600-english-sub/",
            "https://myanime.live/tag/qin-chen/",
            "https://myanime.live/2025/01/05/wu-shen-zhu-zai-martial-master-episode-599-english-sub/",
            "https://myanime.live/2025/01/05/some-other-show-episode-12-english-sub/",
            "https://myanime.live/2024/12/29/martial-master-anime-episode-598-english-sub",
        ];

        let filtered = filter_episode_links(&pattern, candidates);
        assert_eq!(
            filtered,
            vec![
                candidates[0].to_string(),
                candidates[2].to_string(),
                candidates[4].to_string(),
            ]
        );
    }

    #[test]
    fn filter_requires_whole_string_match() {
        let pattern = default_pattern();
        let candidates = [
            "https://myanime.live/2025/01/12/martial-master-episode-600-english-sub/#respond",
            "see https://myanime.live/2025/01/12/martial-master-episode-600-english-sub/",
        ];

        assert!(filter_episode_links(&pattern, candidates).is_empty());
    }

    #[test]
    fn filter_without_matches_is_empty() {
        let pattern = default_pattern();
        let candidates: Vec<String> = Vec::new();
        assert!(filter_episode_links(&pattern, candidates).is_empty());
        assert!(filter_episode_links(&pattern, ["https://example.com/"]).is_empty());
    }

    #[test]
    fn episode_number_reads_first_marker() {
        let url = "https://myanime.live/2025/01/12/martial-master-episode-600-english-sub/";
        assert_eq!(episode_number(url).expect("number should parse"), 600);
        assert_eq!(
            episode_number("https://x/episode-41-then-episode-42").expect("number should parse"),
            41
        );
    }

    #[test]
    fn episode_number_rejects_urls_without_marker() {
        let err = episode_number("https://myanime.live/tag/qin-chen/")
            .expect_err("listing url has no episode number");
        assert!(matches!(err, MyAnimeError::MissingEpisodeNumber { .. }));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = compile_episode_pattern("episode-(").expect_err("pattern should not compile");
        assert!(matches!(err, MyAnimeError::Regex(_)));
    }
}
