use std::path::PathBuf;

use clap::Args;

use myanime::prelude::*;

use crate::constants::*;

#[derive(Debug, Clone, Args)]
pub struct AppArgs {
    /// Logging verbosity (error, warn, info, debug)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Use interactive prompts to edit arguments before execution
    #[arg(short, long)]
    pub interactive: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ResolveArgs {
    /// Tag listing page that lists the show's episodes, newest first
    #[arg(short, long, env = "MYANIME_URL", default_value = DEFAULT_LISTING_URL)]
    pub url: String,

    /// Show name used in output filenames
    #[arg(short, long, env = "MYANIME_SHOW", default_value = DEFAULT_SHOW_NAME)]
    pub show: String,

    /// Episodes to grab (e.g. 551-600 or 600)
    #[arg(short, long, default_value = DEFAULT_EPISODES)]
    pub episodes: EpisodeRange,

    /// Regex an episode page URL must fully match
    #[arg(long, env = "MYANIME_PATTERN", default_value = DEFAULT_EPISODE_PATTERN)]
    pub pattern: String,

    /// Seconds to wait between listing pages (e.g. 0-2)
    #[arg(long, default_value = DEFAULT_PAGE_DELAY)]
    pub page_delay: Delay,

    #[command(flatten)]
    pub app_args: AppArgs,
}

#[derive(Debug, Clone, Args)]
pub struct DownloadArgs {
    /// Output directory for downloaded files
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Downloader executable
    #[arg(long = "yt-dlp", env = "MYANIME_YTDLP", default_value = DEFAULT_DOWNLOADER)]
    pub downloader: String,

    /// Seconds to wait after each episode (e.g. 15-30)
    #[arg(long, default_value = DEFAULT_EPISODE_DELAY)]
    pub episode_delay: Delay,

    #[command(flatten)]
    pub resolve: ResolveArgs,
}

impl ResolveArgs {
    pub fn show_config(&self) -> ShowConfig {
        ShowConfig::new(self.url.trim(), self.show.trim(), self.episodes)
            .episode_pattern(&self.pattern)
            .page_delay(self.page_delay)
    }
}

impl DownloadArgs {
    pub fn show_config(&self) -> ShowConfig {
        self.resolve.show_config().episode_delay(self.episode_delay)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        download: DownloadArgs,
    }

    #[test]
    fn defaults_target_martial_master() {
        let cli = TestCli::try_parse_from(["myanime"]).expect("defaults should parse");
        let config = cli.download.show_config();

        assert_eq!(config.base_url, DEFAULT_LISTING_URL);
        assert_eq!(config.show_name, DEFAULT_SHOW_NAME);
        assert_eq!(config.range, EpisodeRange::new(551, 600).expect("valid range"));
        assert_eq!(config.page_delay, Delay::seconds(0, 2));
        assert_eq!(config.episode_delay, Delay::seconds(15, 30));
        assert_eq!(cli.download.downloader, "yt-dlp");
    }

    #[test]
    fn overrides_flow_into_show_config() {
        let cli = TestCli::try_parse_from([
            "myanime",
            "--url",
            "https://myanime.live/tag/other-show/",
            "--show",
            "Other Show",
            "-e",
            "12",
            "--page-delay",
            "0",
            "--episode-delay",
            "1-3",
            "--yt-dlp",
            "/opt/bin/yt-dlp",
        ])
        .expect("arguments should parse");
        let config = cli.download.show_config();

        assert_eq!(config.base_url, "https://myanime.live/tag/other-show/");
        assert_eq!(config.show_name, "Other Show");
        assert_eq!(config.range.to_string(), "12");
        assert_eq!(config.page_delay, Delay::NONE);
        assert_eq!(config.episode_delay, Delay::seconds(1, 3));
        assert_eq!(cli.download.downloader, "/opt/bin/yt-dlp");
    }

    #[test]
    fn rejects_reversed_episode_range() {
        assert!(TestCli::try_parse_from(["myanime", "-e", "600-551"]).is_err());
    }
}
