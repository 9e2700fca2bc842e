use std::sync::Arc;

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;

use myanime::prelude::*;

use crate::args::*;
use crate::episode::*;
use crate::logger::*;
use crate::process::*;
use crate::prompt::*;
use crate::utils::*;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub download_args: DownloadArgs,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Reconcile the episode range and print the episode page URLs
    Resolve(ResolveArgs),
    /// Reconcile the episode range and download every episode with yt-dlp
    Download(DownloadArgs),
}

#[derive(Debug)]
pub struct App {
    cli: Cli,
    logger: Arc<CliLogger>,
}

impl App {
    pub fn new() -> Self {
        let cli = Cli::parse();
        let log_level = match &cli.command {
            Some(Commands::Resolve(args)) => &args.app_args.log_level,
            Some(Commands::Download(args)) => &args.resolve.app_args.log_level,
            None => &cli.download_args.resolve.app_args.log_level,
        };
        let logger = Arc::new(CliLogger::new(log_level));
        init_tracing(Arc::clone(&logger));
        Self { cli, logger }
    }

    pub async fn run(&self) {
        if let Err(err) = match &self.cli.command {
            Some(Commands::Resolve(args)) => self.resolve(args.clone()).await,
            Some(Commands::Download(args)) => self.download(args.clone()).await,
            None => self.download(self.cli.download_args.clone()).await,
        } {
            self.logger.failed(failure_message(&err));
        }
    }

    pub async fn resolve(&self, mut args: ResolveArgs) -> Result<()> {
        let logger = self.logger.as_ref();
        if args.app_args.interactive {
            args = prompt_for_args(args)?;
        }
        let config = args.show_config();

        let (_, reconciled) = resolve_episode_links(&config, logger).await?;
        for url in &reconciled.urls {
            logger.success(format!("episode {}: {}", episode_label(url), url.yellow()));
        }

        Ok(())
    }

    pub async fn download(&self, mut args: DownloadArgs) -> Result<()> {
        let logger = self.logger.as_ref();
        if args.resolve.app_args.interactive {
            args.resolve = prompt_for_args(args.resolve)?;
        }
        let config = args.show_config();

        let (client, reconciled) = resolve_episode_links(&config, logger).await?;
        if reconciled.is_empty() {
            return Ok(());
        }

        let processor = EpisodeProcessor::new(&client, &config, logger)
            .program(args.downloader.clone())
            .dir(args.dir.clone());
        let summary = processor.process_episodes(&reconciled.urls).await;

        let line = format!(
            "{} of {} downloaded, {} skipped, {} failed",
            summary.downloaded.green(),
            plural(summary.total(), "episode"),
            summary.skipped.yellow(),
            summary.failed.red()
        );
        if summary.failed > 0 {
            logger.warn(line);
        } else {
            logger.success(line);
        }

        Ok(())
    }
}

/// final error line; network failures get a hint that a retry may help.
pub fn failure_message(err: &MyAnimeError) -> String {
    if err.is_retrieval() {
        format!("network error, try again later: {err}")
    } else {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn network_failures_get_a_retry_hint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let client = MyAnimeBuilder::new()
            .base_url(&server.uri())
            .build()
            .expect("client should build");

        let err = client
            .fetch_listing_page(1)
            .await
            .expect_err("503 should fail");
        assert!(failure_message(&err).starts_with("network error, try again later: "));
    }

    #[test]
    fn other_failures_are_shown_as_is() {
        let err = MyAnimeError::NoEpisodesFound {
            url: "https://myanime.live/tag/qin-chen/".to_string(),
        };
        assert_eq!(failure_message(&err), err.to_string());
    }
}
