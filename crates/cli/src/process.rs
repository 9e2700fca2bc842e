use std::fmt;
use std::path::PathBuf;

use owo_colors::OwoColorize;

use myanime::prelude::*;
use myanime_core::{VideoLink, find_video_url};
use myanime_downloader::{DownloadRequest, DownloaderError, download, output_template};

use crate::constants::DEFAULT_DOWNLOADER;
use crate::logger::*;
use crate::utils::*;

/// what happened to one episode.
#[derive(Debug)]
pub enum EpisodeOutcome {
    Downloaded { episode: i32, video: VideoLink },
    Skipped(SkipReason),
    Failed(EpisodeFailure),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoVideoUrl,
}

#[derive(Debug)]
pub enum EpisodeFailure {
    /// the episode page could not be loaded or its url had no episode number.
    Page(MyAnimeError),
    Download(DownloaderError),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoVideoUrl => write!(f, "could not find a dailymotion video url on this page"),
        }
    }
}

impl fmt::Display for EpisodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpisodeFailure::Page(err) => write!(f, "episode page failed: {err}"),
            EpisodeFailure::Download(err) => write!(f, "download failed: {err}"),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessSummary {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ProcessSummary {
    fn record(&mut self, outcome: &EpisodeOutcome) {
        match outcome {
            EpisodeOutcome::Downloaded { .. } => self.downloaded += 1,
            EpisodeOutcome::Skipped(_) => self.skipped += 1,
            EpisodeOutcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.downloaded + self.skipped + self.failed
    }
}

pub struct EpisodeProcessor<'a> {
    client: &'a MyAnimeClient,
    config: &'a ShowConfig,
    logger: &'a CliLogger,
    program: String,
    dir: Option<PathBuf>,
}

impl<'a> EpisodeProcessor<'a> {
    pub fn new(client: &'a MyAnimeClient, config: &'a ShowConfig, logger: &'a CliLogger) -> Self {
        Self {
            client,
            config,
            logger,
            program: DEFAULT_DOWNLOADER.to_string(),
            dir: None,
        }
    }

    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn dir(mut self, dir: Option<PathBuf>) -> Self {
        self.dir = dir;
        self
    }

    /// fetches one episode page, finds its video and hands it to the downloader.
    pub async fn process_episode(&self, episode_url: &str) -> EpisodeOutcome {
        let page = self
            .logger
            .while_loading(
                "fetching episode page",
                self.client.fetch_episode_page(episode_url),
            )
            .await;
        let page = match page {
            Ok(page) => page,
            Err(err) => return EpisodeOutcome::Failed(EpisodeFailure::Page(err)),
        };

        let Some(video) = find_video_url(&page) else {
            return EpisodeOutcome::Skipped(SkipReason::NoVideoUrl);
        };
        self.logger
            .success(format!("found video url: {}", video.url.yellow()));

        let episode = match episode_number(episode_url) {
            Ok(episode) => episode,
            Err(err) => return EpisodeOutcome::Failed(EpisodeFailure::Page(err)),
        };

        self.logger
            .step(format!("starting download with {}", self.program.yellow()));
        let request = DownloadRequest::new(
            video.url.clone(),
            output_template(&self.config.show_name, episode),
        )
        .program(self.program.clone())
        .dir(self.dir.clone());

        match download(request).await {
            Ok(()) => EpisodeOutcome::Downloaded { episode, video },
            Err(err) => EpisodeOutcome::Failed(EpisodeFailure::Download(err)),
        }
    }

    /// processes every episode in order; a failed episode never stops the batch.
    pub async fn process_episodes(&self, episode_urls: &[String]) -> ProcessSummary {
        let mut summary = ProcessSummary::default();
        let total = episode_urls.len();

        for (i, episode_url) in episode_urls.iter().enumerate() {
            self.logger
                .step(format!("processing episode {}/{}", (i + 1).yellow(), total));
            self.logger.debug("episode", format!("page url: {episode_url}"));

            let outcome = self.process_episode(episode_url).await;
            match &outcome {
                EpisodeOutcome::Downloaded { episode, video } => self.logger.success(format!(
                    "download complete: episode {} ({})",
                    episode.yellow(),
                    video.id
                )),
                EpisodeOutcome::Skipped(reason) => self.logger.warn(reason.to_string()),
                EpisodeOutcome::Failed(failure) => self.logger.failed(failure.to_string()),
            }
            summary.record(&outcome);
            self.logger.rule();

            let pause = self.config.episode_delay.sample();
            if !pause.is_zero() {
                self.logger
                    .while_loading(
                        format!("waiting {}", format_duration(pause)),
                        tokio::time::sleep(pause),
                    )
                    .await;
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const MISSING_PROGRAM: &str = "myanime-definitely-not-installed";

    fn episode_path(episode: i32) -> String {
        format!("/2025/01/01/martial-master-episode-{episode}-english-sub/")
    }

    async fn mount_page(server: &MockServer, episode: i32, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(episode_path(episode)))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    fn player_page(id: &str) -> String {
        format!(r#"<iframe src="https://geo.dailymotion.com/player.html?video={id}"></iframe>"#)
    }

    fn setup(server: &MockServer) -> (MyAnimeClient, ShowConfig, CliLogger) {
        let client = MyAnimeBuilder::new()
            .base_url(&server.uri())
            .build()
            .expect("client should build");
        let config = ShowConfig::default().episode_delay(Delay::NONE);
        (client, config, CliLogger::new("error"))
    }

    #[tokio::test]
    async fn missing_downloader_fails_only_that_episode() {
        let server = MockServer::start().await;
        mount_page(&server, 600, 200, &player_page("x600")).await;
        mount_page(&server, 599, 200, &player_page("x599")).await;
        let (client, config, logger) = setup(&server);
        let processor = EpisodeProcessor::new(&client, &config, &logger).program(MISSING_PROGRAM);

        let urls = vec![
            format!("{}{}", server.uri(), episode_path(600)),
            format!("{}{}", server.uri(), episode_path(599)),
        ];
        let summary = processor.process_episodes(&urls).await;

        assert_eq!(
            summary,
            ProcessSummary {
                downloaded: 0,
                skipped: 0,
                failed: 2
            }
        );
        // the second page was still requested after the first download failed
        let requests = server.received_requests().await.expect("recording enabled");
        assert_eq!(requests.len(), 2);
    }

    #[tokio::test]
    async fn missing_downloader_is_reported_as_not_found() {
        let server = MockServer::start().await;
        mount_page(&server, 600, 200, &player_page("x600")).await;
        let (client, config, logger) = setup(&server);
        let processor = EpisodeProcessor::new(&client, &config, &logger).program(MISSING_PROGRAM);

        let outcome = processor
            .process_episode(&format!("{}{}", server.uri(), episode_path(600)))
            .await;
        assert!(matches!(
            outcome,
            EpisodeOutcome::Failed(EpisodeFailure::Download(DownloaderError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn page_without_video_is_skipped() {
        let server = MockServer::start().await;
        mount_page(&server, 599, 200, "<p>video coming soon</p>").await;
        let (client, config, logger) = setup(&server);
        let processor = EpisodeProcessor::new(&client, &config, &logger).program(MISSING_PROGRAM);

        let outcome = processor
            .process_episode(&format!("{}{}", server.uri(), episode_path(599)))
            .await;
        assert!(matches!(outcome, EpisodeOutcome::Skipped(SkipReason::NoVideoUrl)));
    }

    #[tokio::test]
    async fn broken_page_does_not_stop_the_batch() {
        let server = MockServer::start().await;
        mount_page(&server, 600, 500, "oops").await;
        mount_page(&server, 599, 200, "<p>no player</p>").await;
        mount_page(&server, 598, 200, &player_page("x598")).await;
        let (client, config, logger) = setup(&server);
        let processor = EpisodeProcessor::new(&client, &config, &logger).program(MISSING_PROGRAM);

        let urls: Vec<String> = [600, 599, 598]
            .into_iter()
            .map(|episode| format!("{}{}", server.uri(), episode_path(episode)))
            .collect();
        let summary = processor.process_episodes(&urls).await;

        assert_eq!(summary.total(), 3);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 2);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn successful_download_reports_episode_and_video() {
        let server = MockServer::start().await;
        mount_page(&server, 551, 200, &player_page("x551")).await;
        let (client, config, logger) = setup(&server);
        let processor = EpisodeProcessor::new(&client, &config, &logger).program("true");

        let outcome = processor
            .process_episode(&format!("{}{}", server.uri(), episode_path(551)))
            .await;
        match outcome {
            EpisodeOutcome::Downloaded { episode, video } => {
                assert_eq!(episode, 551);
                assert_eq!(video.id, "x551");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
