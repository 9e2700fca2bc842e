mod errors;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;

pub use errors::{DownloaderError, Result};
use tokio::process::Command;
use tracing::{debug, info};

pub const DEFAULT_PROGRAM: &str = "yt-dlp";

#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub url: String,
    pub output: String,
    pub program: String,
    pub dir: Option<PathBuf>,
}

impl DownloadRequest {
    /// `output` is a yt-dlp output template, see [`output_template`].
    pub fn new(url: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            output: output.into(),
            program: DEFAULT_PROGRAM.to_string(),
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

    /// arguments passed to the downloader, without the program itself.
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(5);
        if let Some(dir) = &self.dir {
            args.push("-P".to_string());
            args.push(dir.to_string_lossy().into_owned());
        }
        args.push("-o".to_string());
        args.push(self.output.clone());
        args.push(self.url.clone());
        args
    }
}

/// output template naming a file after the show and episode, leaving resolution
/// and extension for yt-dlp to fill in.
pub fn output_template(show: &str, episode: i32) -> String {
    format!("{show} - {episode}[%(resolution)s].%(ext)s")
}

/// runs the downloader and waits for it to exit.
///
/// output is inherited so yt-dlp can draw its own progress. there is no timeout.
pub async fn download(request: DownloadRequest) -> Result<()> {
    if let Some(dir) = &request.dir {
        ensure_dir(dir).await?;
    }

    let args = request.args();
    info!(program = %request.program, url = %request.url, "starting download");
    debug!(args = ?args, "downloader arguments");

    let status = Command::new(&request.program)
        .args(&args)
        .stdin(Stdio::null())
        .status()
        .await
        .map_err(|source| match source.kind() {
            ErrorKind::NotFound => DownloaderError::NotFound {
                program: request.program.clone(),
            },
            _ => DownloaderError::Io {
                context: format!("running {}", request.program),
                source,
            },
        })?;

    if !status.success() {
        return Err(DownloaderError::ExitStatus {
            program: request.program,
            status,
        });
    }

    Ok(())
}

async fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| DownloaderError::Io {
            context: format!("creating output directory {}", dir.display()),
            source,
        })
}
