use std::process::ExitStatus;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DownloaderError>;

#[derive(Debug, Error)]
pub enum DownloaderError {
    #[error("'{program}' command not found. make sure it is installed and in your PATH")]
    NotFound { program: String },

    #[error("{program} returned an error: {status}")]
    ExitStatus { program: String, status: ExitStatus },

    #[error("io error while {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}
