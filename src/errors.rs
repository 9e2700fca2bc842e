use thiserror::Error;

pub type Result<T> = std::result::Result<T, MyAnimeError>;

#[derive(Debug, Error)]
pub enum MyAnimeError {
    #[error("failed to parse listing base URL: {url}")]
    BaseUrl { url: String },

    #[error("failed building reqwest client: {0}")]
    BuildClient(#[source] reqwest::Error),

    #[error("HTTP request failed while {context}: {source}")]
    Request {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read response body while {context}: {source}")]
    ResponseBody {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{context} returned {status}\nresponse text:\n{body}")]
    HttpStatus {
        context: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("no episode number found in {url}")]
    MissingEpisodeNumber { url: String },

    #[error("could not find any episode links at {url}. the website structure might have changed")]
    NoEpisodesFound { url: String },

    #[error("invalid episode range: {0}")]
    InvalidRange(String),

    #[error("invalid delay: {0}")]
    InvalidDelay(String),

    #[error("{0}")]
    Message(String),
}

impl MyAnimeError {
    /// true for failures of the HTTP layer itself (transport, status or body).
    pub fn is_retrieval(&self) -> bool {
        matches!(
            self,
            Self::Request { .. } | Self::ResponseBody { .. } | Self::HttpStatus { .. }
        )
    }
}
