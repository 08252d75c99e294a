use ::scraper::error::SelectorErrorKind;
use std::num::ParseIntError;

/// All errors that can occur during HLTV scraping operations.
#[derive(thiserror::Error, Debug)]
pub enum HltvError {
    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// Server returned a non-success HTTP status code.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Failed to read the response body as text.
    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },

    /// A CSS selector string could not be parsed.
    #[error("invalid CSS selector: {0}")]
    Selector(String),

    /// Failed to parse an integer from scraped text.
    #[error("failed to parse integer: {0}")]
    IntParse(#[from] ParseIntError),

    /// A unix-millisecond attribute was outside the representable range.
    #[error("timestamp out of range: {0}")]
    InvalidTimestamp(i64),

    /// An expected HTML element was not found on the page.
    #[error("expected element not found: {context}")]
    ElementNotFound { context: &'static str },
}

impl<'a> From<SelectorErrorKind<'a>> for HltvError {
    fn from(err: SelectorErrorKind<'a>) -> Self {
        HltvError::Selector(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HltvError>;
