//! Error types for content fetching.

use thiserror::Error;

/// Result type for content operations
pub type ContentResult<T> = Result<T, ContentError>;

/// Errors that can occur while fetching remote content.
///
/// Fetch failures are surfaced to the caller as-is; there is no automatic
/// retry at this layer.
#[derive(Debug, Error)]
pub enum ContentError {
    /// Chapter number outside 1..=114, rejected before any request
    #[error("Chapter number must be between 1 and 114, got {0}")]
    InvalidChapter(u16),

    /// Transport-level failure (connection, timeout, redirect)
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("Server returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// The response body did not match the expected shape
    #[error("Could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_chapter_names_the_bounds() {
        let err = ContentError::InvalidChapter(115);
        assert!(err.to_string().contains("between 1 and 114"));
        assert!(err.to_string().contains("115"));
    }

    #[test]
    fn test_status_error_names_the_url() {
        let err = ContentError::Status {
            status: 404,
            url: "https://quranapi.pages.dev/api/2.json".to_string(),
        };
        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains("/api/2.json"));
    }
}
