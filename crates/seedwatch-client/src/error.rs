//! Error taxonomy for backend requests.
//!
//! Three failure classes with distinct policies: transport failures are
//! never retried immediately, backend rejections are surfaced verbatim, and
//! undecodable responses are treated like transport failures for refresh and
//! probe purposes.

use thiserror::Error;

/// Primary error type for requests against the job-control backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or HTTP-level failure before a usable body arrived.
    #[error("transport failure during {operation}")]
    Transport {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying reqwest failure.
        #[source]
        source: reqwest::Error,
    },
    /// Backend answered `success: false`; the message is surfaced verbatim.
    #[error("{message}")]
    Application {
        /// Operation identifier.
        operation: &'static str,
        /// Backend-provided failure message.
        message: String,
    },
    /// Response body could not be decoded into the expected shape.
    #[error("malformed response during {operation}")]
    MalformedResponse {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying decode failure.
        #[source]
        source: reqwest::Error,
    },
    /// A request URL could not be derived from the configured base URL.
    #[error("invalid request URL for {operation}")]
    InvalidUrl {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying URL parse failure.
        #[source]
        source: url::ParseError,
    },
}

impl ClientError {
    /// Operation during which the failure occurred.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::Transport { operation, .. }
            | Self::Application { operation, .. }
            | Self::MalformedResponse { operation, .. }
            | Self::InvalidUrl { operation, .. } => operation,
        }
    }

    /// Whether the backend rejected the request because no download engine
    /// is installed. Callers use this to trigger one extra capability probe.
    #[must_use]
    pub fn is_missing_downloader(&self) -> bool {
        match self {
            Self::Application { message, .. } => {
                let lower = message.to_ascii_lowercase();
                lower.contains("no torrent downloader") || lower.contains("no downloader")
            }
            _ => false,
        }
    }

    /// One-line operator-facing description, including the underlying cause
    /// for transport and decode failures.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Application { message, .. } => message.clone(),
            Self::Transport { source, .. } | Self::MalformedResponse { source, .. } => {
                format!("{self}: {source}")
            }
            Self::InvalidUrl { source, .. } => format!("{self}: {source}"),
        }
    }
}

/// Convenience alias for backend request results.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_downloader_is_detected_case_insensitively() {
        let error = ClientError::Application {
            operation: "submit",
            message: "No torrent downloader found. Please install aria2c".to_string(),
        };
        assert!(error.is_missing_downloader());

        let other = ClientError::Application {
            operation: "submit",
            message: "Invalid magnet link format".to_string(),
        };
        assert!(!other.is_missing_downloader());
    }

    #[test]
    fn application_errors_surface_the_backend_message_verbatim() {
        let error = ClientError::Application {
            operation: "dispatch",
            message: "Download not found".to_string(),
        };
        assert_eq!(error.to_string(), "Download not found");
        assert_eq!(error.describe(), "Download not found");
        assert_eq!(error.operation(), "dispatch");
    }
}
