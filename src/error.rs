//! Error types.
//!
//! Only [`HubError`] is allowed to stop the process. Lookup failures are
//! rendered into the broadcast text; connection and per-peer failures are
//! absorbed where they happen.

use thiserror::Error;

/// Failure of a single upstream rate lookup.
///
/// The `Display` text is user-visible: it is broadcast in place of the
/// rates that could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("HTTP request timed out.")]
    Timeout,

    #[error("Couldn't get the exchange rates (status {0}).")]
    BadStatus(u16),

    #[error("Error during HTTP request: {0}")]
    Transport(String),

    #[error("Malformed exchange rate response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LookupError::Timeout
        } else if err.is_decode() {
            LookupError::Malformed(err.to_string())
        } else {
            LookupError::Transport(err.to_string())
        }
    }
}

/// Listener-level failure. Fatal for the process.
#[derive(Debug, Error)]
pub enum HubError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_error_text_is_user_facing() {
        assert_eq!(LookupError::Timeout.to_string(), "HTTP request timed out.");
        assert_eq!(
            LookupError::BadStatus(503).to_string(),
            "Couldn't get the exchange rates (status 503)."
        );
        assert!(LookupError::Transport("refused".into())
            .to_string()
            .ends_with("refused"));
    }
}
