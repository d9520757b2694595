use thiserror::Error;

/// Errors that can occur with finding the config or data directories.
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Unable to find the config directory for distro.")]
    Config,
    #[error("Unable to find the data directory for distro.")]
    Data,
}

/// Message shown when a failed request carries no usable explanation.
pub const GENERIC_TRANSPORT_MESSAGE: &str = "Request failed, the server could not be reached.";

/// Errors that can occur while talking to the backend.
///
/// A transport failure and a non-2xx response are handled the same way by every caller,
/// the only difference is whether the server gave us a message to show.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Server responded with status {status}{}", message_suffix(.message))]
    Server { status: u16, message: Option<String> },
    #[error("Could not decode the response: {0}")]
    Decode(String),
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

impl ApiError {
    /// The text to surface to the user.
    ///
    /// Prefers the `error` field of the server's response body, and falls back to the
    /// transport-level description otherwise.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Server {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            Self::Transport(message) | Self::Decode(message) if !message.is_empty() => {
                message.clone()
            }
            Self::Server { status, .. } => format!("Request failed with status code {status}"),
            Self::Transport(_) | Self::Decode(_) => GENERIC_TRANSPORT_MESSAGE.to_string(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}
