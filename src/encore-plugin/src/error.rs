//! Error types for the song-request plugin.

use thiserror::Error;

/// Errors a [`crate::ChatTransport`] implementation can report.
///
/// These never escape [`crate::MusicPlugin::handle_message`]; a failed send
/// is logged and dropped.
#[derive(Error, Debug)]
pub enum PluginError {
    /// Host transport failure while sending a reply or card.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Result type for plugin operations.
pub type PluginResult<T> = std::result::Result<T, PluginError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PluginError::Transport("connection reset".to_string());
        assert_eq!(err.to_string(), "transport error: connection reset");
    }
}
