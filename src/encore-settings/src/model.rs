//! Settings document and its validation.

use serde::{Deserialize, Serialize};

use crate::{SettingsError, SettingsResult};

/// Which fixed card template wraps the track fields of an outgoing card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardVariant {
    /// Plain music card.
    #[default]
    Standard,
    /// "Shake to search" branded card.
    Shake,
}

impl CardVariant {
    /// The other variant.
    pub fn toggled(self) -> Self {
        match self {
            Self::Standard => Self::Shake,
            Self::Shake => Self::Standard,
        }
    }

    /// Lowercase name as written in the settings file.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Shake => "shake",
        }
    }
}

impl std::fmt::Display for CardVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted plugin settings.
///
/// Field order keeps the `log` table last so the document serializes as
/// valid TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Monotonic counter bumped on every persisted mutation.
    pub version: u64,
    /// Whether the plugin handles messages at all.
    pub enabled: bool,
    /// Accepted search trigger words.
    pub commands: Vec<String>,
    /// Usage hint shown when a search command has no song name.
    pub command_format: String,
    /// Trigger word for playing a listed candidate.
    pub play_command: String,
    /// Song-search API endpoint.
    pub api_url: String,
    /// Card template used for outgoing music cards.
    pub card_variant: CardVariant,
    /// Whether a search shows the candidate list first.
    pub show_song_list: bool,
    /// Senders allowed to run toggle commands.
    pub admins: Vec<String>,
    /// Plugin-side logging switches.
    pub log: LogSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: 0,
            enabled: true,
            commands: vec!["song".to_string()],
            command_format: "song <name>".to_string(),
            play_command: "play".to_string(),
            api_url: "https://music.example.com/api".to_string(),
            card_variant: CardVariant::Standard,
            show_song_list: true,
            admins: Vec::new(),
            log: LogSettings::default(),
        }
    }
}

/// Logging switches carried in the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Gates the plugin's chatty info/debug events.
    pub enabled: bool,
    /// Advisory level; installing a subscriber is the host's job.
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "debug".to_string(),
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Settings {
    /// Check the invariants the dispatcher relies on.
    pub fn validate(&self) -> SettingsResult<()> {
        if self.commands.is_empty() || self.commands.iter().any(|c| c.trim().is_empty()) {
            return Err(SettingsError::Invalid(
                "at least one non-empty search trigger is required".to_string(),
            ));
        }
        if self.play_command.trim().is_empty() {
            return Err(SettingsError::Invalid(
                "play_command must not be empty".to_string(),
            ));
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(SettingsError::Invalid(format!(
                "api_url must be an HTTP(S) URL, got {:?}",
                self.api_url
            )));
        }
        if !LOG_LEVELS.contains(&self.log.level.to_lowercase().as_str()) {
            return Err(SettingsError::Invalid(format!(
                "unknown log level {:?}",
                self.log.level
            )));
        }
        Ok(())
    }
}
