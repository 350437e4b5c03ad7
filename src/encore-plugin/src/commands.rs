//! Message-to-command parsing.
//!
//! Incoming chat text is classified against the current settings into a
//! [`Command`]. Administrative commands use fixed keywords and are matched
//! before the configurable search and play triggers, so a misconfigured
//! trigger can never shadow `auth` and lock admins out.

use encore_settings::Settings;

/// Keyword that starts an admin authentication attempt.
pub const AUTH_COMMAND: &str = "auth";

/// Keyword that switches the rich card style.
pub const TOGGLE_CARD_COMMAND: &str = "togglecard";

/// Keyword that flips verbose logging.
pub const TOGGLE_LOG_COMMAND: &str = "togglelog";

/// Keyword that flips between list mode and direct-play mode.
pub const TOGGLE_LIST_COMMAND: &str = "togglelist";

/// A classified inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Search trigger followed by a query.
    Search {
        /// The search text, interior whitespace preserved.
        query: String,
    },
    /// Search trigger with no query; the sender needs a usage hint.
    SearchUsage,
    /// Play command, with whatever token followed it (if any).
    Play {
        /// Raw selection token; validated later against the stored list.
        index: Option<String>,
    },
    /// `auth <secret>` attempt.
    Authenticate {
        /// The supplied secret, if one was given.
        secret: Option<String>,
    },
    /// Switch the card style.
    ToggleCard,
    /// Flip verbose logging.
    ToggleLogging,
    /// Flip list mode / direct-play mode.
    ToggleSongList,
    /// Not addressed to this plugin.
    Unrelated,
}

/// Classify a message against the current settings.
///
/// A trigger only matches as the whole first whitespace-delimited token:
/// with trigger `song`, the text `songbird` is unrelated.
pub fn parse_command(content: &str, settings: &Settings) -> Command {
    let content = content.trim();
    let mut tokens = content.split_whitespace();
    let Some(first) = tokens.next() else {
        return Command::Unrelated;
    };

    // Admin keywords win over configured triggers.
    match first {
        AUTH_COMMAND => {
            return Command::Authenticate {
                secret: tokens.next().map(str::to_string),
            };
        }
        TOGGLE_CARD_COMMAND => return Command::ToggleCard,
        TOGGLE_LOG_COMMAND => return Command::ToggleLogging,
        TOGGLE_LIST_COMMAND => return Command::ToggleSongList,
        _ => {}
    }

    if settings.commands.iter().any(|cmd| cmd == first) {
        // `content` is trimmed, so the first token starts at byte 0.
        let query = content[first.len()..].trim();
        if query.is_empty() {
            return Command::SearchUsage;
        }
        return Command::Search {
            query: query.to_string(),
        };
    }

    if first == settings.play_command {
        return Command::Play {
            index: tokens.next().map(str::to_string),
        };
    }

    Command::Unrelated
}
