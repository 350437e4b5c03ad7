//! Message dispatch.
//!
//! [`MusicPlugin::handle_message`] is the single entry point the host calls
//! for every inbound text message. It classifies the message, drives the
//! catalog client and session store, and reports back whether the message
//! was consumed. Errors never escape it: each failure path either replies
//! to the user or logs, and the host always gets a definite [`Disposition`].

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use encore_catalog::{CatalogClient, SearchResult, TrackDetail};
use encore_settings::{Settings, SettingsStore};

use crate::card::{MUSIC_APP_MESSAGE_TYPE, MusicCard};
use crate::commands::{Command, parse_command};
use crate::host::{ChatTransport, Disposition, InboundMessage};
use crate::session::SessionStore;

/// Banner prepended to text replies so users can tell this plugin's
/// messages apart from siblings sharing the conversation.
const REPLY_PREFIX: &str = "-----Encore-----\n";

/// The song-request plugin. One instance serves one hosted account.
pub struct MusicPlugin {
    settings: Arc<SettingsStore>,
    sessions: SessionStore,
    catalog: CatalogClient,
}

impl MusicPlugin {
    /// Create a plugin around an opened settings store.
    pub fn new(settings: Arc<SettingsStore>) -> Self {
        let current = settings.snapshot();
        info!(
            "music plugin ready | enabled: {} | triggers: {:?} | play command: {} | api: {} | card: {}",
            current.enabled,
            current.commands,
            current.play_command,
            current.api_url,
            current.card_variant
        );
        let catalog = CatalogClient::new(current.api_url);
        Self {
            settings,
            sessions: SessionStore::new(),
            catalog,
        }
    }

    /// Handle one inbound text message and tell the host what to do next.
    pub async fn handle_message(
        &self,
        transport: &dyn ChatTransport,
        message: &InboundMessage,
    ) -> Disposition {
        let settings = self.settings.snapshot();
        if settings.log.enabled {
            info!(
                "message received | sender: {} | content: {}",
                message.sender_id, message.content
            );
        }
        if !settings.enabled {
            if settings.log.enabled {
                debug!("plugin disabled | passing message through");
            }
            return Disposition::PassThrough;
        }

        match parse_command(&message.content, &settings) {
            Command::Search { query } => {
                if settings.log.enabled {
                    info!(
                        "search command | sender: {} | query: {}",
                        message.sender_id, query
                    );
                }
                if settings.show_song_list {
                    self.handle_search_listing(transport, message, &settings, &query)
                        .await;
                } else {
                    self.handle_search_direct(transport, message, &settings, &query)
                        .await;
                }
                Disposition::Handled
            }
            Command::SearchUsage => {
                if settings.log.enabled {
                    warn!(
                        "search command without query | sender: {} | content: {}",
                        message.sender_id, message.content
                    );
                }
                let text = format!(
                    "{REPLY_PREFIX}❌ Wrong command format! Usage: {}",
                    settings.command_format
                );
                self.reply(transport, message, &text).await;
                Disposition::Handled
            }
            Command::Play { index } => {
                info!(
                    "play command | sender: {} | content: {}",
                    message.sender_id, message.content
                );
                self.handle_play(transport, message, &settings, index.as_deref())
                    .await;
                Disposition::Handled
            }
            Command::Authenticate { secret } => {
                self.handle_authenticate(transport, message, secret.as_deref())
                    .await;
                Disposition::Handled
            }
            Command::ToggleCard => {
                self.handle_toggle_card(transport, message).await;
                Disposition::Handled
            }
            Command::ToggleLogging => {
                self.handle_toggle_logging(transport, message).await;
                Disposition::Handled
            }
            Command::ToggleSongList => {
                self.handle_toggle_song_list(transport, message).await;
                Disposition::Handled
            }
            Command::Unrelated => {
                debug!("no command matched | content: {}", message.content);
                Disposition::PassThrough
            }
        }
    }

    /// Send a text reply into the conversation, mentioning the sender.
    async fn reply(&self, transport: &dyn ChatTransport, message: &InboundMessage, text: &str) {
        let mentions = [message.sender_id.clone()];
        if let Err(e) = transport
            .send_text(&message.conversation_id, text, &mentions)
            .await
        {
            error!(
                "failed to send reply | conversation: {} | error: {}",
                message.conversation_id, e
            );
        }
    }

    /// List mode: search, reply with a numbered listing, remember the list.
    async fn handle_search_listing(
        &self,
        transport: &dyn ChatTransport,
        message: &InboundMessage,
        settings: &Settings,
        query: &str,
    ) {
        let results = self.catalog.list_candidates(query).await;
        if results.is_empty() {
            if settings.log.enabled {
                warn!("search returned nothing | query: {}", query);
            }
            self.reply(
                transport,
                message,
                &format!("{REPLY_PREFIX}❌ No matching songs found!"),
            )
            .await;
            return;
        }

        let listing = render_listing(&results, &settings.play_command);
        // Store before replying so a fast follow-up play finds the list.
        self.sessions.remember(&message.conversation_id, results);
        self.reply(transport, message, &listing).await;
    }

    /// Direct mode: skip the listing and send a card for the first match.
    async fn handle_search_direct(
        &self,
        transport: &dyn ChatTransport,
        message: &InboundMessage,
        settings: &Settings,
        query: &str,
    ) {
        if settings.log.enabled {
            debug!("direct mode | fetching first match | query: {}", query);
        }
        match self.catalog.fetch_detail(query, 1).await {
            Ok(detail) => self.deliver_card(transport, message, settings, &detail).await,
            Err(e) => {
                if settings.log.enabled {
                    error!("failed to fetch song info | query: {} | error: {}", query, e);
                }
                self.reply(
                    transport,
                    message,
                    &format!("{REPLY_PREFIX}❌ Failed to fetch song info!"),
                )
                .await;
            }
        }
    }

    /// Resolve a play selection against the conversation's stored list.
    async fn handle_play(
        &self,
        transport: &dyn ChatTransport,
        message: &InboundMessage,
        settings: &Settings,
        index: Option<&str>,
    ) {
        let Some(index) = index.and_then(|token| token.parse::<usize>().ok()) else {
            warn!(
                "play selection is not a number | sender: {} | content: {}",
                message.sender_id, message.content
            );
            self.reply(
                transport,
                message,
                &format!("{REPLY_PREFIX}❌ Please enter a valid song number!"),
            )
            .await;
            return;
        };

        debug!(
            "play selection | sender: {} | index: {}",
            message.sender_id, index
        );
        let Some(song) = self.sessions.select(&message.conversation_id, index) else {
            warn!(
                "play selection out of range | conversation: {} | index: {} | stored: {}",
                message.conversation_id,
                index,
                self.sessions.stored_len(&message.conversation_id)
            );
            self.reply(
                transport,
                message,
                &format!("{REPLY_PREFIX}❌ Invalid song number!"),
            )
            .await;
            return;
        };

        // The detail endpoint wants the title plus the same ordinal the
        // listing assigned, so same-named tracks stay disambiguated.
        match self.catalog.fetch_detail(&song.title, index as u32).await {
            Ok(detail) => self.deliver_card(transport, message, settings, &detail).await,
            Err(e) => {
                error!(
                    "failed to fetch song info | title: {} | index: {} | error: {}",
                    song.title, index, e
                );
                self.reply(
                    transport,
                    message,
                    &format!("{REPLY_PREFIX}❌ Failed to fetch song info!"),
                )
                .await;
            }
        }
    }

    /// Render a music card and hand it to the host transport.
    async fn deliver_card(
        &self,
        transport: &dyn ChatTransport,
        message: &InboundMessage,
        settings: &Settings,
        detail: &TrackDetail,
    ) {
        let card = MusicCard::from_detail(detail);
        let xml = card.render(settings.card_variant, transport.self_id());
        if let Err(e) = transport
            .send_app_message(&message.conversation_id, &xml, MUSIC_APP_MESSAGE_TYPE)
            .await
        {
            error!(
                "failed to send music card | conversation: {} | error: {}",
                message.conversation_id, e
            );
        }
    }

    /// `auth <secret>`: check the shared secret and record the sender.
    async fn handle_authenticate(
        &self,
        transport: &dyn ChatTransport,
        message: &InboundMessage,
        secret: Option<&str>,
    ) {
        let Some(secret) = secret else {
            self.reply(
                transport,
                message,
                &format!("{REPLY_PREFIX}❌ Usage: auth <password>"),
            )
            .await;
            return;
        };

        let expected = match self.settings.admin_secret() {
            Ok(expected) => expected,
            Err(e) => {
                error!("failed to read admin secret | error: {}", e);
                self.reply(
                    transport,
                    message,
                    &format!("{REPLY_PREFIX}❌ Failed to check password: {e}"),
                )
                .await;
                return;
            }
        };
        if secret != expected {
            warn!("wrong admin password | sender: {}", message.sender_id);
            self.reply(transport, message, &format!("{REPLY_PREFIX}❌ Wrong password!"))
                .await;
            return;
        }

        match self.settings.grant_admin(&message.sender_id) {
            Ok(true) => {
                info!("admin granted | sender: {}", message.sender_id);
                self.reply(
                    transport,
                    message,
                    &format!("{REPLY_PREFIX}✅ You are now an admin!"),
                )
                .await;
            }
            Ok(false) => {
                self.reply(
                    transport,
                    message,
                    &format!("{REPLY_PREFIX}✅ You are already authenticated!"),
                )
                .await;
            }
            Err(e) => {
                error!(
                    "failed to persist admin grant | sender: {} | error: {}",
                    message.sender_id, e
                );
                self.reply(
                    transport,
                    message,
                    &format!("{REPLY_PREFIX}❌ Failed to save settings: {e}"),
                )
                .await;
            }
        }
    }

    /// Reject non-admin senders with a pointer at `auth`.
    async fn require_admin(
        &self,
        transport: &dyn ChatTransport,
        message: &InboundMessage,
    ) -> bool {
        if self.settings.is_admin(&message.sender_id) {
            return true;
        }
        warn!("unauthorized admin command | sender: {}", message.sender_id);
        self.reply(
            transport,
            message,
            &format!("{REPLY_PREFIX}❌ You are not authorized to do that. Send \"auth <password>\" first."),
        )
        .await;
        false
    }

    async fn handle_toggle_card(&self, transport: &dyn ChatTransport, message: &InboundMessage) {
        if !self.require_admin(transport, message).await {
            return;
        }
        match self.settings.toggle_card_variant() {
            Ok(variant) => {
                info!("card variant switched | variant: {}", variant);
                self.reply(
                    transport,
                    message,
                    &format!("{REPLY_PREFIX}✅ Card style switched to {variant}!"),
                )
                .await;
            }
            Err(e) => {
                error!("failed to persist card variant | error: {}", e);
                self.reply(
                    transport,
                    message,
                    &format!("{REPLY_PREFIX}❌ Failed to save settings: {e}"),
                )
                .await;
            }
        }
    }

    async fn handle_toggle_logging(&self, transport: &dyn ChatTransport, message: &InboundMessage) {
        if !self.require_admin(transport, message).await {
            return;
        }
        match self.settings.toggle_logging() {
            Ok(enabled) => {
                info!("verbose logging toggled | enabled: {}", enabled);
                let state = if enabled { "on" } else { "off" };
                self.reply(
                    transport,
                    message,
                    &format!("{REPLY_PREFIX}✅ Logging turned {state}!"),
                )
                .await;
            }
            Err(e) => {
                error!("failed to persist logging toggle | error: {}", e);
                self.reply(
                    transport,
                    message,
                    &format!("{REPLY_PREFIX}❌ Failed to save settings: {e}"),
                )
                .await;
            }
        }
    }

    async fn handle_toggle_song_list(
        &self,
        transport: &dyn ChatTransport,
        message: &InboundMessage,
    ) {
        if !self.require_admin(transport, message).await {
            return;
        }
        match self.settings.toggle_song_list() {
            Ok(enabled) => {
                info!("song list display toggled | enabled: {}", enabled);
                let state = if enabled { "on" } else { "off" };
                self.reply(
                    transport,
                    message,
                    &format!("{REPLY_PREFIX}✅ Song list display turned {state}!"),
                )
                .await;
            }
            Err(e) => {
                error!("failed to persist song list toggle | error: {}", e);
                self.reply(
                    transport,
                    message,
                    &format!("{REPLY_PREFIX}❌ Failed to save settings: {e}"),
                )
                .await;
            }
        }
    }
}

/// Render the numbered candidate listing shown after a search.
fn render_listing(results: &[SearchResult], play_command: &str) -> String {
    let mut text = String::from("🎶----- Songs found -----🎶\n");
    for (i, song) in results.iter().enumerate() {
        text.push_str(&format!("{}. 🎵 {} - {} 🎤\n", i + 1, song.title, song.singer));
    }
    text.push_str("_________________________\n");
    text.push_str(&format!("🎵 Send \"{play_command} <number>\" to play a song 🎵"));
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_listing_layout() {
        let results = vec![
            SearchResult {
                ordinal: 1,
                title: "Song A".to_string(),
                singer: "Artist A".to_string(),
            },
            SearchResult {
                ordinal: 2,
                title: "Song B".to_string(),
                singer: "Artist B".to_string(),
            },
        ];
        let listing = render_listing(&results, "play");

        assert!(listing.starts_with("🎶----- Songs found -----🎶\n"));
        assert!(listing.contains("1. 🎵 Song A - Artist A 🎤\n"));
        assert!(listing.contains("2. 🎵 Song B - Artist B 🎤\n"));
        assert!(listing.ends_with("🎵 Send \"play <number>\" to play a song 🎵"));
    }

    #[test]
    fn test_render_listing_numbers_by_position() {
        // Display numbering follows list position, not parsed ordinals.
        let results = vec![SearchResult {
            ordinal: 7,
            title: "Only".to_string(),
            singer: "One".to_string(),
        }];
        let listing = render_listing(&results, "play");
        assert!(listing.contains("1. 🎵 Only - One 🎤"));
    }
}
