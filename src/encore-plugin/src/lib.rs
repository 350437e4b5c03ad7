//! Song-request plugin for Encore.
//!
//! This crate provides everything the host chat framework touches:
//! - Command dispatch for search, play and admin commands
//! - Per-conversation session state resolving numbered play selections
//! - Music card rendering in the host client's rich-media format
//!
//! # Architecture
//!
//! The integration is built around the `MusicPlugin` struct which owns:
//! - The catalog client for the external song-search API
//! - The versioned settings store
//! - The per-conversation session map
//!
//! The host calls [`MusicPlugin::handle_message`] for every inbound text
//! message and routes the returned [`Disposition`] back into its dispatch
//! chain: a handled message stops there, anything else stays visible to
//! sibling plugins.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use encore_plugin::MusicPlugin;
//! use encore_settings::SettingsStore;
//!
//! let settings = Arc::new(SettingsStore::open("plugins/encore")?);
//! let plugin = MusicPlugin::new(settings);
//! let disposition = plugin.handle_message(&transport, &message).await;
//! ```

pub mod card;
pub mod commands;
pub mod error;
pub mod host;
pub mod plugin;
pub mod session;

// Re-export main types
pub use card::{MUSIC_APP_MESSAGE_TYPE, MusicCard};
pub use commands::{Command, parse_command};
pub use error::{PluginError, PluginResult};
pub use host::{ChatTransport, Disposition, InboundMessage};
pub use plugin::MusicPlugin;
pub use session::SessionStore;
