//! File-backed settings store.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info, warn};

use crate::model::{CardVariant, Settings};
use crate::{SettingsError, SettingsResult};

/// Settings file name inside the store directory.
pub const SETTINGS_FILE: &str = "config.toml";

/// Shared-secret file name inside the store directory.
pub const SECRET_FILE: &str = "secret.txt";

/// Versioned, file-backed settings store.
///
/// Mutators apply a single field change, bump the version counter and persist
/// the whole document atomically before replacing the in-memory copy. A
/// failed write leaves the previous state intact.
#[derive(Debug)]
pub struct SettingsStore {
    dir: PathBuf,
    inner: Mutex<Settings>,
}

impl SettingsStore {
    /// Open the store rooted at `dir`, loading `config.toml` when present and
    /// falling back to defaults otherwise.
    pub fn open(dir: impl Into<PathBuf>) -> SettingsResult<Self> {
        let dir = dir.into();
        let path = dir.join(SETTINGS_FILE);

        let settings = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            let settings: Settings = toml::from_str(&raw)?;
            settings.validate()?;
            debug!("loaded settings from {}", path.display());
            settings
        } else {
            info!("no settings file at {}, using defaults", path.display());
            Settings::default()
        };

        Ok(Self {
            dir,
            inner: Mutex::new(settings),
        })
    }

    /// Directory the store persists into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Clone of the current settings.
    pub fn snapshot(&self) -> Settings {
        self.inner.lock().unwrap().clone()
    }

    /// Current version counter.
    pub fn version(&self) -> u64 {
        self.inner.lock().unwrap().version
    }

    /// Flip the card variant. Returns the new variant.
    pub fn toggle_card_variant(&self) -> SettingsResult<CardVariant> {
        self.mutate(|s| {
            s.card_variant = s.card_variant.toggled();
            s.card_variant
        })
    }

    /// Flip the plugin-side logging switch. Returns the new state.
    pub fn toggle_logging(&self) -> SettingsResult<bool> {
        self.mutate(|s| {
            s.log.enabled = !s.log.enabled;
            s.log.enabled
        })
    }

    /// Flip candidate-list display. Returns the new state.
    pub fn toggle_song_list(&self) -> SettingsResult<bool> {
        self.mutate(|s| {
            s.show_song_list = !s.show_song_list;
            s.show_song_list
        })
    }

    /// Add `sender` to the admin list.
    ///
    /// Returns `false` without touching the file when the sender is already
    /// an admin.
    pub fn grant_admin(&self, sender: &str) -> SettingsResult<bool> {
        let mut guard = self.inner.lock().unwrap();
        if guard.admins.iter().any(|a| a == sender) {
            return Ok(false);
        }
        let mut next = guard.clone();
        next.admins.push(sender.to_string());
        next.version += 1;
        self.persist(&next)?;
        debug!("settings persisted | version: {}", next.version);
        *guard = next;
        Ok(true)
    }

    /// Whether `sender` may run toggle commands.
    pub fn is_admin(&self, sender: &str) -> bool {
        self.inner.lock().unwrap().admins.iter().any(|a| a == sender)
    }

    /// Read the shared admin secret.
    ///
    /// The file is read fresh on every call so the secret can be rotated
    /// without a restart. A missing or empty file fails the check, never the
    /// process.
    pub fn admin_secret(&self) -> SettingsResult<String> {
        let path = self.dir.join(SECRET_FILE);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("admin secret file missing at {}", path.display());
                return Err(SettingsError::MissingSecret);
            }
            Err(e) => return Err(e.into()),
        };
        let secret = raw.trim();
        if secret.is_empty() {
            return Err(SettingsError::MissingSecret);
        }
        Ok(secret.to_string())
    }

    /// Apply a single-field change, persist it, then commit it in memory.
    fn mutate<T>(&self, apply: impl FnOnce(&mut Settings) -> T) -> SettingsResult<T> {
        let mut guard = self.inner.lock().unwrap();
        let mut next = guard.clone();
        let value = apply(&mut next);
        next.version += 1;
        self.persist(&next)?;
        debug!("settings persisted | version: {}", next.version);
        *guard = next;
        Ok(value)
    }

    fn persist(&self, settings: &Settings) -> SettingsResult<()> {
        let raw = toml::to_string_pretty(settings)?;
        atomic_write(&self.dir.join(SETTINGS_FILE), raw.as_bytes())?;
        Ok(())
    }
}

/// Write `content` through a same-directory temp file and rename it into
/// place, so the settings file is never left half-written.
fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));
    std::fs::create_dir_all(parent)?;

    let temp_name = format!(
        ".{}.tmp.{}",
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("settings"),
        std::process::id()
    );
    let temp_path = parent.join(temp_name);

    {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;
        file.write_all(content)?;
        file.sync_all()?;
    }

    std::fs::rename(&temp_path, path)?;

    #[cfg(unix)]
    if let Ok(dir) = std::fs::File::open(parent) {
        let _ = dir.sync_all();
    }

    Ok(())
}
