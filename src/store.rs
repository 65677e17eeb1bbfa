//! Main Store struct owning the backing file.
//!
//! Every public operation is one full load-mutate-save cycle against the
//! JSON document; there is no in-memory cache across calls.

use crate::document::ProfileDocument;
use crate::error::{Result, StoreError};
use crate::types::{GameEvent, StatField};
use fs2::FileExt;
use parking_lot::Mutex;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Store configuration.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Path of the backing JSON file.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./profile.json"),
        }
    }
}

/// Outcome of a document load.
///
/// Loads never hard-fail: a missing, empty, unreadable, or malformed file is
/// an empty document plus one of these statuses. Mutating operations upgrade
/// `MalformedDocument` and `Unreadable` to typed errors; the rest are normal
/// "no data yet" states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    /// Parsed document with at least one record.
    Loaded,
    /// File absent or zero-length.
    NoProfileData,
    /// Parsed to an object with no entries.
    EmptyDocument,
    /// Content was not a parsable profile document.
    MalformedDocument,
    /// File exists but could not be read.
    Unreadable,
}

impl LoadStatus {
    /// Text suitable for a UI status line.
    pub fn user_message(&self) -> &'static str {
        match self {
            LoadStatus::Loaded => "Profile found. Please log in.",
            LoadStatus::NoProfileData => "No profile found. Please sign up.",
            LoadStatus::EmptyDocument => "Profile is empty. Please sign up.",
            LoadStatus::MalformedDocument => "Error: Invalid profile format.",
            LoadStatus::Unreadable => "Error: Could not open the profile file.",
        }
    }
}

/// The profile store.
///
/// Provides the collaborator surface for:
/// - Enumerating usernames and checking logins
/// - Reading counters and derived win/hit rates
/// - Invariant-checked statistic updates and game events
/// - Renaming a user
pub struct Store {
    /// Store configuration.
    config: StoreConfig,

    /// Lock file for exclusive access across processes.
    _lock_file: File,

    /// Serializes load-mutate-save cycles within this process.
    cycle_lock: Mutex<()>,
}

impl Store {
    /// Open the store, taking exclusive ownership of the backing file.
    ///
    /// The backing file itself need not exist yet; its parent directory is
    /// created, and a sibling `.lock` file guards against a second process
    /// opening the same profile.
    pub fn open(config: StoreConfig) -> Result<Self> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let lock_file = Self::acquire_lock(&config.path)?;

        Ok(Self {
            config,
            _lock_file: lock_file,
            cycle_lock: Mutex::new(()),
        })
    }

    // --- Document Operations ---

    /// Read the backing file.
    ///
    /// Returns the parsed document plus a status; non-`Loaded` statuses come
    /// with an empty document.
    pub fn load(&self) -> (ProfileDocument, LoadStatus) {
        let _guard = self.cycle_lock.lock();
        self.load_unlocked()
    }

    /// Overwrite the backing file with the full document.
    pub fn save(&self, doc: &ProfileDocument) -> Result<()> {
        let _guard = self.cycle_lock.lock();
        self.save_unlocked(doc)
    }

    // --- Read Operations ---

    /// All usernames in the document, for display.
    pub fn usernames(&self) -> Vec<String> {
        let _guard = self.cycle_lock.lock();
        let (doc, _) = self.load_unlocked();
        doc.usernames()
    }

    /// True iff the username exists and its stored `player_name` matches the
    /// document key. A mismatch means the record is corrupt.
    pub fn login(&self, username: &str) -> bool {
        let _guard = self.cycle_lock.lock();
        let (doc, _) = self.load_unlocked();
        let ok = doc
            .get(username)
            .and_then(|record| record.profile.as_ref())
            .and_then(|profile| profile.player_name.as_deref())
            == Some(username);
        debug!(username, ok, "login check");
        ok
    }

    /// Read a counter; unknown users and missing data read as 0.
    pub fn stat(&self, username: &str, field: StatField) -> u64 {
        let _guard = self.cycle_lock.lock();
        let (doc, _) = self.load_unlocked();
        doc.stat(username, field)
    }

    pub fn games_played(&self, username: &str) -> u64 {
        self.stat(username, StatField::GamesPlayed)
    }

    pub fn wins(&self, username: &str) -> u64 {
        self.stat(username, StatField::GamesWin)
    }

    pub fn guess_total(&self, username: &str) -> u64 {
        self.stat(username, StatField::GuessTotal)
    }

    pub fn guess_hit(&self, username: &str) -> u64 {
        self.stat(username, StatField::GuessHit)
    }

    /// Fraction of games won, 0.0 for a user with no games.
    pub fn win_rate(&self, username: &str) -> f64 {
        let _guard = self.cycle_lock.lock();
        let (doc, _) = self.load_unlocked();
        doc.win_rate(username)
    }

    /// Fraction of guesses that hit, 0.0 for a user with no guesses.
    pub fn hit_rate(&self, username: &str) -> f64 {
        let _guard = self.cycle_lock.lock();
        let (doc, _) = self.load_unlocked();
        doc.hit_rate(username)
    }

    // --- Statistic Updates ---

    /// Set one counter, enforcing the pair ordering before anything is
    /// persisted. A rejected update leaves the file untouched.
    pub fn update_stat(&self, username: &str, field: StatField, value: u64) -> Result<()> {
        let _guard = self.cycle_lock.lock();
        let mut doc = self.load_for_update()?;
        doc.update_stat(username, field, value)?;
        self.save_unlocked(&doc)?;
        debug!(username, field = %field, value, "updated statistic");
        Ok(())
    }

    /// Apply a game event as one persisted transition.
    pub fn record_event(&self, username: &str, event: GameEvent) -> Result<()> {
        let _guard = self.cycle_lock.lock();
        let mut doc = self.load_for_update()?;
        doc.apply_event(username, event)?;
        self.save_unlocked(&doc)?;
        debug!(username, event = ?event, "recorded game event");
        Ok(())
    }

    /// The user played and won: `games_played` and `games_win` each +1.
    pub fn won(&self, username: &str) -> Result<()> {
        self.record_event(username, GameEvent::Won)
    }

    /// The user played and lost: `games_played` +1.
    pub fn lost(&self, username: &str) -> Result<()> {
        self.record_event(username, GameEvent::Lost)
    }

    /// A guess landed: `guess_total` and `guess_hit` each +1.
    pub fn hit(&self, username: &str) -> Result<()> {
        self.record_event(username, GameEvent::Hit)
    }

    /// A guess missed: `guess_total` +1.
    pub fn miss(&self, username: &str) -> Result<()> {
        self.record_event(username, GameEvent::Miss)
    }

    // --- Rename ---

    /// Move a record to a new username and update its stored `player_name`,
    /// in one persisted transition.
    pub fn rename_user(&self, old_name: &str, new_name: &str) -> Result<()> {
        let _guard = self.cycle_lock.lock();
        let mut doc = self.load_for_update()?;
        doc.rename(old_name, new_name)?;
        self.save_unlocked(&doc)?;
        debug!(old_name, new_name, "renamed user");
        Ok(())
    }

    // --- Store Operations ---

    /// Get the backing file path.
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    // --- Private Helpers ---

    fn load_unlocked(&self) -> (ProfileDocument, LoadStatus) {
        let path = &self.config.path;

        match fs::metadata(path) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return (ProfileDocument::new(), LoadStatus::NoProfileData);
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "could not stat profile file");
                return (ProfileDocument::new(), LoadStatus::Unreadable);
            }
            Ok(meta) if meta.len() == 0 => {
                return (ProfileDocument::new(), LoadStatus::NoProfileData);
            }
            Ok(_) => {}
        }

        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "could not read profile file");
                return (ProfileDocument::new(), LoadStatus::Unreadable);
            }
        };

        match serde_json::from_str::<ProfileDocument>(&raw) {
            Ok(doc) if doc.is_empty() => (doc, LoadStatus::EmptyDocument),
            Ok(doc) => (doc, LoadStatus::Loaded),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "profile file is not a valid document");
                (ProfileDocument::new(), LoadStatus::MalformedDocument)
            }
        }
    }

    /// Load for a mutating operation. Soft "no data yet" states proceed with
    /// an empty document (the target user then comes back as not found);
    /// unreadable or malformed content is a typed error.
    fn load_for_update(&self) -> Result<ProfileDocument> {
        let (doc, status) = self.load_unlocked();
        match status {
            LoadStatus::Loaded | LoadStatus::NoProfileData | LoadStatus::EmptyDocument => Ok(doc),
            LoadStatus::MalformedDocument => Err(StoreError::Malformed(
                "profile file is not a JSON object".to_string(),
            )),
            LoadStatus::Unreadable => Err(StoreError::Io(io::Error::new(
                io::ErrorKind::Other,
                "profile file could not be read",
            ))),
        }
    }

    fn save_unlocked(&self, doc: &ProfileDocument) -> Result<()> {
        // Serialize the complete document before touching the file
        let payload = serde_json::to_string_pretty(doc)?;
        fs::write(&self.config.path, payload)?;
        Ok(())
    }

    fn acquire_lock(path: &Path) -> Result<File> {
        let lock_path = path.with_extension("lock");
        let lock_file = File::create(lock_path)?;

        lock_file
            .try_lock_exclusive()
            .map_err(|_| StoreError::Locked)?;

        Ok(lock_file)
    }
}
