//! # Profile Store
//!
//! A single-file, JSON-backed profile store for a local guessing game: one
//! record per username with identity and cumulative play statistics, behind
//! read/update operations that keep the cross-field invariants intact.
//!
//! ## Core Concepts
//!
//! - **Document**: the whole backing file, a username -> record map
//! - **Records**: identity (`profile`) plus four play counters (`statistics`)
//! - **Invariants**: wins never exceed games played, hits never exceed
//!   guesses; checked before every write
//! - **Events**: won/lost/hit/miss transitions applied and persisted as one
//!   cycle
//!
//! ## Example
//!
//! ```ignore
//! use roster::{Store, StoreConfig};
//!
//! let store = Store::open(StoreConfig {
//!     path: "./profile.json".into(),
//! })?;
//!
//! if store.login("alice") {
//!     store.won("alice")?;
//!     println!("win rate: {:.2}", store.win_rate("alice"));
//! }
//! ```

pub mod document;
pub mod error;
pub mod store;
pub mod types;

// Re-exports
pub use document::ProfileDocument;
pub use error::{Result, StoreError};
pub use store::{LoadStatus, Store, StoreConfig};
pub use types::{GameEvent, Profile, StatField, Statistics, UserRecord};
