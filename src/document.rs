//! The in-memory profile document: per-user reads, validated statistic
//! updates, game-event transitions, and rename.

use crate::error::{Result, StoreError};
use crate::types::{GameEvent, StatField, UserRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The full on-disk document: username -> record.
///
/// Usernames are case-sensitive and unique by construction. The map is the
/// entire file content; every store operation works on a freshly loaded copy
/// and persists the whole thing back.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileDocument {
    records: BTreeMap<String, UserRecord>,
}

impl ProfileDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn contains(&self, username: &str) -> bool {
        self.records.contains_key(username)
    }

    pub fn get(&self, username: &str) -> Option<&UserRecord> {
        self.records.get(username)
    }

    /// Insert or replace a record. Account creation goes through here.
    pub fn insert(&mut self, username: impl Into<String>, record: UserRecord) {
        self.records.insert(username.into(), record);
    }

    /// All usernames, for display in a login screen.
    pub fn usernames(&self) -> Vec<String> {
        self.records.keys().cloned().collect()
    }

    // --- Accessor ---

    /// Read a counter for a user.
    ///
    /// Missing user, missing `statistics` object, and missing field all read
    /// as 0; a caller cannot distinguish absent data from a stored zero here.
    pub fn stat(&self, username: &str, field: StatField) -> u64 {
        self.records
            .get(username)
            .and_then(|record| record.statistics.as_ref())
            .map(|stats| stats.get(field))
            .unwrap_or(0)
    }

    /// `games_win / games_played`, or 0.0 for a user with no games.
    pub fn win_rate(&self, username: &str) -> f64 {
        self.rate(username, StatField::GamesWin, StatField::GamesPlayed)
    }

    /// `guess_hit / guess_total`, or 0.0 for a user with no guesses.
    pub fn hit_rate(&self, username: &str) -> f64 {
        self.rate(username, StatField::GuessHit, StatField::GuessTotal)
    }

    fn rate(&self, username: &str, numerator: StatField, denominator: StatField) -> f64 {
        let total = self.stat(username, denominator);
        if total == 0 {
            return 0.0;
        }
        self.stat(username, numerator) as f64 / total as f64
    }

    // --- Mutator ---

    /// Set a counter to `value`, enforcing the pair ordering.
    ///
    /// Unlike reads, an update requires the `statistics` object to exist:
    /// there is nothing to update otherwise. Individual fields may still be
    /// absent; they count as 0 for the bound check.
    pub fn update_stat(&mut self, username: &str, field: StatField, value: u64) -> Result<()> {
        let record = self
            .records
            .get_mut(username)
            .ok_or_else(|| StoreError::UserNotFound(username.to_string()))?;

        let stats = record
            .statistics
            .as_mut()
            .ok_or_else(|| StoreError::StatisticsMissing(username.to_string()))?;

        let bound_field = field.paired();
        let bound = stats.get(bound_field);
        let violated = if field.bounded_above() {
            value > bound
        } else {
            value < bound
        };
        if violated {
            return Err(StoreError::InvariantViolation {
                field,
                value,
                bound_field,
                bound,
            });
        }

        stats.set(field, value);
        Ok(())
    }

    /// Apply a game event as one transition.
    ///
    /// Counters advance in the event's declared order, each increment checked
    /// against the document as updated so far, so a won/hit event can never
    /// trip over its own first half.
    pub fn apply_event(&mut self, username: &str, event: GameEvent) -> Result<()> {
        for &field in event.counters() {
            let next = self.stat(username, field) + 1;
            self.update_stat(username, field, next)?;
        }
        Ok(())
    }

    // --- Rename ---

    /// Move a record to a new username, updating its stored `player_name`.
    ///
    /// The old key does not survive a successful rename.
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> Result<()> {
        if !self.records.contains_key(old_name) {
            return Err(StoreError::UserNotFound(old_name.to_string()));
        }
        if self.records.contains_key(new_name) {
            return Err(StoreError::DuplicateUser(new_name.to_string()));
        }
        if self
            .records
            .get(old_name)
            .is_some_and(|record| record.profile.is_none())
        {
            return Err(StoreError::ProfileMissing(old_name.to_string()));
        }

        if let Some(mut record) = self.records.remove(old_name) {
            if let Some(profile) = record.profile.as_mut() {
                profile.player_name = Some(new_name.to_string());
            }
            self.records.insert(new_name.to_string(), record);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Statistics;

    fn doc_with(username: &str, played: i64, win: i64, total: i64, hit: i64) -> ProfileDocument {
        let mut doc = ProfileDocument::new();
        let mut record = UserRecord::new(username);
        record.statistics = Some(Statistics {
            games_played: Some(played),
            games_win: Some(win),
            guess_total: Some(total),
            guess_hit: Some(hit),
            ..Default::default()
        });
        doc.insert(username, record);
        doc
    }

    #[test]
    fn test_stat_defaults_to_zero() {
        let doc = ProfileDocument::new();
        assert_eq!(doc.stat("ghost", StatField::GamesPlayed), 0);

        let mut doc = ProfileDocument::new();
        doc.insert("bare", UserRecord::default());
        assert_eq!(doc.stat("bare", StatField::GamesWin), 0);
    }

    #[test]
    fn test_rates() {
        let doc = doc_with("x", 4, 3, 10, 5);
        assert_eq!(doc.win_rate("x"), 0.75);
        assert_eq!(doc.hit_rate("x"), 0.5);

        // No games yet: defined as zero, not an error
        let doc = doc_with("y", 0, 0, 0, 0);
        assert_eq!(doc.win_rate("y"), 0.0);
        assert_eq!(doc.hit_rate("y"), 0.0);
    }

    #[test]
    fn test_update_rejects_win_above_played() {
        let mut doc = doc_with("x", 5, 3, 0, 0);
        let result = doc.update_stat("x", StatField::GamesWin, 6);
        assert!(matches!(
            result,
            Err(StoreError::InvariantViolation {
                field: StatField::GamesWin,
                value: 6,
                bound_field: StatField::GamesPlayed,
                bound: 5,
            })
        ));
        // Rejected update leaves the document untouched
        assert_eq!(doc.stat("x", StatField::GamesWin), 3);
    }

    #[test]
    fn test_update_rejects_played_below_win() {
        let mut doc = doc_with("x", 5, 3, 0, 0);
        assert!(doc.update_stat("x", StatField::GamesPlayed, 2).is_err());
        assert!(doc.update_stat("x", StatField::GamesPlayed, 3).is_ok());
    }

    #[test]
    fn test_update_rejects_guess_pair_crossings() {
        let mut doc = doc_with("x", 0, 0, 4, 4);
        assert!(doc.update_stat("x", StatField::GuessHit, 5).is_err());
        assert!(doc.update_stat("x", StatField::GuessTotal, 3).is_err());
        assert!(doc.update_stat("x", StatField::GuessTotal, 9).is_ok());
    }

    #[test]
    fn test_update_requires_statistics_object() {
        let mut doc = ProfileDocument::new();
        let mut record = UserRecord::new("x");
        record.statistics = None;
        doc.insert("x", record);

        let result = doc.update_stat("x", StatField::GamesPlayed, 1);
        assert!(matches!(result, Err(StoreError::StatisticsMissing(_))));
    }

    #[test]
    fn test_update_with_missing_subfields() {
        // `statistics: {}` is writable: absent fields count as 0 bounds
        let mut doc = ProfileDocument::new();
        let mut record = UserRecord::new("x");
        record.statistics = Some(Statistics::default());
        doc.insert("x", record);

        doc.update_stat("x", StatField::GamesPlayed, 2).unwrap();
        assert_eq!(doc.stat("x", StatField::GamesPlayed), 2);
    }

    #[test]
    fn test_negative_bound_counts_as_zero() {
        let mut doc = doc_with("x", 5, -3, 0, 0);
        // Raw wins is -3; the check sees 0, so played may drop to 0
        doc.update_stat("x", StatField::GamesPlayed, 0).unwrap();
    }

    #[test]
    fn test_won_increments_both() {
        let mut doc = doc_with("x", 5, 3, 0, 0);
        doc.apply_event("x", GameEvent::Won).unwrap();
        assert_eq!(doc.stat("x", StatField::GamesPlayed), 6);
        assert_eq!(doc.stat("x", StatField::GamesWin), 4);
    }

    #[test]
    fn test_won_at_equal_counters_is_not_rejected() {
        // The transient state after the first increment must not trip the
        // second one
        let mut doc = doc_with("x", 3, 3, 0, 0);
        doc.apply_event("x", GameEvent::Won).unwrap();
        assert_eq!(doc.stat("x", StatField::GamesPlayed), 4);
        assert_eq!(doc.stat("x", StatField::GamesWin), 4);
    }

    #[test]
    fn test_hit_then_miss() {
        let mut doc = doc_with("x", 0, 0, 2, 2);
        doc.apply_event("x", GameEvent::Hit).unwrap();
        assert_eq!(doc.stat("x", StatField::GuessTotal), 3);
        assert_eq!(doc.stat("x", StatField::GuessHit), 3);

        doc.apply_event("x", GameEvent::Miss).unwrap();
        assert_eq!(doc.stat("x", StatField::GuessTotal), 4);
        assert_eq!(doc.stat("x", StatField::GuessHit), 3);
    }

    #[test]
    fn test_event_on_corrupt_record_rejects() {
        // wins already exceed played by 2; even the played+1 step is invalid
        let mut doc = doc_with("x", 3, 5, 0, 0);
        let result = doc.apply_event("x", GameEvent::Won);
        assert!(matches!(
            result,
            Err(StoreError::InvariantViolation { .. })
        ));
    }

    #[test]
    fn test_event_on_unknown_user() {
        let mut doc = ProfileDocument::new();
        let result = doc.apply_event("ghost", GameEvent::Lost);
        assert!(matches!(result, Err(StoreError::UserNotFound(_))));
    }

    #[test]
    fn test_rename_moves_record() {
        let mut doc = doc_with("a", 5, 3, 2, 1);
        doc.rename("a", "b").unwrap();

        assert!(!doc.contains("a"));
        let record = doc.get("b").unwrap();
        assert_eq!(
            record.profile.as_ref().unwrap().player_name.as_deref(),
            Some("b")
        );
        // Statistics travel with the record
        assert_eq!(doc.stat("b", StatField::GamesPlayed), 5);

        // The old name is gone for good
        assert!(matches!(
            doc.rename("a", "c"),
            Err(StoreError::UserNotFound(_))
        ));
    }

    #[test]
    fn test_rename_rejects_taken_name() {
        let mut doc = doc_with("a", 0, 0, 0, 0);
        doc.insert("b", UserRecord::new("b"));
        assert!(matches!(
            doc.rename("a", "b"),
            Err(StoreError::DuplicateUser(_))
        ));
        assert!(doc.contains("a"));
    }

    #[test]
    fn test_rename_requires_profile_object() {
        let mut doc = ProfileDocument::new();
        doc.insert("a", UserRecord::default());
        assert!(matches!(
            doc.rename("a", "b"),
            Err(StoreError::ProfileMissing(_))
        ));
        assert!(doc.contains("a"));
    }
}
