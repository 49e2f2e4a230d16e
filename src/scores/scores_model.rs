use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};

/// Fully recomputed score state for one (user, game) pair. Every write
/// replaces the whole row, so concurrent writers to the same key are
/// last-writer-wins-safe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserGameScore {
    pub user_id: String,
    pub app_id: i64,
    pub xp_score: i64,
    pub is_completed: bool,
    pub unlocked_count: i32,
    pub total_count: i32,
    pub updated_at: NaiveDateTime,
}

impl UserGameScore {
    /// Counts can only come from list lengths, so a violation here means
    /// a programming error. Fatal for the enclosing task, never coerced.
    pub fn validate(&self) -> Result<()> {
        if self.unlocked_count < 0 || self.total_count < 0 {
            return Err(ValidationError::InvalidInput(format!(
                "negative achievement count for user {} game {}",
                self.user_id, self.app_id
            ))
            .into());
        }
        if self.unlocked_count > self.total_count {
            return Err(ValidationError::InvalidInput(format!(
                "unlocked_count {} exceeds total_count {} for user {} game {}",
                self.unlocked_count, self.total_count, self.user_id, self.app_id
            ))
            .into());
        }
        Ok(())
    }
}

/// Result of one synchronizer pass over a (user, game) pair.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// A new snapshot was persisted.
    Updated(UserGameScore),
    /// The stored snapshot is still valid (completed short-circuit).
    Unchanged(i64),
    /// The unlock state was temporarily unknown; nothing was written.
    Skipped,
}

// --- DB Representation ---

#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = crate::schema::user_game_scores)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserGameScoreDB {
    pub user_id: String,
    pub app_id: i64,
    pub xp_score: i64,
    pub is_completed: bool,
    pub unlocked_count: i32,
    pub total_count: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<UserGameScoreDB> for UserGameScore {
    fn from(db: UserGameScoreDB) -> Self {
        Self {
            user_id: db.user_id,
            app_id: db.app_id,
            xp_score: db.xp_score,
            is_completed: db.is_completed,
            unlocked_count: db.unlocked_count,
            total_count: db.total_count,
            updated_at: db.updated_at,
        }
    }
}

impl From<UserGameScore> for UserGameScoreDB {
    fn from(domain: UserGameScore) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            user_id: domain.user_id,
            app_id: domain.app_id,
            xp_score: domain.xp_score,
            is_completed: domain.is_completed,
            unlocked_count: domain.unlocked_count,
            total_count: domain.total_count,
            created_at: now,
            updated_at: domain.updated_at,
        }
    }
}
