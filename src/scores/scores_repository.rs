use diesel::prelude::*;
use std::sync::Arc;

use crate::db::{get_connection, DbPool};
use crate::errors::Result;
use crate::schema::user_game_scores;

use super::scores_model::{UserGameScore, UserGameScoreDB};

pub struct ScoresRepository {
    pool: Arc<DbPool>,
}

impl ScoresRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    pub fn get_score(&self, for_user_id: &str, for_app_id: i64) -> Result<Option<UserGameScore>> {
        let mut conn = get_connection(&self.pool)?;

        let row = user_game_scores::table
            .find((for_user_id, for_app_id))
            .first::<UserGameScoreDB>(&mut conn)
            .optional()?;

        Ok(row.map(UserGameScore::from))
    }

    pub fn get_scores_for_user(&self, for_user_id: &str) -> Result<Vec<UserGameScore>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = user_game_scores::table
            .filter(user_game_scores::user_id.eq(for_user_id))
            .order(user_game_scores::app_id.asc())
            .load::<UserGameScoreDB>(&mut conn)?;

        Ok(rows.into_iter().map(UserGameScore::from).collect())
    }

    /// Full overwrite keyed by (user_id, app_id); creates the row on
    /// first sync. created_at survives updates.
    pub fn upsert_score(&self, score: &UserGameScore) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;

        let row = UserGameScoreDB::from(score.clone());
        diesel::insert_into(user_game_scores::table)
            .values(&row)
            .on_conflict((user_game_scores::user_id, user_game_scores::app_id))
            .do_update()
            .set((
                user_game_scores::xp_score.eq(row.xp_score),
                user_game_scores::is_completed.eq(row.is_completed),
                user_game_scores::unlocked_count.eq(row.unlocked_count),
                user_game_scores::total_count.eq(row.total_count),
                user_game_scores::updated_at.eq(row.updated_at),
            ))
            .execute(&mut conn)?;

        Ok(())
    }
}
