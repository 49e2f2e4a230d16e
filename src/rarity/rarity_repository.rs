use diesel::prelude::*;
use std::sync::Arc;

use crate::db::{get_connection, DbPool};
use crate::errors::Result;
use crate::schema::global_achievements;

use super::rarity_model::{GlobalAchievement, GlobalAchievementDB};

pub struct RarityRepository {
    pool: Arc<DbPool>,
}

impl RarityRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Upserts all rows for one game inside a single transaction.
    /// Conflicting rows only get percent/value/updated_at refreshed; the
    /// identity columns and created_at are left untouched.
    pub fn upsert_batch(&self, records: &[GlobalAchievement]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let mut conn = get_connection(&self.pool)?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            for record in records {
                let row = GlobalAchievementDB::from(record.clone());
                diesel::insert_into(global_achievements::table)
                    .values(&row)
                    .on_conflict((
                        global_achievements::app_id,
                        global_achievements::api_name,
                    ))
                    .do_update()
                    .set((
                        global_achievements::global_percent.eq(row.global_percent),
                        global_achievements::xp_value.eq(row.xp_value),
                        global_achievements::updated_at.eq(row.updated_at),
                    ))
                    .execute(conn)?;
            }
            Ok(())
        })?;

        Ok(())
    }

    pub fn get_for_game(&self, game_app_id: i64) -> Result<Vec<GlobalAchievement>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = global_achievements::table
            .filter(global_achievements::app_id.eq(game_app_id))
            .order(global_achievements::api_name.asc())
            .load::<GlobalAchievementDB>(&mut conn)?;

        Ok(rows.into_iter().map(GlobalAchievement::from).collect())
    }

    /// XP lookup map for one game, used by the pure score calculator.
    pub fn xp_values_by_api_name(
        &self,
        game_app_id: i64,
    ) -> Result<std::collections::HashMap<String, i32>> {
        let rows = self.get_for_game(game_app_id)?;
        Ok(rows.into_iter().map(|r| (r.api_name, r.xp_value)).collect())
    }
}
