use chrono::Utc;
use diesel::prelude::*;
use std::sync::Arc;

use crate::db::{get_connection, DbPool};
use crate::errors::Result;
use crate::schema::users;

use super::users_model::{LeaderboardEntry, NewUserProfile, User, UserDB};

pub struct UsersRepository {
    pool: Arc<DbPool>,
}

impl UsersRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    pub fn get_by_id(&self, user_id: &str) -> Result<Option<User>> {
        let mut conn = get_connection(&self.pool)?;

        let row = users::table
            .find(user_id)
            .first::<UserDB>(&mut conn)
            .optional()?;

        Ok(row.map(User::from))
    }

    pub fn get_by_steam_id(&self, steam_id: &str) -> Result<Option<User>> {
        let mut conn = get_connection(&self.pool)?;

        let row = users::table
            .filter(users::steam_id_64.eq(steam_id))
            .first::<UserDB>(&mut conn)
            .optional()?;

        Ok(row.map(User::from))
    }

    /// Creates the user on first sign-in, refreshes the profile fields
    /// on later ones. Totals are owned by the projector and never
    /// touched here.
    pub fn upsert_profile(&self, profile: NewUserProfile) -> Result<User> {
        let mut conn = get_connection(&self.pool)?;

        let row = UserDB::from(profile);
        diesel::insert_into(users::table)
            .values(&row)
            .on_conflict(users::steam_id_64)
            .do_update()
            .set((
                users::name.eq(row.name.clone()),
                users::avatar.eq(row.avatar.clone()),
                users::profile_url.eq(row.profile_url.clone()),
                users::updated_at.eq(row.updated_at),
            ))
            .execute(&mut conn)?;

        let saved = users::table
            .filter(users::steam_id_64.eq(&row.steam_id_64))
            .first::<UserDB>(&mut conn)?;

        Ok(User::from(saved))
    }

    pub fn update_totals(&self, user_id: &str, total_xp: i64, games_completed: i32) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;

        let now = Utc::now().naive_utc();
        diesel::update(users::table.find(user_id))
            .set((
                users::total_xp.eq(total_xp),
                users::games_completed.eq(games_completed),
                users::profile_updated_at.eq(Some(now)),
                users::updated_at.eq(now),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    pub fn leaderboard(&self, limit: i64) -> Result<Vec<LeaderboardEntry>> {
        let mut conn = get_connection(&self.pool)?;

        let entries = users::table
            .filter(users::total_xp.gt(0))
            .order(users::total_xp.desc())
            .limit(limit)
            .select((
                users::name,
                users::avatar,
                users::total_xp,
                users::games_completed,
                users::steam_id_64,
            ))
            .load::<LeaderboardEntry>(&mut conn)?;

        Ok(entries)
    }
}
