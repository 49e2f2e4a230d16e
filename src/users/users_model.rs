use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// A tracked player. total_xp / games_completed are a materialized
/// projection over the user's score snapshots, not a source of truth.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub steam_id_64: String,
    pub name: String,
    pub avatar: Option<String>,
    pub profile_url: Option<String>,
    pub total_xp: i64,
    pub games_completed: i32,
    pub profile_updated_at: Option<NaiveDateTime>,
}

/// Profile fields captured when a player first signs in (or when their
/// Steam profile is re-fetched).
#[derive(Debug, Clone)]
pub struct NewUserProfile {
    pub steam_id_64: String,
    pub name: String,
    pub avatar: Option<String>,
    pub profile_url: Option<String>,
}

/// Public leaderboard row, read straight from the projection columns.
#[derive(Debug, Clone, Queryable, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub name: String,
    pub avatar: Option<String>,
    pub total_xp: i64,
    pub games_completed: i32,
    pub steam_id_64: String,
}

// --- DB Representation ---

#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDB {
    pub id: String,
    pub steam_id_64: String,
    pub name: String,
    pub avatar: Option<String>,
    pub profile_url: Option<String>,
    pub total_xp: i64,
    pub games_completed: i32,
    pub profile_updated_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<UserDB> for User {
    fn from(db: UserDB) -> Self {
        Self {
            id: db.id,
            steam_id_64: db.steam_id_64,
            name: db.name,
            avatar: db.avatar,
            profile_url: db.profile_url,
            total_xp: db.total_xp,
            games_completed: db.games_completed,
            profile_updated_at: db.profile_updated_at,
        }
    }
}

impl From<NewUserProfile> for UserDB {
    fn from(profile: NewUserProfile) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            steam_id_64: profile.steam_id_64,
            name: profile.name,
            avatar: profile.avatar,
            profile_url: profile.profile_url,
            total_xp: 0,
            games_completed: 0,
            profile_updated_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}
