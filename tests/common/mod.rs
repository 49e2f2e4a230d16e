use async_trait::async_trait;
use diesel::r2d2::ConnectionManager;
use diesel::sqlite::SqliteConnection;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use trophycalc_core::db::{self, DbPool};
use trophycalc_core::steam::{
    FetchOutcome, GlobalPercentage, OwnedGame, PlayerAchievement, SchemaAchievement, SteamApi,
};
use trophycalc_core::users::{NewUserProfile, User, UsersRepository};

/// One shared in-memory database per test. A single pooled connection
/// keeps every query on the same SQLite instance.
pub fn setup_pool() -> Arc<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(":memory:");
    let pool = diesel::r2d2::Pool::builder()
        .max_size(1)
        .build(manager)
        .expect("Failed to create in-memory pool");

    let pool = Arc::new(pool);
    db::run_migrations(&pool).expect("Failed to run migrations");
    pool
}

pub fn insert_user(pool: &Arc<DbPool>, steam_id: &str) -> User {
    UsersRepository::new(pool.clone())
        .upsert_profile(NewUserProfile {
            steam_id_64: steam_id.to_string(),
            name: format!("player-{}", steam_id),
            avatar: None,
            profile_url: None,
        })
        .expect("Failed to insert user")
}

pub fn owned(app_id: i64, name: &str) -> OwnedGame {
    OwnedGame {
        app_id,
        name: name.to_string(),
        img_icon_url: None,
        playtime_forever: 0,
    }
}

pub fn unlocked(api_name: &str, unlock_time: i64) -> PlayerAchievement {
    PlayerAchievement {
        api_name: api_name.to_string(),
        achieved: 1,
        unlock_time,
    }
}

pub fn locked(api_name: &str) -> PlayerAchievement {
    PlayerAchievement {
        api_name: api_name.to_string(),
        achieved: 0,
        unlock_time: 0,
    }
}

pub fn percentage(api_name: &str, percent: f64) -> GlobalPercentage {
    GlobalPercentage {
        name: api_name.to_string(),
        percent,
    }
}

/// Programmable stand-in for the Steam Web API. Every endpoint answers
/// EmptyOrUnsupported until an outcome is installed for it.
#[derive(Default)]
pub struct MockSteamApi {
    owned_games: Mutex<Option<FetchOutcome<Vec<OwnedGame>>>>,
    achievements: Mutex<HashMap<i64, FetchOutcome<Vec<PlayerAchievement>>>>,
    schemas: Mutex<HashMap<i64, Vec<SchemaAchievement>>>,
    percentages: Mutex<HashMap<i64, FetchOutcome<Vec<GlobalPercentage>>>>,
    pub achievement_calls: AtomicUsize,
    pub owned_games_calls: AtomicUsize,
}

impl MockSteamApi {
    pub fn set_owned_games(&self, outcome: FetchOutcome<Vec<OwnedGame>>) {
        *self.owned_games.lock().unwrap() = Some(outcome);
    }

    pub fn set_achievements(&self, app_id: i64, outcome: FetchOutcome<Vec<PlayerAchievement>>) {
        self.achievements.lock().unwrap().insert(app_id, outcome);
    }

    pub fn set_schema(&self, app_id: i64, schema: Vec<SchemaAchievement>) {
        self.schemas.lock().unwrap().insert(app_id, schema);
    }

    pub fn set_percentages(&self, app_id: i64, outcome: FetchOutcome<Vec<GlobalPercentage>>) {
        self.percentages.lock().unwrap().insert(app_id, outcome);
    }
}

#[async_trait]
impl SteamApi for MockSteamApi {
    async fn get_owned_games(&self, _steam_id: &str) -> FetchOutcome<Vec<OwnedGame>> {
        self.owned_games_calls.fetch_add(1, Ordering::SeqCst);
        self.owned_games
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(FetchOutcome::EmptyOrUnsupported)
    }

    async fn get_player_achievements(
        &self,
        _steam_id: &str,
        app_id: i64,
    ) -> FetchOutcome<Vec<PlayerAchievement>> {
        self.achievement_calls.fetch_add(1, Ordering::SeqCst);
        self.achievements
            .lock()
            .unwrap()
            .get(&app_id)
            .cloned()
            .unwrap_or(FetchOutcome::EmptyOrUnsupported)
    }

    async fn get_schema_for_game(&self, app_id: i64) -> FetchOutcome<Vec<SchemaAchievement>> {
        match self.schemas.lock().unwrap().get(&app_id) {
            Some(schema) => FetchOutcome::Success(schema.clone()),
            None => FetchOutcome::EmptyOrUnsupported,
        }
    }

    async fn get_global_achievement_percentages(
        &self,
        app_id: i64,
    ) -> FetchOutcome<Vec<GlobalPercentage>> {
        self.percentages
            .lock()
            .unwrap()
            .get(&app_id)
            .cloned()
            .unwrap_or(FetchOutcome::EmptyOrUnsupported)
    }
}
