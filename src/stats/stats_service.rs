use chrono::Utc;
use log::{debug, info, warn};
use std::sync::Arc;

use crate::cache::{
    game_schema_key, global_completion_key, latest_achievements_key, nearly_completed_key,
    SharedCacheStore,
};
use crate::constants::{
    GAME_SCHEMA_CACHE_TTL, GLOBAL_COMPLETION_CACHE_TTL, LATEST_ACHIEVEMENTS_CACHE_TTL,
    LATEST_ACHIEVEMENTS_LIMIT, NEARLY_COMPLETED_CACHE_TTL, NEARLY_COMPLETED_LIMIT,
    NEARLY_COMPLETED_MIN_PERCENT,
};
use crate::errors::Result;
use crate::steam::{FetchOutcome, OwnedGame, SchemaAchievement, SteamApi};
use crate::users::User;

use super::stats_model::{GlobalCompletionStats, LatestAchievement, NearlyCompletedGame};

/// Refreshes the derived views a profile page reads: recent unlocks,
/// nearly-completed games and the library-wide completion ratio.
///
/// Every refresh recomputes the view from upstream and publishes the
/// result to the cache; reads only ever look at the cache and treat
/// absence as "never computed". A game whose achievement fetch fails is
/// skipped, the rest of the view is still produced.
pub struct StatsService {
    steam_api: Arc<dyn SteamApi>,
    cache: SharedCacheStore,
}

impl StatsService {
    pub fn new(steam_api: Arc<dyn SteamApi>, cache: SharedCacheStore) -> Self {
        Self { steam_api, cache }
    }

    pub async fn refresh_latest_achievements(&self, user: &User) -> Result<Vec<LatestAchievement>> {
        let games = match self.steam_api.get_owned_games(&user.steam_id_64).await {
            FetchOutcome::Success(games) => games,
            _ => {
                warn!(
                    "[Stats] Owned games unavailable for steam_id {}, keeping previous latest view",
                    user.steam_id_64
                );
                return Ok(Vec::new());
            }
        };

        let mut unlocks: Vec<(OwnedGame, String, i64)> = Vec::new();
        for game in games {
            let achievements = match self
                .steam_api
                .get_player_achievements(&user.steam_id_64, game.app_id)
                .await
            {
                FetchOutcome::Success(achievements) => achievements,
                FetchOutcome::EmptyOrUnsupported => continue,
                FetchOutcome::TransientFailure => {
                    debug!("[Stats] Skipping app {} in latest view", game.app_id);
                    continue;
                }
            };

            for achievement in achievements {
                if achievement.is_achieved() && achievement.unlock_time > 0 {
                    unlocks.push((game.clone(), achievement.api_name, achievement.unlock_time));
                }
            }
        }

        unlocks.sort_by(|a, b| b.2.cmp(&a.2));
        unlocks.truncate(LATEST_ACHIEVEMENTS_LIMIT);

        let mut latest = Vec::with_capacity(unlocks.len());
        for (game, api_name, unlock_time) in unlocks {
            let schema = self.schema_for_game(game.app_id).await;
            let definition = schema.iter().find(|a| a.name == api_name);

            latest.push(match definition {
                Some(def) => LatestAchievement {
                    app_id: game.app_id,
                    game_name: game.name.clone(),
                    api_name,
                    unlock_time,
                    name: def.display_name.clone(),
                    description: def.description.clone(),
                    icon: def.icon.clone(),
                    icon_gray: def.icon_gray.clone(),
                    hidden: def.hidden,
                },
                None => LatestAchievement {
                    app_id: game.app_id,
                    game_name: game.name.clone(),
                    name: api_name.clone(),
                    api_name,
                    unlock_time,
                    description: None,
                    icon: None,
                    icon_gray: None,
                    hidden: false,
                },
            });
        }

        self.cache
            .put(
                latest_achievements_key(&user.steam_id_64),
                serde_json::to_value(&latest)?,
                LATEST_ACHIEVEMENTS_CACHE_TTL,
            )
            .await;

        info!(
            "[Stats] Refreshed latest achievements for steam_id {} ({} unlocks)",
            user.steam_id_64,
            latest.len()
        );
        Ok(latest)
    }

    pub async fn refresh_nearly_completed_games(
        &self,
        user: &User,
    ) -> Result<Vec<NearlyCompletedGame>> {
        let games = match self.steam_api.get_owned_games(&user.steam_id_64).await {
            FetchOutcome::Success(games) => games,
            _ => {
                warn!(
                    "[Stats] Owned games unavailable for steam_id {}, keeping previous nearly-completed view",
                    user.steam_id_64
                );
                return Ok(Vec::new());
            }
        };

        let mut candidates = Vec::new();
        for game in games {
            let achievements = match self
                .steam_api
                .get_player_achievements(&user.steam_id_64, game.app_id)
                .await
            {
                FetchOutcome::Success(achievements) => achievements,
                _ => continue,
            };
            if achievements.is_empty() {
                continue;
            }

            let unlocked = achievements.iter().filter(|a| a.is_achieved()).count() as i64;
            let total = achievements.len() as i64;
            candidates.push(NearlyCompletedGame {
                app_id: game.app_id,
                percentage: completion_percent(unlocked, total),
                unlocked,
                total,
                icon_url: game.icon_url(),
                name: game.name,
            });
        }

        let nearly = top_nearly_completed(candidates);

        self.cache
            .put(
                nearly_completed_key(&user.steam_id_64),
                serde_json::to_value(&nearly)?,
                NEARLY_COMPLETED_CACHE_TTL,
            )
            .await;

        info!(
            "[Stats] Refreshed nearly-completed games for steam_id {} ({} games)",
            user.steam_id_64,
            nearly.len()
        );
        Ok(nearly)
    }

    pub async fn refresh_global_completion(&self, user: &User) -> Result<GlobalCompletionStats> {
        let games = match self.steam_api.get_owned_games(&user.steam_id_64).await {
            FetchOutcome::Success(games) => games,
            _ => {
                warn!(
                    "[Stats] Owned games unavailable for steam_id {}, keeping previous global view",
                    user.steam_id_64
                );
                return Ok(GlobalCompletionStats {
                    total_possible: 0,
                    total_unlocked: 0,
                    completion_percentage: 0.0,
                    calculated_at: Utc::now(),
                });
            }
        };

        let mut total_possible: i64 = 0;
        let mut total_unlocked: i64 = 0;
        for game in games {
            let achievements = match self
                .steam_api
                .get_player_achievements(&user.steam_id_64, game.app_id)
                .await
            {
                FetchOutcome::Success(achievements) => achievements,
                _ => continue,
            };

            total_possible += achievements.len() as i64;
            total_unlocked += achievements.iter().filter(|a| a.is_achieved()).count() as i64;
        }

        let stats = GlobalCompletionStats {
            total_possible,
            total_unlocked,
            completion_percentage: round2_percent(total_unlocked, total_possible),
            calculated_at: Utc::now(),
        };

        self.cache
            .put(
                global_completion_key(&user.steam_id_64),
                serde_json::to_value(&stats)?,
                GLOBAL_COMPLETION_CACHE_TTL,
            )
            .await;

        info!(
            "[Stats] Refreshed global completion for steam_id {}: {}/{} ({}%)",
            user.steam_id_64, total_unlocked, total_possible, stats.completion_percentage
        );
        Ok(stats)
    }

    pub async fn get_cached_latest(&self, steam_id: &str) -> Option<Vec<LatestAchievement>> {
        let value = self.cache.get(&latest_achievements_key(steam_id)).await?;
        serde_json::from_value(value).ok()
    }

    pub async fn get_cached_nearly_completed(
        &self,
        steam_id: &str,
    ) -> Option<Vec<NearlyCompletedGame>> {
        let value = self.cache.get(&nearly_completed_key(steam_id)).await?;
        serde_json::from_value(value).ok()
    }

    pub async fn get_cached_global(&self, steam_id: &str) -> Option<GlobalCompletionStats> {
        let value = self.cache.get(&global_completion_key(steam_id)).await?;
        serde_json::from_value(value).ok()
    }

    /// Schema definitions are per-game, not per-user, so they get their
    /// own long-lived cache entry shared by every enrichment.
    async fn schema_for_game(&self, app_id: i64) -> Vec<SchemaAchievement> {
        let key = game_schema_key(app_id);
        if let Some(cached) = self.cache.get(&key).await {
            if let Ok(schema) = serde_json::from_value(cached) {
                return schema;
            }
        }

        match self.steam_api.get_schema_for_game(app_id).await {
            FetchOutcome::Success(schema) => {
                if let Ok(value) = serde_json::to_value(&schema) {
                    self.cache.put(key, value, GAME_SCHEMA_CACHE_TTL).await;
                }
                schema
            }
            _ => Vec::new(),
        }
    }
}

/// Integer completion percentage, rounded to the nearest point.
pub fn completion_percent(unlocked: i64, total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    ((unlocked as f64 / total as f64) * 100.0).round() as i64
}

fn round2_percent(unlocked: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    ((unlocked as f64 / total as f64) * 100.0 * 100.0).round() / 100.0
}

/// Keeps games whose percentage falls in [80, 100), highest first,
/// capped at the display limit. Fully completed games are a different
/// list and never appear here.
pub fn top_nearly_completed(mut candidates: Vec<NearlyCompletedGame>) -> Vec<NearlyCompletedGame> {
    candidates.retain(|g| g.percentage >= NEARLY_COMPLETED_MIN_PERCENT && g.percentage < 100);
    candidates.sort_by(|a, b| b.percentage.cmp(&a.percentage));
    candidates.truncate(NEARLY_COMPLETED_LIMIT);
    candidates
}
