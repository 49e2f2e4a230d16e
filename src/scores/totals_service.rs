use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::cache::{user_xp_stats_key, SharedCacheStore};
use crate::constants::XP_STATS_CACHE_TTL;
use crate::errors::Result;
use crate::users::{User, UsersRepository};

use super::scores_repository::ScoresRepository;

/// Blob published to the fast-path cache after every projection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserXpStats {
    pub total_xp: i64,
    pub games_completed: i64,
    pub calculated_at: DateTime<Utc>,
}

/// Materializes a user's totals from the per-game snapshots.
///
/// Always a full re-derivation, so concurrent invocations for the same
/// user converge regardless of interleaving; the projection row is
/// last-writer-wins by design.
pub struct TotalsService {
    scores_repository: Arc<ScoresRepository>,
    users_repository: Arc<UsersRepository>,
    cache: SharedCacheStore,
}

impl TotalsService {
    pub fn new(
        scores_repository: Arc<ScoresRepository>,
        users_repository: Arc<UsersRepository>,
        cache: SharedCacheStore,
    ) -> Self {
        Self {
            scores_repository,
            users_repository,
            cache,
        }
    }

    pub async fn project_user_totals(&self, user: &User) -> Result<UserXpStats> {
        let snapshots = self.scores_repository.get_scores_for_user(&user.id)?;

        let total_xp: i64 = snapshots.iter().map(|s| s.xp_score).sum();
        let games_completed = snapshots.iter().filter(|s| s.is_completed).count() as i64;

        self.users_repository
            .update_totals(&user.id, total_xp, games_completed as i32)?;

        let stats = UserXpStats {
            total_xp,
            games_completed,
            calculated_at: Utc::now(),
        };
        self.cache
            .put(
                user_xp_stats_key(&user.steam_id_64),
                serde_json::to_value(&stats)?,
                XP_STATS_CACHE_TTL,
            )
            .await;

        info!(
            "[Totals] Projected steam_id {}: {} XP / {} completed",
            user.steam_id_64, total_xp, games_completed
        );
        Ok(stats)
    }

    /// Fast-path read; `None` means "never projected", not an error.
    pub async fn get_cached_stats(&self, steam_id: &str) -> Option<UserXpStats> {
        let value = self.cache.get(&user_xp_stats_key(steam_id)).await?;
        serde_json::from_value(value).ok()
    }
}
