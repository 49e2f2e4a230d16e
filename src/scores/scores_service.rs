use chrono::Utc;
use log::{info, warn};
use std::sync::Arc;

use crate::errors::Result;
use crate::rarity::RarityRepository;
use crate::steam::{FetchOutcome, SteamApi};
use crate::users::User;

use super::score_calculator::calculate_game_score;
use super::scores_model::{SyncOutcome, UserGameScore};
use super::scores_repository::ScoresRepository;

/// Synchronizes the persisted score snapshot of one (user, game) pair
/// with the user's live unlock state.
pub struct ScoresService {
    repository: Arc<ScoresRepository>,
    rarity_repository: Arc<RarityRepository>,
    steam: Arc<dyn SteamApi>,
}

impl ScoresService {
    pub fn new(
        repository: Arc<ScoresRepository>,
        rarity_repository: Arc<RarityRepository>,
        steam: Arc<dyn SteamApi>,
    ) -> Self {
        Self {
            repository,
            rarity_repository,
            steam,
        }
    }

    /// One synchronizer pass. Re-runnable with the same payload at any
    /// time: the snapshot is always a full recomputation, never a delta.
    ///
    /// A failed or empty fetch leaves the stored snapshot untouched;
    /// "temporarily unknown" must never read as "zero progress".
    pub async fn sync_game_achievements(&self, user: &User, app_id: i64) -> Result<SyncOutcome> {
        let achievements = match self
            .steam
            .get_player_achievements(&user.steam_id_64, app_id)
            .await
        {
            FetchOutcome::Success(achievements) => achievements,
            _ => {
                warn!(
                    "[SyncGA] No achievement data for game {} (steam_id {}), keeping stored state",
                    app_id, user.steam_id_64
                );
                return Ok(SyncOutcome::Skipped);
            }
        };

        let total_count = achievements.len() as i32;
        let previous = self.repository.get_score(&user.id, app_id)?;

        // A completed game cannot un-complete; as long as the publisher
        // has not added achievements, the stored score is still exact.
        if let Some(ref stored) = previous {
            if stored.is_completed && stored.total_count == total_count {
                info!(
                    "[SyncGA] Score unchanged (app_id {}, steam_id {}): {} XP",
                    app_id, user.steam_id_64, stored.xp_score
                );
                return Ok(SyncOutcome::Unchanged(stored.xp_score));
            }
        }

        let xp_by_api_name = self.rarity_repository.xp_values_by_api_name(app_id)?;
        let computed = calculate_game_score(&achievements, &xp_by_api_name);

        let snapshot = UserGameScore {
            user_id: user.id.clone(),
            app_id,
            xp_score: computed.xp_score,
            is_completed: computed.is_completed,
            unlocked_count: computed.unlocked_count,
            total_count: computed.total_count,
            updated_at: Utc::now().naive_utc(),
        };
        snapshot.validate()?;

        self.repository.upsert_score(&snapshot)?;
        info!(
            "[SyncGA] Score saved (app_id {}, steam_id {}): {} XP, {}/{} unlocked",
            app_id, user.steam_id_64, snapshot.xp_score, snapshot.unlocked_count, snapshot.total_count
        );

        Ok(SyncOutcome::Updated(snapshot))
    }
}
