use log::{info, warn};
use serde_json::json;
use std::sync::Arc;

use crate::cache::{rarity_updated_key, SharedCacheStore};
use crate::constants::RARITY_REFRESH_TTL;
use crate::errors::Result;
use crate::steam::{FetchOutcome, SteamApi};

use super::rarity_model::GlobalAchievement;
use super::rarity_repository::RarityRepository;

/// Refreshes the global rarity table for single games. Pure function of
/// upstream data; never touches user state.
pub struct RarityService {
    repository: Arc<RarityRepository>,
    steam: Arc<dyn SteamApi>,
    cache: SharedCacheStore,
}

impl RarityService {
    pub fn new(
        repository: Arc<RarityRepository>,
        steam: Arc<dyn SteamApi>,
        cache: SharedCacheStore,
    ) -> Self {
        Self {
            repository,
            steam,
            cache,
        }
    }

    /// Fetches global unlock percentages for one game and upserts the
    /// derived XP values. A failed or empty fetch aborts the whole
    /// ingest with no partial writes; the next scheduled trigger
    /// re-runs it.
    pub async fn update_rarity_for_game(&self, app_id: i64) -> Result<()> {
        let percentages = match self.steam.get_global_achievement_percentages(app_id).await {
            FetchOutcome::Success(percentages) => percentages,
            FetchOutcome::EmptyOrUnsupported => {
                warn!("[Rarity] No global percentages for game {}, skipping", app_id);
                return Ok(());
            }
            FetchOutcome::TransientFailure => {
                warn!("[Rarity] Fetch failed for game {}, skipping", app_id);
                return Ok(());
            }
        };

        let records: Vec<GlobalAchievement> = percentages
            .into_iter()
            .map(|p| GlobalAchievement::from_percent(app_id, p.name, p.percent))
            .collect();

        self.repository.upsert_batch(&records)?;
        info!("[Rarity] Saved {} achievements for game {}", records.len(), app_id);
        Ok(())
    }

    /// Returns true when the game's rarity table is due for a refresh,
    /// and arms the freshness marker so concurrent callers trigger the
    /// ingest at most once per rolling day.
    pub async fn mark_refresh_due(&self, app_id: i64) -> bool {
        let key = rarity_updated_key(app_id);
        if self.cache.has(&key) {
            return false;
        }
        self.cache.put(key, json!(true), RARITY_REFRESH_TTL).await;
        true
    }
}
