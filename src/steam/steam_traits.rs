use async_trait::async_trait;

use super::steam_model::{
    FetchOutcome, GlobalPercentage, OwnedGame, PlayerAchievement, SchemaAchievement,
};

/// Seam between the aggregation engine and the Steam Web API.
///
/// Implementations never return transport errors to callers; every
/// failure mode is folded into [`FetchOutcome`] so that business logic
/// only decides between "use the payload", "treat as empty" and "skip
/// without destructive writes".
#[async_trait]
pub trait SteamApi: Send + Sync {
    async fn get_owned_games(&self, steam_id: &str) -> FetchOutcome<Vec<OwnedGame>>;

    async fn get_player_achievements(
        &self,
        steam_id: &str,
        app_id: i64,
    ) -> FetchOutcome<Vec<PlayerAchievement>>;

    async fn get_schema_for_game(&self, app_id: i64) -> FetchOutcome<Vec<SchemaAchievement>>;

    async fn get_global_achievement_percentages(
        &self,
        app_id: i64,
    ) -> FetchOutcome<Vec<GlobalPercentage>>;
}
