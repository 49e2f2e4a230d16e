use serde::{Deserialize, Serialize};

/// Unit of background work. Every variant is a full recompute keyed by
/// the identifiers it carries, so replaying or duplicating a job is
/// always safe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Job {
    UpdateRarityForGame { app_id: i64 },
    SyncGameAchievements { user_id: String, app_id: i64 },
    RecalculateUserXp { user_id: String },
    CalculateLatestAchievements { user_id: String },
    CalculateNearlyCompletedGames { user_id: String },
    CalculateUserGlobalStats { user_id: String },
}

impl Job {
    pub fn kind(&self) -> &'static str {
        match self {
            Job::UpdateRarityForGame { .. } => "UpdateRarityForGame",
            Job::SyncGameAchievements { .. } => "SyncGameAchievements",
            Job::RecalculateUserXp { .. } => "RecalculateUserXp",
            Job::CalculateLatestAchievements { .. } => "CalculateLatestAchievements",
            Job::CalculateNearlyCompletedGames { .. } => "CalculateNearlyCompletedGames",
            Job::CalculateUserGlobalStats { .. } => "CalculateUserGlobalStats",
        }
    }
}
