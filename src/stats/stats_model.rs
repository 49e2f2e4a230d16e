use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recently unlocked achievement, enriched from the game schema
/// when Steam publishes one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LatestAchievement {
    pub app_id: i64,
    pub game_name: String,
    pub api_name: String,
    pub unlock_time: i64,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub icon_gray: Option<String>,
    pub hidden: bool,
}

/// A game sitting in the nearly-completed window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NearlyCompletedGame {
    pub app_id: i64,
    pub name: String,
    pub percentage: i64,
    pub unlocked: i64,
    pub total: i64,
    pub icon_url: Option<String>,
}

/// Library-wide unlock ratio across every owned game with achievements.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GlobalCompletionStats {
    pub total_possible: i64,
    pub total_unlocked: i64,
    pub completion_percentage: f64,
    pub calculated_at: DateTime<Utc>,
}
