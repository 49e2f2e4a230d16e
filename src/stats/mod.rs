pub(crate) mod stats_model;
pub(crate) mod stats_service;

pub use stats_model::{GlobalCompletionStats, LatestAchievement, NearlyCompletedGame};
pub use stats_service::StatsService;
