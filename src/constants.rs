use std::time::Duration;

/// Flat bonus granted once when every achievement of a game is unlocked.
pub const COMPLETION_BONUS_XP: i64 = 1000;

/// Nearly-completed window: percentage in [80, 100).
pub const NEARLY_COMPLETED_MIN_PERCENT: i64 = 80;

/// How many entries the derived lists keep.
pub const LATEST_ACHIEVEMENTS_LIMIT: usize = 5;
pub const NEARLY_COMPLETED_LIMIT: usize = 5;

pub const LEADERBOARD_LIMIT: i64 = 100;

/// Cache TTLs, independently tunable per derived view.
pub const XP_STATS_CACHE_TTL: Duration = Duration::from_secs(6 * 3600);
pub const LATEST_ACHIEVEMENTS_CACHE_TTL: Duration = Duration::from_secs(3600);
pub const NEARLY_COMPLETED_CACHE_TTL: Duration = Duration::from_secs(6 * 3600);
pub const GLOBAL_COMPLETION_CACHE_TTL: Duration = Duration::from_secs(24 * 3600);
pub const GAME_SCHEMA_CACHE_TTL: Duration = Duration::from_secs(12 * 3600);

/// A game's rarity table is refreshed at most once per rolling day.
pub const RARITY_REFRESH_TTL: Duration = Duration::from_secs(24 * 3600);
