pub(crate) mod cache_store;

pub use cache_store::{
    game_schema_key, global_completion_key, latest_achievements_key, nearly_completed_key,
    rarity_updated_key, user_xp_stats_key, CacheStore, SharedCacheStore,
};
