pub(crate) mod pacer;
pub(crate) mod steam_client;
pub(crate) mod steam_model;
pub(crate) mod steam_traits;

// Re-export the public interface
pub use pacer::{Endpoint, Pacer};
pub use steam_client::{SteamClient, SteamConfig};
pub use steam_model::{
    FetchOutcome, GlobalPercentage, OwnedGame, PlayerAchievement, SchemaAchievement,
};
pub use steam_traits::SteamApi;
