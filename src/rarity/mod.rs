pub(crate) mod rarity_model;
pub(crate) mod rarity_repository;
pub(crate) mod rarity_service;

pub use rarity_model::{xp_from_rarity, GlobalAchievement};
pub use rarity_repository::RarityRepository;
pub use rarity_service::RarityService;
