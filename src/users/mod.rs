pub(crate) mod users_model;
pub(crate) mod users_repository;

pub use users_model::{LeaderboardEntry, NewUserProfile, User};
pub use users_repository::UsersRepository;
