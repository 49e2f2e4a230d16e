pub(crate) mod score_calculator;
pub(crate) mod scores_model;
pub(crate) mod scores_repository;
pub(crate) mod scores_service;
pub(crate) mod totals_service;

pub use score_calculator::{calculate_game_score, GameScore};
pub use scores_model::{SyncOutcome, UserGameScore};
pub use scores_repository::ScoresRepository;
pub use scores_service::ScoresService;
pub use totals_service::{TotalsService, UserXpStats};
