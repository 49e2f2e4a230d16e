pub mod db;

pub mod cache;
pub mod constants;
pub mod errors;
pub mod jobs;
pub mod rarity;
pub mod schema;
pub mod scores;
pub mod stats;
pub mod steam;
pub mod users;

pub use errors::{Error, Result};
