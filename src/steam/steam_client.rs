use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::errors::{ConfigError, Result};

use super::pacer::{Endpoint, Pacer};
use super::steam_model::{
    FetchOutcome, GlobalPercentage, OwnedGame, PlayerAchievement, SchemaAchievement,
};
use super::steam_traits::SteamApi;

const DEFAULT_BASE_URL: &str = "https://api.steampowered.com";
const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_MIN_CALL_DELAY: Duration = Duration::from_millis(150);

/// Explicitly injected configuration; nothing in the client reads the
/// environment at call time.
#[derive(Debug, Clone)]
pub struct SteamConfig {
    pub api_key: String,
    pub base_url: String,
    pub call_timeout: Duration,
    pub min_call_delay: Duration,
}

impl SteamConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
            min_call_delay: DEFAULT_MIN_CALL_DELAY,
        }
    }

    /// Convenience constructor for hosts that configure through the
    /// environment (`STEAM_SECRET`).
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("STEAM_SECRET")
            .map_err(|_| ConfigError::MissingKey("STEAM_SECRET".to_string()))?;
        Ok(Self::new(api_key))
    }
}

pub struct SteamClient {
    client: Client,
    config: SteamConfig,
    pacer: Pacer,
}

impl SteamClient {
    pub fn new(config: SteamConfig) -> Self {
        let pacer = Pacer::new(config.min_call_delay);
        Self {
            client: Client::new(),
            config,
            pacer,
        }
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        path: &str,
        params: &[(&str, String)],
    ) -> FetchOutcome<T> {
        self.pacer.wait(endpoint).await;

        let url = format!("{}{}", self.config.base_url, path);
        let response = match self
            .client
            .get(&url)
            .timeout(self.config.call_timeout)
            .query(params)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("[SteamClient] {} request failed: {}", endpoint.as_str(), e);
                return FetchOutcome::TransientFailure;
            }
        };

        let status = response.status();
        if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("[SteamClient] {} answered {}", endpoint.as_str(), status);
            return FetchOutcome::TransientFailure;
        }
        if !status.is_success() {
            // 4xx other than 429: the request itself is unanswerable
            // (bad id, private profile). Not retryable, not an error.
            debug!("[SteamClient] {} answered {}", endpoint.as_str(), status);
            return FetchOutcome::EmptyOrUnsupported;
        }

        match response.json::<T>().await {
            Ok(payload) => FetchOutcome::Success(payload),
            Err(e) => {
                debug!(
                    "[SteamClient] {} payload not in expected shape: {}",
                    endpoint.as_str(),
                    e
                );
                FetchOutcome::EmptyOrUnsupported
            }
        }
    }
}

// Response wrappers for the Steam Web API envelope shapes.

#[derive(Deserialize)]
struct OwnedGamesEnvelope {
    response: Option<OwnedGamesBody>,
}

#[derive(Deserialize)]
struct OwnedGamesBody {
    #[serde(default)]
    games: Vec<OwnedGame>,
}

#[derive(Deserialize)]
struct PlayerStatsEnvelope {
    playerstats: Option<PlayerStatsBody>,
}

#[derive(Deserialize)]
struct PlayerStatsBody {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    achievements: Vec<PlayerAchievement>,
}

#[derive(Deserialize)]
struct SchemaEnvelope {
    game: Option<SchemaGameBody>,
}

#[derive(Deserialize)]
struct SchemaGameBody {
    #[serde(rename = "availableGameStats")]
    available_game_stats: Option<SchemaStatsBody>,
}

#[derive(Deserialize)]
struct SchemaStatsBody {
    #[serde(default)]
    achievements: Vec<SchemaAchievement>,
}

#[derive(Deserialize)]
struct GlobalPercentagesEnvelope {
    #[serde(rename = "achievementpercentages")]
    achievement_percentages: Option<GlobalPercentagesBody>,
}

#[derive(Deserialize)]
struct GlobalPercentagesBody {
    #[serde(default)]
    achievements: Vec<GlobalPercentage>,
}

fn non_empty<T>(items: Vec<T>) -> FetchOutcome<Vec<T>> {
    if items.is_empty() {
        FetchOutcome::EmptyOrUnsupported
    } else {
        FetchOutcome::Success(items)
    }
}

#[async_trait]
impl SteamApi for SteamClient {
    async fn get_owned_games(&self, steam_id: &str) -> FetchOutcome<Vec<OwnedGame>> {
        let params = [
            ("key", self.config.api_key.clone()),
            ("steamid", steam_id.to_string()),
            ("include_appinfo", "1".to_string()),
            ("include_played_free_games", "1".to_string()),
            ("format", "json".to_string()),
        ];

        let outcome: FetchOutcome<OwnedGamesEnvelope> = self
            .fetch_json(
                Endpoint::OwnedGames,
                "/IPlayerService/GetOwnedGames/v0001/",
                &params,
            )
            .await;

        match outcome {
            FetchOutcome::Success(envelope) => match envelope.response {
                Some(body) => non_empty(body.games),
                None => FetchOutcome::EmptyOrUnsupported,
            },
            FetchOutcome::EmptyOrUnsupported => FetchOutcome::EmptyOrUnsupported,
            FetchOutcome::TransientFailure => FetchOutcome::TransientFailure,
        }
    }

    async fn get_player_achievements(
        &self,
        steam_id: &str,
        app_id: i64,
    ) -> FetchOutcome<Vec<PlayerAchievement>> {
        let params = [
            ("key", self.config.api_key.clone()),
            ("steamid", steam_id.to_string()),
            ("appid", app_id.to_string()),
        ];

        let outcome: FetchOutcome<PlayerStatsEnvelope> = self
            .fetch_json(
                Endpoint::PlayerAchievements,
                "/ISteamUserStats/GetPlayerAchievements/v0001/",
                &params,
            )
            .await;

        match outcome {
            FetchOutcome::Success(envelope) => match envelope.playerstats {
                Some(body) if body.success => non_empty(body.achievements),
                _ => FetchOutcome::EmptyOrUnsupported,
            },
            FetchOutcome::EmptyOrUnsupported => FetchOutcome::EmptyOrUnsupported,
            FetchOutcome::TransientFailure => FetchOutcome::TransientFailure,
        }
    }

    async fn get_schema_for_game(&self, app_id: i64) -> FetchOutcome<Vec<SchemaAchievement>> {
        let params = [
            ("key", self.config.api_key.clone()),
            ("appid", app_id.to_string()),
        ];

        let outcome: FetchOutcome<SchemaEnvelope> = self
            .fetch_json(
                Endpoint::GameSchema,
                "/ISteamUserStats/GetSchemaForGame/v2/",
                &params,
            )
            .await;

        match outcome {
            FetchOutcome::Success(envelope) => match envelope
                .game
                .and_then(|g| g.available_game_stats)
            {
                Some(stats) => non_empty(stats.achievements),
                None => FetchOutcome::EmptyOrUnsupported,
            },
            FetchOutcome::EmptyOrUnsupported => FetchOutcome::EmptyOrUnsupported,
            FetchOutcome::TransientFailure => FetchOutcome::TransientFailure,
        }
    }

    async fn get_global_achievement_percentages(
        &self,
        app_id: i64,
    ) -> FetchOutcome<Vec<GlobalPercentage>> {
        let params = [
            ("gameid", app_id.to_string()),
            ("format", "json".to_string()),
        ];

        let outcome: FetchOutcome<GlobalPercentagesEnvelope> = self
            .fetch_json(
                Endpoint::GlobalPercentages,
                "/ISteamUserStats/GetGlobalAchievementPercentagesForApp/v0002/",
                &params,
            )
            .await;

        match outcome {
            FetchOutcome::Success(envelope) => match envelope.achievement_percentages {
                Some(body) => non_empty(body.achievements),
                None => FetchOutcome::EmptyOrUnsupported,
            },
            FetchOutcome::EmptyOrUnsupported => FetchOutcome::EmptyOrUnsupported,
            FetchOutcome::TransientFailure => FetchOutcome::TransientFailure,
        }
    }
}
