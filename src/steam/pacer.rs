//! Fixed-interval pacing toward the Steam Web API.
//!
//! Each client enforces a minimum delay between consecutive calls to the
//! same endpoint. Different endpoints (and different clients) never wait
//! on each other, so unrelated work is not serialized.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    OwnedGames,
    PlayerAchievements,
    GameSchema,
    GlobalPercentages,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::OwnedGames => "GetOwnedGames",
            Endpoint::PlayerAchievements => "GetPlayerAchievements",
            Endpoint::GameSchema => "GetSchemaForGame",
            Endpoint::GlobalPercentages => "GetGlobalAchievementPercentagesForApp",
        }
    }
}

pub struct Pacer {
    min_delay: Duration,
    last_call: Mutex<HashMap<Endpoint, Instant>>,
}

impl Pacer {
    pub fn new(min_delay: Duration) -> Self {
        Self {
            min_delay,
            last_call: Mutex::new(HashMap::new()),
        }
    }

    /// Recover from poison; the worst case is one under-spaced request,
    /// which is preferable to panicking inside a background task.
    fn lock(&self) -> MutexGuard<'_, HashMap<Endpoint, Instant>> {
        self.last_call.lock().unwrap_or_else(|poisoned| {
            warn!("Pacer mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Waits until the endpoint's minimum spacing has elapsed, then
    /// records the call.
    pub async fn wait(&self, endpoint: Endpoint) {
        loop {
            let sleep_for = {
                let mut calls = self.lock();
                let now = Instant::now();
                match calls.get(&endpoint) {
                    Some(last) if now.duration_since(*last) < self.min_delay => {
                        self.min_delay - now.duration_since(*last)
                    }
                    _ => {
                        calls.insert(endpoint, now);
                        return;
                    }
                }
            };
            tokio::time::sleep(sleep_for).await;
        }
    }
}
