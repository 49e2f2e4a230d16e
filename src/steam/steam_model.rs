use serde::{Deserialize, Deserializer, Serialize};

/// Outcome of one upstream call.
///
/// The Steam Web API routinely answers 200 with an empty or
/// `success: false` body (private profiles, games without achievements),
/// which callers must treat exactly like "zero items". Only transport
/// level failures are reported separately, so that callers can avoid
/// destructive writes on data that is merely temporarily unknown.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Success(T),
    EmptyOrUnsupported,
    TransientFailure,
}

impl<T> FetchOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }

    /// Collapses the outcome into a payload, treating both failure modes
    /// as "no items". Callers that must distinguish them match instead.
    pub fn into_option(self) -> Option<T> {
        match self {
            FetchOutcome::Success(payload) => Some(payload),
            _ => None,
        }
    }
}

/// One game from GetOwnedGames.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnedGame {
    #[serde(rename = "appid")]
    pub app_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub img_icon_url: Option<String>,
    #[serde(default)]
    pub playtime_forever: i64,
}

impl OwnedGame {
    /// Capsule icon URL for the game, when Steam knows one.
    pub fn icon_url(&self) -> Option<String> {
        self.img_icon_url.as_ref().filter(|h| !h.is_empty()).map(|hash| {
            format!(
                "https://media.steampowered.com/steamcommunity/public/images/apps/{}/{}.jpg",
                self.app_id, hash
            )
        })
    }
}

/// One achievement row from GetPlayerAchievements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerAchievement {
    #[serde(rename = "apiname")]
    pub api_name: String,
    pub achieved: i32,
    #[serde(rename = "unlocktime", default)]
    pub unlock_time: i64,
}

impl PlayerAchievement {
    pub fn is_achieved(&self) -> bool {
        self.achieved == 1
    }
}

/// One achievement definition from GetSchemaForGame, used only for
/// display enrichment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaAchievement {
    pub name: String,
    #[serde(rename = "displayName", default)]
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(rename = "icongray", default)]
    pub icon_gray: Option<String>,
    #[serde(default, deserialize_with = "de_lenient_bool")]
    pub hidden: bool,
}

/// One row from GetGlobalAchievementPercentagesForApp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalPercentage {
    pub name: String,
    #[serde(deserialize_with = "de_lenient_f64")]
    pub percent: f64,
}

// Steam serializes percent as a number on some games and a string on
// others; same for the schema's hidden flag (0/1).
fn de_lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s.parse::<f64>().map_err(serde::de::Error::custom),
    }
}

fn de_lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrInt {
        Bool(bool),
        Int(i64),
    }

    match BoolOrInt::deserialize(deserializer)? {
        BoolOrInt::Bool(b) => Ok(b),
        BoolOrInt::Int(i) => Ok(i != 0),
    }
}
