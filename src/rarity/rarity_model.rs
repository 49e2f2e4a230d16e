use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Global unlock rarity of one achievement of one game, with the XP
/// value derived from it. Written only by the rarity ingest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GlobalAchievement {
    pub app_id: i64,
    pub api_name: String,
    /// Share of all players that unlocked the achievement, 0-100.
    pub global_percent: f64,
    pub xp_value: i32,
    pub updated_at: NaiveDateTime,
}

impl GlobalAchievement {
    pub fn from_percent(app_id: i64, api_name: impl Into<String>, percent: f64) -> Self {
        Self {
            app_id,
            api_name: api_name.into(),
            global_percent: percent,
            xp_value: xp_from_rarity(percent),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

/// Step table mapping global unlock percentage to XP. Rarer unlocks are
/// worth more; the function is non-increasing over the whole range.
pub fn xp_from_rarity(percent: f64) -> i32 {
    if percent < 1.0 {
        500
    } else if percent < 10.0 {
        150
    } else if percent < 25.0 {
        50
    } else if percent < 50.0 {
        25
    } else {
        10
    }
}

// --- DB Representation ---

#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = crate::schema::global_achievements)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GlobalAchievementDB {
    pub app_id: i64,
    pub api_name: String,
    pub global_percent: f64,
    pub xp_value: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<GlobalAchievementDB> for GlobalAchievement {
    fn from(db: GlobalAchievementDB) -> Self {
        Self {
            app_id: db.app_id,
            api_name: db.api_name,
            global_percent: db.global_percent,
            xp_value: db.xp_value,
            updated_at: db.updated_at,
        }
    }
}

impl From<GlobalAchievement> for GlobalAchievementDB {
    fn from(domain: GlobalAchievement) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            app_id: domain.app_id,
            api_name: domain.api_name,
            global_percent: domain.global_percent,
            xp_value: domain.xp_value,
            created_at: now,
            updated_at: domain.updated_at,
        }
    }
}
