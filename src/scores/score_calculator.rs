//! Pure scoring of one game's unlock state against the rarity table.

use std::collections::HashMap;

use crate::constants::COMPLETION_BONUS_XP;
use crate::steam::PlayerAchievement;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameScore {
    pub xp_score: i64,
    pub unlocked_count: i32,
    pub total_count: i32,
    pub is_completed: bool,
}

/// Sums the XP value of every achieved entry, looked up by api_name.
/// Achievements missing from the rarity table contribute 0. The
/// completion bonus is added exactly once, only when every achievement
/// of a non-empty list is unlocked.
pub fn calculate_game_score(
    achievements: &[PlayerAchievement],
    xp_by_api_name: &HashMap<String, i32>,
) -> GameScore {
    let total_count = achievements.len() as i32;

    let mut xp_score: i64 = 0;
    let mut unlocked_count: i32 = 0;
    for achievement in achievements {
        if achievement.is_achieved() {
            unlocked_count += 1;
            xp_score += xp_by_api_name
                .get(&achievement.api_name)
                .copied()
                .unwrap_or(0) as i64;
        }
    }

    let is_completed = total_count > 0 && unlocked_count == total_count;
    if is_completed {
        xp_score += COMPLETION_BONUS_XP;
    }

    GameScore {
        xp_score,
        unlocked_count,
        total_count,
        is_completed,
    }
}
