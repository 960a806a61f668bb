use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Number of display slots a user has. Valid display orders are
/// `0..MAX_DISPLAYED_TROPHIES`.
pub const MAX_DISPLAYED_TROPHIES: usize = 3;

pub fn is_valid_display_order(display_order: i32) -> bool {
    usize::try_from(display_order).is_ok_and(|order| order < MAX_DISPLAYED_TROPHIES)
}

// =============================================================================
// DISPLAYED TROPHY
// =============================================================================

/// A catalog trophy currently occupying one of a user's display slots.
#[derive(Debug, Clone, FromRow, PartialEq)]
pub struct DisplayedTrophy {
    pub trophy_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub display_order: i32,
}

// =============================================================================
// CANDIDATE
// =============================================================================

/// A trophy proposed for a display slot, either by the client or taken
/// from the slots the user already has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrophyCandidate {
    pub trophy_id: i32,
    pub display_order: i32,
}

impl From<&DisplayedTrophy> for TrophyCandidate {
    fn from(trophy: &DisplayedTrophy) -> Self {
        Self {
            trophy_id: trophy.trophy_id,
            display_order: trophy.display_order,
        }
    }
}

// =============================================================================
// CHANGES
// =============================================================================

/// One row-level write against `user_trophies`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrophyChange {
    Delete { trophy_id: i32 },
    Insert { trophy_id: i32, display_order: i32 },
}
