use serde::{Deserialize, Serialize};

use super::model::{DisplayedTrophy, TrophyCandidate};

// =============================================================================
// VALIDATE AND SAVE
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ValidateTrophiesRequest {
    pub trophies: Vec<TrophyCandidate>,
}

#[derive(Debug, Serialize)]
pub struct ValidateTrophiesResponse {
    pub message: &'static str,
    pub saved: Vec<TrophyCandidate>,
    pub removed: Vec<i32>,
    pub rejected: Vec<TrophyCandidate>,
}

// =============================================================================
// LIST
// =============================================================================

#[derive(Debug, Serialize)]
pub struct TrophyResponse {
    pub id: i32,
    pub name: String,
    pub display_order: i32,
}

impl From<DisplayedTrophy> for TrophyResponse {
    fn from(trophy: DisplayedTrophy) -> Self {
        Self {
            id: trophy.trophy_id,
            name: trophy.name,
            display_order: trophy.display_order,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TrophiesResponse {
    pub trophies: Vec<TrophyResponse>,
}

// =============================================================================
// DELETE
// =============================================================================

#[derive(Debug, Serialize)]
pub struct DeleteTrophyResponse {
    pub status: &'static str,
    pub removed: u64,
}
