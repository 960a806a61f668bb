//! Keeps a user's displayed trophies consistent with what the evaluator
//! says they have unlocked.
//!
//! A reconciliation runs either on an explicit candidate list from the
//! client or on the trophies already displayed (after new logs or a profile
//! change). Candidates the evaluator does not confirm are dropped; the
//! resulting slot assignment is written as one batch of deletes followed by
//! inserts.

use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

use crate::config::StoreError;
use crate::modules::trophy::interface::{ChangeError, TrophyRepository};
use crate::modules::trophy::model::{
    is_valid_display_order, DisplayedTrophy, TrophyCandidate, TrophyChange,
    MAX_DISPLAYED_TROPHIES,
};
use crate::modules::user::interface::UserRepository;

use super::evaluator::TrophyEvaluator;

#[derive(Debug, thiserror::Error)]
pub enum TrophyError {
    #[error("Cannot display more than 3 trophies")]
    TooManyTrophies,

    #[error("Invalid display order: {0}")]
    InvalidDisplayOrder(i32),

    #[error("Trophy {0} appears more than once")]
    DuplicateTrophy(i32),

    #[error("Display order {0} is used more than once")]
    DuplicateDisplayOrder(i32),

    #[error("User not found")]
    UserNotFound,

    #[error("evaluation unavailable")]
    EvaluationUnavailable,

    #[error("Failed to save trophy with ID {trophy_id}")]
    SaveFailed {
        trophy_id: i32,
        #[source]
        source: StoreError,
    },

    #[error("Failed to delete trophy with ID {trophy_id}")]
    DeleteFailed {
        trophy_id: i32,
        #[source]
        source: StoreError,
    },

    #[error("Failed to access trophies")]
    Store(#[from] StoreError),
}

impl TrophyError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            TrophyError::TooManyTrophies
            | TrophyError::InvalidDisplayOrder(_)
            | TrophyError::DuplicateTrophy(_)
            | TrophyError::DuplicateDisplayOrder(_) => StatusCode::BAD_REQUEST,
            TrophyError::UserNotFound => StatusCode::NOT_FOUND,
            TrophyError::EvaluationUnavailable => StatusCode::BAD_GATEWAY,
            TrophyError::SaveFailed { .. }
            | TrophyError::DeleteFailed { .. }
            | TrophyError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ChangeError> for TrophyError {
    fn from(err: ChangeError) -> Self {
        match err.change {
            TrophyChange::Delete { trophy_id } => TrophyError::DeleteFailed {
                trophy_id,
                source: err.source,
            },
            TrophyChange::Insert { trophy_id, .. } => TrophyError::SaveFailed {
                trophy_id,
                source: err.source,
            },
        }
    }
}

/// Checks a client-submitted candidate list before anything is read or
/// written.
pub fn validate_candidates(candidates: &[TrophyCandidate]) -> Result<(), TrophyError> {
    if candidates.len() > MAX_DISPLAYED_TROPHIES {
        return Err(TrophyError::TooManyTrophies);
    }

    let mut trophy_ids = HashSet::new();
    let mut display_orders = HashSet::new();

    for candidate in candidates {
        if !is_valid_display_order(candidate.display_order) {
            return Err(TrophyError::InvalidDisplayOrder(candidate.display_order));
        }
        if !trophy_ids.insert(candidate.trophy_id) {
            return Err(TrophyError::DuplicateTrophy(candidate.trophy_id));
        }
        if !display_orders.insert(candidate.display_order) {
            return Err(TrophyError::DuplicateDisplayOrder(candidate.display_order));
        }
    }

    Ok(())
}

/// Computes the writes that turn `current` into exactly `keep`.
///
/// Every delete precedes every insert, so the uniqueness of both trophy id
/// and display order holds at each step. Trophies already sitting in their
/// requested slot produce no change.
pub fn plan_changes(current: &[DisplayedTrophy], keep: &[TrophyCandidate]) -> Vec<TrophyChange> {
    // display_order -> trophy_id
    let mut slots: BTreeMap<i32, i32> = current
        .iter()
        .map(|t| (t.display_order, t.trophy_id))
        .collect();

    let mut deletes = Vec::new();
    let mut inserts = Vec::new();

    for trophy in current {
        if !keep.iter().any(|k| k.trophy_id == trophy.trophy_id) {
            slots.remove(&trophy.display_order);
            deletes.push(TrophyChange::Delete {
                trophy_id: trophy.trophy_id,
            });
        }
    }

    let mut ordered = keep.to_vec();
    ordered.sort_by_key(|k| k.display_order);

    for candidate in ordered {
        if slots.get(&candidate.display_order) == Some(&candidate.trophy_id) {
            continue;
        }

        if let Some(occupant) = slots.remove(&candidate.display_order) {
            deletes.push(TrophyChange::Delete {
                trophy_id: occupant,
            });
        }

        let previous_slot = slots
            .iter()
            .find(|(_, trophy_id)| **trophy_id == candidate.trophy_id)
            .map(|(order, _)| *order);
        if let Some(order) = previous_slot {
            slots.remove(&order);
            deletes.push(TrophyChange::Delete {
                trophy_id: candidate.trophy_id,
            });
        }

        slots.insert(candidate.display_order, candidate.trophy_id);
        inserts.push(TrophyChange::Insert {
            trophy_id: candidate.trophy_id,
            display_order: candidate.display_order,
        });
    }

    deletes.extend(inserts);
    deletes
}

/// Where the candidate list of a reconciliation comes from.
#[derive(Debug, Clone)]
pub enum CandidateSource {
    Requested(Vec<TrophyCandidate>),
    Displayed,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileOutcome {
    /// Candidates confirmed and now displayed.
    pub saved: Vec<TrophyCandidate>,
    /// Previously displayed trophies that are no longer displayed.
    pub removed: Vec<i32>,
    /// Candidates the evaluator did not confirm.
    pub rejected: Vec<TrophyCandidate>,
}

pub struct TrophyReconciler<'a> {
    trophies: &'a dyn TrophyRepository,
    users: &'a dyn UserRepository,
    evaluator: &'a dyn TrophyEvaluator,
}

impl<'a> TrophyReconciler<'a> {
    pub fn new(
        trophies: &'a dyn TrophyRepository,
        users: &'a dyn UserRepository,
        evaluator: &'a dyn TrophyEvaluator,
    ) -> Self {
        Self {
            trophies,
            users,
            evaluator,
        }
    }

    pub async fn reconcile(
        &self,
        user_id: i32,
        source: CandidateSource,
    ) -> Result<ReconcileOutcome, TrophyError> {
        let started = Instant::now();

        if let CandidateSource::Requested(candidates) = &source {
            validate_candidates(candidates)?;
        }

        let current = self.trophies.displayed_trophies(user_id).await.map_err(|e| {
            tracing::error!(user_id, "Failed to fetch displayed trophies: {}", e);
            TrophyError::Store(e)
        })?;

        let candidates = match source {
            CandidateSource::Requested(candidates) => candidates,
            CandidateSource::Displayed => current.iter().map(TrophyCandidate::from).collect(),
        };

        let (keep, rejected) = if candidates.is_empty() {
            (Vec::new(), Vec::new())
        } else {
            self.confirm(user_id, &candidates).await?
        };

        let changes = plan_changes(&current, &keep);
        if !changes.is_empty() {
            self.trophies
                .apply_changes(user_id, &changes)
                .await
                .map_err(|e| {
                    tracing::error!(user_id, "Failed to apply trophy changes: {}", e);
                    TrophyError::from(e)
                })?;
        }

        let removed = current
            .iter()
            .filter(|t| !keep.iter().any(|k| k.trophy_id == t.trophy_id))
            .map(|t| t.trophy_id)
            .collect();

        tracing::debug!(
            user_id,
            changes = changes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Trophy reconciliation finished"
        );

        Ok(ReconcileOutcome {
            saved: keep,
            removed,
            rejected,
        })
    }

    /// Re-checks the trophies already on display. Failures are logged and
    /// otherwise ignored.
    pub async fn recheck_displayed(&self, user_id: i32) {
        if let Err(e) = self.reconcile(user_id, CandidateSource::Displayed).await {
            tracing::warn!(user_id, "Automatic trophy reconciliation failed: {}", e);
        }
    }

    /// Splits candidates into confirmed and rejected according to the
    /// evaluator.
    async fn confirm(
        &self,
        user_id: i32,
        candidates: &[TrophyCandidate],
    ) -> Result<(Vec<TrophyCandidate>, Vec<TrophyCandidate>), TrophyError> {
        let user = self
            .users
            .user_snapshot(user_id)
            .await
            .map_err(|e| {
                tracing::error!(user_id, "Failed to fetch user details: {}", e);
                TrophyError::Store(e)
            })?
            .ok_or(TrophyError::UserNotFound)?;

        let verdicts = self
            .evaluator
            .evaluate(&user, candidates)
            .await
            .map_err(|e| {
                tracing::warn!(user_id, "Trophy evaluation failed: {}", e);
                TrophyError::EvaluationUnavailable
            })?;

        let unlocked: HashSet<i32> = verdicts
            .iter()
            .filter(|v| v.unlocked)
            .map(|v| v.trophy_id)
            .collect();

        Ok(candidates
            .iter()
            .copied()
            .partition(|c| unlocked.contains(&c.trophy_id)))
    }
}
