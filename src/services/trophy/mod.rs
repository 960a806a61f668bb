pub mod evaluator;
pub mod reconciler;

pub use evaluator::{EvaluatorError, HttpTrophyEvaluator, TrophyEvaluator, TrophyVerdict};
pub use reconciler::{CandidateSource, ReconcileOutcome, TrophyError, TrophyReconciler};
