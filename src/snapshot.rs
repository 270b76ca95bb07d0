use crate::models::WeightUnit;
use serde::{Deserialize, Serialize};

/// Persisted state of a paused session, so a workout survives leaving the
/// screen that hosts it. Restored with `SessionEngine::resume_from_snapshot`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: String,
    pub plan_name: String,
    pub started_at: String,
    pub elapsed_seconds: u32,
    pub current_exercise: usize,
    pub completed_sets: Vec<Vec<bool>>,
    pub weights: Vec<Option<f64>>,
    pub weight_unit: WeightUnit,
    pub saved_at: String,
}
