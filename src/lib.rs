//! In-process workout session tracking: one state machine for a live workout
//! (elapsed time, per-set completion, rest countdowns), plus plan
//! prescription parsing, JSON persistence and history statistics. The
//! hosting UI drives a [`session_engine::SessionEngine`] through its
//! operations and a 1 Hz tick, and hands the terminal summary to a
//! [`data_manager::SummarySink`].

pub mod data_manager;
pub mod error;
pub mod models;
pub mod prescription;
pub mod session_engine;
pub mod session_stats;
pub mod snapshot;

pub use data_manager::{persist_summary, DataError, DataManager, DataResult, SummarySink};
pub use error::{Error, Result};
pub use models::{
    Exercise, SessionOutcome, SessionSummary, WeeklyStats, Weight, WeightUnit, WorkoutPlan,
    WorkoutStats,
};
pub use prescription::{
    prepare_plan, prepare_plan_with, ParseWarning, PlanError, PreparedExercise, PreparedPlan,
    PrescriptionDefaults, PrescriptionField,
};
pub use session_engine::{
    EndReason, SessionEngine, SessionError, SessionPhase, SetOutcome, TickOutcome,
};
pub use session_stats::{calculate_workout_stats, current_streak_days, weekly_stats};
pub use snapshot::SessionSnapshot;
