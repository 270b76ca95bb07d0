use crate::models::{SessionOutcome, SessionSummary, WeightUnit};
use crate::prescription::{PreparedExercise, PreparedPlan, DEFAULT_REST_SECONDS};
use crate::snapshot::SessionSnapshot;
use chrono::Utc;
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("session already started")]
    AlreadyStarted,
    #[error("session not started")]
    NotStarted,
    #[error("session is not active")]
    NotActive,
    #[error("session is already paused")]
    AlreadyPaused,
    #[error("session is not paused")]
    NotPaused,
    #[error("session is not resting")]
    NotResting,
    #[error("session already ended")]
    AlreadyEnded,
    #[error("exercise index {0} out of range")]
    ExerciseOutOfRange(usize),
    #[error("set index {set} out of range for exercise {exercise}")]
    SetOutOfRange { exercise: usize, set: usize },
    #[error("invalid weight value {0}")]
    InvalidWeight(f64),
    #[error("invalid plan: {0}")]
    InvalidPlan(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Ready,
    Active,
    Paused,
    Resting,
    Completed,
}

/// What a completed set triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// A non-final set was marked; the rest countdown started.
    RestStarted { seconds: u32 },
    /// The exercise's final set was marked; no rest follows.
    ExerciseDone,
    /// Every set of every exercise is now complete.
    WorkoutCompleted,
    /// The set was already marked; nothing changed.
    AlreadyDone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The phase does not consume ticks; a stray timer callback is harmless.
    Ignored,
    Elapsed,
    RestTick { remaining: u32 },
    RestFinished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    NaturalCompletion,
    EarlyTermination,
}

/// One live attempt at executing a plan. Owned by the hosting surface, driven
/// through explicit operations and a 1 Hz `tick`. Not reusable: after
/// `end_session` hands out the summary, every operation fails.
#[derive(Debug)]
pub struct SessionEngine {
    plan: PreparedPlan,
    phase: SessionPhase,
    elapsed_seconds: u32,
    rest_remaining: u32,
    current_exercise: usize,
    completed: Vec<Vec<bool>>,
    weights: Vec<Option<f64>>,
    unit: WeightUnit,
    session_id: String,
    started_at: Option<String>,
    ended: bool,
}

impl SessionEngine {
    pub fn new(plan: PreparedPlan) -> Result<Self, SessionError> {
        Self::with_unit(plan, WeightUnit::Kg)
    }

    pub fn with_unit(plan: PreparedPlan, unit: WeightUnit) -> Result<Self, SessionError> {
        Self::validate_plan(&plan)?;
        let weights = seed_weights(&plan.exercises, unit);
        Ok(Self {
            plan,
            phase: SessionPhase::Ready,
            elapsed_seconds: 0,
            rest_remaining: 0,
            current_exercise: 0,
            completed: Vec::new(),
            weights,
            unit,
            session_id: String::new(),
            started_at: None,
            ended: false,
        })
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    pub fn rest_remaining(&self) -> u32 {
        self.rest_remaining
    }

    pub fn weight_unit(&self) -> WeightUnit {
        self.unit
    }

    pub fn plan(&self) -> &PreparedPlan {
        &self.plan
    }

    pub fn current_exercise(&self) -> usize {
        self.current_exercise
    }

    pub fn select_exercise(&mut self, exercise: usize) -> Result<(), SessionError> {
        if exercise >= self.plan.exercises.len() {
            return Err(SessionError::ExerciseOutOfRange(exercise));
        }
        self.current_exercise = exercise;
        Ok(())
    }

    pub fn exercise_weight(&self, exercise: usize) -> Option<f64> {
        self.weights.get(exercise).copied().flatten()
    }

    pub fn completed_sets(&self) -> &[Vec<bool>] {
        &self.completed
    }

    pub fn total_sets(&self) -> u32 {
        self.plan.exercises.iter().map(|exercise| exercise.sets).sum()
    }

    pub fn total_exercises(&self) -> u32 {
        self.plan.exercises.len() as u32
    }

    pub fn completed_sets_count(&self) -> u32 {
        self.completed
            .iter()
            .map(|sets| sets.iter().filter(|done| **done).count() as u32)
            .sum()
    }

    pub fn completed_exercises_count(&self) -> u32 {
        self.completed
            .iter()
            .filter(|sets| !sets.is_empty() && sets.iter().all(|done| *done))
            .count() as u32
    }

    fn all_sets_complete(&self) -> bool {
        !self.completed.is_empty()
            && self
                .completed
                .iter()
                .all(|sets| sets.iter().all(|done| *done))
    }

    pub fn start(&mut self) -> Result<(), SessionError> {
        self.ensure_not_ended()?;
        if self.phase != SessionPhase::Ready {
            return Err(SessionError::AlreadyStarted);
        }
        self.session_id = generate_session_id();
        self.started_at = Some(now_rfc3339());
        self.elapsed_seconds = 0;
        self.rest_remaining = 0;
        self.current_exercise = 0;
        self.completed = self
            .plan
            .exercises
            .iter()
            .map(|exercise| vec![false; exercise.sets as usize])
            .collect();
        self.weights = seed_weights(&self.plan.exercises, self.unit);
        self.phase = SessionPhase::Active;
        debug!("session {} started", self.session_id);
        Ok(())
    }

    /// Freezes elapsed time. Pausing mid-rest discards the countdown; the
    /// session resumes into `Active`, not back into `Resting`.
    pub fn pause(&mut self) -> Result<(), SessionError> {
        self.ensure_not_ended()?;
        match self.phase {
            SessionPhase::Active | SessionPhase::Resting => {
                self.rest_remaining = 0;
                self.phase = SessionPhase::Paused;
                Ok(())
            }
            SessionPhase::Paused => Err(SessionError::AlreadyPaused),
            SessionPhase::Ready => Err(SessionError::NotStarted),
            SessionPhase::Completed => Err(SessionError::AlreadyEnded),
        }
    }

    pub fn resume(&mut self) -> Result<(), SessionError> {
        self.ensure_not_ended()?;
        if self.phase != SessionPhase::Paused {
            return Err(SessionError::NotPaused);
        }
        self.phase = SessionPhase::Active;
        Ok(())
    }

    /// One second of wall time, driven by the host's interval timer. Only
    /// `Active` accumulates elapsed time and only `Resting` counts down.
    pub fn tick(&mut self) -> TickOutcome {
        match self.phase {
            SessionPhase::Active => {
                self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
                TickOutcome::Elapsed
            }
            SessionPhase::Resting => {
                self.rest_remaining = self.rest_remaining.saturating_sub(1);
                if self.rest_remaining == 0 {
                    self.phase = SessionPhase::Active;
                    debug!("rest finished, back to active");
                    TickOutcome::RestFinished
                } else {
                    TickOutcome::RestTick {
                        remaining: self.rest_remaining,
                    }
                }
            }
            _ => TickOutcome::Ignored,
        }
    }

    /// Marks one set done. Re-marking an already-done set is a no-op and does
    /// not restart the rest countdown.
    pub fn complete_set(&mut self, exercise: usize, set: usize) -> Result<SetOutcome, SessionError> {
        self.ensure_not_ended()?;
        match self.phase {
            SessionPhase::Active => {}
            SessionPhase::Ready => return Err(SessionError::NotStarted),
            _ => return Err(SessionError::NotActive),
        }
        let sets = self
            .completed
            .get_mut(exercise)
            .ok_or(SessionError::ExerciseOutOfRange(exercise))?;
        let slot = sets
            .get_mut(set)
            .ok_or(SessionError::SetOutOfRange { exercise, set })?;
        if *slot {
            return Ok(SetOutcome::AlreadyDone);
        }
        *slot = true;
        self.current_exercise = exercise;

        let exercise_done = self.completed[exercise].iter().all(|done| *done);
        if exercise_done {
            if self.all_sets_complete() {
                self.phase = SessionPhase::Completed;
                debug!("session {} completed", self.session_id);
                return Ok(SetOutcome::WorkoutCompleted);
            }
            return Ok(SetOutcome::ExerciseDone);
        }

        let mut rest = self.plan.exercises[exercise].rest_seconds;
        if rest == 0 {
            rest = DEFAULT_REST_SECONDS;
        }
        self.rest_remaining = rest;
        self.phase = SessionPhase::Resting;
        Ok(SetOutcome::RestStarted { seconds: rest })
    }

    pub fn skip_rest(&mut self) -> Result<(), SessionError> {
        self.ensure_not_ended()?;
        if self.phase != SessionPhase::Resting {
            return Err(SessionError::NotResting);
        }
        self.rest_remaining = 0;
        self.phase = SessionPhase::Active;
        Ok(())
    }

    /// Converts every stored working weight to the other unit and flips the
    /// unit flag. Round-trips within 0.1 of the original value.
    pub fn toggle_weight_unit(&mut self) {
        let target = self.unit.other();
        for weight in self.weights.iter_mut().flatten() {
            *weight = WeightUnit::convert(*weight, self.unit, target);
        }
        self.unit = target;
    }

    pub fn update_exercise_weight(
        &mut self,
        exercise: usize,
        value: f64,
    ) -> Result<(), SessionError> {
        self.ensure_not_ended()?;
        if self.phase == SessionPhase::Ready {
            return Err(SessionError::NotStarted);
        }
        if !value.is_finite() || value < 0.0 {
            return Err(SessionError::InvalidWeight(value));
        }
        let slot = self
            .weights
            .get_mut(exercise)
            .ok_or(SessionError::ExerciseOutOfRange(exercise))?;
        *slot = Some(value);
        Ok(())
    }

    /// Produces the terminal summary exactly once and retires the engine.
    pub fn end_session(&mut self, reason: EndReason) -> Result<SessionSummary, SessionError> {
        self.ensure_not_ended()?;
        if self.phase == SessionPhase::Ready {
            return Err(SessionError::NotStarted);
        }
        let started_at = self.started_at.clone().ok_or(SessionError::NotStarted)?;
        let outcome = match reason {
            EndReason::NaturalCompletion => SessionOutcome::Completed,
            EndReason::EarlyTermination => SessionOutcome::Abandoned,
        };
        let summary = SessionSummary {
            id: self.session_id.clone(),
            plan_name: self.plan.name.clone(),
            started_at,
            ended_at: now_rfc3339(),
            duration_seconds: self.elapsed_seconds,
            total_sets: self.total_sets(),
            completed_sets: self.completed_sets_count(),
            total_exercises: self.total_exercises(),
            completed_exercises: self.completed_exercises_count(),
            target_muscles: self.plan.target_muscles.clone(),
            outcome,
        };
        self.phase = SessionPhase::Completed;
        self.rest_remaining = 0;
        self.ended = true;
        Ok(summary)
    }

    /// Captures the paused session for persistence.
    pub fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        if self.phase != SessionPhase::Paused {
            return Err(SessionError::NotPaused);
        }
        let started_at = self.started_at.clone().ok_or(SessionError::NotStarted)?;
        Ok(SessionSnapshot {
            session_id: self.session_id.clone(),
            plan_name: self.plan.name.clone(),
            started_at,
            elapsed_seconds: self.elapsed_seconds,
            current_exercise: self.current_exercise,
            completed_sets: self.completed.clone(),
            weights: self.weights.clone(),
            weight_unit: self.unit,
            saved_at: now_rfc3339(),
        })
    }

    /// Rebuilds a paused engine from a snapshot taken against the same plan.
    pub fn resume_from_snapshot(
        plan: PreparedPlan,
        snapshot: SessionSnapshot,
    ) -> Result<Self, SessionError> {
        Self::validate_plan(&plan)?;
        if snapshot.completed_sets.len() != plan.exercises.len()
            || snapshot.weights.len() != plan.exercises.len()
            || snapshot.current_exercise >= plan.exercises.len()
        {
            return Err(SessionError::InvalidPlan(
                "snapshot does not match plan".to_string(),
            ));
        }
        for (sets, exercise) in snapshot.completed_sets.iter().zip(&plan.exercises) {
            if sets.len() != exercise.sets as usize {
                return Err(SessionError::InvalidPlan(
                    "snapshot does not match plan".to_string(),
                ));
            }
        }
        Ok(Self {
            plan,
            phase: SessionPhase::Paused,
            elapsed_seconds: snapshot.elapsed_seconds,
            rest_remaining: 0,
            current_exercise: snapshot.current_exercise,
            completed: snapshot.completed_sets,
            weights: snapshot.weights,
            unit: snapshot.weight_unit,
            session_id: snapshot.session_id,
            started_at: Some(snapshot.started_at),
            ended: false,
        })
    }

    fn ensure_not_ended(&self) -> Result<(), SessionError> {
        if self.ended {
            return Err(SessionError::AlreadyEnded);
        }
        Ok(())
    }

    fn validate_plan(plan: &PreparedPlan) -> Result<(), SessionError> {
        if plan.exercises.is_empty() {
            return Err(SessionError::InvalidPlan(
                "plan must have at least one exercise".to_string(),
            ));
        }
        if plan.exercises.iter().any(|exercise| exercise.sets == 0) {
            return Err(SessionError::InvalidPlan(
                "exercise must prescribe at least one set".to_string(),
            ));
        }
        Ok(())
    }
}

fn seed_weights(exercises: &[PreparedExercise], unit: WeightUnit) -> Vec<Option<f64>> {
    exercises
        .iter()
        .map(|exercise| exercise.weight.map(|weight| weight.to_unit(unit).value))
        .collect()
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

fn generate_session_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    format!("session-{nanos}-{}", std::process::id())
}

#[cfg(test)]
mod tests {
    use super::{
        EndReason, SessionEngine, SessionError, SessionPhase, SetOutcome, TickOutcome,
    };
    use crate::models::{Exercise, SessionOutcome, Weight, WeightUnit, WorkoutPlan};
    use crate::prescription::{prepare_plan, PreparedExercise, PreparedPlan};

    fn raw_exercise(name: &str, order: u32) -> Exercise {
        Exercise {
            name: name.to_string(),
            sets: "3".to_string(),
            reps: "10".to_string(),
            weight: String::new(),
            rest: String::new(),
            order,
            notes: None,
        }
    }

    fn sample_exercise(name: &str, sets: u32, rest_seconds: u32) -> PreparedExercise {
        PreparedExercise {
            name: name.to_string(),
            sets,
            reps: "10".to_string(),
            weight: None,
            rest_seconds,
            notes: None,
        }
    }

    fn sample_plan(exercises: Vec<PreparedExercise>) -> PreparedPlan {
        PreparedPlan {
            name: "Push Day".to_string(),
            description: String::new(),
            target_muscles: vec!["chest".to_string()],
            exercises,
        }
    }

    fn started_engine(exercises: Vec<PreparedExercise>) -> SessionEngine {
        let mut engine = SessionEngine::new(sample_plan(exercises)).expect("engine");
        engine.start().expect("start");
        engine
    }

    // Completes a set and skips any rest it starts, so ordering tests can
    // mark sets back to back.
    fn complete_and_skip(engine: &mut SessionEngine, exercise: usize, set: usize) -> SetOutcome {
        let outcome = engine.complete_set(exercise, set).expect("complete set");
        if matches!(outcome, SetOutcome::RestStarted { .. }) {
            engine.skip_rest().expect("skip rest");
        }
        outcome
    }

    #[test]
    fn start_initializes_session() {
        let engine = started_engine(vec![
            sample_exercise("Bench", 3, 90),
            sample_exercise("Row", 2, 60),
        ]);

        assert_eq!(engine.phase(), SessionPhase::Active);
        assert_eq!(engine.elapsed_seconds(), 0);
        assert_eq!(engine.total_sets(), 5);
        assert_eq!(engine.completed_sets_count(), 0);
        assert_eq!(engine.completed_exercises_count(), 0);
        assert_eq!(engine.completed_sets(), &[vec![false; 3], vec![false; 2]]);
    }

    #[test]
    fn start_twice_fails() {
        let mut engine = started_engine(vec![sample_exercise("Bench", 3, 90)]);
        assert_eq!(engine.start(), Err(SessionError::AlreadyStarted));
    }

    #[test]
    fn rejects_plan_without_exercises() {
        let err = SessionEngine::new(sample_plan(Vec::new())).expect_err("should fail");
        assert!(matches!(err, SessionError::InvalidPlan(_)));
    }

    #[test]
    fn non_final_set_starts_rest() {
        let mut engine = started_engine(vec![sample_exercise("Bench", 3, 90)]);

        let outcome = engine.complete_set(0, 0).expect("complete set");

        assert_eq!(outcome, SetOutcome::RestStarted { seconds: 90 });
        assert_eq!(engine.phase(), SessionPhase::Resting);
        assert_eq!(engine.rest_remaining(), 90);
    }

    #[test]
    fn final_set_of_exercise_skips_rest() {
        let mut engine = started_engine(vec![
            sample_exercise("Bench", 2, 90),
            sample_exercise("Row", 1, 60),
        ]);
        complete_and_skip(&mut engine, 0, 0);

        let outcome = engine.complete_set(0, 1).expect("complete set");

        assert_eq!(outcome, SetOutcome::ExerciseDone);
        assert_eq!(engine.phase(), SessionPhase::Active);
        assert_eq!(engine.rest_remaining(), 0);
    }

    #[test]
    fn completing_every_set_completes_workout_in_any_order() {
        let mut engine = started_engine(vec![
            sample_exercise("Bench", 2, 60),
            sample_exercise("Row", 2, 60),
        ]);

        // Interleaved, not exercise by exercise.
        complete_and_skip(&mut engine, 1, 1);
        complete_and_skip(&mut engine, 0, 0);
        complete_and_skip(&mut engine, 1, 0);
        let outcome = engine.complete_set(0, 1).expect("final set");

        assert_eq!(outcome, SetOutcome::WorkoutCompleted);
        assert_eq!(engine.phase(), SessionPhase::Completed);
        assert_eq!(engine.completed_sets_count(), 4);
        assert_eq!(engine.completed_exercises_count(), 2);
    }

    #[test]
    fn recompleting_a_set_is_a_noop() {
        let mut engine = started_engine(vec![sample_exercise("Bench", 3, 90)]);
        complete_and_skip(&mut engine, 0, 0);

        let outcome = engine.complete_set(0, 0).expect("recomplete");

        assert_eq!(outcome, SetOutcome::AlreadyDone);
        assert_eq!(engine.phase(), SessionPhase::Active);
        assert_eq!(engine.rest_remaining(), 0);
        assert_eq!(engine.completed_sets_count(), 1);
    }

    #[test]
    fn complete_set_rejects_out_of_range_indices() {
        let mut engine = started_engine(vec![sample_exercise("Bench", 3, 90)]);

        assert_eq!(
            engine.complete_set(5, 0),
            Err(SessionError::ExerciseOutOfRange(5))
        );
        assert_eq!(
            engine.complete_set(0, 9),
            Err(SessionError::SetOutOfRange { exercise: 0, set: 9 })
        );
    }

    #[test]
    fn complete_set_requires_active_phase() {
        let plan = sample_plan(vec![sample_exercise("Bench", 3, 90)]);
        let mut engine = SessionEngine::new(plan).expect("engine");
        assert_eq!(engine.complete_set(0, 0), Err(SessionError::NotStarted));

        engine.start().expect("start");
        engine.complete_set(0, 0).expect("complete set");
        assert_eq!(engine.phase(), SessionPhase::Resting);
        assert_eq!(engine.complete_set(0, 1), Err(SessionError::NotActive));
    }

    #[test]
    fn tick_advances_elapsed_only_while_active() {
        let plan = sample_plan(vec![sample_exercise("Bench", 3, 90)]);
        let mut engine = SessionEngine::new(plan).expect("engine");
        assert_eq!(engine.tick(), TickOutcome::Ignored);

        engine.start().expect("start");

        assert_eq!(engine.tick(), TickOutcome::Elapsed);
        assert_eq!(engine.tick(), TickOutcome::Elapsed);
        assert_eq!(engine.elapsed_seconds(), 2);

        engine.pause().expect("pause");
        assert_eq!(engine.tick(), TickOutcome::Ignored);
        assert_eq!(engine.elapsed_seconds(), 2);

        engine.resume().expect("resume");
        assert_eq!(engine.tick(), TickOutcome::Elapsed);
        assert_eq!(engine.elapsed_seconds(), 3);
    }

    #[test]
    fn rest_counts_down_and_returns_to_active() {
        let mut engine = started_engine(vec![sample_exercise("Bench", 3, 2)]);
        engine.tick();
        engine.complete_set(0, 0).expect("complete set");

        assert_eq!(engine.tick(), TickOutcome::RestTick { remaining: 1 });
        // Elapsed time does not advance while resting.
        assert_eq!(engine.elapsed_seconds(), 1);
        assert_eq!(engine.tick(), TickOutcome::RestFinished);
        assert_eq!(engine.phase(), SessionPhase::Active);
        assert_eq!(engine.rest_remaining(), 0);
    }

    #[test]
    fn skip_rest_forces_active_immediately() {
        let mut engine = started_engine(vec![sample_exercise("Bench", 3, 120)]);
        engine.complete_set(0, 0).expect("complete set");
        assert_eq!(engine.rest_remaining(), 120);

        engine.skip_rest().expect("skip rest");

        assert_eq!(engine.phase(), SessionPhase::Active);
        assert_eq!(engine.rest_remaining(), 0);
        assert_eq!(engine.skip_rest(), Err(SessionError::NotResting));
    }

    #[test]
    fn pausing_mid_rest_discards_the_countdown() {
        let mut engine = started_engine(vec![sample_exercise("Bench", 3, 120)]);
        engine.complete_set(0, 0).expect("complete set");
        assert_eq!(engine.phase(), SessionPhase::Resting);

        engine.pause().expect("pause");
        assert_eq!(engine.phase(), SessionPhase::Paused);
        assert_eq!(engine.rest_remaining(), 0);

        engine.resume().expect("resume");
        assert_eq!(engine.phase(), SessionPhase::Active);
        assert_eq!(engine.rest_remaining(), 0);
    }

    #[test]
    fn two_exercise_plan_runs_to_completion_with_default_rest() {
        // No weight or rest supplied on either exercise: the prescription
        // boundary defaults rest to 60s between non-final sets.
        let raw = WorkoutPlan {
            id: "plan-1".to_string(),
            name: "Push Day".to_string(),
            description: String::new(),
            exercises: vec![
                raw_exercise("Squat", 0),
                raw_exercise("Lunge", 1),
            ],
            estimated_minutes: 30,
            target_muscles: Vec::new(),
        };
        let (prepared, warnings) = prepare_plan(&raw).expect("prepare");
        assert!(warnings.is_empty());
        let mut engine = SessionEngine::new(prepared).expect("engine");
        engine.start().expect("start");

        for (exercise, set) in [(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)] {
            let outcome = complete_and_skip(&mut engine, exercise, set);
            if (exercise, set) != (1, 2) {
                assert_ne!(outcome, SetOutcome::WorkoutCompleted);
            } else {
                assert_eq!(outcome, SetOutcome::WorkoutCompleted);
            }
            if set < 2 {
                assert_eq!(outcome, SetOutcome::RestStarted { seconds: 60 });
            }
        }

        assert_eq!(engine.phase(), SessionPhase::Completed);
        assert_eq!(engine.completed_sets_count(), 6);
        assert_eq!(engine.total_sets(), 6);
        assert_eq!(engine.completed_exercises_count(), 2);

        let summary = engine
            .end_session(EndReason::NaturalCompletion)
            .expect("summary");
        assert_eq!(summary.outcome, SessionOutcome::Completed);
        assert_eq!(summary.completed_sets, 6);
        assert_eq!(summary.total_sets, 6);
        assert_eq!(summary.completed_exercises, 2);
        assert_eq!(summary.plan_name, "Push Day");
    }

    #[test]
    fn early_termination_reports_progress_so_far() {
        let mut engine = started_engine(vec![
            sample_exercise("Squat", 3, 60),
            sample_exercise("Lunge", 3, 60),
        ]);
        for _ in 0..30 {
            engine.tick();
        }

        let summary = engine
            .end_session(EndReason::EarlyTermination)
            .expect("summary");

        assert_eq!(summary.outcome, SessionOutcome::Abandoned);
        assert_eq!(summary.duration_seconds, 30);
        assert_eq!(summary.completed_sets, 0);
        assert_eq!(summary.completed_exercises, 0);
        assert_eq!(summary.total_sets, 6);
    }

    #[test]
    fn engine_is_not_reusable_after_ending() {
        let mut engine = started_engine(vec![sample_exercise("Bench", 1, 60)]);
        engine.end_session(EndReason::EarlyTermination).expect("summary");

        assert_eq!(
            engine.end_session(EndReason::EarlyTermination),
            Err(SessionError::AlreadyEnded)
        );
        assert_eq!(engine.start(), Err(SessionError::AlreadyEnded));
        assert_eq!(engine.complete_set(0, 0), Err(SessionError::AlreadyEnded));
        assert_eq!(engine.tick(), TickOutcome::Ignored);
    }

    #[test]
    fn exercise_cursor_follows_selection_and_completed_sets() {
        let mut engine = started_engine(vec![
            sample_exercise("Bench", 2, 60),
            sample_exercise("Row", 2, 60),
        ]);
        assert_eq!(engine.current_exercise(), 0);

        engine.select_exercise(1).expect("select");
        assert_eq!(engine.current_exercise(), 1);
        assert_eq!(
            engine.select_exercise(5),
            Err(SessionError::ExerciseOutOfRange(5))
        );

        complete_and_skip(&mut engine, 0, 0);
        assert_eq!(engine.current_exercise(), 0);
    }

    #[test]
    fn toggle_weight_unit_converts_working_weights() {
        let mut bench = sample_exercise("Bench", 3, 90);
        bench.weight = Some(Weight {
            value: 60.0,
            unit: WeightUnit::Kg,
        });
        let mut engine = started_engine(vec![bench]);
        assert_eq!(engine.exercise_weight(0), Some(60.0));

        engine.toggle_weight_unit();
        assert_eq!(engine.weight_unit(), WeightUnit::Lbs);
        assert_eq!(engine.exercise_weight(0), Some(132.3));

        engine.toggle_weight_unit();
        assert_eq!(engine.weight_unit(), WeightUnit::Kg);
        assert_eq!(engine.exercise_weight(0), Some(60.0));
    }

    #[test]
    fn update_weight_validates_input() {
        let mut engine = started_engine(vec![sample_exercise("Bench", 3, 90)]);

        engine.update_exercise_weight(0, 42.5).expect("update");
        assert_eq!(engine.exercise_weight(0), Some(42.5));

        assert_eq!(
            engine.update_exercise_weight(0, -1.0),
            Err(SessionError::InvalidWeight(-1.0))
        );
        assert_eq!(
            engine.update_exercise_weight(3, 10.0),
            Err(SessionError::ExerciseOutOfRange(3))
        );
    }

    #[test]
    fn snapshot_round_trip_restores_paused_session() {
        let mut engine = started_engine(vec![
            sample_exercise("Bench", 2, 60),
            sample_exercise("Row", 2, 60),
        ]);
        engine.tick();
        engine.tick();
        complete_and_skip(&mut engine, 0, 0);
        engine.update_exercise_weight(1, 40.0).expect("update");
        engine.select_exercise(1).expect("select");
        engine.pause().expect("pause");

        let snapshot = engine.snapshot().expect("snapshot");
        let plan = engine.plan().clone();
        let mut restored = SessionEngine::resume_from_snapshot(plan, snapshot).expect("restore");

        assert_eq!(restored.phase(), SessionPhase::Paused);
        assert_eq!(restored.elapsed_seconds(), 2);
        assert_eq!(restored.completed_sets_count(), 1);
        assert_eq!(restored.exercise_weight(1), Some(40.0));
        assert_eq!(restored.current_exercise(), 1);

        restored.resume().expect("resume");
        assert_eq!(restored.phase(), SessionPhase::Active);
    }

    #[test]
    fn snapshot_requires_paused_phase() {
        let engine = started_engine(vec![sample_exercise("Bench", 2, 60)]);
        assert_eq!(engine.snapshot().unwrap_err(), SessionError::NotPaused);
    }

    #[test]
    fn snapshot_must_match_plan_shape() {
        let mut engine = started_engine(vec![sample_exercise("Bench", 2, 60)]);
        engine.pause().expect("pause");
        let snapshot = engine.snapshot().expect("snapshot");

        let other_plan = sample_plan(vec![sample_exercise("Bench", 3, 60)]);
        let err = SessionEngine::resume_from_snapshot(other_plan, snapshot)
            .expect_err("should fail");
        assert!(matches!(err, SessionError::InvalidPlan(_)));
    }

    #[test]
    fn snapshot_with_out_of_range_cursor_is_rejected() {
        let mut engine = started_engine(vec![sample_exercise("Bench", 2, 60)]);
        engine.pause().expect("pause");
        let mut snapshot = engine.snapshot().expect("snapshot");
        snapshot.current_exercise = 5;

        let plan = engine.plan().clone();
        let err = SessionEngine::resume_from_snapshot(plan, snapshot).expect_err("should fail");
        assert!(matches!(err, SessionError::InvalidPlan(_)));
    }
}
