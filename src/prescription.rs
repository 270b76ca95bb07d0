use crate::models::{Weight, WeightUnit, WorkoutPlan};
use log::warn;
use thiserror::Error;

pub const DEFAULT_SETS: u32 = 3;
pub const DEFAULT_REST_SECONDS: u32 = 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("plan has no exercises")]
    Empty,
}

/// Fallbacks applied when a prescription field cannot be parsed.
#[derive(Debug, Clone, Copy)]
pub struct PrescriptionDefaults {
    pub sets: u32,
    pub rest_seconds: u32,
}

impl Default for PrescriptionDefaults {
    fn default() -> Self {
        Self {
            sets: DEFAULT_SETS,
            rest_seconds: DEFAULT_REST_SECONDS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrescriptionField {
    Sets,
    Weight,
    Rest,
}

/// A fallback applied to unparseable input. Surfaced to the caller instead of
/// being swallowed inside the session logic.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseWarning {
    pub exercise: String,
    pub field: PrescriptionField,
    pub raw: String,
    pub fallback: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreparedPlan {
    pub name: String,
    pub description: String,
    pub target_muscles: Vec<String>,
    pub exercises: Vec<PreparedExercise>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreparedExercise {
    pub name: String,
    pub sets: u32,
    pub reps: String,
    pub weight: Option<Weight>,
    pub rest_seconds: u32,
    pub notes: Option<String>,
}

pub fn prepare_plan(plan: &WorkoutPlan) -> Result<(PreparedPlan, Vec<ParseWarning>), PlanError> {
    prepare_plan_with(plan, &PrescriptionDefaults::default())
}

/// Parses every free-form prescription field of `plan` into typed values,
/// ordering exercises by their display order. Unparseable fields fall back to
/// `defaults` and are reported as warnings.
pub fn prepare_plan_with(
    plan: &WorkoutPlan,
    defaults: &PrescriptionDefaults,
) -> Result<(PreparedPlan, Vec<ParseWarning>), PlanError> {
    if plan.exercises.is_empty() {
        return Err(PlanError::Empty);
    }

    let mut ordered: Vec<_> = plan.exercises.iter().collect();
    ordered.sort_by_key(|exercise| exercise.order);

    let mut warnings = Vec::new();
    let mut exercises = Vec::with_capacity(ordered.len());
    for exercise in ordered {
        // Empty fields count as "not prescribed" and default silently; only
        // non-empty input that fails to parse is worth a warning.
        let raw_sets = exercise.sets.trim();
        let sets = if raw_sets.is_empty() {
            defaults.sets
        } else {
            parse_sets(raw_sets).unwrap_or_else(|| {
                push_warning(
                    &mut warnings,
                    exercise.name.clone(),
                    PrescriptionField::Sets,
                    raw_sets,
                    defaults.sets.to_string(),
                );
                defaults.sets
            })
        };
        let raw_rest = exercise.rest.trim();
        let rest_seconds = if raw_rest.is_empty() {
            defaults.rest_seconds
        } else {
            parse_rest_seconds(raw_rest).unwrap_or_else(|| {
                push_warning(
                    &mut warnings,
                    exercise.name.clone(),
                    PrescriptionField::Rest,
                    raw_rest,
                    format!("{}s", defaults.rest_seconds),
                );
                defaults.rest_seconds
            })
        };
        let weight = match parse_weight(&exercise.weight) {
            Ok(weight) => weight,
            Err(()) => {
                push_warning(
                    &mut warnings,
                    exercise.name.clone(),
                    PrescriptionField::Weight,
                    &exercise.weight,
                    "bodyweight".to_string(),
                );
                None
            }
        };

        exercises.push(PreparedExercise {
            name: exercise.name.clone(),
            sets,
            reps: exercise.reps.clone(),
            weight,
            rest_seconds,
            notes: exercise.notes.clone(),
        });
    }

    Ok((
        PreparedPlan {
            name: plan.name.clone(),
            description: plan.description.clone(),
            target_muscles: plan.target_muscles.clone(),
            exercises,
        },
        warnings,
    ))
}

fn push_warning(
    warnings: &mut Vec<ParseWarning>,
    exercise: String,
    field: PrescriptionField,
    raw: &str,
    fallback: String,
) {
    warn!("unparseable {field:?} prescription {raw:?} for {exercise:?}, using {fallback}");
    warnings.push(ParseWarning {
        exercise,
        field,
        raw: raw.to_string(),
        fallback,
    });
}

/// Accepts "3", "3-4", "3x10" and similar; takes the leading integer.
fn parse_sets(raw: &str) -> Option<u32> {
    match leading_integer(raw) {
        Some(0) | None => None,
        Some(sets) => Some(sets),
    }
}

/// Accepts "60", "60s", "90 sec", "1 min", "1.5 min".
fn parse_rest_seconds(raw: &str) -> Option<u32> {
    let number = leading_number(raw)?;
    if number <= 0.0 {
        return None;
    }
    let lowered = raw.to_lowercase();
    let seconds = if lowered.contains("min") {
        number * 60.0
    } else {
        number
    };
    Some(seconds.round() as u32)
}

/// Empty input and "bodyweight" mean no working weight. A bare number is
/// taken as kilograms. Non-empty input with no number is an error.
fn parse_weight(raw: &str) -> Result<Option<Weight>, ()> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let lowered = raw.to_lowercase();
    if lowered.contains("bodyweight") || lowered.contains("body weight") || lowered == "bw" {
        return Ok(None);
    }
    let value = leading_number(raw).ok_or(())?;
    let unit = if lowered.contains("lb") {
        WeightUnit::Lbs
    } else {
        WeightUnit::Kg
    };
    Ok(Some(Weight { value, unit }))
}

fn leading_integer(raw: &str) -> Option<u32> {
    let digits: String = raw
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

fn leading_number(raw: &str) -> Option<f64> {
    let start = raw.find(|c: char| c.is_ascii_digit())?;
    let number: String = raw[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    number.parse().ok()
}
