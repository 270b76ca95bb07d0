use serde::{Deserialize, Serialize};

/// A workout plan as authored, AI-generated or loaded from storage.
/// Prescription fields are free-form strings; `prescription::prepare_plan`
/// turns them into typed values before a session starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlan {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub exercises: Vec<Exercise>,
    pub estimated_minutes: u32,
    #[serde(default)]
    pub target_muscles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub name: String,
    pub sets: String,
    pub reps: String,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub rest: String,
    pub order: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

pub const KG_TO_LBS: f64 = 2.20462;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    Kg,
    Lbs,
}

impl WeightUnit {
    pub fn other(self) -> Self {
        match self {
            WeightUnit::Kg => WeightUnit::Lbs,
            WeightUnit::Lbs => WeightUnit::Kg,
        }
    }

    /// Converts `value` between units, rounded to one decimal place.
    pub fn convert(value: f64, from: WeightUnit, to: WeightUnit) -> f64 {
        let converted = match (from, to) {
            (WeightUnit::Kg, WeightUnit::Lbs) => value * KG_TO_LBS,
            (WeightUnit::Lbs, WeightUnit::Kg) => value / KG_TO_LBS,
            _ => value,
        };
        round_tenth(converted)
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weight {
    pub value: f64,
    pub unit: WeightUnit,
}

impl Weight {
    pub fn to_unit(self, unit: WeightUnit) -> Weight {
        Weight {
            value: WeightUnit::convert(self.value, self.unit, unit),
            unit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionOutcome {
    Completed,
    Abandoned,
}

/// Terminal record of a finished or abandoned session, handed to persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: String,
    pub plan_name: String,
    pub started_at: String,
    pub ended_at: String,
    pub duration_seconds: u32,
    pub total_sets: u32,
    pub completed_sets: u32,
    pub total_exercises: u32,
    pub completed_exercises: u32,
    #[serde(default)]
    pub target_muscles: Vec<String>,
    pub outcome: SessionOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutStats {
    pub workouts_count: u32,
    pub completed_count: u32,
    pub abandoned_count: u32,
    pub total_seconds: u32,
    pub total_sets: u32,
    pub avg_duration_seconds: u32,
    pub completion_rate: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyStats {
    pub workouts_count: u32,
    pub total_seconds: u32,
    pub total_sets: u32,
}

#[cfg(test)]
mod tests {
    use super::{Weight, WeightUnit};

    #[test]
    fn converts_between_units_with_one_decimal() {
        assert_eq!(
            WeightUnit::convert(100.0, WeightUnit::Kg, WeightUnit::Lbs),
            220.5
        );
        assert_eq!(
            WeightUnit::convert(220.5, WeightUnit::Lbs, WeightUnit::Kg),
            100.0
        );
        assert_eq!(WeightUnit::convert(60.0, WeightUnit::Kg, WeightUnit::Kg), 60.0);
    }

    #[test]
    fn unit_round_trip_stays_within_tolerance() {
        for kg in 1..=500 {
            let original = kg as f64;
            let lbs = WeightUnit::convert(original, WeightUnit::Kg, WeightUnit::Lbs);
            let back = WeightUnit::convert(lbs, WeightUnit::Lbs, WeightUnit::Kg);
            assert!(
                (back - original).abs() <= 0.1,
                "round trip drifted: {original} kg -> {lbs} lbs -> {back} kg"
            );
        }
    }

    #[test]
    fn fractional_round_trip_stays_within_tolerance() {
        for tenths in 10..=1000 {
            let original = tenths as f64 / 10.0;
            let lbs = WeightUnit::convert(original, WeightUnit::Kg, WeightUnit::Lbs);
            let back = WeightUnit::convert(lbs, WeightUnit::Lbs, WeightUnit::Kg);
            assert!((back - original).abs() <= 0.1);
        }
    }

    #[test]
    fn weight_to_unit_converts_value() {
        let w = Weight {
            value: 50.0,
            unit: WeightUnit::Kg,
        };
        let lbs = w.to_unit(WeightUnit::Lbs);
        assert_eq!(lbs.unit, WeightUnit::Lbs);
        assert_eq!(lbs.value, 110.2);
    }
}
