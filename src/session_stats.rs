use crate::models::{SessionOutcome, SessionSummary, WeeklyStats, WorkoutStats};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use log::warn;
use std::collections::BTreeSet;

pub fn calculate_workout_stats(summaries: &[SessionSummary]) -> WorkoutStats {
    let workouts_count = summaries.len().try_into().unwrap_or(u32::MAX);
    let mut stats = WorkoutStats {
        workouts_count,
        ..WorkoutStats::default()
    };

    for summary in summaries {
        stats.total_seconds = stats.total_seconds.saturating_add(summary.duration_seconds);
        stats.total_sets = stats.total_sets.saturating_add(summary.completed_sets);
        match summary.outcome {
            SessionOutcome::Completed => {
                stats.completed_count = stats.completed_count.saturating_add(1);
            }
            SessionOutcome::Abandoned => {
                stats.abandoned_count = stats.abandoned_count.saturating_add(1);
            }
        }
    }

    if stats.workouts_count > 0 {
        stats.avg_duration_seconds = stats.total_seconds / stats.workouts_count;
        stats.completion_rate = stats.completed_count as f32 / stats.workouts_count as f32;
    }

    stats
}

/// Totals for the trailing seven days, ending at `now`.
pub fn weekly_stats(summaries: &[SessionSummary], now: DateTime<Utc>) -> WeeklyStats {
    let window_start = now - Duration::days(7);
    let mut stats = WeeklyStats::default();

    for summary in summaries {
        let Some(ended_at) = parse_timestamp(&summary.ended_at) else {
            continue;
        };
        if ended_at >= window_start && ended_at <= now {
            stats.workouts_count = stats.workouts_count.saturating_add(1);
            stats.total_seconds = stats.total_seconds.saturating_add(summary.duration_seconds);
            stats.total_sets = stats.total_sets.saturating_add(summary.completed_sets);
        }
    }

    stats
}

/// Consecutive calendar days with at least one completed workout, counting
/// back from `today`. A streak survives until a full day is missed, so a
/// workout yesterday but not yet today still counts.
pub fn current_streak_days(summaries: &[SessionSummary], today: NaiveDate) -> u32 {
    let workout_days: BTreeSet<NaiveDate> = summaries
        .iter()
        .filter(|summary| summary.outcome == SessionOutcome::Completed)
        .filter_map(|summary| parse_timestamp(&summary.ended_at))
        .map(|ended_at| ended_at.date_naive())
        .collect();

    let mut day = if workout_days.contains(&today) {
        today
    } else if let Some(yesterday) = today.pred_opt() {
        if !workout_days.contains(&yesterday) {
            return 0;
        }
        yesterday
    } else {
        return 0;
    };

    let mut streak = 0;
    while workout_days.contains(&day) {
        streak += 1;
        match day.pred_opt() {
            Some(previous) => day = previous,
            None => break,
        }
    }
    streak
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(err) => {
            warn!("skipping summary with bad timestamp {value:?}: {err}");
            None
        }
    }
}
