use crate::models::{SessionSummary, WorkoutPlan};
use crate::snapshot::SessionSnapshot;
use chrono::DateTime;
use log::warn;
use serde::Serialize;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("datetime parse error: {0}")]
    DateTime(String),
}

impl From<chrono::ParseError> for DataError {
    fn from(value: chrono::ParseError) -> Self {
        Self::DateTime(value.to_string())
    }
}

pub type DataResult<T> = Result<T, DataError>;

/// Accepts finished session summaries. The storage root is an explicit
/// argument of whoever constructs the sink; nothing reaches for an ambient
/// current-user context.
pub trait SummarySink {
    fn record_summary(&self, summary: &SessionSummary) -> DataResult<()>;
}

/// Fire-and-forget save: a failed write is logged and swallowed, matching the
/// product behavior where the session still reports complete to the user.
pub fn persist_summary<S: SummarySink>(sink: &S, summary: &SessionSummary) {
    if let Err(err) = sink.record_summary(summary) {
        warn!("failed to persist summary {}: {err}", summary.id);
    }
}

/// File-backed store for plans, session summaries and the paused-session
/// snapshot, all JSON documents under one base directory.
#[derive(Debug, Clone)]
pub struct DataManager {
    base_dir: PathBuf,
    plans_path: PathBuf,
    sessions_path: PathBuf,
    snapshot_path: PathBuf,
}

impl DataManager {
    pub fn new(base_dir: impl Into<PathBuf>) -> DataResult<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir)?;
        let plans_path = base_dir.join("plans.json");
        let sessions_path = base_dir.join("sessions.json");
        let snapshot_path = base_dir.join("active_session.json");

        let manager = Self {
            base_dir,
            plans_path,
            sessions_path,
            snapshot_path,
        };

        if !manager.plans_path.exists() {
            manager.write_json(&manager.plans_path, &Vec::<WorkoutPlan>::new())?;
        }
        if !manager.sessions_path.exists() {
            manager.write_json(&manager.sessions_path, &Vec::<SessionSummary>::new())?;
        }

        Ok(manager)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn load_plans(&self) -> DataResult<Vec<WorkoutPlan>> {
        if !self.plans_path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.plans_path)?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        let plans = serde_json::from_str(&contents)?;
        Ok(plans)
    }

    pub fn find_plan(&self, id: &str) -> DataResult<Option<WorkoutPlan>> {
        let plans = self.load_plans()?;
        Ok(plans.into_iter().find(|plan| plan.id == id))
    }

    pub fn save_plan(&self, plan: WorkoutPlan) -> DataResult<()> {
        let mut plans = self.load_plans()?;
        if let Some(existing) = plans.iter_mut().find(|item| item.id == plan.id) {
            *existing = plan;
        } else {
            plans.push(plan);
        }
        self.save_plans(&plans)
    }

    pub fn save_plans(&self, plans: &[WorkoutPlan]) -> DataResult<()> {
        self.write_json(&self.plans_path, plans)
    }

    pub fn load_summaries(&self) -> DataResult<Vec<SessionSummary>> {
        if !self.sessions_path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.sessions_path)?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        let summaries = serde_json::from_str(&contents)?;
        Ok(summaries)
    }

    pub fn save_summary(&self, summary: SessionSummary) -> DataResult<()> {
        let mut summaries = self.load_summaries()?;
        if let Some(existing) = summaries.iter_mut().find(|item| item.id == summary.id) {
            *existing = summary;
        } else {
            summaries.push(summary);
        }
        self.save_summaries(&summaries)
    }

    pub fn save_summaries(&self, summaries: &[SessionSummary]) -> DataResult<()> {
        self.write_json(&self.sessions_path, summaries)
    }

    pub fn load_summaries_in_range(
        &self,
        from: &str,
        to: &str,
    ) -> DataResult<Vec<SessionSummary>> {
        let from_dt = Self::parse_datetime(from)?;
        let to_dt = Self::parse_datetime(to)?;
        let summaries = self.load_summaries()?;
        summaries
            .into_iter()
            .try_fold(Vec::new(), |mut acc, summary| {
                let ended_at = Self::parse_datetime(&summary.ended_at)?;
                if ended_at >= from_dt && ended_at <= to_dt {
                    acc.push(summary);
                }
                Ok(acc)
            })
    }

    pub fn save_active_snapshot(&self, snapshot: &SessionSnapshot) -> DataResult<()> {
        self.write_json(&self.snapshot_path, snapshot)
    }

    pub fn load_active_snapshot(&self) -> DataResult<Option<SessionSnapshot>> {
        if !self.snapshot_path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.snapshot_path)?;
        if contents.trim().is_empty() {
            return Ok(None);
        }
        let snapshot = serde_json::from_str(&contents)?;
        Ok(Some(snapshot))
    }

    pub fn clear_active_snapshot(&self) -> DataResult<()> {
        if self.snapshot_path.exists() {
            fs::remove_file(&self.snapshot_path)?;
        }
        Ok(())
    }

    fn parse_datetime(value: &str) -> DataResult<DateTime<chrono::FixedOffset>> {
        Ok(DateTime::parse_from_rfc3339(value)?)
    }

    fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> DataResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let temp_path = path.with_extension("tmp");
        let file = fs::File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        match fs::rename(&temp_path, path) {
            Ok(()) => Ok(()),
            Err(_err) if path.exists() => {
                let _ = fs::remove_file(path);
                fs::rename(&temp_path, path).map_err(DataError::from)
            }
            Err(err) => Err(DataError::from(err)),
        }
    }
}

impl SummarySink for DataManager {
    fn record_summary(&self, summary: &SessionSummary) -> DataResult<()> {
        self.save_summary(summary.clone())
    }
}
