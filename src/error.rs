use crate::data_manager::DataError;
use crate::prescription::PlanError;
use crate::session_engine::SessionError;
use thiserror::Error;

/// Crate-level error for hosts that want a single error channel.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Data(#[from] DataError),
}

pub type Result<T> = std::result::Result<T, Error>;
