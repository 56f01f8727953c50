//! AppError - ユースケースが返すエラー
//!
//! Domain rejections and storage failures stay distinct so the boundary can
//! map them differently.

use thiserror::Error;

use crate::domain::{DomainError, ErrorKind};
use crate::ports::RepositoryError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Domain(e) => e.kind(),
            AppError::Repository(_) => ErrorKind::Infrastructure,
        }
    }

    /// The domain error, if this is one.
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            AppError::Domain(e) => Some(e),
            AppError::Repository(_) => None,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
