//! Infrastructure error shared by the repository ports.
//!
//! Kept apart from `DomainError` so a boundary can tell "the rules said no"
//! from "the storage broke".

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The storage backend failed (connection, query, constraint...).
    #[error("storage backend error: {0}")]
    Backend(#[source] BoxError),

    /// `save` was called with an id that is already stored.
    #[error("{entity} {id} already exists in storage")]
    AlreadyExists { entity: &'static str, id: String },

    /// `update` was called for a row that does not exist.
    #[error("{entity} {id} does not exist in storage")]
    MissingRow { entity: &'static str, id: String },

    /// Stored data could not be mapped back to an entity.
    #[error("corrupt stored data: {0}")]
    Corrupt(String),
}

impl RepositoryError {
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(err))
    }
}

pub type RepoResult<T> = Result<T, RepositoryError>;
