//! Errors - ドメインエラーと分類
//!
//! Domain errors carry a human-readable message and an [`ErrorKind`]. The kind
//! is what a boundary (CLI, HTTP adapter) maps to an external status; the core
//! never does that mapping itself.

use thiserror::Error;

/// ErrorKind は失敗の分類
///
/// - NotFound: 参照先のエンティティが存在しない
/// - Conflict: 現在の状態では実行できない操作
/// - Validation: ビジネスルール違反
/// - Infrastructure: ストレージ層の障害（ドメインエラーではない）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Validation,
    Infrastructure,
}

impl ErrorKind {
    /// HTTP-style status code conventionally associated with this kind.
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::Validation => 422,
            ErrorKind::Infrastructure => 500,
        }
    }

    /// Short label used in user-facing output.
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Validation => "unprocessable",
            ErrorKind::Infrastructure => "internal",
        }
    }
}

/// Business-rule failure raised by entities, domain services and use cases.
///
/// `Display` is exactly the message, so callers can surface it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::NotFound(_) => ErrorKind::NotFound,
            DomainError::Conflict(_) => ErrorKind::Conflict,
            DomainError::Validation(_) => ErrorKind::Validation,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            DomainError::NotFound(m) | DomainError::Conflict(m) | DomainError::Validation(m) => m,
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
