//! Domain identifiers (strongly-typed IDs).
//!
//! IDs are ULIDs wrapped in a phantom-typed `Id<T>`, so a `ProjectId` can never
//! be passed where a `TaskId` is expected.
//!
//! ## ULID の特性
//! - **時刻でソート可能**: timestamp が先頭にあるため、生成順序でソートできる
//! - **分散生成可能**: 調整なしで複数ノードで生成できる
//! - **UUID互換**: 128-bit で UUID と同じサイズ

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use ulid::Ulid;

/// IdMarker は各 ID 型のマーカー trait
///
/// Display で使うプレフィックス（"project-", "task-"）を提供します。
pub trait IdMarker: Send + Sync + 'static {
    /// Display で使うプレフィックス
    fn prefix() -> &'static str;
}

/// ジェネリック ID 型
///
/// Serialized as the bare ULID string; the prefix is a display concern only.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    /// ULID から Id を作成
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    /// 内部の ULID を取得
    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

/// Error returned when a string is not a valid identifier.
#[derive(Debug, thiserror::Error)]
#[error("invalid identifier `{input}`: {source}")]
pub struct IdParseError {
    input: String,
    #[source]
    source: ulid::DecodeError,
}

impl<T: IdMarker> FromStr for Id<T> {
    type Err = IdParseError;

    /// Accepts both the display form (`task-01H...`) and the bare ULID.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix(T::prefix()).unwrap_or(s);
        Ulid::from_string(raw)
            .map(Self::from_ulid)
            .map_err(|source| IdParseError {
                input: s.to_string(),
                source,
            })
    }
}

// ========================================
// マーカー型の定義
// ========================================

/// Project のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProjectMarker {}

impl IdMarker for ProjectMarker {
    fn prefix() -> &'static str {
        "project-"
    }
}

/// Task のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskMarker {}

impl IdMarker for TaskMarker {
    fn prefix() -> &'static str {
        "task-"
    }
}

/// Identifier of a Project.
pub type ProjectId = Id<ProjectMarker>;

/// Identifier of a Task.
pub type TaskId = Id<TaskMarker>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_types() {
        let ulid1 = Ulid::new();
        let ulid2 = Ulid::new();

        let project = ProjectId::from_ulid(ulid1);
        let task = TaskId::from_ulid(ulid2);

        assert_eq!(project.as_ulid(), ulid1);
        assert_eq!(task.as_ulid(), ulid2);

        assert!(project.to_string().starts_with("project-"));
        assert!(task.to_string().starts_with("task-"));

        // let _: ProjectId = task; // <- does not compile
    }

    #[test]
    fn ids_serialize_as_bare_ulid() {
        let ulid = Ulid::new();
        let task_id = TaskId::from_ulid(ulid);

        let serialized = serde_json::to_string(&task_id).unwrap();
        assert_eq!(serialized, format!("\"{ulid}\""));

        let deserialized: TaskId = serde_json::from_str(&serialized).unwrap();
        assert_eq!(task_id, deserialized);
    }

    #[test]
    fn parse_accepts_prefixed_and_bare_forms() {
        let project_id = ProjectId::from_ulid(Ulid::new());

        let from_display: ProjectId = project_id.to_string().parse().unwrap();
        let from_bare: ProjectId = project_id.as_ulid().to_string().parse().unwrap();

        assert_eq!(from_display, project_id);
        assert_eq!(from_bare, project_id);
    }

    #[test]
    fn parse_rejects_garbage() {
        let result: Result<TaskId, _> = "task-not-a-ulid".parse();
        assert!(result.is_err());
    }

    #[test]
    fn phantom_data_does_not_consume_memory() {
        use std::mem::size_of;

        assert_eq!(size_of::<ProjectId>(), size_of::<Ulid>());
        assert_eq!(size_of::<TaskId>(), size_of::<Ulid>());
    }
}
