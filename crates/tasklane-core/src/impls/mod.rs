//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemoryProjectRepository / InMemoryTaskRepository**: 開発・テスト用
//! - **SqliteProjectRepository / SqliteTaskRepository**: sqlx による永続化

pub mod inmem_repository;
pub mod sqlite_repository;

// 主要な型を再エクスポート
pub use self::inmem_repository::{InMemoryProjectRepository, InMemoryTaskRepository};
pub use self::sqlite_repository::{
    SqliteProjectRepository, SqliteTaskRepository, connect, connect_in_memory,
};
