//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 各 trait はストレージや時刻への境界で、実装の詳細を隠蔽します。
//!
//! # 設計原則
//! - ドメインはここで定義された trait にだけ依存する
//! - インフラ障害は `RepositoryError` として返し、ドメインエラーと混ぜない

pub mod clock;
pub mod id_generator;
pub mod project_repository;
pub mod repository;
pub mod task_repository;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::project_repository::ProjectRepository;
pub use self::repository::{BoxError, RepoResult, RepositoryError};
pub use self::task_repository::TaskRepository;
