//! tasklane-core
//!
//! Projects, tasks and the rules that tie them together.
//!
//! # モジュール構成
//! - **domain**: エンティティ、ドメインイベント、ドメインサービス、エラー
//! - **ports**: 抽象化レイヤー（ProjectRepository, TaskRepository, Clock, IdGenerator）
//! - **impls**: ports の実装（InMemory / SQLite）
//! - **app**: ユースケース、イベントハンドラ、AppBuilder
//! - **config**: 設定の読み込み（既定値 → TOML → 環境変数）
//! - **observability**: tracing の初期化

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod observability;
pub mod ports;
