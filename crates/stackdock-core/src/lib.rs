//! stackdock-core
//!
//! モジュールごとの設定から導出されたサービス定義を統合し、
//! docker-compose形式のドキュメントを生成するコア機能。
//!
//! パイプラインは「統合 → 共有ブロック生成 → サービスごとのレンダリング」
//! の一直線で、すべて同期的に実行されます。出力の順序は入力内容のみで
//! 決まり（ソート済み）、実行ごとに差分が出ることはありません。

pub mod compose;
pub mod consolidate;
pub mod database;
pub mod envfile;
pub mod error;
pub mod model;
pub mod render;

// Re-exports
pub use compose::ComposeDocument;
pub use consolidate::{
    EnvConsolidation, VolumeConsolidation, VolumeStrategy, consolidate_environment,
    consolidate_volumes,
};
pub use database::{render_database_compose, write_database_compose};
pub use envfile::{render_env_file, write_env_file};
pub use error::{ComposeError, Result};
pub use model::{ServiceDescriptor, VolumeMapping};
pub use render::{RenderOptions, service_entry};
