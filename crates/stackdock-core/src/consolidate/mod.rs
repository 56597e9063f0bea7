//! 統合エンジン
//!
//! 複数サービスに共通する設定値（環境変数・ボリューム）を検出し、
//! 共通定義と残余フィールドを持つ新しいサービス値を返します。
//! いずれもビルドプロファイルごとに一度だけ、同期的に実行されます。

mod environment;
mod volume;

// Re-exports
pub use environment::*;
pub use volume::*;
