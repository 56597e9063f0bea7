//! モデル定義
//!
//! stackdockで使用されるデータモデルを定義します。
//! いずれも構造的等価性を持つ値オブジェクトで、振る舞いは持ちません。

mod service;
mod volume;

// Re-exports
pub use service::*;
pub use volume::*;
