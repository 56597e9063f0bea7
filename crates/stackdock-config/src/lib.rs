//! stackdock-config
//!
//! モジュールの発見と設定ファイルのスキャンを提供します。
//! .properties / application.yml から `DockerInclude` マーカー付きの
//! 設定値を取り込み、正規化したサービス定義を組み立てます。

pub mod discovery;
pub mod error;
pub mod keys;
pub mod properties;
pub mod scanner;
pub mod yaml;

// Re-exports
pub use discovery::{is_runnable_module, modules};
pub use error::{ConfigError, Result};
pub use keys::{format_environment_keys, format_property_key};
pub use properties::scan_properties_file;
pub use scanner::{ModuleScan, ModuleScanner, build_service, parse_volume_specs};
pub use yaml::scan_yaml_file;

/// 取り込み対象を示すマーカーコメント
pub const DOCKER_INCLUDE_MARKER: &str = "DockerInclude";

/// ポートとして常に取り込むプロパティキー
pub const SERVER_PORT_PROPERTY: &str = "server.port";
