use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("親pom.xmlが見つかりません: {0}")]
    ParentPomNotFound(PathBuf),

    #[error("ファイル読み込みエラー: {path}\n理由: {message}")]
    Io { path: PathBuf, message: String },

    #[error("YAMLパースエラー: {path}\n理由: {message}")]
    YamlParse { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
