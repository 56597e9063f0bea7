use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("ファイル書き込みエラー: {path}\n理由: {message}")]
    Io { path: PathBuf, message: String },

    #[error("サービスが見つかりません: {0}")]
    ServiceNotFound(String),
}

pub type Result<T> = std::result::Result<T, ComposeError>;
