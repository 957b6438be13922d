//! エラーハンドリング
//!
//! 全ツール共通のエラー型。各バリアントは sysexits 風の終了コードに対応する。

use std::path::{Path, PathBuf};

/// 終了コード: 抽出失敗（JSON が見つからない）
pub const EXIT_NOT_FOUND: i32 = 1;
/// 終了コード: 引数不正（EX_USAGE）
pub const EXIT_USAGE: i32 = 64;
/// 終了コード: 入力データ不正（EX_DATAERR）
pub const EXIT_DATA: i32 = 65;
/// 終了コード: I/O エラー（EX_IOERR）
pub const EXIT_IO: i32 = 74;
/// 終了コード: ロック取得失敗（EX_TEMPFAIL）
pub const EXIT_LOCK: i32 = 75;
/// 終了コード: 環境不備（EX_CONFIG）
pub const EXIT_CONFIG: i32 = 78;

/// エラー型
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// CLI 引数が不正
    #[error("{0}")]
    InvalidArgument(String),
    /// state.json が存在しない・パースできない・nextEventId を持たない
    #[error("malformed state '{}': {reason}", path.display())]
    MalformedState { path: PathBuf, reason: String },
    /// 入力中に JSON が見つからない
    #[error("no JSON found")]
    NoJsonFound,
    #[error("JSON error: {0}")]
    Json(String),
    #[error("{0}")]
    Io(String),
    #[error("{0}")]
    Lock(String),
    #[error("{0}")]
    Env(String),
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub fn malformed_state(path: &Path, reason: impl Into<String>) -> Self {
        Error::MalformedState {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn json(msg: impl Into<String>) -> Self {
        Error::Json(msg.into())
    }

    pub fn io_msg(msg: impl Into<String>) -> Self {
        Error::Io(msg.into())
    }

    pub fn lock(msg: impl Into<String>) -> Self {
        Error::Lock(msg.into())
    }

    pub fn env(msg: impl Into<String>) -> Self {
        Error::Env(msg.into())
    }

    /// プロセス終了コード
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidArgument(_) => EXIT_USAGE,
            Error::MalformedState { .. } | Error::Json(_) => EXIT_DATA,
            Error::NoJsonFound => EXIT_NOT_FOUND,
            Error::Io(_) => EXIT_IO,
            Error::Lock(_) => EXIT_LOCK,
            Error::Env(_) => EXIT_CONFIG,
        }
    }

    /// 使い方を表示すべきエラーか
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e.to_string())
    }
}
