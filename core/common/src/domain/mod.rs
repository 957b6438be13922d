//! ドメイン型（Newtype）
//!
//! String / PathBuf を直接運ばず、意味のある型に包んで境界を明確にする。

pub mod event;
pub mod state;

use std::path::{Path, PathBuf};

pub use event::{EventId, JournalEntry, NewEvent};
pub use state::RunState;

/// run ディレクトリ内の状態ファイル名
pub const STATE_FILENAME: &str = "state.json";
/// run ディレクトリ内のジャーナルファイル名
pub const JOURNAL_FILENAME: &str = "journal.jsonl";
/// run ディレクトリ内のアドバイザリロック用ファイル名
pub const LOCK_FILENAME: &str = ".lock";

/// 1 回のオーケストレーション run の状態とジャーナルを持つディレクトリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDir(PathBuf);

impl RunDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn state_path(&self) -> PathBuf {
        self.0.join(STATE_FILENAME)
    }

    pub fn journal_path(&self) -> PathBuf {
        self.0.join(JOURNAL_FILENAME)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.0.join(LOCK_FILENAME)
    }
}

impl std::ops::Deref for RunDir {
    type Target = PathBuf;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for RunDir {
    fn as_ref(&self) -> &Path {
        self.0.as_ref()
    }
}

/// ホームディレクトリのパス（診断ログの置き場）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeDir(PathBuf);

impl HomeDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// 既定の診断ログファイル
    pub fn log_file_path(&self) -> PathBuf {
        self.0.join("log").join("runkit.jsonl")
    }
}

impl std::ops::Deref for HomeDir {
    type Target = PathBuf;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for HomeDir {
    fn as_ref(&self) -> &Path {
        self.0.as_ref()
    }
}
