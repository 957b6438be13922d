//! 環境変数解決 Outbound ポート
//!
//! run ディレクトリ・ホームディレクトリ・ログパスを環境変数から解決する。
//! ツールはこの trait 経由でのみ環境変数にアクセスする。

use crate::domain::{HomeDir, RunDir};
use crate::error::Error;
use std::path::PathBuf;

/// 環境変数解決抽象（Outbound ポート）
///
/// 実装は `common::adapter::StdEnvResolver` など。
pub trait EnvResolver: Send + Sync {
    /// `--run-dir` 省略時の run ディレクトリを環境変数 RUNKIT_RUN_DIR から取得
    fn run_dir_from_env(&self) -> Option<RunDir>;

    /// ホームディレクトリを環境変数から解決する
    ///
    /// 優先順位:
    /// 1. RUNKIT_HOME（設定されていれば）
    /// 2. $XDG_STATE_HOME/runkit（XDG_STATE_HOME が設定されていれば）
    /// 3. $HOME/.local/state/runkit
    fn resolve_home_dir(&self) -> Result<HomeDir, Error>;

    /// 診断ログの出力先
    ///
    /// RUNKIT_LOG_FILE があればそれ、なければ resolve_home_dir() 配下の log/runkit.jsonl
    fn resolve_log_file_path(&self) -> Result<PathBuf, Error>;
}
