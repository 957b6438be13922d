//! run ディレクトリ単位の排他ロック Outbound ポート
//!
//! state.json の読み込みから書き戻しまでをこのロックの内側で行い、
//! 同一 run への並行追記で ID が重複・巻き戻らないようにする。

use crate::domain::RunDir;
use crate::error::Error;

/// 取得済みロック。drop で解放される。
pub struct RunLockGuard {
    _held: Box<dyn Send>,
}

impl RunLockGuard {
    pub fn new(held: impl Send + 'static) -> Self {
        Self {
            _held: Box::new(held),
        }
    }
}

impl std::fmt::Debug for RunLockGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RunLockGuard")
    }
}

/// run ディレクトリの排他ロック抽象（Outbound ポート）
///
/// 実装は `common::adapter::FlockRunLock`（flock によるアドバイザリロック）など。
pub trait RunLock: Send + Sync {
    /// 排他ロックを取得するまでブロックする
    fn acquire(&self, run_dir: &RunDir) -> Result<RunLockGuard, Error>;
}
