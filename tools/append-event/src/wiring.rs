//! 配線: 標準アダプタで EventJournal を組み立てる

use std::sync::Arc;

use common::adapter::{logger_from_env, FlockRunLock, StdClock, StdEnvResolver, StdFileSystem};
use common::journal::EventJournal;
use common::ports::outbound::{EnvResolver, FileSystem, Log};

/// 配線で組み立てたポート群
pub struct App {
    pub env_resolver: Arc<dyn EnvResolver>,
    pub journal: EventJournal,
    /// 構造化ログ（ファイルへ JSONL）。エラー時のコンソール表示とは別。
    pub logger: Arc<dyn Log>,
}

pub fn wire_append_event() -> App {
    let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
    let env_resolver: Arc<dyn EnvResolver> = Arc::new(StdEnvResolver);
    let logger = logger_from_env(env_resolver.as_ref(), Arc::clone(&fs));
    let journal = EventJournal::new(
        fs,
        Arc::new(StdClock),
        Arc::new(FlockRunLock),
        Arc::clone(&logger),
    );
    App {
        env_resolver,
        journal,
        logger,
    }
}
