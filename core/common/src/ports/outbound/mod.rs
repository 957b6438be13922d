//! Outbound ポート: ジャーナル・ツールが外界（FS・時刻・ロック・環境変数・ログ）を使うための trait

pub mod clock;
pub mod env_resolver;
pub mod fs;
pub mod log;
pub mod run_lock;

pub use clock::{format_timestamp, Clock};
pub use env_resolver::EnvResolver;
pub use fs::{FileMetadata, FileSystem};
pub use log::{now_iso8601, Log, LogLevel, LogRecord};
pub use run_lock::{RunLock, RunLockGuard};
