//! アダプター（外界の I/O を trait で抽象化）
//!
//! journal・ツールは ports::outbound の trait 経由でのみファイル・時刻・ロック・環境変数に触れる。
//! ここにはその標準実装（Std*）とログ実装を置く。

pub mod file_json_log;
pub mod flock_run_lock;
pub mod std_clock;
pub mod std_env_resolver;
pub mod std_fs;

pub use file_json_log::{logger_from_env, FileJsonLog, NoopLog};
pub use flock_run_lock::FlockRunLock;
pub use std_clock::{FixedClock, StdClock};
pub use std_env_resolver::StdEnvResolver;
pub use std_fs::StdFileSystem;
