//! ツール実行のライフサイクルログ
//!
//! 各ツールの `run` を包み、command started / command finished / error を Log に書く。
//! ログの失敗は終了コードに影響させない。

use crate::error::Error;
use crate::ports::outbound::{Log, LogLevel, LogRecord};

/// `f` を実行し、前後のライフサイクルを記録して結果をそのまま返す
pub fn run_logged<F>(log: &dyn Log, command: &str, f: F) -> Result<i32, Error>
where
    F: FnOnce() -> Result<i32, Error>,
{
    let _ = log.log(
        &LogRecord::new(LogLevel::Info, "command started")
            .layer("cli")
            .kind("lifecycle")
            .field("command", command),
    );
    let result = f();
    let code = match &result {
        Ok(code) => *code,
        Err(e) => e.exit_code(),
    };
    let _ = log.log(
        &LogRecord::new(LogLevel::Info, "command finished")
            .layer("cli")
            .kind("lifecycle")
            .field("command", command)
            .field("exit_code", code),
    );
    if let Err(ref e) = result {
        let _ = log.log(
            &LogRecord::new(LogLevel::Error, e.to_string())
                .layer("cli")
                .kind("error")
                .field("command", command),
        );
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryLog(Mutex<Vec<LogRecord>>);

    impl Log for MemoryLog {
        fn log(&self, record: &LogRecord) -> Result<(), Error> {
            self.0.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    struct FailingLog;

    impl Log for FailingLog {
        fn log(&self, _record: &LogRecord) -> Result<(), Error> {
            Err(Error::io_msg("disk full"))
        }
    }

    #[test]
    fn success_logs_start_and_finish() {
        let log = MemoryLog::default();
        assert_eq!(run_logged(&log, "append-event", || Ok(0)).unwrap(), 0);
        let records = log.0.lock().unwrap();
        let messages: Vec<&str> = records.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, vec!["command started", "command finished"]);
        let fields = records[1].fields.as_ref().unwrap();
        assert_eq!(fields["exit_code"], serde_json::json!(0));
    }

    #[test]
    fn failure_logs_error_and_passes_it_through() {
        let log = MemoryLog::default();
        let err = run_logged(&log, "extract-first-json", || Err(Error::NoJsonFound)).unwrap_err();
        assert!(matches!(err, Error::NoJsonFound));
        let records = log.0.lock().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].fields.as_ref().unwrap()["exit_code"], serde_json::json!(1));
        assert_eq!(records[2].level, LogLevel::Error);
        assert_eq!(records[2].message, "no JSON found");
    }

    #[test]
    fn log_failure_does_not_change_result() {
        assert_eq!(run_logged(&FailingLog, "render-prompt", || Ok(0)).unwrap(), 0);
    }
}
