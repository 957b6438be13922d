mod args;
mod wiring;

use std::process;

use args::{parse_args, Config, ParseOutcome};
use common::error::Error;
use common::journal::JournalReport;
use common::lifecycle::run_logged;
use wiring::{wire_journal_check, App};

/// 不整合があったときの終了コード
const EXIT_INCONSISTENT: i32 = 1;

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("journal-check: {}", e);
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

pub fn run() -> Result<i32, Error> {
    let config = match parse_args()? {
        ParseOutcome::Config(c) => c,
        ParseOutcome::Help(text) => {
            print!("{}", text);
            return Ok(0);
        }
    };
    let app = wire_journal_check();
    run_logged(app.logger.as_ref(), "journal-check", || {
        let report = execute(&app, config)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(exit_code_for(&report))
    })
}

fn execute(app: &App, config: Config) -> Result<JournalReport, Error> {
    let run_dir = config
        .run_dir
        .or_else(|| app.env_resolver.run_dir_from_env())
        .ok_or_else(|| Error::invalid_argument("--run-dir is required (or set RUNKIT_RUN_DIR)"))?;
    if config.repair {
        if let Some(state) = app.journal.repair_state(&run_dir)? {
            eprintln!("journal-check: nextEventId advanced to {}", state.next_event_id);
        }
    }
    app.journal.check_journal(&run_dir)
}

fn exit_code_for(report: &JournalReport) -> i32 {
    if report.is_consistent() {
        0
    } else {
        EXIT_INCONSISTENT
    }
}

fn print_usage() {
    eprintln!("Usage: journal-check [--run-dir <dir>] [--repair]");
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::adapter::{FixedClock, FlockRunLock, NoopLog, StdFileSystem};
    use common::domain::{HomeDir, RunDir};
    use common::journal::EventJournal;
    use common::ports::outbound::EnvResolver;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    struct NoEnv;

    impl EnvResolver for NoEnv {
        fn run_dir_from_env(&self) -> Option<RunDir> {
            None
        }
        fn resolve_home_dir(&self) -> Result<HomeDir, Error> {
            Err(Error::env("unset"))
        }
        fn resolve_log_file_path(&self) -> Result<PathBuf, Error> {
            Err(Error::env("unset"))
        }
    }

    fn test_app() -> App {
        App {
            env_resolver: Arc::new(NoEnv),
            journal: EventJournal::new(
                Arc::new(StdFileSystem),
                Arc::new(FixedClock("2026-03-01T09:30:00Z".parse().unwrap())),
                Arc::new(FlockRunLock),
                Arc::new(NoopLog),
            ),
            logger: Arc::new(NoopLog),
        }
    }

    fn lagging_run(dir: &Path) {
        std::fs::write(dir.join("state.json"), "{\"nextEventId\": 2}\n").unwrap();
        let line = |id: u64| {
            format!(
                "{{\"timestamp\":\"2026-03-01T09:30:00.000000Z\",\"type\":\"event\",\"id\":\"{id}\",\"event\":\"e\",\"data\":{{}}}}\n"
            )
        };
        std::fs::write(dir.join("journal.jsonl"), format!("{}{}", line(1), line(2))).unwrap();
    }

    #[test]
    fn reports_lagging_counter() {
        let tmp = tempfile::tempdir().unwrap();
        lagging_run(tmp.path());
        let config = Config {
            run_dir: Some(RunDir::new(tmp.path())),
            repair: false,
        };
        let report = execute(&test_app(), config).unwrap();
        assert!(report.counter_lags);
        assert_eq!(report.max_id, Some(2));
        assert_eq!(exit_code_for(&report), EXIT_INCONSISTENT);
    }

    #[test]
    fn repair_makes_run_consistent() {
        let tmp = tempfile::tempdir().unwrap();
        lagging_run(tmp.path());
        let config = Config {
            run_dir: Some(RunDir::new(tmp.path())),
            repair: true,
        };
        let report = execute(&test_app(), config).unwrap();
        assert_eq!(report.next_event_id, 3);
        assert_eq!(exit_code_for(&report), 0);
        let state = std::fs::read_to_string(tmp.path().join("state.json")).unwrap();
        assert!(state.contains("\"nextEventId\": 3"));
    }

    #[test]
    fn missing_run_dir_is_usage_error() {
        let config = Config {
            run_dir: None,
            repair: false,
        };
        assert!(execute(&test_app(), config).unwrap_err().is_usage());
    }
}
