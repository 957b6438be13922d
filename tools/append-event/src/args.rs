use clap::builder::ArgAction;
use clap::error::ErrorKind;
use common::domain::event::DEFAULT_EVENT_TYPE;
use common::domain::RunDir;
use common::error::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// 省略時は RUNKIT_RUN_DIR
    pub run_dir: Option<RunDir>,
    pub event: String,
    /// JSON として解釈できなければ {"raw": data} として記録される
    pub data: String,
    pub kind: String,
    pub timestamp: Option<String>,
    pub set_status: Option<String>,
}

/// 解析結果: 通常の Config / ヘルプ表示
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    Help(String),
}

fn build_clap_command() -> clap::Command {
    clap::Command::new("append-event")
        .about("Append one event to a run journal and advance the run's event counter")
        .arg(
            clap::Arg::new("run-dir")
                .long("run-dir")
                .value_name("dir")
                .help("Run directory holding state.json and journal.jsonl (default: $RUNKIT_RUN_DIR)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("event")
                .long("event")
                .value_name("name")
                .help("Event name")
                .required(true)
                .num_args(1),
        )
        .arg(
            clap::Arg::new("data")
                .long("data")
                .value_name("json")
                .help("Event payload; non-JSON text is recorded as {\"raw\": text}")
                .default_value("{}")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("type")
                .long("type")
                .value_name("type")
                .help("Event type")
                .default_value(DEFAULT_EVENT_TYPE)
                .num_args(1),
        )
        .arg(
            clap::Arg::new("timestamp")
                .long("timestamp")
                .value_name("iso8601")
                .help("Timestamp to record (default: current UTC time)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("set-status")
                .long("set-status")
                .value_name("status")
                .help("Replace the run status in state.json")
                .action(ArgAction::Set),
        )
}

fn matches_to_config(matches: &clap::ArgMatches) -> Config {
    let string = |id: &str| matches.get_one::<String>(id).cloned();
    // 前後空白のみの値は未指定扱い
    let non_blank = |id: &str| string(id).filter(|s| !s.trim().is_empty());
    Config {
        run_dir: string("run-dir").map(RunDir::new),
        event: string("event").unwrap_or_default(),
        data: string("data").unwrap_or_else(|| "{}".to_string()),
        kind: string("type").unwrap_or_else(|| DEFAULT_EVENT_TYPE.to_string()),
        timestamp: non_blank("timestamp").map(|s| s.trim().to_string()),
        set_status: non_blank("set-status"),
    }
}

/// 引数イテレータから解析する（先頭はプログラム名）
pub fn parse_args_from<I, T>(args: I) -> Result<ParseOutcome, Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match build_clap_command().try_get_matches_from(args) {
        Ok(matches) => Ok(ParseOutcome::Config(matches_to_config(&matches))),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            Ok(ParseOutcome::Help(e.to_string()))
        }
        Err(e) => Err(Error::invalid_argument(e.to_string())),
    }
}

/// コマンドラインを解析する
pub fn parse_args() -> Result<ParseOutcome, Error> {
    parse_args_from(std::env::args_os())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> Config {
        let mut argv = vec!["append-event"];
        argv.extend_from_slice(args);
        match parse_args_from(argv).unwrap() {
            ParseOutcome::Config(c) => c,
            ParseOutcome::Help(_) => panic!("unexpected help"),
        }
    }

    #[test]
    fn test_defaults() {
        let c = config(&["--run-dir", "/tmp/r", "--event", "start"]);
        assert_eq!(c.run_dir, Some(RunDir::new("/tmp/r")));
        assert_eq!(c.event, "start");
        assert_eq!(c.data, "{}");
        assert_eq!(c.kind, "event");
        assert!(c.timestamp.is_none());
        assert!(c.set_status.is_none());
    }

    #[test]
    fn test_all_flags() {
        let c = config(&[
            "--event",
            "done",
            "--data",
            "hello",
            "--type",
            "phase",
            "--timestamp",
            "2026-01-01T00:00:00Z",
            "--set-status",
            "finished",
        ]);
        assert!(c.run_dir.is_none());
        assert_eq!(c.data, "hello");
        assert_eq!(c.kind, "phase");
        assert_eq!(c.timestamp.as_deref(), Some("2026-01-01T00:00:00Z"));
        assert_eq!(c.set_status.as_deref(), Some("finished"));
    }

    #[test]
    fn test_blank_values_are_unset() {
        let c = config(&["--event", "x", "--timestamp", "  ", "--set-status", ""]);
        assert!(c.timestamp.is_none());
        assert!(c.set_status.is_none());
    }

    #[test]
    fn test_status_is_kept_as_given() {
        let c = config(&[
            "--event",
            "x",
            "--timestamp",
            " 2026-01-01T00:00:00Z ",
            "--set-status",
            " done ",
        ]);
        assert_eq!(c.timestamp.as_deref(), Some("2026-01-01T00:00:00Z"));
        assert_eq!(c.set_status.as_deref(), Some(" done "));
    }

    #[test]
    fn test_missing_event_is_usage_error() {
        let err = parse_args_from(["append-event", "--run-dir", "/tmp/r"]).unwrap_err();
        assert!(err.is_usage());
        assert_eq!(err.exit_code(), 64);
    }

    #[test]
    fn test_help() {
        let outcome = parse_args_from(["append-event", "--help"]).unwrap();
        assert!(matches!(outcome, ParseOutcome::Help(ref s) if s.contains("--set-status")));
    }
}
