use clap::builder::ArgAction;
use clap::error::ErrorKind;
use common::domain::RunDir;
use common::error::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// 省略時は RUNKIT_RUN_DIR
    pub run_dir: Option<RunDir>,
    pub repair: bool,
}

/// 解析結果: 通常の Config / ヘルプ表示
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    Help(String),
}

fn build_clap_command() -> clap::Command {
    clap::Command::new("journal-check")
        .about("Report journal/state consistency for a run directory")
        .arg(
            clap::Arg::new("run-dir")
                .long("run-dir")
                .value_name("dir")
                .help("Run directory (default: $RUNKIT_RUN_DIR)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("repair")
                .long("repair")
                .help("Advance a lagging nextEventId past the highest journal id before checking")
                .action(ArgAction::SetTrue),
        )
}

/// 引数イテレータから解析する（先頭はプログラム名）
pub fn parse_args_from<I, T>(args: I) -> Result<ParseOutcome, Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match build_clap_command().try_get_matches_from(args) {
        Ok(m) => Ok(ParseOutcome::Config(Config {
            run_dir: m.get_one::<String>("run-dir").map(RunDir::new),
            repair: m.get_flag("repair"),
        })),
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
