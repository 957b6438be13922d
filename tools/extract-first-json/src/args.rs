use clap::error::ErrorKind;
use common::error::Error;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// 解析結果: 通常の Config / ヘルプ表示
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    Help(String),
}

fn build_clap_command() -> clap::Command {
    clap::Command::new("extract-first-json")
        .about("Extract the first well-formed JSON value embedded in a text file")
        .arg(
            clap::Arg::new("in")
                .long("in")
                .value_name("file")
                .help("Input text (UTF-8, UTF-8 with BOM, or UTF-16 with BOM)")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("out")
                .long("out")
                .value_name("file")
                .help("Where to write the extracted JSON (pretty-printed)")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .num_args(1),
        )
}

/// 引数イテレータから解析する（先頭はプログラム名）
pub fn parse_args_from<I, T>(args: I) -> Result<ParseOutcome, Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = match build_clap_command().try_get_matches_from(args) {
        Ok(m) => m,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            return Ok(ParseOutcome::Help(e.to_string()));
        }
        Err(e) => return Err(Error::invalid_argument(e.to_string())),
    };
    let path = |id: &str| matches.get_one::<PathBuf>(id).cloned().unwrap_or_default();
    Ok(ParseOutcome::Config(Config {
        input: path("in"),
        output: path("out"),
    }))
}

/// コマンドラインを解析する
pub fn parse_args() -> Result<ParseOutcome, Error> {
    parse_args_from(std::env::args_os())
}
