use clap::error::ErrorKind;
use common::error::Error;
use common::template::ContextSource;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub template: PathBuf,
    pub output: PathBuf,
    pub task: String,
    /// --context-file が --context-json より優先される
    pub context: ContextSource,
}

/// 解析結果: 通常の Config / ヘルプ表示
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    Help(String),
}

fn build_clap_command() -> clap::Command {
    clap::Command::new("render-prompt")
        .about("Render a prompt template by substituting {{task}} and {{context}}")
        .arg(
            clap::Arg::new("template")
                .long("template")
                .value_name("file")
                .help("Template file")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("out")
                .long("out")
                .value_name("file")
                .help("Where to write the rendered prompt")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("task")
                .long("task")
                .value_name("text")
                .help("Replaces {{task}} (default: empty)")
                .default_value("")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("context-json")
                .long("context-json")
                .value_name("json")
                .help("Context JSON that replaces {{context}} (pretty-printed)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("context-file")
                .long("context-file")
                .value_name("file")
                .help("Read context JSON from a file; takes priority over --context-json")
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
    let path = |id: &str| matches.get_one::<PathBuf>(id).cloned();
    Ok(ParseOutcome::Config(Config {
        template: path("template").unwrap_or_default(),
        output: path("out").unwrap_or_default(),
        task: matches.get_one::<String>("task").cloned().unwrap_or_default(),
        context: ContextSource {
            file: path("context-file"),
            json: matches.get_one::<String>("context-json").cloned(),
        },
    }))
}

/// コマンドラインを解析する
pub fn parse_args() -> Result<ParseOutcome, Error> {
    parse_args_from(std::env::args_os())
}
