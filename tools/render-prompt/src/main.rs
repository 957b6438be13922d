mod args;

use std::process;
use std::sync::Arc;

use args::{parse_args, Config, ParseOutcome};
use common::adapter::{logger_from_env, StdEnvResolver, StdFileSystem};
use common::error::Error;
use common::lifecycle::run_logged;
use common::ports::outbound::FileSystem;
use common::template::render;

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("render-prompt: {}", e);
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
    let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
    let logger = logger_from_env(&StdEnvResolver, Arc::clone(&fs));
    run_logged(logger.as_ref(), "render-prompt", || execute(fs.as_ref(), &config))
}

fn execute(fs: &dyn FileSystem, config: &Config) -> Result<i32, Error> {
    let template = fs.read_to_string(&config.template)?;
    let context = config.context.load(fs)?;
    let rendered = render(&template, &config.task, &context)?;
    if let Some(parent) = config.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs.create_dir_all(parent)?;
    }
    fs.write(&config.output, &rendered)?;
    Ok(0)
}

fn print_usage() {
    eprintln!("Usage: render-prompt --template <file> --out <file> [--task <text>] [--context-json <json>] [--context-file <file>]");
}
