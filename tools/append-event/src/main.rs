mod args;
mod wiring;

use std::process;

use args::{parse_args, Config, ParseOutcome};
use common::domain::NewEvent;
use common::error::Error;
use common::lifecycle::run_logged;
use wiring::{wire_append_event, App};

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("append-event: {}", e);
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
    let app = wire_append_event();
    run_logged(app.logger.as_ref(), "append-event", || execute(&app, config))
}

fn execute(app: &App, config: Config) -> Result<i32, Error> {
    let run_dir = config
        .run_dir
        .or_else(|| app.env_resolver.run_dir_from_env())
        .ok_or_else(|| Error::invalid_argument("--run-dir is required (or set RUNKIT_RUN_DIR)"))?;
    let mut event = NewEvent::new(config.event, config.data).with_kind(config.kind);
    event.timestamp = config.timestamp;
    event.set_status = config.set_status;
    app.journal.append_event(&run_dir, &event)?;
    Ok(0)
}

fn print_usage() {
    eprintln!("Usage: append-event --run-dir <dir> --event <name> [--data <json>] [--type <type>] [--timestamp <iso8601>] [--set-status <status>]");
}
