mod args;

use std::process;
use std::sync::Arc;

use args::{parse_args, Config, ParseOutcome};
use common::adapter::{logger_from_env, StdEnvResolver, StdFileSystem};
use common::error::Error;
use common::json_extract::extract_first_json;
use common::lifecycle::run_logged;
use common::ports::outbound::FileSystem;

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("extract-first-json: {}", e);
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
    run_logged(logger.as_ref(), "extract-first-json", || {
        execute(fs.as_ref(), &config)
    })
}

/// 入力を読み、最初の JSON 値を整形して書き出す
fn execute(fs: &dyn FileSystem, config: &Config) -> Result<i32, Error> {
    let bytes = fs.read(&config.input)?;
    let value = extract_first_json(&bytes)?;
    let mut out = serde_json::to_string_pretty(&value)?;
    out.push('\n');
    if let Some(parent) = config.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs.create_dir_all(parent)?;
    }
    fs.write(&config.output, &out)?;
    Ok(0)
}

fn print_usage() {
    eprintln!("Usage: extract-first-json --in <file> --out <file>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn run_on(input: &[u8]) -> (tempfile::TempDir, Result<i32, Error>) {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config {
            input: tmp.path().join("raw.txt"),
            output: tmp.path().join("parsed").join("out.json"),
        };
        std::fs::write(&config.input, input).unwrap();
        let result = execute(&StdFileSystem, &config);
        (tmp, result)
    }

    #[test]
    fn writes_pretty_json_with_trailing_newline() {
        let (tmp, result) = run_on(b"The plan is: {\"steps\":[\"a\",\"b\"]} -- end {\"x\":1}");
        assert_eq!(result.unwrap(), 0);
        let out = std::fs::read_to_string(tmp.path().join("parsed").join("out.json")).unwrap();
        assert_eq!(out, "{\n  \"steps\": [\n    \"a\",\n    \"b\"\n  ]\n}\n");
    }

    #[test]
    fn output_keeps_key_order_and_big_integers() {
        let (tmp, result) = run_on(b"-> {\"zeta\":1,\"alpha\":123456789012345678901234567890}");
        assert_eq!(result.unwrap(), 0);
        let out = std::fs::read_to_string(tmp.path().join("parsed").join("out.json")).unwrap();
        assert_eq!(
            out,
            "{\n  \"zeta\": 1,\n  \"alpha\": 123456789012345678901234567890\n}\n"
        );
    }

    #[test]
    fn utf16_input_is_decoded() {
        let mut bytes = vec![0xFF, 0xFE];
        for u in "answer: [1, 2, 3]".encode_utf16() {
            bytes.extend_from_slice(&u.to_le_bytes());
        }
        let (tmp, result) = run_on(&bytes);
        assert_eq!(result.unwrap(), 0);
        let out: Value = serde_json::from_str(
            &std::fs::read_to_string(tmp.path().join("parsed").join("out.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(out, json!([1, 2, 3]));
    }

    #[test]
    fn no_json_fails_and_writes_nothing() {
        let (tmp, result) = run_on(b"I could not produce an answer.");
        let err = result.unwrap_err();
        assert!(matches!(err, Error::NoJsonFound));
        assert_eq!(err.exit_code(), 1);
        assert!(!tmp.path().join("parsed").join("out.json").exists());
    }

    #[test]
    fn missing_input_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config {
            input: tmp.path().join("absent.txt"),
            output: tmp.path().join("out.json"),
        };
        let err = execute(&StdFileSystem, &config).unwrap_err();
        assert_eq!(err.exit_code(), 74);
    }
}
