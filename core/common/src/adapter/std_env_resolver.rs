//! 標準環境変数解決実装（std::env を委譲）

use crate::domain::{HomeDir, RunDir};
use crate::error::Error;
use crate::ports::outbound::EnvResolver;
use std::env;
use std::path::PathBuf;

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// 標準環境変数解決実装
#[derive(Debug, Clone, Default)]
pub struct StdEnvResolver;

impl EnvResolver for StdEnvResolver {
    fn run_dir_from_env(&self) -> Option<RunDir> {
        non_empty_var("RUNKIT_RUN_DIR")
            .map(PathBuf::from)
            .map(RunDir::new)
    }

    fn resolve_home_dir(&self) -> Result<HomeDir, Error> {
        if let Some(home) = non_empty_var("RUNKIT_HOME") {
            return Ok(HomeDir::new(PathBuf::from(home)));
        }

        let state_base = non_empty_var("XDG_STATE_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                non_empty_var("HOME").map(|h| PathBuf::from(h).join(".local").join("state"))
            })
            .ok_or_else(|| Error::env("HOME is not set"))?;

        Ok(HomeDir::new(state_base.join("runkit")))
    }

    fn resolve_log_file_path(&self) -> Result<PathBuf, Error> {
        if let Some(path) = non_empty_var("RUNKIT_LOG_FILE") {
            return Ok(PathBuf::from(path));
        }
        Ok(self.resolve_home_dir()?.log_file_path())
    }
}
