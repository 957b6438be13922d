//! プロンプトテンプレートの描画
//!
//! `{{task}}` と `{{context}}` の 2 つのリテラルトークンだけを置換する。

use crate::error::Error;
use crate::ports::outbound::FileSystem;
use serde_json::Value;
use std::path::Path;

pub const TASK_TOKEN: &str = "{{task}}";
pub const CONTEXT_TOKEN: &str = "{{context}}";

/// コンテキスト JSON の取得元。ファイル指定が JSON 文字列指定より優先される。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextSource {
    pub file: Option<std::path::PathBuf>,
    pub json: Option<String>,
}

impl ContextSource {
    /// どちらも無ければ空オブジェクト
    pub fn load(&self, fs: &dyn FileSystem) -> Result<Value, Error> {
        if let Some(path) = &self.file {
            let text = fs.read_to_string(path)?;
            let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
            return parse_context(text, Some(path.as_path()));
        }
        match &self.json {
            Some(s) => parse_context(s, None),
            None => Ok(Value::Object(serde_json::Map::new())),
        }
    }
}

fn parse_context(s: &str, path: Option<&Path>) -> Result<Value, Error> {
    serde_json::from_str(s).map_err(|e| match path {
        Some(p) => Error::json(format!("invalid context in '{}': {}", p.display(), e)),
        None => Error::json(format!("invalid --context-json: {}", e)),
    })
}

/// task → context の順に置換する。context は 2 スペースインデントで展開する。
pub fn render(template: &str, task: &str, context: &Value) -> Result<String, Error> {
    let context = serde_json::to_string_pretty(context)?;
    Ok(template
        .replace(TASK_TOKEN, task)
        .replace(CONTEXT_TOKEN, &context))
}
