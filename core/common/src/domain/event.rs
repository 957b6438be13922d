//! ジャーナルイベントドメイン
//!
//! 呼び出し側が作る `NewEvent` と、journal.jsonl の 1 行に対応する `JournalEntry` を定義する。

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 既定のイベント種別
pub const DEFAULT_EVENT_TYPE: &str = "event";

/// イベント ID（1 始まりの連番）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventId(u64);

impl EventId {
    pub const FIRST: EventId = EventId(1);

    /// 0 は ID として無効
    pub fn new(n: u64) -> Option<Self> {
        (n > 0).then_some(Self(n))
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// u64 を使い切った場合は None
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    /// ジャーナル上の文字列表現（"1", "2", ...）を解釈する
    pub fn parse(s: &str) -> Option<Self> {
        s.parse::<u64>().ok().and_then(Self::new)
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// journal.jsonl の 1 行（キー順はこの定義順で直列化される）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// RFC3339 UTC（末尾 Z）
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// 連番の文字列表現
    pub id: String,
    pub event: String,
    pub data: Value,
}

impl JournalEntry {
    pub fn event_id(&self) -> Option<EventId> {
        EventId::parse(&self.id)
    }
}

/// 追記要求（ID・時刻は未確定）
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub event: String,
    /// 生の data 引数。JSON として解釈できなければ {"raw": data} に包む
    pub data: String,
    pub kind: String,
    /// 未指定なら Clock の現在時刻
    pub timestamp: Option<String>,
    /// 指定時のみ state の status を置き換える
    pub set_status: Option<String>,
}

impl NewEvent {
    pub fn new(event: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            data: data.into(),
            kind: DEFAULT_EVENT_TYPE.to_string(),
            timestamp: None,
            set_status: None,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_timestamp(mut self, ts: impl Into<String>) -> Self {
        self.timestamp = Some(ts.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.set_status = Some(status.into());
        self
    }
}

/// data 引数を JSON として解釈する。失敗時はエラーにせず {"raw": data} に包む。
pub fn parse_event_data(data: &str) -> Value {
    serde_json::from_str(data).unwrap_or_else(|_| serde_json::json!({ "raw": data }))
}
