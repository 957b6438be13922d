//! run の状態（state.json）

use super::event::EventId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const NEXT_EVENT_ID_KEY: &str = "nextEventId";
pub const STATUS_KEY: &str = "status";

/// state.json のスキーマ
///
/// 読み込んだオブジェクトをキー順ごと `fields` に保持し、書き戻し時は
/// `nextEventId` と（指定があれば）`status` だけを置き換える。
/// status の型は問わない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct RunState {
    pub next_event_id: u64,
    fields: Map<String, Value>,
}

impl RunState {
    pub fn new() -> Self {
        Self {
            next_event_id: EventId::FIRST.get(),
            fields: Map::new(),
        }
    }

    /// 次に割り当てる ID。0 は不正な状態。
    pub fn next_id(&self) -> Option<EventId> {
        EventId::new(self.next_event_id)
    }

    pub fn status(&self) -> Option<&Value> {
        self.fields.get(STATUS_KEY)
    }

    /// `nextEventId` を `next` に置き換えた状態
    pub fn with_next_id(&self, next: EventId) -> Self {
        Self {
            next_event_id: next.get(),
            fields: self.fields.clone(),
        }
    }

    /// `id` を使い切った後の状態。status は指定があれば置き換え、なければ維持する。
    ///
    /// `id` が u64 の最大値なら None。
    pub fn advanced(&self, id: EventId, set_status: Option<String>) -> Option<Self> {
        let mut next = self.with_next_id(id.next()?);
        if let Some(status) = set_status {
            next.fields.insert(STATUS_KEY.to_string(), Value::String(status));
        }
        Some(next)
    }

    /// 2 スペースインデント + 末尾改行
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        let mut s = serde_json::to_string_pretty(self)?;
        s.push('\n');
        Ok(s)
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<Map<String, Value>> for RunState {
    type Error = String;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let next_event_id = fields
            .get(NEXT_EVENT_ID_KEY)
            .ok_or_else(|| format!("missing {}", NEXT_EVENT_ID_KEY))?
            .as_u64()
            .ok_or_else(|| format!("{} must be a non-negative integer", NEXT_EVENT_ID_KEY))?;
        Ok(Self {
            next_event_id,
            fields,
        })
    }
}

impl From<RunState> for Map<String, Value> {
    fn from(state: RunState) -> Self {
        let mut fields = state.fields;
        // 既存キーなら位置を保ったまま値だけ置き換わる
        fields.insert(
            NEXT_EVENT_ID_KEY.to_string(),
            Value::from(state.next_event_id),
        );
        fields
    }
}
