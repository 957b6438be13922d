//! 時刻 Outbound ポート
//!
//! ジャーナルのタイムスタンプはこの trait 経由で取得し、テストでは固定時刻を注入する。

use chrono::{DateTime, SecondsFormat, Utc};

/// 時刻取得の抽象
///
/// 実装は `common::adapter::StdClock` やテスト用の固定時刻など。
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// ジャーナル用の ISO8601 表記（マイクロ秒・末尾は常に `Z`）
pub fn format_timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}
