//! 標準時刻実装（chrono::Utc を委譲）と固定時刻実装

use crate::ports::outbound::Clock;
use chrono::{DateTime, Utc};

/// システム時刻を使う Clock 実装
#[derive(Debug, Clone, Default)]
pub struct StdClock;

impl Clock for StdClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 常に同じ時刻を返す Clock 実装（テスト・再現実行用）
#[derive(Debug, Clone)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
