//! run ディレクトリのイベントジャーナル（journal.jsonl への append-only 記録）と state.json の連番管理
//!
//! 1 イベント = 1 行 JSON（末尾 \n）。追記は fsync してから state.json を原子的に書き戻す。
//! state.json の読み込みから書き戻しまでは RunLock の内側で行う。
//! 追記後・書き戻し前に中断された場合 state は journal より遅れるため、
//! 採番時は journal 上の最大 ID と突き合わせて重複を避ける。

use crate::domain::event::parse_event_data;
use crate::domain::{EventId, JournalEntry, NewEvent, RunDir, RunState};
use crate::error::Error;
use crate::ports::outbound::{
    format_timestamp, Clock, FileSystem, Log, LogLevel, LogRecord, RunLock,
};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

/// journal.jsonl を 1 回読んだ結果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JournalScan {
    pub entries: Vec<JournalEntry>,
    /// 最後の完全な行の ID
    pub last_id: Option<EventId>,
    pub max_id: Option<EventId>,
    pub duplicate_ids: Vec<u64>,
    /// 直前の ID 以下で現れた ID
    pub out_of_order_ids: Vec<u64>,
    /// パースできなかった行（途中で切れた行を含む）
    pub unreadable_lines: usize,
    /// 末尾が改行で終わっていない（書き込み途中で中断された）
    pub torn_tail: bool,
}

impl JournalScan {
    pub fn parse(content: &str) -> Self {
        let mut scan = JournalScan {
            torn_tail: !content.is_empty() && !content.ends_with('\n'),
            ..Default::default()
        };
        let mut seen = BTreeSet::new();
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let Some((entry, id)) = serde_json::from_str::<JournalEntry>(line)
                .ok()
                .and_then(|e| e.event_id().map(|id| (e, id)))
            else {
                scan.unreadable_lines += 1;
                continue;
            };
            if !seen.insert(id) {
                scan.duplicate_ids.push(id.get());
            } else if scan.last_id.is_some_and(|prev| id <= prev) {
                scan.out_of_order_ids.push(id.get());
            }
            scan.last_id = Some(id);
            scan.max_id = scan.max_id.max(Some(id));
            scan.entries.push(entry);
        }
        scan
    }
}

/// ジャーナルの整合性レポート（journal-check の出力）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalReport {
    pub entries: usize,
    pub last_id: Option<u64>,
    pub max_id: Option<u64>,
    pub next_event_id: u64,
    pub duplicate_ids: Vec<u64>,
    pub out_of_order_ids: Vec<u64>,
    pub unreadable_lines: usize,
    pub torn_tail: bool,
    /// nextEventId が journal 上の最大 ID 以下（追記後に state 書き戻し前で中断された）
    pub counter_lags: bool,
}

impl JournalReport {
    fn new(scan: &JournalScan, state: &RunState) -> Self {
        let max_id = scan.max_id.map(EventId::get);
        Self {
            entries: scan.entries.len(),
            last_id: scan.last_id.map(EventId::get),
            max_id,
            next_event_id: state.next_event_id,
            duplicate_ids: scan.duplicate_ids.clone(),
            out_of_order_ids: scan.out_of_order_ids.clone(),
            unreadable_lines: scan.unreadable_lines,
            torn_tail: scan.torn_tail,
            counter_lags: max_id.is_some_and(|m| state.next_event_id <= m),
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.duplicate_ids.is_empty()
            && self.out_of_order_ids.is_empty()
            && self.unreadable_lines == 0
            && !self.torn_tail
            && !self.counter_lags
    }
}

/// state.json の連番とジャーナル末尾から次の ID を決める。ID を使い切っていれば None。
fn reconcile_next_id(state_next: EventId, journal_max: Option<EventId>) -> Option<EventId> {
    match journal_max {
        Some(max) if max >= state_next => max.next(),
        _ => Some(state_next),
    }
}

fn ids_exhausted(state_path: &std::path::Path) -> Error {
    Error::malformed_state(state_path, "event id counter exhausted")
}

/// run ディレクトリのイベントジャーナル
pub struct EventJournal {
    fs: Arc<dyn FileSystem>,
    clock: Arc<dyn Clock>,
    lock: Arc<dyn RunLock>,
    log: Arc<dyn Log>,
}

impl EventJournal {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        clock: Arc<dyn Clock>,
        lock: Arc<dyn RunLock>,
        log: Arc<dyn Log>,
    ) -> Self {
        Self {
            fs,
            clock,
            lock,
            log,
        }
    }

    /// state.json を読む。無い・壊れている・nextEventId が無い／0 の場合は MalformedState。
    pub fn load_state(&self, run_dir: &RunDir) -> Result<RunState, Error> {
        let path = run_dir.state_path();
        if !self.fs.is_file(&path) {
            return Err(Error::malformed_state(&path, "state record not found"));
        }
        let s = self
            .fs
            .read_to_string(&path)
            .map_err(|e| Error::malformed_state(&path, e.to_string()))?;
        let state: RunState =
            serde_json::from_str(&s).map_err(|e| Error::malformed_state(&path, e.to_string()))?;
        if state.next_id().is_none() {
            return Err(Error::malformed_state(&path, "nextEventId must be positive"));
        }
        Ok(state)
    }

    fn save_state(&self, run_dir: &RunDir, state: &RunState) -> Result<(), Error> {
        let json = state.to_pretty_json()?;
        self.fs.write_atomic(&run_dir.state_path(), &json)
    }

    /// journal.jsonl を読む（無ければ空）
    pub fn scan(&self, run_dir: &RunDir) -> Result<JournalScan, Error> {
        let path = run_dir.journal_path();
        if !self.fs.exists(&path) {
            return Ok(JournalScan::default());
        }
        let bytes = self.fs.read(&path)?;
        Ok(JournalScan::parse(&String::from_utf8_lossy(&bytes)))
    }

    /// 読めるエントリをすべて返す（壊れた行は読み飛ばす）
    pub fn read_journal(&self, run_dir: &RunDir) -> Result<Vec<JournalEntry>, Error> {
        Ok(self.scan(run_dir)?.entries)
    }

    /// イベントを 1 件追記し、state.json の連番を進める。
    pub fn append_event(&self, run_dir: &RunDir, event: &NewEvent) -> Result<JournalEntry, Error> {
        // ロックファイルを作る前に state の有無を確認する
        let state_path = run_dir.state_path();
        if !self.fs.is_file(&state_path) {
            return Err(Error::malformed_state(&state_path, "state record not found"));
        }
        let _guard = self.lock.acquire(run_dir)?;

        let state = self.load_state(run_dir)?;
        let state_next = state
            .next_id()
            .ok_or_else(|| Error::malformed_state(&state_path, "nextEventId must be positive"))?;
        let scan = self.scan(run_dir)?;
        let id = reconcile_next_id(state_next, scan.max_id)
            .ok_or_else(|| ids_exhausted(&state_path))?;
        // 追記より前に次の state を確定させ、採番できなければ何も書かない
        let next_state = state
            .advanced(id, event.set_status.clone())
            .ok_or_else(|| ids_exhausted(&state_path))?;
        if id != state_next {
            let _ = self.log.log(
                &LogRecord::new(LogLevel::Warn, "state counter lagged behind journal")
                    .layer("journal")
                    .kind("recovery")
                    .field("run_dir", run_dir.display().to_string())
                    .field("state_next", state_next.get())
                    .field("assigned", id.get()),
            );
        }

        let entry = JournalEntry {
            timestamp: event
                .timestamp
                .clone()
                .unwrap_or_else(|| format_timestamp(self.clock.now())),
            kind: event.kind.clone(),
            id: id.to_string(),
            event: event.event.clone(),
            data: parse_event_data(&event.data),
        };

        let journal_path = run_dir.journal_path();
        if let Some(parent) = journal_path.parent() {
            self.fs.create_dir_all(parent)?;
        }
        let mut line = String::new();
        if scan.torn_tail {
            // 途中で切れた行と連結させない
            line.push('\n');
        }
        line.push_str(&serde_json::to_string(&entry)?);
        line.push('\n');
        self.fs.append_durable(&journal_path, line.as_bytes())?;
        self.save_state(run_dir, &next_state)?;

        let _ = self.log.log(
            &LogRecord::new(LogLevel::Debug, "event appended")
                .layer("journal")
                .field("run_dir", run_dir.display().to_string())
                .field("id", id.get())
                .field("event", entry.event.clone()),
        );
        Ok(entry)
    }

    /// ジャーナルと state の整合性を確認する
    pub fn check_journal(&self, run_dir: &RunDir) -> Result<JournalReport, Error> {
        let state = self.load_state(run_dir)?;
        let scan = self.scan(run_dir)?;
        Ok(JournalReport::new(&scan, &state))
    }

    /// 遅れた nextEventId を journal 上の最大 ID + 1 まで進める。下げることはしない。
    ///
    /// 書き戻した場合は新しい state を返す。
    pub fn repair_state(&self, run_dir: &RunDir) -> Result<Option<RunState>, Error> {
        let state_path = run_dir.state_path();
        if !self.fs.is_file(&state_path) {
            return Err(Error::malformed_state(&state_path, "state record not found"));
        }
        let _guard = self.lock.acquire(run_dir)?;
        let state = self.load_state(run_dir)?;
        let scan = self.scan(run_dir)?;
        let Some(max) = scan.max_id else {
            return Ok(None);
        };
        if state.next_event_id > max.get() {
            return Ok(None);
        }
        let next = max.next().ok_or_else(|| ids_exhausted(&state_path))?;
        let repaired = state.with_next_id(next);
        self.save_state(run_dir, &repaired)?;
        let _ = self.log.log(
            &LogRecord::new(LogLevel::Info, "state counter repaired")
                .layer("journal")
                .kind("recovery")
                .field("run_dir", run_dir.display().to_string())
                .field("next_event_id", repaired.next_event_id),
        );
        Ok(Some(repaired))
    }
}
