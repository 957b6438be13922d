//! runkit 共通ライブラリ
//!
//! `append-event` / `render-prompt` / `extract-first-json` / `journal-check` で共有される機能を提供します。

/// エラーハンドリング
pub mod error;

/// ドメイン型（run ディレクトリ・state・ジャーナルエントリ）
pub mod domain;

/// Outbound ポート
pub mod ports;

/// ポートの標準実装
pub mod adapter;

/// テキストからの JSON 抽出
pub mod json_extract;

/// イベントジャーナル
pub mod journal;

/// プロンプトテンプレート
pub mod template;

/// CLI の開始・終了・エラーを構造化ログに残す
pub mod lifecycle;
