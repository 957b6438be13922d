//! Ports & Adapters のポート定義
//!
//! - inbound: なし（common はライブラリのためアプリの入り口を持たない）
//! - outbound: ジャーナル・抽出処理が外界に依頼するための trait

pub mod outbound;
