//! ファイルシステム Outbound ポート
//!
//! ジャーナル・抽出・テンプレート処理はこの trait 経由でのみファイル I/O を行う。

use crate::error::Error;
use std::path::Path;

/// ファイルメタデータ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMetadata {
    pub len: u64,
    pub is_file: bool,
}

/// ファイルシステム抽象（Outbound ポート）
///
/// 実装は `common::adapter::StdFileSystem` など。
pub trait FileSystem: Send + Sync {
    /// バイト列のまま読む（エンコーディング判定は呼び出し側）
    fn read(&self, path: &Path) -> Result<Vec<u8>, Error>;
    fn read_to_string(&self, path: &Path) -> Result<String, Error>;
    fn write(&self, path: &Path, contents: &str) -> Result<(), Error>;
    /// 一時ファイルへ書いて fsync し、rename で置き換える
    fn write_atomic(&self, path: &Path, contents: &str) -> Result<(), Error>;
    /// 追記して fsync まで行う（存在しなければ作成）
    fn append_durable(&self, path: &Path, bytes: &[u8]) -> Result<(), Error>;
    fn create_dir_all(&self, path: &Path) -> Result<(), Error>;
    fn metadata(&self, path: &Path) -> Result<FileMetadata, Error>;
    /// 追記用に開く（存在しなければ作成）。返した Writer を drop すると閉じる。
    fn open_append(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>, Error>;

    /// パスが存在するか（metadata が取れれば true）
    fn exists(&self, path: &Path) -> bool {
        self.metadata(path).is_ok()
    }

    /// 通常ファイルとして存在するか
    fn is_file(&self, path: &Path) -> bool {
        self.metadata(path).is_ok_and(|m| m.is_file)
    }
}
