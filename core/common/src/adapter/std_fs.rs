//! 標準ファイルシステム実装（std::fs を委譲）

use crate::error::Error;
use crate::ports::outbound::{FileMetadata, FileSystem};
use std::io::Write;
use std::path::{Path, PathBuf};

/// 標準ライブラリの fs をそのまま委譲する FileSystem 実装
#[derive(Debug, Clone, Default)]
pub struct StdFileSystem;

/// `state.json` → `.state.json.tmp`（同一ディレクトリ内なので rename が原子的）
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}

impl FileSystem for StdFileSystem {
    fn read(&self, path: &Path) -> Result<Vec<u8>, Error> {
        std::fs::read(path).map_err(|e| {
            Error::io_msg(format!("Failed to read '{}': {}", path.display(), e))
        })
    }

    fn read_to_string(&self, path: &Path) -> Result<String, Error> {
        std::fs::read_to_string(path).map_err(|e| {
            Error::io_msg(format!("Failed to read '{}': {}", path.display(), e))
        })
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), Error> {
        std::fs::write(path, contents).map_err(|e| {
            Error::io_msg(format!("Failed to write '{}': {}", path.display(), e))
        })
    }

    fn write_atomic(&self, path: &Path, contents: &str) -> Result<(), Error> {
        let tmp = temp_path_for(path);
        let mut file = std::fs::File::create(&tmp).map_err(|e| {
            Error::io_msg(format!("Failed to create '{}': {}", tmp.display(), e))
        })?;
        file.write_all(contents.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| {
                Error::io_msg(format!("Failed to write '{}': {}", tmp.display(), e))
            })?;
        drop(file);
        std::fs::rename(&tmp, path).map_err(|e| {
            Error::io_msg(format!(
                "Failed to rename '{}' to '{}': {}",
                tmp.display(),
                path.display(),
                e
            ))
        })
    }

    fn append_durable(&self, path: &Path, bytes: &[u8]) -> Result<(), Error> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                Error::io_msg(format!("Failed to open '{}' for append: {}", path.display(), e))
            })?;
        file.write_all(bytes)
            .and_then(|_| file.flush())
            .and_then(|_| file.sync_data())
            .map_err(|e| {
                Error::io_msg(format!("Failed to append to '{}': {}", path.display(), e))
            })
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), Error> {
        std::fs::create_dir_all(path).map_err(|e| {
            Error::io_msg(format!("Failed to create directory '{}': {}", path.display(), e))
        })
    }

    fn metadata(&self, path: &Path) -> Result<FileMetadata, Error> {
        let m = std::fs::metadata(path).map_err(|e| {
            Error::io_msg(format!(
                "Failed to get metadata for '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(FileMetadata {
            len: m.len(),
            is_file: m.is_file(),
        })
    }

    fn open_append(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>, Error> {
        let f = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                Error::io_msg(format!("Failed to open '{}' for append: {}", path.display(), e))
            })?;
        Ok(Box::new(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_atomic_replaces_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let fs = StdFileSystem;
        fs.write(&path, "old").unwrap();
        fs.write_atomic(&path, "new\n").unwrap();
        assert_eq!(fs.read_to_string(&path).unwrap(), "new\n");
        assert!(!dir.path().join(".state.json.tmp").exists());
    }

    #[test]
    fn append_durable_extends_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.jsonl");
        let fs = StdFileSystem;
        fs.append_durable(&path, b"a\n").unwrap();
        fs.append_durable(&path, b"b\n").unwrap();
        assert_eq!(fs.read(&path).unwrap(), b"a\nb\n");
        assert_eq!(
            fs.metadata(&path).unwrap(),
            FileMetadata {
                len: 4,
                is_file: true
            }
        );
        assert!(!fs.is_file(dir.path()));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let fs = StdFileSystem;
        let err = fs.read(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(!fs.exists(&dir.path().join("nope")));
    }
}
