//! flock(2) による run ディレクトリ単位のアドバイザリロック
//!
//! `<run_dir>/.lock` を開いて LOCK_EX を取る。ロックはファイル記述子に紐づくため、
//! ガードが File を保持し、drop（close）で解放される。
//! 同一プロセス内でも open ごとに別のロックとして競合する。

use crate::domain::RunDir;
use crate::error::Error;
use crate::ports::outbound::{RunLock, RunLockGuard};
use std::fs::{File, OpenOptions};
use std::io;

/// flock による RunLock 実装（Unix 以外では排他しない）
#[derive(Debug, Clone, Default)]
pub struct FlockRunLock;

#[cfg(unix)]
fn lock_exclusive(file: &File) -> io::Result<()> {
    use std::os::unix::io::AsRawFd;
    let fd = file.as_raw_fd();
    loop {
        // SAFETY: fd は生存中の File から取得した有効な記述子で、LOCK_EX は正当な操作。
        let rc = unsafe { libc::flock(fd, libc::LOCK_EX) };
        if rc == 0 {
            return Ok(());
        }
        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::Interrupted {
            return Err(err);
        }
    }
}

#[cfg(not(unix))]
fn lock_exclusive(_: &File) -> io::Result<()> {
    Ok(())
}

impl RunLock for FlockRunLock {
    fn acquire(&self, run_dir: &RunDir) -> Result<RunLockGuard, Error> {
        let path = run_dir.lock_path();
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|e| Error::lock(format!("Failed to open '{}': {}", path.display(), e)))?;
        lock_exclusive(&file)
            .map_err(|e| Error::lock(format!("Failed to lock '{}': {}", path.display(), e)))?;
        Ok(RunLockGuard::new(file))
    }
}
