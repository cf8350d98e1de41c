//! The time log file on disk.
//!
//! The whole file is read and parsed on open and rewritten in full on save.
//! An exclusive lock is held for as long as the [`LogFile`] lives, so two
//! invocations cannot interleave a read and a rewrite.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use timeclock_core::{TimeLog, parse_log};

#[derive(Debug)]
pub struct LogFile {
    file: File,
    path: PathBuf,
    /// The parsed log, sorted by time.
    pub log: TimeLog,
}

impl LogFile {
    /// Opens (creating if needed), locks and parses the log at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        file.lock_exclusive()
            .with_context(|| format!("failed to lock {}", path.display()))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut log =
            parse_log(&content).with_context(|| format!("failed to parse {}", path.display()))?;
        log.sort();

        tracing::debug!(path = %path.display(), events = log.len(), "loaded time log");
        Ok(Self {
            file,
            path: path.to_path_buf(),
            log,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the file's contents with the current log.
    pub fn save(&mut self) -> Result<()> {
        let content = self.log.to_string();
        self.file
            .set_len(0)
            .and_then(|()| self.file.seek(SeekFrom::Start(0)))
            .and_then(|_| self.file.write_all(content.as_bytes()))
            .and_then(|()| self.file.sync_all())
            .with_context(|| format!("failed to write {}", self.path.display()))?;

        tracing::info!(path = %self.path.display(), events = self.log.len(), "rewrote time log");
        Ok(())
    }
}
