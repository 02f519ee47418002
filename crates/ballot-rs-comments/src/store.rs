//! Comment store abstraction and the JSONL file implementation.

use crate::error::CommentError;
use crate::model::{CommentKind, CommentRecord};
use ballot_rs_config::StorageConfig;
use chrono::Utc;
use fs2::FileExt;
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Suffix appended to the option id to name its file.
const COMMENTS_FILE_SUFFIX: &str = "-comments.txt";

/// Bytes scanned per step when looking for the last complete line.
const TAIL_CHUNK: usize = 4096;

/// Message returned when a required field is empty.
const INVALID_COMMENT_MESSAGE: &str = "could not create comment with given information";

/// Per-option comment persistence.
pub trait CommentStore: Send + Sync {
    /// Load every comment on an option in append order.
    ///
    /// An option with no stored comments yields an empty collection. Ids that
    /// cannot name a single file (empty, `.`, `..`, or containing a path
    /// separator or NUL) are rejected with `CommentError::Validation`.
    fn load(&self, option_id: &str) -> Result<Vec<CommentRecord>, CommentError>;

    /// Persist a new comment with an explicit kind and return the stored record.
    ///
    /// Fails with `CommentError::Corrupt` instead of writing when the option's
    /// existing records no longer decode.
    fn append_with_kind(
        &self,
        author: &str,
        option_id: &str,
        body: &str,
        kind: CommentKind,
    ) -> Result<CommentRecord, CommentError>;

    /// Persist a new plain comment and return the stored record.
    fn append(
        &self,
        author: &str,
        option_id: &str,
        body: &str,
    ) -> Result<CommentRecord, CommentError> {
        self.append_with_kind(author, option_id, body, CommentKind::Comment)
    }
}

/// File-backed store keeping one JSONL file per option.
#[derive(Debug)]
pub struct FileCommentStore {
    /// Root directory for option files.
    root: PathBuf,
    /// Serialize in-process appends per option; entries live only while held.
    option_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl FileCommentStore {
    /// Create a store under the given root, creating the directory if needed.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, CommentError> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root).map_err(|err| CommentError::io(&root, err))?;
        info!("initialized file comment store (root={})", root.display());
        Ok(Self {
            root,
            option_locks: Mutex::new(HashMap::new()),
        })
    }

    /// Create a store rooted at the configured storage directory.
    pub fn from_config(config: &StorageConfig) -> Result<Self, CommentError> {
        let root = config
            .resolved_root()
            .map_err(|err| CommentError::Validation(err.to_string()))?;
        Self::new(root)
    }

    /// Root directory holding option files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the file holding an option's comments.
    pub fn option_path(&self, option_id: &str) -> PathBuf {
        self.root.join(format!("{option_id}{COMMENTS_FILE_SUFFIX}"))
    }

    /// Shared lock handle for an option.
    fn option_lock(&self, option_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.option_locks.lock();
        locks.entry(option_id.to_string()).or_default().clone()
    }

    /// Drop the option's lock entry once no other caller holds it.
    fn release_option_lock(&self, option_id: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.option_locks.lock();
        // Clones are only handed out under the map lock, so the count is stable here.
        if Arc::strong_count(&lock) == 2 {
            locks.remove(option_id);
        }
    }

    /// Decode every record from an option file.
    fn read_records(
        &self,
        option_id: &str,
        path: &Path,
        source: impl Read,
    ) -> Result<Vec<CommentRecord>, CommentError> {
        let reader = BufReader::new(source);
        let mut records = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = match line {
                Ok(line) => line,
                Err(err) if err.kind() == ErrorKind::InvalidData => {
                    return Err(corrupt(path, line_no, err.to_string()));
                }
                Err(err) => return Err(CommentError::io(path, err)),
            };
            if line.trim().is_empty() {
                continue;
            }
            let record: CommentRecord = serde_json::from_str(&line)
                .map_err(|err| corrupt(path, line_no, err.to_string()))?;
            if record.option_id != option_id {
                return Err(corrupt(
                    path,
                    line_no,
                    format!("record belongs to option {}", record.option_id),
                ));
            }
            records.push(record);
        }
        Ok(records)
    }

    /// Append one record while holding the option's locks.
    fn write_record(
        &self,
        author: &str,
        option_id: &str,
        body: &str,
        kind: CommentKind,
    ) -> Result<CommentRecord, CommentError> {
        let path = self.option_path(option_id);
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)
            .map_err(|err| CommentError::io(&path, err))?;
        FileExt::lock_exclusive(&file).map_err(|err| CommentError::io(&path, err))?;

        let dropped =
            truncate_partial_tail(&mut file).map_err(|err| CommentError::io(&path, err))?;
        if dropped > 0 {
            warn!(
                "dropped partial trailing line from comment file (path={}, bytes={})",
                path.display(),
                dropped
            );
        }
        file.seek(SeekFrom::Start(0))
            .map_err(|err| CommentError::io(&path, err))?;
        // Refuse to add to a file that would no longer load.
        let existing = self.read_records(option_id, &path, &file)?;

        let record = CommentRecord {
            author: author.to_string(),
            option_id: option_id.to_string(),
            timestamp: Utc::now(),
            body: body.to_string(),
            kind,
        };
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');
        file.write_all(line.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|err| CommentError::io(&path, err))?;
        debug!(
            "stored comment (option_id={}, kind={}, body_len={}, count={})",
            option_id,
            kind,
            body.len(),
            existing.len() + 1
        );
        Ok(record)
    }
}

impl CommentStore for FileCommentStore {
    fn load(&self, option_id: &str) -> Result<Vec<CommentRecord>, CommentError> {
        validate_option_id(option_id)?;
        let path = self.option_path(option_id);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("no comments stored (option_id={option_id})");
                return Ok(Vec::new());
            }
            Err(err) => {
                warn!(
                    "comment file unreadable, treating as empty (path={}): {err}",
                    path.display()
                );
                return Ok(Vec::new());
            }
        };
        match file.metadata() {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => {
                warn!(
                    "comment path is not a regular file, treating as empty (path={})",
                    path.display()
                );
                return Ok(Vec::new());
            }
            Err(err) => {
                warn!(
                    "comment file unreadable, treating as empty (path={}): {err}",
                    path.display()
                );
                return Ok(Vec::new());
            }
        }
        // Released when the handle closes.
        FileExt::lock_shared(&file).map_err(|err| CommentError::io(&path, err))?;
        let records = self.read_records(option_id, &path, file)?;
        debug!(
            "loaded comments (option_id={}, count={})",
            option_id,
            records.len()
        );
        Ok(records)
    }

    fn append_with_kind(
        &self,
        author: &str,
        option_id: &str,
        body: &str,
        kind: CommentKind,
    ) -> Result<CommentRecord, CommentError> {
        if author.is_empty() || option_id.is_empty() || body.is_empty() {
            return Err(CommentError::Validation(INVALID_COMMENT_MESSAGE.to_string()));
        }
        validate_option_id(option_id)?;

        let lock = self.option_lock(option_id);
        let result = {
            let _guard = lock.lock();
            self.write_record(author, option_id, body, kind)
        };
        self.release_option_lock(option_id, lock);
        result
    }
}

/// Reject ids that cannot name a single file under the root.
fn validate_option_id(option_id: &str) -> Result<(), CommentError> {
    let unusable = option_id.is_empty()
        || option_id == "."
        || option_id == ".."
        || option_id.contains(['/', '\\', '\0']);
    if unusable {
        return Err(CommentError::Validation(format!(
            "invalid option id: {option_id:?}"
        )));
    }
    Ok(())
}

/// Cut the file back to its last newline, returning the bytes removed.
///
/// A write interrupted mid-line leaves an unterminated tail; no complete
/// record ever ends without `\n`.
fn truncate_partial_tail(file: &mut File) -> std::io::Result<u64> {
    let len = file.metadata()?.len();
    let mut end = len;
    let mut buf = [0u8; TAIL_CHUNK];
    while end > 0 {
        let start = end.saturating_sub(TAIL_CHUNK as u64);
        let chunk = &mut buf[..(end - start) as usize];
        file.seek(SeekFrom::Start(start))?;
        file.read_exact(chunk)?;
        if let Some(pos) = chunk.iter().rposition(|byte| *byte == b'\n') {
            let keep = start + pos as u64 + 1;
            if keep < len {
                file.set_len(keep)?;
            }
            return Ok(len - keep);
        }
        end = start;
    }
    if len > 0 {
        file.set_len(0)?;
    }
    Ok(len)
}

fn corrupt(path: &Path, line: usize, reason: String) -> CommentError {
    CommentError::Corrupt {
        path: path.to_path_buf(),
        line,
        reason,
    }
}
