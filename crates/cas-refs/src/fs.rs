//! Filesystem namespace store.
//!
//! ```text
//! namespaces/
//!   <owner>/
//!     <slug>/
//!       latest          exactly one CID, replaced atomically
//!       history.jsonl   one {"cid", "timestamp"} record per line
//! ```
//!
//! Every history record ends with `\n`. A final line without one is a record
//! torn by a crash mid-append: readers skip it and the next append truncates
//! it away. Any other unreadable line is corruption.

use std::fs::{self, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use cas_types::Cid;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{RefError, Result};
use crate::names::validate_name;
use crate::traits::NamespaceStore;
use crate::types::{HistoryEntry, Namespace};

const LATEST_FILE: &str = "latest";
const HISTORY_FILE: &str = "history.jsonl";
const SCAN_CHUNK: u64 = 4096;

/// Namespace store rooted at a directory on the local filesystem.
///
/// History appends through one store (and its clones) are serialized, so
/// torn-tail repair never races another append from the same process.
#[derive(Debug, Clone)]
pub struct FsNamespaceStore {
    dir: PathBuf,
    append_lock: Arc<Mutex<()>>,
}

impl FsNamespaceStore {
    /// Open (creating if needed) the store under `root/namespaces`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let dir = root.as_ref().join("namespaces");
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            append_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Directory holding the per-owner directories.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn ns_dir(&self, ns: &Namespace) -> PathBuf {
        self.dir.join(ns.owner()).join(ns.slug())
    }
}

/// Length of `file` up to and including its last `\n`.
fn complete_len(file: &mut fs::File, len: u64) -> io::Result<u64> {
    let mut end = len;
    let mut buf = vec![0u8; SCAN_CHUNK as usize];
    while end > 0 {
        let start = end.saturating_sub(SCAN_CHUNK);
        let chunk = &mut buf[..(end - start) as usize];
        file.seek(SeekFrom::Start(start))?;
        file.read_exact(chunk)?;
        if let Some(pos) = chunk.iter().rposition(|b| *b == b'\n') {
            return Ok(start + pos as u64 + 1);
        }
        end = start;
    }
    Ok(0)
}

impl NamespaceStore for FsNamespaceStore {
    fn update_latest(&self, ns: &Namespace, cid: &Cid) -> Result<()> {
        let dir = self.ns_dir(ns);
        fs::create_dir_all(&dir)?;
        let mut tmp = NamedTempFile::new_in(&dir)?;
        writeln!(tmp, "{cid}")?;
        tmp.as_file().sync_all()?;
        tmp.persist(dir.join(LATEST_FILE))
            .map_err(|e| RefError::Io(e.error))?;
        debug!(namespace = %ns, cid = %cid, "updated latest pointer");
        Ok(())
    }

    fn latest(&self, ns: &Namespace) -> Result<Option<Cid>> {
        let text = match fs::read_to_string(self.ns_dir(ns).join(LATEST_FILE)) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Cid::parse(text.trim())
            .map(Some)
            .map_err(|e| RefError::Corrupt {
                namespace: ns.to_string(),
                reason: format!("latest pointer: {e}"),
            })
    }

    fn append_entry(&self, ns: &Namespace, entry: &HistoryEntry) -> Result<()> {
        let mut line =
            serde_json::to_string(entry).map_err(|e| RefError::Serialization(e.to_string()))?;
        line.push('\n');

        let _guard = self
            .append_lock
            .lock()
            .map_err(|e| RefError::Poisoned(e.to_string()))?;
        let dir = self.ns_dir(ns);
        fs::create_dir_all(&dir)?;
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(dir.join(HISTORY_FILE))?;

        let len = file.metadata()?.len();
        if len > 0 {
            let mut last = [0u8; 1];
            file.seek(SeekFrom::End(-1))?;
            file.read_exact(&mut last)?;
            if last[0] != b'\n' {
                let keep = complete_len(&mut file, len)?;
                warn!(namespace = %ns, dropped_bytes = len - keep, "truncating torn history record");
                file.set_len(keep)?;
            }
        }

        // O_APPEND: the record lands at the end in a single write.
        file.write_all(line.as_bytes())?;
        file.sync_data()?;
        debug!(namespace = %ns, cid = %entry.cid, "appended history entry");
        Ok(())
    }

    fn read_history(&self, ns: &Namespace) -> Result<Vec<HistoryEntry>> {
        let text = match fs::read_to_string(self.ns_dir(ns).join(HISTORY_FILE)) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let torn_tail = !text.ends_with('\n');
        let lines: Vec<&str> = text.lines().collect();
        let last = lines.len().saturating_sub(1);

        let mut entries = Vec::with_capacity(lines.len());
        for (idx, line) in lines.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<HistoryEntry>(line) {
                Ok(entry) => entries.push(entry),
                Err(e) if torn_tail && idx == last => {
                    warn!(namespace = %ns, line = idx + 1, error = %e, "skipping torn history record");
                }
                Err(e) => {
                    return Err(RefError::Corrupt {
                        namespace: ns.to_string(),
                        reason: format!("history line {}: {e}", idx + 1),
                    });
                }
            }
        }
        Ok(entries)
    }

    fn list_slugs(&self, owner: &str) -> Result<Vec<String>> {
        validate_name(owner)?;
        let read_dir = match fs::read_dir(self.dir.join(owner)) {
            Ok(rd) => rd,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut slugs = Vec::new();
        for dirent in read_dir {
            let dirent = dirent?;
            if !dirent.file_type()?.is_dir() {
                continue;
            }
            if let Some(name) = dirent.file_name().to_str() {
                if validate_name(name).is_ok() {
                    slugs.push(name.to_string());
                }
            }
        }
        slugs.sort();
        Ok(slugs)
    }
}
