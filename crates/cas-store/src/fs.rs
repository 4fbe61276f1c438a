//! Filesystem object store.
//!
//! Layout under the store root:
//!
//! ```text
//! objects/
//!   <cid>/
//!     raw          submitted bytes
//!     canonical    canonical bytes
//!     meta.json    {"created_at": ..., "author": {...}}
//! ```
//!
//! An object directory is assembled in a temporary directory next to it and
//! renamed into place in one step. The rename fails if `<cid>/` already
//! exists, so the first writer's bytes and metadata are final and a reader
//! never sees a partial object. Delete renames the directory out of the way
//! before removing it.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use cas_types::{Cid, Identity};
use chrono::Utc;
use tempfile::TempDir;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::object::{ObjectMeta, StoredObject};
use crate::traits::ObjectStore;

const RAW_FILE: &str = "raw";
const CANONICAL_FILE: &str = "canonical";
const META_FILE: &str = "meta.json";

/// Object store rooted at a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    dir: PathBuf,
}

impl FsObjectStore {
    /// Open (creating if needed) the store under `root/objects`.
    pub fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = root.as_ref().join("objects");
        fs::create_dir_all(&dir)?;
        debug!(dir = %dir.display(), "opened object store");
        Ok(Self { dir })
    }

    /// Directory holding the object directories.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn object_dir(&self, cid: &Cid) -> PathBuf {
        self.dir.join(cid.to_string())
    }

    /// Read one file of an object.
    ///
    /// A missing file means the object is absent if its directory is gone
    /// (deleted concurrently) and corrupt otherwise.
    fn read_part(&self, cid: &Cid, name: &str) -> StoreResult<Option<Vec<u8>>> {
        let dir = self.object_dir(cid);
        match fs::read(dir.join(name)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if dir.exists() {
                    Err(StoreError::CorruptObject {
                        cid: *cid,
                        reason: format!("missing {name} file"),
                    })
                } else {
                    Ok(None)
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    fn read_meta(&self, cid: &Cid) -> StoreResult<Option<ObjectMeta>> {
        let Some(bytes) = self.read_part(cid, META_FILE)? else {
            return Ok(None);
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| StoreError::CorruptObject {
                cid: *cid,
                reason: format!("unreadable metadata: {e}"),
            })
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

impl ObjectStore for FsObjectStore {
    fn put_object(
        &self,
        cid: &Cid,
        raw: &[u8],
        canonical: &[u8],
        author: Option<&Identity>,
    ) -> StoreResult<bool> {
        let dest = self.object_dir(cid);
        if dest.exists() {
            debug!(cid = %cid, "object already stored");
            return Ok(false);
        }

        let meta = ObjectMeta {
            created_at: Utc::now(),
            author: author.cloned(),
        };
        let meta = serde_json::to_vec(&meta)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        // Dropping `stage` removes whatever is left of it.
        let stage = TempDir::new_in(&self.dir)?;
        write_synced(&stage.path().join(CANONICAL_FILE), canonical)?;
        write_synced(&stage.path().join(META_FILE), &meta)?;
        write_synced(&stage.path().join(RAW_FILE), raw)?;

        if let Err(e) = fs::rename(stage.path(), &dest) {
            if dest.exists() {
                debug!(cid = %cid, "lost race to store object");
                return Ok(false);
            }
            return Err(e.into());
        }

        info!(
            cid = %cid,
            raw_bytes = raw.len(),
            canonical_bytes = canonical.len(),
            author = %author.map(ToString::to_string).unwrap_or_default(),
            "stored object"
        );
        Ok(true)
    }

    fn load(&self, cid: &Cid) -> StoreResult<Option<StoredObject>> {
        let Some(raw) = self.read_part(cid, RAW_FILE)? else {
            return Ok(None);
        };
        let Some(canonical) = self.read_part(cid, CANONICAL_FILE)? else {
            return Ok(None);
        };
        let Some(meta) = self.read_meta(cid)? else {
            return Ok(None);
        };
        Ok(Some(StoredObject {
            cid: *cid,
            raw,
            canonical,
            author: meta.author,
            created_at: meta.created_at,
        }))
    }

    fn exists(&self, cid: &Cid) -> StoreResult<bool> {
        match fs::metadata(self.object_dir(cid)) {
            Ok(md) => Ok(md.is_dir()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&self, cid: &Cid) -> StoreResult<bool> {
        let tomb = TempDir::new_in(&self.dir)?;
        match fs::rename(self.object_dir(cid), tomb.path().join("object")) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        }
        tomb.close()?;
        info!(cid = %cid, "deleted object");
        Ok(true)
    }

    fn get_author(&self, cid: &Cid) -> StoreResult<Identity> {
        let meta = self.read_meta(cid)?.ok_or(StoreError::NotFound(*cid))?;
        meta.author.ok_or(StoreError::AuthorNotFound(*cid))
    }
}
