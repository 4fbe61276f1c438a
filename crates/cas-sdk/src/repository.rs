use cas_canon::{CanonicalForm, Canonicalizer, Document};
use cas_crypto::ContentHasher;
use cas_gate::{GateDecision, OwnershipGate};
use cas_refs::{
    FsNamespaceStore, HistoryEntry, InMemoryNamespaceStore, Namespace, NamespaceStore,
};
use cas_store::{FsObjectStore, InMemoryObjectStore, ObjectStore, StoredObject};
use cas_types::{Cid, Identity};
use tracing::{debug, info, warn};

use crate::config::RepositoryConfig;
use crate::error::{SdkError, SdkResult};

/// High-level CAS repository API.
///
/// Wires the canonicalizer, identifier deriver, object store, namespace
/// tracker and ownership gate into one handle. Every operation goes through
/// the handle; there is no global store location.
pub struct Repository<S = FsObjectStore, N = FsNamespaceStore> {
    store: S,
    refs: N,
    canon: Canonicalizer,
    hasher: ContentHasher,
    gate: OwnershipGate,
}

impl Repository<FsObjectStore, FsNamespaceStore> {
    /// Open (creating if needed) a repository on disk under `config.root`.
    pub fn open(config: RepositoryConfig) -> SdkResult<Self> {
        let store = FsObjectStore::open(&config.root)?;
        let refs = FsNamespaceStore::open(&config.root)?;
        info!(root = %config.root.display(), hash = ?config.hash, "opened repository");
        Ok(Self::with_backends(config, store, refs))
    }
}

impl Repository<InMemoryObjectStore, InMemoryNamespaceStore> {
    /// Repository backed entirely by memory. `config.root` is ignored.
    pub fn in_memory(config: RepositoryConfig) -> Self {
        Self::with_backends(config, InMemoryObjectStore::new(), InMemoryNamespaceStore::new())
    }
}

impl<S: ObjectStore, N: NamespaceStore> Repository<S, N> {
    /// Repository over caller-supplied backends.
    pub fn with_backends(config: RepositoryConfig, store: S, refs: N) -> Self {
        Self {
            store,
            refs,
            canon: Canonicalizer::new(config.canon),
            hasher: ContentHasher::json(config.hash),
            gate: OwnershipGate::default(),
        }
    }

    /// Replace the ownership gate used by [`delete`](Self::delete).
    pub fn with_gate(mut self, gate: OwnershipGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn refs(&self) -> &N {
        &self.refs
    }

    pub fn canonicalizer(&self) -> &Canonicalizer {
        &self.canon
    }

    // ---- Content operations ----

    /// Validate, canonicalize and store a JSON document without an author.
    pub fn save(&self, raw: &[u8]) -> SdkResult<Cid> {
        let canonical = self.canon.canonicalize_json(raw)?;
        self.put(raw, &canonical.form, None)
    }

    /// Like [`save`](Self::save), recording `author` if the object is new.
    pub fn save_with_author(&self, raw: &[u8], author: &Identity) -> SdkResult<Cid> {
        let canonical = self.canon.canonicalize_json(raw)?;
        self.put(raw, &canonical.form, Some(author))
    }

    /// Store an in-memory document. Its canonical bytes double as raw bytes.
    pub fn save_document(&self, doc: &Document) -> SdkResult<Cid> {
        let form = self.canon.canonicalize(doc)?;
        self.put(form.as_bytes(), &form, None)
    }

    fn put(&self, raw: &[u8], form: &CanonicalForm, author: Option<&Identity>) -> SdkResult<Cid> {
        let cid = self.hasher.derive(form.as_bytes())?;
        let created = self.store.put_object(&cid, raw, form.as_bytes(), author)?;
        debug!(cid = %cid, created, "saved document");
        Ok(cid)
    }

    /// Full stored object after checking its canonical bytes against `cid`.
    pub fn object(&self, cid: &Cid) -> SdkResult<StoredObject> {
        let obj = self
            .store
            .load(cid)?
            .ok_or_else(|| SdkError::NotFound(cid.to_string()))?;
        if !ContentHasher::verify(&obj.canonical, cid)? {
            warn!(cid = %cid, "canonical bytes do not hash to their identifier");
            return Err(SdkError::Corrupt { cid: *cid });
        }
        Ok(obj)
    }

    /// Raw and canonical bytes of an object.
    pub fn load(&self, cid: &Cid) -> SdkResult<(Vec<u8>, Vec<u8>)> {
        let obj = self.object(cid)?;
        Ok((obj.raw, obj.canonical))
    }

    /// Parse an object's canonical bytes back into a [`Document`].
    pub fn load_document(&self, cid: &Cid) -> SdkResult<Document> {
        let obj = self.object(cid)?;
        serde_json::from_slice(&obj.canonical).map_err(|e| {
            warn!(cid = %cid, error = %e, "canonical bytes are not valid JSON");
            SdkError::Corrupt { cid: *cid }
        })
    }

    /// Recorded author of an object, `None` if it was saved anonymously.
    pub fn author(&self, cid: &Cid) -> SdkResult<Option<Identity>> {
        let obj = self
            .store
            .load(cid)?
            .ok_or_else(|| SdkError::NotFound(cid.to_string()))?;
        Ok(obj.author)
    }

    /// Delete an object if `requester` is its recorded author.
    pub fn delete(&self, cid: &Cid, requester: &Identity) -> SdkResult<()> {
        let author = self.author(cid)?;
        if let GateDecision::Deny { reason } = self.gate.evaluate(author.as_ref(), requester) {
            warn!(cid = %cid, requester = %requester, reason = %reason, "delete refused");
            return Err(SdkError::Forbidden {
                cid: *cid,
                requester: requester.clone(),
                reason,
            });
        }
        if !self.store.delete(cid)? {
            // Removed by a concurrent caller between the check and now.
            return Err(SdkError::NotFound(cid.to_string()));
        }
        info!(cid = %cid, requester = %requester, "deleted object");
        Ok(())
    }

    // ---- Namespace operations ----

    pub fn update_latest(&self, owner: &str, slug: &str, cid: &Cid) -> SdkResult<()> {
        let ns = Namespace::new(owner, slug)?;
        self.refs.update_latest(&ns, cid)?;
        Ok(())
    }

    pub fn read_latest(&self, owner: &str, slug: &str) -> SdkResult<Cid> {
        let ns = Namespace::new(owner, slug)?;
        Ok(self.refs.read_latest(&ns)?)
    }

    pub fn append_history(&self, owner: &str, slug: &str, cid: &Cid) -> SdkResult<HistoryEntry> {
        let ns = Namespace::new(owner, slug)?;
        Ok(self.refs.append_history(&ns, cid)?)
    }

    /// History of a namespace, oldest first. Empty if never appended to.
    pub fn read_history(&self, owner: &str, slug: &str) -> SdkResult<Vec<HistoryEntry>> {
        let ns = Namespace::new(owner, slug)?;
        Ok(self.refs.read_history(&ns)?)
    }

    pub fn list_slugs(&self, owner: &str) -> SdkResult<Vec<String>> {
        Ok(self.refs.list_slugs(owner)?)
    }

    /// Save `raw` as `author`, record it in the namespace history, then move
    /// the latest pointer to it.
    ///
    /// History is appended first so the latest pointer always names a CID
    /// present in the history.
    pub fn publish(&self, owner: &str, slug: &str, raw: &[u8], author: &Identity) -> SdkResult<Cid> {
        let ns = Namespace::new(owner, slug)?;
        let cid = self.save_with_author(raw, author)?;
        self.refs.append_history(&ns, &cid)?;
        self.refs.update_latest(&ns, &cid)?;
        info!(namespace = %ns, cid = %cid, author = %author, "published");
        Ok(cid)
    }
}

impl<S: std::fmt::Debug, N: std::fmt::Debug> std::fmt::Debug for Repository<S, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("store", &self.store)
            .field("refs", &self.refs)
            .field("hasher", &self.hasher)
            .field("gate", &self.gate)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cas_canon::ValidationError;
    use cas_crypto::HashAlg;
    use cas_gate::DenyReason;

    const NOTE: &[u8] =
        br#"{"@context":"https://www.w3.org/ns/activitystreams","type":"Note","a":1,"b":2}"#;
    const NOTE_SWAPPED: &[u8] = br#"{
        "@context": "https://www.w3.org/ns/activitystreams",
        "type": "Note",
        "b": 2,
        "a": 1
    }"#;

    fn repo() -> Repository<InMemoryObjectStore, InMemoryNamespaceStore> {
        Repository::in_memory(RepositoryConfig::default())
    }

    // ---- Content ----

    #[test]
    fn key_order_does_not_change_cid() {
        let repo = repo();
        let a = repo.save(NOTE).unwrap();
        let b = repo.save(NOTE_SWAPPED).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            a.to_string(),
            "bagaaierarli5jjkgwu3poblbi2gjivdz5tyj2gw5wgomiew2utn3snq4tkha"
        );
    }

    #[test]
    fn ten_saves_store_one_object() {
        let repo = repo();
        let cids: Vec<Cid> = (0..10).map(|_| repo.save(NOTE).unwrap()).collect();
        assert!(cids.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(repo.store().len().unwrap(), 1);
    }

    #[test]
    fn first_raw_bytes_are_kept() {
        let repo = repo();
        let cid = repo.save(NOTE).unwrap();
        repo.save(NOTE_SWAPPED).unwrap();
        let (raw, canonical) = repo.load(&cid).unwrap();
        assert_eq!(raw, NOTE);
        assert_eq!(
            canonical,
            br#"{"@context":"https://www.w3.org/ns/activitystreams","a":1,"b":2,"type":"Note"}"#
        );
    }

    #[test]
    fn missing_context_is_rejected_before_storage() {
        let repo = repo();
        let err = repo.save(br#"{"type":"Note","a":1}"#).unwrap_err();
        assert!(matches!(
            err,
            SdkError::Validation(ValidationError::MissingContext { .. })
        ));
        assert!(repo.store().is_empty().unwrap());
    }

    #[test]
    fn save_document_matches_save() {
        let repo = repo();
        let doc = Document::object([
            ("b".to_string(), Document::from(2i64)),
            ("@context".to_string(), Document::from("https://www.w3.org/ns/activitystreams")),
            ("type".to_string(), Document::from("Note")),
            ("a".to_string(), Document::from(1i64)),
        ]);
        let from_doc = repo.save_document(&doc).unwrap();
        assert_eq!(from_doc, repo.save(NOTE).unwrap());
        assert_eq!(repo.load_document(&from_doc).unwrap(), doc);
    }

    #[test]
    fn blake3_repository_derives_blake3_cids() {
        let config = RepositoryConfig {
            hash: HashAlg::Blake3,
            ..RepositoryConfig::default()
        };
        let repo = Repository::in_memory(config);
        let cid = repo.save(NOTE).unwrap();
        assert_eq!(cid.hash_code(), HashAlg::Blake3.code());
        assert!(repo.load(&cid).is_ok());
    }

    #[test]
    fn load_missing_is_not_found() {
        let repo = repo();
        let cid = ContentHasher::default().derive(b"nothing").unwrap();
        assert!(repo.load(&cid).unwrap_err().is_not_found());
    }

    #[test]
    fn load_detects_tampered_canonical_bytes() {
        let repo = repo();
        let cid = ContentHasher::default().derive(b"claimed").unwrap();
        repo.store().put(&cid, b"{}", b"{}").unwrap();
        assert!(matches!(repo.load(&cid).unwrap_err(), SdkError::Corrupt { .. }));
    }

    // ---- Ownership ----

    #[test]
    fn numeric_id_governs_delete() {
        let repo = repo();
        let cid = repo.save_with_author(NOTE, &Identity::new("alice", 123)).unwrap();

        let err = repo.delete(&cid, &Identity::new("alice", 456)).unwrap_err();
        assert!(matches!(
            err,
            SdkError::Forbidden {
                reason: DenyReason::Mismatch { .. },
                ..
            }
        ));
        assert!(repo.load(&cid).is_ok());

        repo.delete(&cid, &Identity::new("alice-renamed", 123)).unwrap();
        assert!(repo.load(&cid).unwrap_err().is_not_found());
    }

    #[test]
    fn anonymous_object_cannot_be_deleted() {
        let repo = repo();
        let cid = repo.save(NOTE).unwrap();
        let err = repo.delete(&cid, &Identity::new("alice", 123)).unwrap_err();
        assert!(matches!(
            err,
            SdkError::Forbidden {
                reason: DenyReason::NoRecordedAuthor,
                ..
            }
        ));
    }

    #[test]
    fn delete_missing_is_not_found() {
        let repo = repo();
        let cid = ContentHasher::default().derive(b"ghost").unwrap();
        assert!(repo.delete(&cid, &Identity::from_id(1)).unwrap_err().is_not_found());
    }

    #[test]
    fn handle_decides_when_ids_are_missing() {
        let repo = repo();
        let cid = repo.save_with_author(NOTE, &Identity::from_handle("@Alice")).unwrap();
        assert!(repo.delete(&cid, &Identity::from_handle("bob")).is_err());
        repo.delete(&cid, &Identity::from_handle("alice")).unwrap();
    }

    // ---- Namespaces ----

    #[test]
    fn latest_and_history() {
        let repo = repo();
        let cid1 = repo.save(NOTE).unwrap();
        let cid2 = repo.save(br#"{"@context":"https://schema.org"}"#).unwrap();

        repo.update_latest("alice", "note1", &cid1).unwrap();
        assert_eq!(repo.read_latest("alice", "note1").unwrap(), cid1);

        let t1 = repo.append_history("alice", "note1", &cid1).unwrap();
        let t2 = repo.append_history("alice", "note1", &cid2).unwrap();
        assert_eq!(repo.read_history("alice", "note1").unwrap(), vec![t1, t2]);
    }

    #[test]
    fn unknown_namespace() {
        let repo = repo();
        assert!(repo.read_latest("alice", "nothing").unwrap_err().is_not_found());
        assert!(repo.read_history("alice", "nothing").unwrap().is_empty());
    }

    #[test]
    fn unsafe_names_are_rejected() {
        let repo = repo();
        let cid = repo.save(NOTE).unwrap();
        assert!(matches!(
            repo.update_latest("alice", "../etc", &cid).unwrap_err(),
            SdkError::Ref(cas_refs::RefError::InvalidName { .. })
        ));
    }

    #[test]
    fn publish_keeps_latest_in_history() {
        let repo = repo();
        let author = Identity::new("alice", 123);
        let first = repo.publish("alice", "note1", NOTE, &author).unwrap();
        let second = repo
            .publish("alice", "note1", br#"{"@context":"https://schema.org"}"#, &author)
            .unwrap();

        assert_eq!(repo.read_latest("alice", "note1").unwrap(), second);
        let history: Vec<Cid> = repo
            .read_history("alice", "note1")
            .unwrap()
            .into_iter()
            .map(|e| e.cid)
            .collect();
        assert_eq!(history, vec![first, second]);
        assert_eq!(repo.author(&second).unwrap(), Some(author));
        assert_eq!(repo.list_slugs("alice").unwrap(), vec!["note1"]);
    }

    // ---- Filesystem backends ----

    #[test]
    fn filesystem_repository_survives_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let author = Identity::new("alice", 123);
        let cid = {
            let repo = Repository::open(RepositoryConfig::at(tmp.path())).unwrap();
            repo.publish("alice", "note1", NOTE, &author).unwrap()
        };

        let repo = Repository::open(RepositoryConfig::at(tmp.path())).unwrap();
        assert_eq!(repo.load(&cid).unwrap().0, NOTE);
        assert_eq!(repo.read_latest("alice", "note1").unwrap(), cid);
        assert_eq!(repo.read_history("alice", "note1").unwrap().len(), 1);

        repo.delete(&cid, &Identity::from_id(123)).unwrap();
        assert!(repo.load(&cid).unwrap_err().is_not_found());
    }

    #[test]
    fn filesystem_save_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = Repository::open(RepositoryConfig::at(tmp.path())).unwrap();
        for _ in 0..10 {
            repo.save(NOTE).unwrap();
        }
        let entries = std::fs::read_dir(repo.store().dir()).unwrap().count();
        assert_eq!(entries, 1);
    }
}
