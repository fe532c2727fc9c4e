use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use tome_types::BlobId;

use crate::error::{BlobError, BlobResult};
use crate::names::validate_logical_name;
use crate::object::BlobObject;
use crate::source::ByteSource;
use crate::traits::BlobStore;

/// Sidecar metadata persisted next to each payload file.
///
/// On-disk layout under the store root:
/// ```text
/// <root>/<blob-id>.blob   payload bytes
/// <root>/<blob-id>.json   this sidecar (JSON)
/// ```
/// The sidecar is written after the payload, so a torn write leaves an
/// orphan payload with no sidecar; those are swept at open.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct BlobMeta {
    id: BlobId,
    logical_name: String,
    content_type: String,
    uploaded_at: DateTime<Utc>,
    size: u64,
    /// CRC32 of the payload, verified on every read.
    crc32: u32,
}

/// Index state: both maps are updated together under one lock.
#[derive(Default)]
struct Inner {
    objects: HashMap<BlobId, BlobMeta>,
    by_name: HashMap<String, BlobId>,
}

/// Durable file-per-payload blob store.
///
/// Payloads live as individual files with a JSON metadata sidecar each; the
/// name index is rebuilt by scanning the root directory at open. Reads
/// verify the payload against the CRC recorded in its sidecar.
pub struct FsBlobStore {
    root: PathBuf,
    inner: RwLock<Inner>,
}

impl FsBlobStore {
    /// Open (or create) a blob store rooted at the given directory.
    ///
    /// Scans existing sidecars to rebuild the index, resolves duplicate
    /// live names in favor of the later upload, and sweeps orphan payload
    /// files left by torn writes.
    pub fn open(root: impl AsRef<Path>) -> BlobResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;

        let mut objects: HashMap<BlobId, BlobMeta> = HashMap::new();
        let mut by_name: HashMap<String, BlobId> = HashMap::new();

        for entry in fs::read_dir(&root)? {
            let entry = entry?;
            let path = entry.path();
            if !path.extension().map(|e| e == "json").unwrap_or(false) {
                continue;
            }

            let meta: BlobMeta = match fs::read(&path)
                .map_err(BlobError::from)
                .and_then(|raw| {
                    serde_json::from_slice(&raw)
                        .map_err(|e| BlobError::Serialization(e.to_string()))
                }) {
                Ok(meta) => meta,
                Err(e) => {
                    warn!("skipping unreadable blob sidecar {:?}: {}", path, e);
                    continue;
                }
            };

            if !payload_path(&root, &meta.id).is_file() {
                warn!(id = %meta.id, "sidecar without payload, removing");
                let _ = fs::remove_file(&path);
                continue;
            }

            // Duplicate live names can only come from a crash between the
            // write of a replacement and the removal of its predecessor;
            // the later upload wins.
            if let Some(prev_id) = by_name.get(&meta.logical_name).copied() {
                let prev = &objects[&prev_id];
                if prev.uploaded_at >= meta.uploaded_at {
                    warn!(
                        name = %meta.logical_name,
                        dropped = %meta.id,
                        "duplicate live name, dropping older blob"
                    );
                    remove_blob_files(&root, &meta.id);
                    continue;
                }
                warn!(
                    name = %meta.logical_name,
                    dropped = %prev_id,
                    "duplicate live name, dropping older blob"
                );
                remove_blob_files(&root, &prev_id);
                objects.remove(&prev_id);
            }

            by_name.insert(meta.logical_name.clone(), meta.id);
            objects.insert(meta.id, meta);
        }

        // Sweep orphan payloads (torn writes leave a payload with no
        // sidecar; they are unreachable and unverifiable).
        for entry in fs::read_dir(&root)? {
            let entry = entry?;
            let path = entry.path();
            if !path.extension().map(|e| e == "blob").unwrap_or(false) {
                continue;
            }
            let id = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<BlobId>().ok());
            if let Some(id) = id {
                if !objects.contains_key(&id) {
                    warn!(id = %id, "removing orphan payload file");
                    let _ = fs::remove_file(&path);
                }
            }
        }

        debug!(blobs = objects.len(), root = ?root, "blob store opened");
        Ok(Self {
            root,
            inner: RwLock::new(Inner { objects, by_name }),
        })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of live objects currently stored.
    pub fn len(&self) -> usize {
        self.inner.read().expect("lock poisoned").objects.len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.read().expect("lock poisoned").objects.is_empty()
    }

    fn payload_path(&self, id: &BlobId) -> PathBuf {
        payload_path(&self.root, id)
    }

    fn sidecar_path(&self, id: &BlobId) -> PathBuf {
        sidecar_path(&self.root, id)
    }

    fn write_payload(&self, object: &BlobObject) -> BlobResult<()> {
        let mut file = File::create(self.payload_path(&object.id))?;
        file.write_all(&object.data)?;
        file.sync_all()?;
        Ok(())
    }

    fn write_sidecar(&self, meta: &BlobMeta) -> BlobResult<()> {
        let raw = serde_json::to_vec_pretty(meta)
            .map_err(|e| BlobError::Serialization(e.to_string()))?;
        let mut file = File::create(self.sidecar_path(&meta.id))?;
        file.write_all(&raw)?;
        file.sync_all()?;
        Ok(())
    }

    /// Read the payload for cached metadata, verifying its CRC.
    fn load(&self, meta: BlobMeta) -> BlobResult<BlobObject> {
        let path = self.payload_path(&meta.id);
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(BlobError::CorruptBlob {
                    id: meta.id,
                    reason: "payload file missing".into(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let crc = crc32fast::hash(&data);
        if crc != meta.crc32 {
            warn!(
                id = %meta.id,
                expected = meta.crc32,
                actual = crc,
                "blob payload failed CRC check"
            );
            return Err(BlobError::CorruptBlob {
                id: meta.id,
                reason: format!(
                    "CRC mismatch: expected {:08x}, computed {crc:08x}",
                    meta.crc32
                ),
            });
        }

        Ok(BlobObject {
            id: meta.id,
            logical_name: meta.logical_name,
            content_type: meta.content_type,
            uploaded_at: meta.uploaded_at,
            size: meta.size,
            data: data.into(),
        })
    }
}

impl BlobStore for FsBlobStore {
    fn put(
        &self,
        logical_name: &str,
        content_type: &str,
        source: ByteSource,
    ) -> BlobResult<BlobId> {
        validate_logical_name(logical_name)?;
        // Pre-flight source check: on failure the object currently filed
        // under this name is untouched.
        let data = source.into_bytes(logical_name)?;

        let object = BlobObject::new(logical_name, content_type, data);
        let meta = BlobMeta {
            id: object.id,
            logical_name: object.logical_name.clone(),
            content_type: object.content_type.clone(),
            uploaded_at: object.uploaded_at,
            size: object.size,
            crc32: crc32fast::hash(&object.data),
        };

        let mut inner = self.inner.write().expect("lock poisoned");

        if let Some(old_id) = inner.by_name.remove(logical_name) {
            inner.objects.remove(&old_id);
            remove_blob_files(&self.root, &old_id);
            debug!(name = logical_name, superseded = %old_id, "removed superseded blob");
        }

        // Payload first, sidecar second: a torn write is detectable at open
        // by the missing sidecar.
        self.write_payload(&object)?;
        self.write_sidecar(&meta)?;

        let id = object.id;
        inner.by_name.insert(logical_name.to_string(), id);
        inner.objects.insert(id, meta);

        debug!(name = logical_name, id = %id, size = object.size, "blob stored");
        Ok(id)
    }

    fn get(&self, id: &BlobId) -> BlobResult<BlobObject> {
        let meta = {
            let inner = self.inner.read().expect("lock poisoned");
            inner.objects.get(id).cloned()
        };
        match meta {
            Some(meta) => self.load(meta),
            None => Err(BlobError::NotFound(*id)),
        }
    }

    fn latest_by_name(&self, logical_name: &str) -> BlobResult<BlobObject> {
        let meta = {
            let inner = self.inner.read().expect("lock poisoned");
            let id = inner
                .by_name
                .get(logical_name)
                .ok_or_else(|| BlobError::NameNotFound(logical_name.to_string()))?;
            inner.objects.get(id).cloned()
        };
        match meta {
            Some(meta) => self.load(meta),
            None => Err(BlobError::NameNotFound(logical_name.to_string())),
        }
    }

    fn exists_by_name(&self, logical_name: &str) -> BlobResult<bool> {
        let inner = self.inner.read().expect("lock poisoned");
        Ok(inner.by_name.contains_key(logical_name))
    }

    fn delete(&self, id: &BlobId) -> BlobResult<bool> {
        let mut inner = self.inner.write().expect("lock poisoned");
        match inner.objects.remove(id) {
            Some(meta) => {
                inner.by_name.remove(&meta.logical_name);
                remove_blob_files(&self.root, id);
                debug!(id = %id, name = %meta.logical_name, "blob deleted");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl std::fmt::Debug for FsBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsBlobStore")
            .field("root", &self.root)
            .field("object_count", &self.len())
            .finish()
    }
}

fn payload_path(root: &Path, id: &BlobId) -> PathBuf {
    root.join(format!("{id}.blob"))
}

fn sidecar_path(root: &Path, id: &BlobId) -> PathBuf {
    root.join(format!("{id}.json"))
}

/// Best-effort removal of both halves of a stored blob. Absence is fine;
/// anything else is logged and swallowed so a delete can still succeed.
fn remove_blob_files(root: &Path, id: &BlobId) {
    for path in [payload_path(root, id), sidecar_path(root, id)] {
        if let Err(e) = fs::remove_file(&path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(id = %id, path = ?path, error = %e, "failed to remove blob file");
            }
        }
    }
}
