//! # Pin Store
//!
//! Objects live at `{content_root}/{cid}` where `content_root` is
//! `{public_root}/ipfs`. Because the file name is the CID of the bytes,
//! an existing file is taken as proof that the object is already pinned.
//!
//! ## Write Protocol
//!
//! 1. If `{cid}` exists, return without touching it.
//! 2. Write the bytes to `.{cid}.{uuid}.tmp` in the same directory and
//!    `fsync` it.
//! 3. Rename the temp file over `{cid}`.
//!
//! Concurrent writers of the same CID each use their own temp file and the
//! last rename wins. Every writer holds identical bytes, so the result is
//! one intact object either way. A failed write removes its temp file.
//! Temp files are dot-files so the HTTP layer can keep them unpublished.

use std::path::{Path, PathBuf};

use pinstub_core::ContentId;
use subtle::ConstantTimeEq;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

use crate::error::StoreError;

/// Directory under the public root that holds pinned objects.
pub const CONTENT_DIR: &str = "ipfs";

/// Result of a [`PinStore::put`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedObject {
    pub cid: ContentId,
    /// Final location of the object.
    pub path: PathBuf,
    /// Length in bytes of the submitted content.
    pub size: u64,
    /// False when the object was already present and nothing was written.
    pub newly_pinned: bool,
}

/// A content-addressed object store rooted in a local directory.
#[derive(Debug, Clone)]
pub struct PinStore {
    content_root: PathBuf,
}

impl PinStore {
    /// Open the store under `public_root`, creating `{public_root}/ipfs`
    /// and any missing parents.
    pub async fn open(public_root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let content_root = public_root.as_ref().join(CONTENT_DIR);
        fs::create_dir_all(&content_root)
            .await
            .map_err(|source| StoreError::Init {
                path: content_root.clone(),
                source,
            })?;
        debug!(content_root = %content_root.display(), "pin store opened");
        Ok(Self { content_root })
    }

    /// The directory pinned objects are written to.
    pub fn content_root(&self) -> &Path {
        &self.content_root
    }

    /// Where the object for `cid` lives, whether or not it exists yet.
    pub fn path_for(&self, cid: &ContentId) -> PathBuf {
        self.content_root.join(cid.to_string())
    }

    /// Pin `bytes` under `cid`.
    ///
    /// The caller derives `cid` from `bytes`. An object that already exists
    /// is left as is and its bytes are not re-checked.
    pub async fn put(&self, cid: &ContentId, bytes: &[u8]) -> Result<PinnedObject, StoreError> {
        let path = self.path_for(cid);
        let size = bytes.len() as u64;

        if fs::try_exists(&path).await? {
            debug!(%cid, size, "object already pinned");
            return Ok(PinnedObject {
                cid: *cid,
                path,
                size,
                newly_pinned: false,
            });
        }

        let temp_path = self
            .content_root
            .join(format!(".{cid}.{}.tmp", Uuid::new_v4()));
        if let Err(e) = write_synced(&temp_path, bytes).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&temp_path, &path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        debug!(%cid, size, "pinned new object");
        Ok(PinnedObject {
            cid: *cid,
            path,
            size,
            newly_pinned: true,
        })
    }

    /// Read a pinned object back.
    ///
    /// The bytes are re-addressed on read and must hash to `cid`, otherwise
    /// `StoreError::Integrity` is returned.
    pub async fn get(&self, cid: &ContentId) -> Result<Vec<u8>, StoreError> {
        let bytes = match fs::read(self.path_for(cid)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(*cid));
            }
            Err(e) => return Err(e.into()),
        };

        let actual = ContentId::for_bytes(&bytes);
        if !bool::from(actual.digest().ct_eq(&cid.digest())) {
            return Err(StoreError::Integrity {
                expected: *cid,
                actual,
            });
        }
        Ok(bytes)
    }

    /// Whether an object is pinned under `cid`.
    pub async fn contains(&self, cid: &ContentId) -> Result<bool, StoreError> {
        Ok(fs::try_exists(self.path_for(cid)).await?)
    }
}

async fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn open_temp() -> (TempDir, PinStore) {
        let dir = TempDir::new().unwrap();
        let store = PinStore::open(dir.path()).await.unwrap();
        (dir, store)
    }

    fn dir_entries(path: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(path)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn open_creates_content_root() {
        let dir = TempDir::new().unwrap();
        let public = dir.path().join("nested").join("public");
        let store = PinStore::open(&public).await.unwrap();
        assert_eq!(store.content_root(), public.join("ipfs"));
        assert!(store.content_root().is_dir());
    }

    #[tokio::test]
    async fn open_is_idempotent() {
        let dir = TempDir::new().unwrap();
        PinStore::open(dir.path()).await.unwrap();
        PinStore::open(dir.path()).await.unwrap();
    }

    #[tokio::test]
    async fn open_fails_when_root_is_a_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, b"x").unwrap();
        match PinStore::open(&file).await {
            Err(StoreError::Init { path, .. }) => assert_eq!(path, file.join("ipfs")),
            other => panic!("expected Init error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn put_writes_object_under_cid() {
        let (_dir, store) = open_temp().await;
        let bytes = b"Uploaded content";
        let cid = ContentId::for_bytes(bytes);

        let pinned = store.put(&cid, bytes).await.unwrap();
        assert!(pinned.newly_pinned);
        assert_eq!(pinned.size, 16);
        assert_eq!(pinned.path, store.path_for(&cid));
        assert_eq!(std::fs::read(&pinned.path).unwrap(), bytes);
        assert_eq!(dir_entries(store.content_root()), vec![cid.to_string()]);
    }

    #[tokio::test]
    async fn second_put_is_a_no_op() {
        let (_dir, store) = open_temp().await;
        let bytes = b"same bytes";
        let cid = ContentId::for_bytes(bytes);

        assert!(store.put(&cid, bytes).await.unwrap().newly_pinned);
        let again = store.put(&cid, bytes).await.unwrap();
        assert!(!again.newly_pinned);
        assert_eq!(again.size, bytes.len() as u64);
        assert_eq!(dir_entries(store.content_root()).len(), 1);
    }

    #[tokio::test]
    async fn existing_object_is_never_rewritten() {
        let (_dir, store) = open_temp().await;
        let cid = ContentId::for_bytes(b"real");
        std::fs::write(store.path_for(&cid), b"planted").unwrap();

        let pinned = store.put(&cid, b"real").await.unwrap();
        assert!(!pinned.newly_pinned);
        assert_eq!(std::fs::read(store.path_for(&cid)).unwrap(), b"planted");
    }

    #[tokio::test]
    async fn get_returns_pinned_bytes() {
        let (_dir, store) = open_temp().await;
        let bytes = b"{\"foo\":{\"bar\":\"baz\"}}\n";
        let cid = ContentId::for_bytes(bytes);
        store.put(&cid, bytes).await.unwrap();

        assert_eq!(store.get(&cid).await.unwrap(), bytes);
        assert!(store.contains(&cid).await.unwrap());
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let (_dir, store) = open_temp().await;
        let cid = ContentId::for_bytes(b"never pinned");
        assert!(matches!(store.get(&cid).await, Err(StoreError::NotFound(c)) if c == cid));
        assert!(!store.contains(&cid).await.unwrap());
    }

    #[tokio::test]
    async fn get_detects_tampered_object() {
        let (_dir, store) = open_temp().await;
        let cid = ContentId::for_bytes(b"original");
        store.put(&cid, b"original").await.unwrap();
        std::fs::write(store.path_for(&cid), b"tampered").unwrap();

        match store.get(&cid).await {
            Err(StoreError::Integrity { expected, actual }) => {
                assert_eq!(expected, cid);
                assert_eq!(actual, ContentId::for_bytes(b"tampered"));
            }
            other => panic!("expected Integrity error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_object_can_be_pinned() {
        let (_dir, store) = open_temp().await;
        let cid = ContentId::for_bytes(b"");
        let pinned = store.put(&cid, b"").await.unwrap();
        assert_eq!(pinned.size, 0);
        assert_eq!(store.get(&cid).await.unwrap(), Vec::<u8>::new());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_identical_puts_leave_one_object() {
        let (_dir, store) = open_temp().await;
        let bytes: Vec<u8> = (0..64 * 1024).map(|i| (i % 251) as u8).collect();
        let cid = ContentId::for_bytes(&bytes);

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            let bytes = bytes.clone();
            handles.push(tokio::spawn(async move { store.put(&cid, &bytes).await }));
        }
        let mut newly = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap().newly_pinned {
                newly += 1;
            }
        }

        assert!(newly >= 1);
        assert_eq!(dir_entries(store.content_root()), vec![cid.to_string()]);
        assert_eq!(store.get(&cid).await.unwrap(), bytes);
    }

    #[tokio::test]
    async fn put_fails_when_content_root_vanishes() {
        let (dir, store) = open_temp().await;
        std::fs::remove_dir(store.content_root()).unwrap();

        let cid = ContentId::for_bytes(b"orphan");
        assert!(matches!(store.put(&cid, b"orphan").await, Err(StoreError::Io(_))));
        assert!(!dir.path().join(CONTENT_DIR).exists());
    }
}
