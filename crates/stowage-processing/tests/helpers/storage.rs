use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use stowage_storage::{
    ByteStream, LocalStorage, Storage, StorageError, StorageResult, StoredEntry,
};
use tempfile::TempDir;
use tokio::io::AsyncRead;

/// Temporary upload tree with one directory per destination.
pub struct TestDirs {
    pub temp_dir: TempDir,
    pub uploads: PathBuf,
    pub images: PathBuf,
    pub thumbnails: PathBuf,
    pub pictures: PathBuf,
    pub other: PathBuf,
}

impl TestDirs {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let make = |name: &str| {
            let path = temp_dir.path().join(name);
            std::fs::create_dir(&path).expect("Failed to create test directory");
            path
        };

        Self {
            uploads: make("uploads"),
            images: make("images"),
            thumbnails: make("thumbnails"),
            pictures: make("pictures"),
            other: make("other"),
            temp_dir,
        }
    }

    /// A path inside the tree that does not exist.
    pub fn missing(&self) -> PathBuf {
        self.temp_dir.path().join("missing")
    }
}

impl Default for TestDirs {
    fn default() -> Self {
        Self::new()
    }
}

/// Local storage that refuses every write into one directory.
pub struct FailingWrites {
    inner: LocalStorage,
    fail_dir: PathBuf,
    vanished: bool,
}

impl FailingWrites {
    /// Writes into `fail_dir` fail as if the disk were full.
    pub fn new(fail_dir: impl Into<PathBuf>) -> Self {
        Self {
            inner: LocalStorage::new(),
            fail_dir: fail_dir.into(),
            vanished: false,
        }
    }

    /// `fail_dir` still passes `dir_exists`, but writes find it gone.
    pub fn vanishing(fail_dir: impl Into<PathBuf>) -> Self {
        Self {
            vanished: true,
            ..Self::new(fail_dir)
        }
    }

    fn check(&self, directory: &Path) -> StorageResult<()> {
        if directory != self.fail_dir {
            return Ok(());
        }
        if self.vanished {
            return Err(StorageError::DirectoryNotFound(directory.to_path_buf()));
        }
        Err(StorageError::WriteFailed("disk full".to_string()))
    }
}

#[async_trait]
impl Storage for FailingWrites {
    async fn write(&self, directory: &Path, name: &str, data: Bytes) -> StorageResult<u64> {
        self.check(directory)?;
        self.inner.write(directory, name, data).await
    }

    async fn write_stream(
        &self,
        directory: &Path,
        name: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<u64> {
        self.check(directory)?;
        self.inner.write_stream(directory, name, reader).await
    }

    async fn dir_exists(&self, directory: &Path) -> StorageResult<bool> {
        self.inner.dir_exists(directory).await
    }

    async fn list(&self, directory: &Path) -> StorageResult<Vec<StoredEntry>> {
        self.inner.list(directory).await
    }

    async fn open(&self, directory: &Path, name: &str) -> StorageResult<Box<dyn ByteStream>> {
        self.inner.open(directory, name).await
    }
}
