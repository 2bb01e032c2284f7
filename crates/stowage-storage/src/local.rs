use crate::traits::{ByteStream, Storage, StorageError, StorageResult, StoredEntry};
use async_trait::async_trait;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

const COPY_BUFFER_SIZE: usize = 8 * 1024;

/// Local filesystem storage implementation
#[derive(Clone, Debug, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        LocalStorage
    }

    /// Join a stored name onto its directory with security validation
    ///
    /// The name must be a single path component so the resulting path can
    /// never resolve outside `directory`.
    fn name_to_path(directory: &Path, name: &str) -> StorageResult<PathBuf> {
        if name.is_empty()
            || name == "."
            || name.contains("..")
            || name.contains('/')
            || name.contains('\\')
            || name.contains('\0')
        {
            return Err(StorageError::InvalidName(name.to_string()));
        }

        Ok(directory.join(name))
    }

    /// Create a new file, mapping a missing parent to `DirectoryNotFound`.
    ///
    /// Stored names are collision-free, so an existing file is an error rather
    /// than something to overwrite.
    async fn create_file(directory: &Path, path: &Path) -> StorageResult<fs::File> {
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => StorageError::DirectoryNotFound(directory.to_path_buf()),
                _ => StorageError::WriteFailed(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                )),
            })
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn write(&self, directory: &Path, name: &str, data: Bytes) -> StorageResult<u64> {
        let path = Self::name_to_path(directory, name)?;
        let size = data.len() as u64;
        let start = std::time::Instant::now();

        let mut file = Self::create_file(directory, &path).await?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage write successful"
        );

        Ok(size)
    }

    async fn write_stream(
        &self,
        directory: &Path,
        name: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<u64> {
        let path = Self::name_to_path(directory, name)?;
        let start = std::time::Instant::now();

        let mut file = Self::create_file(directory, &path).await?;

        let mut buf = vec![0u8; COPY_BUFFER_SIZE];
        let mut bytes_copied = 0u64;
        loop {
            let n = reader.read(&mut buf).await.map_err(StorageError::SourceRead)?;
            if n == 0 {
                break;
            }
            file.write_all(&buf[..n]).await.map_err(|e| {
                StorageError::WriteFailed(format!(
                    "Failed to write stream to file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            bytes_copied += n as u64;
        }

        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            size_bytes = bytes_copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage stream write successful"
        );

        Ok(bytes_copied)
    }

    async fn dir_exists(&self, directory: &Path) -> StorageResult<bool> {
        match fs::metadata(directory).await {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    async fn list(&self, directory: &Path) -> StorageResult<Vec<StoredEntry>> {
        let mut dir = fs::read_dir(directory).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::DirectoryNotFound(directory.to_path_buf()),
            _ => StorageError::ReadFailed(format!(
                "Failed to read directory {}: {}",
                directory.display(),
                e
            )),
        })?;

        let mut entries = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let meta = entry.metadata().await?;
            if !meta.is_file() {
                continue;
            }
            entries.push(StoredEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                size_bytes: meta.len(),
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn open(&self, directory: &Path, name: &str) -> StorageResult<Box<dyn ByteStream>> {
        let path = Self::name_to_path(directory, name)?;

        let file = fs::File::open(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound(path.clone()),
            _ => StorageError::ReadFailed(format!("Failed to open file {}: {}", path.display(), e)),
        })?;

        Ok(Box::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_local_storage_write_and_read_back() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new();

        let data = Bytes::from_static(b"Hello, World!");
        let size = storage
            .write(dir.path(), "test.txt", data.clone())
            .await
            .unwrap();
        assert_eq!(size, data.len() as u64);

        let mut stream = storage.open(dir.path(), "test.txt").await.unwrap();
        let mut downloaded = Vec::new();
        stream.read_to_end(&mut downloaded).await.unwrap();
        assert_eq!(downloaded, data.to_vec());
    }

    #[tokio::test]
    async fn test_invalid_names_rejected() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new();

        for name in ["../escape", "a/b", "..", "", "a\\b"] {
            let result = storage.write(dir.path(), name, Bytes::new()).await;
            assert!(
                matches!(result, Err(StorageError::InvalidName(_))),
                "name {:?} should be rejected",
                name
            );
        }
    }

    #[tokio::test]
    async fn test_write_into_missing_directory() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing");
        let storage = LocalStorage::new();

        let result = storage
            .write(&missing, "file.bin", Bytes::from_static(b"x"))
            .await;
        assert!(matches!(result, Err(StorageError::DirectoryNotFound(p)) if p == missing));

        let mut reader: &[u8] = b"stream";
        let result = storage.write_stream(&missing, "file.bin", &mut reader).await;
        assert!(matches!(result, Err(StorageError::DirectoryNotFound(_))));
    }

    #[tokio::test]
    async fn test_existing_file_not_overwritten() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new();

        storage
            .write(dir.path(), "same.bin", Bytes::from_static(b"first"))
            .await
            .unwrap();
        let result = storage
            .write(dir.path(), "same.bin", Bytes::from_static(b"second"))
            .await;
        assert!(matches!(result, Err(StorageError::WriteFailed(_))));
        assert_eq!(
            std::fs::read(dir.path().join("same.bin")).unwrap(),
            b"first"
        );
    }

    #[tokio::test]
    async fn test_local_storage_stream_write() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new();

        let data = b"stream test data".to_vec();
        let mut cursor = std::io::Cursor::new(data.clone());

        let size = storage
            .write_stream(dir.path(), "stream.txt", &mut cursor)
            .await
            .unwrap();

        assert_eq!(size, data.len() as u64);
        assert_eq!(std::fs::read(dir.path().join("stream.txt")).unwrap(), data);
    }

    /// Serves its bytes, then fails instead of reporting EOF.
    struct ResetAfter(std::io::Cursor<Vec<u8>>);

    impl AsyncRead for ResetAfter {
        fn poll_read(
            mut self: std::pin::Pin<&mut Self>,
            cx: &mut std::task::Context<'_>,
            buf: &mut tokio::io::ReadBuf<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            let before = buf.filled().len();
            match std::pin::Pin::new(&mut self.0).poll_read(cx, buf) {
                std::task::Poll::Ready(Ok(())) if buf.filled().len() == before => {
                    std::task::Poll::Ready(Err(std::io::Error::new(
                        ErrorKind::ConnectionReset,
                        "connection reset",
                    )))
                }
                other => other,
            }
        }
    }

    #[tokio::test]
    async fn test_stream_read_error_is_source_read() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new();

        let mut reader = ResetAfter(std::io::Cursor::new(vec![b'a'; 600]));
        let result = storage
            .write_stream(dir.path(), "partial.bin", &mut reader)
            .await;

        match result {
            Err(StorageError::SourceRead(e)) => {
                assert_eq!(e.kind(), ErrorKind::ConnectionReset)
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_dir_exists() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new();

        assert!(storage.dir_exists(dir.path()).await.unwrap());
        assert!(!storage.dir_exists(&dir.path().join("nope")).await.unwrap());

        storage
            .write(dir.path(), "plain.txt", Bytes::from_static(b"x"))
            .await
            .unwrap();
        assert!(!storage
            .dir_exists(&dir.path().join("plain.txt"))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_list_skips_directories_and_sorts() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new();

        storage
            .write(dir.path(), "b.txt", Bytes::from_static(b"bb"))
            .await
            .unwrap();
        storage
            .write(dir.path(), "a.txt", Bytes::from_static(b"a"))
            .await
            .unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let entries = storage.list(dir.path()).await.unwrap();
        assert_eq!(
            entries,
            vec![
                StoredEntry {
                    name: "a.txt".to_string(),
                    size_bytes: 1
                },
                StoredEntry {
                    name: "b.txt".to_string(),
                    size_bytes: 2
                },
            ]
        );

        let missing = storage.list(&dir.path().join("missing")).await;
        assert!(matches!(missing, Err(StorageError::DirectoryNotFound(_))));
    }

    #[tokio::test]
    async fn test_open_nonexistent() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new();

        let result = storage.open(dir.path(), "nonexistent.txt").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }
}
