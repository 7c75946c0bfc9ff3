use std::path::{Component, Path, PathBuf};
use anyhow::Context;
use axum::async_trait;
use thiserror::Error;
use tracing::{info, warn};

/// Largest accepted upload, 5 MiB.
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

pub const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Cannot save an empty file")]
    Empty,

    #[error("File too large. Max size is {}MB", MAX_FILE_SIZE / (1024 * 1024))]
    TooLarge,

    #[error("Invalid original filename")]
    InvalidFileName,

    #[error("Missing file extension")]
    MissingExtension,

    #[error("Unsupported file type: {0}")]
    UnsupportedExtension(String),

    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("Cannot access a file outside the configured directory")]
    OutsideRoot,

    #[error("Storage I/O failure: {0:#}")]
    Io(#[from] anyhow::Error),
}

/// An uploaded file as received from the client.
#[derive(Clone, Debug)]
pub struct FileUpload {
    pub original_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// A file read back from storage.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub data: Vec<u8>,
}

#[async_trait]
pub trait StorageService: Send + Sync {
    /// Validates and persists `upload` as `<file_name>.<ext>`, returning the
    /// final file name.
    async fn store(&self, upload: FileUpload, file_name: &str) -> Result<String, StorageError>;

    /// `Ok(None)` when nothing readable exists under that name.
    async fn load_as_resource(&self, file_name: &str) -> Result<Option<StoredFile>, StorageError>;
}

pub struct FileSystemStorageService {
    root_location: PathBuf,
}

impl FileSystemStorageService {
    /// Resolves `location` to an absolute path and makes sure the directory exists.
    pub async fn init(location: impl AsRef<Path>) -> anyhow::Result<Self> {
        let location = location.as_ref();
        let absolute = if location.is_absolute() {
            location.to_path_buf()
        } else {
            std::env::current_dir()
                .context("Could not resolve the working directory")?
                .join(location)
        };
        let root_location = normalize(&absolute);

        tokio::fs::create_dir_all(&root_location)
            .await
            .with_context(|| format!("Could not initialize storage location {}", root_location.display()))?;
        info!("Storage directory initialized at {}", root_location.display());

        Ok(Self { root_location })
    }

    pub fn root_location(&self) -> &Path {
        &self.root_location
    }

    fn resolve(&self, file_name: &str) -> Result<PathBuf, StorageError> {
        let destination = normalize(&self.root_location.join(file_name));
        if destination == self.root_location || !destination.starts_with(&self.root_location) {
            return Err(StorageError::OutsideRoot);
        }
        Ok(destination)
    }
}

#[async_trait]
impl StorageService for FileSystemStorageService {
    async fn store(&self, upload: FileUpload, file_name: &str) -> Result<String, StorageError> {
        if upload.data.is_empty() {
            return Err(StorageError::Empty);
        }
        if upload.data.len() > MAX_FILE_SIZE {
            return Err(StorageError::TooLarge);
        }

        let original_name = upload
            .original_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or(StorageError::InvalidFileName)?;

        let extension = extension_of(original_name).ok_or(StorageError::MissingExtension)?;
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(StorageError::UnsupportedExtension(extension));
        }

        match upload.content_type.as_deref() {
            Some(content_type) if content_type.starts_with("image/") => {}
            other => {
                return Err(StorageError::UnsupportedContentType(
                    other.unwrap_or("none").to_string(),
                ))
            }
        }

        let final_file_name = format!("{}.{}", file_name, extension);
        let destination = self.resolve(&final_file_name)?;

        tokio::fs::write(&destination, &upload.data)
            .await
            .with_context(|| format!("Failed to store file {}", final_file_name))?;
        info!("Stored file: {}", final_file_name);

        Ok(final_file_name)
    }

    async fn load_as_resource(&self, file_name: &str) -> Result<Option<StoredFile>, StorageError> {
        let path = self.resolve(file_name)?;

        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Some(StoredFile {
                file_name: file_name.to_string(),
                content_type: media_type_for(file_name),
                data,
            })),
            Err(e) => {
                warn!("Could not read file: {}, due to: {}", file_name, e);
                Ok(None)
            }
        }
    }
}

/// Lowercased text after the last `.` of the file name, if non-empty.
fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| ext.to_ascii_lowercase())
}

pub fn media_type_for(file_name: &str) -> &'static str {
    match extension_of(file_name).as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Lexical normalization: drops `.` and folds `..` into its parent without
/// touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(name: &str, content_type: &str, data: Vec<u8>) -> FileUpload {
        FileUpload {
            original_name: Some(name.to_string()),
            content_type: Some(content_type.to_string()),
            data,
        }
    }

    async fn storage() -> (tempfile::TempDir, FileSystemStorageService) {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSystemStorageService::init(dir.path()).await.unwrap();
        (dir, storage)
    }

    fn stored_files(dir: &tempfile::TempDir) -> usize {
        std::fs::read_dir(dir.path()).unwrap().count()
    }

    #[tokio::test]
    async fn store_then_load_returns_identical_bytes() {
        let (_dir, storage) = storage().await;
        let bytes = vec![0x89, b'P', b'N', b'G', 1, 2, 3];

        let name = storage
            .store(image("Photo.PNG", "image/png", bytes.clone()), "abc")
            .await
            .unwrap();
        assert_eq!(name, "abc.png");

        let loaded = storage.load_as_resource(&name).await.unwrap().unwrap();
        assert_eq!(loaded.data, bytes);
        assert_eq!(loaded.content_type, "image/png");
    }

    #[tokio::test]
    async fn store_overwrites_existing_file() {
        let (_dir, storage) = storage().await;

        storage.store(image("a.jpg", "image/jpeg", vec![1]), "same").await.unwrap();
        storage.store(image("b.jpg", "image/jpeg", vec![2, 2]), "same").await.unwrap();

        let loaded = storage.load_as_resource("same.jpg").await.unwrap().unwrap();
        assert_eq!(loaded.data, vec![2, 2]);
    }

    #[tokio::test]
    async fn rejected_uploads_write_nothing() {
        let (dir, storage) = storage().await;
        let cases = vec![
            image("a.jpg", "image/jpeg", Vec::new()),
            image("a.jpg", "image/jpeg", vec![0; MAX_FILE_SIZE + 1]),
            image("a.bmp", "image/bmp", vec![1]),
            image("noext", "image/jpeg", vec![1]),
            image("a.", "image/jpeg", vec![1]),
            image("a.png", "text/plain", vec![1]),
            FileUpload {
                original_name: None,
                content_type: Some("image/png".into()),
                data: vec![1],
            },
        ];

        for upload in cases {
            assert!(storage.store(upload, "id").await.is_err());
        }
        assert_eq!(stored_files(&dir), 0);
    }

    #[tokio::test]
    async fn validation_errors_are_specific() {
        let (_dir, storage) = storage().await;

        let err = storage.store(image("a.jpg", "image/jpeg", Vec::new()), "id").await.unwrap_err();
        assert!(matches!(err, StorageError::Empty));

        let err = storage
            .store(image("a.jpg", "image/jpeg", vec![0; MAX_FILE_SIZE + 1]), "id")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::TooLarge));

        let err = storage.store(image("a.svg", "image/svg+xml", vec![1]), "id").await.unwrap_err();
        assert!(matches!(err, StorageError::UnsupportedExtension(ext) if ext == "svg"));

        let err = storage.store(image("a.gif", "application/pdf", vec![1]), "id").await.unwrap_err();
        assert!(matches!(err, StorageError::UnsupportedContentType(_)));
    }

    #[tokio::test]
    async fn exactly_max_size_is_accepted() {
        let (_dir, storage) = storage().await;

        let name = storage
            .store(image("big.jpeg", "image/jpeg", vec![7; MAX_FILE_SIZE]), "big")
            .await
            .unwrap();
        assert_eq!(name, "big.jpeg");
    }

    #[tokio::test]
    async fn path_escape_is_refused() {
        let (dir, storage) = storage().await;

        let err = storage
            .store(image("a.png", "image/png", vec![1]), "../escaped")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::OutsideRoot));
        assert!(!dir.path().parent().unwrap().join("escaped.png").exists());

        let err = storage.load_as_resource("../../etc/passwd").await.unwrap_err();
        assert!(matches!(err, StorageError::OutsideRoot));
    }

    #[tokio::test]
    async fn missing_file_loads_as_none() {
        let (_dir, storage) = storage().await;

        assert!(storage.load_as_resource("nope.png").await.unwrap().is_none());
    }

    #[test]
    fn normalize_folds_parent_components() {
        assert_eq!(normalize(Path::new("/srv/uploads/./a/../b.png")), PathBuf::from("/srv/uploads/b.png"));
        assert_eq!(normalize(Path::new("/srv/uploads/../x.png")), PathBuf::from("/srv/x.png"));
    }
}
