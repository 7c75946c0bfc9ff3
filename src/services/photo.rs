use std::sync::Arc;
use time::OffsetDateTime;
use uuid::Uuid;
use crate::models::photo::Photo;
use crate::services::storage::{FileUpload, StorageError, StorageService, StoredFile};

pub struct PhotoService {
    storage: Arc<dyn StorageService>,
}

impl PhotoService {
    pub fn new(storage: Arc<dyn StorageService>) -> Self {
        Self { storage }
    }

    /// Stores the file under a freshly generated id.
    pub async fn upload_photo(&self, file: FileUpload) -> Result<Photo, StorageError> {
        let photo_id = Uuid::new_v4().to_string();
        let url = self.storage.store(file, &photo_id).await?;

        Ok(Photo {
            url,
            upload_date: OffsetDateTime::now_utc(),
        })
    }

    pub async fn get_photo_as_resource(&self, id: &str) -> Result<Option<StoredFile>, StorageError> {
        self.storage.load_as_resource(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::storage::FileSystemStorageService;

    #[tokio::test]
    async fn uploads_get_distinct_ids_and_can_be_retrieved() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(FileSystemStorageService::init(dir.path()).await.unwrap());
        let service = PhotoService::new(storage);
        let upload = FileUpload {
            original_name: Some("dinner.jpg".into()),
            content_type: Some("image/jpeg".into()),
            data: vec![1, 2, 3],
        };

        let first = service.upload_photo(upload.clone()).await.unwrap();
        let second = service.upload_photo(upload).await.unwrap();

        assert_ne!(first.url, second.url);
        assert!(first.url.ends_with(".jpg"));
        let (id, _) = first.url.split_once('.').unwrap();
        assert!(Uuid::parse_str(id).is_ok());

        let stored = service.get_photo_as_resource(&first.url).await.unwrap().unwrap();
        assert_eq!(stored.data, vec![1, 2, 3]);
    }
}
