use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::core::error::{AppError, Result};
use crate::shared::constants::ALLOWED_PHOTO_TYPES;

/// Object storage used for report photos
#[async_trait]
pub trait PhotoStorage: Send + Sync {
    /// Store an object and return its public URL
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<String>;

    async fn remove(&self, key: &str) -> Result<()>;
}

/// One photo part from a submission
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: Option<String>,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// A photo that reached storage
#[derive(Debug, Clone, PartialEq)]
pub struct StoredPhoto {
    pub key: String,
    pub url: String,
}

/// Checks and stores report photos
pub struct PhotoService {
    storage: Arc<dyn PhotoStorage>,
    max_photo_size: usize,
    max_photos: usize,
}

impl PhotoService {
    pub fn new(storage: Arc<dyn PhotoStorage>, max_photo_size: usize, max_photos: usize) -> Self {
        Self {
            storage,
            max_photo_size,
            max_photos,
        }
    }

    /// Reject oversized, unsupported or too many photos before anything is stored
    pub fn check(&self, photos: &[PhotoUpload]) -> Result<()> {
        let mut errors = Vec::new();

        if photos.len() > self.max_photos {
            errors.push(format!(
                "at most {} photos may be attached",
                self.max_photos
            ));
        }

        for (index, photo) in photos.iter().enumerate() {
            let name = photo
                .file_name
                .clone()
                .unwrap_or_else(|| format!("photo {}", index + 1));
            if photo.data.is_empty() {
                errors.push(format!("{} is empty", name));
            }
            if photo.data.len() > self.max_photo_size {
                errors.push(format!(
                    "{} exceeds the {} MB limit",
                    name,
                    self.max_photo_size / (1024 * 1024)
                ));
            }
            if extension_for(&photo.content_type).is_none() {
                errors.push(format!(
                    "{} has unsupported type {}",
                    name, photo.content_type
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::ValidationFailed(errors))
        }
    }

    /// Upload photos in order. On the first failure, photos already stored
    /// for this submission are removed and the submission fails.
    pub async fn upload_all(
        &self,
        profile_id: &str,
        photos: Vec<PhotoUpload>,
    ) -> Result<Vec<StoredPhoto>> {
        let timestamp = Utc::now().timestamp_millis();
        let mut stored = Vec::with_capacity(photos.len());

        for (index, photo) in photos.into_iter().enumerate() {
            let extension = extension_for(&photo.content_type).ok_or_else(|| {
                AppError::validation(format!("unsupported photo type {}", photo.content_type))
            })?;
            let key = photo_key(profile_id, timestamp, index, extension);

            match self.storage.put(&key, photo.data, &photo.content_type).await {
                Ok(url) => stored.push(StoredPhoto { key, url }),
                Err(e) => {
                    tracing::error!("Photo upload {} failed: {}", key, e);
                    self.discard(&stored).await;
                    return Err(match e {
                        AppError::UploadFailed(msg) => AppError::UploadFailed(msg),
                        other => AppError::UploadFailed(other.to_string()),
                    });
                }
            }
        }

        tracing::debug!("Uploaded {} photos for profile {}", stored.len(), profile_id);

        Ok(stored)
    }

    /// Best-effort removal; failures are logged and otherwise ignored
    pub async fn discard(&self, photos: &[StoredPhoto]) {
        for photo in photos {
            if let Err(e) = self.storage.remove(&photo.key).await {
                tracing::warn!("Failed to remove orphaned photo {}: {}", photo.key, e);
            }
        }
    }
}

/// Object key: `{profile_id}/{timestamp_ms}-{index}.{ext}`, with the profile
/// id escaped into a single path segment
pub fn photo_key(profile_id: &str, timestamp_ms: i64, index: usize, extension: &str) -> String {
    format!(
        "{}/{}-{}.{}",
        key_segment(profile_id),
        timestamp_ms,
        index,
        extension
    )
}

/// Escape every byte outside `[A-Za-z0-9_-]` as `~XX`. The result is a single
/// URL-safe path segment, so `/` and `.` never reach the key verbatim.
fn key_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_') {
            out.push(byte as char);
        } else {
            out.push_str(&format!("~{:02X}", byte));
        }
    }
    out
}

/// File extension for an accepted image content type
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    ALLOWED_PHOTO_TYPES
        .iter()
        .find(|(allowed, _)| *allowed == mime)
        .map(|(_, ext)| *ext)
}

#[cfg(test)]
pub(crate) mod fakes {
    use super::*;
    use tokio::sync::Mutex;

    /// Records stored keys; fails the `fail_at`-th put (0-based)
    #[derive(Default)]
    pub(crate) struct FakeStorage {
        pub fail_at: Option<usize>,
        pub stored: Mutex<Vec<String>>,
        pub removed: Mutex<Vec<String>>,
        pub puts: Mutex<usize>,
    }

    #[async_trait]
    impl PhotoStorage for FakeStorage {
        async fn put(&self, key: &str, _data: Vec<u8>, _content_type: &str) -> Result<String> {
            let mut puts = self.puts.lock().await;
            let attempt = *puts;
            *puts += 1;
            if self.fail_at == Some(attempt) {
                return Err(AppError::UploadFailed("storage offline".to_string()));
            }
            self.stored.lock().await.push(key.to_string());
            Ok(format!("http://storage.test/report-photos/{}", key))
        }

        async fn remove(&self, key: &str) -> Result<()> {
            self.removed.lock().await.push(key.to_string());
            Ok(())
        }
    }

    pub(crate) fn jpeg(name: &str) -> PhotoUpload {
        PhotoUpload {
            file_name: Some(name.to_string()),
            content_type: "image/jpeg".to_string(),
            data: vec![0xFF, 0xD8, 0xFF],
        }
    }
}
