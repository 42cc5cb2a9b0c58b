use super::{retry_with_backoff, sleep, ApiClient, ApiError, ApiResult, RetryPolicy};
use crate::models::{MediaFile, MediaType};
use crate::util::{format_file_size, now_ms};
use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

const MB: u64 = 1024 * 1024;
const LIST_LIMIT: u32 = 100;

/// A file picked in the browser, already read into memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct UploadFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct UploadPolicy {
    pub max_image_bytes: u64,
    pub max_video_bytes: u64,
    pub allow_video: bool,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_image_bytes: 10 * MB,
            max_video_bytes: 50 * MB,
            allow_video: true,
        }
    }
}

impl UploadPolicy {
    pub fn images_only() -> Self {
        Self {
            allow_video: false,
            ..Self::default()
        }
    }
}

/// Type and size gate applied before any request is made.
pub(crate) fn validate_upload(file: &UploadFile, policy: &UploadPolicy) -> ApiResult<MediaType> {
    let media_type = match MediaType::from_mime(&file.mime) {
        Some(MediaType::Video) if !policy.allow_video => {
            return Err(ApiError::validation("Only image files can be uploaded here."));
        }
        Some(t) => t,
        None => {
            return Err(ApiError::validation(
                "Only image or video files can be uploaded.",
            ));
        }
    };

    let limit = match media_type {
        MediaType::Image => policy.max_image_bytes,
        MediaType::Video => policy.max_video_bytes,
    };
    if file.size() > limit {
        return Err(ApiError::validation(format!(
            "{} is {}; the limit for {} files is {}.",
            file.name,
            format_file_size(file.size()),
            media_type,
            format_file_size(limit)
        )));
    }

    Ok(media_type)
}

/// `<folder>/<unix_ms>-<name>` with path separators in the name flattened.
pub(crate) fn object_path(folder: &str, file_name: &str, stamp_ms: i64) -> String {
    let name = file_name.replace(['/', '\\'], "_");
    let folder = folder.trim_matches('/');
    if folder.is_empty() {
        format!("{stamp_ms}-{name}")
    } else {
        format!("{folder}/{stamp_ms}-{name}")
    }
}

#[async_trait(?Send)]
pub(crate) trait MediaStore {
    /// Validates, uploads with retry, and returns the public URL.
    async fn upload_file(&self, file: &UploadFile, folder: &str, policy: &UploadPolicy) -> ApiResult<String>;

    async fn list_files(&self) -> ApiResult<Vec<MediaFile>>;

    async fn delete_files(&self, paths: &[String]) -> ApiResult<()>;
}

#[derive(Deserialize, Clone, Debug, Default)]
struct ObjectMetadata {
    #[serde(default)]
    mimetype: Option<String>,
    #[serde(default)]
    size: Option<u64>,
}

#[derive(Deserialize, Clone, Debug)]
struct StorageObject {
    name: String,
    /// `None` for folder placeholders.
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    metadata: Option<ObjectMetadata>,
}

impl StorageObject {
    fn into_media_file(self, prefix: &str) -> Option<MediaFile> {
        let id = self.id?;
        let meta = self.metadata.unwrap_or_default();
        let file_path = if prefix.is_empty() {
            self.name.clone()
        } else {
            format!("{prefix}/{}", self.name)
        };
        Some(MediaFile {
            id,
            file_name: self.name,
            file_path,
            file_type: meta.mimetype.unwrap_or_default(),
            file_size: meta.size.unwrap_or(0),
            created_at: self.created_at.unwrap_or_default(),
        })
    }
}

#[derive(Serialize)]
struct SortBy {
    column: &'static str,
    order: &'static str,
}

#[derive(Serialize)]
struct ListRequest<'a> {
    prefix: &'a str,
    limit: u32,
    offset: u32,
    #[serde(rename = "sortBy")]
    sort_by: SortBy,
}

#[derive(Serialize)]
struct RemoveRequest<'a> {
    prefixes: &'a [String],
}

impl ApiClient {
    async fn put_object(&self, path: &str, file: &UploadFile) -> ApiResult<()> {
        let url = self.object_url("object", path);
        let req = self
            .request(Method::POST, url)
            .header("Content-Type", file.mime.as_str())
            .header("cache-control", "3600")
            .header("x-upsert", "true")
            .body(file.bytes.clone());
        Self::send(req, "Upload file").await?;
        Ok(())
    }

    async fn list_prefix(&self, prefix: &str) -> ApiResult<Vec<StorageObject>> {
        let url = self.storage_url(&format!("object/list/{}", self.config.storage_bucket));
        let body = ListRequest {
            prefix,
            limit: LIST_LIMIT,
            offset: 0,
            sort_by: SortBy {
                column: "created_at",
                order: "desc",
            },
        };
        let res = Self::send(self.request(Method::POST, url).json(&body), "List media").await?;
        Self::read_json(res).await
    }
}

#[async_trait(?Send)]
impl MediaStore for ApiClient {
    async fn upload_file(&self, file: &UploadFile, folder: &str, policy: &UploadPolicy) -> ApiResult<String> {
        validate_upload(file, policy)?;

        let path = object_path(folder, &file.name, now_ms());
        tracing::debug!("uploading {} ({}) to {path}", file.name, format_file_size(file.size()));

        retry_with_backoff(&RetryPolicy::upload(), || self.put_object(&path, file), sleep)
            .await
            .map_err(|e| {
                tracing::error!("upload of {} failed: {e}", file.name);
                e.into_upload_error()
            })?;

        Ok(self.public_url(&path))
    }

    /// Bucket root plus one level of folders.
    async fn list_files(&self) -> ApiResult<Vec<MediaFile>> {
        let mut files = Vec::new();
        for obj in self.list_prefix("").await? {
            if obj.id.is_some() {
                files.extend(obj.into_media_file(""));
                continue;
            }
            let folder = obj.name;
            for child in self.list_prefix(&folder).await? {
                files.extend(child.into_media_file(&folder));
            }
        }
        files.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(files)
    }

    async fn delete_files(&self, paths: &[String]) -> ApiResult<()> {
        if paths.is_empty() {
            return Ok(());
        }
        let url = self.storage_url(&format!("object/{}", self.config.storage_bucket));
        let req = self
            .request(Method::DELETE, url)
            .json(&RemoveRequest { prefixes: paths });
        Self::send(req, "Delete media").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiErrorKind;

    fn file(mime: &str, size: usize) -> UploadFile {
        UploadFile {
            name: "clip.bin".to_string(),
            mime: mime.to_string(),
            bytes: vec![0; size],
        }
    }

    #[test]
    fn test_image_size_gate() {
        let policy = UploadPolicy::default();
        assert_eq!(
            validate_upload(&file("image/png", 10 * MB as usize), &policy).ok(),
            Some(MediaType::Image)
        );
        let too_big = validate_upload(&file("image/png", 10 * MB as usize + 1), &policy);
        assert_eq!(too_big.map_err(|e| e.kind), Err(ApiErrorKind::Validation));
    }

    #[test]
    fn test_video_has_larger_limit() {
        let policy = UploadPolicy::default();
        assert!(validate_upload(&file("video/mp4", 20 * MB as usize), &policy).is_ok());
        assert!(validate_upload(&file("video/mp4", 50 * MB as usize + 1), &policy).is_err());
    }

    #[test]
    fn test_rejects_unsupported_types() {
        assert!(validate_upload(&file("application/pdf", 10), &UploadPolicy::default()).is_err());
        assert!(validate_upload(&file("video/mp4", 10), &UploadPolicy::images_only()).is_err());
    }

    #[test]
    fn test_object_path() {
        assert_eq!(object_path("projects", "shot 1.png", 1700), "projects/1700-shot 1.png");
        assert_eq!(object_path("/media/", "a/b.png", 5), "media/5-a_b.png");
        assert_eq!(object_path("", "x.png", 5), "5-x.png");
    }

    #[test]
    fn test_storage_object_listing_contract() {
        let json = r#"[
            {"name": "projects", "id": null, "metadata": null},
            {"name": "1737331200000-hero.jpg", "id": "f1", "created_at": "2025-01-20T00:00:00Z",
             "metadata": {"mimetype": "image/jpeg", "size": 2048576}}
        ]"#;
        let objects: Vec<StorageObject> = serde_json::from_str(json).expect("listing should parse");
        let mut it = objects.into_iter();

        let folder = it.next().expect("folder entry");
        assert!(folder.into_media_file("").is_none());

        let f = it
            .next()
            .and_then(|o| o.into_media_file("content"))
            .expect("file entry");
        assert_eq!(f.file_path, "content/1737331200000-hero.jpg");
        assert_eq!(f.file_type, "image/jpeg");
        assert_eq!(f.file_size, 2_048_576);
    }
}
