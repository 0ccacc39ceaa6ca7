//! Local object storage for uploaded images.
//!
//! Each bucket is a directory under `STORAGE_DIR`. Objects are named
//! `<uuid>.<ext>` and served back read-only under `/storage/<bucket>/<file>`.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;

const MB: usize = 1024 * 1024;

/// Largest body any bucket accepts; the payload extractor is configured with it.
pub const MAX_UPLOAD_BYTES: usize = 5 * MB;

static OBJECT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}\.(png|jpg|gif|webp)$")
        .expect("object name pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    TeamLogos,
    EventImages,
    AnnouncementImages,
    SponsorLogos,
    InfoCardImages,
}

impl Bucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::TeamLogos => "team-logos",
            Bucket::EventImages => "event-images",
            Bucket::AnnouncementImages => "announcement-images",
            Bucket::SponsorLogos => "sponsor-logos",
            Bucket::InfoCardImages => "info-card-images",
        }
    }

    pub fn max_bytes(&self) -> usize {
        match self {
            Bucket::TeamLogos | Bucket::SponsorLogos => 2 * MB,
            Bucket::EventImages | Bucket::AnnouncementImages | Bucket::InfoCardImages => 5 * MB,
        }
    }

    /// Players upload their own team logos; every other bucket feeds admin content.
    pub fn requires_admin(&self) -> bool {
        !matches!(self, Bucket::TeamLogos)
    }
}

impl FromStr for Bucket {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "team-logos" => Ok(Bucket::TeamLogos),
            "event-images" => Ok(Bucket::EventImages),
            "announcement-images" => Ok(Bucket::AnnouncementImages),
            "sponsor-logos" => Ok(Bucket::SponsorLogos),
            "info-card-images" => Ok(Bucket::InfoCardImages),
            _ => Err(AppError::NotFound(format!("Unknown bucket '{}'", s))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredObject {
    pub bucket: String,
    pub file_name: String,
    pub url: String,
    pub size: usize,
}

fn extension_for(content_type: &str) -> Option<&'static str> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match mime.as_str() {
        "image/png" => Some("png"),
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

pub fn content_type_for(file_name: &str) -> &'static str {
    match file_name.rsplit('.').next() {
        Some("png") => "image/png",
        Some("jpg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Check an upload against the bucket policy and return the file extension to use.
pub fn validate_upload(
    bucket: Bucket,
    content_type: Option<&str>,
    size: usize,
) -> Result<&'static str, AppError> {
    let extension = content_type.and_then(extension_for).ok_or_else(|| {
        AppError::BadRequest("Only PNG, JPEG, GIF and WebP images are accepted".to_string())
    })?;

    if size == 0 {
        return Err(AppError::BadRequest("Upload is empty".to_string()));
    }
    if size > bucket.max_bytes() {
        return Err(AppError::PayloadTooLarge(format!(
            "{} accepts images up to {} MB",
            bucket.as_str(),
            bucket.max_bytes() / MB
        )));
    }

    Ok(extension)
}

/// Resolve a stored object's path, refusing names that were not issued by [`store_upload`].
pub fn object_path(config: &Config, bucket: Bucket, file_name: &str) -> Result<PathBuf, AppError> {
    if !OBJECT_NAME.is_match(file_name) {
        return Err(AppError::NotFound("File not found".to_string()));
    }

    Ok(PathBuf::from(&config.storage_dir)
        .join(bucket.as_str())
        .join(file_name))
}

pub async fn store_upload(
    config: &Config,
    bucket: Bucket,
    content_type: Option<&str>,
    body: &[u8],
) -> Result<StoredObject, AppError> {
    let extension = validate_upload(bucket, content_type, body.len())?;

    let file_name = format!("{}.{}", Uuid::new_v4(), extension);
    let dir = PathBuf::from(&config.storage_dir).join(bucket.as_str());

    tokio::fs::create_dir_all(&dir).await.map_err(|e| {
        log::error!("Failed to create bucket directory {}: {}", dir.display(), e);
        AppError::internal_server_error_message("Could not store upload")
    })?;
    tokio::fs::write(dir.join(&file_name), body)
        .await
        .map_err(|e| {
            log::error!("Failed to write {}/{}: {}", bucket.as_str(), file_name, e);
            AppError::internal_server_error_message("Could not store upload")
        })?;

    log::info!(
        "Stored {} bytes in {}/{}",
        body.len(),
        bucket.as_str(),
        file_name
    );

    Ok(StoredObject {
        bucket: bucket.as_str().to_string(),
        url: format!(
            "{}/storage/{}/{}",
            config.public_base_url.trim_end_matches('/'),
            bucket.as_str(),
            file_name
        ),
        file_name,
        size: body.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> Config {
        Config {
            database_url: "postgres://localhost/test".to_string(),
            jwt_secret: "secret".to_string(),
            jwt_expiration_days: 1,
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            client_base_url: "http://localhost:5173".to_string(),
            storage_dir: dir.path().display().to_string(),
            public_base_url: "https://cdn.example.com/".to_string(),
        }
    }

    #[test]
    fn test_bucket_limits() {
        assert_eq!(Bucket::TeamLogos.max_bytes(), 2 * MB);
        assert_eq!(Bucket::SponsorLogos.max_bytes(), 2 * MB);
        assert_eq!(Bucket::EventImages.max_bytes(), 5 * MB);
        assert!(!Bucket::TeamLogos.requires_admin());
        assert!(Bucket::InfoCardImages.requires_admin());
        assert!("avatars".parse::<Bucket>().is_err());
        assert_eq!(
            "announcement-images".parse::<Bucket>().unwrap(),
            Bucket::AnnouncementImages
        );
    }

    #[test]
    fn test_validate_upload() {
        assert_eq!(
            validate_upload(Bucket::TeamLogos, Some("image/png"), 1024).unwrap(),
            "png"
        );
        assert_eq!(
            validate_upload(Bucket::EventImages, Some("IMAGE/JPEG; charset=binary"), 1024)
                .unwrap(),
            "jpg"
        );
        assert!(matches!(
            validate_upload(Bucket::TeamLogos, Some("application/pdf"), 1024),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            validate_upload(Bucket::TeamLogos, None, 1024),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            validate_upload(Bucket::TeamLogos, Some("image/png"), 0),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            validate_upload(Bucket::TeamLogos, Some("image/png"), 2 * MB + 1),
            Err(AppError::PayloadTooLarge(_))
        ));
        assert!(validate_upload(Bucket::EventImages, Some("image/webp"), 2 * MB + 1).is_ok());
    }

    #[test]
    fn test_object_path_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        assert!(object_path(&config, Bucket::TeamLogos, "../secrets.png").is_err());
        assert!(object_path(&config, Bucket::TeamLogos, "logo.png").is_err());

        let name = format!("{}.png", Uuid::new_v4());
        let path = object_path(&config, Bucket::TeamLogos, &name).unwrap();
        assert!(path.ends_with(format!("team-logos/{}", name)));
    }

    #[actix_web::test]
    async fn test_store_upload_writes_file() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let body = vec![0x89, b'P', b'N', b'G'];

        let stored = store_upload(&config, Bucket::TeamLogos, Some("image/png"), &body)
            .await
            .unwrap();

        assert_eq!(stored.size, 4);
        assert!(stored.file_name.ends_with(".png"));
        assert_eq!(
            stored.url,
            format!("https://cdn.example.com/storage/team-logos/{}", stored.file_name)
        );
        assert_eq!(content_type_for(&stored.file_name), "image/png");

        let path = object_path(&config, Bucket::TeamLogos, &stored.file_name).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), body);
    }
}
