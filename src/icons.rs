//! Icon reference resolution.
//!
//! A user-supplied icon can be an existing `yoto:#` reference, a bare media
//! id, or a local image file that first needs uploading. Everything
//! normalizes to a media id.

use crate::api::{ApiError, YotoApi};
use crate::api::models::YOTO_URI_PREFIX;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Media id used when a command needs an icon and the user gave none.
pub const DEFAULT_ICON_MEDIA_ID: &str = "aUm9i3ex3qqAMYBv-i-O-pYMKuMJGICtR3Vhf289u2Q";

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

#[derive(Error, Debug)]
pub enum IconError {
    #[error("Icon file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Resolves icon references to media ids, uploading local files on the way.
///
/// The fallback icon is a field rather than a call-site literal so tests
/// (and embedders) can substitute their own.
pub struct IconResolver<'a, A: YotoApi + ?Sized> {
    api: &'a A,
    default_icon: String,
}

impl<'a, A: YotoApi + ?Sized> IconResolver<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            default_icon: DEFAULT_ICON_MEDIA_ID.to_string(),
        }
    }

    pub fn with_default_icon(api: &'a A, default_icon: String) -> Self {
        Self { api, default_icon }
    }

    pub fn default_media_id(&self) -> &str {
        &self.default_icon
    }

    /// Resolve an optional reference, falling back to the default icon.
    pub async fn resolve_or_default(&self, reference: Option<&str>) -> Result<String, IconError> {
        match reference {
            Some(reference) => self.resolve(reference).await,
            None => Ok(self.default_icon.clone()),
        }
    }

    /// Normalize a reference to a media id.
    ///
    /// `yoto:#` references are stripped and trusted verbatim. Strings that
    /// look like a local path must exist and are uploaded (the server
    /// resizes to 16x16). Anything else is assumed to already be a media
    /// id; a bad one only surfaces when the server rejects the document
    /// write that uses it.
    pub async fn resolve(&self, reference: &str) -> Result<String, IconError> {
        if let Some(media_id) = reference.strip_prefix(YOTO_URI_PREFIX) {
            return Ok(media_id.to_string());
        }

        if looks_like_image_path(reference) {
            let path = Path::new(reference);
            if !path.exists() {
                return Err(IconError::FileNotFound(path.to_path_buf()));
            }

            info!("Uploading icon {}", reference);
            let bytes = tokio::fs::read(path).await?;
            let filename = path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| "icon".to_string());

            let uploaded = self.api.upload_icon(bytes, &filename, true).await?;
            return Ok(uploaded.media_id);
        }

        Ok(reference.to_string())
    }
}

/// Local-path heuristic: an explicit path prefix or an image extension.
fn looks_like_image_path(reference: &str) -> bool {
    if reference.starts_with("./") || reference.starts_with("../") || reference.starts_with('/') {
        return true;
    }

    match Path::new(reference).extension() {
        Some(ext) => {
            let ext = ext.to_string_lossy().to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockYotoApi;

    #[test]
    fn test_path_heuristic() {
        assert!(looks_like_image_path("./icon.png"));
        assert!(looks_like_image_path("../art/icon.jpg"));
        assert!(looks_like_image_path("/tmp/icon.gif"));
        assert!(looks_like_image_path("cover.JPEG"));
        assert!(!looks_like_image_path("aUm9i3ex3qqAMYBv"));
        assert!(!looks_like_image_path("icon.svg"));
    }

    #[tokio::test]
    async fn test_yoto_reference_is_stripped_verbatim() {
        let api = MockYotoApi::new();
        let resolver = IconResolver::new(&api);
        assert_eq!(resolver.resolve("yoto:#abc123").await.unwrap(), "abc123");
    }

    #[tokio::test]
    async fn test_bare_string_is_trusted_as_media_id() {
        let api = MockYotoApi::new();
        let resolver = IconResolver::new(&api);
        assert_eq!(resolver.resolve("abc123").await.unwrap(), "abc123");
    }

    #[tokio::test]
    async fn test_missing_file_is_a_descriptive_error() {
        let api = MockYotoApi::new();
        let resolver = IconResolver::new(&api);
        let err = resolver.resolve("./definitely-missing.png").await.unwrap_err();
        match err {
            IconError::FileNotFound(path) => {
                assert_eq!(path, PathBuf::from("./definitely-missing.png"));
            }
            other => panic!("expected FileNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_local_file_uploads_and_dedups() {
        let api = MockYotoApi::new();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icon.png");
        std::fs::write(&path, b"png bytes").unwrap();
        let reference = path.to_string_lossy().to_string();

        let resolver = IconResolver::new(&api);
        let first = resolver.resolve(&reference).await.unwrap();
        let second = resolver.resolve(&reference).await.unwrap();

        // Byte-identical content resolves to the same media id.
        assert_eq!(first, second);
        assert_eq!(api.icon_uploads(), 2);
    }

    #[tokio::test]
    async fn test_default_icon_is_injectable() {
        let api = MockYotoApi::new();
        let resolver = IconResolver::with_default_icon(&api, "custom-default".to_string());
        assert_eq!(
            resolver.resolve_or_default(None).await.unwrap(),
            "custom-default"
        );
        assert_eq!(
            resolver.resolve_or_default(Some("yoto:#x")).await.unwrap(),
            "x"
        );
    }
}
