use crate::api::models::yoto_uri;
use crate::api::YotoApi;
use crate::commands::CommandError;
use crate::output;
use std::path::Path;

/// List public icons (optionally filtered by tag) or the user's own.
pub async fn list<A: YotoApi + ?Sized>(
    api: &A,
    mine: bool,
    tag: Option<String>,
    json: bool,
) -> Result<(), CommandError> {
    if mine {
        let icons = api.list_user_icons().await?;
        if json {
            output::json(&icons);
            return Ok(());
        }
        if icons.is_empty() {
            output::info("No custom icons found.");
            return Ok(());
        }
        let rows: Vec<Vec<String>> = icons
            .iter()
            .map(|icon| {
                vec![
                    icon.media_id.clone(),
                    if icon.public { "yes" } else { "no" }.to_string(),
                    icon.created_at.clone(),
                ]
            })
            .collect();
        output::table(&["Media ID", "Public", "Created"], &rows);
        return Ok(());
    }

    let mut icons = api.list_public_icons().await?;
    if let Some(tag) = &tag {
        icons.retain(|icon| icon.public_tags.iter().any(|t| t == tag));
    }

    if json {
        output::json(&icons);
        return Ok(());
    }
    if icons.is_empty() {
        output::info("No icons found.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = icons
        .iter()
        .map(|icon| {
            vec![
                icon.title.clone().unwrap_or_else(|| "-".to_string()),
                icon.media_id.clone(),
                icon.public_tags.join(", "),
            ]
        })
        .collect();
    output::table(&["Title", "Media ID", "Tags"], &rows);
    Ok(())
}

/// Upload a custom icon image. The server resizes to 16x16 unless
/// `auto_convert` is off.
pub async fn upload<A: YotoApi + ?Sized>(
    api: &A,
    file: &Path,
    auto_convert: bool,
    json: bool,
) -> Result<(), CommandError> {
    let bytes = tokio::fs::read(file).await?;
    let filename = file
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "icon".to_string());

    let uploaded = api.upload_icon(bytes, &filename, auto_convert).await?;

    if json {
        output::json(&uploaded);
        return Ok(());
    }

    output::success("Icon uploaded");
    output::info(&format!("Media ID: {}", uploaded.media_id));
    output::info(&format!(
        "Use with: --icon \"{}\"",
        yoto_uri(&uploaded.media_id)
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockYotoApi;

    #[tokio::test]
    async fn test_upload_reads_file_and_returns_media_id() {
        let api = MockYotoApi::new();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icon.png");
        std::fs::write(&path, b"png").unwrap();

        upload(&api, &path, true, false).await.unwrap();
        assert_eq!(api.icon_uploads(), 1);
    }

    #[tokio::test]
    async fn test_upload_missing_file_is_io_error() {
        let api = MockYotoApi::new();
        let err = upload(&api, Path::new("/definitely/missing.png"), true, false)
            .await
            .unwrap_err();
        match err {
            CommandError::Io(_) => {}
            other => panic!("expected Io error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_variants_parse_both_shapes() {
        let api = MockYotoApi::new();
        list(&api, false, Some("music".to_string()), false)
            .await
            .unwrap();
        list(&api, true, None, false).await.unwrap();
    }
}
