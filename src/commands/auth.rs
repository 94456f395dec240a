use crate::auth::{stored_tokens_from, AuthClient};
use crate::commands::CommandError;
use crate::config::ConfigStore;
use crate::output;
use chrono::Utc;

/// Interactive device-code login. Prints the verification URL and code,
/// then blocks until the user approves (or the code expires).
pub async fn login(store: &ConfigStore) -> Result<(), CommandError> {
    let auth = AuthClient::new();
    let device = auth.request_device_code().await?;

    output::info(&format!(
        "Visit {} to authorize this device",
        device.verification_uri_complete
    ));
    output::info(&format!("Code: {}", device.user_code));
    output::info("Waiting for authorization...");

    let tokens = auth.poll_for_token(&device).await?;
    store.save(&stored_tokens_from(&tokens))?;
    output::success("Logged in");
    Ok(())
}

pub async fn logout(store: &ConfigStore) -> Result<(), CommandError> {
    store.clear()?;
    output::success("Logged out");
    Ok(())
}

pub async fn status(store: &ConfigStore) -> Result<(), CommandError> {
    match store.load()? {
        None => output::info("Not logged in."),
        Some(tokens) => {
            let now = Utc::now().timestamp();
            if tokens.is_expired(now) {
                output::info("Logged in (access token expired; it will refresh on next use)");
            } else {
                let minutes = (tokens.expires_at - now) / 60;
                output::info(&format!(
                    "Logged in. Access token expires in {} minutes",
                    minutes
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoredTokens;

    #[tokio::test]
    async fn test_logout_clears_stored_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::with_dir(dir.path());
        store
            .save(&StoredTokens {
                access_token: "a".to_string(),
                refresh_token: "r".to_string(),
                expires_at: 0,
            })
            .unwrap();

        logout(&store).await.unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[tokio::test]
    async fn test_status_handles_missing_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::with_dir(dir.path());
        status(&store).await.unwrap();
    }
}
