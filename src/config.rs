use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Could not determine home directory")]
    NoHomeDirectory,
}

/// OAuth tokens persisted between invocations.
///
/// `expires_at` is computed client-side (unix seconds) from the token
/// response's `expires_in` at the moment the tokens are saved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}

impl StoredTokens {
    /// Whether the access token has expired. A small margin keeps a token
    /// that would die mid-command from counting as valid up front.
    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at - 60
    }
}

/// File-backed credential store.
///
/// Lives at `~/.yoto/config.json`; `YOTO_CONFIG_DIR` overrides the directory
/// so tests can point it at a scratch location.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(dir) = std::env::var("YOTO_CONFIG_DIR") {
            return Ok(ConfigStore {
                dir: PathBuf::from(dir),
            });
        }

        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)?;
        Ok(ConfigStore {
            dir: home.join(".yoto"),
        })
    }

    pub fn with_dir(dir: &Path) -> Self {
        ConfigStore {
            dir: dir.to_path_buf(),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join("config.json")
    }

    /// Load stored tokens. `Ok(None)` means not logged in.
    pub fn load(&self) -> Result<Option<StoredTokens>, ConfigError> {
        let path = self.config_path();
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(&path)?;
        let tokens = serde_json::from_str(&raw)?;
        Ok(Some(tokens))
    }

    pub fn save(&self, tokens: &StoredTokens) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.dir)?;
        let raw = serde_json::to_string_pretty(tokens)?;
        std::fs::write(self.config_path(), raw)?;
        Ok(())
    }

    /// Delete stored tokens. Succeeds when nothing was stored.
    pub fn clear(&self) -> Result<(), ConfigError> {
        let path = self.config_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tokens() -> StoredTokens {
        StoredTokens {
            access_token: "access-123".to_string(),
            refresh_token: "refresh-456".to_string(),
            expires_at: 1_700_000_000,
        }
    }

    #[test]
    fn test_round_trip_through_temp_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ConfigStore::with_dir(dir.path());

        assert_eq!(store.load().unwrap(), None);

        store.save(&sample_tokens()).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample_tokens()));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        // Clearing twice is fine.
        store.clear().unwrap();
    }

    #[test]
    fn test_expiry_includes_safety_margin() {
        let tokens = sample_tokens();
        assert!(!tokens.is_expired(tokens.expires_at - 120));
        assert!(tokens.is_expired(tokens.expires_at - 30));
        assert!(tokens.is_expired(tokens.expires_at + 1));
    }
}
