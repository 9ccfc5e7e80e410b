//! Provider credentials in the OS keyring
//!
//! Each credential is a keyring entry under the `liam` service, named after
//! the environment variable it stands in for. A `0600` file in the config
//! directory backs it up when the keyring is unavailable.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

const SERVICE_NAME: &str = "liam";

/// A stored provider API key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    account: String,
}

impl Credential {
    /// Credential standing in for the `env_var` environment variable
    pub fn for_env_var(env_var: &str) -> Self {
        Self {
            account: env_var.to_lowercase().replace('_', "-"),
        }
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    fn entry(&self) -> Option<keyring::Entry> {
        keyring::Entry::new(SERVICE_NAME, &self.account).ok()
    }

    fn fallback_path(&self) -> Result<PathBuf> {
        let path = crate::config::config_path()?;
        let dir = path.parent().context("Config path has no parent")?;
        Ok(dir.join(format!("{}.key", self.account)))
    }

    /// Store the key, in the keyring when possible and always in the file
    pub fn store(&self, key: &str) -> Result<()> {
        let in_keyring = self
            .entry()
            .map(|entry| entry.set_password(key).is_ok())
            .unwrap_or(false);
        if !in_keyring {
            println!("Note: Using file-based storage (keyring unavailable)");
        }
        self.write_fallback(key)
    }

    fn write_fallback(&self, key: &str) -> Result<()> {
        let path = self.fallback_path()?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("Failed to create config directory")?;
        }
        fs::write(&path, key).context("Failed to write API key file")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))
                .context("Failed to set file permissions")?;
        }

        Ok(())
    }

    /// Read the key from the keyring, then the fallback file
    pub fn load(&self) -> Result<String> {
        if let Some(key) = self.entry().and_then(|entry| entry.get_password().ok()) {
            return Ok(key);
        }
        debug!("No keyring entry for {}, trying fallback file", self.account);

        let path = self.fallback_path()?;
        let key = fs::read_to_string(&path)
            .context("Failed to read API key. Run 'liam config --set-api-key YOUR_KEY' first.")?;
        Ok(key.trim().to_string())
    }

    /// Remove the key from both places
    pub fn delete(&self) -> Result<()> {
        if let Some(entry) = self.entry() {
            let _ = entry.delete_credential();
        }

        let path = self.fallback_path()?;
        if path.exists() {
            fs::remove_file(&path).context("Failed to delete API key file")?;
        }
        Ok(())
    }

    pub fn exists(&self) -> bool {
        self.load().map(|key| !key.is_empty()).unwrap_or(false)
    }
}
