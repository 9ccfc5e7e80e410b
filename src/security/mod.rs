//! Credential handling
//!
//! The provider API key comes from its environment variable when set, and
//! otherwise from the stored [`keyring::Credential`] for that variable.

pub mod keyring;

use anyhow::Result;

use self::keyring::Credential;

/// Environment variable used when no configuration is available
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

fn configured_credential() -> Credential {
    let env_var = crate::config::Config::load()
        .map(|config| config.provider.api_key_env)
        .unwrap_or_else(|_| DEFAULT_API_KEY_ENV.to_string());
    Credential::for_env_var(&env_var)
}

/// Store the configured provider's API key
pub fn set_api_key(key: &str) -> Result<()> {
    configured_credential().store(key)
}

/// Delete the configured provider's stored API key
pub fn delete_api_key() -> Result<()> {
    configured_credential().delete()
}

/// API key from `env_var`, falling back to its stored credential
pub fn resolve_api_key(env_var: &str) -> Option<String> {
    match std::env::var(env_var) {
        Ok(key) if !key.trim().is_empty() => Some(key.trim().to_string()),
        _ => Credential::for_env_var(env_var).load().ok().filter(|key| !key.is_empty()),
    }
}

/// Check if an API key is available for `env_var`
pub fn has_api_key(env_var: &str) -> bool {
    std::env::var(env_var).map(|k| !k.trim().is_empty()).unwrap_or(false)
        || Credential::for_env_var(env_var).exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_wins() {
        std::env::set_var("LIAM_TEST_API_KEY", "  env-key ");
        assert_eq!(resolve_api_key("LIAM_TEST_API_KEY").as_deref(), Some("env-key"));
        assert!(has_api_key("LIAM_TEST_API_KEY"));
        std::env::remove_var("LIAM_TEST_API_KEY");
    }
}
