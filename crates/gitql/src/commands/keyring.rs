//! Keyring operations for secure token storage.
//!
//! Stores the GitHub token in the OS-native credential manager:
//! - macOS: Keychain
//! - Windows: Credential Manager
//! - Linux: Secret Service API (requires libsecret)

use keyring::Entry;

use super::{CommandError, Result};

/// Service name for keyring entries.
const SERVICE: &str = "gitql-cli";

/// Username for the token entry.
const USERNAME: &str = "github_token";

const ALTERNATIVE: &str =
    "Alternative: set the GITHUB_TOKEN environment variable or run 'gitql config set token <TOKEN>'";

/// Appends a platform-specific hint to storage errors.
fn platform_hint(error: &keyring::Error) -> String {
    match error {
        keyring::Error::NoStorageAccess(_) | keyring::Error::PlatformFailure(_) => {
            format!("{}\n\nHint: {}\n{}", error, platform_access_hint(), ALTERNATIVE)
        }
        _ => error.to_string(),
    }
}

#[cfg(target_os = "linux")]
fn platform_access_hint() -> &'static str {
    "On Linux, gitql uses the Secret Service API (libsecret).\n\
     Make sure a provider such as gnome-keyring or kwallet is installed and running,\n\
     and that a D-Bus session bus is available (try 'eval $(dbus-launch --sh-syntax)')."
}

#[cfg(target_os = "macos")]
fn platform_access_hint() -> &'static str {
    "On macOS, gitql uses the Keychain.\n\
     Check that your login keychain is unlocked and allow 'gitql' access when prompted."
}

#[cfg(target_os = "windows")]
fn platform_access_hint() -> &'static str {
    "On Windows, gitql uses Credential Manager.\n\
     Check that the Credential Manager service is running."
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn platform_access_hint() -> &'static str {
    "Your platform's credential storage is not accessible."
}

fn entry() -> Result<Entry> {
    Entry::new(SERVICE, USERNAME).map_err(|e| CommandError::Keyring(platform_hint(&e)))
}

/// Stores token in OS keyring.
pub fn store_token(token: &str) -> Result<()> {
    entry()?.set_password(token).map_err(|e| {
        CommandError::Keyring(format!("Failed to store token: {}", platform_hint(&e)))
    })
}

/// Retrieves token from OS keyring.
///
/// Returns `Ok(None)` if no token is stored.
pub fn get_token() -> Result<Option<String>> {
    match entry()?.get_password() {
        Ok(token) => Ok(Some(token)),
        Err(keyring::Error::NoEntry) | Err(keyring::Error::Ambiguous(_)) => Ok(None),
        Err(e) => Err(CommandError::Keyring(format!(
            "Failed to read token: {}",
            platform_hint(&e)
        ))),
    }
}

/// Deletes token from OS keyring. Succeeds when nothing was stored.
pub fn delete_token() -> Result<()> {
    match entry()?.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(CommandError::Keyring(format!(
            "Failed to delete token: {}",
            platform_hint(&e)
        ))),
    }
}

/// Lightweight availability check; some keyrings only fail on actual reads.
pub fn is_available() -> bool {
    Entry::new(SERVICE, "probe").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_available_does_not_panic() {
        let available = is_available();
        println!("Keyring available: {}", available);
    }

    #[test]
    fn test_platform_hint_no_entry_returns_base_error() {
        let hint = platform_hint(&keyring::Error::NoEntry);
        assert!(!hint.contains("Hint:"));
    }

    #[test]
    fn test_platform_hint_bad_encoding_returns_base_error() {
        let hint = platform_hint(&keyring::Error::BadEncoding(vec![0x80, 0x81]));
        assert!(!hint.contains("Hint:"));
    }

    #[test]
    fn test_alternative_mentions_env_and_config() {
        assert!(ALTERNATIVE.contains("GITHUB_TOKEN"));
        assert!(ALTERNATIVE.contains("gitql config set token"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_linux_access_hint_mentions_secret_service() {
        let hint = platform_access_hint();
        assert!(hint.contains("Secret Service"));
        assert!(hint.contains("gnome-keyring"));
    }

    // store/get/delete touch the user's real keyring and are exercised manually.
}
