// ABOUTME: Workspace directory resolution
// ABOUTME: Locates the folder holding requests, drafts, scheduled and posted records

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name of the workspace folder created under the home directory
pub const WORKSPACE_DIR_NAME: &str = "ElbitatAds";

/// Get the default workspace path (~/ElbitatAds)
pub fn default_workspace_dir() -> PathBuf {
    // First try HOME environment variable (useful for tests)
    if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(WORKSPACE_DIR_NAME)
    } else if let Some(home) = dirs::home_dir() {
        home.join(WORKSPACE_DIR_NAME)
    } else {
        env::temp_dir().join(WORKSPACE_DIR_NAME)
    }
}

/// Create the workspace directory, falling back to the temp directory when the
/// preferred location cannot be written to.
pub fn resolve_workspace_dir(preferred: &Path) -> PathBuf {
    if is_writable_dir(preferred) {
        return preferred.to_path_buf();
    }

    let fallback = env::temp_dir().join(WORKSPACE_DIR_NAME);
    warn!(
        "Workspace {:?} is not writable, using {:?} instead",
        preferred, fallback
    );
    if let Err(e) = fs::create_dir_all(&fallback) {
        warn!("Failed to create fallback workspace {:?}: {}", fallback, e);
    }
    fallback
}

fn is_writable_dir(path: &Path) -> bool {
    if fs::create_dir_all(path).is_err() {
        return false;
    }

    let probe = path.join(".write_test");
    match fs::write(&probe, b"") {
        Ok(()) => {
            let _ = fs::remove_file(&probe);
            debug!("Workspace {:?} is writable", path);
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn test_default_workspace_uses_home() {
        let temp = TempDir::new().unwrap();
        let original = env::var("HOME").ok();
        env::set_var("HOME", temp.path());

        assert_eq!(default_workspace_dir(), temp.path().join("ElbitatAds"));

        match original {
            Some(home) => env::set_var("HOME", home),
            None => env::remove_var("HOME"),
        }
    }

    #[test]
    fn test_resolve_creates_preferred_dir() {
        let temp = TempDir::new().unwrap();
        let preferred = temp.path().join("nested").join("ws");

        let resolved = resolve_workspace_dir(&preferred);

        assert_eq!(resolved, preferred);
        assert!(preferred.is_dir());
        assert!(!preferred.join(".write_test").exists());
    }

    #[test]
    fn test_resolve_falls_back_when_path_is_a_file() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "not a dir").unwrap();

        let resolved = resolve_workspace_dir(&blocker.join("ws"));

        assert_eq!(resolved, env::temp_dir().join(WORKSPACE_DIR_NAME));
    }
}
