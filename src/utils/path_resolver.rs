use anyhow::Result;
use std::path::{Path, PathBuf};

/// Resolve deployment folder (absolute path)
pub fn resolve_deployment_folder() -> Result<PathBuf> {
    // Prefer the folder where the binary is running from (works in dev and deployed)
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(dir) = exe_path.parent() {
            return Ok(dir.to_path_buf());
        }
    }

    // Fallback: current working directory
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    Ok(cwd)
}

/// Resolve log folder (absolute path)
///
/// An explicit override from the settings file wins; otherwise the folder
/// `wizard-logs/` next to the binary is used and created on demand.
pub fn resolve_log_folder(override_dir: Option<&Path>) -> Result<PathBuf> {
    let log_dir = match override_dir {
        Some(dir) => dir.to_path_buf(),
        None => resolve_deployment_folder()?.join("wizard-logs"),
    };

    std::fs::create_dir_all(&log_dir)
        .map_err(|e| anyhow::anyhow!("Failed to create log folder: {}", e))?;
    Ok(log_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_dir_is_created_and_returned() {
        let tmp = tempfile::tempdir().unwrap();
        let wanted = tmp.path().join("nested").join("logs");
        let resolved = resolve_log_folder(Some(&wanted)).unwrap();
        assert_eq!(resolved, wanted);
        assert!(wanted.is_dir());
    }

    #[test]
    fn default_log_folder_is_absolute() {
        let resolved = resolve_log_folder(None).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("wizard-logs"));
    }
}
