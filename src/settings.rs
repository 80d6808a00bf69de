// Wizard settings
// Layered: built-in defaults, an optional TOML file, SCHOOL_WIZARDS_* env vars.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_BACKEND_URL: &str = "https://localhost/univention/";
pub const DEFAULT_SETTINGS_BASENAME: &str = "school-wizards";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardSettings {
    /// Base URL of the console backend; command paths are joined below it.
    pub backend_url: String,
    /// School preselected when a wizard session opens; empty means the
    /// operator picks one on the general page.
    pub default_school: String,
    pub request_timeout_secs: u64,
    /// Overrides the `wizard-logs/` folder next to the binary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

impl Default for WizardSettings {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            default_school: String::new(),
            request_timeout_secs: 20,
            log_dir: None,
        }
    }
}

impl WizardSettings {
    /// Load settings. An explicit file must exist; otherwise an optional
    /// `school-wizards.toml` next to the working directory is picked up.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("backend_url", DEFAULT_BACKEND_URL)?
            .set_default("default_school", "")?
            .set_default("request_timeout_secs", 20)?;

        builder = match file {
            Some(path) => builder.add_source(config::File::from(path.to_path_buf())),
            None => builder
                .add_source(config::File::with_name(DEFAULT_SETTINGS_BASENAME).required(false)),
        };

        let settings = builder
            .add_source(config::Environment::with_prefix("SCHOOL_WIZARDS"))
            .build()
            .context("Failed to assemble wizard settings")?;

        settings
            .try_deserialize()
            .context("Invalid wizard settings")
    }

    pub fn backend_url(&self) -> Result<Url> {
        Url::parse(&self.backend_url)
            .with_context(|| format!("Invalid backend URL: {}", self.backend_url))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Write a settings template operators can edit in place.
    pub fn write_template(path: &Path) -> Result<()> {
        let body = toml::to_string_pretty(&Self::default())
            .context("Failed to render settings template")?;
        std::fs::write(path, body)
            .with_context(|| format!("Failed to write settings template to {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_apply_without_a_file() {
        let settings = WizardSettings::load(None).unwrap();
        assert_eq!(settings.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(settings.request_timeout_secs, 20);
        assert!(settings.log_dir.is_none());
        assert!(settings.backend_url().is_ok());
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            "backend_url = \"https://console.example.org/univention/\"\n\
             default_school = \"Example School\"\n\
             request_timeout_secs = 5"
        )
        .unwrap();

        let settings = WizardSettings::load(Some(file.path())).unwrap();
        assert_eq!(
            settings.backend_url,
            "https://console.example.org/univention/"
        );
        assert_eq!(settings.default_school, "Example School");
        assert_eq!(settings.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn template_round_trips_through_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("school-wizards.toml");
        WizardSettings::write_template(&path).unwrap();

        let settings = WizardSettings::load(Some(&path)).unwrap();
        assert_eq!(settings.backend_url, DEFAULT_BACKEND_URL);
    }

    #[test]
    fn invalid_backend_url_is_reported() {
        let settings = WizardSettings {
            backend_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(settings.backend_url().is_err());
    }
}
