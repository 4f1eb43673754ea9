//! Settings loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::settings::schema::ControllerSettings;
use crate::settings::validation::{validate_settings, ValidationError};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Values given on the command line, applied over the settings file.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub config_dir: Option<String>,
    pub bind_address: Option<String>,
}

/// Settings from `path` (defaults when `None`) with `overrides` applied,
/// validated once after the overrides.
pub fn resolve_settings(
    path: Option<&Path>,
    overrides: SettingsOverrides,
) -> Result<ControllerSettings, SettingsError> {
    let mut settings: ControllerSettings = match path {
        Some(path) => toml::from_str(&fs::read_to_string(path)?)?,
        None => ControllerSettings::default(),
    };
    if let Some(dir) = overrides.config_dir {
        settings.source.config_dir = dir;
    }
    if let Some(bind) = overrides.bind_address {
        settings.listener.bind_address = bind;
    }
    validate_settings(&settings).map_err(SettingsError::Validation)?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(content: &str) -> Result<ControllerSettings, SettingsError> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, content).unwrap();
        resolve_settings(Some(&path), SettingsOverrides::default())
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings = from_toml(
            r#"
            [source]
            config_dir = "/tmp/cfg"
            "#,
        )
        .unwrap();

        assert_eq!(settings.source.config_dir, "/tmp/cfg");
        assert_eq!(settings.source.poll_interval_ms, 2000);
        assert_eq!(settings.listener.bind_address, "127.0.0.1:8080");
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let err = from_toml(
            r#"
            [listener]
            request_timeout_secs = 0
            "#,
        )
        .unwrap_err();

        assert!(matches!(err, SettingsError::Validation(ref errors) if errors.len() == 1));
        assert_eq!(
            err.to_string(),
            "Validation failed: listener.request_timeout_secs: must be greater than 0"
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_settings(Some(&dir.path().join("absent.toml")), SettingsOverrides::default())
            .unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }

    #[test]
    fn test_shipped_settings_load() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("deploy/settings.toml");
        let settings = resolve_settings(Some(&path), SettingsOverrides::default()).unwrap();
        assert!(settings.observability.metrics_enabled);
        assert_eq!(settings.source.config_dir, "deploy/config");
    }

    #[test]
    fn test_overrides_are_validated_with_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[listener]\nbind_address = \"not-an-address\"\n").unwrap();

        // The flag fixes what the file got wrong
        let settings = resolve_settings(
            Some(&path),
            SettingsOverrides {
                bind_address: Some("127.0.0.1:9000".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(settings.listener.bind_address, "127.0.0.1:9000");

        let err = resolve_settings(Some(&path), SettingsOverrides::default()).unwrap_err();
        assert!(matches!(err, SettingsError::Validation(ref errors)
            if errors.len() == 1 && errors[0].field == "listener.bind_address"));
    }

    #[test]
    fn test_bad_override_rejected() {
        let err = resolve_settings(
            None,
            SettingsOverrides {
                config_dir: Some("  ".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, SettingsError::Validation(ref errors)
            if errors.len() == 1 && errors[0].field == "source.config_dir"));

        let settings = resolve_settings(None, SettingsOverrides::default()).unwrap();
        assert_eq!(settings.source.config_dir, "/etc/ingress-config");
    }
}
