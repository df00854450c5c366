use std::fs;
use std::path::Path;

use azfw_core::{Layout, TransformOptions, DEFAULT_INDENT};
use serde::Deserialize;
use thiserror::Error;

/// Conversion settings read from an optional TOML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub convert: ConvertSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertSettings {
    /// Fail on short lines and unknown actions instead of skipping them.
    pub strict: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    pub indent: usize,
    pub compact: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            compact: false,
        }
    }
}

impl Settings {
    pub fn transform_options(&self) -> TransformOptions {
        TransformOptions {
            strict: self.convert.strict,
        }
    }

    pub fn layout(&self) -> Layout {
        if self.output.compact {
            Layout::Compact
        } else {
            Layout::Pretty {
                indent: self.output.indent,
            }
        }
    }
}

/// Errors returned when loading a settings file.
#[derive(Debug, Error)]
pub enum SettingsLoadError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Load settings from a TOML file.
pub fn load_settings(path: &Path) -> Result<Settings, SettingsLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| SettingsLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_settings(&raw, path.display().to_string())
}

fn parse_settings(raw: &str, path: String) -> Result<Settings, SettingsLoadError> {
    toml::from_str(raw).map_err(|source| SettingsLoadError::Parse { path, source })
}

#[cfg(test)]
mod tests {
    use super::{load_settings, parse_settings, Settings, SettingsLoadError};
    use azfw_core::Layout;
    use std::fs;

    #[test]
    fn loads_valid_settings_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("azfw.toml");
        fs::write(
            &path,
            r#"
[convert]
strict = true

[output]
indent = 2
"#,
        )
        .expect("write settings");

        let settings = load_settings(&path).expect("settings should parse");
        assert!(settings.convert.strict);
        assert!(settings.transform_options().strict);
        assert_eq!(settings.layout(), Layout::Pretty { indent: 2 });
    }

    #[test]
    fn missing_keys_take_defaults() {
        let settings = parse_settings("[output]\ncompact = true\n", "inline".to_string())
            .expect("settings should parse");
        assert!(!settings.convert.strict);
        assert_eq!(settings.output.indent, 4);
        assert_eq!(settings.layout(), Layout::Compact);
    }

    #[test]
    fn empty_file_is_default() {
        let settings = parse_settings("", "inline".to_string()).expect("settings should parse");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.layout(), Layout::default());
    }

    #[test]
    fn returns_parse_error_for_unknown_key() {
        let err = parse_settings("[output]\nlocation = \"westeurope\"\n", "inline".to_string())
            .expect_err("unknown key should fail");
        match err {
            SettingsLoadError::Parse { .. } => {}
            other => panic!("unexpected error variant: {other}"),
        }
    }

    #[test]
    fn returns_io_error_for_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_settings(&dir.path().join("absent.toml")).expect_err("should fail");
        assert!(matches!(err, SettingsLoadError::Io { .. }));
    }
}
