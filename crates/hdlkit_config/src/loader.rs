//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::BackendConfig;
use std::path::Path;

/// Units accepted for `codegen.wait_time_unit`.
const TIME_UNITS: &[&str] = &["fs", "ps", "ns", "us", "ms", "sec"];

/// Loads and validates an `hdlkit.toml` configuration from a project directory.
///
/// A missing file is not an error; the defaults are returned instead.
pub fn load_config(project_dir: &Path) -> Result<BackendConfig, ConfigError> {
    let config_path = project_dir.join("hdlkit.toml");
    if !config_path.exists() {
        return Ok(BackendConfig::default());
    }
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates an `hdlkit.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<BackendConfig, ConfigError> {
    let config: BackendConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that configuration values are consistent.
fn validate_config(config: &BackendConfig) -> Result<(), ConfigError> {
    if config.synth.name_separator.is_empty() {
        return Err(ConfigError::ValidationError(
            "synth.name_separator must not be empty".to_string(),
        ));
    }
    if config.codegen.indent.chars().any(|c| c != ' ' && c != '\t') {
        return Err(ConfigError::ValidationError(
            "codegen.indent may only contain spaces and tabs".to_string(),
        ));
    }
    if !TIME_UNITS.contains(&config.codegen.wait_time_unit.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "codegen.wait_time_unit must be one of {}, got '{}'",
            TIME_UNITS.join(", "),
            config.codegen.wait_time_unit
        )));
    }
    if let Some(word) = config
        .codegen
        .reserved
        .iter()
        .find(|w| w.is_empty() || w.contains(char::is_whitespace))
    {
        return Err(ConfigError::ValidationError(format!(
            "invalid reserved word '{word}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Dialect;

    #[test]
    fn parse_full_config() {
        let toml = r#"
[synth]
name_separator = "__"

[codegen]
dialect = "sim_model"
indent = "  "
wait_time_unit = "ps"
reserved = ["tmp"]
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.synth.name_separator, "__");
        assert_eq!(config.codegen.dialect, Dialect::SimModel);
        assert_eq!(config.codegen.indent, "  ");
        assert_eq!(config.codegen.wait_time_unit, "ps");
        assert_eq!(config.codegen.reserved, vec!["tmp"]);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.synth.name_separator, "_");
        assert_eq!(config.codegen.dialect, Dialect::Vhdl);
    }

    #[test]
    fn empty_separator_errors() {
        let toml = r#"
[synth]
name_separator = ""
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn bad_indent_errors() {
        let toml = r#"
[codegen]
indent = "--"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn invalid_time_unit_errors() {
        let toml = r#"
[codegen]
wait_time_unit = "banana"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(ref msg) if msg.contains("banana")));
        assert!(load_config_from_str("[codegen]\nwait_time_unit = \"us\"\n").is_ok());
    }

    #[test]
    fn reserved_word_with_space_errors() {
        let toml = r#"
[codegen]
reserved = ["two words"]
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn unknown_dialect_errors() {
        let toml = r#"
[codegen]
dialect = "verilog"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("hdlkit.toml"),
            "[codegen]\ndialect = \"sim_model\"\n",
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.codegen.dialect, Dialect::SimModel);
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.synth.name_separator, "_");
    }
}
