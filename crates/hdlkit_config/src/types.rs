//! Configuration types deserialized from `hdlkit.toml`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

/// The top-level backend configuration.
#[derive(Debug, Default, Deserialize)]
pub struct BackendConfig {
    /// Interface synthesis settings.
    #[serde(default)]
    pub synth: SynthConfig,
    /// Code generation settings.
    #[serde(default)]
    pub codegen: CodegenConfig,
}

/// Interface synthesis settings.
#[derive(Debug, Deserialize)]
pub struct SynthConfig {
    /// Separator between nested interface names, e.g. `m` + `_` + `data`.
    #[serde(default = "default_separator")]
    pub name_separator: String,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            name_separator: default_separator(),
        }
    }
}

fn default_separator() -> String {
    "_".to_string()
}

/// Code generation settings.
#[derive(Debug, Deserialize)]
pub struct CodegenConfig {
    /// The output dialect.
    #[serde(default)]
    pub dialect: Dialect,
    /// Indentation used for nested statement bodies.
    #[serde(default = "default_indent")]
    pub indent: String,
    /// Time unit appended to timed waits.
    #[serde(default = "default_time_unit")]
    pub wait_time_unit: String,
    /// Extra reserved words that generated names must avoid.
    ///
    /// Accepts either a single string or a list of strings.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub reserved: Vec<String>,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            indent: default_indent(),
            wait_time_unit: default_time_unit(),
            reserved: Vec::new(),
        }
    }
}

fn default_indent() -> String {
    "    ".to_string()
}

fn default_time_unit() -> String {
    "ns".to_string()
}

/// The code generation output dialect.
#[derive(Debug, Default, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// Structural/behavioral VHDL text (default).
    #[default]
    Vhdl,
    /// Event-driven simulation model.
    SimModel,
}

/// Deserializes a field that can be either a single string or a list of strings.
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = BackendConfig::default();
        assert_eq!(config.synth.name_separator, "_");
        assert_eq!(config.codegen.dialect, Dialect::Vhdl);
        assert_eq!(config.codegen.indent, "    ");
        assert_eq!(config.codegen.wait_time_unit, "ns");
        assert!(config.codegen.reserved.is_empty());
    }

    #[test]
    fn reserved_accepts_single_string() {
        let config: BackendConfig = toml::from_str(
            r#"
[codegen]
reserved = "tmp"
"#,
        )
        .unwrap();
        assert_eq!(config.codegen.reserved, vec!["tmp"]);
    }

    #[test]
    fn reserved_accepts_list() {
        let config: BackendConfig = toml::from_str(
            r#"
[codegen]
reserved = ["tmp", "ctrl"]
"#,
        )
        .unwrap();
        assert_eq!(config.codegen.reserved, vec!["tmp", "ctrl"]);
    }

    #[test]
    fn dialect_snake_case() {
        let config: BackendConfig = toml::from_str(
            r#"
[codegen]
dialect = "sim_model"
"#,
        )
        .unwrap();
        assert_eq!(config.codegen.dialect, Dialect::SimModel);
    }
}
