//! JSON loading and saving
//!
//! Saving walks the schema in registration order, loading walks the input in
//! document order. Both consult the per-key hooks first.

use crate::config::{ConfigRegistry, ConfigValue};
use crate::types::{ConfigError, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Serializer, Value};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info, warn};

impl ConfigRegistry {
    /// Export every registered key, using its save hook when one is defined.
    ///
    /// Fails with [`ConfigError::InvalidValue`] for a NaN or infinite float
    /// without a save hook, since JSON cannot represent it.
    pub fn save_dict(&self) -> Result<Map<String, Value>> {
        let mut result = Map::new();

        for key in self.keys() {
            let value = match self.hooks().save_hook(key) {
                Some(hook) => {
                    debug!("Saving '{}' through its save hook", key);
                    hook(self)?
                }
                None => match self.get(key) {
                    Some(ConfigValue::Float(f)) if !f.is_finite() => {
                        return Err(ConfigError::invalid_value(
                            key,
                            format!("{} cannot be saved as JSON", f),
                        ));
                    }
                    Some(v) => v.to_json(),
                    None => Value::Null,
                },
            };
            result.insert(key.to_string(), value);
        }

        Ok(result)
    }

    /// Write [`ConfigRegistry::save_dict`] to `path` as JSON indented with
    /// four spaces, replacing any existing content.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        // Hooks run before the file is truncated
        let dict = self.save_dict()?;

        let mut writer = BufWriter::new(File::create(path)?);
        dict.serialize(&mut Serializer::with_formatter(
            &mut writer,
            PrettyFormatter::with_indent(b"    "),
        ))?;
        writer.flush()?;

        info!("Saved {} config(s) to {}", dict.len(), path.display());
        Ok(())
    }

    /// Apply `config` key by key in its own order.
    ///
    /// A key with a load hook is handed to the hook; any other key is
    /// assigned through [`ConfigRegistry::set`], so unknown keys fail exactly
    /// like a direct assignment. Stops at the first failing key; keys before
    /// it stay applied.
    pub fn load_dict(&mut self, config: Map<String, Value>) -> Result<()> {
        for (key, value) in config {
            let result = match self.hooks().load_hook(&key) {
                Some(hook) => {
                    debug!("Loading '{}' through its load hook", key);
                    hook(self, value)
                }
                None => self.set(&key, value),
            };

            if let Err(e) = result {
                warn!("Stopped loading {} at '{}': {}", self.type_name(), key, e);
                return Err(e);
            }
        }

        Ok(())
    }

    /// Like [`ConfigRegistry::load_dict`] for an arbitrary JSON document,
    /// which must be an object.
    pub fn load_value(&mut self, value: Value) -> Result<()> {
        match value {
            Value::Object(map) => self.load_dict(map),
            _ => Err(ConfigError::NotAnObject),
        }
    }

    /// Read a JSON object from `path` and load it.
    pub fn load_json(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let value: Value = {
            let file = File::open(path)?;
            serde_json::from_reader(BufReader::new(file))?
        };

        info!("Loading config from {}", path.display());
        self.load_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnumValue;
    use serde_json::json;

    fn sample() -> ConfigRegistry {
        let mut config = ConfigRegistry::new("test::Config");
        config
            .hooks_mut()
            .on_save("a", |config| {
                let a = config.get("a").cloned().unwrap_or(ConfigValue::Null);
                Ok(Value::String(a.to_string()))
            })
            .on_load("a", |config, value| {
                let parsed = value
                    .as_str()
                    .and_then(|s| s.parse::<i64>().ok())
                    .or_else(|| value.as_i64())
                    .ok_or_else(|| ConfigError::invalid_value("a", value.to_string()))?;
                config.set("a", parsed)
            });
        config.add_config("a", 1).unwrap();
        config.add_config("b", "2").unwrap();
        config
    }

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_save_dict_uses_hooks() {
        let mut config = sample();
        config.set("a", 100).unwrap();

        let saved = config.save_dict().unwrap();
        assert_eq!(Value::Object(saved), json!({"a": "100", "b": "2"}));
    }

    #[test]
    fn test_save_dict_keeps_registration_order() {
        let mut config = ConfigRegistry::new("test::Config");
        config.add_config("zeta", 1).unwrap();
        config.add_config("alpha", 2).unwrap();
        config.add_config("mode", EnumValue::new("Mode", "M2", 2)).unwrap();

        let saved = config.save_dict().unwrap();
        let keys: Vec<&String> = saved.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mode"]);
        assert_eq!(saved["mode"], json!(2));
    }

    #[test]
    fn test_large_unsigned_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = sample();
        config.add_config("n", 0).unwrap();
        config.load_value(json!({"n": u64::MAX})).unwrap();
        assert_eq!(config.save_dict().unwrap()["n"], json!(u64::MAX));

        config.save_json(&path).unwrap();
        config.set("n", 0).unwrap();
        config.load_json(&path).unwrap();
        assert_eq!(config.get("n").and_then(|v| v.as_u64()), Some(u64::MAX));
    }

    #[test]
    fn test_non_finite_float_rejected_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{}").unwrap();

        let mut config = sample();
        config.add_config("ratio", f64::NAN).unwrap();

        let err = config.save_dict().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "ratio"));
        assert!(config.save_json(&path).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");

        config
            .hooks_mut()
            .on_save("ratio", |_| Ok(Value::String("NaN".to_string())));
        assert_eq!(config.save_dict().unwrap()["ratio"], json!("NaN"));
    }

    #[test]
    fn test_load_dict_runs_hooks() {
        let mut config = sample();
        config.load_dict(object(json!({"b": "x", "a": "42"}))).unwrap();

        assert_eq!(config.get("a"), Some(&ConfigValue::Int(42)));
        assert_eq!(config.get("b"), Some(&ConfigValue::from("x")));
    }

    #[test]
    fn test_load_dict_rejects_unknown_key() {
        let mut config = sample();

        let err = config.load_dict(object(json!({"z": 1}))).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownAttribute(ref name) if name == "z"));
        assert_eq!(config.get("a"), Some(&ConfigValue::Int(1)));
        assert_eq!(config.get("b"), Some(&ConfigValue::from("2")));
    }

    #[test]
    fn test_load_dict_stops_at_first_failure() {
        let mut config = sample();

        let result = config.load_dict(object(json!({"b": "applied", "z": 1, "a": "7"})));
        assert!(result.is_err());
        assert_eq!(config.get("b"), Some(&ConfigValue::from("applied")));
        assert_eq!(config.get("a"), Some(&ConfigValue::Int(1)));
    }

    #[test]
    fn test_load_hook_bypasses_schema() {
        let mut config = sample();
        config
            .hooks_mut()
            .on_load("legacy_b", |config, value| config.set("b", value));

        config.load_dict(object(json!({"legacy_b": "renamed"}))).unwrap();
        assert_eq!(config.get("b"), Some(&ConfigValue::from("renamed")));
        assert!(!config.has_config("legacy_b"));
    }

    #[test]
    fn test_load_value_requires_object() {
        let mut config = sample();
        let err = config.load_value(json!([1, 2])).unwrap_err();
        assert!(matches!(err, ConfigError::NotAnObject));
    }

    #[test]
    fn test_save_json_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = sample();
        config.set("a", 100).unwrap();
        config.save_json(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "{\n    \"a\": \"100\",\n    \"b\": \"2\"\n}");
    }

    #[test]
    fn test_save_json_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "x".repeat(256)).unwrap();

        sample().save_json(&path).unwrap();

        let reloaded: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reloaded, json!({"a": "1", "b": "2"}));
    }

    #[test]
    fn test_load_json_any_formatting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"a":"9","b":"compact"}"#).unwrap();

        let mut config = sample();
        config.load_json(&path).unwrap();
        assert_eq!(config.get("a"), Some(&ConfigValue::Int(9)));
        assert_eq!(config.get("b"), Some(&ConfigValue::from("compact")));
    }

    #[test]
    fn test_load_json_errors_propagate() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = sample();

        let missing = config.load_json(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io(_)));

        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{\"a\": ").unwrap();
        let broken = config.load_json(&path).unwrap_err();
        assert!(matches!(broken, ConfigError::Json(_)));
        assert_eq!(config.get("a"), Some(&ConfigValue::Int(1)));
    }
}
