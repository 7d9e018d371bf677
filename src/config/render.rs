//! Human-readable rendering of a registry

use crate::config::ConfigRegistry;
use std::fmt;

/// Order in which keys are listed by [`ConfigRegistry::render`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyOrder {
    /// Registration order
    Insertion,
    /// Alphabetical order, used by `Display`
    #[default]
    Sorted,
}

impl ConfigRegistry {
    /// Render a header naming the configuration type, then one line per key
    /// with the key right-aligned to the widest key name.
    pub fn render(&self, order: KeyOrder) -> String {
        let mut keys: Vec<&str> = self.keys().collect();
        if order == KeyOrder::Sorted {
            keys.sort_unstable();
        }

        let width = keys.iter().map(|k| k.chars().count()).max().unwrap_or(0);

        let mut lines = Vec::with_capacity(keys.len() + 1);
        lines.push(format!("{}:", self.type_name()));
        for key in keys {
            let value = self.get(key).map(|v| v.to_string()).unwrap_or_default();
            lines.push(format!("    {:>width$}: {}", key, value, width = width));
        }

        lines.join("\n")
    }
}

impl fmt::Display for ConfigRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(KeyOrder::Sorted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnumValue;

    fn sample() -> ConfigRegistry {
        let mut config = ConfigRegistry::new("app::Config");
        config.add_config("cc", EnumValue::new("Mode", "M1", 1)).unwrap();
        config.add_config("b", "2").unwrap();
        config.add_config("a", 100).unwrap();
        config
    }

    #[test]
    fn test_display_sorts_keys() {
        let expected = "app::Config:\n     a: 100\n     b: 2\n    cc: Mode.M1";
        assert_eq!(sample().to_string(), expected);
    }

    #[test]
    fn test_insertion_order() {
        let expected = "app::Config:\n    cc: Mode.M1\n     b: 2\n     a: 100";
        assert_eq!(sample().render(KeyOrder::Insertion), expected);
    }

    #[test]
    fn test_render_is_stable() {
        let config = sample();
        assert_eq!(config.to_string(), config.to_string());
    }

    #[test]
    fn test_empty_schema_renders_header() {
        let config = ConfigRegistry::new("app::Empty");
        assert_eq!(config.to_string(), "app::Empty:");
    }
}
