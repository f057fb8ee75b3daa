//! Runtime configuration loaded from environment variables.
//!
//! Every setting has a default, so the demo runs with no configuration at all.

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Default tracing filter. `RUST_LOG` still takes precedence.
    /// Env: `KOPERASI_LOG`
    /// Default: `info`
    pub log_filter: String,

    /// Mailbox size of each actor.
    /// Env: `KOPERASI_CHANNEL_CAPACITY`
    /// Default: `32`
    pub channel_capacity: usize,

    /// Whether the demo users, products, request and offer are loaded at startup.
    /// Env: `KOPERASI_SEED_DEMO` (true/false)
    /// Default: `true`
    pub seed_demo: bool,

    /// Values that were present but unusable. They are reported once tracing is up.
    pub warnings: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            channel_capacity: 32,
            seed_demo: true,
            warnings: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(filter) = lookup("KOPERASI_LOG") {
            if filter.trim().is_empty() {
                config.warnings.push("KOPERASI_LOG is empty, using default".to_string());
            } else {
                config.log_filter = filter.trim().to_string();
            }
        }

        if let Some(raw) = lookup("KOPERASI_CHANNEL_CAPACITY") {
            match raw.trim().parse::<usize>() {
                Ok(capacity) if capacity > 0 => config.channel_capacity = capacity,
                _ => config.warnings.push(format!(
                    "KOPERASI_CHANNEL_CAPACITY={raw:?} is not a positive integer, using {}",
                    config.channel_capacity
                )),
            }
        }

        if let Some(raw) = lookup("KOPERASI_SEED_DEMO") {
            match raw.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" => config.seed_demo = true,
                "false" | "0" | "no" => config.seed_demo = false,
                _ => config.warnings.push(format!(
                    "KOPERASI_SEED_DEMO={raw:?} is not a boolean, using {}",
                    config.seed_demo
                )),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_env() {
        assert_eq!(load(&[]), AppConfig::default());
    }

    #[test]
    fn test_values_are_read() {
        let config = load(&[
            ("KOPERASI_LOG", "debug"),
            ("KOPERASI_CHANNEL_CAPACITY", " 8 "),
            ("KOPERASI_SEED_DEMO", "False"),
        ]);
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.channel_capacity, 8);
        assert!(!config.seed_demo);
        assert!(config.warnings.is_empty());
    }

    #[test]
    fn test_invalid_values_fall_back_with_warning() {
        let config = load(&[
            ("KOPERASI_CHANNEL_CAPACITY", "0"),
            ("KOPERASI_SEED_DEMO", "maybe"),
        ]);
        assert_eq!(config.channel_capacity, 32);
        assert!(config.seed_demo);
        assert_eq!(config.warnings.len(), 2);
    }
}
