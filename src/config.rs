use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::common::constants::*;
use crate::common::error::{MergerError, Result};
use crate::domain::SupplierSchema;

/// Run configuration, passed explicitly into the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergerConfig {
    /// Per-supplier fetch timeout
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    /// Upper bound on the whole fetch phase
    #[serde(default = "default_run_timeout_secs")]
    pub run_timeout_secs: u64,
    /// When set, JSON logs are also written to daily files in this directory
    #[serde(default)]
    pub log_dir: Option<String>,
    #[serde(default = "default_suppliers")]
    pub suppliers: Vec<SupplierConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierConfig {
    pub name: String,
    pub schema: SupplierSchema,
    pub endpoint: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

fn default_run_timeout_secs() -> u64 {
    DEFAULT_RUN_TIMEOUT_SECS
}

fn default_enabled() -> bool {
    true
}

fn default_suppliers() -> Vec<SupplierConfig> {
    vec![
        SupplierConfig::new(ACME_SUPPLIER, SupplierSchema::Acme, ACME_ENDPOINT),
        SupplierConfig::new(PAPERFLIES_SUPPLIER, SupplierSchema::Paperflies, PAPERFLIES_ENDPOINT),
        SupplierConfig::new(PATAGONIA_SUPPLIER, SupplierSchema::Patagonia, PATAGONIA_ENDPOINT),
    ]
}

impl SupplierConfig {
    pub fn new(name: &str, schema: SupplierSchema, endpoint: &str) -> Self {
        Self {
            name: name.to_string(),
            schema,
            endpoint: endpoint.to_string(),
            enabled: true,
        }
    }
}

impl Default for MergerConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            run_timeout_secs: DEFAULT_RUN_TIMEOUT_SECS,
            log_dir: None,
            suppliers: default_suppliers(),
        }
    }
}

impl MergerConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `hotel_merger.toml` in the
    /// working directory is used if present, otherwise the built-in defaults.
    /// Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => {
                debug!("No config file found, using built-in supplier defaults");
                Self::default()
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MergerError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&content)?;
        info!(path = %path.display(), suppliers = config.suppliers.len(), "Loaded config file");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply timeout overrides from a key lookup (the process environment in production).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(FETCH_TIMEOUT_ENV) {
            self.fetch_timeout_secs = parse_secs(FETCH_TIMEOUT_ENV, &raw)?;
        }
        if let Some(raw) = lookup(RUN_TIMEOUT_ENV) {
            self.run_timeout_secs = parse_secs(RUN_TIMEOUT_ENV, &raw)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.fetch_timeout_secs == 0 {
            return Err(MergerError::Config("fetch_timeout_secs must be greater than zero".into()));
        }
        if self.run_timeout_secs == 0 {
            return Err(MergerError::Config("run_timeout_secs must be greater than zero".into()));
        }

        let mut seen = HashSet::new();
        for supplier in &self.suppliers {
            if supplier.name.trim().is_empty() {
                return Err(MergerError::Config("supplier name must not be empty".into()));
            }
            if !seen.insert(supplier.name.as_str()) {
                return Err(MergerError::Config(format!("duplicate supplier name '{}'", supplier.name)));
            }
            if supplier.endpoint.trim().is_empty() {
                return Err(MergerError::Config(format!("supplier '{}' has no endpoint", supplier.name)));
            }
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn run_timeout(&self) -> Duration {
        Duration::from_secs(self.run_timeout_secs)
    }

    pub fn enabled_suppliers(&self) -> impl Iterator<Item = &SupplierConfig> {
        self.suppliers.iter().filter(|s| s.enabled)
    }
}

fn parse_secs(key: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| MergerError::Config(format!("{} must be a whole number of seconds: {}", key, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_has_known_suppliers() {
        let config = MergerConfig::default();
        let names: Vec<&str> = config.suppliers.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, get_supported_suppliers());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml_with_defaults() {
        let config = MergerConfig::from_toml_str(
            r#"
            fetch_timeout_secs = 3

            [[suppliers]]
            name = "acme"
            schema = "acme"
            endpoint = "http://localhost:9000/acme"

            [[suppliers]]
            name = "patagonia-eu"
            schema = "patagonia"
            endpoint = "http://localhost:9000/patagonia"
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.fetch_timeout_secs, 3);
        assert_eq!(config.run_timeout_secs, DEFAULT_RUN_TIMEOUT_SECS);
        assert_eq!(config.suppliers.len(), 2);
        assert_eq!(config.enabled_suppliers().count(), 1);
        assert_eq!(config.suppliers[1].schema, SupplierSchema::Patagonia);
    }

    #[test]
    fn test_unknown_schema_is_rejected() {
        let result = MergerConfig::from_toml_str(
            r#"
            [[suppliers]]
            name = "x"
            schema = "expedia"
            endpoint = "http://localhost"
            "#,
        );
        assert!(matches!(result, Err(MergerError::Toml(_))));
    }

    #[test]
    fn test_validate_rejects_duplicates_and_zero_timeouts() {
        let mut config = MergerConfig::default();
        config.suppliers.push(config.suppliers[0].clone());
        assert!(matches!(config.validate(), Err(MergerError::Config(_))));

        let config = MergerConfig {
            fetch_timeout_secs: 0,
            ..MergerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let mut config = MergerConfig::default();
        config
            .apply_overrides(|key| match key {
                FETCH_TIMEOUT_ENV => Some("2".to_string()),
                RUN_TIMEOUT_ENV => Some(" 7 ".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.fetch_timeout(), Duration::from_secs(2));
        assert_eq!(config.run_timeout(), Duration::from_secs(7));

        let bad = config.apply_overrides(|key| (key == FETCH_TIMEOUT_ENV).then(|| "soon".to_string()));
        assert!(bad.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "run_timeout_secs = 12").unwrap();
        let config = MergerConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.run_timeout_secs, 12);
        assert_eq!(config.suppliers.len(), 3);

        let missing = MergerConfig::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(missing, Err(MergerError::Config(_))));
    }
}
