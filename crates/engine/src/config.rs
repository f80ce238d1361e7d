//! Sync configuration via `prefsync.toml`
//!
//! Names the remote collection and field the tree lives in, plus the knobs
//! of the background write queue. A missing file means defaults; to change
//! settings, edit the file and restart.

use prefsync_core::{Error, Result, Role, ACCOUNT_COLLECTION, TREE_FIELD};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name.
pub const CONFIG_FILE_NAME: &str = "prefsync.toml";

/// Default capacity of the background write queue.
pub const DEFAULT_MAX_PENDING_WRITES: usize = 1024;

/// Sync configuration loaded from `prefsync.toml`.
///
/// # Example
///
/// ```toml
/// collection = "userAccountInfo"
/// tree_field = "settingsData"
/// repair_missing_field = true
/// default_role = "patient"
/// max_pending_writes = 1024
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefsConfig {
    /// Collection holding one account record per user.
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Record field holding the serialized preference tree.
    #[serde(default = "default_tree_field")]
    pub tree_field: String,
    /// Write the default tree into records that lack the tree field.
    #[serde(default = "default_true")]
    pub repair_missing_field: bool,
    /// Role given to accounts created without one.
    #[serde(default)]
    pub default_role: Role,
    /// Capacity of the background write queue.
    #[serde(default = "default_max_pending_writes")]
    pub max_pending_writes: usize,
}

fn default_collection() -> String {
    ACCOUNT_COLLECTION.to_string()
}

fn default_tree_field() -> String {
    TREE_FIELD.to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_pending_writes() -> usize {
    DEFAULT_MAX_PENDING_WRITES
}

impl Default for PrefsConfig {
    fn default() -> Self {
        Self {
            collection: default_collection(),
            tree_field: default_tree_field(),
            repair_missing_field: true,
            default_role: Role::Patient,
            max_pending_writes: DEFAULT_MAX_PENDING_WRITES,
        }
    }
}

impl PrefsConfig {
    /// Check that the config can be used.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty collection or field name, or a zero
    /// queue capacity.
    pub fn validate(&self) -> Result<()> {
        if self.collection.is_empty() {
            return Err(Error::invalid_config("collection must not be empty"));
        }
        if self.tree_field.is_empty() {
            return Err(Error::invalid_config("tree_field must not be empty"));
        }
        if self.max_pending_writes == 0 {
            return Err(Error::invalid_config("max_pending_writes must be at least 1"));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# prefsync configuration
#
# Collection holding one account record per user
collection = "userAccountInfo"

# Record field holding the serialized preference tree
tree_field = "settingsData"

# When a record exists but lacks the tree field, load returns the default
# tree and writes it into the record in the background (default: true)
repair_missing_field = true

# Role for accounts created without one: "patient" or "expert"
default_role = "patient"

# Capacity of the background write queue; writes beyond it are dropped
max_pending_writes = 1024
"#
    }

    /// Parse config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PrefsConfig = toml::from_str(content)
            .map_err(|e| Error::invalid_config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::invalid_config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::InvalidConfig(msg) => {
                Error::invalid_config(format!("{} ({})", msg, path.display()))
            }
            other => other,
        })
    }

    /// Read config from `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::invalid_config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::invalid_config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::invalid_config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
