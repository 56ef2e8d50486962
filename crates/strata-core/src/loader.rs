//! Configuration file discovery and loading
//!
//! The resolution engine itself performs no I/O; this loader is the boundary
//! that turns a serialized layer sequence into a sealed store. The order of
//! layers in the file is trusted exactly as given.
//!
//! Supported formats:
//! - `strata.json` - array of layer objects (JSON)
//! - `strata.jsonc` - same, with comments and trailing commas (preferred)
//! - `strata.toml` - `[[layers]]` tables (TOML)
//!
//! When no explicit path is provided, discovery starts from a directory and
//! moves up the tree until a config file is found or the filesystem root is
//! reached.

use crate::block::ConfigBlock;
use crate::error::ConstructionError;
use crate::resolver::Resolver;
use crate::store::LayerStore;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Result type for configuration loading
pub type Result<T> = std::result::Result<T, ConstructionError>;

/// Wrapper for formats whose top level cannot be an array (TOML).
#[derive(Debug, Deserialize)]
struct LayerDocument {
    #[serde(default)]
    layers: Vec<ConfigBlock>,
}

/// Configuration loader for discovering and loading layer files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover a config file by traversing upward from `start_path`.
    ///
    /// Tries file names in priority order:
    /// 1. `.stratarc.json`
    /// 2. `.stratarc.jsonc`
    /// 3. `strata.jsonc`
    /// 4. `strata.json`
    /// 5. `strata.toml`
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| ConstructionError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in &[
                ".stratarc.json",
                ".stratarc.jsonc",
                "strata.jsonc",
                "strata.json",
                "strata.toml",
            ] {
                let config_path = current.join(filename);
                if config_path.exists() && config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            // Move up to parent directory
            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                // Reached filesystem root
                break;
            }
        }

        Ok(None)
    }

    /// Load a layer file, build the store, seal it, and return a resolver.
    pub fn load_from_file(path: &Path) -> Result<Resolver> {
        let content =
            fs::read_to_string(path).map_err(|e| ConstructionError::io_error(path, e))?;
        let blocks = Self::parse(&content, path)?;
        tracing::info!("Loaded {} layers from: {}", blocks.len(), path.display());
        Self::build(blocks)
    }

    /// Build a resolver from an already-parsed layer sequence, preserving
    /// its order.
    pub fn build(blocks: Vec<ConfigBlock>) -> Result<Resolver> {
        let mut store = LayerStore::new();
        for block in blocks {
            store.append(block)?;
        }
        Ok(Resolver::new(store))
    }

    /// Load config from a path or auto-discover.
    ///
    /// If a custom path is provided, loads from that path. Otherwise,
    /// attempts discovery starting from `start_dir` (or the current
    /// directory).
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<Resolver> {
        let config_path = if let Some(path) = custom_path {
            if !path.exists() {
                return Err(ConstructionError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        } else {
            let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
            Self::auto_discover(search_dir)?.ok_or_else(|| {
                ConstructionError::config_error(
                    "No config file found (.stratarc.json, .stratarc.jsonc, strata.jsonc, \
                     strata.json, or strata.toml)",
                )
            })?
        };

        Self::load_from_file(&config_path)
    }

    /// Parse layer content based on file extension, sniffing the content
    /// when the extension is missing or unknown.
    fn parse(content: &str, path: &Path) -> Result<Vec<ConfigBlock>> {
        let extension = path.extension().and_then(|ext| ext.to_str());

        match extension {
            Some("toml") => Self::from_toml(content),
            Some("json") => Self::from_json(content),
            Some("jsonc") => Self::from_jsonc(content),
            _ => {
                if content.trim_start().starts_with('[') && !content.trim_start().starts_with("[[")
                {
                    Self::from_jsonc(content)
                } else {
                    Self::from_toml(content)
                }
            }
        }
    }

    /// Parse a JSON array of layers.
    pub fn from_json(content: &str) -> Result<Vec<ConfigBlock>> {
        serde_json::from_str(content).map_err(|e| {
            ConstructionError::config_error(format!("Failed to parse JSON config: {e}"))
        })
    }

    /// Parse a JSONC array of layers (comments and trailing commas allowed).
    pub fn from_jsonc(content: &str) -> Result<Vec<ConfigBlock>> {
        json5::from_str(content).map_err(|e| {
            ConstructionError::config_error(format!("Failed to parse JSONC config: {e}"))
        })
    }

    /// Parse `[[layers]]` tables from TOML.
    pub fn from_toml(content: &str) -> Result<Vec<ConfigBlock>> {
        let document: LayerDocument = toml::from_str(content).map_err(|e| {
            ConstructionError::config_error(format!("Failed to parse TOML config: {e}"))
        })?;
        Ok(document.layers)
    }

    /// JSON schema for layer files, for editor validation.
    pub fn json_schema() -> serde_json::Value {
        serde_json::json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "title": "Strata Layer Configuration",
            "description": "Ordered sequence of configuration layers",
            "type": "array",
            "items": {
                "$ref": "#/definitions/Layer"
            },
            "definitions": {
                "Layer": {
                    "type": "object",
                    "properties": {
                        "files": {
                            "description": "Glob patterns for files this layer applies to; empty means every path",
                            "type": "array",
                            "items": { "type": "string" }
                        },
                        "ignores": {
                            "description": "Glob patterns for files withdrawn from resolution",
                            "type": "array",
                            "items": { "type": "string" }
                        },
                        "languageOptions": {
                            "description": "Parser and environment settings, opaque to the engine",
                            "type": "object",
                            "additionalProperties": true
                        },
                        "plugins": {
                            "description": "Plugins registered by this layer, keyed by plugin name",
                            "type": "object",
                            "additionalProperties": { "type": "string" }
                        },
                        "rules": {
                            "description": "Rule settings, keyed by rule name",
                            "type": "object",
                            "additionalProperties": {
                                "$ref": "#/definitions/RuleSetting"
                            }
                        }
                    },
                    "additionalProperties": false
                },
                "RuleSetting": {
                    "oneOf": [
                        {
                            "type": "string",
                            "enum": ["off", "warn", "error"]
                        },
                        {
                            "type": "array",
                            "minItems": 1,
                            "items": true
                        }
                    ]
                }
            }
        })
    }

    /// Get the JSON schema as a formatted string.
    pub fn json_schema_string() -> Result<String> {
        serde_json::to_string_pretty(&Self::json_schema()).map_err(|e| {
            ConstructionError::config_error(format!("Failed to serialize JSON schema: {e}"))
        })
    }
}
