//! Engine configuration loaded from TOML.
//!
//! - `parse_config_toml(content)` parses and validates a config
//! - `EngineConfig::load(path)` additionally resolves relative paths against
//!   the directory of the config file
//! - Missing keys take the values of the embedded `default_config.toml`,
//!   which is also what `EngineConfig::default()` returns

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Deserialize;
use tracing::debug;

use crate::converter::TopicParticle;

pub const DEFAULT_CONFIG_TOML: &str = include_str!("default_config.toml");

/// Returns the embedded default config TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_CONFIG_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DictionarySource {
    /// A compiled JPHO trie holding both phonemes and words.
    Binary,
    /// A phoneme JSON object plus an optional word list.
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    pub dictionary_source: DictionarySource,
    pub enable_segmentation: bool,
    pub paths: PathSettings,
    pub particles: ParticleSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PathSettings {
    pub binary: PathBuf,
    pub phonemes: PathBuf,
    /// Word list for segmentation; segmentation is skipped if it is missing.
    pub words: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParticleSettings {
    pub topic: String,
    pub topic_reading: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        static INSTANCE: OnceLock<EngineConfig> = OnceLock::new();
        INSTANCE
            .get_or_init(|| {
                parse_config_toml(DEFAULT_CONFIG_TOML).expect("default config TOML must be valid")
            })
            .clone()
    }
}

impl EngineConfig {
    /// Read, parse and validate a config file. Relative paths are resolved
    /// against the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config = parse_config_toml(&content)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        debug!(path = %path.display(), "config loaded");
        Ok(config.resolve_paths(base))
    }

    /// Join every relative dictionary path onto `base`.
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.paths.binary);
        resolve(&mut self.paths.phonemes);
        resolve(&mut self.paths.words);
        self
    }

    pub fn topic_particle(&self) -> TopicParticle {
        TopicParticle {
            glyph: self.particles.topic.clone(),
            reading: self.particles.topic_reading.clone(),
        }
    }
}

/// Parse `toml_str` over the embedded defaults and validate the result.
pub fn parse_config_toml(toml_str: &str) -> Result<EngineConfig, ConfigError> {
    let parse = |s: &str| {
        toml::from_str::<toml::Table>(s).map_err(|e| ConfigError::Parse(e.to_string()))
    };
    let mut table = parse(DEFAULT_CONFIG_TOML)?;
    merge_tables(&mut table, parse(toml_str)?);
    let config: EngineConfig = toml::Value::Table(table)
        .try_into()
        .map_err(|e: toml::de::Error| ConfigError::Parse(e.to_string()))?;
    validate(&config)?;
    Ok(config)
}

/// Overlay `overlay` onto `base`; nested tables merge key by key.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(base)), toml::Value::Table(overlay)) => {
                merge_tables(base, overlay)
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

fn validate(c: &EngineConfig) -> Result<(), ConfigError> {
    fn invalid(field: &str, reason: &str) -> ConfigError {
        ConfigError::InvalidValue {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }

    match c.dictionary_source {
        DictionarySource::Binary if c.paths.binary.as_os_str().is_empty() => {
            return Err(invalid("paths.binary", "required when dictionary_source = \"binary\""));
        }
        DictionarySource::Text if c.paths.phonemes.as_os_str().is_empty() => {
            return Err(invalid("paths.phonemes", "required when dictionary_source = \"text\""));
        }
        _ => {}
    }
    if c.enable_segmentation && c.paths.words.as_os_str().is_empty() {
        return Err(invalid("paths.words", "required when enable_segmentation = true"));
    }
    if c.particles.topic.is_empty() {
        return Err(invalid("particles.topic", "must not be empty"));
    }
    if c.particles.topic_reading.is_empty() {
        return Err(invalid("particles.topic_reading", "must not be empty"));
    }
    Ok(())
}
