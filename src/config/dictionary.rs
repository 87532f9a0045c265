//! Dictionary construction configuration.

use super::{parse_env_bool, parse_env_var, Config};
use crate::compression::dict_zip::{MAX_CORPUS_BYTES, MAX_DICTIONARY_BYTES};
use crate::error::{DictZipError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for [`DictionaryOptimizer`](crate::compression::dict_zip::DictionaryOptimizer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryConfig {
    /// Dictionary length produced by `build_dictionary`
    pub dictionary_size: usize,
    /// Largest corpus the optimizer accepts, in bytes
    pub max_corpus_bytes: usize,
    /// Keep suffix-sort scratch buffers between optimize calls
    pub reuse_scratch: bool,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            dictionary_size: 64 * 1024,
            max_corpus_bytes: MAX_CORPUS_BYTES,
            reuse_scratch: true,
        }
    }
}

impl Config for DictionaryConfig {
    fn validate(&self) -> Result<()> {
        if self.dictionary_size == 0 {
            return Err(DictZipError::configuration("dictionary_size must be greater than 0"));
        }
        if self.dictionary_size > MAX_DICTIONARY_BYTES {
            return Err(DictZipError::configuration(format!(
                "dictionary_size {} exceeds the maximum of {} bytes",
                self.dictionary_size, MAX_DICTIONARY_BYTES
            )));
        }
        if self.max_corpus_bytes == 0 {
            return Err(DictZipError::configuration("max_corpus_bytes must be greater than 0"));
        }
        if self.max_corpus_bytes > MAX_CORPUS_BYTES {
            return Err(DictZipError::configuration(format!(
                "max_corpus_bytes {} exceeds the maximum of {} bytes",
                self.max_corpus_bytes, MAX_CORPUS_BYTES
            )));
        }
        Ok(())
    }

    fn from_env_with_prefix(prefix: &str) -> Result<Self> {
        let mut config = Self::default();
        config.dictionary_size = parse_env_var(&format!("{}DICT_SIZE", prefix), config.dictionary_size);
        config.max_corpus_bytes =
            parse_env_var(&format!("{}DICT_MAX_CORPUS", prefix), config.max_corpus_bytes);
        config.reuse_scratch =
            parse_env_bool(&format!("{}DICT_REUSE_SCRATCH", prefix), config.reuse_scratch);
        config.validate()?;
        Ok(config)
    }

    fn performance_preset() -> Self {
        Self {
            dictionary_size: 64 * 1024,
            max_corpus_bytes: MAX_CORPUS_BYTES,
            reuse_scratch: true,
        }
    }

    fn memory_preset() -> Self {
        Self {
            dictionary_size: 16 * 1024,
            max_corpus_bytes: 64 * 1024 * 1024,
            reuse_scratch: false,
        }
    }

    fn realtime_preset() -> Self {
        Self {
            dictionary_size: 8 * 1024,
            max_corpus_bytes: 4 * 1024 * 1024,
            reuse_scratch: true,
        }
    }

    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self).map_err(|e| {
            DictZipError::configuration(format!("Failed to serialize dictionary config: {}", e))
        })?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            DictZipError::configuration(format!("Failed to parse dictionary config file: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }
}

impl DictionaryConfig {
    /// Create a new dictionary configuration builder.
    pub fn builder() -> DictionaryConfigBuilder {
        DictionaryConfigBuilder::new()
    }
}

/// Builder for constructing dictionary configurations.
#[derive(Debug, Clone)]
pub struct DictionaryConfigBuilder {
    config: DictionaryConfig,
}

impl DictionaryConfigBuilder {
    /// Create a new builder starting from the defaults.
    pub fn new() -> Self {
        Self {
            config: DictionaryConfig::default(),
        }
    }

    /// Set the dictionary length.
    pub fn dictionary_size(mut self, size: usize) -> Self {
        self.config.dictionary_size = size;
        self
    }

    /// Set the corpus cap.
    pub fn max_corpus_bytes(mut self, bytes: usize) -> Self {
        self.config.max_corpus_bytes = bytes;
        self
    }

    /// Keep or drop scratch buffers between builds.
    pub fn reuse_scratch(mut self, reuse: bool) -> Self {
        self.config.reuse_scratch = reuse;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<DictionaryConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for DictionaryConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
