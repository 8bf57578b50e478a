// Copyright 2025 ProximaDB
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.

//! Serializer configuration with smart defaults

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{Result, TapeError};

/// Default scratch buffer size of the reusable binary encoder (bytes).
/// Matches the buffer size of Avro's buffered binary encoder.
pub const DEFAULT_ENCODER_BUFFER_SIZE: usize = 2048;

/// Default starting capacity of a freshly allocated key buffer (bytes)
pub const DEFAULT_INITIAL_KEY_CAPACITY: usize = 64;

/// Tuning knobs for a tape serializer instance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SerializerConfig {
    /// Buffered bytes after which the encoder drains into its sink
    pub encoder_buffer_size: usize,

    /// Starting capacity for a key buffer on a cache miss
    pub initial_key_capacity: usize,

    /// Reuse the previous key encoding when consecutive keys are equal
    pub memoize_keys: bool,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            encoder_buffer_size: DEFAULT_ENCODER_BUFFER_SIZE,
            initial_key_capacity: DEFAULT_INITIAL_KEY_CAPACITY,
            memoize_keys: true,
        }
    }
}

impl SerializerConfig {
    /// Parse a serializer configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| TapeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a serializer configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.encoder_buffer_size == 0 {
            return Err(TapeError::Config(
                "encoder_buffer_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Topic definition as stored on disk: a name plus JSON Avro schemas
/// for keys and values, and optional serializer tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopicConfig {
    pub name: String,
    pub key_schema: String,
    pub value_schema: String,
    #[serde(default)]
    pub serializer: SerializerConfig,
}

impl TopicConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| TapeError::Config(e.to_string()))?;
        config.serializer.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }
}
