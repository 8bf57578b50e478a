// Copyright 2025 ProximaDB
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.

//! Avro topic descriptor
//!
//! A topic names a logical data stream and fixes the Avro schemas of its
//! keys and values. The key/value Rust types ride along as type parameters;
//! the schemas are the runtime contract that writers are bound against.

use apache_avro::Schema;
use std::fmt;
use std::marker::PhantomData;

use crate::core::{Result, TapeError, TopicConfig};

pub struct AvroTopic<K, V> {
    name: String,
    key_schema: Schema,
    value_schema: Schema,
    _types: PhantomData<fn() -> (K, V)>,
}

impl<K, V> AvroTopic<K, V> {
    /// Create a topic from already parsed schemas
    pub fn new(name: impl Into<String>, key_schema: Schema, value_schema: Schema) -> Self {
        Self {
            name: name.into(),
            key_schema,
            value_schema,
            _types: PhantomData,
        }
    }

    /// Create a topic from JSON schema definitions
    pub fn parse(name: impl Into<String>, key_schema: &str, value_schema: &str) -> Result<Self> {
        let name = name.into();
        let key_schema = Schema::parse_str(key_schema).map_err(|e| {
            TapeError::SchemaBinding(format!("invalid key schema for topic {}: {}", name, e))
        })?;
        let value_schema = Schema::parse_str(value_schema).map_err(|e| {
            TapeError::SchemaBinding(format!("invalid value schema for topic {}: {}", name, e))
        })?;
        Ok(Self::new(name, key_schema, value_schema))
    }

    pub fn from_config(config: &TopicConfig) -> Result<Self> {
        Self::parse(config.name.clone(), &config.key_schema, &config.value_schema)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key_schema(&self) -> &Schema {
        &self.key_schema
    }

    pub fn value_schema(&self) -> &Schema {
        &self.value_schema
    }
}

impl<K, V> Clone for AvroTopic<K, V> {
    fn clone(&self) -> Self {
        Self::new(self.name.clone(), self.key_schema.clone(), self.value_schema.clone())
    }
}

impl<K, V> fmt::Debug for AvroTopic<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvroTopic")
            .field("name", &self.name)
            .field("key_schema", &self.key_schema.canonical_form())
            .field("value_schema", &self.value_schema.canonical_form())
            .finish()
    }
}
