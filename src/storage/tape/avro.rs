// Copyright 2025 ProximaDB
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.

//! Avro tape serializer - converts topic records into tape blobs
//!
//! Every record is laid out as `[8 zero bytes][avro key][avro value]`.
//! Telemetry tends to arrive in runs of records sharing one key, so the
//! encoding of the previous key is kept and replayed while keys repeat.

use serde::Serialize;
use std::io::Write;
use tracing::{debug, trace};

use super::datum::{DatumWriter, EncoderEngine};
use super::encoder::BinaryEncoder;
use super::ObjectSerializer;
use crate::core::{Record, Result, SerializerConfig, SerializerStats, EMPTY_HEADER};
use crate::schema::AvroTopic;

/// Encoding of the most recently serialized key
#[derive(Debug, Clone, PartialEq)]
pub enum KeyCache<K> {
    Unset,
    Cached { key: K, bytes: Vec<u8> },
}

impl<K: PartialEq> KeyCache<K> {
    /// Cached bytes for `key`, if it equals the cached key
    pub fn lookup(&self, key: &K) -> Option<&[u8]> {
        match self {
            KeyCache::Cached { key: cached, bytes } if cached == key => Some(bytes.as_slice()),
            _ => None,
        }
    }
}

/// Serializes `Record<K, V>` of one topic into a tape sink.
///
/// Not synchronized: one instance per producer, or wrap it in a lock.
pub struct TapeAvroSerializer<K, V> {
    topic_name: String,
    key_writer: Box<dyn DatumWriter<K>>,
    value_writer: Box<dyn DatumWriter<V>>,
    encoder: BinaryEncoder,
    key_cache: KeyCache<K>,
    config: SerializerConfig,
    stats: SerializerStats,
}

impl<K, V> TapeAvroSerializer<K, V>
where
    K: Serialize + Clone + PartialEq + 'static,
    V: Serialize + 'static,
{
    pub fn new<E: EncoderEngine>(topic: &AvroTopic<K, V>, engine: &E) -> Result<Self> {
        Self::with_config(topic, engine, SerializerConfig::default())
    }

    pub fn with_config<E: EncoderEngine>(
        topic: &AvroTopic<K, V>,
        engine: &E,
        config: SerializerConfig,
    ) -> Result<Self> {
        config.validate()?;

        let key_writer = engine.create_writer::<K>(topic.key_schema())?;
        let value_writer = engine.create_writer::<V>(topic.value_schema())?;
        debug!(
            "Bound tape writers for topic {} (encoder buffer {} bytes, key memoization {})",
            topic.name(),
            config.encoder_buffer_size,
            config.memoize_keys
        );

        Ok(Self {
            topic_name: topic.name().to_string(),
            key_writer,
            value_writer,
            encoder: BinaryEncoder::with_buffer_size(config.encoder_buffer_size),
            key_cache: KeyCache::Unset,
            config,
            stats: SerializerStats::default(),
        })
    }
}

impl<K, V> TapeAvroSerializer<K, V>
where
    K: Clone + PartialEq,
{
    /// Append one record to `sink`.
    ///
    /// On error the sink may hold a partial record; the caller owns
    /// rollback. A new key is cached before the value is encoded, so a
    /// failing value still leaves its key cached. `bytes_written` counts
    /// every byte the sink accepted, including those of a failed call.
    pub fn serialize(&mut self, record: &Record<K, V>, sink: &mut dyn Write) -> Result<()> {
        let mut counting = CountingSink::new(sink);
        let result = self.write_record(record, &mut counting);
        self.stats.bytes_written += counting.written;
        if result.is_ok() {
            self.stats.records += 1;
        }
        result
    }

    fn write_record(&mut self, record: &Record<K, V>, sink: &mut dyn Write) -> Result<()> {
        sink.write_all(&EMPTY_HEADER)?;

        let cached = if self.config.memoize_keys {
            self.key_cache.lookup(&record.key).is_some()
        } else {
            false
        };

        if cached {
            self.stats.key_cache_hits += 1;
            trace!("Key cache hit on topic {}", self.topic_name);
        } else {
            let mut key_out: Vec<u8> = Vec::with_capacity(self.config.initial_key_capacity);
            {
                let mut bound = self.encoder.bind(&mut key_out);
                self.key_writer.write(&record.key, &mut bound)?;
                bound.flush()?;
            }
            self.stats.key_encodings += 1;
            trace!(
                "Key cache miss on topic {}, encoded {} key bytes",
                self.topic_name,
                key_out.len()
            );
            self.key_cache = KeyCache::Cached {
                key: record.key.clone(),
                bytes: key_out,
            };
        }

        let key_bytes: &[u8] = match &self.key_cache {
            KeyCache::Cached { bytes, .. } => bytes,
            KeyCache::Unset => &[],
        };
        sink.write_all(key_bytes)?;

        let mut bound = self.encoder.bind(sink);
        self.value_writer.write(&record.value, &mut bound)?;
        bound.flush()
    }

    pub fn topic_name(&self) -> &str {
        &self.topic_name
    }

    pub fn key_cache(&self) -> &KeyCache<K> {
        &self.key_cache
    }

    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }

    pub fn stats(&self) -> SerializerStats {
        self.stats
    }
}

impl<K, V> ObjectSerializer<Record<K, V>> for TapeAvroSerializer<K, V>
where
    K: Clone + PartialEq,
{
    fn serialize(&mut self, item: &Record<K, V>, sink: &mut dyn Write) -> Result<()> {
        TapeAvroSerializer::serialize(self, item, sink)
    }
}

/// Tracks how many bytes the sink accepted
struct CountingSink<'a> {
    inner: &'a mut dyn Write,
    written: u64,
}

impl<'a> CountingSink<'a> {
    fn new(inner: &'a mut dyn Write) -> Self {
        Self { inner, written: 0 }
    }
}

impl Write for CountingSink<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
