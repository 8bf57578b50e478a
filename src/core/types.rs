// Copyright 2025 ProximaDB
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.

use serde::{Deserialize, Serialize};

/// Number of reserved bytes at the start of every serialized record
pub const HEADER_LEN: usize = 8;

/// Legacy record header. Kept for file-format compatibility; always
/// written as zeros and carries no length or checksum.
pub const EMPTY_HEADER: [u8; HEADER_LEN] = [0; HEADER_LEN];

/// One key/value pair on its way into the tape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> Record<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}

/// Per-instance counters of a tape serializer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializerStats {
    /// Records that completed without error
    pub records: u64,
    /// Calls that reused the cached key encoding
    pub key_cache_hits: u64,
    /// Calls that ran the key writer
    pub key_encodings: u64,
    /// Bytes accepted by sinks, header included, failed calls too
    pub bytes_written: u64,
}
