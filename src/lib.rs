/*
 * Copyright 2025 Vijaykumar Singh
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! # TapeAvro - Avro record serialization for tape queues
//!
//! Tape queues persist opaque byte blobs, one per record. This crate turns
//! typed key/value records of an Avro topic into those blobs.
//!
//! ## Record layout
//!
//! ```text
//! [8 bytes: 0x00 x 8] [avro binary key] [avro binary value]
//! ```
//!
//! - **Legacy header**: eight reserved zero bytes, kept for file-format
//!   compatibility
//! - **No framing**: key and value follow each other without length
//!   prefixes; the queue frames whole blobs
//! - **Key memoization**: runs of records with equal keys encode the key once

pub mod core;
pub mod schema;
pub mod storage;

pub use crate::core::*;
pub use schema::AvroTopic;
pub use storage::tape::{
    AvroDatumWriter, AvroEngine, BinaryEncoder, BoundEncoder, DatumWriter, EncoderEngine,
    KeyCache, ObjectSerializer, TapeAvroSerializer,
};
