// Copyright 2025 ProximaDB
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.

//! Tape serialization
//!
//! The backing tape queue stores opaque byte blobs. Anything that wants to
//! enqueue typed objects hands it an [`ObjectSerializer`] which writes one
//! object per call into the sink the queue provides. Framing between blobs
//! is the queue's business.

pub mod avro;
pub mod datum;
pub mod encoder;


use std::io::Write;

use crate::core::Result;

pub use avro::{KeyCache, TapeAvroSerializer};
pub use datum::{AvroDatumWriter, AvroEngine, DatumWriter, EncoderEngine};
pub use encoder::{BinaryEncoder, BoundEncoder};

/// Object-to-bytes contract of the tape queue's enqueue path
pub trait ObjectSerializer<T> {
    fn serialize(&mut self, item: &T, sink: &mut dyn Write) -> Result<()>;
}
