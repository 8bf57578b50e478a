// Copyright 2025 ProximaDB
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.

//! Schema-bound datum writers and the engine that creates them

use apache_avro::{to_value, types::Value, GenericSingleObjectWriter, Schema};
use serde::Serialize;
use std::io::Write;
use std::marker::PhantomData;

use super::encoder::{BinaryEncoder, BoundEncoder};
use crate::core::{Result, TapeError};

/// Single-object framing: two marker bytes and the 8-byte schema fingerprint
const SINGLE_OBJECT_HEADER_LEN: usize = 10;

const INITIAL_DATUM_CAPACITY: usize = 256;

/// Encodes values of one type under the schema it was bound to
pub trait DatumWriter<T> {
    fn write(&mut self, datum: &T, encoder: &mut BoundEncoder<'_>) -> Result<()>;
}

/// Produces schema-bound writers. Binding is validated once here so
/// writers never re-check the schema itself per call.
pub trait EncoderEngine {
    fn create_writer<T>(&self, schema: &Schema) -> Result<Box<dyn DatumWriter<T>>>
    where
        T: Serialize + 'static;
}

/// Avro binary datum encoding backed by `apache-avro`.
///
/// Datums go through serde into an Avro value, are resolved against the
/// bound schema (maps become records, longs narrow to ints when in range,
/// options pick their union branch) and are encoded without any container
/// framing.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvroEngine;

impl AvroEngine {
    pub fn new() -> Self {
        Self
    }
}

impl EncoderEngine for AvroEngine {
    fn create_writer<T>(&self, schema: &Schema) -> Result<Box<dyn DatumWriter<T>>>
    where
        T: Serialize + 'static,
    {
        if let Schema::Ref { name } = schema {
            return Err(TapeError::SchemaBinding(format!(
                "cannot bind a writer to unresolved reference {}",
                name.fullname(None)
            )));
        }
        Ok(Box::new(AvroDatumWriter::<T>::new(schema.clone())?))
    }
}

/// Writes datums straight into the bound encoder's buffer.
///
/// The wrapped single-object writer keeps its own scratch buffer across
/// calls; its framing header is dropped on the way into the encoder.
pub struct AvroDatumWriter<T> {
    schema: Schema,
    single_object: GenericSingleObjectWriter,
    _datum: PhantomData<fn(&T)>,
}

impl<T> AvroDatumWriter<T> {
    pub fn new(schema: Schema) -> Result<Self> {
        let single_object = single_object_writer(&schema)?;
        Ok(Self {
            schema,
            single_object,
            _datum: PhantomData,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

impl<T: Serialize> AvroDatumWriter<T> {
    /// Encode a datum into a standalone byte vector
    pub fn encode(&mut self, datum: &T) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut encoder = BinaryEncoder::new();
        {
            let mut bound = encoder.bind(&mut out);
            self.write(datum, &mut bound)?;
            bound.flush()?;
        }
        Ok(out)
    }

    fn resolve(&self, datum: &T) -> Result<Value> {
        let value = to_value(datum).map_err(|e| TapeError::Encoding(e.to_string()))?;
        let original = if contains_long(&value) {
            Some(value.clone())
        } else {
            None
        };
        let resolved = value
            .resolve(&self.schema)
            .map_err(|e| TapeError::Encoding(e.to_string()))?;
        if let Some(original) = original {
            check_narrowing(&original, &resolved)?;
        }
        Ok(resolved)
    }
}

impl<T: Serialize> DatumWriter<T> for AvroDatumWriter<T> {
    fn write(&mut self, datum: &T, encoder: &mut BoundEncoder<'_>) -> Result<()> {
        let value = self.resolve(datum)?;

        let mut body = DatumBody {
            encoder: &mut *encoder,
            skip: SINGLE_OBJECT_HEADER_LEN,
        };
        if let Err(e) = self.single_object.write_value_ref(&value, &mut body) {
            // a failed write can leave the scratch buffer past its header
            self.single_object = single_object_writer(&self.schema)?;
            return Err(TapeError::Encoding(e.to_string()));
        }
        encoder.drain_if_full()
    }
}

fn single_object_writer(schema: &Schema) -> Result<GenericSingleObjectWriter> {
    GenericSingleObjectWriter::new_with_capacity(schema, INITIAL_DATUM_CAPACITY)
        .map_err(|e| TapeError::SchemaBinding(e.to_string()))
}

/// Forwards a single-object frame into the encoder buffer minus its header.
/// Never touches the sink, so sink failures stay `Io` errors.
struct DatumBody<'e, 'a> {
    encoder: &'e mut BoundEncoder<'a>,
    skip: usize,
}

impl Write for DatumBody<'_, '_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let skipped = self.skip.min(buf.len());
        self.skip -= skipped;
        self.encoder.append(&buf[skipped..]);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn contains_long(value: &Value) -> bool {
    match value {
        Value::Long(_) => true,
        Value::Union(_, inner) => contains_long(inner),
        Value::Array(items) => items.iter().any(contains_long),
        Value::Map(entries) => entries.values().any(contains_long),
        Value::Record(fields) => fields.iter().any(|(_, v)| contains_long(v)),
        _ => false,
    }
}

/// Resolution narrows longs into `int` slots with a truncating cast; any
/// long that did not survive the narrowing unchanged is rejected.
fn check_narrowing(original: &Value, resolved: &Value) -> Result<()> {
    match (original, resolved) {
        (Value::Long(n), Value::Int(i) | Value::Date(i) | Value::TimeMillis(i)) => {
            if i64::from(*i) != *n {
                return Err(TapeError::Encoding(format!(
                    "long {} does not fit an int field",
                    n
                )));
            }
            Ok(())
        }
        (Value::Union(_, original), Value::Union(_, resolved)) => {
            check_narrowing(original, resolved)
        }
        (original, Value::Union(_, resolved)) => check_narrowing(original, resolved),
        (Value::Array(originals), Value::Array(resolved)) => originals
            .iter()
            .zip(resolved)
            .try_for_each(|(o, r)| check_narrowing(o, r)),
        (Value::Map(originals), Value::Map(resolved)) => {
            for (key, r) in resolved {
                if let Some(o) = originals.get(key) {
                    check_narrowing(o, r)?;
                }
            }
            Ok(())
        }
        (Value::Map(originals), Value::Record(fields)) => {
            for (name, r) in fields {
                if let Some(o) = originals.get(name) {
                    check_narrowing(o, r)?;
                }
            }
            Ok(())
        }
        (Value::Record(originals), Value::Record(fields)) => {
            for (name, r) in fields {
                if let Some((_, o)) = originals.iter().find(|(n, _)| n == name) {
                    check_narrowing(o, r)?;
                }
            }
            Ok(())
        }
        _ => Ok(()),
    }
}
