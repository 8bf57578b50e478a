// Copyright 2025 ProximaDB
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.

//! Reusable binary encoder handle
//!
//! `BinaryEncoder` owns a scratch buffer that survives across calls. Each call
//! binds it to a sink for the duration of one datum, which yields a
//! `BoundEncoder`. Datum writers encode straight into the bound encoder's
//! buffer; bytes reach the sink when the buffer fills up or on `flush`.

use std::io::Write;

use crate::core::{Result, DEFAULT_ENCODER_BUFFER_SIZE};

#[derive(Debug)]
pub struct BinaryEncoder {
    buffer: Vec<u8>,
    buffer_size: usize,
}

impl BinaryEncoder {
    pub fn new() -> Self {
        Self::with_buffer_size(DEFAULT_ENCODER_BUFFER_SIZE)
    }

    pub fn with_buffer_size(buffer_size: usize) -> Self {
        let buffer_size = buffer_size.max(1);
        Self {
            buffer: Vec::with_capacity(buffer_size),
            buffer_size,
        }
    }

    /// Rebind the handle to a new sink. Bytes left over from an earlier
    /// binding that was never flushed are discarded; the allocation is kept.
    pub fn bind<'a>(&'a mut self, sink: &'a mut dyn Write) -> BoundEncoder<'a> {
        self.buffer.clear();
        BoundEncoder {
            buffer: &mut self.buffer,
            buffer_size: self.buffer_size,
            sink,
        }
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }
}

impl Default for BinaryEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// A `BinaryEncoder` bound to one sink
pub struct BoundEncoder<'a> {
    buffer: &'a mut Vec<u8>,
    buffer_size: usize,
    sink: &'a mut dyn Write,
}

impl<'a> BoundEncoder<'a> {
    /// Append already encoded bytes, draining to the sink once the
    /// buffer reaches its configured size
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.append(bytes);
        self.drain_if_full()
    }

    /// Append without touching the sink
    pub(crate) fn append(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    pub(crate) fn drain_if_full(&mut self) -> Result<()> {
        if self.buffer.len() >= self.buffer_size {
            self.drain()?;
        }
        Ok(())
    }

    /// Move every buffered byte into the sink and flush the sink
    pub fn flush(&mut self) -> Result<()> {
        self.drain()?;
        self.sink.flush()?;
        Ok(())
    }

    /// Bytes accepted but not yet handed to the sink
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    fn drain(&mut self) -> Result<()> {
        if !self.buffer.is_empty() {
            self.sink.write_all(&self.buffer[..])?;
            self.buffer.clear();
        }
        Ok(())
    }
}
