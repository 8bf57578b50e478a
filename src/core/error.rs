// Copyright 2025 ProximaDB
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TapeError>;

#[derive(Error, Debug)]
pub enum TapeError {
    /// A topic schema could not be parsed or bound to a writer.
    /// The serializer instance is never produced.
    #[error("Schema binding error: {0}")]
    SchemaBinding(String),

    /// A key or value does not fit its bound schema.
    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TapeError {
    pub fn is_io(&self) -> bool {
        matches!(self, TapeError::Io(_))
    }

    pub fn is_encoding(&self) -> bool {
        matches!(self, TapeError::Encoding(_))
    }
}
