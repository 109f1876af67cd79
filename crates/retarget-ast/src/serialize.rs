//! JSON serialization of predicates
//!
//! Predicates round-trip through JSON with every node tagged by kind and
//! carrying its recorded type. Deserializing only checks the predicate's
//! shape; run [`TypeChecker`](crate::TypeChecker) before trusting the tree.

use std::io::{Read, Write};

use crate::{Lambda, Predicate};
use retarget_diagnostics::{RT0406, RetargetError};

/// Errors that can occur during serialization
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    /// JSON serialization error, including predicate shape violations
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SerializeError> for RetargetError {
    fn from(err: SerializeError) -> Self {
        RetargetError::system(RT0406, err.to_string())
    }
}

/// JSON serializer for trees
#[derive(Debug, Default, Clone)]
pub struct JsonSerializer {
    /// Whether to produce pretty-printed output
    pub pretty: bool,
}

impl JsonSerializer {
    /// Create a new JSON serializer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new JSON serializer with pretty-printing enabled
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    /// Serialize a predicate to a string
    pub fn serialize(&self, predicate: &Predicate) -> Result<String, SerializeError> {
        self.serialize_lambda(predicate.as_lambda())
    }

    /// Serialize any lambda to a string
    pub fn serialize_lambda(&self, lambda: &Lambda) -> Result<String, SerializeError> {
        let json = if self.pretty {
            serde_json::to_string_pretty(lambda)?
        } else {
            serde_json::to_string(lambda)?
        };
        Ok(json)
    }

    /// Serialize a predicate to a writer
    pub fn serialize_to_writer<W: Write>(
        &self,
        predicate: &Predicate,
        mut writer: W,
    ) -> Result<(), SerializeError> {
        let json = self.serialize(predicate)?;
        writer.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Deserialize a predicate from a string
    pub fn deserialize(&self, input: &str) -> Result<Predicate, SerializeError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Deserialize any lambda from a string
    pub fn deserialize_lambda(&self, input: &str) -> Result<Lambda, SerializeError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Deserialize a predicate from a reader
    pub fn deserialize_from_reader<R: Read>(&self, mut reader: R) -> Result<Predicate, SerializeError> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        self.deserialize(&content)
    }
}

/// Serialize a predicate to compact JSON
pub fn to_json(predicate: &Predicate) -> Result<String, SerializeError> {
    JsonSerializer::new().serialize(predicate)
}

/// Serialize a predicate to pretty-printed JSON
pub fn to_json_pretty(predicate: &Predicate) -> Result<String, SerializeError> {
    JsonSerializer::pretty().serialize(predicate)
}

/// Deserialize a predicate from JSON
pub fn from_json(input: &str) -> Result<Predicate, SerializeError> {
    JsonSerializer::new().deserialize(input)
}
