//! Fields contributed by capabilities.

use serde::{Deserialize, Serialize};

/// Semantic type of a stored field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum FieldType {
    Identifier,
    String,
    Text,
    Integer,
    Decimal,
    Boolean,
    Timestamp,
    /// Closed set of values, named after its helper enum.
    Enumeration { name: String },
    /// Identifier of an instance of another definition.
    Reference { definition: String },
}

/// A named, typed storage slot on a definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub field_type: FieldType,
    /// Storage length for strings and enumerations.
    pub length: Option<u32>,
    /// Precision and scale for decimals.
    pub precision: Option<(u8, u8)>,
    pub indexed: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            length: None,
            precision: None,
            indexed: false,
        }
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_precision(mut self, precision: u8, scale: u8) -> Self {
        self.precision = Some((precision, scale));
        self
    }

    pub fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }
}
