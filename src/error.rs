//! Error types for archlens.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::model::ElementType;

/// A value model invariant was violated at construction or mutation time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required text field was empty or whitespace only.
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    /// A string did not name a member of a closed enumeration.
    #[error("'{value}' is not a valid {enumeration}")]
    UnknownVariant {
        enumeration: &'static str,
        value: String,
    },

    /// The element shape does not belong to the element type.
    #[error("element type {element_type} cannot carry a {shape} shape")]
    ShapeMismatch {
        element_type: ElementType,
        shape: &'static str,
    },
}

/// An element identifier was inserted twice into the same model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("element '{id}' already exists in the model")]
pub struct DuplicateElementError {
    pub id: String,
}

/// A requested element or stored model does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotFoundError {
    #[error("element '{id}' not found")]
    Element { id: String },

    #[error("model '{name}' not found at '{path}'")]
    Model { name: String, path: PathBuf },
}

/// Location inside a JSON document, rendered as `$.elements[2].name`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonPath(Vec<Segment>);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Field(String),
    Index(usize),
}

impl JsonPath {
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Field(name.to_string()));
        Self(segments)
    }

    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Index(index));
        Self(segments)
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.0 {
            match segment {
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// The input does not conform to the expected shape.
#[derive(Debug, Error)]
#[error("{kind} (at {path})")]
pub struct DeserializeError {
    pub path: JsonPath,
    #[source]
    pub kind: DeserializeErrorKind,
}

impl DeserializeError {
    #[must_use]
    pub fn new(path: JsonPath, kind: DeserializeErrorKind) -> Self {
        Self { path, kind }
    }
}

#[derive(Debug, Error)]
pub enum DeserializeErrorKind {
    /// The document is not syntactically valid JSON.
    #[error("malformed JSON: {0}")]
    Syntax(#[source] serde_json::Error),

    /// The document could not be read from disk.
    #[error("failed to read model file: {0}")]
    Read(#[source] std::io::Error),

    #[error("missing discriminator field 'element_type'")]
    MissingDiscriminator,

    #[error("unknown element type '{0}'")]
    UnknownElementType(String),

    #[error("missing required field '{0}'")]
    MissingField(String),

    #[error("invalid {enumeration} value '{value}'")]
    InvalidEnumValue {
        enumeration: &'static str,
        value: String,
    },

    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A value model invariant failed while building the typed value.
    #[error("invalid value: {0}")]
    Invalid(#[source] ValidationError),

    /// The stored document belongs to a different model than requested.
    #[error("expected model '{expected}', found '{found}'")]
    IdMismatch { expected: String, found: String },

    /// The document lists the same element identifier twice.
    #[error("{0}")]
    DuplicateElement(#[source] DuplicateElementError),
}

/// The typed graph could not be written.
#[derive(Debug, Error)]
pub enum SerializeError {
    /// NaN and infinities have no JSON representation.
    #[error("non-finite number at {path} has no JSON representation")]
    NonFiniteNumber { path: JsonPath },

    /// JSON strings are UTF-8; other paths cannot be written losslessly.
    #[error("path at {path} is not valid UTF-8")]
    NonUtf8Path { path: JsonPath },

    #[error("JSON serialization failed: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to replace '{path}': {source}")]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors reported by [`crate::store::ModelStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Deserialization(#[from] DeserializeError),

    #[error(transparent)]
    Serialization(#[from] SerializeError),
}

/// Errors that can occur when exporting data.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Failed to create the output file.
    #[error("failed to create file '{path}': {source}")]
    FileCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write data to the file.
    #[error("failed to write data: {message}")]
    WriteError { message: String },

    /// Failed to write CSV data.
    #[error("CSV write failed: {source}")]
    CsvWrite {
        #[from]
        source: csv::Error,
    },
}

/// Errors raised while assembling the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid configuration value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Errors raised while installing the log subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to open log file '{path}': {source}")]
    OpenFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid log filter '{directive}': {message}")]
    Filter { directive: String, message: String },

    #[error("a global log subscriber is already installed")]
    AlreadyInstalled,
}
