//! Error types shared by every layer.

use thiserror::Error;

use crate::path::FieldPath;

/// Why a field could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeErrorKind {
    /// A map was required (the input root, or a batch entry).
    #[error("expected a map, got '{got}'")]
    ExpectedMap { got: &'static str },

    /// A byte sequence or a list was required.
    #[error("expected an array or slice, got {got}")]
    ExpectedSequence { got: &'static str },

    /// A string was required.
    #[error("expected type 'string', got unconvertible type '{got}', value: '{value}'")]
    ExpectedString { got: &'static str, value: String },

    /// An element of a byte sequence was not a number.
    #[error("expected type 'uint8', got unconvertible type '{got}', value: '{value}'")]
    ExpectedByte { got: &'static str, value: String },

    /// An element of a byte sequence does not fit in a byte.
    #[error("value {value} overflows uint8")]
    ByteOverflow { value: String },
}

/// The input did not match the shape of the target request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("decoding '{path}': {kind}")]
pub struct DecodeError {
    pub path: FieldPath,
    pub kind: DecodeErrorKind,
}

impl DecodeError {
    pub fn new(path: FieldPath, kind: DecodeErrorKind) -> Self {
        Self { path, kind }
    }
}

/// A failure reported by the remote service or by the way to it.
///
/// `code` is the service's error identity (e.g.
/// `ProvisionedThroughputExceededException`) and `message` its text. Both
/// pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct TransportError {
    pub code: String,
    pub message: String,
}

impl TransportError {
    pub const PROVISIONED_THROUGHPUT_EXCEEDED: &'static str =
        "ProvisionedThroughputExceededException";
    pub const CONNECTIVITY: &'static str = "ConnectivityError";
    pub const TIMEOUT: &'static str = "TimeoutError";
    pub const RESPONSE_DECODE: &'static str = "ResponseDecodeError";
    pub const SIGNING: &'static str = "SigningError";
    pub const SERIALIZATION: &'static str = "SerializationError";

    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn is_throughput_exceeded(&self) -> bool {
        self.code == Self::PROVISIONED_THROUGHPUT_EXCEEDED
    }
}

/// The configuration chain could not produce a usable client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("unable to read the endpoint URL argument, expected a string, got {got}")]
    InvalidEndpointArgument { got: &'static str },

    #[error("invalid endpoint URL '{endpoint}': {message}")]
    InvalidEndpoint { endpoint: String, message: String },

    #[error("no region configured; set AWS_REGION or a region in the shared config file")]
    MissingRegion,

    #[error("no credentials found in the environment or the shared credentials file")]
    MissingCredentials,

    #[error("unable to read shared configuration file '{path}': {message}")]
    SharedFile { path: String, message: String },

    #[error("unable to build HTTP client: {message}")]
    HttpClient { message: String },
}

/// Any failure a client can surface to script code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
