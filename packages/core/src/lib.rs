//! Core layer of the Kinesis script bridge.
//!
//! This crate holds everything that does not depend on a network stack or a
//! script runtime:
//! - `Value`: the loosely-typed tree that script code hands to a client
//! - `FieldPath`: a location inside a `Value`, used in decode errors
//! - `Decode`: conversion from `Value` into the typed Kinesis requests
//! - `Transport`: the two remote operations the clients need
//!
//! # Example
//!
//! ```rust
//! use kinesis_core::{PutRecordInput, Value};
//!
//! let input = Value::from(serde_json::json!({
//!     "Data": [104, 105],
//!     "PartitionKey": "pk",
//!     "StreamName": "stream",
//! }));
//!
//! let request = PutRecordInput::decode(&input).unwrap();
//! assert_eq!(request.data, b"hi".to_vec());
//! assert_eq!(request.partition_key, "pk");
//! ```

mod convert;
pub mod decode;
mod error;
mod path;
pub mod transport;
mod types;
mod value;

pub use decode::Decode;
pub use error::{ConfigurationError, DecodeError, DecodeErrorKind, Error, TransportError};
pub use path::FieldPath;
pub use transport::{Transport, TransportFactory};
pub use types::{
    EncryptionType, PutRecordInput, PutRecordOutput, PutRecordsInput, PutRecordsOutput,
    PutRecordsRequestEntry, PutRecordsResultEntry,
};
pub use value::Value;
