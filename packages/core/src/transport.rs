//! The transport port.
//!
//! Clients reach the remote service only through this trait, so tests can
//! substitute canned responses and the production stack stays swappable.

use std::sync::Arc;

use crate::error::{ConfigurationError, TransportError};
use crate::types::{PutRecordInput, PutRecordOutput, PutRecordsInput, PutRecordsOutput};

/// The two remote operations the clients need.
///
/// Each call is one blocking round trip. Implementations must not retry:
/// whatever the service answers is returned as is.
pub trait Transport: Send + Sync {
    /// Write a single record.
    fn put_record(&self, input: &PutRecordInput) -> Result<PutRecordOutput, TransportError>;

    /// Write a batch of records in one call.
    fn put_records(&self, input: &PutRecordsInput) -> Result<PutRecordsOutput, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn put_record(&self, input: &PutRecordInput) -> Result<PutRecordOutput, TransportError> {
        (**self).put_record(input)
    }

    fn put_records(&self, input: &PutRecordsInput) -> Result<PutRecordsOutput, TransportError> {
        (**self).put_records(input)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn put_record(&self, input: &PutRecordInput) -> Result<PutRecordOutput, TransportError> {
        (**self).put_record(input)
    }

    fn put_records(&self, input: &PutRecordsInput) -> Result<PutRecordsOutput, TransportError> {
        (**self).put_records(input)
    }
}

/// Builds configured transports for client constructors.
///
/// `endpoint_override` is the optional constructor argument; an empty string
/// selects the default endpoint resolution.
pub trait TransportFactory: Send + Sync {
    fn connect(&self, endpoint_override: &str) -> Result<Arc<dyn Transport>, ConfigurationError>;
}
