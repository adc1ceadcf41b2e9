//! Blocking client.

use std::fmt;
use std::sync::Arc;

use kinesis_core::{
    Error, PutRecordInput, PutRecordOutput, PutRecordsInput, PutRecordsOutput, Transport, Value,
};

/// Decodes script input and writes it with one blocking transport call.
///
/// Errors are returned as is: a decode failure never reaches the transport,
/// and a transport failure carries the service's code and message verbatim.
#[derive(Clone)]
pub struct SyncClient {
    transport: Arc<dyn Transport>,
}

impl SyncClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn put_record(&self, input: &Value) -> Result<PutRecordOutput, Error> {
        put_record(self.transport.as_ref(), input)
    }

    pub fn put_records(&self, input: &Value) -> Result<PutRecordsOutput, Error> {
        put_records(self.transport.as_ref(), input)
    }
}

impl fmt::Debug for SyncClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncClient").finish_non_exhaustive()
    }
}

// Shared with the async workers so both paths fail the same way.
pub(crate) fn put_record(
    transport: &dyn Transport,
    input: &Value,
) -> Result<PutRecordOutput, Error> {
    let request = PutRecordInput::decode(input)?;
    Ok(transport.put_record(&request)?)
}

pub(crate) fn put_records(
    transport: &dyn Transport,
    input: &Value,
) -> Result<PutRecordsOutput, Error> {
    let request = PutRecordsInput::decode(input)?;
    Ok(transport.put_records(&request)?)
}
