//! Mock transport for testing.
//!
//! Returns scripted outcomes and records every request it receives.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use kinesis_core::{
    PutRecordInput, PutRecordOutput, PutRecordsInput, PutRecordsOutput, Transport, TransportError,
};

/// A mock transport shared between a test and the clients under test.
#[derive(Clone, Default)]
pub struct MockTransport {
    /// Outcome for single-record writes.
    record_result: Arc<Mutex<Option<Result<PutRecordOutput, TransportError>>>>,
    /// Outcome for batch writes.
    records_result: Arc<Mutex<Option<Result<PutRecordsOutput, TransportError>>>>,
    /// Recorded single-record requests.
    recorded_records: Arc<Mutex<Vec<PutRecordInput>>>,
    /// Recorded batch requests.
    recorded_batches: Arc<Mutex<Vec<PutRecordsInput>>>,
    /// Artificial latency per call.
    delay: Arc<Mutex<Option<Duration>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record_output(self, output: PutRecordOutput) -> Self {
        *self.record_result.lock().unwrap() = Some(Ok(output));
        self
    }

    pub fn with_records_output(self, output: PutRecordsOutput) -> Self {
        *self.records_result.lock().unwrap() = Some(Ok(output));
        self
    }

    /// Fail every call with `error`.
    pub fn fail_with(self, error: TransportError) -> Self {
        *self.record_result.lock().unwrap() = Some(Err(error.clone()));
        *self.records_result.lock().unwrap() = Some(Err(error));
        self
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.lock().unwrap() = Some(delay);
        self
    }

    pub fn recorded_records(&self) -> Vec<PutRecordInput> {
        self.recorded_records.lock().unwrap().clone()
    }

    pub fn recorded_batches(&self) -> Vec<PutRecordsInput> {
        self.recorded_batches.lock().unwrap().clone()
    }

    /// Total calls of either operation.
    pub fn call_count(&self) -> usize {
        self.recorded_records.lock().unwrap().len() + self.recorded_batches.lock().unwrap().len()
    }

    fn wait(&self) {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }
    }
}

impl Transport for MockTransport {
    fn put_record(&self, input: &PutRecordInput) -> Result<PutRecordOutput, TransportError> {
        self.recorded_records.lock().unwrap().push(input.clone());
        self.wait();
        self.record_result
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(PutRecordOutput::default()))
    }

    fn put_records(&self, input: &PutRecordsInput) -> Result<PutRecordsOutput, TransportError> {
        self.recorded_batches.lock().unwrap().push(input.clone());
        self.wait();
        self.records_result
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(PutRecordsOutput::default()))
    }
}
