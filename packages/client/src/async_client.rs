//! Non-blocking client.

use std::fmt;
use std::sync::Arc;
use std::thread;

use kinesis_core::{PutRecordOutput, PutRecordsOutput, Transport, Value};

use crate::promise::Promise;
use crate::sync_client;
use crate::vu::Vu;

/// Returns a pending promise immediately and does the work on a worker
/// thread.
///
/// Each call spawns one thread that decodes the input and calls the
/// transport. The outcome travels back through the VU's event loop, which
/// settles the promise on the VU thread.
#[derive(Clone)]
pub struct AsyncClient {
    vu: Vu,
    transport: Arc<dyn Transport>,
}

impl AsyncClient {
    pub fn new(vu: Vu, transport: Arc<dyn Transport>) -> Self {
        Self { vu, transport }
    }

    pub fn vu(&self) -> &Vu {
        &self.vu
    }

    pub fn put_record(&self, input: Value) -> Promise<PutRecordOutput> {
        let (promise, resolver) = self.vu.event_loop().register_pending();
        let transport = Arc::clone(&self.transport);
        let vu = self.vu.id();

        thread::spawn(move || {
            tracing::debug!(vu, call = resolver.id(), "put_record worker started");
            resolver.settle(sync_client::put_record(transport.as_ref(), &input));
        });

        promise
    }

    pub fn put_records(&self, input: Value) -> Promise<PutRecordsOutput> {
        let (promise, resolver) = self.vu.event_loop().register_pending();
        let transport = Arc::clone(&self.transport);
        let vu = self.vu.id();

        thread::spawn(move || {
            tracing::debug!(vu, call = resolver.id(), "put_records worker started");
            resolver.settle(sync_client::put_records(transport.as_ref(), &input));
        });

        promise
    }
}

impl fmt::Debug for AsyncClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncClient")
            .field("vu", &self.vu.id())
            .finish_non_exhaustive()
    }
}
