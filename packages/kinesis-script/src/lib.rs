//! Kinesis clients for scripted load tests.
//!
//! Scripts write records through one of two clients. `Client` blocks the
//! calling virtual user for each call; `AsyncClient` hands back a promise and
//! settles it on the virtual user's event loop once a worker thread finishes.
//!
//! ```ignore
//! use kinesis_script::{ConstructorCall, RootModule, Value, Vu};
//!
//! let module = RootModule::from_env().new_module_instance(Vu::new(1));
//! let exports = module.exports();
//! let client = exports.construct("Client", &ConstructorCall::default()).unwrap()?;
//!
//! let input = Value::from(serde_json::json!({
//!     "Data": [102, 111, 111],
//!     "PartitionKey": "PK",
//!     "StreamName": "STREAM_NAME",
//! }));
//! client.as_sync().unwrap().put_record(&input)?;
//! ```
//!
//! The crate re-exports:
//! - [`kinesis_core`]: values, decoding, errors, the transport port
//! - [`kinesis_http`]: configuration chain and the signed HTTP transport
//! - [`kinesis_client`]: event loop, promises, clients, module surface

pub use kinesis_core::{
    ConfigurationError, Decode, DecodeError, DecodeErrorKind, EncryptionType, Error, FieldPath,
    PutRecordInput, PutRecordOutput, PutRecordsInput, PutRecordsOutput, PutRecordsRequestEntry,
    PutRecordsResultEntry, Transport, TransportError, TransportFactory, Value,
};

pub use kinesis_http::{ClientConfig, Credentials, EnvTransportFactory, HttpTransport};

pub use kinesis_client::{
    AsyncClient, ClientObject, ConstructorCall, EventLoop, Exports, LoopError, ModuleInstance,
    Promise, PromiseState, Resolver, RootModule, SyncClient, Vu,
};

pub use kinesis_client;
pub use kinesis_core;
pub use kinesis_http;
