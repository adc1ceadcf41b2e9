//! The script-facing module surface.
//!
//! A [`RootModule`] is created once per test run with the transport factory
//! to use. Each VU gets a [`ModuleInstance`], whose [`Exports`] hold the two
//! client constructors, `Client` and `AsyncClient`.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use kinesis_core::{ConfigurationError, Error, Transport, TransportFactory, Value};
use kinesis_http::EnvTransportFactory;

use crate::async_client::AsyncClient;
use crate::sync_client::SyncClient;
use crate::vu::Vu;

/// Arguments of a constructor call, as the script passed them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstructorCall {
    arguments: Vec<Value>,
}

impl ConstructorCall {
    pub fn new(arguments: Vec<Value>) -> Self {
        Self { arguments }
    }

    /// Shorthand for a call with an endpoint URL as its only argument.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self::new(vec![Value::String(endpoint.into())])
    }

    /// The argument at `index`; missing arguments read as `Null`.
    pub fn argument(&self, index: usize) -> &Value {
        const NULL: &Value = &Value::Null;
        self.arguments.get(index).unwrap_or(NULL)
    }
}

/// A constructed client, as handed back to the script.
#[derive(Clone)]
pub enum ClientObject {
    Sync(SyncClient),
    Async(AsyncClient),
}

impl ClientObject {
    pub fn type_name(&self) -> &'static str {
        match self {
            ClientObject::Sync(_) => "SyncClient",
            ClientObject::Async(_) => "AsyncClient",
        }
    }

    pub fn as_sync(&self) -> Option<&SyncClient> {
        match self {
            ClientObject::Sync(client) => Some(client),
            ClientObject::Async(_) => None,
        }
    }

    pub fn as_async(&self) -> Option<&AsyncClient> {
        match self {
            ClientObject::Async(client) => Some(client),
            ClientObject::Sync(_) => None,
        }
    }
}

impl fmt::Debug for ClientObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClientObject").field(&self.type_name()).finish()
    }
}

/// A named constructor.
pub type Constructor = Box<dyn Fn(&ConstructorCall) -> Result<ClientObject, Error>>;

/// The named exports of a module instance.
#[derive(Default)]
pub struct Exports {
    named: BTreeMap<&'static str, Constructor>,
}

impl Exports {
    pub fn get(&self, name: &str) -> Option<&Constructor> {
        self.named.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.named.keys().copied()
    }

    /// Call the constructor exported as `name`; `None` if there is none.
    pub fn construct(
        &self,
        name: &str,
        call: &ConstructorCall,
    ) -> Option<Result<ClientObject, Error>> {
        self.get(name).map(|constructor| constructor(call))
    }
}

impl fmt::Debug for Exports {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Module root, shared by every VU of a run.
#[derive(Clone)]
pub struct RootModule {
    factory: Arc<dyn TransportFactory>,
}

impl RootModule {
    pub fn new(factory: Arc<dyn TransportFactory>) -> Self {
        Self { factory }
    }

    /// A module whose clients use the HTTP transport configured from the
    /// environment.
    pub fn from_env() -> Self {
        Self::new(Arc::new(EnvTransportFactory::new()))
    }

    pub fn new_module_instance(&self, vu: Vu) -> ModuleInstance {
        ModuleInstance {
            vu,
            factory: Arc::clone(&self.factory),
        }
    }
}

impl fmt::Debug for RootModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootModule").finish_non_exhaustive()
    }
}

/// The module as seen by one VU.
#[derive(Clone)]
pub struct ModuleInstance {
    vu: Vu,
    factory: Arc<dyn TransportFactory>,
}

impl ModuleInstance {
    pub fn vu(&self) -> &Vu {
        &self.vu
    }

    pub fn exports(&self) -> Exports {
        let mut named: BTreeMap<&'static str, Constructor> = BTreeMap::new();

        let instance = self.clone();
        named.insert(
            "Client",
            Box::new(move |call: &ConstructorCall| {
                instance.new_client(call).map(ClientObject::Sync)
            }),
        );

        let instance = self.clone();
        named.insert(
            "AsyncClient",
            Box::new(move |call: &ConstructorCall| {
                instance.new_async_client(call).map(ClientObject::Async)
            }),
        );

        Exports { named }
    }

    /// Constructor behind the `Client` export.
    pub fn new_client(&self, call: &ConstructorCall) -> Result<SyncClient, Error> {
        Ok(SyncClient::new(self.connect(call)?))
    }

    /// Constructor behind the `AsyncClient` export.
    pub fn new_async_client(&self, call: &ConstructorCall) -> Result<AsyncClient, Error> {
        Ok(AsyncClient::new(self.vu.clone(), self.connect(call)?))
    }

    fn connect(&self, call: &ConstructorCall) -> Result<Arc<dyn Transport>, ConfigurationError> {
        let endpoint = endpoint_argument(call.argument(0))?;
        tracing::debug!(vu = self.vu.id(), endpoint = %endpoint, "constructing kinesis client");
        self.factory.connect(&endpoint)
    }
}

impl fmt::Debug for ModuleInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleInstance")
            .field("vu", &self.vu.id())
            .finish_non_exhaustive()
    }
}

/// The optional endpoint override. Absent or null selects the default chain.
fn endpoint_argument(value: &Value) -> Result<String, ConfigurationError> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(endpoint) => Ok(endpoint.clone()),
        other => Err(ConfigurationError::InvalidEndpointArgument {
            got: other.type_name(),
        }),
    }
}
