//! # kinesis-client
//!
//! Kinesis clients for single-threaded script runtimes.
//!
//! - [`SyncClient`] blocks the VU thread for one transport round trip.
//! - [`AsyncClient`] returns a [`Promise`] at once and does the work on a
//!   worker thread.
//! - [`EventLoop`] is the bridge between the two worlds: workers enqueue
//!   completions, the VU thread runs them in order and settles promises.
//! - [`RootModule`] and [`ModuleInstance`] expose the clients as the named
//!   constructors `Client` and `AsyncClient`.
//!
//! ```ignore
//! use kinesis_client::{ConstructorCall, RootModule, Vu};
//!
//! let module = RootModule::from_env().new_module_instance(Vu::new(1));
//! let client = module.new_async_client(&ConstructorCall::with_endpoint("http://localhost:4566"))?;
//!
//! module.vu().event_loop().start(|| {
//!     client.put_record(input).on_settle(|result| println!("{:?}", result));
//!     Ok::<_, String>(())
//! })?;
//! ```

pub mod async_client;
pub mod error;
pub mod event_loop;
pub mod module;
pub mod promise;
pub mod sync_client;
pub mod vu;

#[cfg(test)]
mod mock;

pub use async_client::AsyncClient;
pub use error::LoopError;
pub use event_loop::{Callback, EventLoop};
pub use module::{ClientObject, Constructor, ConstructorCall, Exports, ModuleInstance, RootModule};
pub use promise::{Promise, PromiseState, Resolver};
pub use sync_client::SyncClient;
pub use vu::Vu;
