//! # kinesis-http
//!
//! Production transport for the Kinesis clients.
//!
//! [`HttpTransport`] speaks the Kinesis JSON 1.1 protocol over a blocking
//! reqwest client and signs every request with AWS Signature Version 4.
//! [`ClientConfig`] resolves region, credentials and endpoint from the
//! environment and the shared AWS files.
//!
//! ```ignore
//! use kinesis_core::Transport;
//! use kinesis_http::{ClientConfig, HttpTransport};
//!
//! let config = ClientConfig::load("http://localhost:4566")?;
//! let transport = HttpTransport::new(config)?;
//! let output = transport.put_record(&input)?;
//! ```

pub mod config;
pub mod signing;
pub mod transport;

use std::sync::Arc;
use std::time::Duration;

use kinesis_core::{ConfigurationError, Transport, TransportFactory};

pub use config::{ClientConfig, Credentials, Environment, ProcessEnvironment};
pub use signing::RequestSigner;
pub use transport::HttpTransport;

/// Builds an [`HttpTransport`] from the process environment on every connect.
#[derive(Debug, Clone)]
pub struct EnvTransportFactory {
    timeout: Duration,
}

impl EnvTransportFactory {
    pub fn new() -> Self {
        Self {
            timeout: ClientConfig::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for EnvTransportFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl TransportFactory for EnvTransportFactory {
    fn connect(&self, endpoint_override: &str) -> Result<Arc<dyn Transport>, ConfigurationError> {
        let config = ClientConfig::load(endpoint_override)?.with_timeout(self.timeout);
        Ok(Arc::new(HttpTransport::new(config)?))
    }
}
