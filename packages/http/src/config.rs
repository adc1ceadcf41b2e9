//! Client configuration: region, credentials and endpoint resolution.
//!
//! Resolution follows the usual AWS chain, restricted to what a load test
//! host actually has: environment variables first, then the shared
//! `credentials` and `config` files of the active profile.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use kinesis_core::ConfigurationError;
use url::Url;

/// Source of configuration variables.
///
/// The process environment in production; a plain map in tests.
pub trait Environment {
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads variables from the process environment. Empty values count as unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|value| !value.is_empty())
    }
}

impl Environment for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).filter(|value| !value.is_empty()).cloned()
    }
}

impl Environment for BTreeMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).filter(|value| !value.is_empty()).cloned()
    }
}

/// Static AWS credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
    /// Where the credentials came from, e.g. `EnvConfigCredentials`.
    pub source: String,
}

impl Credentials {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: Option<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token,
            source: source.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field("session_token", &self.session_token.as_ref().map(|_| "** redacted **"))
            .field("source", &self.source)
            .finish()
    }
}

/// Everything the HTTP transport needs to reach Kinesis.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub region: String,
    pub credentials: Credentials,
    pub endpoint: Url,
    pub timeout: Duration,
}

const ENV_CREDENTIALS_SOURCE: &str = "EnvConfigCredentials";
const DEFAULT_PROFILE: &str = "default";

impl ClientConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Load configuration from the process environment and shared files.
    ///
    /// A non-empty `endpoint_override` replaces the default regional endpoint.
    pub fn load(endpoint_override: &str) -> Result<Self, ConfigurationError> {
        Self::load_from(endpoint_override, &ProcessEnvironment)
    }

    /// Load configuration from an explicit variable source.
    pub fn load_from(
        endpoint_override: &str,
        env: &dyn Environment,
    ) -> Result<Self, ConfigurationError> {
        let profile = env
            .var("AWS_PROFILE")
            .unwrap_or_else(|| DEFAULT_PROFILE.to_string());

        let region = resolve_region(env, &profile)?;
        let credentials = resolve_credentials(env, &profile)?;
        let endpoint = resolve_endpoint(endpoint_override, &region)?;

        tracing::debug!(
            region = %region,
            endpoint = %endpoint,
            credentials = %credentials.source,
            "loaded kinesis client configuration"
        );

        Ok(Self {
            region,
            credentials,
            endpoint,
            timeout: Self::DEFAULT_TIMEOUT,
        })
    }

    /// Use a different request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn resolve_region(env: &dyn Environment, profile: &str) -> Result<String, ConfigurationError> {
    if let Some(region) = env.var("AWS_REGION").or_else(|| env.var("AWS_DEFAULT_REGION")) {
        return Ok(region);
    }

    if let Some(path) = shared_file(env, "AWS_CONFIG_FILE", "config") {
        let profiles = read_profiles(&path)?;
        if let Some(region) = profiles.get(profile).and_then(|p| p.get("region")) {
            return Ok(region.clone());
        }
    }

    Err(ConfigurationError::MissingRegion)
}

fn resolve_credentials(
    env: &dyn Environment,
    profile: &str,
) -> Result<Credentials, ConfigurationError> {
    let access_key_id = env
        .var("AWS_ACCESS_KEY_ID")
        .or_else(|| env.var("AWS_ACCESS_KEY"));
    let secret_access_key = env
        .var("AWS_SECRET_ACCESS_KEY")
        .or_else(|| env.var("AWS_SECRET_KEY"));

    if let (Some(access_key_id), Some(secret_access_key)) = (access_key_id, secret_access_key) {
        return Ok(Credentials::new(
            access_key_id,
            secret_access_key,
            env.var("AWS_SESSION_TOKEN"),
            ENV_CREDENTIALS_SOURCE,
        ));
    }

    if let Some(path) = shared_file(env, "AWS_SHARED_CREDENTIALS_FILE", "credentials") {
        let profiles = read_profiles(&path)?;
        if let Some(section) = profiles.get(profile) {
            if let (Some(access_key_id), Some(secret_access_key)) = (
                section.get("aws_access_key_id"),
                section.get("aws_secret_access_key"),
            ) {
                return Ok(Credentials::new(
                    access_key_id.clone(),
                    secret_access_key.clone(),
                    section.get("aws_session_token").cloned(),
                    format!("SharedConfigCredentials: {}", path.display()),
                ));
            }
        }
    }

    Err(ConfigurationError::MissingCredentials)
}

fn resolve_endpoint(
    endpoint_override: &str,
    region: &str,
) -> Result<Url, ConfigurationError> {
    let override_url = endpoint_override.trim();
    let raw = if override_url.is_empty() {
        let suffix = if region.starts_with("cn-") {
            "amazonaws.com.cn"
        } else {
            "amazonaws.com"
        };
        format!("https://kinesis.{}.{}", region, suffix)
    } else {
        override_url.to_string()
    };

    let invalid = |message: String| ConfigurationError::InvalidEndpoint {
        endpoint: raw.clone(),
        message,
    };

    let url = Url::parse(&raw).map_err(|e| invalid(e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }

    Ok(url)
}

fn shared_file(env: &dyn Environment, variable: &str, file_name: &str) -> Option<PathBuf> {
    env.var(variable)
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".aws").join(file_name)))
}

type Profiles = BTreeMap<String, BTreeMap<String, String>>;

/// Read an INI-style shared file. A missing file has no profiles.
fn read_profiles(path: &Path) -> Result<Profiles, ConfigurationError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(parse_profiles(&text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Profiles::new()),
        Err(e) => Err(ConfigurationError::SharedFile {
            path: path.display().to_string(),
            message: e.to_string(),
        }),
    }
}

/// Parse profile sections. `[profile name]` (config file) and `[name]`
/// (credentials file) both map to `name`.
fn parse_profiles(text: &str) -> Profiles {
    let mut profiles = Profiles::new();
    let mut current: Option<String> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(section) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let section = section.trim();
            let name = section
                .strip_prefix("profile ")
                .map(str::trim)
                .unwrap_or(section);
            profiles.entry(name.to_string()).or_default();
            current = Some(name.to_string());
            continue;
        }

        if let (Some(name), Some((key, value))) = (&current, line.split_once('=')) {
            if let Some(section) = profiles.get_mut(name) {
                section.insert(key.trim().to_string(), value.trim().to_string());
            }
        }
    }

    profiles
}
