//! Kinesis JSON 1.1 transport over a blocking reqwest client.

use chrono::Utc;
use http::StatusCode;
use kinesis_core::{
    ConfigurationError, PutRecordInput, PutRecordOutput, PutRecordsInput, PutRecordsOutput,
    Transport, TransportError,
};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::signing::RequestSigner;

const CONTENT_TYPE: &str = "application/x-amz-json-1.1";
const TARGET_PREFIX: &str = "Kinesis_20131202";
const ERROR_TYPE_HEADER: &str = "x-amzn-errortype";
const UNKNOWN_ERROR: &str = "UnknownError";

/// Production transport: one signed HTTP round trip per operation.
pub struct HttpTransport {
    client: Client,
    config: ClientConfig,
}

impl HttpTransport {
    pub const SERVICE: &'static str = "kinesis";

    /// Build a transport with the configured timeout.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigurationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigurationError::HttpClient {
                message: e.to_string(),
            })?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn invoke<I, O>(&self, operation: &str, input: &I) -> Result<O, TransportError>
    where
        I: Serialize,
        O: DeserializeOwned,
    {
        let body = serde_json::to_vec(input)
            .map_err(|e| TransportError::new(TransportError::SERIALIZATION, e.to_string()))?;

        let base = vec![
            ("content-type".to_string(), CONTENT_TYPE.to_string()),
            (
                "x-amz-target".to_string(),
                format!("{}.{}", TARGET_PREFIX, operation),
            ),
        ];
        let signer = RequestSigner::new(
            &self.config.credentials,
            &self.config.region,
            Self::SERVICE,
        );
        let signed = signer.sign("POST", &self.config.endpoint, &base, &body, Utc::now())?;

        let mut headers = HeaderMap::new();
        for (name, value) in &signed {
            // reqwest derives Host from the URL
            if name == "host" {
                continue;
            }
            let name = HeaderName::try_from(name.as_str())
                .map_err(|e| TransportError::new(TransportError::SIGNING, e.to_string()))?;
            let value = HeaderValue::try_from(value.as_str())
                .map_err(|e| TransportError::new(TransportError::SIGNING, e.to_string()))?;
            headers.insert(name, value);
        }

        tracing::debug!(
            operation,
            endpoint = %self.config.endpoint,
            bytes = body.len(),
            "sending kinesis request"
        );

        let response = self
            .client
            .post(self.config.endpoint.clone())
            .headers(headers)
            .body(body)
            .send()
            .map_err(send_error)?;

        let status = response.status();
        let error_type = response
            .headers()
            .get(ERROR_TYPE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = response.text().map_err(send_error)?;

        tracing::debug!(operation, status = status.as_u16(), "received kinesis response");

        if status.is_success() {
            return serde_json::from_str(&text).map_err(|e| {
                TransportError::new(
                    TransportError::RESPONSE_DECODE,
                    format!("{} response: {}", operation, e),
                )
            });
        }

        let error = service_error(status, error_type.as_deref(), &text);
        tracing::warn!(operation, code = %error.code, "kinesis request failed");
        Err(error)
    }
}

impl Transport for HttpTransport {
    fn put_record(&self, input: &PutRecordInput) -> Result<PutRecordOutput, TransportError> {
        self.invoke("PutRecord", input)
    }

    fn put_records(&self, input: &PutRecordsInput) -> Result<PutRecordsOutput, TransportError> {
        self.invoke("PutRecords", input)
    }
}

fn send_error(e: reqwest::Error) -> TransportError {
    let code = if e.is_timeout() {
        TransportError::TIMEOUT
    } else {
        TransportError::CONNECTIVITY
    };
    TransportError::new(code, e.to_string())
}

/// Map an error response to the service's code and message.
fn service_error(
    status: StatusCode,
    error_type: Option<&str>,
    body: &str,
) -> TransportError {
    let json: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let field = |name: &str| {
        json.as_ref()
            .and_then(|v| v.get(name))
            .and_then(|v| v.as_str())
            .map(str::to_string)
    };

    let code = error_type
        .map(str::to_string)
        .or_else(|| field("__type"))
        .map(|raw| error_code(&raw).to_string())
        .filter(|code| !code.is_empty())
        .unwrap_or_else(|| UNKNOWN_ERROR.to_string());

    let message = field("message")
        .or_else(|| field("Message"))
        .unwrap_or_else(|| match body.trim() {
            "" => status.to_string(),
            text => text.to_string(),
        });

    TransportError::new(code, message)
}

/// `com.amazonaws.kinesis.v20131202#Code` and `Code:http://...` become `Code`.
fn error_code(raw: &str) -> &str {
    let code = raw.rsplit('#').next().unwrap_or(raw);
    code.split(':').next().unwrap_or(code).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_strips_namespace_and_suffix() {
        assert_eq!(
            error_code("com.amazonaws.kinesis.v20131202#ResourceNotFoundException"),
            "ResourceNotFoundException"
        );
        assert_eq!(
            error_code("ValidationException:http://internal.amazon.com/coral/"),
            "ValidationException"
        );
        assert_eq!(error_code("InvalidArgumentException"), "InvalidArgumentException");
    }

    #[test]
    fn service_error_prefers_header() {
        let e = service_error(
            StatusCode::BAD_REQUEST,
            Some("ProvisionedThroughputExceededException"),
            r#"{"__type":"Other","message":"Rate exceeded for shard"}"#,
        );
        assert_eq!(e.code, "ProvisionedThroughputExceededException");
        assert_eq!(e.message, "Rate exceeded for shard");
    }

    #[test]
    fn service_error_from_body() {
        let e = service_error(
            StatusCode::BAD_REQUEST,
            None,
            r#"{"__type":"com.amazonaws.kinesis.v20131202#ResourceNotFoundException","Message":"Stream s not found"}"#,
        );
        assert_eq!(e.code, "ResourceNotFoundException");
        assert_eq!(e.message, "Stream s not found");
    }

    #[test]
    fn service_error_without_json() {
        let e = service_error(StatusCode::BAD_GATEWAY, None, "");
        assert_eq!(e.code, UNKNOWN_ERROR);
        assert_eq!(e.message, "502 Bad Gateway");

        let e = service_error(StatusCode::INTERNAL_SERVER_ERROR, None, "upstream broke");
        assert_eq!(e.message, "upstream broke");
    }
}
