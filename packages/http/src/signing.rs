//! AWS Signature Version 4 request signing.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use kinesis_core::TransportError;
use sha2::{Digest, Sha256};
use url::Url;

use crate::config::Credentials;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Signs requests for one service in one region.
pub struct RequestSigner<'a> {
    credentials: &'a Credentials,
    region: &'a str,
    service: &'a str,
}

impl<'a> RequestSigner<'a> {
    pub fn new(credentials: &'a Credentials, region: &'a str, service: &'a str) -> Self {
        Self {
            credentials,
            region,
            service,
        }
    }

    /// Compute the headers for a signed request.
    ///
    /// Returns `headers` plus `host`, `x-amz-date`, the session token when
    /// there is one, and `authorization`. Every returned header except
    /// `authorization` is covered by the signature.
    pub fn sign(
        &self,
        method: &str,
        url: &Url,
        headers: &[(String, String)],
        body: &[u8],
        now: DateTime<Utc>,
    ) -> Result<Vec<(String, String)>, TransportError> {
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date = now.format("%Y%m%d").to_string();

        let mut signed: Vec<(String, String)> = headers
            .iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), canonical_value(value)))
            .collect();
        signed.push(("host".to_string(), host_header(url)?));
        signed.push(("x-amz-date".to_string(), amz_date.clone()));
        if let Some(token) = &self.credentials.session_token {
            signed.push(("x-amz-security-token".to_string(), token.clone()));
        }
        signed.sort_by(|a, b| a.0.cmp(&b.0));

        let signed_names = signed
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join(";");

        let canonical_headers: String = signed
            .iter()
            .map(|(name, value)| format!("{}:{}\n", name, value))
            .collect();

        let canonical_request = format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            method,
            canonical_uri(url),
            canonical_query(url),
            canonical_headers,
            signed_names,
            hex::encode(Sha256::digest(body)),
        );

        let scope = format!("{}/{}/{}/aws4_request", date, self.region, self.service);
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            amz_date,
            scope,
            hex::encode(Sha256::digest(canonical_request.as_bytes())),
        );

        let key = signing_key(
            &self.credentials.secret_access_key,
            &date,
            self.region,
            self.service,
        )?;
        let signature = hex::encode(hmac(&key, string_to_sign.as_bytes())?);

        signed.push((
            "authorization".to_string(),
            format!(
                "{} Credential={}/{}, SignedHeaders={}, Signature={}",
                ALGORITHM, self.credentials.access_key_id, scope, signed_names, signature
            ),
        ));

        tracing::trace!(scope = %scope, signed_headers = %signed_names, "signed request");
        Ok(signed)
    }
}

/// Derive the per-day, per-region, per-service signing key.
pub fn signing_key(
    secret: &str,
    date: &str,
    region: &str,
    service: &str,
) -> Result<Vec<u8>, TransportError> {
    let k_date = hmac(format!("AWS4{}", secret).as_bytes(), date.as_bytes())?;
    let k_region = hmac(&k_date, region.as_bytes())?;
    let k_service = hmac(&k_region, service.as_bytes())?;
    hmac(&k_service, b"aws4_request")
}

fn hmac(key: &[u8], data: &[u8]) -> Result<Vec<u8>, TransportError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| TransportError::new(TransportError::SIGNING, e.to_string()))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn host_header(url: &Url) -> Result<String, TransportError> {
    let host = url.host_str().ok_or_else(|| {
        TransportError::new(TransportError::SIGNING, format!("no host in '{}'", url))
    })?;
    // `port()` is None for the scheme's default port
    Ok(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

fn canonical_uri(url: &Url) -> &str {
    match url.path() {
        "" => "/",
        path => path,
    }
}

fn canonical_query(url: &Url) -> String {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| (uri_encode(&key), uri_encode(&value)))
        .collect();
    pairs.sort();
    pairs
        .into_iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&")
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
fn uri_encode(raw: &str) -> String {
    let mut encoded = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(char::from(byte))
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

fn canonical_value(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
