//! Typed Kinesis requests and responses.
//!
//! Inputs serialize to the Kinesis JSON 1.1 wire shape; outputs deserialize
//! from it. Field names follow the service contract (PascalCase on the wire).

use serde::{Deserialize, Serialize};

/// Request for a single-record write.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutRecordInput {
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,

    pub partition_key: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub stream_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub explicit_hash_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_number_for_ordering: Option<String>,

    #[serde(rename = "StreamARN", skip_serializing_if = "Option::is_none")]
    pub stream_arn: Option<String>,
}

/// One record of a batch write. The stream is named once on the batch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutRecordsRequestEntry {
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,

    pub partition_key: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub explicit_hash_key: Option<String>,
}

/// Request for a batch write.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutRecordsInput {
    pub records: Vec<PutRecordsRequestEntry>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub stream_name: String,

    #[serde(rename = "StreamARN", skip_serializing_if = "Option::is_none")]
    pub stream_arn: Option<String>,
}

/// Server-side encryption applied to the written records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EncryptionType {
    None,
    Kms,
    #[serde(other)]
    Unknown,
}

/// Response of a single-record write.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PutRecordOutput {
    pub sequence_number: String,
    pub shard_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encryption_type: Option<EncryptionType>,
}

/// Per-record outcome of a batch write.
///
/// Successful entries carry a sequence number and shard; failed entries an
/// error code and message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PutRecordsResultEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shard_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl PutRecordsResultEntry {
    pub fn is_failed(&self) -> bool {
        self.error_code.is_some()
    }
}

/// Response of a batch write.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PutRecordsOutput {
    pub failed_record_count: u32,
    pub records: Vec<PutRecordsResultEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encryption_type: Option<EncryptionType>,
}

/// Record payloads travel base64-encoded in the JSON protocol.
mod base64_bytes {
    use base64::Engine;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        serializer.serialize_str(&encoded)
    }
}
