//! Conversion of untyped script input into typed requests.
//!
//! Decoding is field-by-field: each target field looks up its key in the
//! input map, checks the kind of the value it finds, and reports the exact
//! path on mismatch. Rules:
//!
//! - Keys match exactly first, then ignoring ASCII case.
//! - Unknown keys are ignored.
//! - Missing or `Null` fields keep their zero value.
//! - Only a kind mismatch is an error, and the first one found is returned.

use std::collections::BTreeMap;

use crate::error::{DecodeError, DecodeErrorKind};
use crate::path::FieldPath;
use crate::types::{PutRecordInput, PutRecordsInput, PutRecordsRequestEntry};
use crate::Value;

/// A type that can be decoded from an untyped `Value`.
pub trait Decode: Sized {
    /// Decode `value`, which sits at `path` inside the overall input.
    fn decode_at(value: &Value, path: &FieldPath) -> Result<Self, DecodeError>;
}

impl PutRecordInput {
    /// Decode a single-record write from script input.
    pub fn decode(value: &Value) -> Result<Self, DecodeError> {
        Self::decode_at(value, &FieldPath::root())
    }
}

impl PutRecordsInput {
    /// Decode a batch write from script input.
    pub fn decode(value: &Value) -> Result<Self, DecodeError> {
        Self::decode_at(value, &FieldPath::root())
    }
}

impl Decode for PutRecordInput {
    fn decode_at(value: &Value, path: &FieldPath) -> Result<Self, DecodeError> {
        let fields = Fields::new(value, path)?;
        Ok(Self {
            data: fields.bytes("Data")?,
            partition_key: fields.string("PartitionKey")?,
            stream_name: fields.string("StreamName")?,
            explicit_hash_key: fields.optional_string("ExplicitHashKey")?,
            sequence_number_for_ordering: fields.optional_string("SequenceNumberForOrdering")?,
            stream_arn: fields.optional_string("StreamARN")?,
        })
    }
}

impl Decode for PutRecordsRequestEntry {
    fn decode_at(value: &Value, path: &FieldPath) -> Result<Self, DecodeError> {
        let fields = Fields::new(value, path)?;
        Ok(Self {
            data: fields.bytes("Data")?,
            partition_key: fields.string("PartitionKey")?,
            explicit_hash_key: fields.optional_string("ExplicitHashKey")?,
        })
    }
}

impl Decode for PutRecordsInput {
    fn decode_at(value: &Value, path: &FieldPath) -> Result<Self, DecodeError> {
        let fields = Fields::new(value, path)?;
        Ok(Self {
            records: fields.list("Records")?,
            stream_name: fields.string("StreamName")?,
            stream_arn: fields.optional_string("StreamARN")?,
        })
    }
}

/// The map being decoded, together with its location.
struct Fields<'a> {
    map: &'a BTreeMap<String, Value>,
    path: &'a FieldPath,
}

impl<'a> Fields<'a> {
    fn new(value: &'a Value, path: &'a FieldPath) -> Result<Self, DecodeError> {
        match value {
            Value::Map(map) => Ok(Self { map, path }),
            other => Err(DecodeError::new(
                path.clone(),
                DecodeErrorKind::ExpectedMap {
                    got: other.type_name(),
                },
            )),
        }
    }

    /// Look up `name`, treating `Null` as absent.
    fn get(&self, name: &str) -> Option<&'a Value> {
        let found = self.map.get(name).or_else(|| {
            self.map
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value)
        });
        found.filter(|value| !value.is_null())
    }

    fn string(&self, name: &str) -> Result<String, DecodeError> {
        Ok(self.optional_string(name)?.unwrap_or_default())
    }

    fn optional_string(&self, name: &str) -> Result<Option<String>, DecodeError> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(DecodeError::new(
                self.path.field(name),
                DecodeErrorKind::ExpectedString {
                    got: other.type_name(),
                    value: other.render(),
                },
            )),
        }
    }

    fn bytes(&self, name: &str) -> Result<Vec<u8>, DecodeError> {
        let path = self.path.field(name);
        match self.get(name) {
            None => Ok(Vec::new()),
            Some(Value::Bytes(bytes)) => Ok(bytes.clone()),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| byte(item, &path.index(i)))
                .collect(),
            Some(other) => Err(DecodeError::new(
                path,
                DecodeErrorKind::ExpectedSequence {
                    got: other.type_name(),
                },
            )),
        }
    }

    fn list<T: Decode>(&self, name: &str) -> Result<Vec<T>, DecodeError> {
        let path = self.path.field(name);
        match self.get(name) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| T::decode_at(item, &path.index(i)))
                .collect(),
            Some(other) => Err(DecodeError::new(
                path,
                DecodeErrorKind::ExpectedSequence {
                    got: other.type_name(),
                },
            )),
        }
    }
}

fn byte(value: &Value, path: &FieldPath) -> Result<u8, DecodeError> {
    let overflow = || {
        DecodeError::new(
            path.clone(),
            DecodeErrorKind::ByteOverflow {
                value: value.render(),
            },
        )
    };

    match value {
        Value::Integer(i) => u8::try_from(*i).map_err(|_| overflow()),
        Value::Float(f) if f.fract() == 0.0 => {
            if (0.0..=255.0).contains(f) {
                Ok(*f as u8)
            } else {
                Err(overflow())
            }
        }
        other => Err(DecodeError::new(
            path.clone(),
            DecodeErrorKind::ExpectedByte {
                got: other.type_name(),
                value: other.render(),
            },
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collection_literals::btree;
    use proptest::prelude::*;

    fn record(fields: BTreeMap<String, Value>) -> Value {
        Value::Map(fields)
    }

    #[test]
    fn decode_full_record() {
        let input = record(btree! {
            "Data".into() => Value::from(b"hello world".to_vec()),
            "PartitionKey".into() => Value::from("pk"),
            "StreamName".into() => Value::from("stream"),
            "ExplicitHashKey".into() => Value::from("123"),
            "SequenceNumberForOrdering".into() => Value::from("01"),
        });

        let request = PutRecordInput::decode(&input).unwrap();
        assert_eq!(request.data, b"hello world".to_vec());
        assert_eq!(request.partition_key, "pk");
        assert_eq!(request.stream_name, "stream");
        assert_eq!(request.explicit_hash_key.as_deref(), Some("123"));
        assert_eq!(request.sequence_number_for_ordering.as_deref(), Some("01"));
        assert_eq!(request.stream_arn, None);
    }

    #[test]
    fn missing_fields_keep_zero_values() {
        let input = record(btree! {
            "Data".into() => Value::from(b"hello world".to_vec()),
        });

        let request = PutRecordInput::decode(&input).unwrap();
        assert_eq!(request.partition_key, "");
        assert_eq!(request.stream_name, "");
        assert_eq!(request.explicit_hash_key, None);
    }

    #[test]
    fn null_fields_are_absent() {
        let input = record(btree! {
            "Data".into() => Value::Null,
            "ExplicitHashKey".into() => Value::Null,
        });

        let request = PutRecordInput::decode(&input).unwrap();
        assert!(request.data.is_empty());
        assert_eq!(request.explicit_hash_key, None);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let input = record(btree! {
            "PartitionKey".into() => Value::from("pk"),
            "Unrelated".into() => Value::from(42),
        });

        let request = PutRecordInput::decode(&input).unwrap();
        assert_eq!(request.partition_key, "pk");
    }

    #[test]
    fn keys_match_case_insensitively() {
        let input = record(btree! {
            "data".into() => Value::from(vec![Value::from(104), Value::from(105)]),
            "partitionkey".into() => Value::from("pk"),
            "streamName".into() => Value::from("stream"),
        });

        let request = PutRecordInput::decode(&input).unwrap();
        assert_eq!(request.data, b"hi".to_vec());
        assert_eq!(request.partition_key, "pk");
        assert_eq!(request.stream_name, "stream");
    }

    #[test]
    fn exact_key_wins_over_case_insensitive() {
        let input = record(btree! {
            "partitionKey".into() => Value::from("loose"),
            "PartitionKey".into() => Value::from("exact"),
        });

        let request = PutRecordInput::decode(&input).unwrap();
        assert_eq!(request.partition_key, "exact");
    }

    #[test]
    fn number_for_data_fails() {
        let input = record(btree! { "Data".into() => Value::from(123) });

        let err = PutRecordInput::decode(&input).unwrap_err();
        assert_eq!(err.path.to_string(), "Data");
        assert_eq!(
            err.kind,
            DecodeErrorKind::ExpectedSequence { got: "int" }
        );
        assert_eq!(
            err.to_string(),
            "decoding 'Data': expected an array or slice, got int"
        );
    }

    #[test]
    fn string_for_data_fails() {
        let input = record(btree! { "Data".into() => Value::from("hello") });

        let err = PutRecordInput::decode(&input).unwrap_err();
        assert_eq!(err.path.to_string(), "Data");
        assert_eq!(
            err.kind,
            DecodeErrorKind::ExpectedSequence { got: "string" }
        );
    }

    #[test]
    fn byte_array_elements_are_checked() {
        let input = record(btree! {
            "Data".into() => Value::from(vec![Value::from(1), Value::from(300)]),
        });

        let err = PutRecordInput::decode(&input).unwrap_err();
        assert_eq!(err.path.to_string(), "Data[1]");
        assert_eq!(
            err.kind,
            DecodeErrorKind::ByteOverflow {
                value: "300".to_string()
            }
        );

        let input = record(btree! {
            "Data".into() => Value::from(vec![Value::from("a")]),
        });
        let err = PutRecordInput::decode(&input).unwrap_err();
        assert_eq!(err.path.to_string(), "Data[0]");
        assert!(matches!(err.kind, DecodeErrorKind::ExpectedByte { got: "string", .. }));
    }

    #[test]
    fn integral_floats_are_bytes() {
        let input = record(btree! {
            "Data".into() => Value::from(vec![Value::from(65.0), Value::from(66)]),
        });
        assert_eq!(PutRecordInput::decode(&input).unwrap().data, b"AB".to_vec());

        let input = record(btree! {
            "Data".into() => Value::from(vec![Value::from(1.5)]),
        });
        let err = PutRecordInput::decode(&input).unwrap_err();
        assert!(matches!(err.kind, DecodeErrorKind::ExpectedByte { got: "float", .. }));
    }

    #[test]
    fn number_for_string_fails() {
        let input = record(btree! { "StreamName".into() => Value::from(7) });

        let err = PutRecordInput::decode(&input).unwrap_err();
        assert_eq!(err.path.to_string(), "StreamName");
        assert_eq!(
            err.kind,
            DecodeErrorKind::ExpectedString {
                got: "int",
                value: "7".to_string()
            }
        );
    }

    #[test]
    fn non_map_root_fails() {
        let err = PutRecordInput::decode(&Value::from("oops")).unwrap_err();
        assert_eq!(err.path, FieldPath::root());
        assert_eq!(err.kind, DecodeErrorKind::ExpectedMap { got: "string" });
    }

    #[test]
    fn decode_batch() {
        let input = record(btree! {
            "Records".into() => Value::from(vec![
                record(btree! {
                    "Data".into() => Value::from(b"hello world".to_vec()),
                    "PartitionKey".into() => Value::from("pk"),
                }),
                record(btree! {
                    "Data".into() => Value::from(b"second".to_vec()),
                    "PartitionKey".into() => Value::from("pk2"),
                    "ExplicitHashKey".into() => Value::from("99"),
                    "StreamName".into() => Value::from("ignored"),
                }),
            ]),
            "StreamName".into() => Value::from("stream"),
        });

        let request = PutRecordsInput::decode(&input).unwrap();
        assert_eq!(request.stream_name, "stream");
        assert_eq!(request.records.len(), 2);
        assert_eq!(request.records[0].data, b"hello world".to_vec());
        assert_eq!(request.records[0].partition_key, "pk");
        assert_eq!(request.records[1].explicit_hash_key.as_deref(), Some("99"));
    }

    #[test]
    fn batch_entry_with_numeric_partition_key_fails() {
        let input = record(btree! {
            "Records".into() => Value::from(vec![
                record(btree! { "PartitionKey".into() => Value::from(123) }),
            ]),
        });

        let err = PutRecordsInput::decode(&input).unwrap_err();
        assert_eq!(err.path.to_string(), "Records[0].PartitionKey");
        assert_eq!(
            err.to_string(),
            "decoding 'Records[0].PartitionKey': expected type 'string', got unconvertible type 'int', value: '123'"
        );
    }

    #[test]
    fn batch_reports_first_failing_entry() {
        let input = record(btree! {
            "Records".into() => Value::from(vec![
                record(btree! { "PartitionKey".into() => Value::from("ok") }),
                record(btree! { "Data".into() => Value::from(1) }),
                record(btree! { "PartitionKey".into() => Value::from(2) }),
            ]),
        });

        let err = PutRecordsInput::decode(&input).unwrap_err();
        assert_eq!(err.path.to_string(), "Records[1].Data");
    }

    #[test]
    fn batch_entry_must_be_map() {
        let input = record(btree! {
            "Records".into() => Value::from(vec![Value::from(5)]),
        });

        let err = PutRecordsInput::decode(&input).unwrap_err();
        assert_eq!(err.path.to_string(), "Records[0]");
        assert_eq!(err.kind, DecodeErrorKind::ExpectedMap { got: "int" });
    }

    #[test]
    fn records_must_be_a_list() {
        let input = record(btree! { "Records".into() => Value::from("many") });

        let err = PutRecordsInput::decode(&input).unwrap_err();
        assert_eq!(err.path.to_string(), "Records");
        assert_eq!(
            err.kind,
            DecodeErrorKind::ExpectedSequence { got: "string" }
        );
    }

    #[test]
    fn decode_from_json() {
        let input = Value::from(serde_json::json!({
            "Records": [{"Data": [1, 2, 3], "PartitionKey": "pk"}],
            "StreamName": "stream",
        }));

        let request = PutRecordsInput::decode(&input).unwrap();
        assert_eq!(request.records[0].data, vec![1, 2, 3]);
    }

    fn optional(s: Option<String>) -> Value {
        s.map(Value::from).unwrap_or(Value::Null)
    }

    proptest! {
        #[test]
        fn prop_well_typed_record_is_preserved(
            data in proptest::collection::vec(any::<u8>(), 0..64),
            partition_key in ".*",
            stream_name in ".*",
            explicit_hash_key in proptest::option::of("[0-9]{1,20}"),
            ordering in proptest::option::of("[0-9]{1,20}"),
        ) {
            let input = record(btree! {
                "Data".into() => Value::from(data.clone()),
                "PartitionKey".into() => Value::from(partition_key.clone()),
                "StreamName".into() => Value::from(stream_name.clone()),
                "ExplicitHashKey".into() => optional(explicit_hash_key.clone()),
                "SequenceNumberForOrdering".into() => optional(ordering.clone()),
            });

            let request = PutRecordInput::decode(&input).unwrap();
            prop_assert_eq!(request.data, data);
            prop_assert_eq!(request.partition_key, partition_key);
            prop_assert_eq!(request.stream_name, stream_name);
            prop_assert_eq!(request.explicit_hash_key, explicit_hash_key);
            prop_assert_eq!(request.sequence_number_for_ordering, ordering);
        }

        #[test]
        fn prop_decoding_twice_is_identical(
            keys in proptest::collection::vec(".*", 0..8),
        ) {
            let records: Vec<Value> = keys
                .iter()
                .map(|key| record(btree! {
                    "Data".into() => Value::from(key.as_bytes().to_vec()),
                    "PartitionKey".into() => Value::from(key.clone()),
                }))
                .collect();
            let input = record(btree! {
                "Records".into() => Value::from(records),
                "StreamName".into() => Value::from("stream"),
            });

            let first = PutRecordsInput::decode(&input).unwrap();
            let second = PutRecordsInput::decode(&input).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_numeric_partition_key_names_its_index(
            position in 0usize..5,
            key in any::<i64>(),
        ) {
            let records: Vec<Value> = (0..5)
                .map(|i| {
                    let partition_key = if i == position {
                        Value::from(key)
                    } else {
                        Value::from("pk")
                    };
                    record(btree! { "PartitionKey".into() => partition_key })
                })
                .collect();
            let input = record(btree! { "Records".into() => Value::from(records) });

            let err = PutRecordsInput::decode(&input).unwrap_err();
            prop_assert_eq!(err.path.to_string(), format!("Records[{}].PartitionKey", position));
        }
    }
}
