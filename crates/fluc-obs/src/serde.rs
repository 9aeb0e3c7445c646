use fluc_core::{ErrorInfo, FlucError};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

fn serde_error(code: &str, err: impl ToString) -> FlucError {
    FlucError::Serde(ErrorInfo::new(code, err.to_string()))
}

// Object keys are re-inserted in sorted order at every depth.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, sort_keys(value)))
                    .collect(),
            )
        }
        Value::Array(values) => Value::Array(values.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Encodes a report or run description as compact JSON with sorted keys, so
/// equal reports are byte-identical on disk and hash identically.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, FlucError> {
    let value = serde_json::to_value(value).map_err(|err| serde_error("json_serialize", err))?;
    serde_json::to_vec(&sort_keys(value)).map_err(|err| serde_error("json_write", err))
}

/// Reads back a report written by [`to_canonical_json_bytes`].
pub fn from_json_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, FlucError> {
    serde_json::from_slice(data).map_err(|err| serde_error("json_deserialize", err))
}
