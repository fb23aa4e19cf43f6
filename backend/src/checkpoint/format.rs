//! Particle restart file layout
//!
//! A checkpoint is a JSON document with two groups:
//!
//! ```text
//! {
//!   "attributes": { "filetype": "particle restart", "version": [2, 0] },
//!   "datasets":   { "current_batch": .., "run_mode": .., "id": .., ... }
//! }
//! ```
//!
//! Every dataset listed in [`REQUIRED_DATASETS`] must be present with the
//! right type; anything else is a [`FormatError`].

use serde_json::{Map, Value};
use thiserror::Error;

pub const FILETYPE: &str = "particle restart";

/// Version written by this crate; files with another major are rejected
pub const VERSION: [u64; 2] = [2, 0];

pub const REQUIRED_DATASETS: [&str; 11] = [
    "current_batch",
    "generations_per_batch",
    "current_generation",
    "n_particles",
    "run_mode",
    "id",
    "type",
    "weight",
    "energy",
    "position",
    "direction",
];

/// Structural problem with a checkpoint document
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FormatError {
    #[error("Checkpoint is not a valid document: {0}")]
    Malformed(String),

    #[error("Checkpoint is missing required field '{0}'")]
    MissingField(String),

    #[error("Checkpoint field '{field}' has the wrong type, expected {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
    },

    #[error("Checkpoint field '{field}' is invalid: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Not a particle restart file (filetype {0:?})")]
    WrongFileType(String),

    #[error("Unsupported particle restart version {found:?}, expected major version {expected_major}")]
    UnsupportedVersion { found: Vec<u64>, expected_major: u64 },
}

/// Look up a required member of a JSON object
pub(crate) fn field<'a>(group: &'a Map<String, Value>, name: &str) -> Result<&'a Value, FormatError> {
    group
        .get(name)
        .ok_or_else(|| FormatError::MissingField(name.to_string()))
}

/// Look up a required JSON object (`attributes`, `datasets`)
pub(crate) fn group<'a>(
    document: &'a Value,
    name: &str,
) -> Result<&'a Map<String, Value>, FormatError> {
    let root = document
        .as_object()
        .ok_or_else(|| FormatError::Malformed("top level is not an object".to_string()))?;
    field(root, name)?
        .as_object()
        .ok_or_else(|| FormatError::TypeMismatch {
            field: name.to_string(),
            expected: "group",
        })
}

pub(crate) fn read_u64(group: &Map<String, Value>, name: &str) -> Result<u64, FormatError> {
    let value = field(group, name)?;
    if let Some(v) = value.as_u64() {
        return Ok(v);
    }
    if value.is_i64() {
        return Err(FormatError::InvalidValue {
            field: name.to_string(),
            reason: "must not be negative".to_string(),
        });
    }
    Err(FormatError::TypeMismatch {
        field: name.to_string(),
        expected: "integer",
    })
}

pub(crate) fn read_i64(group: &Map<String, Value>, name: &str) -> Result<i64, FormatError> {
    field(group, name)?
        .as_i64()
        .ok_or_else(|| FormatError::TypeMismatch {
            field: name.to_string(),
            expected: "integer",
        })
}

pub(crate) fn read_f64(group: &Map<String, Value>, name: &str) -> Result<f64, FormatError> {
    field(group, name)?
        .as_f64()
        .ok_or_else(|| FormatError::TypeMismatch {
            field: name.to_string(),
            expected: "floating point",
        })
}

pub(crate) fn read_str<'a>(group: &'a Map<String, Value>, name: &str) -> Result<&'a str, FormatError> {
    field(group, name)?
        .as_str()
        .ok_or_else(|| FormatError::TypeMismatch {
            field: name.to_string(),
            expected: "string",
        })
}

pub(crate) fn read_vec3(group: &Map<String, Value>, name: &str) -> Result<[f64; 3], FormatError> {
    let mismatch = || FormatError::TypeMismatch {
        field: name.to_string(),
        expected: "3-vector of floating point",
    };

    let items = field(group, name)?.as_array().ok_or_else(mismatch)?;
    if items.len() != 3 {
        return Err(mismatch());
    }

    let mut out = [0.0; 3];
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = item.as_f64().ok_or_else(mismatch)?;
    }
    Ok(out)
}

/// Check the `attributes` group identifies a supported particle restart file
pub(crate) fn check_attributes(document: &Value) -> Result<(), FormatError> {
    let attributes = group(document, "attributes")?;

    let filetype = read_str(attributes, "filetype")?;
    if filetype != FILETYPE {
        return Err(FormatError::WrongFileType(filetype.to_string()));
    }

    let found: Vec<u64> = field(attributes, "version")?
        .as_array()
        .and_then(|items| items.iter().map(Value::as_u64).collect())
        .ok_or_else(|| FormatError::TypeMismatch {
            field: "version".to_string(),
            expected: "array of integers",
        })?;
    if found.first() != Some(&VERSION[0]) {
        return Err(FormatError::UnsupportedVersion {
            found,
            expected_major: VERSION[0],
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn datasets(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_read_u64_distinguishes_negative_from_wrong_type() {
        let group = datasets(json!({ "a": -3, "b": "three", "c": 3 }));
        assert!(matches!(
            read_u64(&group, "a"),
            Err(FormatError::InvalidValue { .. })
        ));
        assert!(matches!(
            read_u64(&group, "b"),
            Err(FormatError::TypeMismatch { expected: "integer", .. })
        ));
        assert_eq!(read_u64(&group, "c"), Ok(3));
        assert_eq!(
            read_u64(&group, "d"),
            Err(FormatError::MissingField("d".to_string()))
        );
    }

    #[test]
    fn test_read_vec3_requires_three_numbers() {
        let group = datasets(json!({
            "ok": [1, 2.5, -3],
            "short": [1.0, 2.0],
            "text": [1.0, "x", 2.0],
        }));
        assert_eq!(read_vec3(&group, "ok"), Ok([1.0, 2.5, -3.0]));
        assert!(read_vec3(&group, "short").is_err());
        assert!(read_vec3(&group, "text").is_err());
    }

    #[test]
    fn test_integer_reads_as_float() {
        let group = datasets(json!({ "weight": 1 }));
        assert_eq!(read_f64(&group, "weight"), Ok(1.0));
    }

    #[test]
    fn test_attributes_checked() {
        let good = json!({ "attributes": { "filetype": FILETYPE, "version": [2, 1] } });
        assert_eq!(check_attributes(&good), Ok(()));

        let wrong_type = json!({ "attributes": { "filetype": "statepoint", "version": [2, 0] } });
        assert_eq!(
            check_attributes(&wrong_type),
            Err(FormatError::WrongFileType("statepoint".to_string()))
        );

        let old = json!({ "attributes": { "filetype": FILETYPE, "version": [1, 0] } });
        assert!(matches!(
            check_attributes(&old),
            Err(FormatError::UnsupportedVersion { expected_major: 2, .. })
        ));

        let missing = json!({ "datasets": {} });
        assert_eq!(
            check_attributes(&missing),
            Err(FormatError::MissingField("attributes".to_string()))
        );
    }
}
