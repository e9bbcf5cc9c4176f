//! Error types for the cirrus client.
//!
//! # Design
//! Failures split along the axis callers actually branch on: whether a
//! response was obtained at all (`Connection`), whether its body had the
//! required structure (`MalformedResponse`), and whether the backend itself
//! rejected the operation (`Remote`, carrying the backend's own code and
//! message). `FieldDecode` is the one non-fatal kind: object reconstruction
//! skips the offending field and keeps going.

use thiserror::Error;

/// Errors returned by cirrus operations.
#[derive(Debug, Error)]
pub enum Error {
    /// No response was obtained, the transport failed mid-flight, or a write
    /// response body was present but not valid JSON.
    #[error("connection failed: {0}")]
    Connection(String),

    /// A response body was parseable but missing required structure, such as
    /// the `results` array on a find or `objectId` on a successful save.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The backend returned a non-2xx status with a structured error body.
    #[error("backend error {code}: {message}")]
    Remote { code: i64, message: String },

    /// One field's wire value did not match the shape its `__type`
    /// discriminator requires. Non-fatal during object reconstruction.
    #[error("field {field:?} could not be decoded: {reason}")]
    FieldDecode { field: String, reason: String },

    /// Class names must be non-empty, start with a letter, and contain only
    /// alphanumerics and underscores.
    #[error("invalid class name {0:?}")]
    InvalidClassName(String),

    /// The operation requires an `objectId`, which is only assigned by a
    /// successful save.
    #[error("object has no objectId; save it before calling {0}")]
    NotPersisted(&'static str),
}

/// Validate a backend class name.
///
/// Shared by `Object::new` and `Query::new` so both ends of the mapping
/// enforce the same rule.
pub(crate) fn check_class_name(class_name: &str) -> Result<(), Error> {
    let mut chars = class_name.chars();
    let valid = match chars.next() {
        Some(first) => {
            first.is_ascii_alphabetic() && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidClassName(class_name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_camel_case_class_names() {
        assert!(check_class_name("GameScore").is_ok());
        assert!(check_class_name("a").is_ok());
        assert!(check_class_name("Player_2").is_ok());
    }

    #[test]
    fn rejects_empty_class_name() {
        assert!(matches!(check_class_name(""), Err(Error::InvalidClassName(_))));
    }

    #[test]
    fn rejects_leading_digit_or_underscore() {
        assert!(check_class_name("2fast").is_err());
        assert!(check_class_name("_private").is_err());
    }

    #[test]
    fn rejects_punctuation_and_spaces() {
        assert!(check_class_name("Game Score").is_err());
        assert!(check_class_name("Game/Score").is_err());
    }

    #[test]
    fn remote_error_displays_code_and_message() {
        let err = Error::Remote {
            code: 101,
            message: "object not found".to_string(),
        };
        assert_eq!(err.to_string(), "backend error 101: object not found");
    }
}
