//! Error types for oplog translation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslateError {
    /// Namespace is not of the form `<schema>.<table>`.
    #[error("error parsing namespace, invalid namespace: '{0}'")]
    InvalidNamespace(String),

    /// Insert entry carried an empty `o` document.
    #[error("empty data field for insert")]
    MissingData,

    /// `_id` absent or empty where one is required.
    #[error("_id field is missing")]
    MissingId,

    /// Update entry without a usable `diff` document.
    #[error("invalid diff field in update oplog")]
    MalformedUpdate,

    /// Value of a kind that has no SQL column type.
    #[error("cannot convert value {value} to a sql type for field {field}")]
    UnsupportedType {
        field: String,
        value: serde_json::Value,
    },

    /// Operation tag other than `i`, `u`, or `d`.
    #[error("unsupported oplog operation: {0}")]
    UnsupportedOperation(String),

    /// Input payload was not a JSON array of oplog entries.
    #[error("error unmarshaling oplog")]
    Decode(#[from] serde_json::Error),
}

/// Result type alias for translation operations.
pub type TranslateResult<T> = Result<T, TranslateError>;
