//! Error types for artifact loading, schema validation and alignment.

use std::fmt;

/// Error type covering every fallible operation in the crate.
#[derive(Debug)]
pub enum PredictError {
    /// I/O error while reading or writing an artifact file.
    IoError(String),
    /// Serialization or deserialization error.
    SerializationError(String),
    /// The parsed feature schema disagrees with the training-time column list.
    ColumnMismatch(String),
    /// A column name could not be interpreted (e.g. a non-integer storey suffix).
    InvalidColumnName(String),
    /// A selected category value is absent from the derived catalog.
    UnknownCategory { field: String, value: String },
    /// Feature vector length disagrees with the model's weight count.
    FeatureMismatch {
        expected_features: usize,
        got_features: usize,
    },
}

impl fmt::Display for PredictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictError::IoError(msg) => {
                write!(f, "I/O error: {}", msg)
            }
            PredictError::SerializationError(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            PredictError::ColumnMismatch(msg) => {
                write!(f, "Column mismatch: {}", msg)
            }
            PredictError::InvalidColumnName(msg) => {
                write!(f, "Invalid column name: {}", msg)
            }
            PredictError::UnknownCategory { field, value } => {
                write!(f, "Unknown category {:?} for field {}", value, field)
            }
            PredictError::FeatureMismatch {
                expected_features,
                got_features,
            } => {
                write!(
                    f,
                    "Feature mismatch: expected {} features, got {}",
                    expected_features, got_features
                )
            }
        }
    }
}

impl std::error::Error for PredictError {}

impl From<std::io::Error> for PredictError {
    fn from(err: std::io::Error) -> Self {
        PredictError::IoError(err.to_string())
    }
}

impl From<bincode::Error> for PredictError {
    fn from(err: bincode::Error) -> Self {
        PredictError::SerializationError(err.to_string())
    }
}

impl From<serde_json::Error> for PredictError {
    fn from(err: serde_json::Error) -> Self {
        PredictError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_io_error() {
        let err = PredictError::IoError("file not found".to_string());
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_display_serialization_error() {
        let err = PredictError::SerializationError("failed".to_string());
        assert!(err.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_error_display_column_mismatch() {
        let err = PredictError::ColumnMismatch("length 5 vs 3".to_string());
        assert!(err.to_string().contains("Column mismatch"));
    }

    #[test]
    fn test_error_display_unknown_category() {
        let err = PredictError::UnknownCategory {
            field: "town".to_string(),
            value: "ATLANTIS".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("town"));
        assert!(msg.contains("ATLANTIS"));
    }

    #[test]
    fn test_error_display_feature_mismatch() {
        let err = PredictError::FeatureMismatch {
            expected_features: 6,
            got_features: 4,
        };
        assert!(err.to_string().contains("expected 6 features, got 4"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: PredictError = io_err.into();
        assert!(matches!(err, PredictError::IoError(_)));
    }

    #[test]
    fn test_error_from_bincode_error() {
        let bad_bytes: &[u8] = &[0xff, 0xff, 0xff, 0xff];
        let bincode_result: Result<String, bincode::Error> = bincode::deserialize(bad_bytes);
        if let Err(e) = bincode_result {
            let err: PredictError = e.into();
            assert!(matches!(err, PredictError::SerializationError(_)));
        }
    }

    #[test]
    fn test_error_from_json_error() {
        let json_result: Result<Vec<String>, serde_json::Error> = serde_json::from_str("{broken");
        let err: PredictError = json_result.unwrap_err().into();
        assert!(matches!(err, PredictError::SerializationError(_)));
    }

    #[test]
    fn test_error_is_std_error() {
        let err = PredictError::InvalidColumnName("storey_avg_abc".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
