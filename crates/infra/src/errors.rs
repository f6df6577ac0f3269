//! Conversions from external infrastructure errors into domain errors.

use timebridge_domain::TimebridgeError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub TimebridgeError);

impl From<InfraError> for TimebridgeError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<TimebridgeError> for InfraError {
    fn from(value: TimebridgeError) -> Self {
        InfraError(value)
    }
}

impl From<reqwest::Error> for InfraError {
    fn from(value: reqwest::Error) -> Self {
        let inner = if value.is_decode() {
            TimebridgeError::InvalidInput(format!("failed to decode response body: {value}"))
        } else if value.is_timeout() {
            TimebridgeError::Network(format!("http request timed out: {value}"))
        } else {
            TimebridgeError::Network(format!("http request failed: {value}"))
        };
        InfraError(inner)
    }
}

impl From<rusqlite::Error> for InfraError {
    fn from(value: rusqlite::Error) -> Self {
        let inner = match value {
            rusqlite::Error::QueryReturnedNoRows => {
                TimebridgeError::NotFound("no rows returned by query".into())
            }
            other => TimebridgeError::Storage(other.to_string()),
        };
        InfraError(inner)
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(TimebridgeError::InvalidInput(format!("invalid JSON: {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_rows_maps_to_not_found() {
        let err: TimebridgeError = InfraError::from(rusqlite::Error::QueryReturnedNoRows).into();
        assert!(matches!(err, TimebridgeError::NotFound(_)));
    }

    #[test]
    fn json_errors_map_to_invalid_input() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: TimebridgeError = InfraError::from(json_err).into();
        assert!(matches!(err, TimebridgeError::InvalidInput(_)));
    }
}
