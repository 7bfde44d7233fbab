//! Error taxonomy for query resolution.

use thiserror::Error;

use crate::models::PlaceId;

/// Errors raised by the Place Store collaborator.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("place store unreachable: {0}")]
    Unreachable(String),

    #[error("place store backend error: {0}")]
    Backend(String),

    #[error("place store did not answer within {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

/// A broken containment chain. Localized to one record; never fails a whole search.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataIntegrityFault {
    #[error("containment cycle at place {at} (reached from {origin})")]
    Cycle { origin: PlaceId, at: PlaceId },

    #[error("place {child} references missing parent {parent}")]
    DanglingParent { child: PlaceId, parent: PlaceId },

    #[error("containment chain of place {origin} exceeds {max_depth} hops")]
    DepthExceeded { origin: PlaceId, max_depth: usize },
}

#[derive(Error, Debug)]
pub enum SearchError {
    /// Empty or malformed query text, or an out-of-range coordinate.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A request parameter that could not be parsed or is out of range.
    #[error("invalid parameter '{name}'={value:?}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("place store unavailable: {0}")]
    StoreUnavailable(StoreError),

    #[error("place store did not answer within {timeout_ms}ms")]
    QueryTimeout { timeout_ms: u64 },

    #[error("data integrity fault: {0}")]
    DataIntegrity(#[from] DataIntegrityFault),

    #[error("search cancelled")]
    Cancelled,
}

impl From<StoreError> for SearchError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Timeout { timeout_ms } => SearchError::QueryTimeout { timeout_ms },
            other => SearchError::StoreUnavailable(other),
        }
    }
}

impl SearchError {
    pub(crate) fn invalid_parameter(
        name: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        SearchError::InvalidParameter {
            name,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// True for request rejections the transport layer maps to a client error.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SearchError::InvalidQuery(_) | SearchError::InvalidParameter { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(SearchError::InvalidQuery("".into()).is_client_error());
        assert!(SearchError::invalid_parameter("polygon_threshold", "1m", "not a number")
            .is_client_error());
        assert!(!SearchError::QueryTimeout { timeout_ms: 10 }.is_client_error());
        assert!(!SearchError::from(StoreError::Unreachable("down".into())).is_client_error());
    }

    #[test]
    fn test_store_timeout_maps_to_query_timeout() {
        let err = SearchError::from(StoreError::Timeout { timeout_ms: 250 });
        assert!(matches!(err, SearchError::QueryTimeout { timeout_ms: 250 }));
        let err = SearchError::from(StoreError::Backend("io".into()));
        assert!(matches!(err, SearchError::StoreUnavailable(_)));
    }

    #[test]
    fn test_parameter_message_names_value() {
        let err = SearchError::invalid_parameter("polygon_threshold", ";;", "not a number");
        assert_eq!(
            err.to_string(),
            "invalid parameter 'polygon_threshold'=\";;\": not a number"
        );
    }
}
