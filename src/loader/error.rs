//! Loader error types
//!
//! Every error in this subsystem is recoverable locally: the loader either
//! falls back to eager loading, ignores the call, or drops a stale entry.

use thiserror::Error;

use super::types::ElementId;

/// Errors raised by the loader and its detectors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoaderError {
    /// The platform visibility facility is missing or refused to start
    #[error("Visibility detector unavailable: {0}")]
    DetectorUnavailable(String),

    /// Attach was called on an element that has already been committed
    #[error("Element {0} is already loaded")]
    AlreadyLoaded(ElementId),

    /// A visibility entry arrived for an element that is no longer tracked
    #[error("Stale visibility callback for element {0}")]
    StaleCallback(ElementId),
}

/// Result type alias for loader operations
pub type LoaderResult<T> = Result<T, LoaderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LoaderError::AlreadyLoaded(ElementId::new(7));
        assert_eq!(err.to_string(), "Element #7 is already loaded");

        let err = LoaderError::DetectorUnavailable("no IntersectionObserver".to_string());
        assert_eq!(
            err.to_string(),
            "Visibility detector unavailable: no IntersectionObserver"
        );

        let err = LoaderError::StaleCallback(ElementId::new(3));
        assert_eq!(err.to_string(), "Stale visibility callback for element #3");
    }
}
