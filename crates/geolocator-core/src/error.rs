// crates/geolocator-core/src/error.rs
use thiserror::Error;

/// Errors raised by the locator.
///
/// A query that simply finds nothing is not an error: those paths return
/// `Ok(None)` or an empty `Vec`. Duplicate identifiers in the reference data
/// are logged and counted, never raised.
#[derive(Error, Debug)]
pub enum GeoError {
    /// The caller handed in something unusable (e.g. no name tokens at all).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The reference data could not be fetched or the cache is empty.
    /// Actionable: recreate the cache or fix the backup source.
    #[error("Reference data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl GeoError {
    /// `true` when no usable reference data exists, as opposed to a query
    /// that failed for other reasons.
    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, GeoError::DataUnavailable(_))
    }

    pub(crate) fn unavailable(context: impl std::fmt::Display, err: impl std::fmt::Display) -> Self {
        GeoError::DataUnavailable(format!("{context}: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, GeoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_unavailable_is_distinguishable() {
        let err = GeoError::unavailable("fetching snapshot", "connection refused");
        assert!(err.is_data_unavailable());
        assert_eq!(
            err.to_string(),
            "Reference data unavailable: fetching snapshot: connection refused"
        );

        let other = GeoError::InvalidInput("no tokens".into());
        assert!(!other.is_data_unavailable());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: GeoError = io.into();
        assert!(matches!(err, GeoError::Io(_)));
    }
}
