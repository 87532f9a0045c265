//! Error handling for the dictzip library
//!
//! Every fallible operation in the crate returns [`Result`]. The core never
//! retries and never logs failures: all operations are deterministic, so an
//! error is handed straight back to the caller.

use thiserror::Error;

/// Main error type for the dictzip library
#[derive(Error, Debug)]
pub enum DictZipError {
    /// I/O related errors (configuration persistence, sinks backed by streams)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An operation was invoked before the object was ready for it
    #[error("Invalid state: {message}")]
    InvalidState {
        /// Description of the violated precondition
        message: String,
    },

    /// Malformed value handed to the codec
    #[error("Invalid data: {message}")]
    InvalidData {
        /// Error message describing the issue
        message: String,
    },

    /// Index out of bounds access
    #[error("Out of bounds: index {index}, size {size}")]
    OutOfBounds {
        /// The invalid index
        index: usize,
        /// The valid size/length
        size: usize,
    },

    /// A buffer would grow past its addressable limit
    #[error("Capacity exceeded: requested {requested} bytes, limit {limit}")]
    CapacityExceeded {
        /// Size the operation would have produced
        requested: usize,
        /// Configured or hard limit
        limit: usize,
    },

    /// Configuration or parameter errors
    #[error("Invalid configuration: {message}")]
    Configuration {
        /// Configuration error message
        message: String,
    },
}

impl DictZipError {
    /// Create an invalid state error
    pub fn invalid_state<S: Into<String>>(message: S) -> Self {
        Self::InvalidState { message: message.into() }
    }

    /// Create an invalid data error
    pub fn invalid_data<S: Into<String>>(message: S) -> Self {
        Self::InvalidData { message: message.into() }
    }

    /// Create an out of bounds error
    pub fn out_of_bounds(index: usize, size: usize) -> Self {
        Self::OutOfBounds { index, size }
    }

    /// Create a capacity exceeded error
    pub fn capacity_exceeded(requested: usize, limit: usize) -> Self {
        Self::CapacityExceeded { requested, limit }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Check if this is a recoverable error
    ///
    /// Only I/O failures can succeed on a later attempt; everything else is
    /// a deterministic consequence of the inputs.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(_) => true,
            Self::InvalidState { .. } => false,
            Self::InvalidData { .. } => false,
            Self::OutOfBounds { .. } => false,
            Self::CapacityExceeded { .. } => false,
            Self::Configuration { .. } => false,
        }
    }

    /// Get the error category for logging/metrics
    pub fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::InvalidState { .. } => "state",
            Self::InvalidData { .. } => "data",
            Self::OutOfBounds { .. } => "bounds",
            Self::CapacityExceeded { .. } => "capacity",
            Self::Configuration { .. } => "config",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, DictZipError>;

/// Assert that a range is within bounds
#[inline]
pub fn check_range(start: usize, end: usize, size: usize) -> Result<()> {
    if start > end {
        return Err(DictZipError::invalid_data(format!(
            "Invalid range: start {} > end {}",
            start, end
        )));
    }
    if end > size {
        return Err(DictZipError::out_of_bounds(end, size));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = DictZipError::invalid_state("optimize before add");
        assert_eq!(err.category(), "state");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_range_checking() {
        assert!(check_range(2, 8, 10).is_ok());
        assert!(check_range(0, 0, 0).is_ok());
        assert!(check_range(5, 5, 5).is_ok());
        assert!(check_range(8, 2, 10).is_err()); // start > end
        assert!(check_range(2, 15, 10).is_err()); // end > size
    }

    #[test]
    fn test_error_categories() {
        let io_err = DictZipError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "test"));
        assert_eq!(io_err.category(), "io");
        assert!(io_err.is_recoverable());

        let cases = [
            (DictZipError::invalid_data("negative length"), "data"),
            (DictZipError::out_of_bounds(7, 3), "bounds"),
            (DictZipError::capacity_exceeded(10, 5), "capacity"),
            (DictZipError::configuration("dictionary_size must be > 0"), "config"),
        ];
        for (err, category) in cases {
            assert_eq!(err.category(), category);
            assert!(!err.is_recoverable());
        }
    }

    #[test]
    fn test_error_display() {
        let err = DictZipError::invalid_data("test message");
        let display = format!("{}", err);
        assert!(display.contains("Invalid data"));
        assert!(display.contains("test message"));

        let bounds_display = format!("{}", DictZipError::out_of_bounds(10, 5));
        assert!(bounds_display.contains("Out of bounds"));
        assert!(bounds_display.contains("10"));
        assert!(bounds_display.contains("5"));

        let capacity_display = format!("{}", DictZipError::capacity_exceeded(4096, 1024));
        assert!(capacity_display.contains("4096"));
        assert!(capacity_display.contains("1024"));
    }

    #[test]
    fn test_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: DictZipError = io_error.into();
        assert_eq!(err.category(), "io");
        assert!(format!("{}", err).contains("I/O error"));
    }
}
