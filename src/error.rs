pub use crate::types::SubbruteError;

pub type Result<T> = std::result::Result<T, SubbruteError>;

/// Attach context to foreign errors while folding them into [`SubbruteError`].
pub trait ErrorContext<T> {
    /// Map the error to `ConfigError`, prefixed with the message from `f`.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Map the error to a `ServiceError` raised by `service_name`.
    fn in_service<F>(self, service_name: &str, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::fmt::Display,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| SubbruteError::ConfigError(format!("{}: {}", f(), e)))
    }

    fn in_service<F>(self, service_name: &str, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| SubbruteError::ServiceError {
            service_name: service_name.to_string(),
            message: format!("{}: {}", f(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_context_prefixes_message() {
        let raw: std::result::Result<(), &str> = Err("boom");
        let err = raw.with_context(|| "loading wordlist".to_string()).unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: loading wordlist: boom");
    }

    #[test]
    fn test_in_service_names_the_service() {
        let raw: std::result::Result<(), &str> = Err("join failed");
        let err = raw
            .in_service("Brute Forcing Service", || "processing loop".to_string())
            .unwrap_err();
        assert!(matches!(err, SubbruteError::ServiceError { .. }));
        assert_eq!(
            err.to_string(),
            "Service error in Brute Forcing Service: processing loop: join failed"
        );
    }
}
