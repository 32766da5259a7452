//! Tests for error types

#[cfg(test)]
mod tests {
    use super::super::error::RelayError;

    #[test]
    fn test_config_error() {
        let err = RelayError::Config("source.url or source.input_file required".to_string());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("source.url"));
    }

    #[test]
    fn test_source_error() {
        let err = RelayError::Source("gave up after 3 attempts".to_string());
        assert!(err.to_string().contains("Source error"));
    }

    #[test]
    fn test_sink_error() {
        let err = RelayError::Sink("webhook returned 500".to_string());
        assert!(err.to_string().contains("Sink error"));
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_storage_error() {
        let err = RelayError::Storage("permission denied".to_string());
        assert!(err.to_string().contains("Storage error"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: RelayError = io.into();
        assert!(matches!(err, RelayError::Io(_)));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: RelayError = parse.into();
        assert!(err.to_string().contains("JSON parsing error"));
    }

    #[test]
    fn test_only_config_errors_are_fatal() {
        assert!(RelayError::Config("x".into()).is_fatal());
        assert!(!RelayError::Source("x".into()).is_fatal());
        assert!(!RelayError::Sink("x".into()).is_fatal());
        assert!(!RelayError::Storage("x".into()).is_fatal());
        assert!(!RelayError::Internal("x".into()).is_fatal());
    }

    #[test]
    fn test_error_is_debug() {
        let err = RelayError::Internal("test".to_string());
        let debug = format!("{:?}", err);
        assert!(debug.contains("Internal"));
    }
}
