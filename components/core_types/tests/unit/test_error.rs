//! Unit tests for JsError and ErrorKind

use core_types::{ErrorKind, JsError, JsResult};

#[cfg(test)]
mod error_kind_tests {
    use super::*;

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::TypeError.to_string(), "TypeError");
        assert_eq!(ErrorKind::RangeError.to_string(), "RangeError");
        assert_eq!(ErrorKind::MemoryError.to_string(), "MemoryError");
        assert_eq!(ErrorKind::ValueError.to_string(), "ValueError");
    }

    #[test]
    fn test_error_kind_equality() {
        assert_eq!(ErrorKind::TypeError, ErrorKind::TypeError);
        assert_ne!(ErrorKind::TypeError, ErrorKind::RangeError);
    }

    #[test]
    fn test_error_kind_is_copy() {
        let kind1 = ErrorKind::MemoryError;
        let kind2 = kind1;
        assert_eq!(kind1, kind2);
    }
}

#[cfg(test)]
mod js_error_tests {
    use super::*;

    #[test]
    fn test_js_error_constructors_set_kind() {
        assert_eq!(JsError::type_error("x").kind, ErrorKind::TypeError);
        assert_eq!(JsError::range_error("x").kind, ErrorKind::RangeError);
        assert_eq!(JsError::memory_error("x").kind, ErrorKind::MemoryError);
        assert_eq!(JsError::value_error("x").kind, ErrorKind::ValueError);
    }

    #[test]
    fn test_js_error_predicates() {
        assert!(JsError::type_error("x").is_type_error());
        assert!(JsError::range_error("x").is_range_error());
        assert!(JsError::memory_error("x").is_memory_error());
        assert!(JsError::value_error("x").is_value_error());
        assert!(!JsError::value_error("x").is_memory_error());
    }

    #[test]
    fn test_js_error_display_includes_kind() {
        let error = JsError::memory_error("heap exhausted: requested 64 bytes");
        assert_eq!(
            error.to_string(),
            "MemoryError: heap exhausted: requested 64 bytes"
        );
    }

    #[test]
    fn test_js_error_empty_message() {
        let error = JsError::new(ErrorKind::TypeError, String::new());
        assert!(error.message.is_empty());
        assert_eq!(error.to_string(), "TypeError: ");
    }

    #[test]
    fn test_js_error_is_std_error() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        assert_error(&JsError::range_error("x"));
    }

    #[test]
    fn test_js_result_propagation() {
        fn inner() -> JsResult<u8> {
            Err(JsError::value_error("negative size"))
        }
        fn outer() -> JsResult<u8> {
            let v = inner()?;
            Ok(v + 1)
        }
        assert!(outer().unwrap_err().is_value_error());
    }
}
