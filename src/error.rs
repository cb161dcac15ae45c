/*
 * Defines the error surface of the binding layer. Following the policy laid
 * out in the crate docs, the absence of a native handle is never an error:
 * handle-dependent operations degrade to no-ops or zero-valued reads instead.
 * `PlatformError` therefore only covers construction-time preconditions
 * (unusable platform context) and genuine native call failures.
 */

use std::fmt;

pub type Result<T> = std::result::Result<T, PlatformError>;

/// Errors surfaced by the platform layer.
/// [SD-Tech-ErrorHandlingV1] Duplicate listener registration and double
/// dispose are prevented structurally and never appear here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The platform context cannot be used (e.g. zero density, lost native
    /// environment). A fatal precondition rather than a recoverable state.
    InitializationFailed(String),
    /// A logical id or native reference did not resolve to a live resource.
    InvalidHandle(String),
    /// A native call was issued and reported failure.
    OperationFailed(String),
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::InitializationFailed(msg) => {
                write!(f, "platform initialization failed: {msg}")
            }
            PlatformError::InvalidHandle(msg) => write!(f, "invalid handle: {msg}"),
            PlatformError::OperationFailed(msg) => write!(f, "operation failed: {msg}"),
        }
    }
}

impl std::error::Error for PlatformError {}

#[cfg(target_os = "android")]
impl From<jni::errors::Error> for PlatformError {
    fn from(err: jni::errors::Error) -> Self {
        PlatformError::OperationFailed(format!("JNI call failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_variant_context() {
        let err = PlatformError::InvalidHandle("view 42 not attached".into());
        assert!(err.to_string().contains("invalid handle"));
        assert!(err.to_string().contains("view 42"));
    }

    #[test]
    fn errors_are_comparable_for_tests() {
        assert_eq!(
            PlatformError::OperationFailed("x".into()),
            PlatformError::OperationFailed("x".into())
        );
        assert_ne!(
            PlatformError::OperationFailed("x".into()),
            PlatformError::InvalidHandle("x".into())
        );
    }
}
