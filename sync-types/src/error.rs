//! Error types for pagesync data-model parsing.

use thiserror::Error;

/// Errors produced when building data-model values from user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    /// The order key was empty.
    #[error("order key must not be empty")]
    EmptyOrderKey,

    /// The direction suffix was not `asc` or `desc`.
    #[error("invalid order direction: {0} (expected asc or desc)")]
    InvalidDirection(String),

    /// Unknown order preset name.
    #[error("unknown order preset: {0} (expected newest, oldest, best or worst)")]
    UnknownPreset(String),

    /// Page size must be positive.
    #[error("page limit must be greater than zero")]
    ZeroLimit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TypesError::InvalidDirection("up".into());
        assert_eq!(
            err.to_string(),
            "invalid order direction: up (expected asc or desc)"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TypesError>();
    }
}
