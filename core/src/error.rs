//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.
//!
//! Every derivation and assembly failure is fatal: the build stops at the
//! first error and no partial document is produced.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Rust source, type expression or manifest could not be parsed.
    #[from(ignore)]
    #[display("Parse Error: {_0}")]
    Parse(String),

    /// A type does not match any classification rule.
    #[from(ignore)]
    #[display("Unsupported shape: {_0}")]
    UnsupportedShape(String),

    /// A field annotation or extension attribute is malformed.
    #[from(ignore)]
    #[display("Invalid annotation: {_0}")]
    InvalidAnnotation(String),

    /// A root or nested type has no name and cannot be referenced.
    #[from(ignore)]
    #[display("Anonymous type: {_0}")]
    AnonymousType(String),

    /// A keyed mapping whose key is not text.
    #[from(ignore)]
    #[display("Invalid map key: {_0}")]
    InvalidMapKey(String),

    /// A raw inline request/response payload does not fit the document shape.
    #[from(ignore)]
    #[display("Malformed inline payload: {_0}")]
    MalformedInlinePayload(String),

    /// A type alias expands into itself.
    #[from(ignore)]
    #[display("Recursive type: {_0}")]
    RecursiveType(String),

    /// An HTTP verb outside get/put/post/delete/options/patch/connect/trace.
    #[from(ignore)]
    #[display("Unsupported method: {_0}")]
    UnsupportedMethod(String),

    /// The finished document could not be serialized.
    #[from(ignore)]
    #[display("Serialization Error: {_0}")]
    Serialization(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

impl AppError {
    /// Prefixes the message with where the error happened, keeping the variant.
    pub fn within(self, context: &str) -> Self {
        let prefix = |msg: String| format!("{}: {}", context, msg);
        match self {
            AppError::Io(e) => AppError::Io(e),
            AppError::Parse(m) => AppError::Parse(prefix(m)),
            AppError::UnsupportedShape(m) => AppError::UnsupportedShape(prefix(m)),
            AppError::InvalidAnnotation(m) => AppError::InvalidAnnotation(prefix(m)),
            AppError::AnonymousType(m) => AppError::AnonymousType(prefix(m)),
            AppError::InvalidMapKey(m) => AppError::InvalidMapKey(prefix(m)),
            AppError::MalformedInlinePayload(m) => AppError::MalformedInlinePayload(prefix(m)),
            AppError::RecursiveType(m) => AppError::RecursiveType(prefix(m)),
            AppError::UnsupportedMethod(m) => AppError::UnsupportedMethod(prefix(m)),
            AppError::Serialization(m) => AppError::Serialization(prefix(m)),
            AppError::General(m) => AppError::General(prefix(m)),
        }
    }
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_io_conversion() {
        let io_err = Error::new(ErrorKind::Other, "test");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn test_string_conversion() {
        let msg = String::from("something wrong");
        let app_err: AppError = msg.into();
        match app_err {
            AppError::General(s) => assert_eq!(s, "something wrong"),
            _ => panic!("String should convert to AppError::General"),
        }
    }

    #[test]
    fn test_taxonomy_display() {
        let err = AppError::InvalidMapKey("HashMap<i32, String>".into());
        assert_eq!(err.to_string(), "Invalid map key: HashMap<i32, String>");

        let err = AppError::UnsupportedShape("fn(i32)".into());
        assert_eq!(err.to_string(), "Unsupported shape: fn(i32)");
    }

    #[test]
    fn test_within_keeps_variant() {
        let err = AppError::InvalidMapKey("bad".into()).within("Person.tags");
        assert!(matches!(err, AppError::InvalidMapKey(_)));
        assert_eq!(err.to_string(), "Invalid map key: Person.tags: bad");
    }
}
