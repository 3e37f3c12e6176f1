//! Error types for resolver operations.
//!
//! Failures carry the offending key and, where it helps, "did you mean?"
//! suggestions drawn from the keys that ARE known.

use std::fmt;

use crate::value::BoxError;

/// Main error type for all resolver operations.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// A binding-map lookup found nothing under the requested key.
    #[error("{}", .0)]
    MissingBinding(MissingBindingError),

    /// No type is registered under the requested type key.
    #[error("{}", .0)]
    UnknownType(UnknownTypeError),

    /// The constructor function itself failed. The underlying error is
    /// preserved unchanged as the source.
    #[error("failed to construct `{key}`: {source}")]
    Construction {
        key: String,
        #[source]
        source: BoxError,
    },

    /// A typed accessor asked for a value of the wrong type.
    #[error("value resolved for `{key}` is not a `{expected}`")]
    MismatchedValue {
        key: String,
        expected: &'static str,
    },
}

/// Error when a binding-map key is absent.
#[derive(Debug)]
pub struct MissingBindingError {
    /// The key that was looked up
    pub key: String,
    /// Similar keys that ARE mapped (for "did you mean?" suggestions)
    pub suggestions: Vec<String>,
}

impl fmt::Display for MissingBindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parameter `{}` does not exist", self.key)?;

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }

        write!(
            f,
            "\n  Hint: map a value for `{}` before resolving it",
            self.key
        )
    }
}

/// Error when a type key has no registered [`TypeSpec`](crate::registry::TypeSpec).
#[derive(Debug)]
pub struct UnknownTypeError {
    /// The type key that was requested
    pub key: String,
    /// Similar keys that ARE registered
    pub suggestions: Vec<String>,
}

impl fmt::Display for UnknownTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no type registered for `{}`", self.key)?;

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }

        write!(
            f,
            "\n  Hint: register a TypeSpec for `{}` before resolving it",
            self.key
        )
    }
}

/// Convenient Result type for resolver operations.
pub type Result<T> = std::result::Result<T, ResolveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binding_display() {
        let err = ResolveError::MissingBinding(MissingBindingError {
            key: "key5".into(),
            suggestions: vec!["key4".into()],
        });

        let msg = format!("{err}");
        assert!(msg.contains("parameter `key5` does not exist"));
        assert!(msg.contains("Did you mean"));
        assert!(msg.contains("key4"));
    }

    #[test]
    fn missing_binding_without_suggestions() {
        let err = ResolveError::MissingBinding(MissingBindingError {
            key: "key5".into(),
            suggestions: vec![],
        });

        let msg = format!("{err}");
        assert!(!msg.contains("Did you mean"));
        assert!(msg.contains("Hint"));
    }

    #[test]
    fn unknown_type_display() {
        let err = ResolveError::UnknownType(UnknownTypeError {
            key: "app.Mailr".into(),
            suggestions: vec!["app.Mailer".into()],
        });

        let msg = format!("{err}");
        assert!(msg.contains("no type registered for `app.Mailr`"));
        assert!(msg.contains("app.Mailer"));
    }

    #[test]
    fn construction_preserves_source() {
        let err = ResolveError::Construction {
            key: "app.Mailer".into(),
            source: "transport refused".into(),
        };

        let msg = format!("{err}");
        assert!(msg.contains("failed to construct `app.Mailer`"));
        assert!(msg.contains("transport refused"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn mismatched_value_display() {
        let err = ResolveError::MismatchedValue {
            key: "app.Mailer".into(),
            expected: "alloc::string::String",
        };

        let msg = format!("{err}");
        assert!(msg.contains("app.Mailer"));
        assert!(msg.contains("String"));
    }
}
