//! Error types for serialization.

/// Errors produced while rendering a design.
///
/// Both variants abort the current serialization call; no partial output is
/// returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SerializeError {
    /// The dialect cannot express the construct.
    #[error("unsupported construct: {construct}")]
    UnsupportedConstruct {
        /// The construct that could not be rendered.
        construct: String,
    },

    /// Operand types do not fit, or a literal cannot be rendered for its type.
    #[error("type mismatch: {message}")]
    TypeMismatch {
        /// Description naming the rendered operands and their types.
        message: String,
    },
}

impl SerializeError {
    pub(crate) fn unsupported(construct: impl Into<String>) -> Self {
        SerializeError::UnsupportedConstruct {
            construct: construct.into(),
        }
    }

    pub(crate) fn type_mismatch(message: impl Into<String>) -> Self {
        SerializeError::TypeMismatch {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unsupported() {
        let err = SerializeError::unsupported("indexed assignment");
        assert_eq!(format!("{err}"), "unsupported construct: indexed assignment");
    }

    #[test]
    fn display_type_mismatch() {
        let err = SerializeError::type_mismatch("a <= b");
        assert_eq!(format!("{err}"), "type mismatch: a <= b");
    }
}
