//! Error types for interface synthesis.

/// Errors produced while matching or connecting interfaces.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntfError {
    /// The interface does not fit the ports it was matched against.
    ///
    /// Recoverable: every partial binding has been undone when this is returned.
    #[error("incompatible interface: {reason}")]
    Incompatible {
        /// What did not match.
        reason: String,
    },

    /// The interface tree is set up in a way that cannot be synthesized.
    #[error("interface configuration error: {reason}")]
    Configuration {
        /// What is misconfigured.
        reason: String,
    },
}

impl IntfError {
    pub(crate) fn incompatible(reason: impl Into<String>) -> Self {
        IntfError::Incompatible {
            reason: reason.into(),
        }
    }

    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        IntfError::Configuration {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_incompatible() {
        let err = IntfError::incompatible("missing m_ready");
        assert_eq!(format!("{err}"), "incompatible interface: missing m_ready");
    }

    #[test]
    fn display_configuration() {
        let err = IntfError::configuration("no backing signal for `data`");
        assert_eq!(
            format!("{err}"),
            "interface configuration error: no backing signal for `data`"
        );
    }
}
