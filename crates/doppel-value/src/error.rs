//! Error types for probing shapes and invoking callables

/// Errors raised while reading a member from a shape description
///
/// These mirror the runtime type errors a computed accessor produces when it
/// dereferences state that does not exist on the blueprint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    /// Attempted to read a key of `undefined` or `null`
    #[error("cannot read property '{property}' of {receiver}")]
    MissingReceiver {
        /// Key being read
        property: String,
        /// Kind of the receiver (`undefined` / `null`)
        receiver: String,
    },

    /// Attempted to read a key of a primitive value
    #[error("cannot read property '{property}' of primitive {receiver}")]
    NotAnObject {
        /// Key being read
        property: String,
        /// Type name of the primitive receiver
        receiver: String,
    },

    /// Accessor implementation failed for another reason
    #[error("accessor '{member}' failed: {message}")]
    Accessor {
        /// Member whose accessor failed
        member: String,
        /// Failure detail
        message: String,
    },
}

impl ProbeError {
    /// Create accessor failure for member
    pub fn accessor(member: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Accessor {
            member: member.into(),
            message: message.into(),
        }
    }
}

/// Errors raised by invoking a [`Callable`](crate::Callable)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvokeError {
    /// A configured implementation threw
    #[error("{0}")]
    Thrown(String),

    /// The invoked value is not callable
    #[error("{0} is not a function")]
    NotCallable(String),
}

impl InvokeError {
    /// Create thrown error
    pub fn thrown(message: impl Into<String>) -> Self {
        Self::Thrown(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_error_messages() {
        let err = ProbeError::MissingReceiver {
            property: "name".into(),
            receiver: "undefined".into(),
        };
        assert_eq!(err.to_string(), "cannot read property 'name' of undefined");

        let err = ProbeError::accessor("total", "division by zero");
        assert_eq!(err.to_string(), "accessor 'total' failed: division by zero");
    }

    #[test]
    fn invoke_error_messages() {
        assert_eq!(InvokeError::thrown("boom").to_string(), "boom");
        assert_eq!(
            InvokeError::NotCallable("name".into()).to_string(),
            "name is not a function"
        );
    }
}
