//! Error types for doubles
//!
//! Every violation is raised where it happens and never recovered inside the
//! double. The one swallowed failure is a probe error during classification.

use crate::recorder::FacetName;
use doppel_value::{InvokeError, MemberKind};
use std::fmt::{self, Display, Formatter};

/// Result alias for double operations
pub type DoubleResult<T> = Result<T, DoubleError>;

/// Direction of a facet access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetAccess {
    /// Reading the facet
    Read,
    /// Assigning the facet
    Write,
}

impl Display for FacetAccess {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => f.write_str("get"),
            Self::Write => f.write_str("set"),
        }
    }
}

/// Errors raised by the stub and spy facades
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DoubleError {
    /// Reserved key written on the stub, or read from the spy view
    #[error("{key} is reserved for the verification view of the double and cannot be modified")]
    ReservedKeyViolation {
        /// The reserved key
        key: String,
    },

    /// Direct assignment to a function member
    #[error(
        "cannot change {member} function, because a permanent spy is attached to it; \
         configure it via {member}._func"
    )]
    ImmutableFunctionMember {
        /// Member name
        member: String,
    },

    /// Facet mismatched with the member's kind
    #[error("can't {access} {member}.{facet} because {member} is a {kind}. {}", facet_hint(.member, .kind))]
    WrongFacetAccess {
        /// Member name
        member: String,
        /// Facet requested
        facet: FacetName,
        /// Read or write
        access: FacetAccess,
        /// Actual member kind
        kind: MemberKind,
    },

    /// Any write through the verification view
    #[error("cannot change {key}.{member}, because the verification view is read-only")]
    ReadOnlyVerificationFacade {
        /// Reserved key the view is reachable under
        key: String,
        /// Member name
        member: String,
    },

    /// Spy facets are reconfigured, never replaced
    #[error("cannot replace {member}.{facet}; configure the existing spy via {member}.{facet}.and()")]
    FacetNotAssignable {
        /// Member name
        member: String,
        /// Facet requested
        facet: FacetName,
    },

    /// Facet name not recognized
    #[error("unknown facet '{facet}' on {member}; expected one of _func, _get, _set, _value")]
    UnknownFacet {
        /// Member name
        member: String,
        /// Requested facet
        facet: String,
    },

    /// Invoked a property whose value is not callable
    #[error("{member} is not a function (it is a property holding {type_name})")]
    NotCallable {
        /// Member name
        member: String,
        /// Type of the stored value
        type_name: &'static str,
    },

    /// A configured spy threw
    #[error(transparent)]
    Invoke(#[from] InvokeError),
}

impl DoubleError {
    /// Create reserved key violation
    pub fn reserved_key(key: impl Into<String>) -> Self {
        Self::ReservedKeyViolation { key: key.into() }
    }

    /// Create immutable function member error
    pub fn immutable_function(member: impl Into<String>) -> Self {
        Self::ImmutableFunctionMember {
            member: member.into(),
        }
    }

    /// Create wrong facet access error
    pub fn wrong_facet(
        member: impl Into<String>,
        facet: FacetName,
        access: FacetAccess,
        kind: MemberKind,
    ) -> Self {
        Self::WrongFacetAccess {
            member: member.into(),
            facet,
            access,
            kind,
        }
    }

    /// Create read-only view error
    pub fn read_only(key: impl Into<String>, member: impl Into<String>) -> Self {
        Self::ReadOnlyVerificationFacade {
            key: key.into(),
            member: member.into(),
        }
    }

    /// Check if error is a facet mismatch
    #[inline]
    #[must_use]
    pub fn is_wrong_facet(&self) -> bool {
        matches!(self, Self::WrongFacetAccess { .. })
    }
}

fn facet_hint(member: &str, kind: &MemberKind) -> String {
    match kind {
        MemberKind::Function => format!("You can config the function spy via {member}._func"),
        MemberKind::Property => format!(
            "You can config getter/setter spies via {member}._get and {member}._set"
        ),
    }
}
