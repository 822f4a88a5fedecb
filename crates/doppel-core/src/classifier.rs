//! Member classification
//!
//! Decides once per member name whether a double instruments it as a
//! function or as a property.

use doppel_value::{Callable, MemberKind, ProbeError, Shape, Value};

/// What a classification was based on
#[derive(Debug, Clone, PartialEq)]
pub enum Evidence {
    /// The shape declared the kind explicitly
    Declared,
    /// Probing produced this callable value
    Callable(Callable),
    /// Probing produced a non-callable value (including `Undefined`)
    NonCallable,
    /// Probing failed; taken as a computed accessor over missing state
    ProbeFailed(ProbeError),
}

/// Outcome of classifying one member
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Decided kind
    pub kind: MemberKind,
    /// Basis for the decision
    pub evidence: Evidence,
}

impl Classification {
    /// Check if member is a function
    #[inline]
    #[must_use]
    pub fn is_function(&self) -> bool {
        self.kind == MemberKind::Function
    }
}

/// Classify `name` against `shape`
///
/// Declared kinds win. Otherwise the member is probed: a callable value makes
/// it a function, anything else makes it a property. A failed probe also
/// makes it a property, whatever the cause of the failure.
#[must_use]
pub fn classify(shape: &dyn Shape, name: &str) -> Classification {
    if let Some(kind) = shape.declared_kind(name) {
        return Classification {
            kind,
            evidence: Evidence::Declared,
        };
    }

    match shape.probe(name) {
        Ok(Value::Function(original)) => Classification {
            kind: MemberKind::Function,
            evidence: Evidence::Callable(original),
        },
        Ok(_) => Classification {
            kind: MemberKind::Property,
            evidence: Evidence::NonCallable,
        },
        Err(err) => {
            tracing::debug!("probing {} failed ({}); treating it as a property", name, err);
            Classification {
                kind: MemberKind::Property,
                evidence: Evidence::ProbeFailed(err),
            }
        }
    }
}
