//! Behavior view of a double
//!
//! [`Double`] stands in for the real object. Any member name can be read, and
//! any non-function member can be written, without declaring it first.

use crate::error::{DoubleError, DoubleResult};
use crate::recorder::MemberRecorder;
use crate::registry::Registry;
use crate::view::SpyView;
use doppel_value::{MemberKind, Value};
use std::fmt;
use std::rc::Rc;

/// Result of reading a member from a [`Double`]
#[derive(Debug, Clone)]
pub enum Access {
    /// Value of an ordinary member
    Value(Value),
    /// The verification view (reserved key)
    Verification(SpyView),
}

impl Access {
    /// Get value (if ordinary member)
    #[inline]
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Verification(_) => None,
        }
    }

    /// Get verification view (if reserved key)
    #[inline]
    #[must_use]
    pub fn into_verification(self) -> Option<SpyView> {
        match self {
            Self::Verification(view) => Some(view),
            Self::Value(_) => None,
        }
    }
}

/// Test double built from a shape
///
/// Clones are handles to the same double.
#[derive(Clone)]
pub struct Double {
    registry: Rc<Registry>,
    view: SpyView,
}

impl Double {
    pub(crate) fn new(registry: Registry) -> Self {
        let registry = Rc::new(registry);
        let view = SpyView::new(Rc::clone(&registry));
        Self { registry, view }
    }

    /// Read a member
    ///
    /// The reserved key yields the verification view. Function members yield
    /// their spy as a callable; property members are read through their
    /// getter spy.
    ///
    /// # Errors
    /// Returns error if a reconfigured getter throws
    pub fn get(&self, name: &str) -> DoubleResult<Access> {
        if self.registry.is_reserved(name) {
            return Ok(Access::Verification(self.view.clone()));
        }
        let value = match self.registry.ensure(name)? {
            MemberRecorder::Function(f) => f.stub_value(),
            MemberRecorder::Property(p) => p.read()?,
        };
        if self.registry.config().trace_accesses {
            tracing::trace!("read {} -> {}", name, value);
        }
        Ok(Access::Value(value))
    }

    /// Write a member
    ///
    /// Property writes go through the setter spy.
    ///
    /// # Errors
    /// Returns `ReservedKeyViolation` for the reserved key,
    /// `ImmutableFunctionMember` for function members, or the error of a
    /// reconfigured setter
    pub fn set(&self, name: &str, value: impl Into<Value>) -> DoubleResult<()> {
        if self.registry.is_reserved(name) {
            tracing::warn!("rejected write to reserved key {}", name);
            return Err(DoubleError::reserved_key(name));
        }
        match self.registry.ensure(name)? {
            MemberRecorder::Function(_) => {
                tracing::warn!("rejected write to function member {}", name);
                Err(DoubleError::immutable_function(name))
            }
            MemberRecorder::Property(p) => {
                let value = value.into();
                if self.registry.config().trace_accesses {
                    tracing::trace!("write {} <- {}", name, value);
                }
                p.write(value)?;
                Ok(())
            }
        }
    }

    /// Read an ordinary member as a value
    ///
    /// # Errors
    /// Returns `ReservedKeyViolation` for the reserved key, or the error of a
    /// reconfigured getter
    pub fn value(&self, name: &str) -> DoubleResult<Value> {
        self.get(name)?
            .into_value()
            .ok_or_else(|| DoubleError::reserved_key(name))
    }

    /// Read a member and invoke it
    ///
    /// # Errors
    /// Returns `NotCallable` if the member holds a non-callable value, or
    /// the error thrown by the configured behavior
    pub fn call(&self, name: &str, args: &[Value]) -> DoubleResult<Value> {
        let value = self.value(name)?;
        match value.as_callable() {
            Some(callable) => Ok(callable.call(args)?),
            None => Err(DoubleError::NotCallable {
                member: name.to_string(),
                type_name: value.type_name(),
            }),
        }
    }

    /// The verification view; same as reading the reserved key
    #[inline]
    #[must_use]
    pub fn spy(&self) -> SpyView {
        self.view.clone()
    }

    /// Kind of `name`, if already instrumented; never instruments
    #[must_use]
    pub fn kind_of(&self, name: &str) -> Option<MemberKind> {
        self.registry.kind_of(name)
    }

    /// Instrumented member names in first-touch order
    #[must_use]
    pub fn instrumented_members(&self) -> Vec<String> {
        self.registry.members()
    }

    /// Key under which the verification view is reachable
    #[inline]
    #[must_use]
    pub fn reserved_key(&self) -> &str {
        self.registry.reserved_key()
    }

    /// Check whether both handles are the same double
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.registry, &other.registry)
    }
}

impl fmt::Debug for Double {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Double").field(&self.registry).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockConfig;
    use doppel_spy::DefaultSpyFactory;
    use doppel_value::ObjectShape;

    fn double() -> Double {
        let shape = ObjectShape::new()
            .method("greet", |_| Value::from("hello"))
            .field("name", "");
        Double::new(Registry::new(
            Rc::new(shape),
            Rc::new(DefaultSpyFactory),
            MockConfig::new(),
        ))
    }

    #[test]
    fn reserved_key_reads_view() {
        let d = double();
        let view = d.get("_spy").unwrap().into_verification().unwrap();
        assert!(view.ptr_eq(&d.spy()));
        assert!(d.instrumented_members().is_empty());
    }

    #[test]
    fn reserved_key_is_not_a_value() {
        assert_eq!(
            double().value("_spy").unwrap_err(),
            DoubleError::reserved_key("_spy")
        );
    }

    #[test]
    fn reserved_key_write_rejected() {
        let d = double();
        assert_eq!(d.set("_spy", 1).unwrap_err(), DoubleError::reserved_key("_spy"));
        assert!(d.instrumented_members().is_empty());
    }

    #[test]
    fn property_round_trip() {
        let d = double();
        d.set("name", "Ada").unwrap();
        assert_eq!(d.value("name").unwrap(), Value::from("Ada"));
    }

    #[test]
    fn function_write_rejected_before_touch() {
        let d = double();
        assert_eq!(
            d.set("greet", 42).unwrap_err(),
            DoubleError::immutable_function("greet")
        );
        assert_eq!(d.kind_of("greet"), Some(MemberKind::Function));
    }

    #[test]
    fn function_read_is_stable_callable() {
        let d = double();
        let first = d.value("greet").unwrap();
        let second = d.value("greet").unwrap();
        assert!(first.is_callable());
        assert_eq!(first, second);
    }

    #[test]
    fn calling_property_fails() {
        let d = double();
        d.set("name", "Ada").unwrap();
        assert_eq!(
            d.call("name", &[]).unwrap_err(),
            DoubleError::NotCallable {
                member: "name".into(),
                type_name: "string"
            }
        );
    }

    #[test]
    fn custom_reserved_key() {
        let d = Double::new(Registry::new(
            Rc::new(ObjectShape::new()),
            Rc::new(DefaultSpyFactory),
            MockConfig::new().with_reserved_key("$mock"),
        ));
        assert_eq!(d.reserved_key(), "$mock");
        assert!(d.get("$mock").unwrap().into_verification().is_some());
        // the default key is an ordinary member now
        d.set("_spy", 1).unwrap();
        assert_eq!(d.value("_spy").unwrap(), Value::from(1));
    }
}
