//! Callable values
//!
//! Provides [`Invoke`] and the identity-compared [`Callable`] handle.

use crate::error::InvokeError;
use crate::value::Value;
use std::any::Any;
use std::fmt::{self, Debug, Formatter};
use std::rc::Rc;

/// Anything that can be invoked with a list of arguments
pub trait Invoke {
    /// Invoke with arguments
    ///
    /// # Errors
    /// Returns error if the implementation throws
    fn invoke(&self, args: &[Value]) -> Result<Value, InvokeError>;

    /// Name used in diagnostics
    fn name(&self) -> &str;

    /// Concrete type access, used to recover recorders from stub values
    fn as_any(&self) -> &dyn Any;
}

/// Shared handle over an [`Invoke`] implementation
///
/// Cloning is cheap and equality is identity: two handles are equal only if
/// they point at the same implementation.
#[derive(Clone)]
pub struct Callable(Rc<dyn Invoke>);

impl Callable {
    /// Wrap an existing implementation
    #[inline]
    #[must_use]
    pub fn new(invoke: impl Invoke + 'static) -> Self {
        Self(Rc::new(invoke))
    }

    /// Create from a closure that cannot fail
    #[must_use]
    pub fn from_fn(name: impl Into<String>, f: impl Fn(&[Value]) -> Value + 'static) -> Self {
        Self::new(FnInvoke {
            name: name.into(),
            f: Box::new(move |args| Ok(f(args))),
        })
    }

    /// Create from a closure that may throw
    #[must_use]
    pub fn from_fallible(
        name: impl Into<String>,
        f: impl Fn(&[Value]) -> Result<Value, InvokeError> + 'static,
    ) -> Self {
        Self::new(FnInvoke {
            name: name.into(),
            f: Box::new(f),
        })
    }

    /// Invoke with arguments
    ///
    /// # Errors
    /// Propagates the implementation's error
    #[inline]
    pub fn call(&self, args: &[Value]) -> Result<Value, InvokeError> {
        self.0.invoke(args)
    }

    /// Name of the underlying implementation
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.name()
    }

    /// Recover the concrete implementation
    #[inline]
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// Check whether both handles share one implementation
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Debug for Callable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[Function: {}]", self.name())
    }
}

type BoxedFn = Box<dyn Fn(&[Value]) -> Result<Value, InvokeError>>;

/// Closure-backed implementation
struct FnInvoke {
    name: String,
    f: BoxedFn,
}

impl Invoke for FnInvoke {
    fn invoke(&self, args: &[Value]) -> Result<Value, InvokeError> {
        (self.f)(args)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_fn_invokes_closure() {
        let add = Callable::from_fn("add", |args| {
            let sum = args.iter().filter_map(Value::as_number).sum::<f64>();
            Value::Number(sum)
        });

        let result = add.call(&[Value::from(1), Value::from(2)]).unwrap();
        assert_eq!(result, Value::Number(3.0));
        assert_eq!(add.name(), "add");
    }

    #[test]
    fn fallible_closure_propagates() {
        let fail = Callable::from_fallible("fail", |_| Err(InvokeError::thrown("nope")));
        assert_eq!(fail.call(&[]), Err(InvokeError::thrown("nope")));
    }

    #[test]
    fn equality_is_identity() {
        let a = Callable::from_fn("f", |_| Value::Undefined);
        let b = Callable::from_fn("f", |_| Value::Undefined);

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn debug_shows_name() {
        let f = Callable::from_fn("greet", |_| Value::Undefined);
        assert_eq!(format!("{f:?}"), "[Function: greet]");
    }
}
