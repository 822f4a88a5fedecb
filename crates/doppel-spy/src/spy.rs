//! Call-recording spy
//!
//! Provides [`Spy`], an invocable recorder with configurable behavior, and
//! [`CallRecord`] for inspecting what it received.

use doppel_value::{Callable, Invoke, InvokeError, Value};
use smallvec::SmallVec;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt::{self, Debug, Formatter};
use std::rc::Rc;

/// Fake implementation installed with [`SpyStrategy::call_fake`]
pub type FakeFn = Rc<dyn Fn(&[Value]) -> Result<Value, InvokeError>>;

/// One recorded invocation
#[derive(Debug, Clone, PartialEq)]
pub struct CallRecord {
    args: SmallVec<[Value; 4]>,
    return_value: Option<Value>,
}

impl CallRecord {
    fn new(args: &[Value]) -> Self {
        Self {
            args: args.iter().cloned().collect(),
            return_value: None,
        }
    }

    /// Arguments received
    #[inline]
    #[must_use]
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Value returned, `None` while in flight or if the call threw
    #[inline]
    #[must_use]
    pub fn return_value(&self) -> Option<&Value> {
        self.return_value.as_ref()
    }
}

#[derive(Clone, Default)]
enum Strategy {
    #[default]
    Stub,
    ReturnValue(Value),
    ReturnValues(VecDeque<Value>),
    CallFake(FakeFn),
    ThrowError(String),
    CallThrough,
}

impl Strategy {
    fn label(&self) -> &'static str {
        match self {
            Self::Stub => "stub",
            Self::ReturnValue(_) => "return_value",
            Self::ReturnValues(_) => "return_values",
            Self::CallFake(_) => "call_fake",
            Self::ThrowError(_) => "throw_error",
            Self::CallThrough => "call_through",
        }
    }
}

struct SpyInner {
    name: String,
    original: Option<Callable>,
    strategy: RefCell<Strategy>,
    calls: RefCell<Vec<CallRecord>>,
    // bumped on every reset so in-flight calls can tell their record is gone
    generation: Cell<u64>,
}

/// Invocable, inspectable recorder
///
/// Clones share state; use [`Spy::ptr_eq`] to test identity. Unconfigured
/// spies return `Undefined`.
///
/// No internal borrow is held while a strategy runs, so a fake may call back
/// into whatever owns the spy (including the spy itself).
#[derive(Clone)]
pub struct Spy {
    inner: Rc<SpyInner>,
}

impl Spy {
    /// Create spy with no original implementation
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_original(name, None)
    }

    /// Create spy remembering the implementation it replaces
    #[must_use]
    pub fn with_original(name: impl Into<String>, original: Option<Callable>) -> Self {
        Self {
            inner: Rc::new(SpyInner {
                name: name.into(),
                original,
                strategy: RefCell::new(Strategy::Stub),
                calls: RefCell::new(Vec::new()),
                generation: Cell::new(0),
            }),
        }
    }

    /// Spy name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Configure behavior
    #[inline]
    #[must_use]
    pub fn and(&self) -> SpyStrategy<'_> {
        SpyStrategy { spy: self }
    }

    /// Name of the active strategy
    #[must_use]
    pub fn strategy_name(&self) -> &'static str {
        self.inner.strategy.borrow().label()
    }

    /// Invoke the spy, recording the call
    ///
    /// # Errors
    /// Returns error if the configured strategy throws
    pub fn call(&self, args: &[Value]) -> Result<Value, InvokeError> {
        let generation = self.inner.generation.get();
        let index = {
            let mut calls = self.inner.calls.borrow_mut();
            calls.push(CallRecord::new(args));
            calls.len() - 1
        };
        tracing::trace!("spy {} invoked with {} argument(s)", self.inner.name, args.len());

        let result = self.run_strategy(args);

        // skip the write-back if the strategy reset history meanwhile
        if self.inner.generation.get() == generation {
            if let Ok(value) = &result {
                if let Some(record) = self.inner.calls.borrow_mut().get_mut(index) {
                    record.return_value = Some(value.clone());
                }
            }
        }
        result
    }

    fn run_strategy(&self, args: &[Value]) -> Result<Value, InvokeError> {
        let strategy = {
            let mut strategy = self.inner.strategy.borrow_mut();
            if let Strategy::ReturnValues(queue) = &mut *strategy {
                return Ok(queue.pop_front().unwrap_or_default());
            }
            strategy.clone()
        };

        match strategy {
            Strategy::Stub | Strategy::ReturnValues(_) => Ok(Value::Undefined),
            Strategy::ReturnValue(value) => Ok(value),
            Strategy::CallFake(fake) => fake(args),
            Strategy::ThrowError(message) => Err(InvokeError::Thrown(message)),
            Strategy::CallThrough => match &self.inner.original {
                Some(original) => original.call(args),
                None => Ok(Value::Undefined),
            },
        }
    }

    fn set_strategy(&self, strategy: Strategy) {
        tracing::trace!("spy {} strategy set to {}", self.inner.name, strategy.label());
        *self.inner.strategy.borrow_mut() = strategy;
    }

    /// Number of recorded calls
    #[inline]
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.inner.calls.borrow().len()
    }

    /// Check if called at least once
    #[inline]
    #[must_use]
    pub fn has_been_called(&self) -> bool {
        self.call_count() > 0
    }

    /// Check if called exactly `times` times
    #[inline]
    #[must_use]
    pub fn has_been_called_times(&self, times: usize) -> bool {
        self.call_count() == times
    }

    /// Check if any call received exactly these arguments
    #[must_use]
    pub fn has_been_called_with(&self, args: &[Value]) -> bool {
        self.inner
            .calls
            .borrow()
            .iter()
            .any(|record| record.args() == args)
    }

    /// Snapshot of all recorded calls
    #[must_use]
    pub fn calls(&self) -> Vec<CallRecord> {
        self.inner.calls.borrow().clone()
    }

    /// Arguments of the call at `index`
    #[must_use]
    pub fn args_for(&self, index: usize) -> Option<Vec<Value>> {
        self.inner
            .calls
            .borrow()
            .get(index)
            .map(|record| record.args().to_vec())
    }

    /// First recorded call
    #[must_use]
    pub fn first_call(&self) -> Option<CallRecord> {
        self.inner.calls.borrow().first().cloned()
    }

    /// Most recent recorded call
    #[must_use]
    pub fn most_recent_call(&self) -> Option<CallRecord> {
        self.inner.calls.borrow().last().cloned()
    }

    /// Clear call history, keeping the configured strategy
    pub fn reset_calls(&self) {
        self.inner.calls.borrow_mut().clear();
        self.inner.generation.set(self.inner.generation.get().wrapping_add(1));
    }

    /// Wrap as a callable value sharing this spy
    #[must_use]
    pub fn to_callable(&self) -> Callable {
        Callable::new(self.clone())
    }

    /// Check whether both handles are the same spy
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for Spy {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Invoke for Spy {
    fn invoke(&self, args: &[Value]) -> Result<Value, InvokeError> {
        self.call(args)
    }

    fn name(&self) -> &str {
        &self.inner.name
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Debug for Spy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spy")
            .field("name", &self.inner.name)
            .field("strategy", &self.strategy_name())
            .field("calls", &self.call_count())
            .finish()
    }
}

/// Strategy configuration handle returned by [`Spy::and`]
#[derive(Debug)]
pub struct SpyStrategy<'a> {
    spy: &'a Spy,
}

impl<'a> SpyStrategy<'a> {
    /// Do nothing and return `Undefined`
    pub fn stub(self) -> &'a Spy {
        self.spy.set_strategy(Strategy::Stub);
        self.spy
    }

    /// Always return `value`
    pub fn return_value(self, value: impl Into<Value>) -> &'a Spy {
        self.spy.set_strategy(Strategy::ReturnValue(value.into()));
        self.spy
    }

    /// Return each value in turn, then `Undefined`
    pub fn return_values<I, V>(self, values: I) -> &'a Spy
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let queue = values.into_iter().map(Into::into).collect();
        self.spy.set_strategy(Strategy::ReturnValues(queue));
        self.spy
    }

    /// Run `fake` with the call arguments
    pub fn call_fake(self, fake: impl Fn(&[Value]) -> Value + 'static) -> &'a Spy {
        self.spy
            .set_strategy(Strategy::CallFake(Rc::new(move |args| Ok(fake(args)))));
        self.spy
    }

    /// Run a fake that may throw
    pub fn call_fake_fallible(
        self,
        fake: impl Fn(&[Value]) -> Result<Value, InvokeError> + 'static,
    ) -> &'a Spy {
        self.spy.set_strategy(Strategy::CallFake(Rc::new(fake)));
        self.spy
    }

    /// Throw `message` on every call
    pub fn throw_error(self, message: impl Into<String>) -> &'a Spy {
        self.spy.set_strategy(Strategy::ThrowError(message.into()));
        self.spy
    }

    /// Delegate to the original implementation, if one was captured
    pub fn call_through(self) -> &'a Spy {
        self.spy.set_strategy(Strategy::CallThrough);
        self.spy
    }
}
