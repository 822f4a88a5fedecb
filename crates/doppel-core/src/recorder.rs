//! Member recorders and their facets
//!
//! A recorder is the instrumentation behind one member of a double:
//!
//! - [`FunctionRecorder`]: one spy, exposed as the `_func` facet
//! - [`PropertyRecorder`]: getter and setter spies (`_get`, `_set`) plus the
//!   boxed `_value` they read and write by default
//!
//! Facets of the other kind are rejected on every access, not only when the
//! recorder is created.

use crate::error::{DoubleError, DoubleResult, FacetAccess};
use doppel_spy::{AccessorSpies, Spy};
use doppel_value::{Callable, InvokeError, MemberKind, Value};
use std::cell::RefCell;
use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

/// Named sub-part of a recorder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacetName {
    /// Function spy (`_func`)
    Func,
    /// Getter spy (`_get`)
    Get,
    /// Setter spy (`_set`)
    Set,
    /// Boxed property value (`_value`)
    Value,
}

impl FacetName {
    /// All facets
    pub const ALL: [Self; 4] = [Self::Func, Self::Get, Self::Set, Self::Value];

    /// Facet key as written on a recorder
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Func => "_func",
            Self::Get => "_get",
            Self::Set => "_set",
            Self::Value => "_value",
        }
    }

    /// Parse facet key
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|facet| facet.as_str() == key)
    }

    /// Kind of member that owns this facet
    #[inline]
    #[must_use]
    pub fn owner_kind(self) -> MemberKind {
        match self {
            Self::Func => MemberKind::Function,
            Self::Get | Self::Set | Self::Value => MemberKind::Property,
        }
    }
}

impl Display for FacetName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Facet read dynamically with [`MemberRecorder::facet`]
#[derive(Debug, Clone, PartialEq)]
pub enum Facet {
    /// A spy facet (`_func`, `_get`, `_set`)
    Spy(Spy),
    /// The boxed value (`_value`)
    Value(Value),
}

impl Facet {
    /// Get spy (if spy facet)
    #[inline]
    #[must_use]
    pub fn as_spy(&self) -> Option<&Spy> {
        match self {
            Self::Spy(spy) => Some(spy),
            Self::Value(_) => None,
        }
    }

    /// Get value (if value facet)
    #[inline]
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Spy(_) => None,
        }
    }
}

struct FunctionInner {
    member: String,
    spy: Spy,
    stub: Callable,
}

/// Recorder for a function member
#[derive(Clone)]
pub struct FunctionRecorder {
    inner: Rc<FunctionInner>,
}

impl FunctionRecorder {
    pub(crate) fn new(member: &str, spy: Spy) -> Self {
        let stub = spy.to_callable();
        Self {
            inner: Rc::new(FunctionInner {
                member: member.to_string(),
                spy,
                stub,
            }),
        }
    }

    /// Member name
    #[inline]
    #[must_use]
    pub fn member(&self) -> &str {
        &self.inner.member
    }

    /// The function spy
    #[inline]
    #[must_use]
    pub fn func(&self) -> &Spy {
        &self.inner.spy
    }

    /// Value the stub hands out for this member; the same callable every time
    pub(crate) fn stub_value(&self) -> Value {
        Value::Function(self.inner.stub.clone())
    }
}

impl fmt::Debug for FunctionRecorder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRecorder")
            .field("member", &self.inner.member)
            .field("func", &self.inner.spy)
            .finish()
    }
}

struct PropertyInner {
    member: String,
    get: Spy,
    set: Spy,
    value: Rc<RefCell<Value>>,
}

/// Recorder for a property member
///
/// Out of the box the getter returns the boxed value and the setter replaces
/// it, so the property round-trips the last write.
#[derive(Clone)]
pub struct PropertyRecorder {
    inner: Rc<PropertyInner>,
}

impl PropertyRecorder {
    pub(crate) fn new(member: &str, accessors: AccessorSpies) -> Self {
        let recorder = Self {
            inner: Rc::new(PropertyInner {
                member: member.to_string(),
                get: accessors.get,
                set: accessors.set,
                value: Rc::new(RefCell::new(Value::Undefined)),
            }),
        };
        recorder.restore_defaults();
        recorder
    }

    /// Member name
    #[inline]
    #[must_use]
    pub fn member(&self) -> &str {
        &self.inner.member
    }

    /// Getter spy
    #[inline]
    #[must_use]
    pub fn getter(&self) -> &Spy {
        &self.inner.get
    }

    /// Setter spy
    #[inline]
    #[must_use]
    pub fn setter(&self) -> &Spy {
        &self.inner.set
    }

    /// Current boxed value
    #[must_use]
    pub fn value(&self) -> Value {
        self.inner.value.borrow().clone()
    }

    /// Replace the boxed value without going through the setter spy
    pub fn set_value(&self, value: impl Into<Value>) {
        *self.inner.value.borrow_mut() = value.into();
    }

    /// Reinstall the default round-trip behavior on both spies
    pub fn restore_defaults(&self) {
        let read = Rc::clone(&self.inner.value);
        self.inner
            .get
            .and()
            .call_fake(move |_| read.borrow().clone());

        let write = Rc::clone(&self.inner.value);
        self.inner.set.and().call_fake(move |args| {
            let value = args.first().cloned().unwrap_or_default();
            *write.borrow_mut() = value.clone();
            value
        });
    }

    pub(crate) fn read(&self) -> Result<Value, InvokeError> {
        self.inner.get.call(&[])
    }

    pub(crate) fn write(&self, value: Value) -> Result<(), InvokeError> {
        self.inner.set.call(&[value]).map(|_| ())
    }
}

impl fmt::Debug for PropertyRecorder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyRecorder")
            .field("member", &self.inner.member)
            .field("value", &*self.inner.value.borrow())
            .field("get", &self.inner.get)
            .field("set", &self.inner.set)
            .finish()
    }
}

/// Instrumentation for one member of a double
///
/// Clones share identity; see [`MemberRecorder::ptr_eq`].
#[derive(Debug, Clone)]
pub enum MemberRecorder {
    /// Function member
    Function(FunctionRecorder),
    /// Property member
    Property(PropertyRecorder),
}

impl MemberRecorder {
    /// Kind of the member
    #[inline]
    #[must_use]
    pub fn kind(&self) -> MemberKind {
        match self {
            Self::Function(_) => MemberKind::Function,
            Self::Property(_) => MemberKind::Property,
        }
    }

    /// Member name
    #[inline]
    #[must_use]
    pub fn member(&self) -> &str {
        match self {
            Self::Function(f) => f.member(),
            Self::Property(p) => p.member(),
        }
    }

    /// Function recorder (if function)
    #[inline]
    #[must_use]
    pub fn as_function(&self) -> Option<&FunctionRecorder> {
        match self {
            Self::Function(f) => Some(f),
            Self::Property(_) => None,
        }
    }

    /// Property recorder (if property)
    #[inline]
    #[must_use]
    pub fn as_property(&self) -> Option<&PropertyRecorder> {
        match self {
            Self::Property(p) => Some(p),
            Self::Function(_) => None,
        }
    }

    /// The `_func` facet
    ///
    /// # Errors
    /// Returns `WrongFacetAccess` for property members
    pub fn func(&self) -> DoubleResult<&Spy> {
        match self {
            Self::Function(f) => Ok(f.func()),
            Self::Property(_) => Err(self.wrong(FacetName::Func, FacetAccess::Read)),
        }
    }

    /// The `_get` facet
    ///
    /// # Errors
    /// Returns `WrongFacetAccess` for function members
    pub fn getter(&self) -> DoubleResult<&Spy> {
        match self {
            Self::Property(p) => Ok(p.getter()),
            Self::Function(_) => Err(self.wrong(FacetName::Get, FacetAccess::Read)),
        }
    }

    /// The `_set` facet
    ///
    /// # Errors
    /// Returns `WrongFacetAccess` for function members
    pub fn setter(&self) -> DoubleResult<&Spy> {
        match self {
            Self::Property(p) => Ok(p.setter()),
            Self::Function(_) => Err(self.wrong(FacetName::Set, FacetAccess::Read)),
        }
    }

    /// The `_value` facet
    ///
    /// # Errors
    /// Returns `WrongFacetAccess` for function members
    pub fn value(&self) -> DoubleResult<Value> {
        match self {
            Self::Property(p) => Ok(p.value()),
            Self::Function(_) => Err(self.wrong(FacetName::Value, FacetAccess::Read)),
        }
    }

    /// Assign the `_value` facet
    ///
    /// # Errors
    /// Returns `WrongFacetAccess` for function members
    pub fn set_value(&self, value: impl Into<Value>) -> DoubleResult<()> {
        match self {
            Self::Property(p) => {
                p.set_value(value);
                Ok(())
            }
            Self::Function(_) => Err(self.wrong(FacetName::Value, FacetAccess::Write)),
        }
    }

    /// Read a facet by key
    ///
    /// # Errors
    /// Returns `UnknownFacet` for unrecognized keys and `WrongFacetAccess`
    /// for facets of the other kind
    pub fn facet(&self, key: &str) -> DoubleResult<Facet> {
        match self.parse_facet(key)? {
            FacetName::Func => self.func().cloned().map(Facet::Spy),
            FacetName::Get => self.getter().cloned().map(Facet::Spy),
            FacetName::Set => self.setter().cloned().map(Facet::Spy),
            FacetName::Value => self.value().map(Facet::Value),
        }
    }

    /// Assign a facet by key
    ///
    /// Only `_value` of a property can be assigned; spy facets are
    /// reconfigured through their strategy instead.
    ///
    /// # Errors
    /// Returns `UnknownFacet`, `WrongFacetAccess` or `FacetNotAssignable`
    pub fn write_facet(&self, key: &str, value: impl Into<Value>) -> DoubleResult<()> {
        let facet = self.parse_facet(key)?;
        if facet.owner_kind() != self.kind() {
            return Err(self.wrong(facet, FacetAccess::Write));
        }
        if facet == FacetName::Value {
            return self.set_value(value);
        }
        Err(DoubleError::FacetNotAssignable {
            member: self.member().to_string(),
            facet,
        })
    }

    /// Check whether both handles are the same recorder
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(&a.inner, &b.inner),
            (Self::Property(a), Self::Property(b)) => Rc::ptr_eq(&a.inner, &b.inner),
            _ => false,
        }
    }

    fn parse_facet(&self, key: &str) -> DoubleResult<FacetName> {
        FacetName::parse(key).ok_or_else(|| DoubleError::UnknownFacet {
            member: self.member().to_string(),
            facet: key.to_string(),
        })
    }

    fn wrong(&self, facet: FacetName, access: FacetAccess) -> DoubleError {
        tracing::warn!("rejected {} of {}.{} on a {} member", access, self.member(), facet, self.kind());
        DoubleError::wrong_facet(self.member(), facet, access, self.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doppel_spy::{DefaultSpyFactory, SpyFactory};

    fn function(name: &str) -> MemberRecorder {
        MemberRecorder::Function(FunctionRecorder::new(
            name,
            DefaultSpyFactory.create_spy(name, None),
        ))
    }

    fn property(name: &str) -> MemberRecorder {
        MemberRecorder::Property(PropertyRecorder::new(
            name,
            DefaultSpyFactory.spy_on_accessor(name),
        ))
    }

    #[test]
    fn facet_names_parse() {
        for facet in FacetName::ALL {
            assert_eq!(FacetName::parse(facet.as_str()), Some(facet));
        }
        assert_eq!(FacetName::parse("func"), None);
    }

    #[test]
    fn property_round_trips_through_spies() {
        let recorder = property("name");
        let p = recorder.as_property().unwrap();

        p.write(Value::from("Ada")).unwrap();
        assert_eq!(p.read().unwrap(), Value::from("Ada"));
        assert_eq!(recorder.value().unwrap(), Value::from("Ada"));
        assert!(p.setter().has_been_called_with(&[Value::from("Ada")]));
        assert_eq!(p.getter().call_count(), 1);
    }

    #[test]
    fn property_starts_undefined() {
        assert!(property("x").value().unwrap().is_undefined());
    }

    #[test]
    fn reconfigured_getter_then_restored() {
        let recorder = property("count");
        let p = recorder.as_property().unwrap();
        p.set_value(1);

        p.getter().and().return_value(99);
        assert_eq!(p.read().unwrap(), Value::from(99));

        p.restore_defaults();
        assert_eq!(p.read().unwrap(), Value::from(1));
    }

    #[test]
    fn function_rejects_property_facets() {
        let recorder = function("greet");

        assert!(recorder.func().is_ok());
        assert!(recorder.getter().unwrap_err().is_wrong_facet());
        assert!(recorder.setter().unwrap_err().is_wrong_facet());
        assert!(recorder.value().unwrap_err().is_wrong_facet());
        assert!(recorder.set_value(1).unwrap_err().is_wrong_facet());
    }

    #[test]
    fn property_rejects_function_facet() {
        let recorder = property("name");

        let err = recorder.func().unwrap_err();
        assert_eq!(
            err,
            DoubleError::wrong_facet("name", FacetName::Func, FacetAccess::Read, MemberKind::Property)
        );
        assert!(recorder.getter().is_ok());
    }

    #[test]
    fn dynamic_facets() {
        let recorder = property("name");
        recorder.set_value("Ada").unwrap();

        assert_eq!(
            recorder.facet("_value").unwrap().into_value(),
            Some(Value::from("Ada"))
        );
        assert!(recorder.facet("_get").unwrap().as_spy().is_some());
        assert!(recorder.facet("_func").unwrap_err().is_wrong_facet());
        assert!(matches!(
            recorder.facet("_nope").unwrap_err(),
            DoubleError::UnknownFacet { .. }
        ));
    }

    #[test]
    fn write_facets() {
        let prop = property("name");
        prop.write_facet("_value", "Grace").unwrap();
        assert_eq!(prop.value().unwrap(), Value::from("Grace"));

        assert!(matches!(
            prop.write_facet("_get", 1).unwrap_err(),
            DoubleError::FacetNotAssignable { facet: FacetName::Get, .. }
        ));
        assert!(prop.write_facet("_func", 1).unwrap_err().is_wrong_facet());

        let func = function("greet");
        assert!(func.write_facet("_set", 1).unwrap_err().is_wrong_facet());
        assert!(matches!(
            func.write_facet("_func", 1).unwrap_err(),
            DoubleError::FacetNotAssignable { .. }
        ));
    }

    #[test]
    fn function_stub_value_is_stable() {
        let recorder = function("greet");
        let f = recorder.as_function().unwrap();
        assert_eq!(f.stub_value(), f.stub_value());

        let stub = f.stub_value();
        let spy = stub.as_callable().unwrap().downcast_ref::<Spy>().unwrap();
        assert!(spy.ptr_eq(f.func()));
    }

    #[test]
    fn identity() {
        let a = property("a");
        assert!(a.ptr_eq(&a.clone()));
        assert!(!a.ptr_eq(&property("a")));
        assert!(!a.ptr_eq(&function("a")));
    }
}
