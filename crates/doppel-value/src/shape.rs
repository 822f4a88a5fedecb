//! Shape descriptions
//!
//! A shape is the blueprint a double imitates. It is only ever read: the
//! classifier probes members to learn whether they are callable.
//!
//! - [`ObjectShape`]: plain object with methods, fields and computed getters
//! - [`ClassShape`]: class-like blueprint exposing its instance layout as a prototype
//! - [`Schema`]: explicit member kinds, optionally layered over another shape

use crate::callable::Callable;
use crate::error::ProbeError;
use crate::value::Value;
use indexmap::IndexMap;
use std::fmt::{self, Debug, Formatter};
use std::rc::Rc;

/// Kind of a member, decided once per member name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// Callable member
    Function,
    /// Data-like member (plain value or accessor)
    Property,
}

impl MemberKind {
    /// Lowercase name used in messages
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Property => "property",
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Blueprint of the object being doubled
pub trait Shape: Debug {
    /// Read a member from the blueprint
    ///
    /// Absent members read as `Undefined`.
    ///
    /// # Errors
    /// Returns error when a computed accessor fails
    fn probe(&self, name: &str) -> Result<Value, ProbeError>;

    /// Nested template describing instance members (class-like blueprints)
    fn prototype(&self) -> Option<Rc<dyn Shape>> {
        None
    }

    /// Explicitly declared kind for a member, bypassing probing
    fn declared_kind(&self, _name: &str) -> Option<MemberKind> {
        None
    }

    /// Names of members the blueprint knows about
    fn member_names(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Getter implementation; receives the shape it is defined on
pub type GetterFn = Rc<dyn Fn(&ObjectShape) -> Result<Value, ProbeError>>;

#[derive(Clone)]
enum Member {
    Method(Callable),
    Field(Value),
    Getter(GetterFn),
}

/// Plain object blueprint
#[derive(Clone, Default)]
pub struct ObjectShape {
    members: IndexMap<String, Member>,
}

impl ObjectShape {
    /// Create empty shape
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a method
    #[must_use]
    pub fn method(mut self, name: &str, f: impl Fn(&[Value]) -> Value + 'static) -> Self {
        self.members
            .insert(name.to_string(), Member::Method(Callable::from_fn(name, f)));
        self
    }

    /// Add a data field
    #[must_use]
    pub fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.members
            .insert(name.to_string(), Member::Field(value.into()));
        self
    }

    /// Add a computed getter
    #[must_use]
    pub fn getter(
        mut self,
        name: &str,
        f: impl Fn(&ObjectShape) -> Result<Value, ProbeError> + 'static,
    ) -> Self {
        self.members
            .insert(name.to_string(), Member::Getter(Rc::new(f)));
        self
    }

    /// Read a member, running getters against this shape
    ///
    /// # Errors
    /// Returns error when a getter fails
    pub fn read(&self, name: &str) -> Result<Value, ProbeError> {
        match self.members.get(name) {
            Some(Member::Method(f)) => Ok(Value::Function(f.clone())),
            Some(Member::Field(v)) => Ok(v.clone()),
            Some(Member::Getter(g)) => g(self),
            None => Ok(Value::Undefined),
        }
    }

    /// Check if member is defined
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    /// Number of defined members
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if no members are defined
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl Shape for ObjectShape {
    fn probe(&self, name: &str) -> Result<Value, ProbeError> {
        self.read(name)
    }

    fn member_names(&self) -> Vec<String> {
        self.members.keys().cloned().collect()
    }
}

impl Debug for ObjectShape {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, member) in &self.members {
            match member {
                Member::Method(_) => map.entry(name, &"<method>"),
                Member::Field(v) => map.entry(name, v),
                Member::Getter(_) => map.entry(name, &"<getter>"),
            };
        }
        map.finish()
    }
}

/// Class-like blueprint
///
/// Instance members live on the prototype; the class itself only exposes
/// its `name`.
#[derive(Debug, Clone)]
pub struct ClassShape {
    name: String,
    prototype: Rc<ObjectShape>,
}

impl ClassShape {
    /// Create class with instance layout
    #[must_use]
    pub fn new(name: impl Into<String>, prototype: ObjectShape) -> Self {
        Self {
            name: name.into(),
            prototype: Rc::new(prototype),
        }
    }

    /// Class name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Instance layout
    #[inline]
    #[must_use]
    pub fn instance_layout(&self) -> &ObjectShape {
        &self.prototype
    }
}

impl Shape for ClassShape {
    fn probe(&self, name: &str) -> Result<Value, ProbeError> {
        if name == "name" {
            return Ok(Value::String(self.name.clone()));
        }
        Ok(Value::Undefined)
    }

    fn prototype(&self) -> Option<Rc<dyn Shape>> {
        Some(self.prototype.clone())
    }
}

/// Explicit member kinds
///
/// Declared members are classified without probing. Probing and undeclared
/// members fall through to the wrapped shape, if any.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    kinds: IndexMap<String, MemberKind>,
    fallback: Option<Rc<dyn Shape>>,
}

impl Schema {
    /// Create empty schema
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a function member
    #[must_use]
    pub fn function(self, name: &str) -> Self {
        self.declare(name, MemberKind::Function)
    }

    /// Declare a property member
    #[must_use]
    pub fn property(self, name: &str) -> Self {
        self.declare(name, MemberKind::Property)
    }

    /// Declare a member of the given kind
    #[must_use]
    pub fn declare(mut self, name: &str, kind: MemberKind) -> Self {
        self.kinds.insert(name.to_string(), kind);
        self
    }

    /// Layer this schema over another shape
    #[must_use]
    pub fn over(mut self, shape: Rc<dyn Shape>) -> Self {
        self.fallback = Some(shape);
        self
    }
}

impl Shape for Schema {
    fn probe(&self, name: &str) -> Result<Value, ProbeError> {
        match &self.fallback {
            Some(shape) => shape.probe(name),
            None => Ok(Value::Undefined),
        }
    }

    fn prototype(&self) -> Option<Rc<dyn Shape>> {
        // keep the declarations when the wrapped shape is class-like
        let prototype = self.fallback.as_ref()?.prototype()?;
        Some(Rc::new(Self {
            kinds: self.kinds.clone(),
            fallback: Some(prototype),
        }))
    }

    fn declared_kind(&self, name: &str) -> Option<MemberKind> {
        self.kinds
            .get(name)
            .copied()
            .or_else(|| self.fallback.as_ref().and_then(|s| s.declared_kind(name)))
    }

    fn member_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.kinds.keys().cloned().collect();
        if let Some(shape) = &self.fallback {
            for name in shape.member_names() {
                if !self.kinds.contains_key(&name) {
                    names.push(name);
                }
            }
        }
        names
    }
}
