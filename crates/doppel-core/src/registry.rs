//! Member instrumentation registry
//!
//! Owns the instrumentation store of one double. Members are instrumented on
//! first touch and kept for the lifetime of the double; the store only grows.

use crate::classifier::{classify, Classification, Evidence};
use crate::config::MockConfig;
use crate::error::{DoubleError, DoubleResult};
use crate::recorder::{FunctionRecorder, MemberRecorder, PropertyRecorder};
use doppel_spy::SpyFactory;
use doppel_value::{Callable, MemberKind, ProbeError, Shape};
use indexmap::{IndexMap, IndexSet};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Instrumentation shared by the stub and spy views of one double
pub(crate) struct Registry {
    shape: Rc<dyn Shape>,
    spies: Rc<dyn SpyFactory>,
    config: MockConfig,
    store: RefCell<IndexMap<String, MemberRecorder>>,
    classifying: RefCell<IndexSet<String>>,
}

impl Registry {
    pub(crate) fn new(shape: Rc<dyn Shape>, spies: Rc<dyn SpyFactory>, config: MockConfig) -> Self {
        Self {
            shape,
            spies,
            config,
            store: RefCell::new(IndexMap::new()),
            classifying: RefCell::new(IndexSet::new()),
        }
    }

    pub(crate) fn config(&self) -> &MockConfig {
        &self.config
    }

    pub(crate) fn reserved_key(&self) -> &str {
        &self.config.reserved_key
    }

    pub(crate) fn is_reserved(&self, name: &str) -> bool {
        name == self.config.reserved_key
    }

    /// Instrument `name` if needed and return its recorder
    ///
    /// The store is not borrowed while the shape is probed or spies are
    /// created, so either may re-enter the double. A member read back while
    /// its own probe is running counts as a failed probe and becomes a
    /// property. Whichever recorder is stored first for a name wins.
    pub(crate) fn ensure(&self, name: &str) -> DoubleResult<MemberRecorder> {
        if self.is_reserved(name) {
            return Err(DoubleError::reserved_key(name));
        }
        if let Some(recorder) = self.lookup(name) {
            return Ok(recorder);
        }

        let (classification, original) = self.classify_once(name);
        if let Some(existing) = self.lookup(name) {
            tracing::trace!("{} was instrumented re-entrantly; keeping the first recorder", name);
            return Ok(existing);
        }
        let recorder = self.instrument(name, classification.kind, original);

        let mut store = self.store.borrow_mut();
        if let Some(existing) = store.get(name) {
            tracing::trace!("{} was instrumented re-entrantly; keeping the first recorder", name);
            return Ok(existing.clone());
        }
        tracing::debug!(
            "instrumented {} as {} ({:?})",
            name,
            classification.kind,
            classification.evidence
        );
        store.insert(name.to_string(), recorder.clone());
        Ok(recorder)
    }

    /// Classify `name` and find the blueprint implementation of functions
    ///
    /// Both steps may probe the shape, and a probe may read `name` back
    /// through the double. That nested read is answered from declarations
    /// alone, falling back to a property.
    fn classify_once(&self, name: &str) -> (Classification, Option<Callable>) {
        if !self.classifying.borrow_mut().insert(name.to_string()) {
            if let Some(kind) = self.shape.declared_kind(name) {
                let declared = Classification {
                    kind,
                    evidence: Evidence::Declared,
                };
                return (declared, None);
            }
            tracing::debug!("{} was read while being classified; treating it as a property", name);
            let failed = Classification {
                kind: MemberKind::Property,
                evidence: Evidence::ProbeFailed(ProbeError::accessor(
                    name,
                    "member read itself while being classified",
                )),
            };
            return (failed, None);
        }

        let classification = classify(self.shape.as_ref(), name);
        // keep the blueprint's implementation around for call-through
        let original = match (&classification.kind, &classification.evidence) {
            (MemberKind::Function, Evidence::Callable(original)) => Some(original.clone()),
            (MemberKind::Function, Evidence::Declared) => self
                .shape
                .probe(name)
                .ok()
                .and_then(|value| value.as_callable().cloned()),
            _ => None,
        };
        self.classifying.borrow_mut().shift_remove(name);
        (classification, original)
    }

    fn instrument(
        &self,
        name: &str,
        kind: MemberKind,
        original: Option<Callable>,
    ) -> MemberRecorder {
        match kind {
            MemberKind::Function => {
                let spy = self.spies.create_spy(name, original);
                MemberRecorder::Function(FunctionRecorder::new(name, spy))
            }
            MemberKind::Property => {
                let accessors = self.spies.spy_on_accessor(name);
                MemberRecorder::Property(PropertyRecorder::new(name, accessors))
            }
        }
    }

    /// Recorder for `name` without instrumenting it
    pub(crate) fn lookup(&self, name: &str) -> Option<MemberRecorder> {
        self.store.borrow().get(name).cloned()
    }

    pub(crate) fn kind_of(&self, name: &str) -> Option<MemberKind> {
        self.store.borrow().get(name).map(MemberRecorder::kind)
    }

    pub(crate) fn members(&self) -> Vec<String> {
        self.store.borrow().keys().cloned().collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.store.borrow().len()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("shape", &self.shape)
            .field("reserved_key", &self.config.reserved_key)
            .field("members", &self.members())
            .finish_non_exhaustive()
    }
}
