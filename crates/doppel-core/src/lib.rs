//! Doppel Core - lazily instrumented test doubles
//!
//! A double imitates a blueprint and exposes two views over one store:
//! - **Stub** ([`Double`]): used in place of the real object
//! - **Spy** ([`SpyView`]): hands out the recorder behind each member, for
//!   assertions and reconfiguration
//!
//! Members are discovered on first touch. The classifier probes the blueprint,
//! callable members get a function spy and everything else gets a
//! getter/setter spy pair that round-trips the last written value.
//!
//! # Example
//!
//! ```rust
//! use doppel_core::create;
//! use doppel_value::{ObjectShape, Value};
//!
//! let shape = ObjectShape::new()
//!     .method("greet", |_| Value::from("real"))
//!     .field("name", "");
//! let d = create(shape);
//!
//! d.set("name", "Ada")?;
//! assert_eq!(d.value("name")?, Value::from("Ada"));
//! assert_eq!(d.spy().stored_value("name")?, Value::from("Ada"));
//!
//! assert_eq!(d.call("greet", &[])?, Value::Undefined);
//! d.spy().func("greet")?.and().return_value("hi");
//! assert_eq!(d.call("greet", &[])?, Value::from("hi"));
//! # Ok::<(), doppel_core::DoubleError>(())
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

// Core modules
pub mod classifier;
pub mod config;
pub mod double;
pub mod error;
pub mod factory;
pub mod recorder;
mod registry;
pub mod view;

// Re-exports for convenience
pub use classifier::{classify, Classification, Evidence};
pub use config::{MockConfig, DEFAULT_RESERVED_KEY};
pub use double::{Access, Double};
pub use error::{DoubleError, DoubleResult, FacetAccess};
pub use factory::{create, MockFactory};
pub use recorder::{Facet, FacetName, FunctionRecorder, MemberRecorder, PropertyRecorder};
pub use view::SpyView;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for writing tests with doubles
    pub use crate::{
        create, Double, DoubleError, DoubleResult, MemberRecorder, MockConfig, MockFactory,
        SpyView,
    };
    pub use doppel_spy::{Spy, SpyFactory, TrackingSpyFactory};
    pub use doppel_value::{ClassShape, MemberKind, ObjectShape, Schema, Shape, Value};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::prelude::*;
    use std::rc::Rc;

    #[test]
    fn stub_and_spy_share_one_store() {
        let d = create(ObjectShape::new().field("count", 0));

        d.spy().get("count").unwrap().set_value(5).unwrap();
        assert_eq!(d.value("count").unwrap(), Value::from(5));

        d.set("count", 6).unwrap();
        assert_eq!(d.spy().stored_value("count").unwrap(), Value::from(6));
    }

    #[test]
    fn schema_opt_in_overrides_probing() {
        let shape = ObjectShape::new().field("callback", Value::Null);
        let schema = Schema::new().function("callback").over(Rc::new(shape));
        let d = create(schema);

        assert_eq!(d.call("callback", &[]).unwrap(), Value::Undefined);
        assert_eq!(d.kind_of("callback"), Some(MemberKind::Function));
    }
}
