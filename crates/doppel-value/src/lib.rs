//! Doppel Value Model
//!
//! Dynamic values and shape descriptions consumed by doppel test doubles.
//!
//! # Core Concepts
//!
//! - [`Value`]: Loosely typed payload (arguments, return values, stored properties)
//! - [`Callable`]: Identity-compared handle over an [`Invoke`] implementation
//! - [`Shape`]: Blueprint a double imitates
//! - [`ObjectShape`], [`ClassShape`], [`Schema`]: Built-in blueprints
//! - [`MemberKind`]: Function vs property classification
//!
//! # Example
//!
//! ```rust
//! use doppel_value::{ObjectShape, Shape, Value};
//!
//! let shape = ObjectShape::new()
//!     .method("greet", |_| Value::from("hello"))
//!     .field("name", "");
//!
//! assert!(shape.probe("greet").unwrap().is_callable());
//! assert!(!shape.probe("name").unwrap().is_callable());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod callable;
mod error;
mod shape;
mod value;

// Re-exports
pub use callable::{Callable, Invoke};
pub use error::{InvokeError, ProbeError};
pub use shape::{ClassShape, GetterFn, MemberKind, ObjectShape, Schema, Shape};
pub use value::Value;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use proptest::prelude::*;
    use std::rc::Rc;

    #[test]
    fn class_prototype_getter_reads_sibling_members() {
        let layout = ObjectShape::new()
            .field("first", "Ada")
            .field("last", "Lovelace")
            .getter("full", |this| {
                let first = this.read("first")?;
                let last = this.read("last")?;
                match (first.as_str(), last.as_str()) {
                    (Some(f), Some(l)) => Ok(Value::from(format!("{f} {l}"))),
                    _ => Err(ProbeError::accessor("full", "names must be strings")),
                }
            });
        let class: Rc<dyn Shape> = Rc::new(ClassShape::new("Person", layout));

        let proto = class.prototype().unwrap();
        assert_eq!(proto.probe("full").unwrap(), Value::from("Ada Lovelace"));
    }

    proptest! {
        #[test]
        fn absent_members_probe_as_undefined(name in "[a-z_][a-z0-9_]{0,12}") {
            let shape = ObjectShape::new();
            prop_assert!(shape.probe(&name).unwrap().is_undefined());
        }

        #[test]
        fn fields_probe_as_their_value(name in "[a-z]{1,8}", n in -1.0e6f64..1.0e6) {
            let shape = ObjectShape::new().field(&name, n);
            prop_assert_eq!(shape.probe(&name).unwrap(), Value::Number(n));
        }
    }
}
