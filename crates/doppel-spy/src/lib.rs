//! Doppel Spies
//!
//! The call-recording primitive behind every doppel double.
//!
//! # Core Concepts
//!
//! - [`Spy`]: Invocable recorder with call history
//! - [`SpyStrategy`]: Behavior configuration (`spy.and().return_value(..)`)
//! - [`SpyFactory`]: Injectable source of spies ([`DefaultSpyFactory`], [`TrackingSpyFactory`])
//!
//! # Example
//!
//! ```rust
//! use doppel_spy::Spy;
//! use doppel_value::Value;
//!
//! let spy = Spy::new("greet");
//! spy.and().return_value("hi");
//!
//! assert_eq!(spy.call(&[Value::from("Ada")]).unwrap(), Value::from("hi"));
//! assert!(spy.has_been_called_with(&[Value::from("Ada")]));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod factory;
mod spy;

// Re-exports
pub use factory::{AccessorSpies, DefaultSpyFactory, SpyFactory, TrackingSpyFactory};
pub use spy::{CallRecord, FakeFn, Spy, SpyStrategy};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use doppel_value::Value;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn call_count_matches_invocations(n in 0usize..32) {
            let spy = Spy::new("f");
            for i in 0..n {
                spy.call(&[Value::from(i64::try_from(i).unwrap())]).unwrap();
            }
            prop_assert_eq!(spy.call_count(), n);
            prop_assert_eq!(spy.calls().len(), n);
        }

        #[test]
        fn return_value_is_recorded(s in ".{0,16}") {
            let spy = Spy::new("f");
            spy.and().return_value(s.as_str());
            let out = spy.call(&[]).unwrap();
            let recorded = spy.most_recent_call().unwrap();
            prop_assert_eq!(recorded.return_value(), Some(&out));
        }
    }

    #[test]
    fn tracked_accessor_pair_round_trip_via_fakes() {
        let factory = TrackingSpyFactory::new();
        let pair = factory.spy_on_accessor("name");
        let stored = std::rc::Rc::new(std::cell::RefCell::new(Value::Undefined));

        let read = stored.clone();
        pair.get.and().call_fake(move |_| read.borrow().clone());
        let write = stored.clone();
        pair.set.and().call_fake(move |args| {
            *write.borrow_mut() = args.first().cloned().unwrap_or_default();
            Value::Undefined
        });

        pair.set.call(&[Value::from("Ada")]).unwrap();
        assert_eq!(pair.get.call(&[]).unwrap(), Value::from("Ada"));
        assert_eq!(factory.len(), 2);
    }
}
