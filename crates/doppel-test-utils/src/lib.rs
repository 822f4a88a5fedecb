//! Testing utilities for doppel workspace
//!
//! Shared blueprints, tracing setup, and assertions.

#![allow(missing_docs)]

use doppel_spy::Spy;
use doppel_value::{ClassShape, ObjectShape, ProbeError, Value};
use once_cell::sync::Lazy;
use tracing_subscriber::EnvFilter;

static TRACING: Lazy<()> = Lazy::new(|| {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // another harness may have installed a subscriber already
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
});

/// Install a test subscriber once per process; filter with `RUST_LOG`
pub fn init_tracing() {
    Lazy::force(&TRACING);
}

/// `{ greet(): string, name: string }`
pub fn greeter_shape() -> ObjectShape {
    ObjectShape::new()
        .method("greet", |args| {
            let who = args.first().and_then(Value::as_str).unwrap_or("world");
            Value::from(format!("hello, {who}"))
        })
        .field("name", "")
}

/// Class whose `display_name` getter reads `owner`, which the prototype
/// never defines
pub fn account_class() -> ClassShape {
    let layout = ObjectShape::new()
        .method("deposit", |_| Value::Undefined)
        .method("withdraw", |_| Value::Undefined)
        .field("balance", 0)
        .getter("display_name", |this| this.read("owner")?.property("name"))
        .getter("is_overdrawn", |this| {
            let balance = this.read("balance")?;
            balance
                .as_number()
                .map(|b| Value::Bool(b < 0.0))
                .ok_or_else(|| ProbeError::accessor("is_overdrawn", "balance is not a number"))
        });
    ClassShape::new("Account", layout)
}

/// Shape with one data field per key of a JSON object
pub fn shape_from_json(json: serde_json::Value) -> ObjectShape {
    match Value::from(json) {
        Value::Map(entries) => entries
            .into_iter()
            .fold(ObjectShape::new(), |shape, (key, value)| shape.field(&key, value)),
        _ => ObjectShape::new(),
    }
}

pub fn str_args(args: &[&str]) -> Vec<Value> {
    args.iter().map(|a| Value::from(*a)).collect()
}

/// Assert that `spy` received exactly `args` at least once
#[track_caller]
pub fn assert_called_with(spy: &Spy, args: &[Value]) {
    assert!(
        spy.has_been_called_with(args),
        "expected {} to have been called with {:?}, calls were {:?}",
        spy.name(),
        args,
        spy.calls().iter().map(|c| c.args().to_vec()).collect::<Vec<_>>()
    );
}
