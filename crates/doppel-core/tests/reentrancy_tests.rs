//! Re-entrant access: probes and fakes that touch the double again

use doppel_core::prelude::*;
use doppel_test_utils::greeter_shape;
use doppel_value::ProbeError;
use once_cell::unsync::OnceCell;
use std::fmt;
use std::rc::Rc;

/// Shape whose probes read members back from the double being built
///
/// `summary` reads `name`; `echo` reads itself.
struct LinkedShape {
    double: Rc<OnceCell<Double>>,
}

impl fmt::Debug for LinkedShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LinkedShape")
    }
}

impl LinkedShape {
    fn linked(&self, member: &str) -> Result<&Double, ProbeError> {
        self.double
            .get()
            .ok_or_else(|| ProbeError::accessor(member, "double not linked"))
    }
}

impl Shape for LinkedShape {
    fn probe(&self, name: &str) -> Result<Value, ProbeError> {
        match name {
            "echo" => {
                let inner = self
                    .linked("echo")?
                    .value("echo")
                    .map_err(|e| ProbeError::accessor("echo", e.to_string()))?;
                Ok(Value::from(format!("echo of {inner}")))
            }
            "summary" => {
                let inner = self
                    .linked("summary")?
                    .value("name")
                    .map_err(|e| ProbeError::accessor("summary", e.to_string()))?;
                Ok(Value::from(format!("summary of {inner}")))
            }
            "refresh" => Ok(Value::Function(doppel_value::Callable::from_fn(
                "refresh",
                |_| Value::Undefined,
            ))),
            _ => Ok(Value::Undefined),
        }
    }
}

#[test]
fn test_probe_may_instrument_other_members() {
    let cell = Rc::new(OnceCell::new());
    let d = create(LinkedShape {
        double: Rc::clone(&cell),
    });
    cell.set(d.clone()).unwrap();

    assert!(d.value("summary").unwrap().is_undefined());

    assert_eq!(d.kind_of("summary"), Some(MemberKind::Property));
    assert_eq!(d.kind_of("name"), Some(MemberKind::Property));
    // name finished instrumenting while summary was still being classified
    assert_eq!(d.instrumented_members(), ["name", "summary"]);
}

fn linked_double(wrap: impl FnOnce(LinkedShape) -> Double) -> Double {
    let cell = Rc::new(OnceCell::new());
    let d = wrap(LinkedShape {
        double: Rc::clone(&cell),
    });
    cell.set(d.clone()).unwrap();
    d
}

#[test]
fn test_member_reading_itself_while_classified_is_property() {
    let d = linked_double(create);

    assert!(d.value("echo").unwrap().is_undefined());
    assert_eq!(d.kind_of("echo"), Some(MemberKind::Property));
    assert_eq!(d.instrumented_members(), ["echo"]);

    d.set("echo", "hello").unwrap();
    assert_eq!(d.value("echo").unwrap(), Value::from("hello"));
}

#[test]
fn test_self_reading_member_through_view() {
    let d = linked_double(create);
    let recorder = d.spy().get("echo").unwrap();

    assert_eq!(recorder.kind(), MemberKind::Property);
    assert!(d.spy().get("echo").unwrap().ptr_eq(&recorder));
}

#[test]
fn test_declared_function_reading_itself_stays_function() {
    let d = linked_double(|shape| create(Schema::new().function("echo").over(Rc::new(shape))));

    assert_eq!(d.call("echo", &[]).unwrap(), Value::Undefined);
    assert_eq!(d.kind_of("echo"), Some(MemberKind::Function));
    // the blueprint produced a string, so there is nothing to call through to
    d.spy().func("echo").unwrap().and().call_through();
    assert_eq!(d.call("echo", &[]).unwrap(), Value::Undefined);
}

#[test]
fn test_probe_failure_from_unlinked_double_is_property() {
    let d = create(LinkedShape {
        double: Rc::new(OnceCell::new()),
    });

    assert!(d.value("summary").unwrap().is_undefined());
    assert_eq!(d.kind_of("summary"), Some(MemberKind::Property));
    assert_eq!(d.call("refresh", &[]).unwrap(), Value::Undefined);
}

#[test]
fn test_fake_getter_reads_sibling_member() {
    let d = create(greeter_shape());
    let handle = d.clone();
    d.spy()
        .getter("display")
        .unwrap()
        .and()
        .call_fake(move |_| {
            let name = handle.value("name").unwrap_or_default();
            Value::from(format!("<{}>", name.as_str().unwrap_or("?")))
        });

    d.set("name", "Ada").unwrap();
    assert_eq!(d.value("display").unwrap(), Value::from("<Ada>"));
}

#[test]
fn test_fake_function_calls_other_function() {
    let d = create(greeter_shape().method("farewell", |_| Value::Undefined));
    let handle = d.clone();
    d.spy().func("greet").unwrap().and().return_value("hi");
    d.spy()
        .func("farewell")
        .unwrap()
        .and()
        .call_fake_fallible(move |_| {
            let greeting = handle
                .call("greet", &[])
                .map_err(|e| doppel_value::InvokeError::thrown(e.to_string()))?;
            Ok(Value::from(format!("{} and bye", greeting.as_str().unwrap_or_default())))
        });

    assert_eq!(d.call("farewell", &[]).unwrap(), Value::from("hi and bye"));
    assert!(d.spy().func("greet").unwrap().has_been_called_times(1));
}
