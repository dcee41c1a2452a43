// Host-side checks for keyboard translation. The main crate is wasm-only,
// so the pure module is included directly.

#![allow(dead_code)]
mod dom_input {
    include!("../src/dom_input.rs");
}

use dom_input::{key_event, KeyFacts};
use viewer_core::InputEvent;

fn facts(code: &str, down: bool, repeat: bool, in_form_control: bool) -> KeyFacts {
    KeyFacts {
        code: code.to_string(),
        down,
        repeat,
        in_form_control,
    }
}

#[test]
fn key_down_in_form_control_is_dropped() {
    assert_eq!(key_event(facts("KeyW", true, false, true)), None);
    assert_eq!(key_event(facts("KeyW", true, true, false)), None);
    assert_eq!(
        key_event(facts("KeyW", true, false, false)),
        Some(InputEvent::KeyDown {
            code: "KeyW".into()
        })
    );
}

#[test]
fn key_up_passes_even_from_form_control() {
    assert_eq!(
        key_event(facts("KeyW", false, false, true)),
        Some(InputEvent::KeyUp {
            code: "KeyW".into()
        })
    );
}

