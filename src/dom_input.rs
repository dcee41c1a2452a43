// Pure translation of DOM keyboard facts into viewer input events.
// Kept free of web-sys so host tests can include it.

use viewer_core::InputEvent;

// Facts read off a `KeyboardEvent` before translation.
pub struct KeyFacts {
    pub code: String,
    pub down: bool,
    pub repeat: bool,
    pub in_form_control: bool,
}

// Key down is dropped for auto-repeat and while a page control has focus.
// Key up always passes so a key pressed on the canvas and released over a
// control is still released.
pub fn key_event(facts: KeyFacts) -> Option<InputEvent> {
    let KeyFacts {
        code,
        down,
        repeat,
        in_form_control,
    } = facts;
    if !down {
        return Some(InputEvent::KeyUp { code });
    }
    if repeat || in_form_control {
        return None;
    }
    Some(InputEvent::KeyDown { code })
}
