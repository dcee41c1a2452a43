use crate::resize::ContainerSize;
use fnv::FnvHashMap;
use glam::Vec2;

/// Held-input snapshot read once per frame by the controller.
///
/// Only the controller's reducer writes to it. `pointer` is the offset of the
/// last pointer sample from the view center; it is not accumulated.
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct InputState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub look_active: bool,
    pub sprint: bool,
    pub pointer: Vec2,
}

impl InputState {
    pub fn release_all(&mut self) {
        *self = InputState::default();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Auxiliary,
    Secondary,
    Other(i16),
}

impl PointerButton {
    /// Map a DOM `MouseEvent.button` value.
    pub fn from_dom(button: i16) -> Self {
        match button {
            0 => PointerButton::Primary,
            1 => PointerButton::Auxiliary,
            2 => PointerButton::Secondary,
            n => PointerButton::Other(n),
        }
    }
}

/// Platform-free input event fed to the viewer by an `EventSource`.
///
/// Keys are physical key codes (`KeyboardEvent.code`), pointer coordinates
/// are CSS pixels relative to the container's top-left corner.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    KeyDown { code: String },
    KeyUp { code: String },
    PointerDown { button: PointerButton, x: f32, y: f32 },
    PointerUp { button: PointerButton },
    /// The platform abandoned the pointer stream (no button is reported).
    PointerCancel,
    PointerMove { x: f32, y: f32 },
    Wheel { delta_y: f32 },
    Resize(ContainerSize),
    FocusLost,
}

/// What a bound key does while held.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Movement {
    Forward,
    Back,
    Left,
    Right,
    Up,
    Down,
    Sprint,
}

/// One-shot viewer actions triggered on key down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shortcut {
    ToggleAvatar,
    ToggleInfo,
    ResetCamera,
}

#[derive(Clone, Debug)]
pub struct KeyBindings {
    movement: FnvHashMap<&'static str, Movement>,
    shortcuts: FnvHashMap<&'static str, Shortcut>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut movement = FnvHashMap::default();
        for (code, m) in [
            ("KeyW", Movement::Forward),
            ("ArrowUp", Movement::Forward),
            ("KeyS", Movement::Back),
            ("ArrowDown", Movement::Back),
            ("KeyA", Movement::Left),
            ("ArrowLeft", Movement::Left),
            ("KeyD", Movement::Right),
            ("ArrowRight", Movement::Right),
            ("KeyE", Movement::Up),
            ("Space", Movement::Up),
            ("KeyQ", Movement::Down),
            ("ShiftLeft", Movement::Sprint),
            ("ShiftRight", Movement::Sprint),
        ] {
            movement.insert(code, m);
        }
        let mut shortcuts = FnvHashMap::default();
        shortcuts.insert("KeyH", Shortcut::ToggleAvatar);
        shortcuts.insert("KeyC", Shortcut::ToggleInfo);
        shortcuts.insert("KeyR", Shortcut::ResetCamera);
        Self {
            movement,
            shortcuts,
        }
    }
}

impl KeyBindings {
    #[inline]
    pub fn movement(&self, code: &str) -> Option<Movement> {
        self.movement.get(code).copied()
    }

    #[inline]
    pub fn shortcut(&self, code: &str) -> Option<Shortcut> {
        self.shortcuts.get(code).copied()
    }

    /// True when the key is consumed by the viewer and should not scroll
    /// or otherwise reach the page.
    pub fn is_bound(&self, code: &str) -> bool {
        self.movement.contains_key(code) || self.shortcuts.contains_key(code)
    }
}

/// Set or clear the flag a movement binding controls.
pub fn set_movement(state: &mut InputState, movement: Movement, held: bool) {
    match movement {
        Movement::Forward => state.forward = held,
        Movement::Back => state.back = held,
        Movement::Left => state.left = held,
        Movement::Right => state.right = held,
        Movement::Up => state.up = held,
        Movement::Down => state.down = held,
        Movement::Sprint => state.sprint = held,
    }
}
