//! First-person controller.
//!
//! Split into a reducer (`handle_event`) that folds raw input events into an
//! [`InputState`], and a pure integration step (`update`) that maps the
//! current camera and input onto the next camera. Zoom is applied directly
//! to the camera when a wheel event arrives.

use crate::camera::{clamp_fov, clamp_pitch, CameraState};
use crate::constants::{GLIDE_MULTIPLIER, SPRINT_MULTIPLIER, ZOOM_SPEED};
use crate::input::{set_movement, InputEvent, InputState, KeyBindings, PointerButton};
use glam::{Vec2, Vec3};

#[derive(Clone, Debug)]
pub struct FirstPersonController {
    pub enabled: bool,
    /// Look mode; when off the look button is ignored.
    pub look_enabled: bool,
    pub look_button: PointerButton,
    pub zoom_speed: f32,
    pub bindings: KeyBindings,
    view_half: Vec2,
}

impl Default for FirstPersonController {
    fn default() -> Self {
        Self {
            enabled: true,
            look_enabled: true,
            look_button: PointerButton::Primary,
            zoom_speed: ZOOM_SPEED,
            bindings: KeyBindings::default(),
            view_half: Vec2::ZERO,
        }
    }
}

impl FirstPersonController {
    pub fn new() -> Self {
        Self::default()
    }

    /// View-center reference used for pointer offsets.
    pub fn set_view_half(&mut self, view_half: Vec2) {
        self.view_half = view_half;
    }

    pub fn view_half(&self) -> Vec2 {
        self.view_half
    }

    /// Fold one input event into `input`. Wheel and resize events do not
    /// touch the input snapshot; the viewer routes them separately.
    pub fn handle_event(&self, input: &mut InputState, event: &InputEvent) {
        match event {
            InputEvent::KeyDown { code } => {
                if let Some(m) = self.bindings.movement(code) {
                    set_movement(input, m, true);
                }
            }
            InputEvent::KeyUp { code } => {
                if let Some(m) = self.bindings.movement(code) {
                    set_movement(input, m, false);
                }
            }
            InputEvent::PointerDown { button, x, y } => {
                if *button == self.look_button && self.look_enabled {
                    input.look_active = true;
                    self.store_pointer(input, *x, *y);
                }
            }
            InputEvent::PointerUp { button } => {
                if *button == self.look_button {
                    input.look_active = false;
                    input.pointer = Vec2::ZERO;
                }
            }
            InputEvent::PointerCancel => {
                input.look_active = false;
                input.pointer = Vec2::ZERO;
            }
            InputEvent::PointerMove { x, y } => {
                self.store_pointer(input, *x, *y);
            }
            InputEvent::FocusLost => input.release_all(),
            InputEvent::Wheel { .. } | InputEvent::Resize(_) => {}
        }
    }

    fn store_pointer(&self, input: &mut InputState, x: f32, y: f32) {
        if x.is_finite() && y.is_finite() {
            input.pointer = Vec2::new(x - self.view_half.x, y - self.view_half.y);
        }
    }

    /// Integrate one frame of input into the camera.
    ///
    /// Translation uses the orientation from the previous frame, then look
    /// angles are advanced and pitch is clamped.
    pub fn update(&self, camera: &CameraState, input: &InputState, dt: f32) -> CameraState {
        let mut next = *camera;
        if !self.enabled || !dt.is_finite() || dt <= 0.0 {
            return next;
        }

        let multiplier = if input.sprint {
            SPRINT_MULTIPLIER
        } else {
            GLIDE_MULTIPLIER
        };
        let step = dt * camera.movement_speed * multiplier;

        let mut local = Vec3::ZERO;
        if input.forward {
            local.z -= 1.0;
        }
        if input.back {
            local.z += 1.0;
        }
        if input.right {
            local.x += 1.0;
        }
        if input.left {
            local.x -= 1.0;
        }
        if input.up {
            local.y += 1.0;
        }
        if input.down {
            local.y -= 1.0;
        }
        if local != Vec3::ZERO {
            // Each held axis moves the full step; diagonals are not normalized.
            next.position += camera.orientation() * (local * step);
        }

        if input.look_active {
            let look = dt * camera.look_speed;
            next.yaw_deg = wrap_degrees(camera.yaw_deg - input.pointer.x * look);
            next.pitch_deg = clamp_pitch(camera.pitch_deg - input.pointer.y * look);
        }
        next
    }
}

/// Adjust field of view by a wheel delta; positive delta widens the view.
pub fn apply_zoom(camera: &mut CameraState, delta_y: f32, zoom_speed: f32) {
    if delta_y.is_finite() {
        camera.fov_deg = clamp_fov(camera.fov_deg + delta_y * zoom_speed);
    }
}

#[inline]
fn wrap_degrees(deg: f32) -> f32 {
    let wrapped = deg % 360.0;
    if wrapped > 180.0 {
        wrapped - 360.0
    } else if wrapped < -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}
