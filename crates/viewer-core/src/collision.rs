//! Capsule collision against the splat scene.
//!
//! One query and at most one positional correction per frame; there is no
//! iterative resolution or multi-contact handling.

use crate::camera::CameraState;
use crate::constants::{AVATAR_FORWARD_OFFSET, CAPSULE_HEIGHT, CAPSULE_RADIUS};
use crate::renderer::{RendererHandle, SplatRenderer};
use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionCapsule {
    pub start: Vec3,
    pub end: Vec3,
    pub radius: f32,
    /// Always `NO_DELTA`; the capsule is a static probe, not a sweep.
    pub delta: Vec3,
}

impl CollisionCapsule {
    pub const NO_DELTA: Vec3 = Vec3::ZERO;

    /// Vertical capsule centred `forward_offset` ahead of the camera.
    pub fn around_camera(camera: &CameraState, forward_offset: f32) -> Self {
        let anchor = camera.position + camera.forward() * forward_offset;
        let half = Vec3::Y * (CAPSULE_HEIGHT * 0.5);
        Self {
            start: anchor + half,
            end: anchor - half,
            radius: CAPSULE_RADIUS,
            delta: Self::NO_DELTA,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.start + self.end) * 0.5
    }
}

/// Engine answer to a capsule query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CapsuleHit {
    pub hit: bool,
    /// Correction that moves the capsule out of the surface.
    pub delta: Vec3,
}

#[derive(Clone, Copy, Debug)]
pub struct CollisionResolver {
    pub enabled: bool,
    pub forward_offset: f32,
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self {
            enabled: true,
            forward_offset: AVATAR_FORWARD_OFFSET,
        }
    }
}

impl CollisionResolver {
    /// Query the renderer and push the camera out of any reported contact.
    /// Returns the applied correction, if any.
    pub fn resolve<R: SplatRenderer>(
        &self,
        camera: &mut CameraState,
        handle: &mut RendererHandle<R>,
    ) -> Option<Vec3> {
        if !self.enabled || !handle.supports_collision() {
            return None;
        }
        let capsule = CollisionCapsule::around_camera(camera, self.forward_offset);
        let hit = handle.renderer_mut().intersects_capsule(&capsule)?;
        if !hit.hit {
            return None;
        }
        if !hit.delta.is_finite() {
            log::debug!("[collision] ignoring non-finite delta {:?}", hit.delta);
            return None;
        }
        camera.position += hit.delta;
        Some(hit.delta)
    }
}
