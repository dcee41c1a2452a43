//! Boundary to the external splat/point-cloud engine.

use crate::camera::CameraState;
use crate::collision::{CapsuleHit, CollisionCapsule};

/// Operations the viewer needs from a loaded splat scene.
///
/// The LOD setters must be safe to call repeatedly with the same value.
pub trait SplatRenderer {
    fn set_max_distance(&mut self, distance: f32);
    fn set_max_splats(&mut self, splats: u32);
    fn set_max_node_splats(&mut self, splats: u32);
    /// Queried once, right after load.
    fn has_collision(&self) -> bool;
    fn intersects_capsule(&mut self, capsule: &CollisionCapsule) -> Option<CapsuleHit>;
    /// Hand the final per-frame camera to the engine before `update`.
    fn sync_camera(&mut self, _camera: &CameraState) {}
    /// Advance internal streaming/sorting state; called once per frame
    /// before drawing.
    fn update(&mut self);
}

/// A loaded renderer plus the capabilities negotiated when it arrived.
#[derive(Debug)]
pub struct RendererHandle<R> {
    inner: R,
    collision: bool,
}

impl<R: SplatRenderer> RendererHandle<R> {
    /// Probe capabilities once and cache them for the handle's lifetime.
    pub fn negotiate(inner: R) -> Self {
        let collision = inner.has_collision();
        log::info!("[load] renderer ready, collision={}", collision);
        Self { inner, collision }
    }

    #[inline]
    pub fn supports_collision(&self) -> bool {
        self.collision
    }

    pub fn renderer(&self) -> &R {
        &self.inner
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.inner
    }
}
