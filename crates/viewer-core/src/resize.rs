//! Keeps camera aspect and render-surface pixel size in step with the host
//! container.
//!
//! Besides reacting to container/window resize notifications, the
//! coordinator re-measures on the first two animation frames after mount:
//! sibling panels collapsing or expanding change the container's size
//! without a resize notification arriving in time.

use crate::constants::DEFERRED_RESIZE_FRAMES;
use glam::Vec2;

/// Host container size in CSS pixels plus the device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainerSize {
    pub width: f32,
    pub height: f32,
    pub device_pixel_ratio: f32,
}

impl ContainerSize {
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    /// Width over height; a collapsed container reports 1.0.
    pub fn aspect(&self) -> f32 {
        if self.width > 0.0 && self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Backing-store size in physical pixels, never smaller than 1×1.
    pub fn surface_size(&self) -> SurfaceSize {
        let dpr = if self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0 {
            self.device_pixel_ratio
        } else {
            1.0
        };
        SurfaceSize {
            width: ((self.width.max(0.0) * dpr) as u32).max(1),
            height: ((self.height.max(0.0) * dpr) as u32).max(1),
        }
    }

    /// Half extents used to turn pointer positions into center offsets.
    pub fn view_half(&self) -> Vec2 {
        Vec2::new(self.width.max(0.0) * 0.5, self.height.max(0.0) * 0.5)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

/// Everything a resize re-derives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeOutcome {
    pub aspect: f32,
    pub surface: SurfaceSize,
    pub view_half: Vec2,
}

impl From<ContainerSize> for ResizeOutcome {
    fn from(size: ContainerSize) -> Self {
        Self {
            aspect: size.aspect(),
            surface: size.surface_size(),
            view_half: size.view_half(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ResizeCoordinator {
    deferred_frames: u8,
}

impl ResizeCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the two deferred post-mount corrections.
    pub fn on_mount(&mut self, size: ContainerSize) -> ResizeOutcome {
        self.deferred_frames = DEFERRED_RESIZE_FRAMES;
        self.on_resize(size)
    }

    pub fn on_resize(&mut self, size: ContainerSize) -> ResizeOutcome {
        log::debug!(
            "[resize] {:.0}x{:.0} @{:.2}",
            size.width,
            size.height,
            size.device_pixel_ratio
        );
        size.into()
    }

    /// True when this animation frame should re-measure the container.
    pub fn take_deferred(&mut self) -> bool {
        if self.deferred_frames > 0 {
            self.deferred_frames -= 1;
            true
        } else {
            false
        }
    }

    pub fn deferred_remaining(&self) -> u8 {
        self.deferred_frames
    }

    pub fn cancel(&mut self) {
        self.deferred_frames = 0;
    }
}
