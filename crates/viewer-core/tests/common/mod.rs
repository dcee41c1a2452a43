// Shared fakes for the viewer-core integration tests.

#![allow(dead_code)]

use std::cell::Cell;
use std::time::Duration;

use glam::Vec3;
use instant::Instant;
use viewer_core::*;

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    MaxDistance(f32),
    MaxSplats(u32),
    MaxNodeSplats(u32),
}

/// Splat engine stand-in that records what the viewer asks of it.
#[derive(Debug, Default)]
pub struct FakeRenderer {
    pub collision: bool,
    pub hit: Option<CapsuleHit>,
    pub calls: Vec<Call>,
    pub capsules: Vec<CollisionCapsule>,
    pub synced: Vec<CameraState>,
    pub updates: u32,
}

impl FakeRenderer {
    pub fn with_collision() -> Self {
        Self {
            collision: true,
            ..Self::default()
        }
    }

    pub fn pushing(delta: Vec3) -> Self {
        Self {
            collision: true,
            hit: Some(CapsuleHit { hit: true, delta }),
            ..Self::default()
        }
    }
}

impl SplatRenderer for FakeRenderer {
    fn set_max_distance(&mut self, distance: f32) {
        self.calls.push(Call::MaxDistance(distance));
    }

    fn set_max_splats(&mut self, splats: u32) {
        self.calls.push(Call::MaxSplats(splats));
    }

    fn set_max_node_splats(&mut self, splats: u32) {
        self.calls.push(Call::MaxNodeSplats(splats));
    }

    fn has_collision(&self) -> bool {
        self.collision
    }

    fn intersects_capsule(&mut self, capsule: &CollisionCapsule) -> Option<CapsuleHit> {
        self.capsules.push(*capsule);
        self.hit
    }

    fn sync_camera(&mut self, camera: &CameraState) {
        self.synced.push(*camera);
    }

    fn update(&mut self) {
        self.updates += 1;
    }
}

/// Render surface that records resizes and drawn frames.
#[derive(Debug)]
pub struct FakeSurface {
    pub size: ContainerSize,
    pub measured: Cell<u32>,
    pub resizes: Vec<SurfaceSize>,
    pub frames: Vec<(CameraState, Option<AvatarPose>)>,
}

impl FakeSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: ContainerSize::new(width, height, 1.0),
            measured: Cell::new(0),
            resizes: Vec::new(),
            frames: Vec::new(),
        }
    }
}

impl RenderSurface for FakeSurface {
    fn container_size(&self) -> ContainerSize {
        self.measured.set(self.measured.get() + 1);
        self.size
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.resizes.push(size);
    }

    fn draw(&mut self, frame: &FrameSnapshot<'_>) {
        self.frames.push((*frame.camera, frame.avatar.clone()));
    }
}

/// Frame timestamps spaced `step` seconds apart.
pub struct Ticks {
    now: Instant,
    step: Duration,
}

impl Ticks {
    pub fn new(step_sec: f32) -> Self {
        Self {
            now: Instant::now(),
            step: Duration::from_secs_f32(step_sec),
        }
    }

    pub fn next(&mut self) -> Instant {
        let t = self.now;
        self.now += self.step;
        t
    }
}

pub const ORIGIN: &str = "https://viewer.example.com";

/// Mounted viewer with a ready renderer.
pub fn ready_viewer(renderer: FakeRenderer) -> Viewer<FakeRenderer> {
    let mut viewer = Viewer::new(ViewerConfig::default());
    viewer
        .mount(ContainerSize::new(800.0, 600.0, 1.0))
        .expect("first mount");
    let req = viewer
        .begin_renderer_load("/data/site.lcc", ORIGIN)
        .expect("load request");
    assert!(viewer.on_renderer_ready(&req.token, renderer));
    viewer
}

pub fn fake(viewer: &Viewer<FakeRenderer>) -> &FakeRenderer {
    viewer
        .renderer_state()
        .ready()
        .expect("renderer ready")
        .renderer()
}

pub fn key_down(code: &str) -> InputEvent {
    InputEvent::KeyDown { code: code.into() }
}

pub fn key_up(code: &str) -> InputEvent {
    InputEvent::KeyUp { code: code.into() }
}

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

pub fn approx_vec(a: Vec3, b: Vec3) -> bool {
    a.abs_diff_eq(b, 1e-4)
}
