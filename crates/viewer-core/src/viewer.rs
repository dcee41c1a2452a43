//! The viewer: owns every piece of per-mount state and runs the frame
//! pipeline in its fixed order.
//!
//! controller → collision → avatar sync → renderer update → draw
//!
//! Collision needs the post-input camera and the avatar needs the
//! post-collision camera, so the order must not change.

use crate::avatar::{AvatarPose, AvatarRig, DroneAvatar};
use crate::camera::CameraState;
use crate::collision::CollisionResolver;
use crate::config::ViewerConfig;
use crate::constants::COMPANION_LIGHT_OFFSET;
use crate::controller::{apply_zoom, FirstPersonController};
use crate::error::{LoadError, ViewerError};
use crate::input::{InputEvent, InputState, Shortcut};
use crate::loading::{progress_label, resolve_data_url, CancelToken, LoadState};
use crate::quality::{LodParams, QualityManager, QualityProfile};
use crate::renderer::{RendererHandle, SplatRenderer};
use crate::resize::{ContainerSize, ResizeCoordinator, ResizeOutcome, SurfaceSize};
use crate::scene::{FrameClock, LightRig};
use instant::Instant;

/// Everything the surface needs to draw one frame.
#[derive(Debug)]
pub struct FrameSnapshot<'a> {
    pub camera: &'a CameraState,
    pub lights: &'a LightRig,
    pub avatar: Option<AvatarPose>,
}

/// Host drawing surface (canvas + GPU context on the web).
pub trait RenderSurface {
    /// Current container size, re-measured on demand.
    fn container_size(&self) -> ContainerSize;
    fn resize(&mut self, size: SurfaceSize);
    fn draw(&mut self, frame: &FrameSnapshot<'_>);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Renderer not ready yet; only resize work ran.
    Loading,
    Rendered,
    /// Torn down; the host loop should stop scheduling frames.
    Stopped,
}

/// UI-facing state mirrored into the page overlays.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayState {
    pub loading: bool,
    pub progress: f32,
    pub info_visible: bool,
}

impl OverlayState {
    pub fn progress_text(&self) -> String {
        progress_label(self.progress)
    }
}

/// Async renderer load kicked off by the host.
#[derive(Clone, Debug)]
pub struct LoadRequest {
    pub url: String,
    pub token: CancelToken,
}

pub struct Viewer<R> {
    config: ViewerConfig,
    mounted: bool,
    running: bool,
    camera: CameraState,
    input: InputState,
    controller: FirstPersonController,
    collision: CollisionResolver,
    quality: QualityManager,
    resize: ResizeCoordinator,
    lights: LightRig,
    clock: FrameClock,
    renderer: LoadState<RendererHandle<R>>,
    renderer_token: Option<CancelToken>,
    avatar: Option<LoadState<DroneAvatar>>,
    avatar_token: Option<CancelToken>,
    overlay: OverlayState,
    pending_surface: Option<SurfaceSize>,
}

impl<R: SplatRenderer> Viewer<R> {
    pub fn new(config: ViewerConfig) -> Self {
        let mut camera = CameraState::from_pose(&config.initial_pose);
        camera.movement_speed = config.movement_speed;
        camera.look_speed = config.look_speed;
        let collision = CollisionResolver {
            enabled: config.collision,
            forward_offset: config.forward_offset,
        };
        let quality = QualityManager::new(config.lod_baseline, config.quality);
        Self {
            config,
            mounted: false,
            running: false,
            camera,
            input: InputState::default(),
            controller: FirstPersonController::new(),
            collision,
            quality,
            resize: ResizeCoordinator::new(),
            lights: LightRig::default(),
            clock: FrameClock::new(),
            renderer: LoadState::default(),
            renderer_token: None,
            avatar: None,
            avatar_token: None,
            overlay: OverlayState {
                loading: false,
                progress: 0.0,
                info_visible: false,
            },
            pending_surface: None,
        }
    }

    /// One-time setup against the host container. A second call is refused
    /// and leaves the viewer untouched.
    pub fn mount(&mut self, container: ContainerSize) -> Result<(), ViewerError> {
        if self.mounted {
            log::warn!("[mount] ignoring duplicate mount");
            return Err(ViewerError::AlreadyMounted);
        }
        self.mounted = true;
        self.running = true;
        let outcome = self.resize.on_mount(container);
        self.apply_resize(outcome);
        log::info!(
            "[mount] container {:.0}x{:.0}, aspect {:.3}",
            container.width,
            container.height,
            outcome.aspect
        );
        Ok(())
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    // ---------------- renderer load ----------------

    pub fn begin_renderer_load(
        &mut self,
        data_url: &str,
        origin: &str,
    ) -> Result<LoadRequest, ViewerError> {
        let url = resolve_data_url(data_url, origin)?;
        if let Some(old) = self.renderer_token.take() {
            old.cancel();
        }
        let token = CancelToken::new();
        self.renderer = LoadState::default();
        self.renderer_token = Some(token.clone());
        self.overlay.loading = true;
        self.overlay.progress = 0.0;
        log::info!("[load] scene data {}", url);
        Ok(LoadRequest { url, token })
    }

    fn is_current(current: &Option<CancelToken>, token: &CancelToken) -> bool {
        !token.is_cancelled() && current.as_ref().is_some_and(|t| t.same_load(token))
    }

    pub fn on_renderer_progress(&mut self, token: &CancelToken, progress: f32) {
        if !Self::is_current(&self.renderer_token, token) {
            return;
        }
        if self.renderer.report_progress(progress) {
            self.overlay.progress = progress;
        }
    }

    /// Returns false when the load was cancelled or superseded.
    pub fn on_renderer_ready(&mut self, token: &CancelToken, renderer: R) -> bool {
        if !Self::is_current(&self.renderer_token, token) {
            log::debug!("[load] dropping renderer from a cancelled load");
            return false;
        }
        if !self.renderer.resolve(RendererHandle::negotiate(renderer)) {
            return false;
        }
        self.overlay.progress = 1.0;
        self.overlay.loading = false;
        let profile = self.quality.profile();
        self.quality.apply_profile(profile, self.renderer.ready_mut());
        true
    }

    /// Failure only clears the loading flag; the message is logged.
    pub fn on_renderer_failed(&mut self, token: &CancelToken, message: &str) {
        if !Self::is_current(&self.renderer_token, token) {
            return;
        }
        log::error!("[load] scene data failed: {}", message);
        if self.renderer.fail(LoadError::Renderer(message.to_string())) {
            self.overlay.loading = false;
        }
    }

    pub fn renderer_state(&self) -> &LoadState<RendererHandle<R>> {
        &self.renderer
    }

    // ---------------- avatar load ----------------

    /// Start the avatar load if one is configured; returns its URL and token.
    pub fn begin_avatar_load(&mut self) -> Option<(String, CancelToken)> {
        let url = self.config.avatar_url.clone()?;
        if let Some(old) = self.avatar_token.take() {
            old.cancel();
        }
        let token = CancelToken::new();
        self.avatar = Some(LoadState::default());
        self.avatar_token = Some(token.clone());
        log::info!("[avatar] loading {}", url);
        Some((url, token))
    }

    pub fn on_avatar_ready(&mut self, token: &CancelToken, rig: AvatarRig) -> bool {
        if !Self::is_current(&self.avatar_token, token) {
            return false;
        }
        let mut avatar = DroneAvatar::new(rig).with_forward_offset(self.config.forward_offset);
        avatar.sync(&self.camera, 0.0);
        match &mut self.avatar {
            Some(state) => state.resolve(avatar),
            None => false,
        }
    }

    /// Non-fatal: the avatar stays absent for this session.
    pub fn on_avatar_failed(&mut self, token: &CancelToken, message: &str) {
        if !Self::is_current(&self.avatar_token, token) {
            return;
        }
        log::error!("[avatar] load failed: {}", message);
        if let Some(state) = &mut self.avatar {
            state.fail(LoadError::Avatar(message.to_string()));
        }
    }

    pub fn avatar(&self) -> Option<&DroneAvatar> {
        self.avatar.as_ref().and_then(LoadState::ready)
    }

    // ---------------- input & UI ----------------

    /// Route one input event. Returns true when the event belongs to the
    /// viewer and the host should suppress its default action.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        if !self.running {
            return false;
        }
        match event {
            InputEvent::Wheel { delta_y } => {
                apply_zoom(&mut self.camera, *delta_y, self.controller.zoom_speed);
                true
            }
            InputEvent::Resize(size) => {
                let outcome = self.resize.on_resize(*size);
                self.apply_resize(outcome);
                false
            }
            InputEvent::KeyDown { code } => {
                if let Some(shortcut) = self.controller.bindings.shortcut(code) {
                    self.run_shortcut(shortcut);
                }
                self.controller.handle_event(&mut self.input, event);
                self.controller.bindings.is_bound(code)
            }
            InputEvent::KeyUp { code } => {
                self.controller.handle_event(&mut self.input, event);
                self.controller.bindings.is_bound(code)
            }
            _ => {
                self.controller.handle_event(&mut self.input, event);
                false
            }
        }
    }

    pub fn run_shortcut(&mut self, shortcut: Shortcut) {
        match shortcut {
            Shortcut::ToggleAvatar => {
                self.toggle_avatar();
            }
            Shortcut::ToggleInfo => {
                self.toggle_info();
            }
            Shortcut::ResetCamera => self.reset_camera(),
        }
    }

    /// Flip avatar visibility; `None` while no avatar is loaded.
    pub fn toggle_avatar(&mut self) -> Option<bool> {
        let avatar = self.avatar.as_mut().and_then(LoadState::ready_mut)?;
        let visible = avatar.toggle_visible();
        log::info!("[avatar] visible={}", visible);
        Some(visible)
    }

    pub fn toggle_info(&mut self) -> bool {
        self.overlay.info_visible = !self.overlay.info_visible;
        self.overlay.info_visible
    }

    pub fn reset_camera(&mut self) {
        let pose = self.config.initial_pose;
        self.camera.reset_to(&pose);
        log::info!("[camera] reset to {:?}", pose.position);
    }

    pub fn set_quality(&mut self, profile: QualityProfile) -> Option<LodParams> {
        self.quality.apply_profile(profile, self.renderer.ready_mut())
    }

    pub fn quality(&self) -> QualityProfile {
        self.quality.profile()
    }

    pub fn set_collision_enabled(&mut self, enabled: bool) {
        self.collision.enabled = enabled;
    }

    pub fn collision_active(&self) -> bool {
        self.collision.enabled
            && self
                .renderer
                .ready()
                .is_some_and(RendererHandle::supports_collision)
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    pub fn overlay(&self) -> &OverlayState {
        &self.overlay
    }

    fn apply_resize(&mut self, outcome: ResizeOutcome) {
        self.camera.aspect = outcome.aspect;
        self.controller.set_view_half(outcome.view_half);
        self.pending_surface = Some(outcome.surface);
    }

    // ---------------- frame ----------------

    pub fn frame<S: RenderSurface>(&mut self, now: Instant, surface: &mut S) -> FrameOutcome {
        if !self.running {
            return FrameOutcome::Stopped;
        }
        let dt = self.clock.tick(now);

        if self.resize.take_deferred() {
            let outcome = self.resize.on_resize(surface.container_size());
            self.apply_resize(outcome);
        }
        if let Some(size) = self.pending_surface.take() {
            surface.resize(size);
        }

        let Some(handle) = self.renderer.ready_mut() else {
            return FrameOutcome::Loading;
        };

        self.camera = self.controller.update(&self.camera, &self.input, dt);
        self.collision.resolve(&mut self.camera, handle);

        let pose = match self.avatar.as_mut().and_then(LoadState::ready_mut) {
            Some(avatar) => {
                avatar.sync(&self.camera, dt);
                self.lights.point.position = avatar.position + COMPANION_LIGHT_OFFSET;
                Some(avatar.pose())
            }
            None => None,
        };

        let renderer = handle.renderer_mut();
        renderer.sync_camera(&self.camera);
        renderer.update();

        surface.draw(&FrameSnapshot {
            camera: &self.camera,
            lights: &self.lights,
            avatar: pose,
        });
        FrameOutcome::Rendered
    }

    /// Stop the frame pipeline, cancel in-flight loads and drop held input.
    pub fn teardown(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        if let Some(t) = &self.renderer_token {
            t.cancel();
        }
        if let Some(t) = &self.avatar_token {
            t.cancel();
        }
        self.resize.cancel();
        self.input.release_all();
        self.clock.reset();
        log::info!("[mount] viewer torn down");
    }
}
