mod common;

use common::*;
use glam::Vec3;
use viewer_core::*;

#[test]
fn second_mount_is_refused() {
    let mut viewer: Viewer<FakeRenderer> = Viewer::new(ViewerConfig::default());
    let size = ContainerSize::new(800.0, 600.0, 1.0);
    assert!(viewer.mount(size).is_ok());
    assert_eq!(viewer.mount(size), Err(ViewerError::AlreadyMounted));
    assert!(viewer.is_mounted() && viewer.is_running());
}

#[test]
fn loading_overlay_reports_progress_then_hides() {
    let mut viewer: Viewer<FakeRenderer> = Viewer::new(ViewerConfig::default());
    viewer.mount(ContainerSize::new(800.0, 600.0, 1.0)).expect("mount");
    let req = viewer.begin_renderer_load("scene/data.json", ORIGIN).expect("request");
    assert_eq!(req.url, "https://viewer.example.com/scene/data.json");
    assert!(viewer.overlay().loading);

    let mut labels = Vec::new();
    for p in [0.0, 0.3, 0.8, 1.0] {
        viewer.on_renderer_progress(&req.token, p);
        assert!(viewer.overlay().loading, "hidden early at {p}");
        labels.push(viewer.overlay().progress_text());
    }
    assert_eq!(labels, ["0%", "30%", "80%", "100%"]);

    assert!(viewer.on_renderer_ready(&req.token, FakeRenderer::default()));
    assert!(!viewer.overlay().loading);
    assert_eq!(viewer.overlay().progress_text(), "100%");
}

#[test]
fn key_down_then_up_releases_movement() {
    let mut viewer = ready_viewer(FakeRenderer::default());
    assert!(viewer.handle_event(&key_down("KeyW")));
    assert!(viewer.input().forward);
    assert!(viewer.handle_event(&key_up("KeyW")));
    assert!(!viewer.input().forward);
}

#[test]
fn frames_before_ready_only_resize() {
    let mut viewer: Viewer<FakeRenderer> = Viewer::new(ViewerConfig::default());
    viewer.mount(ContainerSize::new(800.0, 600.0, 1.0)).expect("mount");
    viewer.begin_renderer_load("/data/site.lcc", ORIGIN).expect("request");
    let mut surface = FakeSurface::new(800.0, 600.0);
    assert_eq!(viewer.frame(Ticks::new(0.1).next(), &mut surface), FrameOutcome::Loading);
    assert!(surface.frames.is_empty());
    assert_eq!(surface.resizes.len(), 1);
}

#[test]
fn load_failure_clears_overlay_without_renderer() {
    let mut viewer: Viewer<FakeRenderer> = Viewer::new(ViewerConfig::default());
    viewer.mount(ContainerSize::new(800.0, 600.0, 1.0)).expect("mount");
    let req = viewer.begin_renderer_load("/data/site.lcc", ORIGIN).expect("request");
    viewer.on_renderer_failed(&req.token, "HTTP 404");
    assert!(!viewer.overlay().loading);
    assert!(viewer.renderer_state().is_failed());
    let mut surface = FakeSurface::new(800.0, 600.0);
    assert_eq!(viewer.frame(Ticks::new(0.1).next(), &mut surface), FrameOutcome::Loading);
}

#[test]
fn each_frame_updates_renderer_once() {
    let mut viewer = ready_viewer(FakeRenderer::default());
    let mut surface = FakeSurface::new(800.0, 600.0);
    let mut ticks = Ticks::new(0.1);
    for _ in 0..3 {
        assert_eq!(viewer.frame(ticks.next(), &mut surface), FrameOutcome::Rendered);
    }
    assert_eq!(fake(&viewer).updates, 3);
    assert_eq!(fake(&viewer).synced.len(), 3);
    assert_eq!(surface.frames.len(), 3);
}

#[test]
fn renderer_sees_final_camera() {
    let mut viewer = ready_viewer(FakeRenderer::pushing(Vec3::new(0.0, 0.25, 0.0)));
    let mut surface = FakeSurface::new(800.0, 600.0);
    viewer.frame(Ticks::new(0.1).next(), &mut surface);
    let synced = *fake(&viewer).synced.last().expect("synced");
    assert_eq!(synced, *viewer.camera());
    assert_eq!(surface.frames[0].0, synced);
}

#[test]
fn shortcuts_toggle_info_and_reset_camera() {
    let mut viewer = ready_viewer(FakeRenderer::default());
    let mut surface = FakeSurface::new(800.0, 600.0);
    let mut ticks = Ticks::new(0.5);
    let home = viewer.camera().position;

    assert!(viewer.handle_event(&key_down("KeyC")));
    assert!(viewer.overlay().info_visible);

    viewer.frame(ticks.next(), &mut surface);
    viewer.handle_event(&key_down("KeyS"));
    viewer.handle_event(&InputEvent::Wheel { delta_y: 200.0 });
    viewer.frame(ticks.next(), &mut surface);
    assert_ne!(viewer.camera().position, home);
    let fov = viewer.camera().fov_deg;

    viewer.handle_event(&key_up("KeyS"));
    viewer.handle_event(&key_down("KeyR"));
    assert_eq!(viewer.camera().position, home);
    assert_eq!(viewer.camera().fov_deg, fov);
}

#[test]
fn unbound_keys_are_not_consumed() {
    let mut viewer = ready_viewer(FakeRenderer::default());
    assert!(!viewer.handle_event(&key_down("KeyZ")));
    assert!(viewer.handle_event(&key_down("ArrowLeft")));
    assert!(viewer.input().left);
    assert!(viewer.handle_event(&InputEvent::Wheel { delta_y: 1.0 }));
}

#[test]
fn teardown_stops_frames_and_drops_late_loads() {
    let mut viewer: Viewer<FakeRenderer> = Viewer::new(ViewerConfig::default());
    viewer.mount(ContainerSize::new(800.0, 600.0, 1.0)).expect("mount");
    let req = viewer.begin_renderer_load("/data/site.lcc", ORIGIN).expect("request");
    viewer.handle_event(&key_down("KeyW"));
    viewer.teardown();

    assert!(req.token.is_cancelled());
    assert!(!viewer.on_renderer_ready(&req.token, FakeRenderer::default()));
    assert!(viewer.renderer_state().is_pending());
    assert_eq!(*viewer.input(), InputState::default());
    assert!(!viewer.handle_event(&key_down("KeyW")));

    let mut surface = FakeSurface::new(800.0, 600.0);
    assert_eq!(viewer.frame(Ticks::new(0.1).next(), &mut surface), FrameOutcome::Stopped);
    assert_eq!(surface.measured.get(), 0);
}

#[test]
fn reload_supersedes_previous_request() {
    let mut viewer: Viewer<FakeRenderer> = Viewer::new(ViewerConfig::default());
    viewer.mount(ContainerSize::new(800.0, 600.0, 1.0)).expect("mount");
    let first = viewer.begin_renderer_load("/a.lcc", ORIGIN).expect("first");
    let second = viewer.begin_renderer_load("/b.lcc", ORIGIN).expect("second");
    assert!(first.token.is_cancelled());
    viewer.on_renderer_progress(&first.token, 0.9);
    assert_eq!(viewer.overlay().progress, 0.0);
    assert!(viewer.on_renderer_ready(&second.token, FakeRenderer::default()));
}

#[test]
fn collision_toggle_reflects_capability() {
    let mut viewer = ready_viewer(FakeRenderer::with_collision());
    assert!(viewer.collision_active());
    viewer.set_collision_enabled(false);
    assert!(!viewer.collision_active());
    let without = ready_viewer(FakeRenderer::default());
    assert!(!without.collision_active());
}
