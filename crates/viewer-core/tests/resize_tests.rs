mod common;

use common::*;
use glam::Vec2;
use viewer_core::*;

#[test]
fn aspect_and_surface_follow_container() {
    let size = ContainerSize::new(1200.0, 600.0, 2.0);
    assert_eq!(size.aspect(), 2.0);
    assert_eq!(
        size.surface_size(),
        SurfaceSize {
            width: 2400,
            height: 1200
        }
    );
    assert_eq!(size.view_half(), Vec2::new(600.0, 300.0));
}

#[test]
fn collapsed_container_stays_valid() {
    let size = ContainerSize::new(0.0, 0.0, f32::NAN);
    assert_eq!(size.aspect(), 1.0);
    assert_eq!(size.surface_size(), SurfaceSize { width: 1, height: 1 });
}

#[test]
fn mount_arms_two_deferred_corrections() {
    let mut coord = ResizeCoordinator::new();
    coord.on_mount(ContainerSize::new(100.0, 100.0, 1.0));
    assert_eq!(coord.deferred_remaining(), 2);
    assert!(coord.take_deferred());
    assert!(coord.take_deferred());
    assert!(!coord.take_deferred());
}

#[test]
fn cancel_drops_pending_corrections() {
    let mut coord = ResizeCoordinator::new();
    coord.on_mount(ContainerSize::new(100.0, 100.0, 1.0));
    coord.cancel();
    assert!(!coord.take_deferred());
}

#[test]
fn deferred_frames_remeasure_container() {
    let mut viewer = ready_viewer(FakeRenderer::default());
    let mut surface = FakeSurface::new(1000.0, 500.0);
    let mut ticks = Ticks::new(1.0 / 60.0);

    viewer.frame(ticks.next(), &mut surface);
    assert_eq!(surface.measured.get(), 1);
    assert_eq!(viewer.camera().aspect, 2.0);

    surface.size = ContainerSize::new(900.0, 300.0, 1.0);
    viewer.frame(ticks.next(), &mut surface);
    assert_eq!(surface.measured.get(), 2);
    assert_eq!(viewer.camera().aspect, 3.0);

    surface.size = ContainerSize::new(10.0, 10.0, 1.0);
    viewer.frame(ticks.next(), &mut surface);
    assert_eq!(surface.measured.get(), 2);
    assert_eq!(viewer.camera().aspect, 3.0);
}

#[test]
fn resize_event_updates_camera_and_surface() {
    let mut viewer = ready_viewer(FakeRenderer::default());
    let mut surface = FakeSurface::new(800.0, 600.0);
    let mut ticks = Ticks::new(0.016);
    viewer.frame(ticks.next(), &mut surface);
    viewer.frame(ticks.next(), &mut surface);

    viewer.handle_event(&InputEvent::Resize(ContainerSize::new(500.0, 250.0, 2.0)));
    assert_eq!(viewer.camera().aspect, 2.0);
    viewer.frame(ticks.next(), &mut surface);
    assert_eq!(
        surface.resizes.last(),
        Some(&SurfaceSize {
            width: 1000,
            height: 500
        })
    );
}
