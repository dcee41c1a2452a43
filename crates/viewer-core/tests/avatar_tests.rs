mod common;

use common::*;
use glam::{Mat4, Quat, Vec3};
use viewer_core::constants::*;
use viewer_core::*;

fn clip(name: &str, node: usize, end: f32) -> AnimationClip {
    AnimationClip {
        name: name.into(),
        tracks: vec![NodeTrack {
            node,
            channel: TrackChannel::Translation(Keyframes::new(
                vec![0.0, end],
                vec![Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0)],
            )),
        }],
    }
}

fn two_node_rig(clips: Vec<AnimationClip>) -> AvatarRig {
    AvatarRig {
        nodes: vec![
            RigNode {
                parent: None,
                rest: NodeTransform {
                    translation: Vec3::new(1.0, 0.0, 0.0),
                    ..NodeTransform::default()
                },
            },
            RigNode {
                parent: Some(0),
                rest: NodeTransform::default(),
            },
        ],
        clips,
    }
}

#[test]
fn keyframes_interpolate_and_hold_ends() {
    let k = Keyframes::new(vec![1.0, 3.0], vec![Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0)]);
    assert_eq!(k.sample(0.0), Some(Vec3::ZERO));
    assert!(approx_vec(k.sample(2.0).expect("sample"), Vec3::new(2.0, 0.0, 0.0)));
    assert_eq!(k.sample(10.0), Some(Vec3::new(4.0, 0.0, 0.0)));
    assert_eq!(k.end_time(), 3.0);
    assert_eq!(Keyframes::<Vec3>::new(vec![], vec![]).sample(1.0), None);
}

#[test]
fn rotation_keyframes_slerp() {
    let k = Keyframes::new(
        vec![0.0, 1.0],
        vec![Quat::IDENTITY, Quat::from_rotation_y(std::f32::consts::PI)],
    );
    let half = k.sample(0.5).expect("sample");
    assert!(half.abs_diff_eq(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2), 1e-4));
}

#[test]
fn hover_clip_is_preferred() {
    let clips = vec![clip("spin", 0, 1.0), clip("Hover", 0, 2.0)];
    assert_eq!(select_clip(&clips), Some(1));
}

#[test]
fn first_clip_is_fallback() {
    let clips = vec![clip("spin", 0, 1.0), clip("bank", 0, 2.0)];
    assert_eq!(select_clip(&clips), Some(0));
    assert_eq!(select_clip(&[]), None);
}

#[test]
fn player_loops_over_duration() {
    let mut p = AnimationPlayer::new(0, 2.0);
    p.advance(2.5);
    assert!(approx(p.time, 0.5));
    p.advance(f32::NAN);
    assert!(approx(p.time, 0.5));
}

#[test]
fn node_matrices_compose_parents() {
    let rig = two_node_rig(vec![clip("hover", 1, 1.0)]);
    let rest = rig.node_matrices(None);
    assert_eq!(rest[1], Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0)));

    let animated = rig.node_matrices(Some((&rig.clips[0], 1.0)));
    let origin = animated[1].transform_point3(Vec3::ZERO);
    assert!(approx_vec(origin, Vec3::new(1.0, 1.0, 0.0)));
}

#[test]
fn cyclic_hierarchy_does_not_hang() {
    let rig = AvatarRig {
        nodes: vec![
            RigNode {
                parent: Some(1),
                rest: NodeTransform::default(),
            },
            RigNode {
                parent: Some(0),
                rest: NodeTransform::default(),
            },
        ],
        clips: vec![],
    };
    assert_eq!(rig.node_matrices(None).len(), 2);
}

#[test]
fn avatar_tracks_camera_forward() {
    let mut avatar = DroneAvatar::new(two_node_rig(vec![]));
    let mut cam = CameraState::default();
    cam.yaw_deg = 45.0;
    cam.pitch_deg = 10.0;
    avatar.sync(&cam, 0.016);
    assert!(approx_vec(avatar.position, cam.position + cam.forward() * AVATAR_FORWARD_OFFSET));
    assert!(avatar.orientation.abs_diff_eq(cam.orientation(), 1e-5));
    assert!(avatar.active_clip().is_none());
}

#[test]
fn hidden_avatar_keeps_following() {
    let mut avatar = DroneAvatar::new(two_node_rig(vec![clip("hover", 1, 1.0)]));
    assert!(!avatar.toggle_visible());
    let mut cam = CameraState::default();
    cam.position = Vec3::new(5.0, 5.0, 5.0);
    avatar.sync(&cam, 0.25);
    let pose = avatar.pose();
    assert!(!pose.visible);
    assert!(approx_vec(pose.model.transform_point3(Vec3::ZERO), avatar.position));
    assert!(approx(avatar.player.expect("player").time, 0.25));
}

#[test]
fn viewer_places_avatar_and_companion_light() {
    let mut viewer = ready_viewer(FakeRenderer::default());
    let mut config = ViewerConfig::default();
    config.avatar_url = Some("/assets/drone.glb".into());
    let mut viewer_with_avatar: Viewer<FakeRenderer> = Viewer::new(config);
    assert!(viewer.begin_avatar_load().is_none());

    viewer_with_avatar
        .mount(ContainerSize::new(800.0, 600.0, 1.0))
        .expect("mount");
    let req = viewer_with_avatar
        .begin_renderer_load("/scene.lcc", ORIGIN)
        .expect("request");
    viewer_with_avatar.on_renderer_ready(&req.token, FakeRenderer::default());
    let (url, token) = viewer_with_avatar.begin_avatar_load().expect("avatar configured");
    assert_eq!(url, "/assets/drone.glb");
    assert!(viewer_with_avatar.on_avatar_ready(&token, two_node_rig(vec![clip("hover", 1, 1.0)])));

    let mut surface = FakeSurface::new(800.0, 600.0);
    let mut ticks = Ticks::new(0.1);
    viewer_with_avatar.frame(ticks.next(), &mut surface);
    let avatar = viewer_with_avatar.avatar().expect("avatar");
    let cam = *viewer_with_avatar.camera();
    assert!(approx_vec(avatar.position, cam.position + cam.forward() * AVATAR_FORWARD_OFFSET));
    assert!(approx_vec(
        viewer_with_avatar.lights().point.position,
        avatar.position + COMPANION_LIGHT_OFFSET
    ));
    let (_, pose) = surface.frames.last().expect("drawn");
    assert!(pose.as_ref().is_some_and(|p| p.visible && p.nodes.len() == 2));

    assert_eq!(viewer_with_avatar.toggle_avatar(), Some(false));
    assert_eq!(viewer.toggle_avatar(), None);
}

#[test]
fn avatar_failure_is_not_fatal() {
    let mut config = ViewerConfig::default();
    config.avatar_url = Some("/missing.glb".into());
    let mut viewer: Viewer<FakeRenderer> = Viewer::new(config);
    viewer.mount(ContainerSize::new(800.0, 600.0, 1.0)).expect("mount");
    let req = viewer.begin_renderer_load("/scene.lcc", ORIGIN).expect("request");
    viewer.on_renderer_ready(&req.token, FakeRenderer::default());
    let (_, token) = viewer.begin_avatar_load().expect("configured");
    viewer.on_avatar_failed(&token, "404");

    let mut surface = FakeSurface::new(800.0, 600.0);
    assert_eq!(viewer.frame(Ticks::new(0.1).next(), &mut surface), FrameOutcome::Rendered);
    assert!(viewer.avatar().is_none());
    assert!(surface.frames[0].1.is_none());
}
