use glam::Vec3;
use viewer_core::*;

#[test]
fn empty_document_yields_defaults() {
    let cfg = ViewerConfig::from_json("{}").expect("parse");
    assert_eq!(cfg, ViewerConfig::default());
    assert!(cfg.collision);
    assert_eq!(cfg.quality, QualityProfile::Medium);
}

#[test]
fn camel_case_fields_are_read() {
    let cfg = ViewerConfig::from_json(
        r#"{
            "movementSpeed": 8,
            "quality": "very-high",
            "initialPose": { "position": [1, 2, 3], "yawDeg": 90 },
            "lodBaseline": { "maxSplats": 2000000 },
            "collision": false,
            "avatarUrl": "/assets/drone.glb"
        }"#,
    )
    .expect("parse");
    assert_eq!(cfg.movement_speed, 8.0);
    assert_eq!(cfg.quality, QualityProfile::VeryHigh);
    assert_eq!(cfg.initial_pose.position, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(cfg.initial_pose.yaw_deg, 90.0);
    assert_eq!(cfg.initial_pose.pitch_deg, 0.0);
    assert_eq!(cfg.lod_baseline.max_splats, 2_000_000);
    assert_eq!(cfg.lod_baseline.max_distance, LodParams::default().max_distance);
    assert!(!cfg.collision);
    assert_eq!(cfg.avatar_url.as_deref(), Some("/assets/drone.glb"));
}

#[test]
fn invalid_values_are_rejected() {
    for doc in [
        r#"{ "movementSpeed": 0 }"#,
        r#"{ "lookSpeed": -1 }"#,
        r#"{ "forwardOffset": -2 }"#,
        r#"{ "quality": "ultra" }"#,
        "not json",
    ] {
        assert!(
            matches!(ViewerConfig::from_json(doc), Err(ViewerError::Config(_))),
            "{doc}"
        );
    }
}

#[test]
fn viewer_uses_configured_pose_and_speeds() {
    let cfg = ViewerConfig::from_json(
        r#"{ "lookSpeed": 0.2, "initialPose": { "position": [0, 50, 0], "pitchDeg": -120 } }"#,
    )
    .expect("parse");
    let viewer: Viewer<FakeNever> = Viewer::new(cfg);
    let cam = viewer.camera();
    assert_eq!(cam.position, Vec3::new(0.0, 50.0, 0.0));
    assert_eq!(cam.pitch_deg, -85.0);
    assert_eq!(cam.look_speed, 0.2);
}

struct FakeNever;

impl SplatRenderer for FakeNever {
    fn set_max_distance(&mut self, _: f32) {}
    fn set_max_splats(&mut self, _: u32) {}
    fn set_max_node_splats(&mut self, _: u32) {}
    fn has_collision(&self) -> bool {
        false
    }
    fn intersects_capsule(&mut self, _: &CollisionCapsule) -> Option<CapsuleHit> {
        None
    }
    fn update(&mut self) {}
}
