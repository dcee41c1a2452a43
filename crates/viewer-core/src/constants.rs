use glam::Vec3;

// Camera and controller tuning shared by the web frontend and host tests.

// Look limits (degrees)
pub const PITCH_LIMIT_DEG: f32 = 85.0;
pub const FOV_MIN_DEG: f32 = 30.0;
pub const FOV_MAX_DEG: f32 = 90.0;
pub const DEFAULT_FOV_DEG: f32 = 60.0;

// Clip planes sized for survey scenes of a few kilometres
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 10_000.0;

// Motion
pub const DEFAULT_MOVEMENT_SPEED: f32 = 5.0; // world units per second at multiplier 1
pub const DEFAULT_LOOK_SPEED: f32 = 0.1; // degrees per pixel-offset per second
pub const SPRINT_MULTIPLIER: f32 = 1.5;
pub const GLIDE_MULTIPLIER: f32 = 0.5;
pub const ZOOM_SPEED: f32 = 0.05; // degrees of FOV per wheel delta unit

// Default pose restored by the reset shortcut
pub const DEFAULT_CAMERA_POSITION: Vec3 = Vec3::new(0.0, 2.0, 10.0);
pub const DEFAULT_CAMERA_YAW_DEG: f32 = 0.0;
pub const DEFAULT_CAMERA_PITCH_DEG: f32 = 0.0;

// Avatar / collision anchor
pub const AVATAR_FORWARD_OFFSET: f32 = 2.0;
pub const COMPANION_LIGHT_OFFSET: Vec3 = Vec3::new(0.0, 1.0, 0.0);
pub const CAPSULE_HEIGHT: f32 = 0.6;
pub const CAPSULE_RADIUS: f32 = 0.5;
pub const HOVER_CLIP_NAME: &str = "hover";

// Medium quality baseline handed to the splat engine
pub const BASE_MAX_DISTANCE: f32 = 100.0;
pub const BASE_MAX_SPLATS: u32 = 1_500_000;
pub const BASE_MAX_NODE_SPLATS: u32 = 100_000;

// Frame clock
pub const MAX_FRAME_DELTA_SEC: f32 = 0.25;

// Number of animation frames after mount that re-run resize handling
pub const DEFERRED_RESIZE_FRAMES: u8 = 2;

// Node matrices the avatar shader can address
pub const MAX_AVATAR_NODES: usize = 64;
