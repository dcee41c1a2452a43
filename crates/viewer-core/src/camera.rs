//! First-person camera state.
//!
//! Orientation is stored as yaw/pitch in degrees and re-derived every frame
//! into a forward vector and a look target one unit ahead. The camera always
//! orients toward that target with world-up, so it never accumulates roll.

use crate::constants::*;
use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::Deserialize;

/// Position and look angles the camera starts at and returns to on reset.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraPose {
    pub position: Vec3,
    pub yaw_deg: f32,
    pub pitch_deg: f32,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: DEFAULT_CAMERA_POSITION,
            yaw_deg: DEFAULT_CAMERA_YAW_DEG,
            pitch_deg: DEFAULT_CAMERA_PITCH_DEG,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    pub yaw_deg: f32,
    pub pitch_deg: f32,
    pub fov_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub movement_speed: f32,
    pub look_speed: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self::from_pose(&CameraPose::default())
    }
}

impl CameraState {
    pub fn from_pose(pose: &CameraPose) -> Self {
        let mut cam = Self {
            position: pose.position,
            yaw_deg: 0.0,
            pitch_deg: 0.0,
            fov_deg: DEFAULT_FOV_DEG,
            aspect: 16.0 / 9.0,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            movement_speed: DEFAULT_MOVEMENT_SPEED,
            look_speed: DEFAULT_LOOK_SPEED,
        };
        cam.reset_to(pose);
        cam
    }

    /// Move back to `pose`; FOV, speeds and clip planes are kept.
    pub fn reset_to(&mut self, pose: &CameraPose) {
        self.position = pose.position;
        self.yaw_deg = pose.yaw_deg;
        self.pitch_deg = clamp_pitch(pose.pitch_deg);
    }

    /// Rotation with no roll: yaw about world Y, then pitch about local X.
    pub fn orientation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.yaw_deg.to_radians(),
            self.pitch_deg.to_radians(),
            0.0,
        )
    }

    /// Unit view direction (local −Z).
    pub fn forward(&self) -> Vec3 {
        forward_from_angles(self.yaw_deg, self.pitch_deg)
    }

    pub fn look_target(&self) -> Vec3 {
        self.position + self.forward()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.look_target(), Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[inline]
pub fn clamp_pitch(pitch_deg: f32) -> f32 {
    pitch_deg.clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG)
}

#[inline]
pub fn clamp_fov(fov_deg: f32) -> f32 {
    fov_deg.clamp(FOV_MIN_DEG, FOV_MAX_DEG)
}

/// Spherical-to-cartesian conversion for yaw/pitch in degrees.
///
/// Yaw 0 / pitch 0 looks down −Z; positive yaw turns left, positive pitch
/// looks up.
#[inline]
pub fn forward_from_angles(yaw_deg: f32, pitch_deg: f32) -> Vec3 {
    let (sy, cy) = yaw_deg.to_radians().sin_cos();
    let (sp, cp) = pitch_deg.to_radians().sin_cos();
    Vec3::new(-sy * cp, sp, -cy * cp)
}
