//! Runtime viewer configuration.
//!
//! Every field has a default, so an empty object (or no config at all)
//! yields the stock viewer. Host pages may serve a JSON document such as:
//!
//! ```json
//! { "movementSpeed": 8, "quality": "high", "avatarUrl": "/assets/drone.glb" }
//! ```

use crate::camera::CameraPose;
use crate::constants::{AVATAR_FORWARD_OFFSET, DEFAULT_LOOK_SPEED, DEFAULT_MOVEMENT_SPEED};
use crate::error::ViewerError;
use crate::quality::{LodParams, QualityProfile};
use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerConfig {
    pub movement_speed: f32,
    pub look_speed: f32,
    pub initial_pose: CameraPose,
    pub forward_offset: f32,
    pub quality: QualityProfile,
    pub lod_baseline: LodParams,
    pub collision: bool,
    pub avatar_url: Option<String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            movement_speed: DEFAULT_MOVEMENT_SPEED,
            look_speed: DEFAULT_LOOK_SPEED,
            initial_pose: CameraPose::default(),
            forward_offset: AVATAR_FORWARD_OFFSET,
            quality: QualityProfile::default(),
            lod_baseline: LodParams::default(),
            collision: true,
            avatar_url: None,
        }
    }
}

impl ViewerConfig {
    pub fn from_json(text: &str) -> Result<Self, ViewerError> {
        let cfg: ViewerConfig = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ViewerError> {
        let positive = |name: &str, v: f32| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(ViewerError::Config(format!("{name} must be a positive number, got {v}")))
            }
        };
        positive("movementSpeed", self.movement_speed)?;
        positive("lookSpeed", self.look_speed)?;
        positive("lodBaseline.maxDistance", self.lod_baseline.max_distance)?;
        if !self.forward_offset.is_finite() || self.forward_offset < 0.0 {
            return Err(ViewerError::Config(format!(
                "forwardOffset must be a non-negative number, got {}",
                self.forward_offset
            )));
        }
        if !self.initial_pose.position.is_finite() {
            return Err(ViewerError::Config("initialPose.position must be finite".into()));
        }
        Ok(())
    }
}
