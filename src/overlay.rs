use crate::constants::{INFO_OVERLAY_ID, INFO_TEXT_ID, LOADING_OVERLAY_ID, LOADING_TEXT_ID};
use crate::dom;
use viewer_core::{CameraState, OverlayState, QualityProfile};
use web_sys as web;

/// Mirrors viewer overlay state into the page, touching the DOM only when
/// something visible changed.
#[derive(Default)]
pub struct OverlaySync {
    last: Option<OverlayState>,
    last_info: String,
}

impl OverlaySync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(
        &mut self,
        document: &web::Document,
        state: &OverlayState,
        camera: &CameraState,
        quality: QualityProfile,
        collision: bool,
    ) {
        if self.last.as_ref() != Some(state) {
            dom::set_visible(document, LOADING_OVERLAY_ID, state.loading);
            if state.loading {
                dom::set_text(document, LOADING_TEXT_ID, &state.progress_text());
            }
            dom::set_visible(document, INFO_OVERLAY_ID, state.info_visible);
            self.last = Some(state.clone());
        }
        if state.info_visible {
            let text = info_text(camera, quality, collision);
            if text != self.last_info {
                dom::set_text(document, INFO_TEXT_ID, &text);
                self.last_info = text;
            }
        }
    }
}

pub fn info_text(camera: &CameraState, quality: QualityProfile, collision: bool) -> String {
    let p = camera.position;
    format!(
        "Position: ({:.1}, {:.1}, {:.1}) • Yaw {:.0}° Pitch {:.0}° • FOV {:.0}° • Quality: {} • Collision: {}",
        p.x,
        p.y,
        p.z,
        camera.yaw_deg,
        camera.pitch_deg,
        camera.fov_deg,
        quality,
        if collision { "on" } else { "off" }
    )
}
