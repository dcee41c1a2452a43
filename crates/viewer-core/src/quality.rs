use crate::constants::{BASE_MAX_DISTANCE, BASE_MAX_NODE_SPLATS, BASE_MAX_SPLATS};
use crate::renderer::{RendererHandle, SplatRenderer};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QualityProfile {
    VeryLow,
    Low,
    #[default]
    Medium,
    High,
    VeryHigh,
}

impl QualityProfile {
    pub const ALL: [QualityProfile; 5] = [
        QualityProfile::VeryLow,
        QualityProfile::Low,
        QualityProfile::Medium,
        QualityProfile::High,
        QualityProfile::VeryHigh,
    ];

    /// `(distance, splats, node_splats)` scale against the medium baseline.
    pub fn scale(self) -> (f32, f32, f32) {
        match self {
            QualityProfile::VeryLow => (0.25, 0.25, 0.25),
            QualityProfile::Low => (0.5, 0.5, 0.5),
            QualityProfile::Medium => (1.0, 1.0, 1.0),
            QualityProfile::High => (2.0, 2.5, 2.5),
            QualityProfile::VeryHigh => (4.0, 5.0, 5.0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QualityProfile::VeryLow => "very-low",
            QualityProfile::Low => "low",
            QualityProfile::Medium => "medium",
            QualityProfile::High => "high",
            QualityProfile::VeryHigh => "very-high",
        }
    }
}

impl fmt::Display for QualityProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QualityProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QualityProfile::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown quality profile `{s}`"))
    }
}

/// Concrete LOD parameters handed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LodParams {
    pub max_distance: f32,
    pub max_splats: u32,
    pub max_node_splats: u32,
}

impl Default for LodParams {
    fn default() -> Self {
        Self {
            max_distance: BASE_MAX_DISTANCE,
            max_splats: BASE_MAX_SPLATS,
            max_node_splats: BASE_MAX_NODE_SPLATS,
        }
    }
}

impl LodParams {
    pub fn for_profile(baseline: &LodParams, profile: QualityProfile) -> Self {
        let (d, s, n) = profile.scale();
        Self {
            max_distance: baseline.max_distance * d,
            max_splats: (baseline.max_splats as f32 * s).round() as u32,
            max_node_splats: (baseline.max_node_splats as f32 * n).round() as u32,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct QualityManager {
    baseline: LodParams,
    profile: QualityProfile,
}

impl QualityManager {
    pub fn new(baseline: LodParams, profile: QualityProfile) -> Self {
        Self { baseline, profile }
    }

    pub fn profile(&self) -> QualityProfile {
        self.profile
    }

    pub fn params(&self) -> LodParams {
        LodParams::for_profile(&self.baseline, self.profile)
    }

    /// Select `profile` and push it to the renderer if one is loaded.
    ///
    /// Without a handle the renderer call is skipped; the selection is kept
    /// and applied when the handle arrives.
    pub fn apply_profile<R: SplatRenderer>(
        &mut self,
        profile: QualityProfile,
        handle: Option<&mut RendererHandle<R>>,
    ) -> Option<LodParams> {
        self.profile = profile;
        let handle = handle?;
        let params = self.params();
        let r = handle.renderer_mut();
        r.set_max_distance(params.max_distance);
        r.set_max_splats(params.max_splats);
        r.set_max_node_splats(params.max_node_splats);
        log::info!(
            "[quality] {} -> distance={} splats={} node_splats={}",
            profile,
            params.max_distance,
            params.max_splats,
            params.max_node_splats
        );
        Some(params)
    }
}
