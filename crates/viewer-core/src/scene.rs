use crate::constants::MAX_FRAME_DELTA_SEC;
use glam::Vec3;
use instant::Instant;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientLight {
    pub color: Vec3,
    pub intensity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    /// Direction the light travels, normalized.
    pub direction: Vec3,
    pub color: Vec3,
    pub intensity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    /// Distance at which the light has faded out completely.
    pub range: f32,
}

/// Ambient + directional + point lights used to shade the avatar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightRig {
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
    pub point: PointLight,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            ambient: AmbientLight {
                color: Vec3::ONE,
                intensity: 0.6,
            },
            directional: DirectionalLight {
                direction: Vec3::new(-0.5, -1.0, -0.3).normalize(),
                color: Vec3::ONE,
                intensity: 0.8,
            },
            point: PointLight {
                position: Vec3::new(0.0, 5.0, 0.0),
                color: Vec3::new(1.0, 0.95, 0.85),
                intensity: 1.0,
                range: 8.0,
            },
        }
    }
}

/// Seconds elapsed between consecutive frames.
#[derive(Debug, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta since the previous tick; 0 on the first tick, capped at
    /// `MAX_FRAME_DELTA_SEC` after long stalls (background tabs).
    pub fn tick(&mut self, now: Instant) -> f32 {
        let dt = match self.last {
            Some(prev) if now > prev => (now - prev).as_secs_f32(),
            _ => 0.0,
        };
        self.last = Some(now);
        dt.min(MAX_FRAME_DELTA_SEC)
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
