//! Drone avatar glued to the camera.
//!
//! The avatar sits a fixed distance ahead of the camera along its forward
//! vector and shares its orientation. Node-level keyframe animation (rotor
//! spin, hover bob) is sampled here so the renderer only receives matrices.

use crate::camera::CameraState;
use crate::constants::{AVATAR_FORWARD_OFFSET, HOVER_CLIP_NAME};
use glam::{Mat4, Quat, Vec3};

/// Local transform of one rig node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl NodeTransform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RigNode {
    pub parent: Option<usize>,
    pub rest: NodeTransform,
}

/// Keyframe times (seconds, ascending) and their values.
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframes<T> {
    pub times: Vec<f32>,
    pub values: Vec<T>,
}

pub trait Interpolate: Copy {
    fn interpolate(a: Self, b: Self, t: f32) -> Self;
}

impl Interpolate for Vec3 {
    fn interpolate(a: Self, b: Self, t: f32) -> Self {
        a.lerp(b, t)
    }
}

impl Interpolate for Quat {
    fn interpolate(a: Self, b: Self, t: f32) -> Self {
        a.slerp(b, t)
    }
}

impl<T: Interpolate> Keyframes<T> {
    pub fn new(times: Vec<f32>, values: Vec<T>) -> Self {
        Self { times, values }
    }

    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Linear sample at `time`, holding the first/last value outside the
    /// keyed range.
    pub fn sample(&self, time: f32) -> Option<T> {
        let n = self.times.len().min(self.values.len());
        if n == 0 {
            return None;
        }
        if n == 1 || time <= self.times[0] {
            return Some(self.values[0]);
        }
        if time >= self.times[n - 1] {
            return Some(self.values[n - 1]);
        }
        let next = self.times[..n].partition_point(|&t| t <= time);
        let (i0, i1) = (next - 1, next);
        let span = self.times[i1] - self.times[i0];
        let t = if span > f32::EPSILON {
            (time - self.times[i0]) / span
        } else {
            0.0
        };
        Some(T::interpolate(self.values[i0], self.values[i1], t))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TrackChannel {
    Translation(Keyframes<Vec3>),
    Rotation(Keyframes<Quat>),
    Scale(Keyframes<Vec3>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeTrack {
    pub node: usize,
    pub channel: TrackChannel,
}

impl NodeTrack {
    fn end_time(&self) -> f32 {
        match &self.channel {
            TrackChannel::Translation(k) | TrackChannel::Scale(k) => k.end_time(),
            TrackChannel::Rotation(k) => k.end_time(),
        }
    }

    fn apply(&self, time: f32, target: &mut NodeTransform) {
        match &self.channel {
            TrackChannel::Translation(k) => {
                if let Some(v) = k.sample(time) {
                    target.translation = v;
                }
            }
            TrackChannel::Rotation(k) => {
                if let Some(q) = k.sample(time) {
                    target.rotation = q.normalize();
                }
            }
            TrackChannel::Scale(k) => {
                if let Some(v) = k.sample(time) {
                    target.scale = v;
                }
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    pub tracks: Vec<NodeTrack>,
}

impl AnimationClip {
    pub fn duration(&self) -> f32 {
        self.tracks
            .iter()
            .map(NodeTrack::end_time)
            .fold(0.0, f32::max)
    }
}

/// Pick the clip named `hover` (any case), else the first one.
pub fn select_clip(clips: &[AnimationClip]) -> Option<usize> {
    if clips.is_empty() {
        return None;
    }
    clips
        .iter()
        .position(|c| c.name.eq_ignore_ascii_case(HOVER_CLIP_NAME))
        .or(Some(0))
}

/// Looping playback cursor over one clip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationPlayer {
    pub clip: usize,
    pub time: f32,
    duration: f32,
}

impl AnimationPlayer {
    pub fn new(clip: usize, duration: f32) -> Self {
        Self {
            clip,
            time: 0.0,
            duration,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.time += dt;
        if self.duration > 0.0 {
            self.time %= self.duration;
        }
    }
}

/// Node hierarchy and clips of a loaded avatar asset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AvatarRig {
    pub nodes: Vec<RigNode>,
    pub clips: Vec<AnimationClip>,
}

impl AvatarRig {
    /// Model-space matrix of every node with `clip` sampled at `time`.
    pub fn node_matrices(&self, clip: Option<(&AnimationClip, f32)>) -> Vec<Mat4> {
        let mut locals: Vec<NodeTransform> = self.nodes.iter().map(|n| n.rest).collect();
        if let Some((clip, time)) = clip {
            for track in &clip.tracks {
                if let Some(local) = locals.get_mut(track.node) {
                    track.apply(time, local);
                }
            }
        }
        let mut world: Vec<Option<Mat4>> = vec![None; self.nodes.len()];
        for i in 0..self.nodes.len() {
            self.resolve_world(i, &locals, &mut world, 0);
        }
        world.into_iter().map(|m| m.unwrap_or(Mat4::IDENTITY)).collect()
    }

    fn resolve_world(
        &self,
        i: usize,
        locals: &[NodeTransform],
        world: &mut [Option<Mat4>],
        depth: usize,
    ) -> Mat4 {
        if let Some(m) = world[i] {
            return m;
        }
        let local = locals[i].matrix();
        // A malformed cyclic hierarchy is cut off at the node count.
        let m = match self.nodes[i].parent {
            Some(p) if p < self.nodes.len() && depth < self.nodes.len() => {
                self.resolve_world(p, locals, world, depth + 1) * local
            }
            _ => local,
        };
        world[i] = Some(m);
        m
    }
}

/// Per-frame avatar output consumed by the render surface.
#[derive(Clone, Debug, PartialEq)]
pub struct AvatarPose {
    pub model: Mat4,
    pub nodes: Vec<Mat4>,
    pub visible: bool,
}

#[derive(Clone, Debug)]
pub struct DroneAvatar {
    pub rig: AvatarRig,
    pub player: Option<AnimationPlayer>,
    pub position: Vec3,
    pub orientation: Quat,
    pub visible: bool,
    pub forward_offset: f32,
}

impl DroneAvatar {
    pub fn new(rig: AvatarRig) -> Self {
        let player = select_clip(&rig.clips).map(|i| {
            let clip = &rig.clips[i];
            log::info!(
                "[avatar] playing clip `{}` ({:.2}s, looping)",
                clip.name,
                clip.duration()
            );
            AnimationPlayer::new(i, clip.duration())
        });
        Self {
            rig,
            player,
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            visible: true,
            forward_offset: AVATAR_FORWARD_OFFSET,
        }
    }

    pub fn with_forward_offset(mut self, offset: f32) -> Self {
        self.forward_offset = offset;
        self
    }

    /// Lock the avatar to the camera and advance its clip. Runs whether or
    /// not the avatar is visible.
    pub fn sync(&mut self, camera: &CameraState, dt: f32) {
        self.position = camera.position + camera.forward() * self.forward_offset;
        self.orientation = camera.orientation();
        if let Some(player) = &mut self.player {
            player.advance(dt);
        }
    }

    pub fn toggle_visible(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    pub fn active_clip(&self) -> Option<&AnimationClip> {
        self.player.and_then(|p| self.rig.clips.get(p.clip))
    }

    pub fn pose(&self) -> AvatarPose {
        let clip = self
            .player
            .and_then(|p| self.rig.clips.get(p.clip).map(|c| (c, p.time)));
        AvatarPose {
            model: Mat4::from_rotation_translation(self.orientation, self.position),
            nodes: self.rig.node_matrices(clip),
            visible: self.visible,
        }
    }
}
