// Drone avatar asset: glTF/GLB bytes to a rig plus one flattened mesh.
//
// Kept free of browser APIs so host tests can include it directly.

use glam::{Quat, Vec3};
use viewer_core::constants::MAX_AVATAR_NODES;
use viewer_core::{AnimationClip, AvatarRig, Keyframes, NodeTrack, NodeTransform, RigNode, TrackChannel};

/// Vertex layout consumed by the avatar pipeline; `node` selects the
/// world matrix the vertex follows.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct AvatarVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
    pub node: u32,
}

#[derive(Clone, Debug, Default)]
pub struct AvatarMesh {
    pub vertices: Vec<AvatarVertex>,
    pub indices: Vec<u32>,
}

#[derive(Clone, Debug)]
pub struct AvatarAsset {
    pub rig: AvatarRig,
    pub mesh: AvatarMesh,
}

pub fn parse_avatar(bytes: &[u8]) -> anyhow::Result<AvatarAsset> {
    let (doc, buffers, _images) = gltf::import_slice(bytes)?;

    let node_count = doc.nodes().len();
    if node_count > MAX_AVATAR_NODES {
        anyhow::bail!(
            "avatar has {} nodes, at most {} are supported",
            node_count,
            MAX_AVATAR_NODES
        );
    }

    let mut parents = vec![None; node_count];
    for node in doc.nodes() {
        for child in node.children() {
            parents[child.index()] = Some(node.index());
        }
    }
    let nodes = doc
        .nodes()
        .map(|node| {
            let (t, r, s) = node.transform().decomposed();
            RigNode {
                parent: parents[node.index()],
                rest: NodeTransform {
                    translation: Vec3::from_array(t),
                    rotation: Quat::from_array(r),
                    scale: Vec3::from_array(s),
                },
            }
        })
        .collect();

    let mut mesh = AvatarMesh::default();
    for node in doc.nodes() {
        let Some(gltf_mesh) = node.mesh() else {
            continue;
        };
        for prim in gltf_mesh.primitives() {
            if prim.mode() != gltf::mesh::Mode::Triangles {
                log::warn!("[avatar] skipping non-triangle primitive on node {}", node.index());
                continue;
            }
            let reader = prim.reader(|b| buffers.get(b.index()).map(|d| &d.0[..]));
            let Some(positions) = reader.read_positions() else {
                continue;
            };
            let positions: Vec<[f32; 3]> = positions.collect();
            let normals: Vec<[f32; 3]> = reader
                .read_normals()
                .map(|n| n.collect())
                .unwrap_or_else(|| vec![[0.0, 1.0, 0.0]; positions.len()]);
            let [r, g, b, _] = prim
                .material()
                .pbr_metallic_roughness()
                .base_color_factor();

            let base = mesh.vertices.len() as u32;
            for (i, p) in positions.iter().enumerate() {
                mesh.vertices.push(AvatarVertex {
                    position: *p,
                    normal: normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                    color: [r, g, b],
                    node: node.index() as u32,
                });
            }
            match reader.read_indices() {
                Some(ix) => mesh.indices.extend(ix.into_u32().map(|i| base + i)),
                None => mesh.indices.extend(base..base + positions.len() as u32),
            }
        }
    }

    let clips = doc
        .animations()
        .map(|anim| read_clip(&anim, &buffers))
        .collect();

    Ok(AvatarAsset {
        rig: AvatarRig { nodes, clips },
        mesh,
    })
}

fn read_clip(anim: &gltf::Animation<'_>, buffers: &[gltf::buffer::Data]) -> AnimationClip {
    use gltf::animation::util::ReadOutputs;
    use gltf::animation::Interpolation;

    let mut tracks = Vec::new();
    for channel in anim.channels() {
        let reader = channel.reader(|b| buffers.get(b.index()).map(|d| &d.0[..]));
        let (Some(inputs), Some(outputs)) = (reader.read_inputs(), reader.read_outputs()) else {
            continue;
        };
        let times: Vec<f32> = inputs.collect();
        // Cubic-spline samplers store in-tangent, value, out-tangent per key.
        let cubic = channel.sampler().interpolation() == Interpolation::CubicSpline;
        let channel_kind = match outputs {
            ReadOutputs::Translations(v) => TrackChannel::Translation(Keyframes::new(
                times,
                key_values(v.map(Vec3::from_array), cubic),
            )),
            ReadOutputs::Rotations(v) => TrackChannel::Rotation(Keyframes::new(
                times,
                key_values(v.into_f32().map(Quat::from_array), cubic),
            )),
            ReadOutputs::Scales(v) => TrackChannel::Scale(Keyframes::new(
                times,
                key_values(v.map(Vec3::from_array), cubic),
            )),
            ReadOutputs::MorphTargetWeights(_) => continue,
        };
        tracks.push(NodeTrack {
            node: channel.target().node().index(),
            channel: channel_kind,
        });
    }
    AnimationClip {
        name: anim.name().unwrap_or_default().to_string(),
        tracks,
    }
}

fn key_values<T>(values: impl Iterator<Item = T>, cubic: bool) -> Vec<T> {
    if cubic {
        values.skip(1).step_by(3).collect()
    } else {
        values.collect()
    }
}
