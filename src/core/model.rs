// CPU-side model geometry extracted from a binary glTF (GLB) asset.
//
// Parsing itself is left to the `gltf` crate; this module only flattens the
// node hierarchy into world-space triangle lists the renderer can upload.

use glam::{Mat3, Mat4, Vec3};
use gltf::buffer::Source;
use gltf::mesh::Mode;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("invalid glTF: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("buffer {index} references external data `{uri}`")]
    ExternalBuffer { index: usize, uri: String },
    #[error("GLB is missing its binary chunk")]
    MissingBlob,
    #[error("model contains no triangle geometry")]
    Empty,
}

#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    pub base_color: [f32; 4],
}

impl MeshData {
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[derive(Clone, Debug, Default)]
pub struct Model {
    pub meshes: Vec<MeshData>,
}

impl Model {
    pub fn from_glb(bytes: &[u8]) -> Result<Self, ModelError> {
        let gltf = gltf::Gltf::from_slice(bytes)?;
        for buffer in gltf.buffers() {
            match buffer.source() {
                Source::Bin if gltf.blob.is_none() => return Err(ModelError::MissingBlob),
                Source::Bin => {}
                Source::Uri(uri) => {
                    return Err(ModelError::ExternalBuffer {
                        index: buffer.index(),
                        uri: uri.to_string(),
                    })
                }
            }
        }
        let blob = gltf.blob.as_deref();

        let mut meshes = Vec::new();
        match gltf.default_scene().or_else(|| gltf.scenes().next()) {
            Some(scene) => {
                for node in scene.nodes() {
                    collect_node(&node, Mat4::IDENTITY, blob, &mut meshes);
                }
            }
            None => {
                for mesh in gltf.meshes() {
                    push_mesh(&mesh, Mat4::IDENTITY, blob, &mut meshes);
                }
            }
        }

        if meshes.is_empty() {
            return Err(ModelError::Empty);
        }
        Ok(Self { meshes })
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(MeshData::triangle_count).sum()
    }

    /// Axis-aligned bounds over every vertex, `None` for an empty model.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut it = self
            .meshes
            .iter()
            .flat_map(|m| m.positions.iter())
            .map(|p| Vec3::from(*p));
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}

fn collect_node(node: &gltf::Node<'_>, parent: Mat4, blob: Option<&[u8]>, out: &mut Vec<MeshData>) {
    let local = Mat4::from_cols_array_2d(&node.transform().matrix());
    let world = parent * local;
    if let Some(mesh) = node.mesh() {
        push_mesh(&mesh, world, blob, out);
    }
    for child in node.children() {
        collect_node(&child, world, blob, out);
    }
}

fn push_mesh(mesh: &gltf::Mesh<'_>, world: Mat4, blob: Option<&[u8]>, out: &mut Vec<MeshData>) {
    let normal_matrix = {
        let m = Mat3::from_mat4(world);
        if m.determinant().abs() > f32::EPSILON {
            m.inverse().transpose()
        } else {
            Mat3::IDENTITY
        }
    };

    for primitive in mesh.primitives() {
        if primitive.mode() != Mode::Triangles {
            log::warn!(
                "skipping mesh {} primitive {}: mode {:?}",
                mesh.index(),
                primitive.index(),
                primitive.mode()
            );
            continue;
        }
        let reader = primitive.reader(|buffer| match buffer.source() {
            Source::Bin => blob,
            Source::Uri(_) => None,
        });
        let Some(positions) = reader.read_positions() else {
            continue;
        };
        let positions: Vec<[f32; 3]> = positions
            .map(|p| world.transform_point3(Vec3::from(p)).to_array())
            .collect();
        if positions.is_empty() {
            continue;
        }
        let indices: Vec<u32> = match reader.read_indices() {
            Some(ix) => ix.into_u32().collect(),
            None => (0..positions.len() as u32).collect(),
        };
        let normals: Vec<[f32; 3]> = match reader.read_normals() {
            Some(ns) => ns
                .map(|n| (normal_matrix * Vec3::from(n)).normalize_or_zero().to_array())
                .collect(),
            None => vertex_normals(&positions, &indices),
        };
        let base_color = primitive
            .material()
            .pbr_metallic_roughness()
            .base_color_factor();

        out.push(MeshData {
            positions,
            normals,
            indices,
            base_color,
        });
    }
}

/// Area-weighted vertex normals for geometry that ships without them.
pub fn vertex_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut acc = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let pa = Vec3::from(positions[a]);
        let face = (Vec3::from(positions[b]) - pa).cross(Vec3::from(positions[c]) - pa);
        acc[a] += face;
        acc[b] += face;
        acc[c] += face;
    }
    acc.into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
        .collect()
}
