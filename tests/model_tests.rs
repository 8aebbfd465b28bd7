// Host-side tests for GLB geometry extraction.

#![allow(dead_code)]
mod model {
    include!("../src/core/model.rs");
}

use model::*;

/// Assemble a GLB container from a JSON document and a binary chunk.
fn glb(json: &str, bin: &[u8]) -> Vec<u8> {
    let mut json = json.as_bytes().to_vec();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    let mut bin = bin.to_vec();
    while bin.len() % 4 != 0 {
        bin.push(0);
    }
    let total = 12 + 8 + json.len() + 8 + bin.len();

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(b"JSON");
    out.extend_from_slice(&json);
    out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    out.extend_from_slice(b"BIN\0");
    out.extend_from_slice(&bin);
    out
}

/// Same layout as `glb`, but without the binary chunk.
fn glb_json_only(json: &str) -> Vec<u8> {
    let mut json = json.as_bytes().to_vec();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    let total = 12 + 8 + json.len();

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(b"JSON");
    out.extend_from_slice(&json);
    out
}

/// A lone unindexed triangle whose buffer is described by `buffer`.
fn unindexed_triangle_json(buffer: &str) -> String {
    format!(
        r#"{{
        "asset": {{"version": "2.0"}},
        "scenes": [{{"nodes": [0]}}],
        "nodes": [{{"mesh": 0}}],
        "meshes": [{{"primitives": [{{"attributes": {{"POSITION": 0}}}}]}}],
        "buffers": [{buffer}],
        "bufferViews": [{{"buffer": 0, "byteOffset": 0, "byteLength": 36}}],
        "accessors": [
            {{"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
             "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]}}
        ]
    }}"#
    )
}

fn triangle_bytes() -> Vec<u8> {
    let mut bin = Vec::new();
    for p in [[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
        for c in p {
            bin.extend_from_slice(&c.to_le_bytes());
        }
    }
    bin
}

/// One triangle in the z = 0 plane, indexed with u16, under a node lifted
/// by two units.
fn single_triangle_glb() -> Vec<u8> {
    let mut bin = Vec::new();
    for p in [[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
        for c in p {
            bin.extend_from_slice(&c.to_le_bytes());
        }
    }
    for i in [0u16, 1, 2] {
        bin.extend_from_slice(&i.to_le_bytes());
    }
    let json = r#"{
        "asset": {"version": "2.0"},
        "scene": 0,
        "scenes": [{"nodes": [0]}],
        "nodes": [{"mesh": 0, "translation": [0.0, 2.0, 0.0]}],
        "meshes": [{"primitives": [{"attributes": {"POSITION": 0}, "indices": 1}]}],
        "buffers": [{"byteLength": 42}],
        "bufferViews": [
            {"buffer": 0, "byteOffset": 0, "byteLength": 36, "target": 34962},
            {"buffer": 0, "byteOffset": 36, "byteLength": 6, "target": 34963}
        ],
        "accessors": [
            {"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
             "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]},
            {"bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR"}
        ]
    }"#;
    glb(json, &bin)
}

#[test]
fn loads_a_single_triangle() {
    let model = Model::from_glb(&single_triangle_glb()).expect("valid glb");
    assert_eq!(model.meshes.len(), 1);
    assert_eq!(model.triangle_count(), 1);

    let mesh = &model.meshes[0];
    assert_eq!(mesh.indices, vec![0, 1, 2]);
    assert_eq!(mesh.base_color, [1.0, 1.0, 1.0, 1.0]);
}

#[test]
fn node_transforms_are_baked_into_positions() {
    let model = Model::from_glb(&single_triangle_glb()).expect("valid glb");
    let mesh = &model.meshes[0];
    assert_eq!(mesh.positions[0], [0.0, 2.0, 0.0]);
    assert_eq!(mesh.positions[1], [1.0, 2.0, 0.0]);
    assert_eq!(mesh.positions[2], [0.0, 3.0, 0.0]);

    let (lo, hi) = model.bounds().expect("non-empty");
    assert_eq!(lo.to_array(), [0.0, 2.0, 0.0]);
    assert_eq!(hi.to_array(), [1.0, 3.0, 0.0]);
}

#[test]
fn missing_normals_are_computed_from_faces() {
    let model = Model::from_glb(&single_triangle_glb()).expect("valid glb");
    for n in &model.meshes[0].normals {
        assert!((n[2] - 1.0).abs() < 1e-6, "normal {:?}", n);
    }
}

#[test]
fn garbage_bytes_are_rejected() {
    let err = Model::from_glb(b"definitely not a model").unwrap_err();
    assert!(matches!(err, ModelError::Gltf(_)));
}

#[test]
fn asset_without_geometry_is_empty() {
    let err = Model::from_glb(br#"{"asset": {"version": "2.0"}}"#).unwrap_err();
    assert!(matches!(err, ModelError::Empty));
    assert!(Model::default().bounds().is_none());
}

#[test]
fn degenerate_triangles_fall_back_to_up() {
    let positions = [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [2.0, 2.0, 2.0]];
    let normals = vertex_normals(&positions, &[0, 1, 2]);
    assert_eq!(normals, vec![[0.0, 1.0, 0.0]; 3]);
}

#[test]
fn out_of_range_indices_are_skipped() {
    let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]];
    let normals = vertex_normals(&positions, &[0, 1, 2, 0, 1, 9]);
    for n in normals {
        assert!((n[1] - 1.0).abs() < 1e-6, "normal {:?}", n);
    }
}

#[test]
fn external_buffers_are_rejected() {
    let json = unindexed_triangle_json(r#"{"byteLength": 36, "uri": "tree.bin"}"#);
    let err = Model::from_glb(&glb_json_only(&json)).unwrap_err();
    match err {
        ModelError::ExternalBuffer { index, uri } => {
            assert_eq!(index, 0);
            assert_eq!(uri, "tree.bin");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn glb_without_binary_chunk_is_rejected() {
    let json = unindexed_triangle_json(r#"{"byteLength": 36}"#);
    let err = Model::from_glb(&glb_json_only(&json)).unwrap_err();
    assert!(matches!(err, ModelError::MissingBlob), "{:?}", err);
}

#[test]
fn unindexed_primitives_get_sequential_indices() {
    let json = unindexed_triangle_json(r#"{"byteLength": 36}"#);
    let model = Model::from_glb(&glb(&json, &triangle_bytes())).expect("valid glb");
    let mesh = &model.meshes[0];
    assert_eq!(mesh.indices, vec![0, 1, 2]);
    for n in &mesh.normals {
        assert!((n[2] - 1.0).abs() < 1e-6, "normal {:?}", n);
    }
}
