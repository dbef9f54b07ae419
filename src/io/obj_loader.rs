use crate::core::geometry::Vertex;
use crate::io::error::ParseError;
use log::{info, warn};
use nalgebra::{Point3, Vector2, Vector3, Vector4};
use std::path::Path;

/// Loads an OBJ file into a single vertex/index list (triangle list order).
///
/// All models in the file are merged. Missing normals are rebuilt by averaging
/// face normals; tangents are generated whenever the file carries uvs.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<(Vec<Vertex>, Vec<u32>), ParseError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ParseError::Missing(path.to_path_buf()));
    }

    info!("Loading OBJ file: {}", path.display());

    let load_options = tobj::LoadOptions {
        triangulate: true,
        single_index: true, // Unifies indices for Position/Normal/UV
        ..Default::default()
    };

    // Materials are configured per mesh in the scene file, MTL files are ignored.
    let (models, _materials) =
        tobj::load_obj(path, &load_options).map_err(|e| ParseError::malformed(path, e))?;

    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let mut index_offset = 0u32;
    let mut has_texcoords = true;

    for model in models {
        let mesh = &model.mesh;
        let num_vertices = mesh.positions.len() / 3;

        let has_normals = mesh.normals.len() == mesh.positions.len();
        let model_has_uvs = mesh.texcoords.len() / 2 == num_vertices;
        let has_colors = mesh.vertex_color.len() == mesh.positions.len();
        has_texcoords &= model_has_uvs;

        if !has_normals {
            warn!(
                "Mesh '{}' is missing normals, generating smooth normals.",
                model.name
            );
        }

        for i in 0..num_vertices {
            let position = Point3::new(
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                mesh.positions[i * 3 + 2],
            );
            let normal = if has_normals {
                Vector3::new(
                    mesh.normals[i * 3],
                    mesh.normals[i * 3 + 1],
                    mesh.normals[i * 3 + 2],
                )
            } else {
                Vector3::zeros()
            };
            let uv = if model_has_uvs {
                Vector2::new(mesh.texcoords[i * 2], mesh.texcoords[i * 2 + 1])
            } else {
                Vector2::zeros()
            };

            let mut vertex = Vertex::new(position, normal, uv);
            if has_colors {
                vertex = vertex.with_color(Vector3::new(
                    mesh.vertex_color[i * 3],
                    mesh.vertex_color[i * 3 + 1],
                    mesh.vertex_color[i * 3 + 2],
                ));
            }
            vertices.push(vertex);
        }

        for &index in &mesh.indices {
            if index as usize >= num_vertices {
                return Err(ParseError::malformed(
                    path,
                    format!("index {} out of range in '{}'", index, model.name),
                ));
            }
            indices.push(index + index_offset);
        }

        if !has_normals {
            let start = index_offset as usize;
            let first_index = indices.len() - mesh.indices.len();
            compute_smooth_normals(&mut vertices[start..], &indices[first_index..], index_offset);
        }

        index_offset += num_vertices as u32;
    }

    if vertices.is_empty() || indices.is_empty() {
        return Err(ParseError::malformed(path, "no triangles"));
    }

    if has_texcoords {
        compute_tangents(&mut vertices, &indices);
    }

    info!(
        "OBJ loaded successfully. Total vertices: {}, Total indices: {}",
        vertices.len(),
        indices.len()
    );

    Ok((vertices, indices))
}

/// Area-weighted average of the face normals around each vertex.
///
/// Triangles wound clockwise (seen from the front) get outward normals in the
/// left-handed frame. `indices` are offset by `base`.
pub fn compute_smooth_normals(vertices: &mut [Vertex], indices: &[u32], base: u32) {
    let mut accum = vec![Vector3::zeros(); vertices.len()];

    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| (i - base) as usize);
        let e1 = vertices[b].position - vertices[a].position;
        let e2 = vertices[c].position - vertices[a].position;
        // Unnormalized: longer for bigger faces
        let face = e1.cross(&e2);
        accum[a] += face;
        accum[b] += face;
        accum[c] += face;
    }

    for (vertex, n) in vertices.iter_mut().zip(accum) {
        vertex.normal = n.try_normalize(1e-12).unwrap_or_else(Vector3::y);
    }
}

/// Per-triangle tangents from the uv gradients, accumulated per vertex, then
/// Gram-Schmidt orthogonalized against the normal. w holds the bitangent sign.
pub fn compute_tangents(vertices: &mut [Vertex], indices: &[u32]) {
    let mut tangents = vec![Vector3::zeros(); vertices.len()];
    let mut bitangents = vec![Vector3::zeros(); vertices.len()];

    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize);
        let (v0, v1, v2) = (&vertices[a], &vertices[b], &vertices[c]);

        let e1 = v1.position - v0.position;
        let e2 = v2.position - v0.position;
        let duv1 = v1.texcoord - v0.texcoord;
        let duv2 = v2.texcoord - v0.texcoord;

        let det = duv1.x * duv2.y - duv2.x * duv1.y;
        if det.abs() < 1e-12 {
            continue;
        }
        let r = 1.0 / det;
        let t = (e1 * duv2.y - e2 * duv1.y) * r;
        let bt = (e2 * duv1.x - e1 * duv2.x) * r;

        for i in [a, b, c] {
            tangents[i] += t;
            bitangents[i] += bt;
        }
    }

    for (i, vertex) in vertices.iter_mut().enumerate() {
        let n = vertex.normal;
        let t = tangents[i] - n * n.dot(&tangents[i]);
        let Some(t) = t.try_normalize(1e-12) else {
            continue;
        };
        let w = if n.cross(&t).dot(&bitangents[i]) < 0.0 { -1.0 } else { 1.0 };
        vertex.tangent = Vector4::new(t.x, t.y, t.z, w);
    }
}
