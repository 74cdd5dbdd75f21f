// Copyright 2026 The Swvk Developers.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The Wavefront OBJ mesh loader spec §6/§1 scopes as "only their
//! input/output contracts matter": comment, vertex, vertex-texture,
//! vertex-normal, `s off` (accepted, ignored), and fan-triangulated faces
//! with 1-based and negative indices. Numeric parsing is locale-independent
//! (plain `f32`/`i64` parsing, never `sscanf`/`atof`).

use std::fmt;

/// One vertex as the pipeline's single declared attribute expects it:
/// clip-space position, matching `tri.vert`'s `location = 0` input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexInputStruct {
    pub position: [f32; 4],
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjParseError {
    pub filename: String,
    pub line_number: usize,
    pub message: String,
}

impl fmt::Display for ObjParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: error: {}", self.filename, self.line_number, self.message)
    }
}

impl std::error::Error for ObjParseError {}

fn error(filename: &str, line_number: usize, message: impl Into<String>) -> ObjParseError {
    ObjParseError { filename: filename.to_string(), line_number, message: message.into() }
}

#[derive(Clone, Copy, Debug, Default)]
struct Vertex {
    x: f32,
    y: f32,
    z: f32,
}

#[derive(Clone, Copy, Debug, Default)]
struct TextureVertex {
    u: f32,
    v: f32,
}

#[derive(Clone, Copy, Debug, Default)]
struct NormalVertex {
    x: f32,
    y: f32,
    z: f32,
}

fn parse_floats<const N: usize>(filename: &str, line_number: usize, command: &str, fields: &[&str]) -> Result<[f32; N], ObjParseError> {
    if fields.len() != N {
        return Err(error(filename, line_number, format!("parsing {} command failed", command)));
    }
    let mut out = [0.0f32; N];
    for (i, field) in fields.iter().enumerate() {
        out[i] = field.parse::<f32>().map_err(|_| error(filename, line_number, format!("parsing {} command failed", command)))?;
    }
    Ok(out)
}

/// Resolves a 1-based or negative OBJ index against a slice of already-seen
/// elements (`v`/`vt`/`vn` only ever reference earlier lines).
fn resolve_index<'a, T>(filename: &str, line_number: usize, elements: &'a [T], text: &str, what: &str) -> Result<&'a T, ObjParseError> {
    let count = elements.len() as i64;
    let parsed: i64 = text.parse().map_err(|_| error(filename, line_number, format!("invalid {}: {}", what, text)))?;
    if parsed == 0 || parsed > count || parsed < -count {
        return Err(error(filename, line_number, format!("invalid {}: {}", what, text)));
    }
    let index = if parsed < 0 { (count + parsed) as usize } else { (parsed - 1) as usize };
    Ok(&elements[index])
}

struct FaceVertex {
    vertex: Vertex,
}

fn project(vertex: Vertex) -> VertexInputStruct {
    // obj → OpenGL coordinate system, then camera transform, perspective
    // projection, and aspect-ratio correction, mirroring
    // `load_wavefront_obj_file`'s fixed camera/projection in the original.
    let global_x = vertex.x;
    let global_y = -vertex.z;
    let global_z = vertex.y;

    let camera_x = global_x;
    let camera_y = global_y;
    let camera_z = global_z - 1.0;

    const FAR_PLANE: f32 = 10.0;
    const FACTOR: f32 = 1.0 / FAR_PLANE;
    let projected_x = FACTOR * camera_x;
    let projected_y = -FACTOR * camera_y;
    let projected_z = -FACTOR * camera_z;
    let projected_w = -FACTOR * camera_z;

    const X_ASPECT_RATIO_CORRECTION: f32 = 3.0 / 4.0;
    const Y_ASPECT_RATIO_CORRECTION: f32 = 1.0;
    let final_x = projected_x * X_ASPECT_RATIO_CORRECTION;
    let final_y = projected_y * Y_ASPECT_RATIO_CORRECTION;
    let final_z = projected_z;
    let final_w = projected_w;

    VertexInputStruct { position: [final_x, final_y, final_z, final_w] }
}

/// Parses `content` (the whole file, already read) as a Wavefront OBJ mesh,
/// returning one clip-space position per vertex of every triangulated face,
/// fan-triangulated in source order.
pub fn load_wavefront_obj(filename: &str, content: &str) -> Result<Vec<VertexInputStruct>, ObjParseError> {
    let mut result = Vec::new();
    let mut vertices: Vec<Vertex> = Vec::new();
    let mut texture_vertices: Vec<TextureVertex> = Vec::new();
    let mut normal_vertices: Vec<NormalVertex> = Vec::new();

    for (zero_based_index, raw_line) in content.lines().enumerate() {
        let line_number = zero_based_index + 1;
        let normalized: String = raw_line.chars().map(|ch| if ch.is_whitespace() { ' ' } else { ch }).collect();
        let line = normalized.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.splitn(2, ' ');
        let command = parts.next().unwrap_or("");
        let rest = parts.next().unwrap_or("").trim();

        match command {
            "v" => {
                let fields: Vec<&str> = rest.split(' ').filter(|s| !s.is_empty()).collect();
                let [x, y, z] = parse_floats::<3>(filename, line_number, "vertex", &fields)?;
                vertices.push(Vertex { x, y, z });
            }
            "vn" => {
                let fields: Vec<&str> = rest.split(' ').filter(|s| !s.is_empty()).collect();
                let [x, y, z] = parse_floats::<3>(filename, line_number, "vertex normal", &fields)?;
                normal_vertices.push(NormalVertex { x, y, z });
            }
            "vt" => {
                let fields: Vec<&str> = rest.split(' ').filter(|s| !s.is_empty()).collect();
                let [u, v] = parse_floats::<2>(filename, line_number, "vertex texture", &fields)?;
                texture_vertices.push(TextureVertex { u, v });
            }
            "s" if rest == "off" => {
                // smoothing groups are not implemented; turning smoothing off has no effect.
            }
            "f" => {
                let mut face_vertices: Vec<FaceVertex> = Vec::new();
                for token in rest.split(' ').filter(|s| !s.is_empty()) {
                    let mut slash_parts = token.splitn(3, '/');
                    let vertex_index_str = slash_parts.next().unwrap_or("");
                    let texture_index_str = slash_parts.next().unwrap_or("");
                    let normal_index_str = slash_parts.next().unwrap_or("");

                    let vertex = *resolve_index(filename, line_number, &vertices, vertex_index_str, "vertex index")?;
                    if !texture_index_str.is_empty() {
                        resolve_index(filename, line_number, &texture_vertices, texture_index_str, "vertex texture index")?;
                    }
                    if !normal_index_str.is_empty() {
                        resolve_index(filename, line_number, &normal_vertices, normal_index_str, "vertex normal index")?;
                    }
                    face_vertices.push(FaceVertex { vertex });
                }

                if face_vertices.len() < 3 {
                    return Err(error(filename, line_number, "faces must have at least 3 vertexes"));
                }

                let transformed: Vec<VertexInputStruct> = face_vertices.iter().map(|fv| project(fv.vertex)).collect();
                for leading in 2..transformed.len() {
                    result.push(transformed[0]);
                    result.push(transformed[leading - 1]);
                    result.push(transformed[leading]);
                }
            }
            _ => return Err(error(filename, line_number, format!("unimplemented command: {}", command))),
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_face_produces_one_triangle_in_source_order() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let vertices = load_wavefront_obj("t.obj", obj).unwrap();
        assert_eq!(vertices.len(), 3);
    }

    #[test]
    fn quad_face_fan_triangulates_into_two_triangles() {
        let obj = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        let vertices = load_wavefront_obj("t.obj", obj).unwrap();
        assert_eq!(vertices.len(), 6);
        assert_eq!(vertices[0], vertices[3]); // both triangles share v0
    }

    #[test]
    fn negative_indices_count_from_the_end() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
        let positive = load_wavefront_obj("t.obj", "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        let negative = load_wavefront_obj("t.obj", obj).unwrap();
        assert_eq!(positive, negative);
    }

    #[test]
    fn comments_and_blank_lines_and_smoothing_off_are_ignored() {
        let obj = "# a comment\n\nv 0 0 0\nv 1 0 0\nv 0 1 0\ns off\nf 1 2 3\n";
        let vertices = load_wavefront_obj("t.obj", obj).unwrap();
        assert_eq!(vertices.len(), 3);
    }

    #[test]
    fn face_with_texture_and_normal_indices_parses() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 0 1\nvn 0 0 1\nf 1/1/1 2/2/1 3/3/1\n";
        let vertices = load_wavefront_obj("t.obj", obj).unwrap();
        assert_eq!(vertices.len(), 3);
    }

    #[test]
    fn face_with_fewer_than_three_vertexes_is_an_error() {
        let obj = "v 0 0 0\nv 1 0 0\nf 1 2\n";
        let err = load_wavefront_obj("t.obj", obj).unwrap_err();
        assert!(err.message.contains("at least 3"));
    }

    #[test]
    fn zero_vertex_index_is_an_error() {
        let obj = "v 0 0 0\nf 0\n";
        let err = load_wavefront_obj("t.obj", obj).unwrap_err();
        assert_eq!(err.line_number, 2);
        assert!(err.message.contains("invalid vertex index"));
    }

    #[test]
    fn unrecognized_command_is_an_error_naming_the_command() {
        let obj = "g group_name\n";
        let err = load_wavefront_obj("t.obj", obj).unwrap_err();
        assert!(err.message.contains("unimplemented command: g"));
    }

    #[test]
    fn error_display_matches_file_colon_line_colon_error_format() {
        let obj = "bogus\n";
        let err = load_wavefront_obj("t.obj", obj).unwrap_err();
        assert_eq!(format!("{}", err), "t.obj:1: error: unimplemented command: bogus");
    }
}
