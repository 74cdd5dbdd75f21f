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

//! Fixed-function rasterization state (spec §3's `GraphicsPipeline` fields)
//! and the triangle rasterizer `run` drives (§4.8): "Clip and
//! perspective-divide; apply viewport transform; rasterize ... Honor the
//! rasterization state's cull mode, front face, polygon mode (`FILL` only
//! required), and the viewport/scissor rectangles."
//!
//! Parallelism within rasterization is an implementation choice the spec
//! says must be invisible to observers (§5); this walks scanlines serially,
//! which is the simplest invisible choice.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimitiveTopology {
    TriangleList,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolygonMode {
    Fill,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CullMode {
    None,
    Front,
    Back,
    FrontAndBack,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrontFace {
    CounterClockwise,
    Clockwise,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Offset2D {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Extent2D {
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect2D {
    pub offset: Offset2D,
    pub extent: Extent2D,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RasterizationState {
    pub cull_mode: CullMode,
    pub front_face: FrontFace,
    pub polygon_mode: PolygonMode,
}

impl Default for RasterizationState {
    fn default() -> RasterizationState {
        RasterizationState { cull_mode: CullMode::Back, front_face: FrontFace::CounterClockwise, polygon_mode: PolygonMode::Fill }
    }
}

/// A post-viewport-transform vertex: `x`/`y` in pixels, `z` the depth
/// value carried through for a future depth test, `w` the clip-space `w`
/// retained for perspective-correct attribute interpolation.
#[derive(Clone, Copy, Debug)]
pub struct ScreenVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub inv_w: f32,
}

/// Signed area of the parallelogram spanned by `(c - a)` and `(b - a)`;
/// twice the triangle area, positive when `a, b, c` wind counter-clockwise
/// in a y-down screen space.
fn edge_function(a: ScreenVertex, b: ScreenVertex, x: f32, y: f32) -> f32 {
    (x - a.x) * (b.y - a.y) - (y - a.y) * (b.x - a.x)
}

fn triangle_area(a: ScreenVertex, b: ScreenVertex, c: ScreenVertex) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn is_culled(area: f32, state: &RasterizationState) -> bool {
    let winding_is_ccw = area < 0.0;
    let is_front = match state.front_face {
        FrontFace::CounterClockwise => winding_is_ccw,
        FrontFace::Clockwise => !winding_is_ccw,
    };
    match state.cull_mode {
        CullMode::None => false,
        CullMode::Front => is_front,
        CullMode::Back => !is_front,
        CullMode::FrontAndBack => true,
    }
}

/// Intersects the viewport's pixel-space bounding box with the scissor
/// rectangle, clamped to the color attachment's own extent.
fn clip_bounds(viewport: Viewport, scissor: Rect2D, attachment_extent: Extent2D) -> (i32, i32, i32, i32) {
    let vp_min_x = viewport.x.floor() as i32;
    let vp_min_y = viewport.y.floor() as i32;
    let vp_max_x = (viewport.x + viewport.width).ceil() as i32;
    let vp_max_y = (viewport.y + viewport.height).ceil() as i32;

    let sc_min_x = scissor.offset.x;
    let sc_min_y = scissor.offset.y;
    let sc_max_x = scissor.offset.x + scissor.extent.width as i32;
    let sc_max_y = scissor.offset.y + scissor.extent.height as i32;

    let min_x = vp_min_x.max(sc_min_x).max(0);
    let min_y = vp_min_y.max(sc_min_y).max(0);
    let max_x = vp_max_x.min(sc_max_x).min(attachment_extent.width as i32);
    let max_y = vp_max_y.min(sc_max_y).min(attachment_extent.height as i32);
    (min_x, min_y, max_x, max_y)
}

/// Rasterizes one triangle, invoking `write` once per covered pixel with
/// the barycentric weights `(w0, w1, w2)` (summing to 1, perspective-correct
/// via each vertex's `inv_w`) so the caller can interpolate varyings before
/// running the fragment entry point.
pub fn rasterize_triangle(
    vertices: [ScreenVertex; 3],
    viewport: Viewport,
    scissor: Rect2D,
    attachment_extent: Extent2D,
    state: &RasterizationState,
    mut write: impl FnMut(u32, u32, [f32; 3]),
) {
    let area = triangle_area(vertices[0], vertices[1], vertices[2]);
    if area == 0.0 || is_culled(area, state) {
        return;
    }

    let (min_x, min_y, max_x, max_y) = clip_bounds(viewport, scissor, attachment_extent);
    if min_x >= max_x || min_y >= max_y {
        return;
    }

    for py in min_y..max_y {
        for px in min_x..max_x {
            let x = px as f32 + 0.5;
            let y = py as f32 + 0.5;
            let w0 = edge_function(vertices[1], vertices[2], x, y);
            let w1 = edge_function(vertices[2], vertices[0], x, y);
            let w2 = edge_function(vertices[0], vertices[1], x, y);
            let inside = (w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0) || (w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0);
            if !inside {
                continue;
            }
            write(px as u32, py as u32, [w0 / area, w1 / area, w2 / area]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen_vertex(x: f32, y: f32) -> ScreenVertex {
        ScreenVertex { x, y, z: 0.0, inv_w: 1.0 }
    }

    #[test]
    fn rasterizes_pixels_strictly_inside_a_ccw_triangle() {
        let vertices = [screen_vertex(0.0, 0.0), screen_vertex(10.0, 0.0), screen_vertex(0.0, 10.0)];
        let viewport = Viewport { x: 0.0, y: 0.0, width: 10.0, height: 10.0, min_depth: 0.0, max_depth: 1.0 };
        let scissor = Rect2D { offset: Offset2D { x: 0, y: 0 }, extent: Extent2D { width: 10, height: 10 } };
        let state = RasterizationState { cull_mode: CullMode::None, front_face: FrontFace::CounterClockwise, polygon_mode: PolygonMode::Fill };
        let mut covered = Vec::new();
        rasterize_triangle(vertices, viewport, scissor, Extent2D { width: 10, height: 10 }, &state, |x, y, _| covered.push((x, y)));
        assert!(covered.contains(&(1, 1)));
        assert!(!covered.contains(&(9, 9)));
    }

    #[test]
    fn back_face_culling_drops_clockwise_winding() {
        let vertices = [screen_vertex(0.0, 0.0), screen_vertex(0.0, 10.0), screen_vertex(10.0, 0.0)];
        let viewport = Viewport { x: 0.0, y: 0.0, width: 10.0, height: 10.0, min_depth: 0.0, max_depth: 1.0 };
        let scissor = Rect2D { offset: Offset2D { x: 0, y: 0 }, extent: Extent2D { width: 10, height: 10 } };
        let state = RasterizationState::default();
        let mut covered = Vec::new();
        rasterize_triangle(vertices, viewport, scissor, Extent2D { width: 10, height: 10 }, &state, |x, y, _| covered.push((x, y)));
        assert!(covered.is_empty());
    }
}
