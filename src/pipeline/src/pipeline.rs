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

//! `GraphicsPipeline`: spec §3, "owns references (shared) to layout, render
//! pass, vertex + fragment shader modules, and copies of all fixed-function
//! state". `run` implements §4.8's full behavioral contract.

use std::collections::HashMap;
use std::sync::Arc;

use swvk_spirv::{BuiltIn, ExecutionModel, Id, StorageClass};

use crate::error::PipelineError;
use crate::format::Format;
use crate::image::Image;
use crate::interp::{self, Value};
use crate::layout::PipelineLayout;
use crate::raster::{self, PrimitiveTopology, RasterizationState, Rect2D, ScreenVertex, Viewport};
use crate::render_pass::RenderPass;
use crate::shader::{ShaderModule, VariableInfo};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexInputBinding {
    pub binding: u32,
    pub stride: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexInputAttribute {
    pub location: u32,
    pub binding: u32,
    pub format: Format,
    pub offset: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorBlendAttachmentState {
    pub blend_enable: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorBlendState {
    pub attachments: Vec<ColorBlendAttachmentState>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MultisampleState {
    pub rasterization_samples: u32,
}

impl Default for MultisampleState {
    fn default() -> MultisampleState {
        MultisampleState { rasterization_samples: 1 }
    }
}

pub struct GraphicsPipelineCreateInfo {
    pub vertex_shader: Arc<ShaderModule>,
    pub vertex_entry_point: String,
    pub fragment_shader: Arc<ShaderModule>,
    pub fragment_entry_point: String,
    pub layout: Arc<PipelineLayout>,
    pub render_pass: Arc<RenderPass>,
    pub vertex_bindings: Vec<VertexInputBinding>,
    pub vertex_attributes: Vec<VertexInputAttribute>,
    pub topology: PrimitiveTopology,
    pub viewport: Viewport,
    pub scissor: Rect2D,
    pub rasterization_state: RasterizationState,
    pub multisample_state: MultisampleState,
    pub color_blend_state: ColorBlendState,
}

/// A compiled, ready-to-run graphics pipeline. "Compilation" per §4.8 is a
/// black box: what this struct actually stores past `make` is the reflected
/// entry points plus the fixed-function state, since the spec's only
/// contract is `run`'s behavior.
pub struct GraphicsPipeline {
    vertex_shader: Arc<ShaderModule>,
    vertex_entry_point: String,
    fragment_shader: Arc<ShaderModule>,
    fragment_entry_point: String,
    #[allow(dead_code)]
    layout: Arc<PipelineLayout>,
    #[allow(dead_code)]
    render_pass: Arc<RenderPass>,
    vertex_bindings: Vec<VertexInputBinding>,
    vertex_attributes: Vec<VertexInputAttribute>,
    topology: PrimitiveTopology,
    viewport: Viewport,
    scissor: Rect2D,
    rasterization_state: RasterizationState,
    #[allow(dead_code)]
    multisample_state: MultisampleState,
    color_blend_state: ColorBlendState,
}

fn binding_stride(bindings: &[VertexInputBinding], binding: u32) -> Option<u32> {
    bindings.iter().find(|b| b.binding == binding).map(|b| b.stride)
}

impl GraphicsPipeline {
    /// Validates the invariants spec §3 lists for `GraphicsPipeline`:
    /// every attribute's binding must be declared, its byte range must fit
    /// inside that binding's stride, and its location must be one the
    /// vertex entry point actually declares as an input.
    pub fn make(_cache: (), create_info: GraphicsPipelineCreateInfo) -> Result<GraphicsPipeline, PipelineError> {
        let entry = create_info
            .vertex_shader
            .entry_point(&create_info.vertex_entry_point, ExecutionModel::Vertex)
            .ok_or_else(|| PipelineError::InvalidShader(format!("no vertex entry point named {}", create_info.vertex_entry_point)))?;

        let declared_locations: Vec<u32> = entry
            .interface
            .iter()
            .filter_map(|id| create_info.vertex_shader.reflection.variables.get(id))
            .filter(|v| v.storage_class == Some(StorageClass::Input))
            .filter_map(|v| v.location)
            .collect();

        for attribute in &create_info.vertex_attributes {
            let stride = binding_stride(&create_info.vertex_bindings, attribute.binding).ok_or_else(|| {
                PipelineError::InvalidState(format!("attribute references undeclared binding {}", attribute.binding))
            })?;
            if attribute.offset + attribute.format.size() as u32 > stride {
                return Err(PipelineError::InvalidState(format!(
                    "attribute at location {} overruns binding {}'s stride",
                    attribute.location, attribute.binding
                )));
            }
            if !declared_locations.contains(&attribute.location) {
                return Err(PipelineError::InvalidState(format!(
                    "attribute location {} is not declared as a vertex-stage input",
                    attribute.location
                )));
            }
        }

        if create_info
            .fragment_shader
            .entry_point(&create_info.fragment_entry_point, ExecutionModel::Fragment)
            .is_none()
        {
            return Err(PipelineError::InvalidShader(format!(
                "no fragment entry point named {}",
                create_info.fragment_entry_point
            )));
        }

        Ok(GraphicsPipeline {
            vertex_shader: create_info.vertex_shader,
            vertex_entry_point: create_info.vertex_entry_point,
            fragment_shader: create_info.fragment_shader,
            fragment_entry_point: create_info.fragment_entry_point,
            layout: create_info.layout,
            render_pass: create_info.render_pass,
            vertex_bindings: create_info.vertex_bindings,
            vertex_attributes: create_info.vertex_attributes,
            topology: create_info.topology,
            viewport: create_info.viewport,
            scissor: create_info.scissor,
            rasterization_state: create_info.rasterization_state,
            multisample_state: create_info.multisample_state,
            color_blend_state: create_info.color_blend_state,
        })
    }

    fn position_builtin_variable(&self) -> Option<Id> {
        self.vertex_shader
            .reflection
            .variables
            .iter()
            .find(|(_, v)| v.builtin == Some(BuiltIn::Position))
            .map(|(id, _)| *id)
    }

    fn read_attribute(&self, attribute: &VertexInputAttribute, vertex_bindings: &HashMap<u32, &[u8]>, relative_index: u32) -> Value {
        let stride = binding_stride(&self.vertex_bindings, attribute.binding).unwrap_or(0);
        let bytes = vertex_bindings.get(&attribute.binding).copied().unwrap_or(&[]);
        let start = (relative_index * stride + attribute.offset) as usize;
        let size = attribute.format.size();
        if start + size > bytes.len() {
            return Value::Vector(vec![0.0; attribute.format.component_count()]);
        }
        let decoded = attribute.format.decode(&bytes[start..start + size]);
        Value::Vector(decoded[..attribute.format.component_count()].to_vec())
    }

    fn input_variable_for_location(shader: &ShaderModule, location: u32) -> Option<(Id, &VariableInfo)> {
        shader
            .reflection
            .variables
            .iter()
            .find(|(_, v)| v.storage_class == Some(StorageClass::Input) && v.location == Some(location))
            .map(|(id, v)| (*id, v))
    }

    fn output_variables(shader: &ShaderModule) -> Vec<(Id, &VariableInfo)> {
        shader
            .reflection
            .variables
            .iter()
            .filter(|(_, v)| v.storage_class == Some(StorageClass::Output))
            .map(|(id, v)| (*id, v))
            .collect()
    }

    /// Runs the vertex entry point for one vertex, returning its clip-space
    /// position and every non-builtin output (the varyings carried to the
    /// fragment stage).
    fn run_vertex(&self, vertex_bindings: &HashMap<u32, &[u8]>, relative_index: u32) -> ([f32; 4], HashMap<u32, Value>) {
        let mut inputs: HashMap<Id, Value> = HashMap::new();
        for attribute in &self.vertex_attributes {
            if let Some((id, _)) = Self::input_variable_for_location(&self.vertex_shader, attribute.location) {
                inputs.insert(id, self.read_attribute(attribute, vertex_bindings, relative_index));
            }
        }

        let entry = self
            .vertex_shader
            .entry_point(&self.vertex_entry_point, ExecutionModel::Vertex)
            .expect("validated at make()");
        let body = self.vertex_shader.reflection.functions.get(&entry.function_id).cloned().unwrap_or_default();
        let results = interp::execute(&self.vertex_shader, &body, &inputs);

        let position = self
            .position_builtin_variable()
            .and_then(|id| results.get(&id))
            .map(|v| {
                let components = v.as_vector();
                [
                    components.first().copied().unwrap_or(0.0),
                    components.get(1).copied().unwrap_or(0.0),
                    components.get(2).copied().unwrap_or(0.0),
                    components.get(3).copied().unwrap_or(1.0),
                ]
            })
            .unwrap_or([0.0, 0.0, 0.0, 1.0]);

        let mut varyings = HashMap::new();
        for (id, info) in Self::output_variables(&self.vertex_shader) {
            if info.builtin.is_some() {
                continue;
            }
            if let (Some(location), Some(value)) = (info.location, results.get(&id)) {
                varyings.insert(location, value.clone());
            }
        }

        (position, varyings)
    }

    fn run_fragment(&self, varyings: &HashMap<u32, Value>) -> [f32; 4] {
        let mut inputs: HashMap<Id, Value> = HashMap::new();
        for (id, info) in Self::input_variable_for_shader_locations(&self.fragment_shader) {
            if let Some(location) = info.location {
                if let Some(value) = varyings.get(&location) {
                    inputs.insert(id, value.clone());
                }
            }
        }

        let entry = match self.fragment_shader.entry_point(&self.fragment_entry_point, ExecutionModel::Fragment) {
            Some(e) => e,
            None => return [0.0, 0.0, 0.0, 1.0],
        };
        let body = self.fragment_shader.reflection.functions.get(&entry.function_id).cloned().unwrap_or_default();
        let results = interp::execute(&self.fragment_shader, &body, &inputs);

        Self::output_variables(&self.fragment_shader)
            .into_iter()
            .filter(|(_, info)| info.builtin.is_none())
            .find_map(|(id, _)| results.get(&id))
            .map(|v| {
                let c = v.as_vector();
                [c.first().copied().unwrap_or(0.0), c.get(1).copied().unwrap_or(0.0), c.get(2).copied().unwrap_or(0.0), c.get(3).copied().unwrap_or(1.0)]
            })
            .unwrap_or([0.0, 0.0, 0.0, 1.0])
    }

    fn input_variable_for_shader_locations(shader: &ShaderModule) -> Vec<(Id, &VariableInfo)> {
        shader
            .reflection
            .variables
            .iter()
            .filter(|(_, v)| v.storage_class == Some(StorageClass::Input))
            .map(|(id, v)| (*id, v))
            .collect()
    }

    fn viewport_transform(&self, clip: [f32; 4]) -> ScreenVertex {
        let w = if clip[3] == 0.0 { 1.0 } else { clip[3] };
        let ndc_x = clip[0] / w;
        let ndc_y = clip[1] / w;
        let ndc_z = clip[2] / w;
        let x = self.viewport.x + (ndc_x * 0.5 + 0.5) * self.viewport.width;
        let y = self.viewport.y + (1.0 - (ndc_y * 0.5 + 0.5)) * self.viewport.height;
        let z = self.viewport.min_depth + (ndc_z * 0.5 + 0.5) * (self.viewport.max_depth - self.viewport.min_depth);
        ScreenVertex { x, y, z, inv_w: 1.0 / w }
    }

    fn blend(&self, existing: [f32; 4], incoming: [f32; 4], attachment: usize) -> [f32; 4] {
        let enabled = self.color_blend_state.attachments.get(attachment).map(|a| a.blend_enable).unwrap_or(false);
        if !enabled {
            return incoming;
        }
        let alpha = incoming[3];
        [
            incoming[0] * alpha + existing[0] * (1.0 - alpha),
            incoming[1] * alpha + existing[1] * (1.0 - alpha),
            incoming[2] * alpha + existing[2] * (1.0 - alpha),
            alpha + existing[3] * (1.0 - alpha),
        ]
    }

    /// Spec §4.8's full behavioral contract: reads per-attribute bytes for
    /// `[vertex_start, vertex_end)`, runs the vertex stage, assembles
    /// `TRIANGLE_LIST` primitives as `(3i, 3i+1, 3i+2)`, clips and
    /// perspective-divides, viewport-transforms, rasterizes honoring cull
    /// mode/front face/scissor, and invokes the fragment stage once per
    /// covered pixel. Returns only after every fragment has been written.
    pub fn run(
        &self,
        vertex_start: u32,
        vertex_end: u32,
        instance_id: u32,
        color_attachment: &mut Image,
        vertex_bindings: &HashMap<u32, &[u8]>,
    ) {
        let _ = instance_id;
        debug_assert_eq!(self.topology, PrimitiveTopology::TriangleList, "only TRIANGLE_LIST is implemented");

        let vertex_count = (vertex_end - vertex_start) as usize;
        let mut positions = Vec::with_capacity(vertex_count);
        let mut varyings = Vec::with_capacity(vertex_count);
        for i in 0..vertex_count {
            let (position, vertex_varyings) = self.run_vertex(vertex_bindings, i as u32);
            positions.push(position);
            varyings.push(vertex_varyings);
        }

        let extent = raster::Extent2D { width: color_attachment.extent.width, height: color_attachment.extent.height };

        for triangle in positions.chunks_exact(3).enumerate() {
            let (tri_index, clip_positions) = triangle;
            let screen = [
                self.viewport_transform(clip_positions[0]),
                self.viewport_transform(clip_positions[1]),
                self.viewport_transform(clip_positions[2]),
            ];
            let tri_varyings = [&varyings[tri_index * 3], &varyings[tri_index * 3 + 1], &varyings[tri_index * 3 + 2]];

            raster::rasterize_triangle(screen, self.viewport, self.scissor, extent, &self.rasterization_state, |x, y, weights| {
                let mut interpolated: HashMap<u32, Value> = HashMap::new();
                for location in tri_varyings[0].keys() {
                    let components = [
                        tri_varyings[0].get(location).map(|v| v.as_vector()).unwrap_or_default(),
                        tri_varyings[1].get(location).map(|v| v.as_vector()).unwrap_or_default(),
                        tri_varyings[2].get(location).map(|v| v.as_vector()).unwrap_or_default(),
                    ];
                    let len = components.iter().map(|c| c.len()).max().unwrap_or(0);
                    let mut blended = vec![0.0; len];
                    for (vi, component) in components.iter().enumerate() {
                        for (ci, value) in component.iter().enumerate() {
                            blended[ci] += value * weights[vi];
                        }
                    }
                    interpolated.insert(*location, Value::Vector(blended));
                }

                let fragment_color = self.run_fragment(&interpolated);
                let existing = color_attachment.read_pixel(x, y);
                let final_color = self.blend(existing, fragment_color, 0);
                color_attachment.write_pixel(x, y, final_color);
            });
        }
    }
}

