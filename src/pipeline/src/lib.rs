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

//! `PipelineCore` (spec §2): shader modules, pipeline layouts, render
//! passes, graphics pipelines, and the software rasterizer that backs
//! `GraphicsPipeline::run`.

pub mod error;
pub mod format;
pub mod image;
pub mod interp;
pub mod layout;
pub mod pipeline;
pub mod raster;
pub mod render_pass;
pub mod shader;

pub use error::PipelineError;
pub use format::Format;
pub use image::{Extent2D as ImageExtent2D, Image, ImageTiling, ImageUsage};
pub use layout::{DescriptorSetLayout, DescriptorSetLayoutBinding, DescriptorType, PipelineLayout, PushConstantRange};
pub use pipeline::{
    ColorBlendAttachmentState, ColorBlendState, GraphicsPipeline, GraphicsPipelineCreateInfo, MultisampleState, VertexInputAttribute,
    VertexInputBinding,
};
pub use raster::{CullMode, Extent2D as RasterExtent2D, FrontFace, Offset2D, PolygonMode, PrimitiveTopology, RasterizationState, Rect2D, Viewport};
pub use render_pass::{AttachmentDescription, AttachmentLoadOp, AttachmentReference, AttachmentStoreOp, RenderPass, SubpassDependency, SubpassDescription};
pub use shader::ShaderModule;
