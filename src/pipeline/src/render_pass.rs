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

//! `RenderPass`: attachment descriptions, subpass descriptions with
//! color/input/resolve references, and subpass dependencies. May be empty.

use crate::format::Format;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttachmentLoadOp {
    Load,
    Clear,
    DontCare,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttachmentStoreOp {
    Store,
    DontCare,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttachmentDescription {
    pub format: Format,
    pub samples: u32,
    pub load_op: AttachmentLoadOp,
    pub store_op: AttachmentStoreOp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttachmentReference {
    pub attachment: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubpassDescription {
    pub input_attachments: Vec<AttachmentReference>,
    pub color_attachments: Vec<AttachmentReference>,
    pub resolve_attachments: Vec<AttachmentReference>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubpassDependency {
    pub src_subpass: Option<u32>,
    pub dst_subpass: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderPass {
    pub attachments: Vec<AttachmentDescription>,
    pub subpasses: Vec<SubpassDescription>,
    pub dependencies: Vec<SubpassDependency>,
}

impl RenderPass {
    pub fn make(
        attachments: Vec<AttachmentDescription>,
        subpasses: Vec<SubpassDescription>,
        dependencies: Vec<SubpassDependency>,
    ) -> RenderPass {
        RenderPass { attachments, subpasses, dependencies }
    }

    /// A single-subpass render pass over one color attachment, the shape the
    /// demo's pipeline uses.
    pub fn single_color_attachment(format: Format) -> RenderPass {
        RenderPass {
            attachments: vec![AttachmentDescription {
                format,
                samples: 1,
                load_op: AttachmentLoadOp::Clear,
                store_op: AttachmentStoreOp::Store,
            }],
            subpasses: vec![SubpassDescription {
                input_attachments: Vec::new(),
                color_attachments: vec![AttachmentReference { attachment: 0 }],
                resolve_attachments: Vec::new(),
            }],
            dependencies: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_color_attachment_has_one_subpass_referencing_attachment_zero() {
        let pass = RenderPass::single_color_attachment(Format::B8G8R8A8Unorm);
        assert_eq!(pass.attachments.len(), 1);
        assert_eq!(pass.subpasses.len(), 1);
        assert_eq!(pass.subpasses[0].color_attachments[0].attachment, 0);
    }
}
