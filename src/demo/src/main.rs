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

//! `demo`: spec §6's CLI contract `demo [<vertex.spv> <fragment.spv>
//! <mesh.obj>]`, exercising exactly the entry points §1's "Explicitly OUT
//! OF SCOPE" bullet 3 names end-to-end: instance create, physical-device
//! enumeration, device create, shader-module create, pipeline-layout
//! create, render-pass create, graphics-pipeline create, and the software
//! `run` path. Produces `output.bmp`.

mod mesh;

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::fs;

use swvk::{DeviceQueueCreateInfo, IcdFrontEnd};
use swvk_pipeline::{
    ColorBlendAttachmentState, ColorBlendState, CullMode, Extent2D as ImageExtent2D, Format, FrontFace, Image, ImageUsage, MultisampleState, Offset2D,
    PipelineLayout, PolygonMode, PrimitiveTopology, RasterizationState, Rect2D, RenderPass, Viewport, VertexInputAttribute, VertexInputBinding,
};

const DEFAULT_VERTEX_SHADER: &str = "test-files/tri.vert.spv";
const DEFAULT_FRAGMENT_SHADER: &str = "test-files/tri.frag.spv";
const DEFAULT_MESH: &str = "test-files/demo-text.obj";

const WINDOW_WIDTH: u32 = 1024;
const WINDOW_HEIGHT: u32 = WINDOW_WIDTH * 3 / 4;

#[derive(Debug)]
struct UsageError;

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "usage: demo [<file.vert.spv> <file.frag.spv> <vertexes.obj>]")
    }
}

impl Error for UsageError {}

struct Args {
    vertex_shader: String,
    fragment_shader: String,
    mesh: String,
}

fn parse_args(argv: &[String]) -> Result<Args, UsageError> {
    if argv.is_empty() {
        return Ok(Args { vertex_shader: DEFAULT_VERTEX_SHADER.to_string(), fragment_shader: DEFAULT_FRAGMENT_SHADER.to_string(), mesh: DEFAULT_MESH.to_string() });
    }
    if argv.len() != 3 || argv.iter().any(|a| a.starts_with('-')) {
        return Err(UsageError);
    }
    Ok(Args { vertex_shader: argv[0].clone(), fragment_shader: argv[1].clone(), mesh: argv[2].clone() })
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    log::info!("loading {}, {}, {}", args.vertex_shader, args.fragment_shader, args.mesh);
    let vertex_bytes = fs::read(&args.vertex_shader)?;
    let fragment_bytes = fs::read(&args.fragment_shader)?;
    let mesh_text = fs::read_to_string(&args.mesh)?;
    let vertexes = mesh::load_wavefront_obj(&args.mesh, &mesh_text)?;
    log::info!("loaded {} vertexes", vertexes.len());

    let mut driver = IcdFrontEnd::new();
    let instance = driver.create_instance(&[])?;
    let _physical_devices = driver.enumerate_physical_devices(instance)?;
    let device = driver.create_device(instance, &[DeviceQueueCreateInfo { queue_family_index: 0, queue_count: 1 }])?;

    let vertex_shader = driver.create_shader_module(&vertex_bytes)?;
    let fragment_shader = driver.create_shader_module(&fragment_bytes)?;
    let layout = driver.create_pipeline_layout(PipelineLayout::empty());
    let render_pass = driver.create_render_pass(RenderPass::single_color_attachment(Format::B8G8R8A8Unorm));

    let vertex_input_buffer_binding: u32 = 0;
    let vertex_bindings = vec![VertexInputBinding { binding: vertex_input_buffer_binding, stride: std::mem::size_of::<mesh::VertexInputStruct>() as u32 }];
    let vertex_attributes = vec![VertexInputAttribute { location: 0, binding: vertex_input_buffer_binding, format: Format::R32G32B32A32Sfloat, offset: 0 }];

    let viewport = Viewport { x: 0.0, y: 0.0, width: WINDOW_WIDTH as f32, height: WINDOW_HEIGHT as f32, min_depth: 0.0, max_depth: 1.0 };
    let scissor = Rect2D { offset: Offset2D { x: 0, y: 0 }, extent: ImageExtent2D { width: WINDOW_WIDTH, height: WINDOW_HEIGHT } };
    let rasterization_state =
        RasterizationState { cull_mode: CullMode::None, front_face: FrontFace::CounterClockwise, polygon_mode: PolygonMode::Fill };
    let multisample_state = MultisampleState::default();
    let color_blend_state = ColorBlendState { attachments: vec![ColorBlendAttachmentState { blend_enable: false }] };

    let pipeline_handle = driver.create_graphics_pipelines(
        vertex_shader,
        fragment_shader,
        layout,
        render_pass,
        "main".to_string(),
        "main".to_string(),
        vertex_bindings,
        vertex_attributes,
        PrimitiveTopology::TriangleList,
        viewport,
        scissor,
        rasterization_state,
        multisample_state,
        color_blend_state,
    )?;
    let pipeline = driver.pipeline(pipeline_handle).expect("just created");

    let mut color_attachment = Image::make(
        Format::B8G8R8A8Unorm,
        ImageExtent2D { width: WINDOW_WIDTH, height: WINDOW_HEIGHT },
        ImageUsage { color_attachment: true, transfer_src: true },
    );
    color_attachment.clear([0.25, 0.25, 0.25, 1.0]);

    let vertex_start: u32 = 0;
    let vertex_end: u32 = vertexes.len() as u32;
    let instance_id: u32 = 0;
    let mut bindings: HashMap<u32, &[u8]> = HashMap::new();
    let vertex_bytes_slice: &[u8] = unsafe { std::slice::from_raw_parts(vertexes.as_ptr() as *const u8, vertexes.len() * std::mem::size_of::<mesh::VertexInputStruct>()) };
    bindings.insert(vertex_input_buffer_binding, vertex_bytes_slice);

    pipeline.run(vertex_start, vertex_end, instance_id, &mut color_attachment, &bindings);

    let output_file = "output.bmp";
    save_bmp(output_file, &color_attachment)?;
    eprintln!("saved output image to {}", output_file);

    driver.destroy_pipeline(pipeline_handle);
    driver.device_wait_idle(device)?;
    driver.destroy_device(device)?;
    driver.destroy_instance(instance);
    Ok(())
}

/// §6's "standard uncompressed BGRA 8-8-8-8" image output, written with
/// the `image` crate the way `gfx-rs-gfx`'s own examples do
/// (`image::save_buffer(path, &data, w, h, image::ColorType::RGBA(8))` in
/// `examples/gamma/main.rs`), after converting the color attachment's
/// native BGRA byte order into the RGBA order `image` expects.
fn save_bmp(path: &str, image: &Image) -> Result<(), Box<dyn Error>> {
    let width = image.extent.width;
    let height = image.extent.height;
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let offset = image.pixel_offset(x, y);
            let pixel = &image.memory[offset..offset + 4];
            rgba.extend_from_slice(&[pixel[2], pixel[1], pixel[0], pixel[3]]);
        }
    }
    image::save_buffer(path, &rgba, width, height, image::ColorType::RGBA(8))?;
    Ok(())
}

fn main() {
    env_logger::init();
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&argv) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_falls_back_to_bundled_defaults() {
        let args = parse_args(&[]).unwrap();
        assert_eq!(args.vertex_shader, DEFAULT_VERTEX_SHADER);
        assert_eq!(args.fragment_shader, DEFAULT_FRAGMENT_SHADER);
        assert_eq!(args.mesh, DEFAULT_MESH);
    }

    #[test]
    fn three_arguments_are_accepted_verbatim() {
        let argv = vec!["v.spv".to_string(), "f.spv".to_string(), "m.obj".to_string()];
        let args = parse_args(&argv).unwrap();
        assert_eq!(args.vertex_shader, "v.spv");
        assert_eq!(args.fragment_shader, "f.spv");
        assert_eq!(args.mesh, "m.obj");
    }

    #[test]
    fn wrong_argument_count_is_a_usage_error() {
        let argv = vec!["only-one".to_string()];
        assert!(parse_args(&argv).is_err());
    }

    #[test]
    fn an_argument_starting_with_a_dash_is_a_usage_error() {
        let argv = vec!["-h".to_string(), "f.spv".to_string(), "m.obj".to_string()];
        assert!(parse_args(&argv).is_err());
    }

    #[test]
    fn window_height_is_three_quarters_of_width_and_width_is_a_multiple_of_four() {
        assert_eq!(WINDOW_WIDTH % 4, 0);
        assert_eq!(WINDOW_HEIGHT, WINDOW_WIDTH * 3 / 4);
    }
}
