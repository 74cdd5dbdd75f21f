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

//! `IcdFrontEnd` (spec §4.9): the loader-negotiated entry point resolver
//! and the driver object graph. Built as both `rlib` and `cdylib`, the way
//! `gfx_device_gl` and `gfx_device_vulkanll` are each a loadable backend
//! behind `gfx_core`'s traits.
//!
//! Handles are indices into flat tables rather than boxed trait objects,
//! matching `ShaderModule`/`PipelineLayout`/`RenderPass`/`GraphicsPipeline`'s
//! shared-ownership rules in spec §3 without needing a garbage collector:
//! destroying a handle clears its table slot; a stale handle then resolves
//! to nothing rather than dangling.

pub mod entry_points;
pub mod object;
pub mod result;

use std::sync::Arc;

use swvk_pipeline::{GraphicsPipeline, GraphicsPipelineCreateInfo, PipelineLayout, RenderPass, ShaderModule};

pub use entry_points::{EntryPoint, ProcedureAddressScope};
pub use object::{Device, DeviceQueueCreateInfo, Instance, PhysicalDevice};
pub use result::{CResult, CoreError};

#[derive(Default)]
struct Table<T> {
    slots: Vec<Option<T>>,
}

impl<T> Table<T> {
    fn insert(&mut self, value: T) -> usize {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.is_none() {
                *slot = Some(value);
                return index;
            }
        }
        self.slots.push(Some(value));
        self.slots.len() - 1
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(|s| s.as_ref())
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index).and_then(|s| s.as_mut())
    }

    fn take(&mut self, index: usize) -> Option<T> {
        self.slots.get_mut(index).and_then(|s| s.take())
    }
}

macro_rules! handle_table {
    ($name:ident) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub struct $name(usize);
    };
}

handle_table!(InstanceHandle);
handle_table!(DeviceHandle);
handle_table!(ShaderModuleHandle);
handle_table!(PipelineLayoutHandle);
handle_table!(RenderPassHandle);
handle_table!(PipelineHandle);

/// Allocator callbacks: §4.9, "the source asserts that client-provided
/// allocator callbacks are null... any non-null allocator callback pointer
/// is a precondition violation." A port with a real C ABI receives these as
/// a raw pointer; this crate's boundary has already been narrowed to
/// `Option`, so the precondition is just that it's `None`.
pub fn assert_no_allocator(allocator: Option<&()>) {
    assert!(allocator.is_none(), "non-null allocator callbacks are a precondition violation");
}

/// The driver object graph: one per loaded ICD, holding every live
/// instance/device/shader-module/pipeline-layout/render-pass/pipeline.
#[derive(Default)]
pub struct IcdFrontEnd {
    instances: Table<Instance>,
    devices: Table<Device>,
    shader_modules: Table<Arc<ShaderModule>>,
    pipeline_layouts: Table<Arc<PipelineLayout>>,
    render_passes: Table<Arc<RenderPass>>,
    pipelines: Table<GraphicsPipeline>,
}

impl IcdFrontEnd {
    pub fn new() -> IcdFrontEnd {
        IcdFrontEnd::default()
    }

    pub fn create_instance(&mut self, requested_extensions: &[String]) -> Result<InstanceHandle, CoreError> {
        let instance = Instance::create(requested_extensions)?;
        Ok(InstanceHandle(self.instances.insert(instance)))
    }

    pub fn destroy_instance(&mut self, handle: InstanceHandle) {
        self.instances.take(handle.0);
    }

    pub fn enumerate_instance_extension_properties() -> &'static [&'static str] {
        object::SUPPORTED_INSTANCE_EXTENSIONS
    }

    pub fn enumerate_physical_devices(&self, handle: InstanceHandle) -> Result<&[PhysicalDevice], CoreError> {
        let instance = self.instances.get(handle.0).ok_or_else(|| CoreError::InitializationFailed("unknown instance".to_string()))?;
        Ok(instance.enumerate_physical_devices())
    }

    pub fn get_physical_device_memory_properties(&self, instance: InstanceHandle) -> Result<object::MemoryProperties, CoreError> {
        let physical_device = &self.enumerate_physical_devices(instance)?[0];
        Ok(physical_device.memory_properties())
    }

    pub fn get_physical_device_format_properties(
        &self,
        instance: InstanceHandle,
        format: swvk_pipeline::Format,
    ) -> Result<object::FormatProperties, CoreError> {
        let physical_device = &self.enumerate_physical_devices(instance)?[0];
        Ok(physical_device.format_properties(format))
    }

    pub fn create_device(&mut self, instance: InstanceHandle, queue_create_infos: &[DeviceQueueCreateInfo]) -> Result<DeviceHandle, CoreError> {
        let physical_device = &self.enumerate_physical_devices(instance)?[0];
        let device = Device::create(physical_device, queue_create_infos)?;
        Ok(DeviceHandle(self.devices.insert(device)))
    }

    pub fn destroy_device(&mut self, handle: DeviceHandle) -> Result<(), CoreError> {
        let device = self.devices.take(handle.0).ok_or_else(|| CoreError::InitializationFailed("unknown device".to_string()))?;
        device.destroy()
    }

    pub fn device_wait_idle(&mut self, handle: DeviceHandle) -> Result<(), CoreError> {
        let device = self.devices.get_mut(handle.0).ok_or_else(|| CoreError::InitializationFailed("unknown device".to_string()))?;
        device.wait_idle();
        Ok(())
    }

    pub fn create_shader_module(&mut self, bytes: &[u8]) -> Result<ShaderModuleHandle, CoreError> {
        let module = ShaderModule::make(bytes)?;
        Ok(ShaderModuleHandle(self.shader_modules.insert(module)))
    }

    /// §5: "destroying a shader module after a pipeline has taken shared
    /// ownership of it is explicitly allowed" — clearing this table slot
    /// just drops this handle's `Arc`; any pipeline's clone keeps the
    /// module alive.
    pub fn destroy_shader_module(&mut self, handle: ShaderModuleHandle) {
        self.shader_modules.take(handle.0);
    }

    pub fn create_pipeline_layout(&mut self, layout: PipelineLayout) -> PipelineLayoutHandle {
        PipelineLayoutHandle(self.pipeline_layouts.insert(Arc::new(layout)))
    }

    pub fn destroy_pipeline_layout(&mut self, handle: PipelineLayoutHandle) {
        self.pipeline_layouts.take(handle.0);
    }

    pub fn create_render_pass(&mut self, render_pass: RenderPass) -> RenderPassHandle {
        RenderPassHandle(self.render_passes.insert(Arc::new(render_pass)))
    }

    pub fn destroy_render_pass(&mut self, handle: RenderPassHandle) {
        self.render_passes.take(handle.0);
    }

    pub fn create_graphics_pipelines(
        &mut self,
        vertex_shader: ShaderModuleHandle,
        fragment_shader: ShaderModuleHandle,
        layout: PipelineLayoutHandle,
        render_pass: RenderPassHandle,
        vertex_entry_point: String,
        fragment_entry_point: String,
        vertex_bindings: Vec<swvk_pipeline::VertexInputBinding>,
        vertex_attributes: Vec<swvk_pipeline::VertexInputAttribute>,
        topology: swvk_pipeline::PrimitiveTopology,
        viewport: swvk_pipeline::Viewport,
        scissor: swvk_pipeline::Rect2D,
        rasterization_state: swvk_pipeline::RasterizationState,
        multisample_state: swvk_pipeline::MultisampleState,
        color_blend_state: swvk_pipeline::ColorBlendState,
    ) -> Result<PipelineHandle, CoreError> {
        let vertex_shader =
            self.shader_modules.get(vertex_shader.0).ok_or_else(|| CoreError::InitializationFailed("unknown vertex shader module".to_string()))?.clone();
        let fragment_shader = self
            .shader_modules
            .get(fragment_shader.0)
            .ok_or_else(|| CoreError::InitializationFailed("unknown fragment shader module".to_string()))?
            .clone();
        let layout = self.pipeline_layouts.get(layout.0).ok_or_else(|| CoreError::InitializationFailed("unknown pipeline layout".to_string()))?.clone();
        let render_pass =
            self.render_passes.get(render_pass.0).ok_or_else(|| CoreError::InitializationFailed("unknown render pass".to_string()))?.clone();

        let create_info = GraphicsPipelineCreateInfo {
            vertex_shader,
            vertex_entry_point,
            fragment_shader,
            fragment_entry_point,
            layout,
            render_pass,
            vertex_bindings,
            vertex_attributes,
            topology,
            viewport,
            scissor,
            rasterization_state,
            multisample_state,
            color_blend_state,
        };
        let pipeline = GraphicsPipeline::make((), create_info)?;
        Ok(PipelineHandle(self.pipelines.insert(pipeline)))
    }

    pub fn destroy_pipeline(&mut self, handle: PipelineHandle) {
        self.pipelines.take(handle.0);
    }

    pub fn pipeline(&self, handle: PipelineHandle) -> Option<&GraphicsPipeline> {
        self.pipelines.get(handle.0)
    }

    /// §4.9's resolver: `instance` absent means Library scope, present
    /// means Instance scope. `GetInstanceProcAddr` itself is tiered Library
    /// in `entry_points::IMPLEMENTED`, so `instance = None` intentionally
    /// also resolves `vkGetInstanceProcAddr`/`vk_icdGetInstanceProcAddr`,
    /// matching the loader ABI's self-lookup requirement.
    pub fn get_instance_proc_addr(&self, instance: Option<InstanceHandle>, name: &str) -> Option<EntryPoint> {
        let scope = if instance.is_some() { ProcedureAddressScope::Instance } else { ProcedureAddressScope::Library };
        entry_points::resolve(name, scope)
    }

    pub fn get_device_proc_addr(&self, device: DeviceHandle, name: &str) -> Option<EntryPoint> {
        let _ = self.devices.get(device.0)?;
        entry_points::resolve(name, ProcedureAddressScope::Device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_vertex_shader_bytes() -> Vec<u8> {
        // Mirrors `swvk_pipeline::shader`'s own minimal fixture: one
        // `OpEntryPoint Vertex %4 "main"` over one empty function.
        let header_word = |word_count: u16, opcode: u16| -> u32 { ((word_count as u32) << 16) | opcode as u32 };
        let mut words = vec![swvk_spirv::MAGIC_NUMBER, 0x0001_0000, 0, 5, 0];
        words.push(header_word(2, 19));
        words.push(1);
        words.push(header_word(3, 33));
        words.push(2);
        words.push(1);
        let mut name_bytes = [0u8; 4];
        name_bytes[..4].copy_from_slice(b"main");
        words.push(header_word(5, 15));
        words.push(0);
        words.push(4);
        words.push(u32::from_ne_bytes(name_bytes));
        words.push(0);
        words.push(header_word(5, 54));
        words.push(1);
        words.push(4);
        words.push(0);
        words.push(2);
        words.push(header_word(2, 248));
        words.push(5);
        words.push(header_word(1, 253));
        words.push(header_word(1, 56));
        words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    #[test]
    fn instance_and_device_lifecycle_round_trips() {
        let mut driver = IcdFrontEnd::new();
        let instance = driver.create_instance(&[]).unwrap();
        let device = driver.create_device(instance, &[DeviceQueueCreateInfo { queue_family_index: 0, queue_count: 1 }]).unwrap();
        driver.device_wait_idle(device).unwrap();
        driver.destroy_device(device).unwrap();
        driver.destroy_instance(instance);
    }

    #[test]
    fn shader_module_survives_handle_destruction_once_reflected() {
        let mut driver = IcdFrontEnd::new();
        let bytes = minimal_vertex_shader_bytes();
        let handle = driver.create_shader_module(&bytes).unwrap();
        assert!(driver.shader_modules.get(handle.0).is_some());
        driver.destroy_shader_module(handle);
        assert!(driver.shader_modules.get(handle.0).is_none());
    }

    #[test]
    fn library_scope_resolver_sees_create_instance_but_not_device_calls() {
        let driver = IcdFrontEnd::new();
        assert!(driver.get_instance_proc_addr(None, "vkCreateInstance").is_some());
        assert!(driver.get_instance_proc_addr(None, "vkCreateShaderModule").is_none());
    }

    #[test]
    fn null_instance_resolves_its_own_entry_point_for_loader_self_lookup() {
        let driver = IcdFrontEnd::new();
        assert!(driver.get_instance_proc_addr(None, "vkGetInstanceProcAddr").is_some());
        assert!(driver.get_instance_proc_addr(None, "vk_icdGetInstanceProcAddr").is_some());
    }

    #[test]
    fn device_proc_addr_requires_a_live_device_handle() {
        let mut driver = IcdFrontEnd::new();
        let instance = driver.create_instance(&[]).unwrap();
        let device = driver.create_device(instance, &[]).unwrap();
        assert!(driver.get_device_proc_addr(device, "vkCreateShaderModule").is_some());
        driver.destroy_device(device).unwrap();
        assert!(driver.get_device_proc_addr(device, "vkCreateShaderModule").is_none());
    }
}
