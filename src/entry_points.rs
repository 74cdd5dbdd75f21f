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

//! The loader-negotiated entry point resolver (spec §4.9). "There is no
//! dynamic dispatch table; the resolver is a flat name-to-function
//! mapping." `Tier` stands in for the original's `Procedure_address_scope`
//! applicability check (`Vulkan_loader_interface::get_procedure_address`
//! in `vulkan_icd.h`): a name is visible only from the scopes that tier
//! permits, and invisible (resolves to `None`, i.e. null) everywhere else.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcedureAddressScope {
    Library,
    Instance,
    Device,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tier {
    Library,
    Instance,
    Device,
}

impl Tier {
    fn visible_from(self, scope: ProcedureAddressScope) -> bool {
        match (self, scope) {
            (Tier::Library, ProcedureAddressScope::Library) => true,
            (Tier::Library, ProcedureAddressScope::Instance) => true,
            (Tier::Instance, ProcedureAddressScope::Instance) => true,
            (Tier::Device, ProcedureAddressScope::Device) => true,
            _ => false,
        }
    }
}

/// One resolvable name per the Open-Question-1 list in `SPEC_FULL.md`:
/// Open Question 1's list plus the destroy/wait-idle/memory-properties/
/// format-properties calls needed to make §5's lifecycle observable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryPoint {
    GetInstanceProcAddr,
    GetDeviceProcAddr,
    CreateInstance,
    EnumerateInstanceExtensionProperties,
    DestroyInstance,
    EnumeratePhysicalDevices,
    GetPhysicalDeviceMemoryProperties,
    GetPhysicalDeviceFormatProperties,
    CreateDevice,
    DestroyDevice,
    DeviceWaitIdle,
    CreateShaderModule,
    DestroyShaderModule,
    CreatePipelineLayout,
    DestroyPipelineLayout,
    CreateRenderPass,
    DestroyRenderPass,
    CreateGraphicsPipelines,
    DestroyPipeline,
    /// A name the resolver recognizes but whose functionality this driver
    /// does not implement; its body always returns `ErrorFeatureNotPresent`
    /// (never silent success, per §9).
    NotImplemented,
}

const IMPLEMENTED: &[(&str, EntryPoint, Tier)] = &[
    ("vkGetInstanceProcAddr", EntryPoint::GetInstanceProcAddr, Tier::Library),
    ("vk_icdGetInstanceProcAddr", EntryPoint::GetInstanceProcAddr, Tier::Library),
    ("vkGetDeviceProcAddr", EntryPoint::GetDeviceProcAddr, Tier::Instance),
    ("vkCreateInstance", EntryPoint::CreateInstance, Tier::Library),
    ("vkEnumerateInstanceExtensionProperties", EntryPoint::EnumerateInstanceExtensionProperties, Tier::Library),
    ("vkDestroyInstance", EntryPoint::DestroyInstance, Tier::Instance),
    ("vkEnumeratePhysicalDevices", EntryPoint::EnumeratePhysicalDevices, Tier::Instance),
    ("vkGetPhysicalDeviceMemoryProperties", EntryPoint::GetPhysicalDeviceMemoryProperties, Tier::Instance),
    ("vkGetPhysicalDeviceFormatProperties", EntryPoint::GetPhysicalDeviceFormatProperties, Tier::Instance),
    ("vkCreateDevice", EntryPoint::CreateDevice, Tier::Instance),
    ("vkDestroyDevice", EntryPoint::DestroyDevice, Tier::Device),
    ("vkDeviceWaitIdle", EntryPoint::DeviceWaitIdle, Tier::Device),
    ("vkCreateShaderModule", EntryPoint::CreateShaderModule, Tier::Device),
    ("vkDestroyShaderModule", EntryPoint::DestroyShaderModule, Tier::Device),
    ("vkCreatePipelineLayout", EntryPoint::CreatePipelineLayout, Tier::Device),
    ("vkDestroyPipelineLayout", EntryPoint::DestroyPipelineLayout, Tier::Device),
    ("vkCreateRenderPass", EntryPoint::CreateRenderPass, Tier::Device),
    ("vkDestroyRenderPass", EntryPoint::DestroyRenderPass, Tier::Device),
    ("vkCreateGraphicsPipelines", EntryPoint::CreateGraphicsPipelines, Tier::Device),
    ("vkDestroyPipeline", EntryPoint::DestroyPipeline, Tier::Device),
];

/// Names a real loader commonly probes for that this driver recognizes but
/// does not implement. Anything outside both lists is entirely unknown and
/// resolves to `None`.
const RECOGNIZED_BUT_UNIMPLEMENTED: &[(&str, Tier)] = &[
    ("vkGetPhysicalDeviceProperties", Tier::Instance),
    ("vkGetPhysicalDeviceFeatures", Tier::Instance),
    ("vkGetPhysicalDeviceQueueFamilyProperties", Tier::Instance),
    ("vkEnumerateDeviceExtensionProperties", Tier::Instance),
    ("vkGetDeviceQueue", Tier::Device),
    ("vkQueueSubmit", Tier::Device),
    ("vkQueueWaitIdle", Tier::Device),
    ("vkCreateBuffer", Tier::Device),
    ("vkCreateImage", Tier::Device),
    ("vkAllocateMemory", Tier::Device),
    ("vkCreateFence", Tier::Device),
    ("vkCreateSemaphore", Tier::Device),
    ("vkCreateCommandPool", Tier::Device),
    ("vkAllocateCommandBuffers", Tier::Device),
    ("vkBeginCommandBuffer", Tier::Device),
    ("vkEndCommandBuffer", Tier::Device),
    ("vkCmdDraw", Tier::Device),
];

/// `Vulkan_loader_interface::get_procedure_address`'s Rust analogue:
/// `None` is a null function pointer, the only answer for a name outside
/// both tables or whose tier the caller's `scope` cannot see.
pub fn resolve(name: &str, scope: ProcedureAddressScope) -> Option<EntryPoint> {
    if let Some((_, entry, tier)) = IMPLEMENTED.iter().find(|(n, _, _)| *n == name) {
        return tier.visible_from(scope).then_some(*entry);
    }
    if let Some((_, tier)) = RECOGNIZED_BUT_UNIMPLEMENTED.iter().find(|(n, _)| *n == name) {
        return tier.visible_from(scope).then_some(EntryPoint::NotImplemented);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_scope_resolves_create_instance() {
        assert_eq!(resolve("vkCreateInstance", ProcedureAddressScope::Library), Some(EntryPoint::CreateInstance));
    }

    #[test]
    fn library_scope_does_not_resolve_device_level_names() {
        assert_eq!(resolve("vkCreateShaderModule", ProcedureAddressScope::Library), None);
    }

    #[test]
    fn instance_scope_resolves_device_creation_but_not_device_level_calls() {
        assert_eq!(resolve("vkCreateDevice", ProcedureAddressScope::Instance), Some(EntryPoint::CreateDevice));
        assert_eq!(resolve("vkCreateShaderModule", ProcedureAddressScope::Instance), None);
    }

    #[test]
    fn device_scope_resolves_device_level_calls() {
        assert_eq!(resolve("vkCreateShaderModule", ProcedureAddressScope::Device), Some(EntryPoint::CreateShaderModule));
    }

    #[test]
    fn recognized_but_unimplemented_name_resolves_rather_than_returning_null() {
        assert_eq!(resolve("vkQueueSubmit", ProcedureAddressScope::Device), Some(EntryPoint::NotImplemented));
    }

    #[test]
    fn completely_unknown_name_resolves_to_null() {
        assert_eq!(resolve("vkSomeFutureExtensionFunction", ProcedureAddressScope::Device), None);
    }
}
