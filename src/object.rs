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

//! The driver object graph spec §4.9/§5 describes: "`Instance` exclusively
//! owns its `PhysicalDevice`. `Device` is exclusively owned by the client
//! handle." One physical device is reported, with one queue family
//! supporting graphics, compute, and transfer.

use crate::result::CoreError;

/// Instance-level extensions this driver advertises. §4.9: "Instance
/// creation records the client's requested extensions and validates they
/// are a subset of the driver's advertised set."
pub const SUPPORTED_INSTANCE_EXTENSIONS: &[&str] = &["VK_KHR_surface"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueueFamilyProperties {
    pub queue_count: u32,
    pub supports_graphics: bool,
    pub supports_compute: bool,
    pub supports_transfer: bool,
}

#[derive(Clone, Debug)]
pub struct PhysicalDevice {
    pub queue_families: Vec<QueueFamilyProperties>,
}

impl PhysicalDevice {
    fn the_only_device() -> PhysicalDevice {
        PhysicalDevice {
            queue_families: vec![QueueFamilyProperties { queue_count: 1, supports_graphics: true, supports_compute: true, supports_transfer: true }],
        }
    }

    pub fn memory_properties(&self) -> MemoryProperties {
        MemoryProperties { memory_type_count: 1, memory_heap_count: 1 }
    }

    pub fn format_properties(&self, format: swvk_pipeline::Format) -> FormatProperties {
        let _ = format;
        FormatProperties { linear_tiling_features: true, optimal_tiling_features: false }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryProperties {
    pub memory_type_count: u32,
    pub memory_heap_count: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormatProperties {
    pub linear_tiling_features: bool,
    pub optimal_tiling_features: bool,
}

pub struct Instance {
    pub enabled_extensions: Vec<String>,
    physical_device: PhysicalDevice,
}

impl Instance {
    /// §4.9: validates requested extensions against the advertised set,
    /// returning `ExtensionNotPresent` on the first unrecognized name.
    pub fn create(requested_extensions: &[String]) -> Result<Instance, CoreError> {
        for extension in requested_extensions {
            if !SUPPORTED_INSTANCE_EXTENSIONS.contains(&extension.as_str()) {
                return Err(CoreError::ExtensionNotPresent(extension.clone()));
            }
        }
        Ok(Instance { enabled_extensions: requested_extensions.to_vec(), physical_device: PhysicalDevice::the_only_device() })
    }

    /// §4.9: "Physical-device enumeration returns exactly one device: the
    /// software device."
    pub fn enumerate_physical_devices(&self) -> &[PhysicalDevice] {
        std::slice::from_ref(&self.physical_device)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceQueueCreateInfo {
    pub queue_family_index: u32,
    pub queue_count: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Queue {
    pub family_index: u32,
    pub index: u32,
}

/// §5: "each client call is blocking and returns after the effect is
/// complete" — there is never outstanding asynchronous work, so `idle` is
/// always true between calls; it exists to make `wait_idle`'s contract
/// (and the precondition that destroying a busy device is an error)
/// checkable rather than assumed.
pub struct Device {
    pub queues: Vec<Queue>,
    idle: bool,
}

impl Device {
    /// §4.9: "the driver supports a single queue family of one queue."
    pub fn create(physical_device: &PhysicalDevice, queue_create_infos: &[DeviceQueueCreateInfo]) -> Result<Device, CoreError> {
        let mut queues = Vec::new();
        for info in queue_create_infos {
            let family = physical_device
                .queue_families
                .get(info.queue_family_index as usize)
                .ok_or_else(|| CoreError::InitializationFailed(format!("no queue family {}", info.queue_family_index)))?;
            if info.queue_count > family.queue_count {
                return Err(CoreError::InitializationFailed(format!(
                    "queue family {} has only {} queue(s)",
                    info.queue_family_index, family.queue_count
                )));
            }
            for index in 0..info.queue_count {
                queues.push(Queue { family_index: info.queue_family_index, index });
            }
        }
        Ok(Device { queues, idle: true })
    }

    /// §4.9: "`device_wait_idle` is the explicit barrier."
    pub fn wait_idle(&mut self) {
        self.idle = true;
    }

    /// §5: "destroying a device that still has outstanding work is a
    /// precondition violation." There is no asynchronous work in this
    /// driver, so this never actually fails; it documents and checks the
    /// invariant rather than enforcing a real wait.
    pub fn destroy(self) -> Result<(), CoreError> {
        if !self.idle {
            return Err(CoreError::DeviceLost);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_instance_rejects_unknown_extension() {
        let result = Instance::create(&["VK_KHR_nonexistent".to_string()]);
        assert!(matches!(result, Err(CoreError::ExtensionNotPresent(_))));
    }

    #[test]
    fn the_one_physical_device_reports_one_queue_family_with_all_three_capabilities() {
        let instance = Instance::create(&[]).unwrap();
        let devices = instance.enumerate_physical_devices();
        assert_eq!(devices.len(), 1);
        let family = devices[0].queue_families[0];
        assert!(family.supports_graphics && family.supports_compute && family.supports_transfer);
    }

    #[test]
    fn device_create_rejects_more_queues_than_the_family_has() {
        let instance = Instance::create(&[]).unwrap();
        let physical_device = &instance.enumerate_physical_devices()[0];
        let result = Device::create(physical_device, &[DeviceQueueCreateInfo { queue_family_index: 0, queue_count: 2 }]);
        assert!(result.is_err());
    }
}
