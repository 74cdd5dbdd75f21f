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

//! The two error channels spec §7 describes. `CoreError` is this driver's
//! internal, idiomatic-Rust error; `CResult` is the `VkResult`-shaped
//! `#[repr(i32)]` value every `extern "C"` entry point returns. The `From`
//! impl performs the fold §7 mandates: "Out-of-memory in any sub-call MUST
//! propagate as host-memory-exhaustion."

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i32)]
pub enum CResult {
    Success = 0,
    ErrorOutOfHostMemory = -1,
    ErrorOutOfDeviceMemory = -2,
    ErrorInitializationFailed = -3,
    ErrorDeviceLost = -4,
    ErrorExtensionNotPresent = -7,
    ErrorFeatureNotPresent = -8,
    ErrorIncompatibleDriver = -9,
    ErrorUnknown = -13,
}

#[derive(Debug)]
pub enum CoreError {
    OutOfHostMemory,
    OutOfDeviceMemory,
    InitializationFailed(String),
    DeviceLost,
    ExtensionNotPresent(String),
    FeatureNotPresent,
    IncompatibleDriver,
    Pipeline(swvk_pipeline::PipelineError),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::OutOfHostMemory => write!(f, "out of host memory"),
            CoreError::OutOfDeviceMemory => write!(f, "out of device memory"),
            CoreError::InitializationFailed(m) => write!(f, "initialization failed: {}", m),
            CoreError::DeviceLost => write!(f, "device lost"),
            CoreError::ExtensionNotPresent(name) => write!(f, "extension not present: {}", name),
            CoreError::FeatureNotPresent => write!(f, "feature not present"),
            CoreError::IncompatibleDriver => write!(f, "incompatible driver"),
            CoreError::Pipeline(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<swvk_pipeline::PipelineError> for CoreError {
    fn from(e: swvk_pipeline::PipelineError) -> CoreError {
        CoreError::Pipeline(e)
    }
}

impl From<CoreError> for CResult {
    fn from(e: CoreError) -> CResult {
        match e {
            CoreError::OutOfHostMemory => CResult::ErrorOutOfHostMemory,
            CoreError::OutOfDeviceMemory => CResult::ErrorOutOfDeviceMemory,
            CoreError::InitializationFailed(_) => CResult::ErrorInitializationFailed,
            CoreError::DeviceLost => CResult::ErrorDeviceLost,
            CoreError::ExtensionNotPresent(_) => CResult::ErrorExtensionNotPresent,
            CoreError::FeatureNotPresent => CResult::ErrorFeatureNotPresent,
            CoreError::IncompatibleDriver => CResult::ErrorIncompatibleDriver,
            CoreError::Pipeline(_) => CResult::ErrorInitializationFailed,
        }
    }
}

/// Runs `body` and folds any error into a `CResult`, the Rust expression of
/// §7's "exceptions must not propagate across the ABI" (`catch_exceptions_and_return_result`
/// in the original's `vulkan_icd.h`): every entry point's body is a
/// `Result`-returning function, and this is the one place that adapts it to
/// the C ABI's integer return.
pub fn catch_and_return_result(body: impl FnOnce() -> Result<(), CoreError>) -> CResult {
    match body() {
        Ok(()) => CResult::Success,
        Err(e) => {
            log::error!("{}", e);
            e.into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_not_present_folds_to_the_matching_cresult() {
        let result: CResult = CoreError::ExtensionNotPresent("VK_KHR_example".to_string()).into();
        assert_eq!(result, CResult::ErrorExtensionNotPresent);
    }

    #[test]
    fn catch_and_return_result_maps_ok_to_success() {
        assert_eq!(catch_and_return_result(|| Ok(())), CResult::Success);
    }
}
