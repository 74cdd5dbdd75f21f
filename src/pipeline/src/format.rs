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

//! Pixel and vertex-attribute formats: just enough of the format enum to
//! decode a vertex attribute (spec §4.8: "decode them according to the
//! attribute's format") and to write a pixel into a color attachment in its
//! declared format.

/// A scoped subset of `VkFormat`: the vertex-attribute and color-attachment
/// formats the demo exercises.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    R32Sfloat,
    R32G32Sfloat,
    R32G32B32Sfloat,
    R32G32B32A32Sfloat,
    R8G8B8A8Unorm,
    B8G8R8A8Unorm,
}

impl Format {
    pub fn size(self) -> usize {
        match self {
            Format::R32Sfloat => 4,
            Format::R32G32Sfloat => 8,
            Format::R32G32B32Sfloat => 12,
            Format::R32G32B32A32Sfloat => 16,
            Format::R8G8B8A8Unorm => 4,
            Format::B8G8R8A8Unorm => 4,
        }
    }

    pub fn component_count(self) -> usize {
        match self {
            Format::R32Sfloat => 1,
            Format::R32G32Sfloat => 2,
            Format::R32G32B32Sfloat => 3,
            Format::R32G32B32A32Sfloat => 4,
            Format::R8G8B8A8Unorm => 4,
            Format::B8G8R8A8Unorm => 4,
        }
    }

    /// Decodes `self.size()` bytes at the front of `bytes` into up to four
    /// floating-point components, zero-extended / one-extended the way
    /// `VkFormat`'s unused channels are defined to read (alpha defaults to
    /// 1.0, everything else to 0.0).
    pub fn decode(self, bytes: &[u8]) -> [f32; 4] {
        let mut out = [0.0, 0.0, 0.0, 1.0];
        match self {
            Format::R32Sfloat => {
                out[0] = f32::from_le_bytes(bytes[0..4].try_into().unwrap());
            }
            Format::R32G32Sfloat => {
                out[0] = f32::from_le_bytes(bytes[0..4].try_into().unwrap());
                out[1] = f32::from_le_bytes(bytes[4..8].try_into().unwrap());
            }
            Format::R32G32B32Sfloat => {
                out[0] = f32::from_le_bytes(bytes[0..4].try_into().unwrap());
                out[1] = f32::from_le_bytes(bytes[4..8].try_into().unwrap());
                out[2] = f32::from_le_bytes(bytes[8..12].try_into().unwrap());
            }
            Format::R32G32B32A32Sfloat => {
                out[0] = f32::from_le_bytes(bytes[0..4].try_into().unwrap());
                out[1] = f32::from_le_bytes(bytes[4..8].try_into().unwrap());
                out[2] = f32::from_le_bytes(bytes[8..12].try_into().unwrap());
                out[3] = f32::from_le_bytes(bytes[12..16].try_into().unwrap());
            }
            Format::R8G8B8A8Unorm => {
                for i in 0..4 {
                    out[i] = bytes[i] as f32 / 255.0;
                }
            }
            Format::B8G8R8A8Unorm => {
                out[0] = bytes[2] as f32 / 255.0;
                out[1] = bytes[1] as f32 / 255.0;
                out[2] = bytes[0] as f32 / 255.0;
                out[3] = bytes[3] as f32 / 255.0;
            }
        }
        out
    }

    /// Writes `color`'s components into `out` (which must be `self.size()`
    /// bytes long) in this format's channel order, clamped to `[0, 1]`
    /// before quantization for the 8-bit-per-channel formats.
    pub fn encode(self, color: [f32; 4], out: &mut [u8]) {
        let clamp = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        match self {
            Format::R32Sfloat => out[0..4].copy_from_slice(&color[0].to_le_bytes()),
            Format::R32G32Sfloat => {
                out[0..4].copy_from_slice(&color[0].to_le_bytes());
                out[4..8].copy_from_slice(&color[1].to_le_bytes());
            }
            Format::R32G32B32Sfloat => {
                out[0..4].copy_from_slice(&color[0].to_le_bytes());
                out[4..8].copy_from_slice(&color[1].to_le_bytes());
                out[8..12].copy_from_slice(&color[2].to_le_bytes());
            }
            Format::R32G32B32A32Sfloat => {
                out[0..4].copy_from_slice(&color[0].to_le_bytes());
                out[4..8].copy_from_slice(&color[1].to_le_bytes());
                out[8..12].copy_from_slice(&color[2].to_le_bytes());
                out[12..16].copy_from_slice(&color[3].to_le_bytes());
            }
            Format::R8G8B8A8Unorm => {
                out[0] = clamp(color[0]);
                out[1] = clamp(color[1]);
                out[2] = clamp(color[2]);
                out[3] = clamp(color[3]);
            }
            Format::B8G8R8A8Unorm => {
                out[0] = clamp(color[2]);
                out[1] = clamp(color[1]);
                out[2] = clamp(color[0]);
                out[3] = clamp(color[3]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bgra_round_trips_through_rgba_channel_swap() {
        let format = Format::B8G8R8A8Unorm;
        let mut bytes = [0u8; 4];
        format.encode([0.2, 0.4, 0.6, 1.0], &mut bytes);
        let decoded = format.decode(&bytes);
        assert!((decoded[0] - 0.2).abs() < 0.01);
        assert!((decoded[1] - 0.4).abs() < 0.01);
        assert!((decoded[2] - 0.6).abs() < 0.01);
    }

    #[test]
    fn r32g32b32_sfloat_decodes_three_components_and_defaults_alpha() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1.0f32.to_le_bytes());
        bytes.extend_from_slice(&2.0f32.to_le_bytes());
        bytes.extend_from_slice(&3.0f32.to_le_bytes());
        let decoded = Format::R32G32B32Sfloat.decode(&bytes);
        assert_eq!(decoded, [1.0, 2.0, 3.0, 1.0]);
    }
}
