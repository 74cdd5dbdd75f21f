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

//! `Image`: descriptor (format, extent, tiling, usage, layout, sample
//! count, mip/array count) plus a memory region whose stride the image
//! exposes for linear tilings (spec §3). `Image` owns its backing memory
//! when created with the "allocate memory" tag (§3's ownership rule); this
//! crate only ever constructs images that way, so `Image::make` always
//! allocates.

use crate::format::Format;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageTiling {
    Linear,
    Optimal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Extent2D {
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageUsage {
    pub color_attachment: bool,
    pub transfer_src: bool,
}

/// A single-mip, single-array-layer, linear-tiling color image: the shape
/// the demo renders into before writing it out as a BMP.
pub struct Image {
    pub format: Format,
    pub extent: Extent2D,
    pub tiling: ImageTiling,
    pub usage: ImageUsage,
    pub row_stride: usize,
    pub memory: Vec<u8>,
}

impl Image {
    pub fn make(format: Format, extent: Extent2D, usage: ImageUsage) -> Image {
        let row_stride = extent.width as usize * format.size();
        let memory = vec![0u8; row_stride * extent.height as usize];
        Image { format, extent, tiling: ImageTiling::Linear, usage, row_stride, memory }
    }

    pub fn pixel_offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.row_stride + x as usize * self.format.size()
    }

    pub fn write_pixel(&mut self, x: u32, y: u32, color: [f32; 4]) {
        let offset = self.pixel_offset(x, y);
        let size = self.format.size();
        self.format.encode(color, &mut self.memory[offset..offset + size]);
    }

    pub fn read_pixel(&self, x: u32, y: u32) -> [f32; 4] {
        let offset = self.pixel_offset(x, y);
        let size = self.format.size();
        self.format.decode(&self.memory[offset..offset + size])
    }

    /// Fills every pixel with `color`, the way the demo clears its color
    /// attachment to opaque gray before `GraphicsPipeline::run`.
    pub fn clear(&mut self, color: [f32; 4]) {
        for y in 0..self.extent.height {
            for x in 0..self.extent.width {
                self.write_pixel(x, y, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_pixel_round_trips() {
        let mut image = Image::make(
            Format::B8G8R8A8Unorm,
            Extent2D { width: 4, height: 3 },
            ImageUsage { color_attachment: true, transfer_src: true },
        );
        image.write_pixel(2, 1, [0.5, 0.25, 0.75, 1.0]);
        let color = image.read_pixel(2, 1);
        assert!((color[0] - 0.5).abs() < 0.01);
        assert!((color[1] - 0.25).abs() < 0.01);
        assert!((color[2] - 0.75).abs() < 0.01);
    }

    #[test]
    fn row_stride_matches_width_times_pixel_size() {
        let image = Image::make(
            Format::R8G8B8A8Unorm,
            Extent2D { width: 8, height: 6 },
            ImageUsage { color_attachment: true, transfer_src: false },
        );
        assert_eq!(image.row_stride, 32);
        assert_eq!(image.memory.len(), 32 * 6);
    }
}
