//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Scenery colors (0xRRGGBB, see `hex_to_rgba`)
pub mod colors {
    pub const SKY: u32 = 0x87ceeb;
    pub const SKY_TOP: u32 = 0x5fb4e0;
    pub const GROUND: u32 = 0x32cd32;
    /// Far to near
    pub const MOUNTAINS: [u32; 3] = [0x8b7355, 0xa0826d, 0x9b8b7e];
    pub const TRUNK: u32 = 0x654321;
    pub const FOLIAGE: u32 = 0x228b22;
    pub const CLOUD: u32 = 0xffffff;
    pub const STRING: u32 = 0x666666;
    pub const KNOT: u32 = 0x333333;
    pub const ARROW_SHAFT: u32 = 0x8b4513;
    pub const ARROW_HEAD: u32 = 0xc0c0c0;
    pub const POWER_GLOW: u32 = 0xfff59d;
}
