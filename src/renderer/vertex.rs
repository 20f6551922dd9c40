//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
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

/// Fixed colors for non-domain elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.016, 0.016, 0.04, 1.0];
    pub const STAR: [f32; 3] = [0.92, 0.94, 1.0];
    /// Chromatic-aberration ghost hues for glitch streaks
    pub const GHOST_LEFT: [f32; 3] = [1.0, 0.25, 0.35];
    pub const GHOST_RIGHT: [f32; 3] = [0.25, 0.85, 1.0];
    pub const NOISE_BLOB: [f32; 3] = [0.18, 0.16, 0.3];
}
