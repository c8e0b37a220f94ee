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

/// Colors for game elements
pub mod colors {
    /// `0xRRGGBB` to RGBA
    pub const fn hex(rgb: u32, alpha: f32) -> [f32; 4] {
        [
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
            alpha,
        ]
    }

    pub const fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
        [color[0], color[1], color[2], alpha]
    }

    pub const SKY_TOP: [f32; 4] = hex(0x1a1a2e, 1.0);
    pub const SKY_BOTTOM: [f32; 4] = hex(0x0a0a0a, 1.0);
    pub const ROAD_NEAR: [f32; 4] = hex(0x111111, 1.0);
    pub const ROAD_FAR: [f32; 4] = hex(0x444444, 1.0);
    pub const ROAD_EDGE: [f32; 4] = hex(0xffffff, 1.0);
    pub const CENTER_LINE: [f32; 4] = hex(0xffff00, 1.0);
    /// Chosen branch tints
    pub const BRANCH_LEFT: [f32; 4] = hex(0x004400, 1.0);
    pub const BRANCH_RIGHT: [f32; 4] = hex(0x440000, 1.0);
    pub const SCENERY: [f32; 4] = hex(0x004400, 1.0);
    pub const WARNING: [f32; 4] = hex(0xff0040, 1.0);
    pub const SUCCESS: [f32; 4] = hex(0x00ff41, 1.0);
    pub const PLAYER_EYE: [f32; 4] = hex(0xffffff, 1.0);
    pub const BACKGROUND: [f32; 4] = hex(0x0a0a0a, 1.0);
}

#[cfg(test)]
mod tests {
    use super::colors::*;

    #[test]
    fn test_hex_channels() {
        assert_eq!(hex(0xff0000, 1.0), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(hex(0x00ff00, 0.5), [0.0, 1.0, 0.0, 0.5]);
        assert_eq!(with_alpha(WARNING, 0.25)[3], 0.25);
    }
}
