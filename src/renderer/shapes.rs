//! Shape generation for 2D primitives
//!
//! All shapes are triangle lists in canvas pixels (y down).

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Quad with one colour per corner: top-left, top-right, bottom-right, bottom-left
pub fn quad(corners: [Vec2; 4], colors: [[f32; 4]; 4]) -> [Vertex; 6] {
    let v = |i: usize| Vertex::new(corners[i].x, corners[i].y, colors[i]);
    [v(0), v(1), v(2), v(0), v(2), v(3)]
}

/// Axis-aligned filled rectangle
pub fn rect(x: f32, y: f32, width: f32, height: f32, color: [f32; 4]) -> [Vertex; 6] {
    quad(
        [
            Vec2::new(x, y),
            Vec2::new(x + width, y),
            Vec2::new(x + width, y + height),
            Vec2::new(x, y + height),
        ],
        [color; 4],
    )
}

/// Rectangle with a vertical gradient
pub fn gradient_rect(x: f32, y: f32, width: f32, height: f32, top: [f32; 4], bottom: [f32; 4]) -> [Vertex; 6] {
    quad(
        [
            Vec2::new(x, y),
            Vec2::new(x + width, y),
            Vec2::new(x + width, y + height),
            Vec2::new(x, y + height),
        ],
        [top, top, bottom, bottom],
    )
}

pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) -> [Vertex; 3] {
    [
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
    ]
}

/// Thick straight line between two points
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> [Vertex; 6] {
    let dir = (to - from).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    quad([from + perp, to + perp, to - perp, from - perp], [color; 4])
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}
