//! Shape tessellation for 2D primitives
//!
//! Shapes are produced in screen units; the renderer maps them to clip space.

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;

/// Segment count that keeps a circle of `radius` looking round
pub fn circle_segments(radius: f32) -> u32 {
    ((radius * 1.5) as u32).clamp(6, 64)
}

/// Generate vertices for a filled circle (triangle fan as a list)
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

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

/// Generate vertices for a filled axis-aligned rectangle
pub fn rect(min: Vec2, max: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    [
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_vertices_on_rim() {
        let center = Vec2::new(50.0, 40.0);
        let verts = circle(center, 10.0, [1.0; 4], 12);
        assert_eq!(verts.len(), 36);
        for tri in verts.chunks(3) {
            assert_eq!(tri[0].position, [50.0, 40.0]);
            for v in &tri[1..] {
                let d = Vec2::from(v.position) - center;
                assert!((d.length() - 10.0).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_segment_count_bounds() {
        assert_eq!(circle_segments(0.5), 6);
        assert_eq!(circle_segments(20.0), 30);
        assert_eq!(circle_segments(1000.0), 64);
    }
}
