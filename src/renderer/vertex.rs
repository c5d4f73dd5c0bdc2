//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Colored vertex in normalized device coordinates
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
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Maps screen units (origin top-left, y down) to clip space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTransform {
    width: f32,
    height: f32,
}

impl ScreenTransform {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn to_ndc(&self, x: f32, y: f32) -> (f32, f32) {
        (x / self.width * 2.0 - 1.0, 1.0 - y / self.height * 2.0)
    }
}

/// Vertices queued for one frame, mapped to clip space as they arrive
#[derive(Debug, Clone)]
pub struct VertexBatch {
    transform: ScreenTransform,
    vertices: Vec<Vertex>,
}

impl VertexBatch {
    pub fn new(transform: ScreenTransform) -> Self {
        Self {
            transform,
            vertices: Vec::new(),
        }
    }

    /// Queue vertices given in screen units
    pub fn push_screen(&mut self, vertices: impl IntoIterator<Item = Vertex>) {
        let transform = self.transform;
        self.vertices.extend(vertices.into_iter().map(|v| {
            let (x, y) = transform.to_ndc(v.position[0], v.position[1]);
            Vertex::new(x, y, v.color)
        }));
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Hand over everything queued and start the next frame empty
    pub fn take(&mut self) -> Vec<Vertex> {
        std::mem::take(&mut self.vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_maps_to_clip_space() {
        let mut batch = VertexBatch::new(ScreenTransform::new(800.0, 600.0));
        batch.push_screen([Vertex::new(400.0, 300.0, [1.0; 4])]);
        let taken = batch.take();
        assert_eq!(taken[0].position, [0.0, 0.0]);
    }

    #[test]
    fn test_take_leaves_batch_empty() {
        // Whatever happens to a taken frame, its vertices never reach the next one
        let mut batch = VertexBatch::new(ScreenTransform::new(800.0, 600.0));
        batch.push_screen([Vertex::new(0.0, 0.0, [1.0; 4]); 6]);
        assert_eq!(batch.take().len(), 6);
        assert!(batch.is_empty());

        batch.push_screen([Vertex::new(0.0, 0.0, [1.0; 4]); 3]);
        assert_eq!(batch.len(), 3);
    }

    #[test]
    fn test_screen_corners_map_to_clip_corners() {
        let t = ScreenTransform::new(800.0, 600.0);
        assert_eq!(t.to_ndc(0.0, 0.0), (-1.0, 1.0));
        assert_eq!(t.to_ndc(800.0, 600.0), (1.0, -1.0));
        assert_eq!(t.to_ndc(400.0, 300.0), (0.0, 0.0));
    }
}
