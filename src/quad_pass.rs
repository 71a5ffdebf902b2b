//! Alpha-blended screen-space quads and 8x8 bitmap text.
//!
//! [`QuadBatch`] turns drawing calls into triangles on the CPU; it implements
//! [`DrawSurface`] so the overlay canvas and the world proxy painter can both
//! draw into it. [`QuadPass`] uploads a batch and draws it in one call.

use font8x8::legacy::BASIC_LEGACY;
use glam::Vec2;

use crate::draw2d::{Color, DrawSurface, GLYPH_SIZE, Rect};
use crate::gpu::GpuContext;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl QuadVertex {
    const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<QuadVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            },
            wgpu::VertexAttribute {
                offset: 8,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x4,
            },
        ],
    };
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct QuadUniforms {
    resolution: [f32; 2],
    _padding: [f32; 2],
}

const MAX_VERTICES: usize = 65536;

/// The 8x8 bitmap of `ch`; characters outside ASCII draw as `?`.
fn glyph_for_char(ch: char) -> [u8; 8] {
    let index = ch as usize;
    if index < BASIC_LEGACY.len() {
        BASIC_LEGACY[index]
    } else {
        BASIC_LEGACY[b'?' as usize]
    }
}

/// CPU-side triangle list in pixel coordinates.
#[derive(Debug, Default)]
pub struct QuadBatch {
    vertices: Vec<QuadVertex>,
    clip: Option<Rect>,
}

impl QuadBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[QuadVertex] {
        &self.vertices
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Restrict further drawing to `clip`; `None` lifts the restriction.
    pub fn set_clip(&mut self, clip: Option<Rect>) {
        self.clip = clip;
    }

    fn push_quad(&mut self, rect: Rect, color: Color) {
        let rect = match self.clip {
            Some(clip) => match rect.intersect(&clip) {
                Some(r) => r,
                None => return,
            },
            None => rect,
        };
        if rect.width <= 0.0 || rect.height <= 0.0 || color.a <= 0.0 {
            return;
        }
        if self.vertices.len() + 6 > MAX_VERTICES {
            tracing::warn!("quad batch full, dropping geometry");
            return;
        }

        let (x0, y0) = (rect.x, rect.y);
        let (x1, y1) = (rect.x + rect.width, rect.y + rect.height);
        let color = color.to_array();
        for position in [[x0, y0], [x1, y0], [x0, y1], [x1, y0], [x1, y1], [x0, y1]] {
            self.vertices.push(QuadVertex { position, color });
        }
    }
}

impl DrawSurface for QuadBatch {
    fn clear(&mut self) {
        self.vertices.clear();
        self.clip = None;
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.push_quad(rect, color);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        let w = width.min(rect.width * 0.5).min(rect.height * 0.5).max(0.0);
        self.push_quad(Rect::new(rect.x, rect.y, rect.width, w), color);
        self.push_quad(
            Rect::new(rect.x, rect.y + rect.height - w, rect.width, w),
            color,
        );
        self.push_quad(
            Rect::new(rect.x, rect.y + w, w, rect.height - 2.0 * w),
            color,
        );
        self.push_quad(
            Rect::new(rect.x + rect.width - w, rect.y + w, w, rect.height - 2.0 * w),
            color,
        );
    }

    fn text(&mut self, position: Vec2, text: &str, color: Color, scale: f32) {
        let pixel = scale.max(0.0);
        let advance = GLYPH_SIZE * pixel;
        for (col, ch) in text.chars().enumerate() {
            let origin = position + Vec2::new(col as f32 * advance, 0.0);
            for (row, bits) in glyph_for_char(ch).iter().enumerate() {
                // One quad per horizontal run of set bits.
                let mut x = 0u32;
                while x < 8 {
                    if (bits >> x) & 1 == 0 {
                        x += 1;
                        continue;
                    }
                    let start = x;
                    while x < 8 && (bits >> x) & 1 == 1 {
                        x += 1;
                    }
                    self.push_quad(
                        Rect::new(
                            origin.x + start as f32 * pixel,
                            origin.y + row as f32 * pixel,
                            (x - start) as f32 * pixel,
                            pixel,
                        ),
                        color,
                    );
                }
            }
        }
    }
}

/// Draws a [`QuadBatch`] over whatever is already in the target.
pub struct QuadPass {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    vertex_count: u32,
}

impl QuadPass {
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Quad Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/quad.wgsl").into()),
        });

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Quad Vertex Buffer"),
            size: (MAX_VERTICES * std::mem::size_of::<QuadVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Quad Uniforms"),
            size: std::mem::size_of::<QuadUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Quad Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Quad Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Quad Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Quad Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[QuadVertex::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            vertex_buffer,
            uniform_buffer,
            bind_group,
            vertex_count: 0,
        }
    }

    /// Upload `batch` for the next [`render`](Self::render).
    pub fn prepare(&mut self, gpu: &GpuContext, batch: &QuadBatch) {
        let uniforms = QuadUniforms {
            resolution: [gpu.width() as f32, gpu.height() as f32],
            _padding: [0.0, 0.0],
        };
        gpu.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        let vertices = batch.vertices();
        if !vertices.is_empty() {
            gpu.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
        }
        self.vertex_count = vertices.len() as u32;
    }

    pub fn render(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        if self.vertex_count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..self.vertex_count, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rect_is_two_triangles() {
        let mut batch = QuadBatch::new();
        batch.fill_rect(Rect::new(1.0, 2.0, 3.0, 4.0), Color::WHITE);
        assert_eq!(batch.vertices().len(), 6);
        assert_eq!(batch.vertices()[4].position, [4.0, 6.0]);
    }

    #[test]
    fn clip_trims_and_discards() {
        let mut batch = QuadBatch::new();
        batch.set_clip(Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
        batch.fill_rect(Rect::new(5.0, 5.0, 10.0, 10.0), Color::WHITE);
        batch.fill_rect(Rect::new(20.0, 20.0, 5.0, 5.0), Color::WHITE);
        assert_eq!(batch.vertices().len(), 6);
        assert_eq!(batch.vertices()[4].position, [10.0, 10.0]);
    }

    #[test]
    fn transparent_fills_are_skipped() {
        let mut batch = QuadBatch::new();
        batch.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Color::TRANSPARENT);
        assert!(batch.is_empty());
    }

    #[test]
    fn text_draws_glyph_runs() {
        let mut batch = QuadBatch::new();
        batch.text(Vec2::ZERO, " ", Color::WHITE, 1.0);
        assert!(batch.is_empty());

        let underscore = glyph_for_char('_');
        let runs = underscore.iter().filter(|row| **row != 0).count();
        batch.text(Vec2::ZERO, "_", Color::WHITE, 2.0);
        assert!(batch.vertices().len() >= runs * 6);
        assert!(batch.vertices().iter().all(|v| v.position[0] <= 16.0));
    }

    #[test]
    fn non_ascii_falls_back_to_question_mark() {
        assert_eq!(glyph_for_char('é'), glyph_for_char('?'));
    }
}
