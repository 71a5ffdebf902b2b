//! A flat wgpu renderer for the compositor.
//!
//! Every drawable is drawn as the screen rectangle its bounding box
//! projects to, tinted by its color and darkened with distance. Highlighted
//! objects get an outline. That is enough to play a scene end to end; a
//! richer renderer plugs in through [`RenderBackend`].

use std::sync::Arc;

use glam::{Vec2, Vec4Swizzles};
use winit::window::Window;

use crate::compositor::{RenderBackend, Viewport, WorldPass};
use crate::draw2d::{Canvas, Color, DrawSurface, Rect};
use crate::error::Result;
use crate::gpu::GpuContext;
use crate::quad_pass::{QuadBatch, QuadPass};
use crate::scene_index::Drawable;

const OUTLINE_WIDTH: f32 = 3.0;
/// Distance at which shading reaches its darkest.
const FOG_DISTANCE: f32 = 40.0;

/// Screen rectangle of `drawable` within the pass viewport, and its mean
/// view depth. `None` when it is entirely behind the camera or off-screen.
pub fn project_drawable(pass: &WorldPass<'_>, drawable: &Drawable) -> Option<(Rect, f32)> {
    let view_proj = pass.camera.view_projection(pass.aspect);
    let viewport = pass.viewport.rect;

    let mut min = Vec2::splat(f32::INFINITY);
    let mut max = Vec2::splat(f32::NEG_INFINITY);
    let mut depth = 0.0;
    let mut count = 0;

    for corner in drawable.bounds.corners(&drawable.transform) {
        let clip = view_proj * corner.extend(1.0);
        if clip.w <= pass.camera.near {
            continue;
        }
        let ndc = clip.xy() / clip.w;
        let pixel = viewport.min()
            + Vec2::new(
                (ndc.x + 1.0) * 0.5 * viewport.width,
                (1.0 - ndc.y) * 0.5 * viewport.height,
            );
        min = min.min(pixel);
        max = max.max(pixel);
        depth += clip.w;
        count += 1;
    }

    if count == 0 {
        return None;
    }
    let rect = Rect::from_corners(min, max).intersect(&viewport)?;
    Some((rect, depth / count as f32))
}

/// Paint one world pass, far to near, onto `surface`.
pub fn paint_world(pass: &WorldPass<'_>, surface: &mut dyn DrawSurface) {
    let mut projected: Vec<(Rect, f32, &Drawable)> = pass
        .drawables
        .iter()
        .filter_map(|d| project_drawable(pass, d).map(|(rect, depth)| (rect, depth, d)))
        .collect();
    projected.sort_by(|a, b| b.1.total_cmp(&a.1));

    for (rect, depth, drawable) in &projected {
        let shade = 1.0 - (depth / FOG_DISTANCE).clamp(0.0, 0.6);
        let c = drawable.color;
        surface.fill_rect(*rect, Color::rgba(c.r * shade, c.g * shade, c.b * shade, c.a));
    }

    for (rect, _, drawable) in &projected {
        if drawable
            .object
            .is_some_and(|id| pass.highlight.contains(&id))
        {
            surface.stroke_rect(*rect, Color::HIGHLIGHT, OUTLINE_WIDTH);
        }
    }
}

/// [`RenderBackend`] drawing to a window surface.
pub struct WgpuBackend {
    gpu: GpuContext,
    quads: QuadPass,
    batch: QuadBatch,
    background: Color,
}

impl WgpuBackend {
    pub fn new(window: Arc<Window>) -> Result<Self> {
        let gpu = GpuContext::new(window)?;
        let quads = QuadPass::new(&gpu);
        Ok(Self {
            gpu,
            quads,
            batch: QuadBatch::new(),
            background: Color::BLACK,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
    }

    pub fn gpu(&self) -> &GpuContext {
        &self.gpu
    }

    fn present(&mut self) {
        let output = match self.gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("surface lost, reconfiguring");
                self.gpu.surface.configure(&self.gpu.device, &self.gpu.config);
                return;
            }
            Err(err) => {
                tracing::warn!("skipping frame: {}", err);
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.quads.prepare(&self.gpu, &self.batch);

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });
        {
            let bg = self.background;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Frame Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: bg.r as f64,
                            g: bg.g as f64,
                            b: bg.b as f64,
                            a: bg.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.quads.render(&mut pass);
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

impl RenderBackend for WgpuBackend {
    fn begin_frame(&mut self, _size: Vec2, background: Color) {
        self.background = background;
        self.batch.clear();
    }

    fn render_world(&mut self, pass: &WorldPass<'_>) {
        self.batch.set_clip(Some(pass.viewport.rect));
        paint_world(pass, &mut self.batch);
    }

    fn composite_overlay(&mut self, viewport: &Viewport, canvas: &Canvas) {
        self.batch.set_clip(Some(viewport.rect));
        canvas.replay(&mut self.batch, viewport.rect.min());
    }

    fn end_frame(&mut self) {
        self.batch.set_clip(None);
        self.present();
    }
}
