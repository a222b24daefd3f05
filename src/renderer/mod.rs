pub mod atlas;
pub mod frame;
pub mod pipeline;
pub mod utils;

use std::sync::Arc;

use thiserror::Error;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use atlas::Atlas;
use pipeline::{QuadInstance, QuadPipeline, UNIT_QUAD, create_quad_pipeline, orthographic_projection};

use crate::engine::Color;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("could not create a drawing surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),
    #[error("could not open the GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("the surface reports no supported texture format")]
    NoSurfaceFormat,
}

pub struct Renderer {
    pub window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: QuadPipeline,
    projection_buffer: wgpu::Buffer,
    projection_bind_group: wgpu::BindGroup,
    atlas_bind_group: wgpu::BindGroup,
    quad_buffer: wgpu::Buffer,
    // ── Instance buffer (persistent, invalidated by FNV hash) ──────────────
    instance_buffer: Option<wgpu::Buffer>,
    /// Number of QuadInstance slots the current instance_buffer can hold.
    instance_capacity: u32,
    /// FNV-1a hash of the last uploaded instance bytes.
    instance_hash: u64,
}

/// FNV-1a 64-bit hash, used to detect unchanged instance data.
fn fnv1a_64(data: &[u8]) -> u64 {
    data.iter().fold(14695981039346656037u64, |h, &b| {
        h.wrapping_mul(1099511628211) ^ b as u64
    })
}

impl Renderer {
    pub async fn new(window: Arc<Window>, atlas_image: &image::RgbaImage) -> Result<Self, RenderError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(Arc::clone(&window))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await?;
        tracing::info!(adapter = ?adapter.get_info().name, backend = ?adapter.get_info().backend, "GPU adapter selected");

        let (device, queue) = adapter.request_device(&wgpu::DeviceDescriptor::default()).await?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or(RenderError::NoSurfaceFormat)?;
        let alpha_mode = caps.alpha_modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let pipeline = create_quad_pipeline(&device, format);
        let atlas = Atlas::upload(&device, &queue, atlas_image);

        let proj = orthographic_projection(config.width as f32, config.height as f32);
        let projection_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("projection_buffer"),
            contents: bytemuck::cast_slice(&proj),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let projection_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("projection_bg"),
            layout: &pipeline.projection_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: projection_buffer.as_entire_binding(),
            }],
        });

        let atlas_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("atlas_bg"),
            layout: &pipeline.atlas_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&atlas.texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&atlas.sampler),
                },
            ],
        });

        let quad_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("unit_quad"),
            contents: bytemuck::cast_slice(&UNIT_QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            pipeline,
            projection_buffer,
            projection_bind_group,
            atlas_bind_group,
            quad_buffer,
            instance_buffer: None,
            instance_capacity: 0,
            instance_hash: 0,
        })
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);

        let proj = orthographic_projection(new_size.width as f32, new_size.height as f32);
        self.queue.write_buffer(&self.projection_buffer, 0, bytemuck::cast_slice(&proj));
    }

    /// Reapply the current configuration after the surface was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.config.width, self.config.height)
    }

    /// Draw `instances` in order over a `clear`-coloured frame.
    ///
    /// The instance buffer is persistent: it grows to the next power of two
    /// when too small and is only rewritten when the bytes change.
    pub fn render(&mut self, instances: &[QuadInstance], clear: Color) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        if !instances.is_empty() {
            let bytes: &[u8] = bytemuck::cast_slice(instances);
            let new_hash = fnv1a_64(bytes);
            let count = instances.len() as u32;

            if count > self.instance_capacity || self.instance_buffer.is_none() {
                let capacity = count.next_power_of_two().max(256);
                self.instance_buffer = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("instance_buffer"),
                    size: capacity as u64 * std::mem::size_of::<QuadInstance>() as u64,
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                }));
                self.instance_capacity = capacity;
                self.instance_hash = !new_hash;
            }

            if new_hash != self.instance_hash {
                if let Some(buf) = &self.instance_buffer {
                    self.queue.write_buffer(buf, 0, bytes);
                }
                self.instance_hash = new_hash;
            }
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("frame") });

        {
            let [r, g, b, a] = clear.0;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("quads"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r: r as f64, g: g as f64, b: b as f64, a: a as f64 }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let Some(buf) = self.instance_buffer.as_ref().filter(|_| !instances.is_empty()) {
                let count = instances.len() as u32;
                let byte_len = count as u64 * std::mem::size_of::<QuadInstance>() as u64;
                pass.set_pipeline(&self.pipeline.render_pipeline);
                pass.set_bind_group(0, &self.projection_bind_group, &[]);
                pass.set_bind_group(1, &self.atlas_bind_group, &[]);
                pass.set_vertex_buffer(0, self.quad_buffer.slice(..));
                pass.set_vertex_buffer(1, buf.slice(..byte_len));
                pass.draw(0..UNIT_QUAD.len() as u32, 0..count);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv_differs_on_single_byte_change() {
        assert_ne!(fnv1a_64(&[0, 1, 2]), fnv1a_64(&[0, 1, 3]));
        assert_eq!(fnv1a_64(&[]), 14695981039346656037);
    }
}
