use crate::engine::Color;
use crate::renderer::atlas::SpriteData;
use crate::renderer::utils::Viewport;

/// Corner of the unit quad, in `[0, 1]²`.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    pub corner: [f32; 2],
}

/// Drawn as a four-vertex triangle strip.
pub const UNIT_QUAD: [QuadVertex; 4] = [
    QuadVertex { corner: [0.0, 0.0] },
    QuadVertex { corner: [1.0, 0.0] },
    QuadVertex { corner: [0.0, 1.0] },
    QuadVertex { corner: [1.0, 1.0] },
];

impl QuadVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// One textured, tinted rectangle in screen pixels.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadInstance {
    pub offset: [f32; 2],
    pub size: [f32; 2],
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
    pub color: [f32; 4],
}

impl QuadInstance {
    const ATTRIBS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        1 => Float32x2,  // offset
        2 => Float32x2,  // size
        3 => Float32x2,  // uv_min
        4 => Float32x2,  // uv_max
        5 => Float32x4,  // color
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }

    /// `sprite` stretched over `rect`, multiplied by `tint`.
    pub fn sprite(rect: Viewport, sprite: SpriteData, tint: Color) -> Self {
        Self {
            offset: [rect.x, rect.y],
            size: [rect.width, rect.height],
            uv_min: sprite.uv_min,
            uv_max: sprite.uv_max,
            color: tint.0,
        }
    }

    /// A flat fill; `white` must be the sheet's white patch.
    pub fn solid(rect: Viewport, white: SpriteData, color: Color) -> Self {
        Self::sprite(rect, white, color)
    }
}

pub struct QuadPipeline {
    pub render_pipeline: wgpu::RenderPipeline,
    pub projection_bind_group_layout: wgpu::BindGroupLayout,
    pub atlas_bind_group_layout: wgpu::BindGroupLayout,
}

pub fn create_quad_pipeline(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> QuadPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("quad_shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shaders/quad.wgsl").into()),
    });

    let projection_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("projection_bgl"),
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

    let atlas_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("atlas_bgl"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("quad_pipeline_layout"),
        bind_group_layouts: &[&projection_bind_group_layout, &atlas_bind_group_layout],
        ..Default::default()
    });

    let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("quad_pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[QuadVertex::layout(), QuadInstance::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleStrip,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    });

    QuadPipeline { render_pipeline, projection_bind_group_layout, atlas_bind_group_layout }
}

/// Orthographic projection (column-major) from window pixels, origin top-left
/// with y down, to clip space.
pub fn orthographic_projection(width: f32, height: f32) -> [f32; 16] {
    glam::Mat4::orthographic_rh(0.0, width, height, 0.0, -1.0, 1.0).to_cols_array()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(m: &[f32; 16], x: f32, y: f32) -> (f32, f32) {
        (m[0] * x + m[4] * y + m[12], m[1] * x + m[5] * y + m[13])
    }

    #[test]
    fn projection_maps_window_corners_to_clip_corners() {
        let m = orthographic_projection(512.0, 256.0);
        assert_eq!(project(&m, 0.0, 0.0), (-1.0, 1.0));
        assert_eq!(project(&m, 512.0, 256.0), (1.0, -1.0));
        assert_eq!(project(&m, 256.0, 128.0), (0.0, 0.0));
    }

    #[test]
    fn instance_layout_matches_struct_size() {
        assert_eq!(std::mem::size_of::<QuadInstance>(), 48);
        assert_eq!(QuadInstance::layout().array_stride, 48);
    }

    #[test]
    fn solid_quad_carries_rect_and_colour() {
        let white = SpriteData { uv_min: [0.0, 0.0], uv_max: [0.01, 0.01] };
        let q = QuadInstance::solid(Viewport::new(1.0, 2.0, 3.0, 4.0), white, Color::WHITE);
        assert_eq!(q.offset, [1.0, 2.0]);
        assert_eq!(q.size, [3.0, 4.0]);
        assert_eq!(q.color, [1.0; 4]);
    }
}
