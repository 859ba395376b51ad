//! The sphere render pass: per-material pipelines with depth testing.
//!
//! One pass serves all three demos. It owns three render pipelines (one per
//! [`MaterialKind`], each built from its own WGSL shader) that share a
//! single bind group arrangement:
//!
//! - **Group 0**: [`FrameUniforms`], written once per frame (view and
//!   projection matrices, camera position, elapsed time, light position).
//! - **Group 1**: [`ModelUniforms`], per draw call (model and normal
//!   matrices).
//! - **Group 2**: [`MaterialUniforms`](crate::MaterialUniforms), per draw
//!   call.
//!
//! The pass also owns a `Depth32Float` depth buffer that is recreated
//! whenever the surface size changes; call
//! [`ensure_depth_size`](SpherePass::ensure_depth_size) before starting the
//! render pass each frame.
//!
//! Back-face culling stays off: the demos render single closed spheres and
//! the water material is translucent, so there is nothing to win.

use glam::{Mat4, Vec3, Vec4};

use crate::camera::FlyCamera;
use crate::gpu::GpuContext;
use crate::material::{Material, MaterialKind};
use crate::mesh::{Mesh, Vertex3d};

/// Per-frame uniforms shared by every pipeline (bind group 0).
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    /// World-to-camera matrix.
    pub view: [[f32; 4]; 4],
    /// Projection matrix, already remapped to wgpu's 0..1 clip depth.
    pub proj: [[f32; 4]; 4],
    /// Camera world position, for specular and fresnel terms.
    pub camera_pos: [f32; 3],
    /// Elapsed seconds, consumed by the water shader.
    pub time: f32,
    /// World position of the single point light.
    pub light_pos: [f32; 3],
    pub _pad: f32,
}

/// Per-draw-call uniforms (bind group 1).
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniforms {
    /// Object-to-world matrix.
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of the model matrix, for normals.
    pub normal_matrix: [[f32; 4]; 4],
}

/// One sphere to render this frame.
pub struct DrawCall<'a> {
    pub mesh: &'a Mesh,
    /// Object-to-world transform, composed by the host from spin + location.
    pub model: Mat4,
    pub material: Material,
}

/// Remaps a projection from OpenGL's -1..1 clip depth (the convention
/// [`crate::camera::perspective`] produces) to wgpu's 0..1.
pub fn depth_correction() -> Mat4 {
    Mat4::from_cols(
        Vec4::new(1.0, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 1.0, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 0.5, 0.0),
        Vec4::new(0.0, 0.0, 0.5, 1.0),
    )
}

/// Renders shaded spheres with depth testing.
pub struct SpherePass {
    metal_pipeline: wgpu::RenderPipeline,
    matte_pipeline: wgpu::RenderPipeline,
    water_pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    material_buffer: wgpu::Buffer,
    material_bind_group: wgpu::BindGroup,
    /// View into the depth texture for render pass attachment.
    pub depth_view: wgpu::TextureView,
    depth_texture: wgpu::Texture,
    depth_size: (u32, u32),
}

impl SpherePass {
    /// Creates the pass: three pipelines, the three uniform buffers and
    /// bind groups, and a depth buffer sized to the current surface.
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        let uniform_layout_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let make_uniform = |label: &str, size: u64| {
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(label),
                entries: &[uniform_layout_entry(0)],
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
            (buffer, layout, bind_group)
        };

        let (frame_buffer, frame_layout, frame_bind_group) = make_uniform(
            "Frame Uniforms",
            std::mem::size_of::<FrameUniforms>() as u64,
        );
        let (model_buffer, model_layout, model_bind_group) = make_uniform(
            "Model Uniforms",
            std::mem::size_of::<ModelUniforms>() as u64,
        );
        let (material_buffer, material_layout, material_bind_group) = make_uniform(
            "Material Uniforms",
            std::mem::size_of::<crate::MaterialUniforms>() as u64,
        );

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sphere Pipeline Layout"),
            bind_group_layouts: &[&frame_layout, &model_layout, &material_layout],
            push_constant_ranges: &[],
        });

        let build_pipeline = |label: &str, source: &str, blend: wgpu::BlendState| {
            let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            });
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs"),
                    buffers: &[Vertex3d::LAYOUT],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: gpu.config.format,
                        blend: Some(blend),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: wgpu::TextureFormat::Depth32Float,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let metal_pipeline = build_pipeline(
            "Metal Pipeline",
            include_str!("shaders/metal.wgsl"),
            wgpu::BlendState::REPLACE,
        );
        let matte_pipeline = build_pipeline(
            "Matte Pipeline",
            include_str!("shaders/matte.wgsl"),
            wgpu::BlendState::REPLACE,
        );
        let water_pipeline = build_pipeline(
            "Water Pipeline",
            include_str!("shaders/water.wgsl"),
            wgpu::BlendState::ALPHA_BLENDING,
        );

        let (depth_texture, depth_view) = Self::create_depth_texture(gpu);

        Self {
            metal_pipeline,
            matte_pipeline,
            water_pipeline,
            frame_buffer,
            frame_bind_group,
            model_buffer,
            model_bind_group,
            material_buffer,
            material_bind_group,
            depth_view,
            depth_texture,
            depth_size: (gpu.width(), gpu.height()),
        }
    }

    fn create_depth_texture(gpu: &GpuContext) -> (wgpu::Texture, wgpu::TextureView) {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (texture, view)
    }

    /// Recreates the depth buffer if the surface was resized.
    pub fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            let (texture, view) = Self::create_depth_texture(gpu);
            self.depth_texture = texture;
            self.depth_view = view;
            self.depth_size = (gpu.width(), gpu.height());
        }
    }

    fn pipeline(&self, kind: MaterialKind) -> &wgpu::RenderPipeline {
        match kind {
            MaterialKind::Metal => &self.metal_pipeline,
            MaterialKind::Matte => &self.matte_pipeline,
            MaterialKind::Water => &self.water_pipeline,
        }
    }

    /// Renders the frame's draw calls.
    ///
    /// Frame uniforms are written once; model and material uniforms are
    /// rewritten per draw call, which is fine at demo scale (one sphere)
    /// but would need per-object buffers for real instance counts.
    pub fn render(
        &self,
        gpu: &GpuContext,
        render_pass: &mut wgpu::RenderPass,
        camera: &FlyCamera,
        time: f32,
        light_pos: Vec3,
        draw_calls: &[DrawCall],
    ) {
        if draw_calls.is_empty() {
            return;
        }

        let frame_uniforms = FrameUniforms {
            view: camera.view_matrix().to_cols_array_2d(),
            proj: (depth_correction() * camera.projection_matrix()).to_cols_array_2d(),
            camera_pos: camera.position().to_array(),
            time,
            light_pos: light_pos.to_array(),
            _pad: 0.0,
        };
        gpu.queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::cast_slice(&[frame_uniforms]),
        );

        render_pass.set_bind_group(0, &self.frame_bind_group, &[]);

        for call in draw_calls {
            let model_uniforms = ModelUniforms {
                model: call.model.to_cols_array_2d(),
                normal_matrix: call.model.inverse().transpose().to_cols_array_2d(),
            };
            gpu.queue.write_buffer(
                &self.model_buffer,
                0,
                bytemuck::cast_slice(&[model_uniforms]),
            );
            gpu.queue.write_buffer(
                &self.material_buffer,
                0,
                bytemuck::cast_slice(&[call.material.uniforms()]),
            );

            render_pass.set_pipeline(self.pipeline(call.material.kind()));
            render_pass.set_bind_group(1, &self.model_bind_group, &[]);
            render_pass.set_bind_group(2, &self.material_bind_group, &[]);
            render_pass.set_vertex_buffer(0, call.mesh.vertex_buffer.slice(..));
            render_pass
                .set_index_buffer(call.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..call.mesh.index_count, 0, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::perspective;

    #[test]
    fn uniform_blocks_match_wgsl_layout() {
        // Two mat4 + two vec4-sized tails.
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 160);
        assert_eq!(std::mem::size_of::<ModelUniforms>(), 128);
        assert_eq!(std::mem::size_of::<crate::MaterialUniforms>(), 32);
    }

    #[test]
    fn depth_correction_remaps_clip_range() {
        let proj = depth_correction() * perspective(60.0, 1.0, 0.01, 1000.0);
        let near = proj * Vec4::new(0.0, 0.0, -0.01, 1.0);
        let far = proj * Vec4::new(0.0, 0.0, -1000.0, 1.0);
        // wgpu clip space: near plane at depth 0, far plane at 1.
        assert!((near.z / near.w).abs() < 1e-4);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }
}
