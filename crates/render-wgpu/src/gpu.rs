use crate::mesh::{PLANE_SEGMENTS, PlaneVertex, plane_mesh};
use crate::shaders;
use bytemuck::{Pod, Zeroable};
use reveal_assets::{AssetId, TextureStore};
use std::collections::BTreeMap;
use reveal_scene::{FrameView, PlaneDraw};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    resolution: [f32; 2],
    time: f32,
    progress: f32,
    corners: [f32; 4],
}

impl Globals {
    fn from_frame(frame: &FrameView) -> Self {
        Self {
            view_proj: frame.camera.view_proj.to_cols_array_2d(),
            resolution: frame.shared.resolution.to_array(),
            time: frame.shared.time,
            progress: frame.shared.progress,
            corners: frame.shared.corners.to_array(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct PlaneInstance {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    sizes: [f32; 4],
}

impl From<&PlaneDraw> for PlaneInstance {
    fn from(plane: &PlaneDraw) -> Self {
        let cols = plane.model.to_cols_array_2d();
        let q = plane.uniforms.quad_size;
        let t = plane.uniforms.texture_size;
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            sizes: [q.x, q.y, t.x, t.y],
        }
    }
}

/// wgpu renderer for the image planes.
pub struct PlaneRenderer {
    pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    textures: Vec<wgpu::BindGroup>,
    /// Gallery slot -> index into `textures`.
    slot_textures: Vec<usize>,
    fallback_texture: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    instance_buffer: wgpu::Buffer,
    max_instances: u32,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl PlaneRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals_buffer"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bind_group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("plane_texture_layout"),
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

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("plane_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("plane_pipeline_layout"),
            bind_group_layouts: &[&globals_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("plane_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::PLANE_SHADER.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("plane_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<PlaneVertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x2,
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<PlaneInstance>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            2 => Float32x4,
                            3 => Float32x4,
                            4 => Float32x4,
                            5 => Float32x4,
                            6 => Float32x4,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        // Shared plane geometry
        let (vertices, indices) = plane_mesh(PLANE_SEGMENTS, PLANE_SEGMENTS);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("plane_vertex_buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("plane_index_buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let index_count = indices.len() as u32;

        // Instance buffer (pre-allocated)
        let max_instances = 1_024u32;
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("plane_instance_buffer"),
            size: (max_instances as u64) * std::mem::size_of::<PlaneInstance>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let fallback_texture = Self::create_texture_bind_group(
            device,
            queue,
            &texture_layout,
            &sampler,
            "fallback_texture",
            1,
            1,
            &[255, 255, 255, 255],
        );

        let depth_texture = Self::create_depth_texture(device, width, height);

        Self {
            pipeline,
            globals_buffer,
            globals_bind_group,
            texture_layout,
            sampler,
            textures: Vec::new(),
            slot_textures: Vec::new(),
            fallback_texture,
            vertex_buffer,
            index_buffer,
            index_count,
            instance_buffer,
            max_instances,
            depth_texture,
            surface_format,
        }
    }

    /// Upload one texture per distinct image, replacing any previous set.
    /// Slots that repeat an image share its bind group.
    pub fn upload_textures(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        store: &TextureStore,
    ) {
        let _span = tracing::info_span!("upload_textures").entered();
        let (slot_textures, group_slots) = texture_groups(store);
        self.textures = group_slots
            .iter()
            .map(|&slot| match (store.info(slot), store.pixels(slot)) {
                (Some(info), Some(pixels)) => Self::create_texture_bind_group(
                    device,
                    queue,
                    &self.texture_layout,
                    &self.sampler,
                    &info.name,
                    info.width,
                    info.height,
                    pixels,
                ),
                _ => {
                    tracing::warn!(slot, "texture pixels missing, using fallback");
                    Self::create_texture_bind_group(
                        device,
                        queue,
                        &self.texture_layout,
                        &self.sampler,
                        "missing_texture",
                        1,
                        1,
                        &[255, 0, 255, 255],
                    )
                }
            })
            .collect();
        self.slot_textures = slot_textures;
        tracing::info!(
            slots = self.slot_textures.len(),
            textures = self.textures.len(),
            "textures uploaded"
        );
    }

    /// Number of GPU textures, one per distinct image.
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Render one frame: every plane with its own texture and instance record.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        frame: &FrameView,
    ) {
        queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::bytes_of(&Globals::from_frame(frame)),
        );

        let instances: Vec<PlaneInstance> = frame
            .planes
            .iter()
            .take(self.max_instances as usize)
            .map(PlaneInstance::from)
            .collect();
        if instances.len() < frame.planes.len() {
            tracing::warn!(
                planes = frame.planes.len(),
                max = self.max_instances,
                "plane count exceeds instance buffer, extra planes skipped"
            );
        }

        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("plane_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.05,
                            g: 0.05,
                            b: 0.06,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            if !instances.is_empty() {
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, &self.globals_bind_group, &[]);
                pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
                pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);

                for (i, plane) in frame.planes.iter().take(instances.len()).enumerate() {
                    let texture = plane
                        .element
                        .and_then(|slot| self.slot_textures.get(slot))
                        .and_then(|&group| self.textures.get(group))
                        .unwrap_or(&self.fallback_texture);
                    let instance = i as u32;
                    pass.set_bind_group(1, texture, &[]);
                    pass.draw_indexed(0..self.index_count, 0, instance..instance + 1);
                }
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    #[allow(clippy::too_many_arguments)]
    fn create_texture_bind_group(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        label: &str,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> wgpu::BindGroup {
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width: width.max(1),
                    height: height.max(1),
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            rgba,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

/// Group slots by content id. Returns the texture index of every slot and
/// the first slot of every texture.
fn texture_groups(store: &TextureStore) -> (Vec<usize>, Vec<usize>) {
    let mut by_id: BTreeMap<AssetId, usize> = BTreeMap::new();
    let mut group_slots = Vec::new();
    let slot_groups = store
        .slots()
        .iter()
        .enumerate()
        .map(|(slot, info)| {
            *by_id.entry(info.id).or_insert_with(|| {
                group_slots.push(slot);
                group_slots.len() - 1
            })
        })
        .collect();
    (slot_groups, group_slots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec2, Vec3};
    use reveal_scene::PlaneUniforms;

    #[test]
    fn globals_match_wgsl_layout() {
        // mat4 (64) + vec2 (8) + 2 x f32 (8) + vec4 (16)
        assert_eq!(std::mem::size_of::<Globals>(), 96);
        assert_eq!(std::mem::size_of::<PlaneInstance>(), 80);
    }

    #[test]
    fn instance_carries_model_and_sizes() {
        let plane = PlaneDraw {
            element: Some(2),
            model: Mat4::from_scale_rotation_translation(
                Vec3::new(200.0, 80.0, 1.0),
                glam::Quat::IDENTITY,
                Vec3::new(-250.0, 160.0, 0.0),
            ),
            uniforms: PlaneUniforms {
                quad_size: Vec2::new(200.0, 80.0),
                texture_size: Vec2::new(400.0, 160.0),
            },
        };
        let instance = PlaneInstance::from(&plane);
        assert_eq!(instance.model_0, [200.0, 0.0, 0.0, 0.0]);
        assert_eq!(instance.model_3, [-250.0, 160.0, 0.0, 1.0]);
        assert_eq!(instance.sizes, [200.0, 80.0, 400.0, 160.0]);
    }

    #[test]
    fn repeated_images_share_a_texture() {
        let mut store = TextureStore::new();
        store.push_rgba("a", 1, 1, vec![10, 20, 30, 255], None).unwrap();
        store.push_rgba("b", 1, 1, vec![40, 50, 60, 255], None).unwrap();
        store.push_rgba("a_again", 1, 1, vec![10, 20, 30, 255], None).unwrap();

        let (slot_groups, group_slots) = texture_groups(&store);
        assert_eq!(slot_groups, vec![0, 1, 0]);
        assert_eq!(group_slots, vec![0, 1]);
        assert_eq!(group_slots.len(), store.unique_count());
    }

    #[test]
    fn empty_store_has_no_textures() {
        let (slot_groups, group_slots) = texture_groups(&TextureStore::new());
        assert!(slot_groups.is_empty());
        assert!(group_slots.is_empty());
    }

    #[test]
    fn globals_from_frame() {
        use reveal_common::{Rect, Viewport};
        use reveal_scene::{FixedElements, SceneConfig, SceneSync};

        let source = FixedElements::new(vec![Rect::new(0.0, 0.0, 100.0, 100.0)]);
        let mut scene =
            SceneSync::new(SceneConfig::default(), source, Viewport::new(640.0, 480.0).unwrap())
                .unwrap();
        scene.set_progress(1.0);
        scene.tick();
        let globals = Globals::from_frame(&scene.frame_view());
        assert_eq!(globals.resolution, [640.0, 480.0]);
        assert_eq!(globals.progress, 1.0);
        assert!((globals.time - 0.05).abs() < 1e-6);
        assert!(globals.corners.iter().all(|c| (c - 1.0).abs() < 1e-5));
    }
}
