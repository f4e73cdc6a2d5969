use std::sync::Arc;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::animation::DuckyPart;
use crate::config::*;
use crate::game::SimulationState;
use crate::level::LevelLayout;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// One box drawn with the shared unit cube.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Instance {
    model: [[f32; 4]; 4],
    color: [f32; 4],
}

impl Instance {
    const ATTRIBS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        2 => Float32x4, 3 => Float32x4, 4 => Float32x4, 5 => Float32x4, 6 => Float32x4
    ];

    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Instance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }

    pub fn new(model: Mat4, color: [f32; 3]) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: [color[0], color[1], color[2], 1.0],
        }
    }

    #[allow(dead_code)]
    pub fn model(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    // w: flashlight range
    camera_pos: [f32; 4],
    // rgb: fog colour, w: density
    fog: [f32; 4],
    // xyz: direction towards the moon, w: intensity
    moon: [f32; 4],
    // w: intensity
    flash_pos: [f32; 4],
    // w: cosine of the cone half angle
    flash_dir: [f32; 4],
    // rgb: ambient colour already scaled
    ambient: [f32; 4],
}

const VERTICES: &[Vertex] = &[
    // Front face
    Vertex { position: [-0.5, -0.5,  0.5], normal: [ 0.0,  0.0,  1.0] },
    Vertex { position: [ 0.5, -0.5,  0.5], normal: [ 0.0,  0.0,  1.0] },
    Vertex { position: [ 0.5,  0.5,  0.5], normal: [ 0.0,  0.0,  1.0] },
    Vertex { position: [-0.5,  0.5,  0.5], normal: [ 0.0,  0.0,  1.0] },
    // Back face
    Vertex { position: [-0.5, -0.5, -0.5], normal: [ 0.0,  0.0, -1.0] },
    Vertex { position: [-0.5,  0.5, -0.5], normal: [ 0.0,  0.0, -1.0] },
    Vertex { position: [ 0.5,  0.5, -0.5], normal: [ 0.0,  0.0, -1.0] },
    Vertex { position: [ 0.5, -0.5, -0.5], normal: [ 0.0,  0.0, -1.0] },
    // Top face
    Vertex { position: [-0.5,  0.5, -0.5], normal: [ 0.0,  1.0,  0.0] },
    Vertex { position: [-0.5,  0.5,  0.5], normal: [ 0.0,  1.0,  0.0] },
    Vertex { position: [ 0.5,  0.5,  0.5], normal: [ 0.0,  1.0,  0.0] },
    Vertex { position: [ 0.5,  0.5, -0.5], normal: [ 0.0,  1.0,  0.0] },
    // Bottom face
    Vertex { position: [-0.5, -0.5, -0.5], normal: [ 0.0, -1.0,  0.0] },
    Vertex { position: [ 0.5, -0.5, -0.5], normal: [ 0.0, -1.0,  0.0] },
    Vertex { position: [ 0.5, -0.5,  0.5], normal: [ 0.0, -1.0,  0.0] },
    Vertex { position: [-0.5, -0.5,  0.5], normal: [ 0.0, -1.0,  0.0] },
    // Right face
    Vertex { position: [ 0.5, -0.5, -0.5], normal: [ 1.0,  0.0,  0.0] },
    Vertex { position: [ 0.5,  0.5, -0.5], normal: [ 1.0,  0.0,  0.0] },
    Vertex { position: [ 0.5,  0.5,  0.5], normal: [ 1.0,  0.0,  0.0] },
    Vertex { position: [ 0.5, -0.5,  0.5], normal: [ 1.0,  0.0,  0.0] },
    // Left face
    Vertex { position: [-0.5, -0.5, -0.5], normal: [-1.0,  0.0,  0.0] },
    Vertex { position: [-0.5, -0.5,  0.5], normal: [-1.0,  0.0,  0.0] },
    Vertex { position: [-0.5,  0.5,  0.5], normal: [-1.0,  0.0,  0.0] },
    Vertex { position: [-0.5,  0.5, -0.5], normal: [-1.0,  0.0,  0.0] },
];

const INDICES: &[u16] = &[
    0,  1,  2,  0,  2,  3,  // front
    4,  5,  6,  4,  6,  7,  // back
    8,  9,  10, 8,  10, 11, // top
    12, 13, 14, 12, 14, 15, // bottom
    16, 17, 18, 16, 18, 19, // right
    20, 21, 22, 20, 22, 23, // left
];

const SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    fog: vec4<f32>,
    moon: vec4<f32>,
    flash_pos: vec4<f32>,
    flash_dir: vec4<f32>,
    ambient: vec4<f32>,
}
@group(0) @binding(0)
var<uniform> u: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
}

struct InstanceInput {
    @location(2) m0: vec4<f32>,
    @location(3) m1: vec4<f32>,
    @location(4) m2: vec4<f32>,
    @location(5) m3: vec4<f32>,
    @location(6) color: vec4<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) color: vec3<f32>,
}

@vertex
fn vs_main(v: VertexInput, i: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(i.m0, i.m1, i.m2, i.m3);
    let world = model * vec4<f32>(v.position, 1.0);
    var out: VertexOutput;
    out.clip_position = u.view_proj * world;
    out.world_pos = world.xyz;
    out.normal = normalize((model * vec4<f32>(v.normal, 0.0)).xyz);
    out.color = i.color.rgb;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.normal);

    let moon = vec3<f32>(0.53, 0.67, 1.0) * u.moon.w * max(dot(n, normalize(u.moon.xyz)), 0.0);

    let to_frag = in.world_pos - u.flash_pos.xyz;
    let dist = length(to_frag);
    let l = to_frag / max(dist, 0.0001);
    let cos_angle = dot(l, normalize(u.flash_dir.xyz));
    let cone = smoothstep(u.flash_dir.w, mix(u.flash_dir.w, 1.0, 0.85), cos_angle);
    let falloff = pow(clamp(1.0 - dist / u.camera_pos.w, 0.0, 1.0), 2.0);
    let spot = vec3<f32>(0.55, 0.67, 1.0) * u.flash_pos.w * cone * falloff * max(dot(n, -l), 0.0);

    let lit = in.color * (u.ambient.rgb + moon + spot);

    let fog_depth = u.fog.w * length(in.world_pos - u.camera_pos.xyz);
    let fog_factor = 1.0 - exp(-fog_depth * fog_depth);
    return vec4<f32>(mix(lit, u.fog.rgb, fog_factor), 1.0);
}
"#;

const GROUND_COLOR: [f32; 3] = [0.05, 0.06, 0.05];
const LEVEL_COLOR: [f32; 3] = [0.35, 0.33, 0.3];
const DUCKY_COLOR: [f32; 3] = [1.0, 0.85, 0.2];
const LEG_COLOR: [f32; 3] = [1.0, 0.5, 0.1];
const BOW_COLOR: [f32; 3] = [0.85, 0.1, 0.2];
const FOX_COLOR: [f32; 3] = [0.85, 0.4, 0.1];
const AMBIENT_COLOR: [f32; 3] = [0.133, 0.2, 0.267]; // #223344

fn box_model(center: Vec3, rotation: Quat, size: Vec3) -> Mat4 {
    Mat4::from_scale_rotation_translation(size, rotation, center)
}

/// Boxes that never move: the ground sheet and the level's colliders.
pub fn level_instances(level: &LevelLayout) -> Vec<Instance> {
    let mut instances = vec![Instance::new(
        box_model(Vec3::new(0.0, -0.01, 100.0), Quat::IDENTITY, Vec3::new(200.0, 0.02, 400.0)),
        GROUND_COLOR,
    )];
    instances.extend(level.colliders.iter().map(|b| {
        Instance::new(box_model(b.center, b.rotation, b.half_extents * 2.0), LEVEL_COLOR)
    }));
    instances
}

/// Boxes for the loaded actors. Parts that have not arrived yet are skipped.
pub fn actor_instances(sim: &SimulationState) -> Vec<Instance> {
    let mut instances = Vec::new();
    let ducky = sim.visual.model_matrix();
    let pose = sim.gait.pose();

    if sim.gait.has_part(DuckyPart::Body) {
        instances.push(Instance::new(
            ducky * box_model(Vec3::new(0.0, 0.75, 0.0), Quat::IDENTITY, Vec3::new(0.9, 0.8, 1.0)),
            DUCKY_COLOR,
        ));
    }
    for (part, x, pitch) in [
        (DuckyPart::RightLeg, 0.25, pose.right_leg_pitch),
        (DuckyPart::LeftLeg, -0.25, pose.left_leg_pitch),
    ] {
        if !sim.gait.has_part(part) {
            continue;
        }
        // Pivot at the hip
        let hip = Mat4::from_translation(Vec3::new(x, 0.35, 0.0)) * Mat4::from_rotation_x(pitch);
        instances.push(Instance::new(
            ducky * hip * box_model(Vec3::new(0.0, -0.15, 0.0), Quat::IDENTITY, Vec3::new(0.15, 0.3, 0.15)),
            LEG_COLOR,
        ));
    }
    if sim.gait.has_part(DuckyPart::Bow) {
        instances.push(Instance::new(
            ducky
                * box_model(
                    Vec3::new(0.0, 1.2 + pose.bow_lift, -0.2),
                    Quat::IDENTITY,
                    Vec3::new(0.35, 0.12, 0.12),
                ),
            BOW_COLOR,
        ));
    }

    if let Some(fox) = &sim.chase {
        let phase = sim.fox_clip.as_ref().map_or(0.0, |clip| clip.phase());
        let bob = (phase * std::f32::consts::TAU).sin().abs() * 0.08;
        let size = fox.size();
        let center = fox.position + Vec3::new(0.0, size.y * 0.5 + bob, 0.0);
        instances.push(Instance::new(box_model(center, Quat::IDENTITY, size), FOX_COLOR));
    }
    instances
}

fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Depth32Float,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

pub struct Renderer {
    pub window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    depth_view: wgpu::TextureView,
    static_instances: Vec<Instance>,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, level: &LevelLayout) -> Self {
        #[cfg(target_arch = "wasm32")]
        let (width, height) = {
            let web_window = web_sys::window().expect("No window");
            let dpr = web_window.device_pixel_ratio();
            let w = (web_window.inner_width().unwrap().as_f64().unwrap() * dpr) as u32;
            let h = (web_window.inner_height().unwrap().as_f64().unwrap() * dpr) as u32;
            (w.max(1), h.max(1))
        };

        #[cfg(not(target_arch = "wasm32"))]
        let (width, height) = {
            let size = window.inner_size();
            (size.width.max(1), size.height.max(1))
        };

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone()).unwrap();

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to find adapter");

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .expect("Failed to create device");

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps.formats.iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER.into()),
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Vertex Buffer"),
            contents: bytemuck::cast_slice(VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Index Buffer"),
            contents: bytemuck::cast_slice(INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Uniforms"),
            size: std::mem::size_of::<Uniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Scene Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc(), Instance::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let static_instances = level_instances(level);
        let instance_capacity = static_instances.len() + 16;
        let instance_buffer = Self::create_instance_buffer(&device, instance_capacity);
        let depth_view = create_depth_texture(&device, width, height);
        log::info!("Renderer ready: {}x{}, {:?}", width, height, surface_format);

        Self {
            window,
            surface,
            device,
            queue,
            config,
            render_pipeline,
            vertex_buffer,
            index_buffer,
            uniform_buffer,
            bind_group,
            instance_buffer,
            instance_capacity,
            depth_view,
            static_instances,
        }
    }

    fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Buffer"),
            size: (capacity * std::mem::size_of::<Instance>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    pub fn size(&self) -> winit::dpi::PhysicalSize<u32> {
        winit::dpi::PhysicalSize::new(self.config.width, self.config.height)
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth_texture(&self.device, new_size.width, new_size.height);
        }
    }

    pub fn render(&mut self, sim: &SimulationState) -> Result<(), wgpu::SurfaceError> {
        let aspect = self.config.width as f32 / self.config.height as f32;
        let view_proj = sim.camera.projection(aspect) * sim.camera.view_matrix();
        let fog = sim.ambience.fog_color();
        let ambient = Vec3::from(AMBIENT_COLOR) * AMBIENT_INTENSITY;
        let uniforms = Uniforms {
            view_proj: view_proj.to_cols_array_2d(),
            camera_pos: sim.camera.position.extend(FLASHLIGHT_RANGE).to_array(),
            fog: fog.extend(FOG_DENSITY).to_array(),
            moon: Vec3::from(MOON_DIRECTION)
                .normalize()
                .extend(sim.ambience.moon_intensity())
                .to_array(),
            flash_pos: sim
                .flashlight
                .position
                .extend(sim.ambience.flashlight_intensity())
                .to_array(),
            flash_dir: sim.flashlight.direction().extend(FLASHLIGHT_CONE.cos()).to_array(),
            ambient: ambient.extend(1.0).to_array(),
        };
        self.queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        let mut instances = self.static_instances.clone();
        instances.extend(actor_instances(sim));
        if instances.len() > self.instance_capacity {
            self.instance_capacity = instances.len().next_power_of_two();
            self.instance_buffer = Self::create_instance_buffer(&self.device, self.instance_capacity);
            log::debug!("Instance buffer grown to {}", self.instance_capacity);
        }
        self.queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));

        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: fog.x as f64,
                            g: fog.y as f64,
                            b: fog.z as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            render_pass.draw_indexed(0..INDICES.len() as u32, 0, 0..instances.len() as u32);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{self, builtin_assets};
    use crate::input::InputState;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn simulation() -> (SimulationState, assets::AssetSender) {
        let (sender, inbox) = assets::channel();
        let sim = SimulationState::new(&LevelLayout::course(), inbox, SmallRng::seed_from_u64(3));
        (sim, sender)
    }

    #[test]
    fn level_has_ground_plus_one_box_per_collider() {
        let level = LevelLayout::course();
        let instances = level_instances(&level);
        assert_eq!(instances.len(), level.colliders.len() + 1);

        let first = &level.colliders[0];
        let (scale, _, translation) = instances[1].model().to_scale_rotation_translation();
        assert!((translation - first.center).length() < 1e-4);
        assert!((scale - first.half_extents * 2.0).length() < 1e-4);
    }

    #[test]
    fn nothing_drawn_before_assets_arrive() {
        let (mut sim, _sender) = simulation();
        sim.tick(InputState::default(), 1.0 / 60.0);
        assert!(actor_instances(&sim).is_empty());
    }

    #[test]
    fn loaded_actors_are_drawn() {
        let (mut sim, sender) = simulation();
        for event in builtin_assets() {
            sender.send(event);
        }
        sim.tick(InputState::default(), 1.0 / 60.0);
        // body, two legs, bow, fox
        let instances = actor_instances(&sim);
        assert_eq!(instances.len(), 5);

        let fox = instances.last().unwrap().model().w_axis.truncate();
        assert!((fox.z - FOX_START_Z).abs() < 1e-4);
    }

    #[test]
    fn partial_ducky_draws_only_loaded_parts() {
        let (mut sim, sender) = simulation();
        sender.send(assets::AssetEvent::DuckyPartReady(DuckyPart::Body));
        sender.send(assets::AssetEvent::DuckyPartReady(DuckyPart::Bow));
        sim.tick(InputState::default(), 1.0 / 60.0);
        assert_eq!(actor_instances(&sim).len(), 2);
    }
}
