//! SDF-based WebGPU render pipeline
//!
//! Renders the entire scene in fragment shader using signed distance fields.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use wgpu::util::DeviceExt;

use super::shapes::{DOT_RADIUS, DOT_SPACING, dotted_path, remaining_route};
use crate::consts::*;
use crate::error::StartupError;
use crate::platform::Viewport;
use crate::settings::Settings;
use crate::sim::{Boat, BoatKind, GamePhase, GameState};

/// Maximum number of boats drawn (active + fading)
const MAX_BOATS: usize = 64;
/// Maximum number of path dots
const MAX_DOTS: usize = 2048;
/// Dot kind used for the path being drawn
const GESTURE_DOT: u32 = BoatKind::ALL.len() as u32;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    resolution: [f32; 2],  // offset 0
    time: f32,             // offset 8
    world_scale: f32,      // offset 12
    world_offset: [f32; 2], // offset 16
    world_size: [f32; 2],  // offset 24
    boat_count: u32,       // offset 32
    dot_count: u32,        // offset 36
    game_over: u32,        // offset 40
    selection_ring: u32,   // offset 44
    edge_softness: f32,    // offset 48
    island_radius: f32,    // offset 52
    port_radius: f32,      // offset 56
    dot_radius: f32,       // offset 60
}

/// Per-kind color and port, indexed by `BoatKind::index`
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct KindStyle {
    color: [f32; 4],
    port: [f32; 2],
    _pad: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct BoatData {
    pos: [f32; 2],
    heading: f32,
    radius: f32,
    scale: f32,
    alpha: f32, // 0-1
    kind: u32,
    selected: u32,
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct DotData {
    pos: [f32; 2],
    kind: u32, // BoatKind index, or GESTURE_DOT
    _pad: u32,
}

impl BoatData {
    fn from_boat(boat: &Boat) -> Self {
        Self {
            pos: boat.pos.to_array(),
            heading: boat.heading().unwrap_or(boat.facing),
            radius: boat.radius,
            scale: boat.fade.scale.max(0.0),
            alpha: (boat.fade.alpha / 255.0).clamp(0.0, 1.0),
            kind: boat.kind.index() as u32,
            selected: u32::from(boat.selected),
        }
    }
}

fn kind_styles() -> [KindStyle; 2] {
    BoatKind::ALL.map(|kind| KindStyle {
        color: kind.color(),
        port: kind.port().to_array(),
        _pad: [0.0; 2],
    })
}

/// Collect path dots: the gesture in progress first, then each boat's
/// remaining route up to `route_budget` dots.
fn collect_dots(state: &GameState, route_budget: usize) -> Vec<DotData> {
    let mut dots = Vec::new();
    let push = |dots: &mut Vec<DotData>, points: &[Vec2], kind: u32, cap: usize| {
        let room = cap.saturating_sub(dots.len());
        dots.extend(
            dotted_path(points, DOT_SPACING)
                .into_iter()
                .take(room)
                .map(|p| DotData {
                    pos: p.to_array(),
                    kind,
                    _pad: 0,
                }),
        );
    };

    if let Some(gesture) = &state.gesture {
        push(&mut dots, gesture.points(), GESTURE_DOT, MAX_DOTS);
    }

    let cap = (dots.len() + route_budget).min(MAX_DOTS);
    for boat in &state.boats {
        if dots.len() >= cap {
            break;
        }
        if boat.target().is_some() {
            push(&mut dots, &remaining_route(boat), boat.kind.index() as u32, cap);
        }
    }

    dots
}

// ============================================================================
// SDF RENDER STATE
// ============================================================================

pub struct SdfRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,

    globals_buffer: wgpu::Buffer,
    boats_buffer: wgpu::Buffer,
    dots_buffer: wgpu::Buffer,

    bind_group: wgpu::BindGroup,

    pub size: (u32, u32),
    start_time: f64,
}

impl SdfRenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, StartupError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("sdf-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .map_err(|e| StartupError::Device(e.to_string()))?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);
        log::info!("Surface alpha modes: {:?}", surface_caps.alpha_modes);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| StartupError::Surface("no supported surface format".into()))?;

        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        log::info!("Surface config: {}x{}", width, height);
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sdf_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sdf_shader.wgsl").into()),
        });

        let viewport = Viewport::new(width as f32, height as f32);
        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&Globals {
                resolution: [width as f32, height as f32],
                time: 0.0,
                world_scale: viewport.scale,
                world_offset: viewport.offset.to_array(),
                world_size: WORLD_SIZE.to_array(),
                boat_count: 0,
                dot_count: 0,
                game_over: 0,
                selection_ring: 1,
                edge_softness: 1.0,
                island_radius: ISLAND_RADIUS,
                port_radius: PORT_RADIUS,
                dot_radius: DOT_RADIUS,
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        // Kinds never change, so this one is written once
        let kinds_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("kinds"),
            contents: bytemuck::cast_slice(&kind_styles()),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let boats_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("boats"),
            size: (std::mem::size_of::<BoatData>() * MAX_BOATS) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let dots_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("dots"),
            size: (std::mem::size_of::<DotData>() * MAX_DOTS) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let storage_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only: true },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sdf_bind_group_layout"),
            entries: &[
                uniform_entry(0),
                uniform_entry(1),
                storage_entry(2),
                storage_entry(3),
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sdf_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: kinds_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: boats_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: dots_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sdf_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sdf_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[], // No vertex buffers - fullscreen triangle
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
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
            multiview_mask: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            boats_buffer,
            dots_buffer,
            bind_group,
            size: (width, height),
            start_time: 0.0,
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn set_start_time(&mut self, time: f64) {
        self.start_time = time;
    }

    /// Update GPU buffers from game state and render
    pub fn render(
        &mut self,
        state: &GameState,
        settings: &Settings,
        time: f64,
    ) -> Result<(), wgpu::SurfaceError> {
        // requestAnimationFrame time is in ms
        let elapsed = ((time - self.start_time) / 1000.0) as f32;

        let boats: Vec<BoatData> = state
            .boats
            .iter()
            .chain(&state.fading)
            .take(MAX_BOATS)
            .map(BoatData::from_boat)
            .collect();
        let dots = collect_dots(state, settings.max_path_dots());

        let viewport = Viewport::new(self.size.0 as f32, self.size.1 as f32);
        let globals = Globals {
            resolution: [self.size.0 as f32, self.size.1 as f32],
            time: elapsed,
            world_scale: viewport.scale,
            world_offset: viewport.offset.to_array(),
            world_size: WORLD_SIZE.to_array(),
            boat_count: boats.len() as u32,
            dot_count: dots.len() as u32,
            game_over: u32::from(state.phase == GamePhase::GameOver),
            selection_ring: u32::from(settings.selection_ring),
            edge_softness: settings.quality.edge_softness(),
            island_radius: ISLAND_RADIUS,
            port_radius: PORT_RADIUS,
            dot_radius: DOT_RADIUS,
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));
        if !boats.is_empty() {
            self.queue
                .write_buffer(&self.boats_buffer, 0, bytemuck::cast_slice(&boats));
        }
        if !dots.is_empty() {
            self.queue
                .write_buffer(&self.dots_buffer, 0, bytemuck::cast_slice(&dots));
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sdf_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sdf_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
