//! Tower Sculpt - Interactive Viewer
//!
//! Renders the assembled tower with a fixed framing camera and hosts the four
//! curve editor overlays.
//!
//! Run with: `cargo run --bin tower_sculpt`
//! Config: set `TOWER_CONFIG=path/to/config.json` (optional)
//!
//! Controls:
//! - 1-4: Toggle size / rotation / offset / color curve editor
//! - Shift+1-4: Toggle curve mode for that channel
//! - F1-F4: Cycle that channel's easing
//! - Up/Down: Levels
//! - Left/Right: Radial segments
//! - Q/E: Total rotation
//! - Left mouse / touch: Drag curve handles and editor headers
//! - Ctrl+S: Save snapshot
//! - Ctrl+O: Load snapshot
//! - ESC: Exit

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::Context;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};
use log::{error, info, trace, warn};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, Touch, TouchPhase, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

use wgpu::util::DeviceExt;

use tower_sculpt_engine::input::{CursorTracker, PointerEvent, PointerId};
use tower_sculpt_engine::render::{BoundingSphere, TowerVertex};
use tower_sculpt_engine::tower::snapshot;
use tower_sculpt_engine::tower::{
    Channel, CurveEditor, ParamChange, ParameterStore, TowerAssembler, TowerMesh, TowerParams,
    ViewerConfig,
};

// ============================================================================
// GPU RESOURCES
// ============================================================================

/// Uniforms for the tower pass. Matches `Uniforms` in shaders/tower.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct TowerUniforms {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 3],
    ambient: f32,
    light_dir: [f32; 3],
    _pad: f32,
}

static_assertions::assert_eq_size!(TowerUniforms, [u8; 96]);

struct ViewerGpu {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    tower_pipeline: wgpu::RenderPipeline,
    overlay_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    /// Uploaded tower vertices and the (mesh id, revision) they came from.
    tower_buffer: Option<(wgpu::Buffer, u32)>,
    uploaded: Option<(u64, u64)>,
}

impl ViewerGpu {
    fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(Arc::clone(&window))
            .context("failed to create window surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("failed to find GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("Tower Sculpt Device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: wgpu::MemoryHints::Performance,
            ..Default::default()
        }))
        .context("failed to create GPU device")?;

        // Configure surface
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let depth_view = create_depth_texture(&device, &surface_config);

        // ----- Tower pipeline -----
        let tower_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Tower Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../shaders/tower.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Tower Uniform Layout"),
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

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Tower Uniform Buffer"),
            size: std::mem::size_of::<TowerUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Tower Uniform Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let tower_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Tower Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let tower_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Tower Pipeline"),
            layout: Some(&tower_layout),
            vertex: wgpu::VertexState {
                module: &tower_shader,
                entry_point: Some("vs_main"),
                buffers: &[TowerVertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &tower_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
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
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
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
            multiview: None,
            cache: None,
        });

        // ----- Overlay pipeline -----
        let overlay_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Overlay Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../shaders/overlay.wgsl").into()),
        });

        let overlay_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Overlay Pipeline Layout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        });

        let overlay_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Overlay Pipeline"),
            layout: Some(&overlay_layout),
            vertex: wgpu::VertexState {
                module: &overlay_shader,
                entry_point: Some("vs_main"),
                buffers: &[TowerVertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &overlay_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None, // No culling for 2D overlays
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        info!(
            "GPU initialized: {} ({:?}, {:?})",
            adapter.get_info().name,
            surface_format,
            surface_config.present_mode
        );

        Ok(Self {
            device,
            queue,
            surface,
            surface_config,
            depth_view,
            tower_pipeline,
            overlay_pipeline,
            uniform_buffer,
            bind_group,
            tower_buffer: None,
            uploaded: None,
        })
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.surface_config.width = new_size.width;
            self.surface_config.height = new_size.height;
            self.surface.configure(&self.device, &self.surface_config);
            self.depth_view = create_depth_texture(&self.device, &self.surface_config);
        }
    }

    fn viewport(&self) -> Vec2 {
        Vec2::new(
            self.surface_config.width as f32,
            self.surface_config.height as f32,
        )
    }

    /// Re-upload the tower when the mesh container or its revision changed.
    fn sync_mesh(&mut self, mesh: &TowerMesh) {
        let key = (mesh.id(), mesh.revision());
        if self.uploaded == Some(key) {
            return;
        }

        let vertices = mesh.geometry().to_vertices();
        if let Some((old, count)) = self.tower_buffer.take() {
            trace!("releasing tower buffer ({} vertices)", count);
            old.destroy();
        }
        if !vertices.is_empty() {
            let buffer = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Tower Vertex Buffer"),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
            self.tower_buffer = Some((buffer, vertices.len() as u32));
        }
        self.uploaded = Some(key);
    }
}

fn create_depth_texture(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
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

// ============================================================================
// CAMERA
// ============================================================================

/// Fixed three-quarter view that fits the whole bounding sphere.
struct FramingCamera;

impl FramingCamera {
    const FOV_Y: f32 = 45.0;
    const MARGIN: f32 = 1.15;

    fn view_proj(sphere: BoundingSphere, aspect: f32) -> (Mat4, Vec3) {
        let radius = sphere.radius.max(0.5);
        let fov = Self::FOV_Y.to_radians();
        // Fit against the narrower of the two frustum half-angles
        let half_v = fov * 0.5;
        let half_h = (half_v.tan() * aspect).atan();
        let half_angle = half_v.min(half_h);
        let distance = radius / half_angle.sin() * Self::MARGIN;

        let direction = Vec3::new(0.7, 0.45, 1.0).normalize();
        let eye = sphere.center + direction * distance;
        let view = Mat4::look_at_rh(eye, sphere.center, Vec3::Y);
        let near = (distance - radius * 1.5).max(0.01);
        let far = distance + radius * 1.5;
        let proj = Mat4::perspective_rh(fov, aspect.max(0.01), near, far);
        (proj * view, eye)
    }
}

// ============================================================================
// APPLICATION
// ============================================================================

#[derive(Clone, Copy)]
enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

struct TowerSculptApp {
    window: Option<Arc<Window>>,
    gpu: Option<ViewerGpu>,
    config: ViewerConfig,
    store: ParameterStore,
    assembler: Rc<RefCell<TowerAssembler>>,
    /// Curve editors in draw order; the last one is on top.
    editors: Vec<CurveEditor>,
    cursor: CursorTracker,
    modifiers: ModifiersState,
}

impl TowerSculptApp {
    fn new(config: ViewerConfig) -> Self {
        let assembler = Rc::new(RefCell::new(TowerAssembler::new()));
        let mut store = ParameterStore::new(TowerParams::default());
        store.subscribe(TowerAssembler::listener(Rc::clone(&assembler)));
        store.notify(ParamChange::Structural);

        let viewport = Vec2::new(config.window_width as f32, config.window_height as f32);
        let editors = Channel::ALL
            .into_iter()
            .map(|channel| CurveEditor::new(channel, viewport))
            .collect();

        Self {
            window: None,
            gpu: None,
            config,
            store,
            assembler,
            editors,
            cursor: CursorTracker::new(),
            modifiers: ModifiersState::empty(),
        }
    }

    fn initialize(&mut self, window: Arc<Window>) -> anyhow::Result<()> {
        let gpu = ViewerGpu::new(Arc::clone(&window))?;
        let viewport = gpu.viewport();
        for editor in &mut self.editors {
            editor.set_viewport(viewport);
        }
        self.gpu = Some(gpu);
        self.window = Some(window);
        self.update_title();
        self.request_redraw();
        Ok(())
    }

    fn update_title(&self) {
        if let Some(window) = &self.window {
            let params = self.store.params();
            window.set_title(&format!(
                "Tower Sculpt - {} levels x {} segments",
                params.levels, params.radial_segments
            ));
        }
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn editor_mut(&mut self, channel: Channel) -> Option<&mut CurveEditor> {
        self.editors.iter_mut().find(|e| e.channel() == channel)
    }

    fn refresh_editors(&mut self) {
        for editor in &mut self.editors {
            editor.sync_from_params(&mut self.store);
        }
    }

    // ----- Pointer routing -----

    /// Offer a pointer event to the editors, topmost first.
    fn dispatch_pointer(&mut self, phase: PointerPhase, event: PointerEvent) -> bool {
        let store = &mut self.store;
        let consumed_by = self
            .editors
            .iter_mut()
            .enumerate()
            .rev()
            .find_map(|(index, editor)| {
                let consumed = match phase {
                    PointerPhase::Down => editor.on_pointer_down(event, store),
                    PointerPhase::Move => editor.on_pointer_move(event, store),
                    PointerPhase::Up => editor.on_pointer_up(event),
                    PointerPhase::Cancel => editor.on_pointer_cancel(event),
                };
                consumed.then_some(index)
            });

        let Some(index) = consumed_by else {
            return false;
        };
        if matches!(phase, PointerPhase::Down) && index + 1 != self.editors.len() {
            let editor = self.editors.remove(index);
            self.editors.push(editor);
        }
        self.request_redraw();
        true
    }

    fn handle_touch(&mut self, touch: Touch) {
        let id = PointerId::touch(touch.id);
        let event = PointerEvent::new(id, touch.location.x as f32, touch.location.y as f32);
        let phase = match touch.phase {
            TouchPhase::Started => PointerPhase::Down,
            TouchPhase::Moved => PointerPhase::Move,
            TouchPhase::Ended => PointerPhase::Up,
            TouchPhase::Cancelled => PointerPhase::Cancel,
        };
        self.dispatch_pointer(phase, event);
    }

    // ----- Keyboard -----

    fn handle_key(&mut self, key: KeyCode) {
        let ctrl = self.modifiers.control_key();
        let shift = self.modifiers.shift_key();
        let limits = self.config.limits;

        match key {
            KeyCode::Digit1 | KeyCode::Digit2 | KeyCode::Digit3 | KeyCode::Digit4 => {
                let channel = match key {
                    KeyCode::Digit1 => Channel::Size,
                    KeyCode::Digit2 => Channel::Rotation,
                    KeyCode::Digit3 => Channel::Offset,
                    _ => Channel::Color,
                };
                if shift {
                    let enabled = !self.store.params().curve(channel).enabled;
                    self.store.set_curve_enabled(channel, enabled);
                    info!("{} curve mode {}", channel, if enabled { "on" } else { "off" });
                    self.refresh_editors();
                } else {
                    let params = self.store.snapshot();
                    if let Some(editor) = self.editor_mut(channel) {
                        editor.toggle(&params);
                    }
                }
            }

            KeyCode::F1 | KeyCode::F2 | KeyCode::F3 | KeyCode::F4 => {
                let channel = match key {
                    KeyCode::F1 => Channel::Size,
                    KeyCode::F2 => Channel::Rotation,
                    KeyCode::F3 => Channel::Offset,
                    _ => Channel::Color,
                };
                self.store.update(ParamChange::Cosmetic, |p| {
                    let next = p.easing(channel).next();
                    *p.easing_mut(channel) = next;
                });
                info!("{} easing: {}", channel, self.store.params().easing(channel));
            }

            KeyCode::ArrowUp | KeyCode::ArrowDown => {
                let delta = if key == KeyCode::ArrowUp { 1 } else { -1 };
                self.store.update(ParamChange::Structural, |p| {
                    p.levels = limits.step_levels(p.levels, delta);
                });
                info!("Levels: {}", self.store.params().levels);
                self.update_title();
            }

            KeyCode::ArrowRight | KeyCode::ArrowLeft => {
                let delta = if key == KeyCode::ArrowRight { 1 } else { -1 };
                self.store.update(ParamChange::Structural, |p| {
                    p.radial_segments = limits.step_segments(p.radial_segments, delta);
                });
                info!("Radial segments: {}", self.store.params().radial_segments);
                self.update_title();
            }

            KeyCode::KeyQ | KeyCode::KeyE => {
                let step = if key == KeyCode::KeyE {
                    self.config.rotation_step
                } else {
                    -self.config.rotation_step
                };
                self.store.update(ParamChange::Cosmetic, |p| {
                    p.total_rotation = (p.total_rotation + step) % 360.0;
                });
            }

            KeyCode::KeyS if ctrl => {
                if let Err(e) = snapshot::save(&self.config.snapshot_path, self.store.params()) {
                    error!("Snapshot save failed: {e}");
                }
            }

            KeyCode::KeyO if ctrl => match snapshot::load(&self.config.snapshot_path) {
                Ok(params) => {
                    self.store.apply_snapshot(params);
                    self.refresh_editors();
                    self.update_title();
                }
                Err(e) => error!("Snapshot load failed: {e}"),
            },

            _ => return,
        }

        self.request_redraw();
    }

    // ----- Rendering -----

    fn render(&mut self) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        let assembler = self.assembler.borrow();
        let Some(mesh) = assembler.mesh() else {
            return;
        };
        gpu.sync_mesh(mesh);

        let output = match gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost, reconfiguring");
                gpu.surface.configure(&gpu.device, &gpu.surface_config);
                return;
            }
            Err(e) => {
                error!("Surface error: {e:?}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Camera
        let viewport = gpu.viewport();
        let sphere = mesh.geometry().bounding_sphere().unwrap_or(BoundingSphere {
            center: Vec3::ZERO,
            radius: 1.0,
        });
        let (view_proj, eye) = FramingCamera::view_proj(sphere, viewport.x / viewport.y.max(1.0));
        let uniforms = TowerUniforms {
            view_proj: view_proj.to_cols_array_2d(),
            camera_pos: eye.to_array(),
            ambient: 0.3,
            light_dir: self
                .config
                .light_direction
                .try_normalize()
                .unwrap_or(Vec3::NEG_Y)
                .to_array(),
            _pad: 0.0,
        };
        gpu.queue
            .write_buffer(&gpu.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        // Overlay geometry, bottom editor first
        let mut overlay_vertices = Vec::new();
        let mut overlay_indices = Vec::new();
        for editor in &self.editors {
            editor
                .draw_list()
                .tessellate(viewport, &mut overlay_vertices, &mut overlay_indices);
        }

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Tower Render Encoder"),
            });

        let [r, g, b] = self.config.clear_color;
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Tower Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a: 1.0 }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &gpu.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some((buffer, count)) = &gpu.tower_buffer {
                pass.set_pipeline(&gpu.tower_pipeline);
                pass.set_bind_group(0, &gpu.bind_group, &[]);
                pass.set_vertex_buffer(0, buffer.slice(..));
                pass.draw(0..*count, 0..1);
            }
        }

        if !overlay_indices.is_empty() {
            let vertex_buffer = gpu
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Overlay Vertex Buffer"),
                    contents: bytemuck::cast_slice(&overlay_vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
            let index_buffer = gpu
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Overlay Index Buffer"),
                    contents: bytemuck::cast_slice(&overlay_indices),
                    usage: wgpu::BufferUsages::INDEX,
                });

            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Overlay Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load, // Keep the tower
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(&gpu.overlay_pipeline);
            pass.set_vertex_buffer(0, vertex_buffer.slice(..));
            pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..overlay_indices.len() as u32, 0, 0..1);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

// ============================================================================
// APPLICATION HANDLER
// ============================================================================

impl ApplicationHandler for TowerSculptApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attrs = WindowAttributes::default()
            .with_title("Tower Sculpt")
            .with_inner_size(PhysicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));
        let result = event_loop
            .create_window(attrs)
            .context("failed to create window")
            .and_then(|window| self.initialize(Arc::new(window)));
        if let Err(e) = result {
            error!("{e:#}");
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                for editor in &mut self.editors {
                    editor.destroy();
                }
                event_loop.exit();
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                if let PhysicalKey::Code(key) = event.physical_key {
                    if key == KeyCode::Escape {
                        event_loop.exit();
                        return;
                    }
                    self.handle_key(key);
                }
            }

            // -- Mouse is pointer 0 --
            WindowEvent::CursorMoved { position, .. } => {
                let event = self.cursor.moved(position.x as f32, position.y as f32);
                self.dispatch_pointer(PointerPhase::Move, event);
            }

            WindowEvent::CursorLeft { .. } => {
                if let Some(event) = self.cursor.left() {
                    self.dispatch_pointer(PointerPhase::Cancel, event);
                }
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                if let Some(event) = self.cursor.event() {
                    let phase = match state {
                        ElementState::Pressed => PointerPhase::Down,
                        ElementState::Released => PointerPhase::Up,
                    };
                    self.dispatch_pointer(phase, event);
                }
            }

            WindowEvent::Touch(touch) => self.handle_touch(touch),

            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.resize(new_size);
                    let viewport = gpu.viewport();
                    for editor in &mut self.editors {
                        editor.set_viewport(viewport);
                    }
                }
                self.request_redraw();
            }

            WindowEvent::RedrawRequested => self.render(),

            _ => {}
        }
    }
}

// ============================================================================
// MAIN
// ============================================================================

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Tower Sculpt");
    info!("  1-4: toggle curve editors, Shift+1-4: curve mode, F1-F4: easing");
    info!("  Up/Down: levels, Left/Right: segments, Q/E: rotation");
    info!("  Ctrl+S / Ctrl+O: save / load snapshot, ESC: exit");

    let config = ViewerConfig::from_env();

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);
    let mut app = TowerSculptApp::new(config);
    event_loop.run_app(&mut app).context("event loop failed")?;
    Ok(())
}
