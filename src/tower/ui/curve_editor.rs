//! Curve Editor Overlay
//!
//! Floating panel that visualizes one channel's Bezier curve and lets a
//! pointer drag its two handles. Handle writes go through the
//! [`ParameterStore`], whose change notification drives the assembler; the
//! editor itself never touches geometry.
//!
//! # Layout (window pixels, Y down)
//!
//! ```text
//! +----------------------------------+  <- position
//! | TITLE                        [X] |  HEADER_HEIGHT
//! |  +----------------------------+  |  PADDING
//! |  |                            |  |
//! |  |        plot (unit square)  |  |  PLOT_SIZE
//! |  |                            |  |
//! |  +----------------------------+  |
//! +----------------------------------+  PADDING
//! ```

use glam::Vec2;
use log::{debug, trace, warn};

use crate::input::{PointerEvent, PointerId};
use crate::tower::curve::{Channel, CurveConfig, CurvePoint, HandleId};
use crate::tower::params::TowerParams;
use crate::tower::store::ParameterStore;

use super::draw_list::{DrawList, GlyphKind};
use super::text::{push_text, text_size};

/// Pointer-drag state. Every non-idle state remembers the pointer that
/// started it; only that pointer may continue or end the drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    Handle { handle: HandleId, owner: PointerId },
    Window { owner: PointerId, grab_offset: Vec2 },
}

impl DragState {
    pub fn owner(&self) -> Option<PointerId> {
        match self {
            DragState::Idle => None,
            DragState::Handle { owner, .. } | DragState::Window { owner, .. } => Some(*owner),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, DragState::Idle)
    }
}

// ===== COLORS =====

const PANEL_COLOR: [f32; 4] = [0.10, 0.11, 0.13, 0.88];
const PLOT_COLOR: [f32; 4] = [0.05, 0.05, 0.06, 0.92];
const BORDER_COLOR: [f32; 4] = [0.45, 0.45, 0.50, 1.0];
const GUIDE_COLOR: [f32; 4] = [0.60, 0.60, 0.65, 0.7];
const TEXT_COLOR: [f32; 4] = [0.05, 0.05, 0.05, 1.0];
const CLOSE_COLOR: [f32; 4] = [0.75, 0.22, 0.20, 1.0];
const ENDPOINT_COLOR: [f32; 4] = [0.85, 0.85, 0.85, 1.0];

fn channel_tint(channel: Channel) -> [f32; 4] {
    match channel {
        Channel::Size => [0.95, 0.65, 0.25, 1.0],
        Channel::Rotation => [0.45, 0.85, 0.40, 1.0],
        Channel::Offset => [0.35, 0.65, 0.95, 1.0],
        Channel::Color => [0.90, 0.45, 0.85, 1.0],
    }
}

fn rect_contains(min: Vec2, max: Vec2, p: Vec2) -> bool {
    p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
}

/// Bezier curve editor for one channel.
#[derive(Debug, Clone)]
pub struct CurveEditor {
    channel: Channel,
    /// Last curve read from the store.
    curve: CurveConfig,
    visible: bool,
    destroyed: bool,
    /// Panel top-left in window pixels.
    position: Vec2,
    viewport: Vec2,
    drag: DragState,
    draw_list: DrawList,
    redraws: u32,
}

impl CurveEditor {
    /// Side of the square plot area (pixels)
    pub const PLOT_SIZE: f32 = 200.0;
    /// Gap between the panel edge and the plot
    pub const PADDING: f32 = 16.0;
    pub const HEADER_HEIGHT: f32 = 26.0;
    pub const CLOSE_SIZE: f32 = 16.0;
    /// Pick radius around a handle (pixels)
    pub const HANDLE_HIT_RADIUS: f32 = 14.0;
    /// Minimum distance kept between the panel and the window edge
    pub const VIEWPORT_MARGIN: f32 = 8.0;
    /// Line segments in the sampled curve polyline
    pub const CURVE_SAMPLES: usize = 48;

    const TITLE_SCALE: f32 = 2.0;

    pub fn new(channel: Channel, viewport: Vec2) -> Self {
        Self {
            channel,
            curve: CurveConfig::default(),
            visible: false,
            destroyed: false,
            position: Vec2::splat(Self::VIEWPORT_MARGIN),
            viewport,
            drag: DragState::Idle,
            draw_list: DrawList::new(),
            redraws: 0,
        }
    }

    // ===== ACCESSORS =====

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    /// Number of times the draw list has been rebuilt.
    pub fn redraw_count(&self) -> u32 {
        self.redraws
    }

    pub fn panel_size() -> Vec2 {
        Vec2::new(
            Self::PLOT_SIZE + 2.0 * Self::PADDING,
            Self::HEADER_HEIGHT + Self::PLOT_SIZE + 2.0 * Self::PADDING,
        )
    }

    /// Top-left corner of the plot area.
    pub fn plot_origin(&self) -> Vec2 {
        self.position + Vec2::new(Self::PADDING, Self::HEADER_HEIGHT + Self::PADDING)
    }

    /// Curve space (unit square, Y up) to window pixels.
    pub fn to_screen(&self, p: Vec2) -> Vec2 {
        self.plot_origin() + Vec2::new(p.x, 1.0 - p.y) * Self::PLOT_SIZE
    }

    /// Window pixels to curve space. Not clamped.
    pub fn from_screen(&self, screen: Vec2) -> CurvePoint {
        let local = (screen - self.plot_origin()) / Self::PLOT_SIZE;
        CurvePoint::new(local.x, 1.0 - local.y)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        rect_contains(self.position, self.position + Self::panel_size(), p)
    }

    fn header_rect(&self) -> (Vec2, Vec2) {
        let min = self.position;
        (min, min + Vec2::new(Self::panel_size().x, Self::HEADER_HEIGHT))
    }

    fn close_rect(&self) -> (Vec2, Vec2) {
        let (header_min, header_max) = self.header_rect();
        let inset = (Self::HEADER_HEIGHT - Self::CLOSE_SIZE) * 0.5;
        let min = Vec2::new(header_max.x - inset - Self::CLOSE_SIZE, header_min.y + inset);
        (min, min + Vec2::splat(Self::CLOSE_SIZE))
    }

    /// Nearest handle within the hit radius of `p`.
    pub fn hit_handle(&self, p: Vec2) -> Option<HandleId> {
        [HandleId::P1, HandleId::P2]
            .into_iter()
            .map(|h| (h, self.to_screen(self.curve.handle(h).to_vec2()).distance(p)))
            .filter(|(_, d)| *d <= Self::HANDLE_HIT_RADIUS)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(h, _)| h)
    }

    fn clamp_to_viewport(&self, position: Vec2) -> Vec2 {
        let size = Self::panel_size();
        let max = self.viewport - size - Vec2::splat(Self::VIEWPORT_MARGIN);
        position.min(max).max(Vec2::splat(Self::VIEWPORT_MARGIN))
    }

    // ===== LIFECYCLE =====

    /// Show the panel centered in the viewport.
    pub fn show(&mut self, params: &TowerParams) {
        if self.destroyed {
            warn!("{} curve editor was destroyed; ignoring show", self.channel);
            return;
        }
        self.curve = *params.curve(self.channel);
        self.visible = true;
        self.drag = DragState::Idle;
        self.position = self.clamp_to_viewport((self.viewport - Self::panel_size()) * 0.5);
        debug!("{} curve editor shown", self.channel);
        self.draw();
    }

    /// Hide the panel and drop any drag in progress. Idempotent.
    pub fn hide(&mut self) {
        if !self.visible && self.drag.is_idle() && self.draw_list.is_empty() {
            return;
        }
        self.visible = false;
        self.drag = DragState::Idle;
        self.draw_list.clear();
        debug!("{} curve editor hidden", self.channel);
    }

    /// Hide permanently. Later `show` calls are ignored.
    pub fn destroy(&mut self) {
        self.hide();
        self.destroyed = true;
    }

    pub fn toggle(&mut self, params: &TowerParams) {
        if self.visible {
            self.hide();
        } else {
            self.show(params);
        }
    }

    /// Resize hook: keep the panel inside the new viewport.
    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
        self.position = self.clamp_to_viewport(self.position);
        if self.visible {
            self.draw();
        }
    }

    /// Re-clamp the channel through the store and refresh the drawing.
    /// Any drag in progress continues.
    pub fn sync_from_params(&mut self, store: &mut ParameterStore) {
        store.reclamp(self.channel);
        self.curve = *store.params().curve(self.channel);
        if self.visible {
            self.draw();
        }
    }

    // ===== POINTER INPUT =====

    /// Returns true if the event was consumed.
    pub fn on_pointer_down(&mut self, event: PointerEvent, store: &mut ParameterStore) -> bool {
        if !self.visible {
            return false;
        }
        let p = event.position();

        if let Some(owner) = self.drag.owner() {
            if owner != event.id {
                // Owned by another pointer; swallow presses that land on us
                return self.contains(p);
            }
            // The owner's release never arrived
            self.drag = DragState::Idle;
        }

        self.curve = *store.params().curve(self.channel);
        if let Some(handle) = self.hit_handle(p) {
            self.drag = DragState::Handle {
                handle,
                owner: event.id,
            };
            trace!("{} {:?} grabbed by {:?}", self.channel, handle, event.id);
            return true;
        }

        let (close_min, close_max) = self.close_rect();
        if rect_contains(close_min, close_max, p) {
            self.hide();
            return true;
        }

        let (header_min, header_max) = self.header_rect();
        if rect_contains(header_min, header_max, p) {
            self.drag = DragState::Window {
                owner: event.id,
                grab_offset: p - self.position,
            };
            return true;
        }

        self.contains(p)
    }

    pub fn on_pointer_move(&mut self, event: PointerEvent, store: &mut ParameterStore) -> bool {
        if !self.visible || self.drag.owner() != Some(event.id) {
            return false;
        }

        match self.drag {
            DragState::Idle => false,
            DragState::Handle { handle, .. } => {
                let target = self.from_screen(event.position());
                store.set_handle(self.channel, handle, target);
                self.curve = *store.params().curve(self.channel);
                self.draw();
                true
            }
            DragState::Window { grab_offset, .. } => {
                self.position = self.clamp_to_viewport(event.position() - grab_offset);
                self.draw();
                true
            }
        }
    }

    pub fn on_pointer_up(&mut self, event: PointerEvent) -> bool {
        self.release(event.id)
    }

    pub fn on_pointer_cancel(&mut self, event: PointerEvent) -> bool {
        self.release(event.id)
    }

    fn release(&mut self, id: PointerId) -> bool {
        if self.drag.owner() != Some(id) {
            return false;
        }
        trace!("{} drag released by {:?}", self.channel, id);
        self.drag = DragState::Idle;
        if self.visible {
            self.draw();
        }
        true
    }

    // ===== DRAWING =====

    /// Rebuild the draw list from the cached curve.
    pub fn draw(&mut self) {
        self.draw_list.clear();
        if !self.visible {
            return;
        }

        let tint = channel_tint(self.channel);
        let size = Self::panel_size();
        let list = &mut self.draw_list;

        // Panel + header
        list.rect(self.position, self.position + size, PANEL_COLOR);
        let (header_min, header_max) = (
            self.position,
            self.position + Vec2::new(size.x, Self::HEADER_HEIGHT),
        );
        list.rect(header_min, header_max, tint);

        let mode = if self.curve.enabled { "CURVE" } else { "EASE" };
        let title = format!("{} {}", self.channel.label().to_uppercase(), mode);
        let title_y = header_min.y + (Self::HEADER_HEIGHT - text_size(&title, Self::TITLE_SCALE).y) * 0.5;
        push_text(
            list,
            &title,
            Vec2::new(header_min.x + 8.0, title_y),
            Self::TITLE_SCALE,
            TEXT_COLOR,
        );

        // Close control
        let inset = (Self::HEADER_HEIGHT - Self::CLOSE_SIZE) * 0.5;
        let close_min = Vec2::new(header_max.x - inset - Self::CLOSE_SIZE, header_min.y + inset);
        let close_max = close_min + Vec2::splat(Self::CLOSE_SIZE);
        list.rect(close_min, close_max, CLOSE_COLOR);
        let pad = Vec2::splat(4.0);
        list.segment(close_min + pad, close_max - pad, 2.0, TEXT_COLOR);
        list.segment(
            Vec2::new(close_max.x - pad.x, close_min.y + pad.y),
            Vec2::new(close_min.x + pad.x, close_max.y - pad.y),
            2.0,
            TEXT_COLOR,
        );

        // Plot
        let plot_min = self.position + Vec2::new(Self::PADDING, Self::HEADER_HEIGHT + Self::PADDING);
        let plot_max = plot_min + Vec2::splat(Self::PLOT_SIZE);
        list.rect(plot_min, plot_max, PLOT_COLOR);
        list.outline(plot_min, plot_max, 1.0, BORDER_COLOR);

        let to_screen =
            |p: Vec2| plot_min + Vec2::new(p.x, 1.0 - p.y) * Self::PLOT_SIZE;
        let p1 = self.curve.p1.to_vec2();
        let p2 = self.curve.p2.to_vec2();

        // Guides
        list.segment(to_screen(Vec2::ZERO), to_screen(p1), 1.0, GUIDE_COLOR);
        list.segment(to_screen(p2), to_screen(Vec2::ONE), 1.0, GUIDE_COLOR);

        // Full parametric curve
        let points = (0..=Self::CURVE_SAMPLES)
            .map(|i| {
                let a = i as f32 / Self::CURVE_SAMPLES as f32;
                to_screen(self.curve.visual_point(a))
            })
            .collect();
        list.polyline(points, 2.0, tint);

        // Handles on top
        list.glyph(to_screen(p1), GlyphKind::Handle, tint);
        list.glyph(to_screen(p2), GlyphKind::Handle, tint);
        list.glyph(to_screen(Vec2::ZERO), GlyphKind::Endpoint, ENDPOINT_COLOR);
        list.glyph(to_screen(Vec2::ONE), GlyphKind::Endpoint, ENDPOINT_COLOR);

        self.redraws += 1;
    }
}
