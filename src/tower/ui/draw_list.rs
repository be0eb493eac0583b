//! Overlay Draw List
//!
//! Retained list of 2D shapes in window pixels (origin top-left, Y down).
//! The viewer tessellates it into NDC quads for the overlay pipeline.

use glam::Vec2;

use crate::render::{TowerVertex, add_quad};

/// Marker drawn at a curve point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphKind {
    /// Draggable control point.
    Handle,
    /// Fixed curve endpoint.
    Endpoint,
}

impl GlyphKind {
    /// Edge length in pixels.
    pub fn size(self) -> f32 {
        match self {
            GlyphKind::Handle => 10.0,
            GlyphKind::Endpoint => 6.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OverlayShape {
    Rect {
        min: Vec2,
        max: Vec2,
        color: [f32; 4],
    },
    Segment {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: [f32; 4],
    },
    Polyline {
        points: Vec<Vec2>,
        width: f32,
        color: [f32; 4],
    },
    Glyph {
        center: Vec2,
        kind: GlyphKind,
        color: [f32; 4],
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    shapes: Vec<OverlayShape>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn shapes(&self) -> &[OverlayShape] {
        &self.shapes
    }

    pub fn rect(&mut self, min: Vec2, max: Vec2, color: [f32; 4]) {
        self.shapes.push(OverlayShape::Rect { min, max, color });
    }

    pub fn segment(&mut self, from: Vec2, to: Vec2, width: f32, color: [f32; 4]) {
        self.shapes.push(OverlayShape::Segment {
            from,
            to,
            width,
            color,
        });
    }

    pub fn polyline(&mut self, points: Vec<Vec2>, width: f32, color: [f32; 4]) {
        self.shapes.push(OverlayShape::Polyline {
            points,
            width,
            color,
        });
    }

    /// Rectangle outline built from four segments.
    pub fn outline(&mut self, min: Vec2, max: Vec2, width: f32, color: [f32; 4]) {
        let tr = Vec2::new(max.x, min.y);
        let bl = Vec2::new(min.x, max.y);
        self.segment(min, tr, width, color);
        self.segment(tr, max, width, color);
        self.segment(max, bl, width, color);
        self.segment(bl, min, width, color);
    }

    pub fn glyph(&mut self, center: Vec2, kind: GlyphKind, color: [f32; 4]) {
        self.shapes.push(OverlayShape::Glyph {
            center,
            kind,
            color,
        });
    }

    /// Append all shapes as NDC quads for a `viewport`-sized window.
    pub fn tessellate(&self, viewport: Vec2, vertices: &mut Vec<TowerVertex>, indices: &mut Vec<u32>) {
        let w = viewport.x.max(1.0);
        let h = viewport.y.max(1.0);
        let to_ndc = |p: Vec2| -> [f32; 3] { [(p.x / w) * 2.0 - 1.0, 1.0 - (p.y / h) * 2.0, 0.0] };

        let mut quad = |tl: Vec2, tr: Vec2, br: Vec2, bl: Vec2, color: [f32; 4]| {
            add_quad(
                vertices,
                indices,
                to_ndc(tl),
                to_ndc(tr),
                to_ndc(br),
                to_ndc(bl),
                color,
            );
        };

        for shape in &self.shapes {
            match shape {
                OverlayShape::Rect { min, max, color } => {
                    quad(
                        *min,
                        Vec2::new(max.x, min.y),
                        *max,
                        Vec2::new(min.x, max.y),
                        *color,
                    );
                }
                OverlayShape::Segment {
                    from,
                    to,
                    width,
                    color,
                } => {
                    if let Some(corners) = segment_corners(*from, *to, *width) {
                        quad(corners[0], corners[1], corners[2], corners[3], *color);
                    }
                }
                OverlayShape::Polyline {
                    points,
                    width,
                    color,
                } => {
                    for pair in points.windows(2) {
                        if let Some(corners) = segment_corners(pair[0], pair[1], *width) {
                            quad(corners[0], corners[1], corners[2], corners[3], *color);
                        }
                    }
                }
                OverlayShape::Glyph {
                    center,
                    kind,
                    color,
                } => {
                    // Dark rim behind the fill
                    let rim = Vec2::splat(kind.size() * 0.5 + 1.5);
                    let fill = Vec2::splat(kind.size() * 0.5);
                    for (half, c) in [(rim, [0.0, 0.0, 0.0, color[3]]), (fill, *color)] {
                        let min = *center - half;
                        let max = *center + half;
                        quad(min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y), c);
                    }
                }
            }
        }
    }
}

/// Corners of a `width`-thick quad along `from -> to`, `None` if degenerate.
fn segment_corners(from: Vec2, to: Vec2, width: f32) -> Option<[Vec2; 4]> {
    let dir = (to - from).try_normalize()?;
    let offset = dir.perp() * (width * 0.5);
    Some([from + offset, to + offset, to - offset, from - offset])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_to_ndc() {
        let mut list = DrawList::new();
        list.rect(Vec2::ZERO, Vec2::new(400.0, 300.0), [1.0; 4]);

        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        list.tessellate(Vec2::new(800.0, 600.0), &mut vertices, &mut indices);

        assert_eq!(vertices.len(), 4);
        assert_eq!(indices.len(), 6);
        assert_eq!(vertices[0].position, [-1.0, 1.0, 0.0]);
        assert_eq!(vertices[2].position, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_polyline_quads_per_segment() {
        let mut list = DrawList::new();
        let points = (0..=4).map(|i| Vec2::new(i as f32 * 10.0, 0.0)).collect();
        list.polyline(points, 2.0, [1.0; 4]);

        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        list.tessellate(Vec2::new(100.0, 100.0), &mut vertices, &mut indices);
        assert_eq!(vertices.len(), 4 * 4);
    }

    #[test]
    fn test_degenerate_segment_skipped() {
        let mut list = DrawList::new();
        list.segment(Vec2::ONE, Vec2::ONE, 2.0, [1.0; 4]);

        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        list.tessellate(Vec2::new(100.0, 100.0), &mut vertices, &mut indices);
        assert!(vertices.is_empty());
    }

    #[test]
    fn test_glyph_has_rim() {
        let mut list = DrawList::new();
        list.glyph(Vec2::new(50.0, 50.0), GlyphKind::Handle, [1.0; 4]);

        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        list.tessellate(Vec2::new(100.0, 100.0), &mut vertices, &mut indices);
        assert_eq!(vertices.len(), 8);
        assert_eq!(vertices[0].color, [0.0, 0.0, 0.0, 1.0]);
    }
}
