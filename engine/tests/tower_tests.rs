//! Tower Tests - Store, Assembler and Snapshot Flow
//!
//! Drives the assembler only through the parameter store's change
//! notifications, the way the viewer does.

use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;
use glam::Vec3;
use tower_sculpt_engine::render::PrismTemplate;
use tower_sculpt_engine::tower::floor::floor_transforms;
use tower_sculpt_engine::tower::snapshot;
use tower_sculpt_engine::tower::{
    Channel, CurvePoint, Easing, HandleId, ParamChange, ParameterStore, TowerAssembler,
    TowerParams,
};

fn wired(params: TowerParams) -> (ParameterStore, Rc<RefCell<TowerAssembler>>) {
    let assembler = Rc::new(RefCell::new(TowerAssembler::new()));
    let mut store = ParameterStore::new(params);
    store.subscribe(TowerAssembler::listener(Rc::clone(&assembler)));
    store.notify(ParamChange::Structural);
    (store, assembler)
}

fn vertex_count(assembler: &Rc<RefCell<TowerAssembler>>) -> usize {
    assembler
        .borrow()
        .mesh()
        .map(|m| m.geometry().vertex_count())
        .unwrap_or(0)
}

// ============================================================================
// Vertex Count
// ============================================================================

#[test]
fn test_vertex_count_tracks_structure() {
    let (mut store, assembler) = wired(TowerParams::default());

    for (levels, segments) in [(3, 3), (7, 4), (50, 16), (200, 64)] {
        store.update(ParamChange::Structural, |p| {
            p.levels = levels;
            p.radial_segments = segments;
        });
        let count = vertex_count(&assembler);
        assert_eq!(
            count,
            levels as usize * PrismTemplate::vertex_count_for(segments)
        );
        assert_eq!(count % 3, 0);
    }
}

#[test]
fn test_crate_example_flow() {
    let (mut store, assembler) = wired(TowerParams::default());
    store.update(ParamChange::Structural, |p| p.levels = 40);
    assert_eq!(vertex_count(&assembler), 40 * 12 * 6);
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_repeated_updates_identical() {
    let mut params = TowerParams::default();
    params.rotation_curve.enabled = true;
    params.color_easing = Easing::EaseOutCubic;
    params.total_rotation = 72.0;
    let (mut store, assembler) = wired(params);

    let first = assembler.borrow().mesh().unwrap().geometry().clone();
    store.notify(ParamChange::Cosmetic);
    let second = assembler.borrow().mesh().unwrap().geometry().clone();
    assert_eq!(first, second);
}

// ============================================================================
// Color
// ============================================================================

#[test]
fn test_color_endpoints_match_base_and_top() {
    let params = TowerParams {
        levels: 8,
        base_color: Vec3::new(0.2, 0.4, 0.6),
        top_color: Vec3::new(0.9, 0.1, 0.0),
        ..TowerParams::default()
    };
    let (store, assembler) = wired(params);
    let assembler = assembler.borrow();
    let geometry = assembler.mesh().unwrap().geometry();
    let (min_y, max_y) = geometry.y_range().unwrap();

    let mut bottom = 0;
    let mut top = 0;
    for (p, c) in geometry.positions.iter().zip(&geometry.colors) {
        if p.y == min_y {
            assert_eq!(*c, store.params().base_color);
            bottom += 1;
        } else if p.y == max_y {
            assert_eq!(*c, store.params().top_color);
            top += 1;
        }
    }
    assert!(bottom > 0 && top > 0);
}

#[test]
fn test_color_curve_shapes_gradient() {
    let mut params = TowerParams {
        levels: 10,
        base_color: Vec3::ZERO,
        top_color: Vec3::ONE,
        ..TowerParams::default()
    };
    params.color_curve.enabled = true;
    params.color_curve.p1 = CurvePoint::new(0.3, 1.0);
    params.color_curve.p2 = CurvePoint::new(0.7, 1.0);
    let (_store, assembler) = wired(params);

    let assembler = assembler.borrow();
    let geometry = assembler.mesh().unwrap().geometry();
    let (min_y, max_y) = geometry.y_range().unwrap();
    let mid = (min_y + max_y) * 0.5;

    // Both handles at y=1 push the midpoint well above a linear blend
    let (p, c) = geometry
        .positions
        .iter()
        .zip(&geometry.colors)
        .min_by(|a, b| (a.0.y - mid).abs().total_cmp(&(b.0.y - mid).abs()))
        .unwrap();
    let h = (p.y - min_y) / (max_y - min_y);
    assert!(c.x > h + 0.2, "h={h} color={c:?}");
}

// ============================================================================
// Twist
// ============================================================================

#[test]
fn test_total_rotation_preserves_heights() {
    let (mut store, assembler) = wired(TowerParams::default());
    let before = assembler.borrow().mesh().unwrap().geometry().y_range().unwrap();

    store.update(ParamChange::Cosmetic, |p| p.total_rotation = 90.0);
    let after = assembler.borrow().mesh().unwrap().geometry().y_range().unwrap();

    assert_relative_eq!(before.0, after.0, epsilon = 1e-4);
    assert_relative_eq!(before.1, after.1, epsilon = 1e-4);
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_three_level_rotation() {
    let params = TowerParams {
        levels: 3,
        base_degrees: 0.0,
        top_degrees: 90.0,
        rotation_easing: Easing::Linear,
        ..TowerParams::default()
    };
    let degrees: Vec<f32> = floor_transforms(&params).map(|f| f.rotation_degrees).collect();
    assert_relative_eq!(degrees[0], 0.0);
    assert_relative_eq!(degrees[1], 45.0);
    assert_relative_eq!(degrees[2], 90.0);
}

#[test]
fn test_single_level_tower() {
    let params = TowerParams {
        levels: 1,
        floor_thickness: 0.5,
        ..TowerParams::default()
    };
    let (_store, assembler) = wired(params);
    let assembler = assembler.borrow();
    let aabb = assembler.mesh().unwrap().geometry().bounding_box().unwrap();
    assert_relative_eq!(aabb.min.y, 0.0, epsilon = 1e-6);
    assert_relative_eq!(aabb.max.y, 0.5, epsilon = 1e-6);
}

// ============================================================================
// Snapshots
// ============================================================================

#[test]
fn test_snapshot_load_rebuilds() {
    let (mut store, assembler) = wired(TowerParams::default());
    let builds_before = assembler.borrow().template_builds();

    let json = r#"{
        "levels": 5,
        "radialSegments": 10,
        "sizeCurve": { "enabled": true, "p1": { "x": 2.0, "y": -1.0 }, "p2": { "x": 0.5, "y": 0.5 } }
    }"#;
    store.apply_snapshot(snapshot::from_json(json).unwrap());

    assert_eq!(vertex_count(&assembler), 5 * 12 * 10);
    assert_eq!(assembler.borrow().template_builds(), builds_before + 1);
    assert_eq!(store.params().size_curve.p1, CurvePoint::new(1.0, 0.0));
}

#[test]
fn test_snapshot_round_trip_keeps_fields() {
    let mut params = TowerParams {
        levels: 33,
        radial_segments: 7,
        total_height: 20.0,
        floor_thickness: 0.6,
        total_rotation: -30.0,
        base_distance: 1.5,
        top_distance: 0.25,
        offset_easing: Easing::EaseInQuad,
        ..TowerParams::default()
    };
    params.color_curve.enabled = true;
    params.color_curve.bounds.y_max = 1.5;
    params.color_curve.p2 = CurvePoint::new(0.9, 1.4);

    let back = snapshot::from_json(&snapshot::to_json(&params).unwrap()).unwrap();
    assert_eq!(back, params);
}

// ============================================================================
// Store writes
// ============================================================================

#[test]
fn test_handle_write_reinstances_without_rebuild() {
    let (mut store, assembler) = wired(TowerParams::default());
    let id = assembler.borrow().mesh().unwrap().id();
    let revision = assembler.borrow().mesh().unwrap().revision();

    store.set_curve_enabled(Channel::Size, true);
    store.set_handle(Channel::Size, HandleId::P1, CurvePoint::new(0.2, 0.9));

    let assembler = assembler.borrow();
    let mesh = assembler.mesh().unwrap();
    assert_eq!(mesh.id(), id);
    assert_eq!(mesh.revision(), revision + 2);
}
