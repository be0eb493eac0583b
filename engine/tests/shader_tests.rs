//! Shader Tests - WGSL Parse and Validation
//!
//! Both pipelines' shaders must parse and validate, and expose the entry
//! points the viewer binds.

fn validate(source: &str) -> naga::Module {
    let module = naga::front::wgsl::parse_str(source).unwrap_or_else(|e| panic!("{e}"));
    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    )
    .validate(&module)
    .unwrap_or_else(|e| panic!("{e:?}"));
    module
}

fn entry_points(module: &naga::Module) -> Vec<&str> {
    module.entry_points.iter().map(|e| e.name.as_str()).collect()
}

#[test]
fn test_tower_shader_validates() {
    let module = validate(include_str!("../../shaders/tower.wgsl"));
    let names = entry_points(&module);
    assert!(names.contains(&"vs_main"));
    assert!(names.contains(&"fs_main"));
}

#[test]
fn test_overlay_shader_validates() {
    let module = validate(include_str!("../../shaders/overlay.wgsl"));
    let names = entry_points(&module);
    assert!(names.contains(&"vs_main"));
    assert!(names.contains(&"fs_main"));
}

#[test]
fn test_tower_uniform_size() {
    let module = validate(include_str!("../../shaders/tower.wgsl"));
    let uniforms = module
        .types
        .iter()
        .find(|(_, ty)| ty.name.as_deref() == Some("Uniforms"))
        .map(|(_, ty)| ty)
        .unwrap();
    match &uniforms.inner {
        naga::TypeInner::Struct { span, .. } => assert_eq!(*span, 96),
        other => panic!("unexpected uniform type {other:?}"),
    }
}
