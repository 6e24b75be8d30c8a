use crate::{
    AtlasRegion, BoneData, DEPTH_STEP, RegionAttachmentData, ResolvedPlacement, SkeletonData,
    SlotData, Transform, build_geometry, world_transforms,
};

fn assert_approx(actual: f32, expected: f32) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= 1.0e-5,
        "expected {expected}, got {actual} (diff {diff})"
    );
}

fn bone(name: &str, parent: Option<usize>) -> BoneData {
    BoneData {
        name: name.to_string(),
        parent,
        x: 0.0,
        y: 0.0,
        rotation: 0.0,
        scale_x: 1.0,
        scale_y: 1.0,
    }
}

fn region(name: &str, x: u32, y: u32, width: u32, height: u32) -> AtlasRegion {
    AtlasRegion {
        name: name.to_string(),
        page: 0,
        x,
        y,
        width,
        height,
        original_width: width,
        original_height: height,
        offset_x: 0,
        offset_y: 0,
        rotated: false,
        index: -1,
    }
}

fn attachment(name: &str, width: f32, height: f32) -> RegionAttachmentData {
    RegionAttachmentData {
        name: name.to_string(),
        path: None,
        x: 0.0,
        y: 0.0,
        rotation: 0.0,
        scale_x: 1.0,
        scale_y: 1.0,
        width,
        height,
    }
}

fn placement(
    slot: usize,
    attachment: RegionAttachmentData,
    region: AtlasRegion,
) -> ResolvedPlacement {
    ResolvedPlacement {
        slot,
        attachment,
        region,
        page_width: 100,
        page_height: 100,
        size_correction: [1.0, 1.0],
    }
}

fn one_bone_skeleton(placements: usize) -> SkeletonData {
    SkeletonData {
        bones: vec![bone("root", None)],
        slots: (0..placements)
            .map(|i| SlotData {
                name: format!("slot{i}"),
                bone: 0,
                attachment: None,
            })
            .collect(),
        skins: Vec::new(),
    }
}

#[test]
fn transform_applies_rotation_then_translation() {
    let t = Transform::from_local(10.0, 0.0, 90.0, 1.0, 1.0);
    let (x, y) = t.apply(5.0, 0.0);
    assert_approx(x, 10.0);
    assert_approx(y, 5.0);
}

#[test]
fn transform_scales_before_rotating() {
    let t = Transform::from_local(0.0, 0.0, 90.0, 2.0, 1.0);
    let (x, y) = t.apply(3.0, 0.0);
    // x is doubled in local space, then rotated onto +y.
    assert_approx(x, 0.0);
    assert_approx(y, 6.0);
}

#[test]
fn world_transform_composes_parent_chain() {
    let mut parent = bone("root", None);
    parent.x = 10.0;
    parent.rotation = 90.0;
    let mut child = bone("child", Some(0));
    child.x = 5.0;

    let world = world_transforms(&[parent, child]);
    let (x, y) = world[1].apply(0.0, 0.0);
    assert_approx(x, 10.0);
    assert_approx(y, 5.0);
}

#[test]
fn world_transforms_are_declaration_order_invariant() {
    let mut root = bone("root", None);
    root.x = 3.0;
    root.rotation = 45.0;
    root.scale_x = 2.0;
    let mut child = bone("child", Some(0));
    child.x = 1.0;
    child.y = -2.0;

    let parent_first = world_transforms(&[root.clone(), child.clone()]);

    let mut child_swapped = child;
    child_swapped.parent = Some(1);
    let child_first = world_transforms(&[child_swapped, root]);

    assert_eq!(parent_first[1], child_first[0]);
    assert_eq!(parent_first[0], child_first[1]);
}

#[test]
fn untrimmed_quad_is_centered_on_the_attachment() {
    let skeleton = one_bone_skeleton(1);
    let placements = vec![placement(0, attachment("hero", 100.0, 100.0), region("hero", 0, 0, 100, 100))];

    let geometry = build_geometry(&skeleton, &placements);
    assert_eq!(geometry.vertices.len(), 4);
    assert_eq!(geometry.faces.len(), 2);

    // BR, BL, UL, UR.
    assert_eq!(geometry.vertices[0], [50.0, -50.0, 0.0]);
    assert_eq!(geometry.vertices[1], [-50.0, -50.0, 0.0]);
    assert_eq!(geometry.vertices[2], [-50.0, 50.0, 0.0]);
    assert_eq!(geometry.vertices[3], [50.0, 50.0, 0.0]);
}

#[test]
fn trimmed_region_shrinks_quad_to_the_packed_rect() {
    let skeleton = one_bone_skeleton(1);
    let mut trimmed = region("hero", 0, 0, 60, 80);
    trimmed.original_width = 100;
    trimmed.original_height = 100;
    trimmed.offset_x = 10;
    trimmed.offset_y = 5;
    let placements = vec![placement(0, attachment("hero", 100.0, 100.0), trimmed)];

    let geometry = build_geometry(&skeleton, &placements);

    // The packed 60x80 rect sits offset by (10, 5) inside the 100x100
    // untrimmed box centered at the origin.
    assert_eq!(geometry.vertices[0], [20.0, -45.0, 0.0]);
    assert_eq!(geometry.vertices[1], [-40.0, -45.0, 0.0]);
    assert_eq!(geometry.vertices[2], [-40.0, 35.0, 0.0]);
    assert_eq!(geometry.vertices[3], [20.0, 35.0, 0.0]);
}

#[test]
fn rotated_region_maps_height_axis_onto_u_extent() {
    let skeleton = one_bone_skeleton(1);
    let mut rotated = region("hero", 0, 0, 20, 10);
    rotated.rotated = true;
    let placements = vec![placement(0, attachment("hero", 20.0, 10.0), rotated)];

    let geometry = build_geometry(&skeleton, &placements);

    let mut us: Vec<f32> = Vec::new();
    let mut vs: Vec<f32> = Vec::new();
    for face in &geometry.uvs {
        for uv in face {
            us.push(uv[0]);
            vs.push(uv[1]);
        }
    }
    let u_span = us.iter().cloned().fold(f32::MIN, f32::max)
        - us.iter().cloned().fold(f32::MAX, f32::min);
    let v_span = vs.iter().cloned().fold(f32::MIN, f32::max)
        - vs.iter().cloned().fold(f32::MAX, f32::min);

    // In the page the rotated rect spans (height, width), so the region's
    // height covers the U extent and its width covers the V extent.
    assert_approx(u_span, 10.0 / 100.0);
    assert_approx(v_span, 20.0 / 100.0);
}

#[test]
fn attachments_are_layered_by_draw_order_depth() {
    let skeleton = one_bone_skeleton(2);
    let placements = vec![
        placement(0, attachment("back", 10.0, 10.0), region("back", 0, 0, 10, 10)),
        placement(1, attachment("front", 10.0, 10.0), region("front", 10, 0, 10, 10)),
    ];

    let geometry = build_geometry(&skeleton, &placements);
    assert_eq!(geometry.vertices.len(), 8);
    for vertex in &geometry.vertices[0..4] {
        assert_approx(vertex[2], 0.0);
    }
    for vertex in &geometry.vertices[4..8] {
        assert_approx(vertex[2], DEPTH_STEP);
    }
    assert_eq!(geometry.face_regions, ["back", "back", "front", "front"]);
}

#[test]
fn each_attachment_owns_its_own_four_vertices() {
    let skeleton = one_bone_skeleton(2);
    let placements = vec![
        placement(0, attachment("a", 10.0, 10.0), region("a", 0, 0, 10, 10)),
        placement(1, attachment("b", 10.0, 10.0), region("b", 0, 0, 10, 10)),
    ];

    let geometry = build_geometry(&skeleton, &placements);
    assert_eq!(geometry.faces[0], [0, 1, 2]);
    assert_eq!(geometry.faces[1], [2, 3, 0]);
    assert_eq!(geometry.faces[2], [4, 5, 6]);
    assert_eq!(geometry.faces[3], [6, 7, 4]);
}
