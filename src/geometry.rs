use crate::{AtlasRegion, BoneData, RegionAttachmentData, ResolvedPlacement, SkeletonData};

/// Depth policy: each emitted attachment's quad sits `DEPTH_STEP` above
/// the previous one in draw order, so compositing stays back-to-front even
/// when the sink does not respect face emission order for transparency.
pub const DEPTH_STEP: f32 = 0.01;

/// 2x3 affine transform, `[a b tx; c d ty]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// Translate * rotate * scale, the bone-local composition order.
    pub fn from_local(x: f32, y: f32, rotation_degrees: f32, scale_x: f32, scale_y: f32) -> Self {
        let r = rotation_degrees.to_radians();
        let cos = r.cos();
        let sin = r.sin();
        Transform {
            a: cos * scale_x,
            b: -sin * scale_y,
            c: sin * scale_x,
            d: cos * scale_y,
            tx: x,
            ty: y,
        }
    }

    pub fn concat(&self, child: &Transform) -> Transform {
        Transform {
            a: self.a * child.a + self.b * child.c,
            b: self.a * child.b + self.b * child.d,
            c: self.c * child.a + self.d * child.c,
            d: self.c * child.b + self.d * child.d,
            tx: self.a * child.tx + self.b * child.ty + self.tx,
            ty: self.c * child.tx + self.d * child.ty + self.ty,
        }
    }

    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.b * y + self.tx,
            self.c * x + self.d * y + self.ty,
        )
    }
}

/// Computes every bone's world transform, each exactly once. Resolution is
/// memoized along parent chains, so the result depends only on the tree,
/// not on the order bones were declared. The parse already rejected
/// unknown parents and cycles, so every chain terminates at a root.
pub fn world_transforms(bones: &[BoneData]) -> Vec<Transform> {
    let mut world: Vec<Option<Transform>> = vec![None; bones.len()];

    for start in 0..bones.len() {
        if world[start].is_some() {
            continue;
        }

        // Walk up to the nearest already-computed ancestor, then fold the
        // chain back down root-first.
        let mut chain = vec![start];
        let mut current = bones[start].parent;
        while let Some(parent) = current {
            if world[parent].is_some() {
                break;
            }
            chain.push(parent);
            current = bones[parent].parent;
        }

        for &index in chain.iter().rev() {
            let bone = &bones[index];
            let local =
                Transform::from_local(bone.x, bone.y, bone.rotation, bone.scale_x, bone.scale_y);
            world[index] = Some(match bone.parent {
                Some(parent) => world[parent]
                    .unwrap_or(Transform::IDENTITY)
                    .concat(&local),
                None => local,
            });
        }
    }

    world
        .into_iter()
        .map(|t| t.unwrap_or(Transform::IDENTITY))
        .collect()
}

/// Mesh-ready output: triangle faces with per-corner UVs and the source
/// region name per face. Vertices are owned per attachment, never shared.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeometryDescription {
    pub vertices: Vec<[f32; 3]>,
    pub faces: Vec<[u32; 3]>,
    pub uvs: Vec<[[f32; 2]; 3]>,
    pub face_regions: Vec<String>,
}

impl GeometryDescription {
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

/// Assembles the final mesh from resolved placements, in draw order.
pub fn build_geometry(
    skeleton: &SkeletonData,
    placements: &[ResolvedPlacement],
) -> GeometryDescription {
    let world = world_transforms(&skeleton.bones);
    let mut out = GeometryDescription::default();

    for (draw_index, placement) in placements.iter().enumerate() {
        let Some(slot) = skeleton.slots.get(placement.slot) else {
            continue;
        };
        let Some(bone) = world.get(slot.bone) else {
            continue;
        };

        let z = draw_index as f32 * DEPTH_STEP;
        let corners = placement_local_corners(&placement.attachment, &placement.region);
        let uvs = placement_uvs(placement);

        let base = out.vertices.len() as u32;
        for (x, y) in corners {
            let (wx, wy) = bone.apply(x, y);
            out.vertices.push([wx, wy, z]);
        }

        // Two triangles over BR, BL, UL, UR.
        out.faces.push([base, base + 1, base + 2]);
        out.uvs.push([uvs[0], uvs[1], uvs[2]]);
        out.face_regions.push(placement.region.name.clone());

        out.faces.push([base + 2, base + 3, base]);
        out.uvs.push([uvs[2], uvs[3], uvs[0]]);
        out.face_regions.push(placement.region.name.clone());
    }

    out
}

/// Local quad corners for a region attachment, order BR, BL, UL, UR.
///
/// The packed rect is placed inside the untrimmed bounding box via the
/// region's `offset`/`orig`, so trimmed margins are not stretched back in.
/// Trim placement uses ratios of region pixels to original pixels, which
/// are unaffected by page-size correction.
fn placement_local_corners(
    attachment: &RegionAttachmentData,
    region: &AtlasRegion,
) -> [(f32, f32); 4] {
    let ow = region.original_width.max(1) as f32;
    let oh = region.original_height.max(1) as f32;
    let region_scale_x = attachment.width / ow * attachment.scale_x;
    let region_scale_y = attachment.height / oh * attachment.scale_y;

    let local_x = -attachment.width * 0.5 * attachment.scale_x
        + region.offset_x as f32 * region_scale_x;
    let local_y = -attachment.height * 0.5 * attachment.scale_y
        + region.offset_y as f32 * region_scale_y;
    let local_x2 = local_x + region.width as f32 * region_scale_x;
    let local_y2 = local_y + region.height as f32 * region_scale_y;

    let r = attachment.rotation.to_radians();
    let cos = r.cos();
    let sin = r.sin();
    let x = attachment.x;
    let y = attachment.y;

    let local_x_cos = local_x * cos + x;
    let local_x_sin = local_x * sin;
    let local_y_cos = local_y * cos + y;
    let local_y_sin = local_y * sin;
    let local_x2_cos = local_x2 * cos + x;
    let local_x2_sin = local_x2 * sin;
    let local_y2_cos = local_y2 * cos + y;
    let local_y2_sin = local_y2 * sin;

    let bl = (local_x_cos - local_y_sin, local_y_cos + local_x_sin);
    let ul = (local_x_cos - local_y2_sin, local_y2_cos + local_x_sin);
    let ur = (local_x2_cos - local_y2_sin, local_y2_cos + local_x2_sin);
    let br = (local_x2_cos - local_y_sin, local_y_cos + local_x2_sin);

    [br, bl, ul, ur]
}

/// UV corners for a placement, order BR, BL, UL, UR, normalized against
/// the declared page size and scaled by the composed size correction.
/// For rotated regions the packed rect spans (height, width) in the page,
/// so the region's height axis maps onto the U extent.
fn placement_uvs(placement: &ResolvedPlacement) -> [[f32; 2]; 4] {
    let w = placement.page_width.max(1) as f32;
    let h = placement.page_height.max(1) as f32;
    let [cx, cy] = placement.size_correction;
    let region = &placement.region;

    let u = region.x as f32 / w * cx;
    let v = region.y as f32 / h * cy;
    let (u2, v2) = if region.rotated {
        (
            (region.x + region.height) as f32 / w * cx,
            (region.y + region.width) as f32 / h * cy,
        )
    } else {
        (
            (region.x + region.width) as f32 / w * cx,
            (region.y + region.height) as f32 / h * cy,
        )
    };

    if region.rotated {
        [[u2, v], [u2, v2], [u, v2], [u, v]]
    } else {
        [[u2, v2], [u, v2], [u, v], [u2, v]]
    }
}
