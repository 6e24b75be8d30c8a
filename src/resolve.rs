use crate::{
    Atlas, AtlasRegion, AttachmentData, Diagnostic, RegionAttachmentData, SkeletonData, SkinData,
};

/// Declared/actual ratios outside this range are reported as implausible.
/// The correction is still applied: intentional heavy downscaling exists.
const PLAUSIBLE_RATIO: std::ops::RangeInclusive<f32> = 0.1..=10.0;

/// One attachment joined with its atlas region, in slot draw order.
#[derive(Clone, Debug)]
pub struct ResolvedPlacement {
    pub slot: usize,
    pub attachment: RegionAttachmentData,
    pub region: AtlasRegion,
    /// Declared dimensions of the region's page.
    pub page_width: u32,
    pub page_height: u32,
    /// Multiplier taking declared-space UVs onto the real texture,
    /// composed with the caller's manual adjustment.
    pub size_correction: [f32; 2],
}

/// Joins the active skin's region attachments to atlas regions.
///
/// Compression pipelines resize shipped textures without touching the
/// atlas's declared page size. When the caller knows the real texture
/// dimensions, every UV derived from declared-space pixel coordinates is
/// scaled by `declared / actual` so it references the real texture; a
/// `(1.0, 1.0)` composed factor leaves UVs untouched.
pub fn resolve(
    skeleton: &SkeletonData,
    skin: &SkinData,
    atlas: &Atlas,
    actual_texture_size: Option<[u32; 2]>,
    size_adjustment: [f32; 2],
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<ResolvedPlacement> {
    let mut placements = Vec::new();
    let mut mismatch_reported = vec![false; atlas.pages.len()];

    for (slot_index, slot) in skeleton.slots.iter().enumerate() {
        let Some(attachment_name) = slot.attachment.as_deref() else {
            continue;
        };
        let Some(attachment) = skin.attachment(slot_index, attachment_name) else {
            continue;
        };

        let region_attachment = match attachment {
            AttachmentData::Region(region_attachment) => region_attachment,
            AttachmentData::Unsupported { name, kind } => {
                diagnostics.push(Diagnostic::UnsupportedAttachment {
                    slot: slot.name.clone(),
                    attachment: name.clone(),
                    kind: kind.clone(),
                });
                continue;
            }
        };

        let path = region_attachment.region_name();
        let Some(region) = atlas.region(path) else {
            diagnostics.push(Diagnostic::UnresolvedRegion {
                slot: slot.name.clone(),
                attachment: region_attachment.name.clone(),
                path: path.to_string(),
            });
            continue;
        };

        let Some(page) = atlas.page(region.page) else {
            continue;
        };

        let correction = size_correction(page.width, page.height, actual_texture_size);
        if let Some([actual_w, actual_h]) = actual_texture_size {
            let implausible = !PLAUSIBLE_RATIO.contains(&correction[0])
                || !PLAUSIBLE_RATIO.contains(&correction[1]);
            if implausible && !mismatch_reported[region.page] {
                mismatch_reported[region.page] = true;
                diagnostics.push(Diagnostic::DimensionMismatch {
                    declared_width: page.width,
                    declared_height: page.height,
                    actual_width: actual_w,
                    actual_height: actual_h,
                });
            }
        }

        placements.push(ResolvedPlacement {
            slot: slot_index,
            attachment: region_attachment.clone(),
            region: region.clone(),
            page_width: page.width,
            page_height: page.height,
            size_correction: [
                correction[0] * size_adjustment[0],
                correction[1] * size_adjustment[1],
            ],
        });
    }

    placements
}

fn size_correction(
    declared_width: u32,
    declared_height: u32,
    actual_texture_size: Option<[u32; 2]>,
) -> [f32; 2] {
    match actual_texture_size {
        Some([actual_w, actual_h]) => [
            declared_width.max(1) as f32 / actual_w.max(1) as f32,
            declared_height.max(1) as f32 / actual_h.max(1) as f32,
        ],
        None => [1.0, 1.0],
    }
}
