use std::collections::HashMap;

/// One node of the rigid hierarchy. Parents are resolved to arena indices
/// at parse time; the parse rejects unknown names and cycles, so any
/// `parent` here is a valid index into `SkeletonData::bones`.
#[derive(Clone, Debug)]
pub struct BoneData {
    pub name: String,
    pub parent: Option<usize>,
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

/// An attachment mount point bound to one bone. Slot order is draw order.
#[derive(Clone, Debug)]
pub struct SlotData {
    pub name: String,
    pub bone: usize,
    pub attachment: Option<String>,
}

#[derive(Clone, Debug)]
pub struct RegionAttachmentData {
    pub name: String,
    /// Atlas region to resolve; the attachment name is used when absent.
    pub path: Option<String>,
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub width: f32,
    pub height: f32,
}

impl RegionAttachmentData {
    pub fn region_name(&self) -> &str {
        self.path.as_deref().unwrap_or(self.name.as_str())
    }
}

/// Attachments the exporter can emit. Only regions carry geometry here;
/// every other type is kept by name so the resolver can report it.
#[derive(Clone, Debug)]
pub enum AttachmentData {
    Region(RegionAttachmentData),
    Unsupported { name: String, kind: String },
}

impl AttachmentData {
    pub fn name(&self) -> &str {
        match self {
            AttachmentData::Region(a) => a.name.as_str(),
            AttachmentData::Unsupported { name, .. } => name.as_str(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SkinData {
    pub name: String,
    /// Attachments per slot index, keyed by attachment name.
    pub attachments: Vec<HashMap<String, AttachmentData>>,
}

impl SkinData {
    pub fn attachment(&self, slot_index: usize, attachment_name: &str) -> Option<&AttachmentData> {
        self.attachments
            .get(slot_index)
            .and_then(|slot_map| slot_map.get(attachment_name))
    }
}

#[derive(Clone, Debug)]
pub struct SkeletonData {
    pub bones: Vec<BoneData>,
    pub slots: Vec<SlotData>,
    /// Skins in file order; `skins[0]` is the exporter's first skin.
    pub skins: Vec<SkinData>,
}

impl SkeletonData {
    pub fn skin(&self, name: &str) -> Option<&SkinData> {
        self.skins.iter().find(|s| s.name == name)
    }
}
