use crate::{AttachmentData, BoneData, Error, RegionAttachmentData, SkeletonData, SkinData, SlotData};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

/// Skeleton JSON revision to parse. The engine commits to one fixed
/// revision (the 3.x export the original authoring tool produces, with
/// skins as an array of `{name, attachments}` objects); the caller picks
/// the revision explicitly rather than the parser sniffing it.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum SkeletonSchema {
    #[default]
    Spine3,
}

#[derive(Debug, Deserialize)]
struct Root {
    bones: Option<Vec<BoneDef>>,
    slots: Option<Vec<SlotDef>>,
    skins: Option<Vec<SkinDef>>,
}

fn default_one() -> f32 {
    1.0
}

#[derive(Debug, Deserialize)]
struct BoneDef {
    name: String,
    #[serde(default)]
    parent: Option<String>,
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
    #[serde(default)]
    rotation: f32,
    #[serde(default = "default_one", rename = "scaleX")]
    scale_x: f32,
    #[serde(default = "default_one", rename = "scaleY")]
    scale_y: f32,
}

#[derive(Debug, Deserialize)]
struct SlotDef {
    name: String,
    bone: String,
    #[serde(default)]
    attachment: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SkinDef {
    name: String,
    #[serde(default)]
    attachments: BTreeMap<String, BTreeMap<String, AttachmentDef>>,
}

#[derive(Debug, Deserialize)]
struct AttachmentDef {
    #[serde(default, rename = "type")]
    attachment_type: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
    #[serde(default)]
    rotation: f32,
    #[serde(default = "default_one", rename = "scaleX")]
    scale_x: f32,
    #[serde(default = "default_one", rename = "scaleY")]
    scale_y: f32,
    #[serde(default)]
    width: f32,
    #[serde(default)]
    height: f32,
}

impl SkeletonData {
    pub fn from_json_str(input: &str) -> Result<Self, Error> {
        Self::from_json_str_with_schema(input, SkeletonSchema::default())
    }

    pub fn from_json_str_with_schema(input: &str, schema: SkeletonSchema) -> Result<Self, Error> {
        match schema {
            SkeletonSchema::Spine3 => parse_spine3(input),
        }
    }
}

fn parse_spine3(input: &str) -> Result<SkeletonData, Error> {
    let root: Root = serde_json::from_str(input).map_err(|e| Error::JsonParse {
        message: e.to_string(),
    })?;

    let bone_defs = root.bones.ok_or_else(|| Error::JsonMissingKey {
        key: "bones".to_string(),
    })?;
    let slot_defs = root.slots.ok_or_else(|| Error::JsonMissingKey {
        key: "slots".to_string(),
    })?;
    let skin_defs = root.skins.ok_or_else(|| Error::JsonMissingKey {
        key: "skins".to_string(),
    })?;

    // Two passes: names first, then parent links, so a child may be
    // declared before its parent without changing the result.
    let mut bone_index = HashMap::<String, usize>::new();
    for (index, bone) in bone_defs.iter().enumerate() {
        bone_index.insert(bone.name.clone(), index);
    }

    let mut bones = Vec::with_capacity(bone_defs.len());
    for bone in bone_defs {
        let parent = match bone.parent.as_deref() {
            None => None,
            Some(parent_name) => Some(bone_index.get(parent_name).copied().ok_or_else(|| {
                Error::JsonUnknownBoneParent {
                    bone: bone.name.clone(),
                    parent: parent_name.to_string(),
                }
            })?),
        };
        bones.push(BoneData {
            name: bone.name,
            parent,
            x: bone.x,
            y: bone.y,
            rotation: bone.rotation,
            scale_x: bone.scale_x,
            scale_y: bone.scale_y,
        });
    }

    reject_parent_cycles(&bones)?;

    let mut slots = Vec::with_capacity(slot_defs.len());
    let mut slot_index = HashMap::<String, usize>::new();
    for slot in slot_defs {
        let bone =
            bone_index
                .get(&slot.bone)
                .copied()
                .ok_or_else(|| Error::JsonUnknownSlotBone {
                    slot: slot.name.clone(),
                    bone: slot.bone.clone(),
                })?;
        slot_index.insert(slot.name.clone(), slots.len());
        slots.push(SlotData {
            name: slot.name,
            bone,
            attachment: slot.attachment,
        });
    }

    let mut skins = Vec::with_capacity(skin_defs.len());
    for skin in skin_defs {
        let mut attachments = vec![HashMap::new(); slots.len()];
        for (slot_name, slot_attachments) in skin.attachments {
            let s_index =
                *slot_index
                    .get(&slot_name)
                    .ok_or_else(|| Error::JsonUnknownSkinSlot {
                        skin: skin.name.clone(),
                        slot: slot_name.clone(),
                    })?;
            for (attachment_name, def) in slot_attachments {
                let internal_name = def.name.clone().unwrap_or_else(|| attachment_name.clone());
                let kind = def.attachment_type.as_deref().unwrap_or("region");
                let attachment = match kind {
                    "region" => AttachmentData::Region(RegionAttachmentData {
                        name: internal_name,
                        path: def.path,
                        x: def.x,
                        y: def.y,
                        rotation: def.rotation,
                        scale_x: def.scale_x,
                        scale_y: def.scale_y,
                        width: def.width,
                        height: def.height,
                    }),
                    other => AttachmentData::Unsupported {
                        name: internal_name,
                        kind: other.to_string(),
                    },
                };
                attachments[s_index].insert(attachment_name, attachment);
            }
        }
        skins.push(SkinData {
            name: skin.name,
            attachments,
        });
    }

    Ok(SkeletonData {
        bones,
        slots,
        skins,
    })
}

/// The transform pass needs a finite parent chain for every bone. With
/// forward references allowed at parse, a cycle is representable in the
/// source, so it has to be rejected here.
fn reject_parent_cycles(bones: &[BoneData]) -> Result<(), Error> {
    for start in 0..bones.len() {
        let mut steps = 0usize;
        let mut current = Some(start);
        while let Some(index) = current {
            if steps > bones.len() {
                return Err(Error::JsonBoneCycle {
                    bone: bones[start].name.clone(),
                });
            }
            steps += 1;
            current = bones[index].parent;
        }
    }
    Ok(())
}
