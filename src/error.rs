use thiserror::Error;

/// Fatal errors. The run aborts and no partial geometry is returned.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to parse atlas: {message}")]
    AtlasParse { message: String },

    #[error("failed to parse skeleton JSON: {message}")]
    JsonParse { message: String },

    #[error("missing required top-level key '{key}' in skeleton JSON")]
    JsonMissingKey { key: String },

    #[error("unknown parent bone '{parent}' for bone '{bone}'")]
    JsonUnknownBoneParent { bone: String, parent: String },

    #[error("bone '{bone}' is part of a parent cycle")]
    JsonBoneCycle { bone: String },

    #[error("unknown bone '{bone}' referenced by slot '{slot}'")]
    JsonUnknownSlotBone { slot: String, bone: String },

    #[error("unknown slot '{slot}' referenced by skin '{skin}'")]
    JsonUnknownSkinSlot { skin: String, slot: String },

    #[error("unknown skin: {name}")]
    UnknownSkin { name: String },

    #[error("no attachment resolved to an atlas region; nothing to build")]
    NoGeometry,
}

/// Recoverable conditions. The offending attachment or region is skipped
/// and the run continues; the full list is returned next to the geometry.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("atlas region '{region}' is missing required key '{key}' and was skipped")]
    AtlasRegionMissingKey { region: String, key: String },

    #[error("no atlas region named '{path}' for attachment '{attachment}' in slot '{slot}'")]
    UnresolvedRegion {
        slot: String,
        attachment: String,
        path: String,
    },

    #[error("unsupported attachment type '{kind}' for attachment '{attachment}' in slot '{slot}'")]
    UnsupportedAttachment {
        slot: String,
        attachment: String,
        kind: String,
    },

    #[error(
        "declared page size {declared_width}x{declared_height} differs implausibly from actual texture size {actual_width}x{actual_height}; size correction applied anyway"
    )]
    DimensionMismatch {
        declared_width: u32,
        declared_height: u32,
        actual_width: u32,
        actual_height: u32,
    },
}
