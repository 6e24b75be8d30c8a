use crate::{
    Atlas, Diagnostic, Error, GeometryDescription, SkeletonData, SkeletonSchema, SkinData,
    build_geometry, resolve,
};

#[derive(Clone, Debug)]
pub struct ConvertOptions {
    /// Real dimensions of the loaded texture, when known. Drives the
    /// page-size correction; `None` trusts the declared page size.
    pub actual_texture_size: Option<[u32; 2]>,
    /// Manual per-axis UV multiplier, composed on top of the computed
    /// correction for textures whose real size is itself unreliable.
    pub size_adjustment: [f32; 2],
    /// Skin to resolve. `None` picks `"default"`, falling back to the
    /// first skin in file order.
    pub skin: Option<String>,
    pub schema: SkeletonSchema,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            actual_texture_size: None,
            size_adjustment: [1.0, 1.0],
            skin: None,
            schema: SkeletonSchema::default(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Conversion {
    pub geometry: GeometryDescription,
    /// Non-fatal conditions encountered along the way, in pipeline order.
    pub diagnostics: Vec<Diagnostic>,
}

/// Runs the whole pipeline: parse both inputs, join attachments to atlas
/// regions, build the mesh. Pure function of its arguments; nothing is
/// kept between runs.
///
/// Fatal errors abort with no geometry. Recoverable problems (unresolved
/// regions, unsupported attachment types, implausible size corrections)
/// skip the offending attachment and are returned as diagnostics; the run
/// fails with [`Error::NoGeometry`] only when nothing at all resolved.
pub fn convert(
    skeleton_json: &str,
    atlas_text: &str,
    options: &ConvertOptions,
) -> Result<Conversion, Error> {
    let mut diagnostics = Vec::new();

    let atlas = Atlas::parse(atlas_text, &mut diagnostics)?;
    let skeleton = SkeletonData::from_json_str_with_schema(skeleton_json, options.schema)?;
    let skin = select_skin(&skeleton, options.skin.as_deref())?;

    let placements = resolve(
        &skeleton,
        skin,
        &atlas,
        options.actual_texture_size,
        options.size_adjustment,
        &mut diagnostics,
    );

    let geometry = build_geometry(&skeleton, &placements);
    if geometry.is_empty() {
        return Err(Error::NoGeometry);
    }

    Ok(Conversion {
        geometry,
        diagnostics,
    })
}

fn select_skin<'a>(skeleton: &'a SkeletonData, name: Option<&str>) -> Result<&'a SkinData, Error> {
    match name {
        Some(name) => skeleton.skin(name).ok_or_else(|| Error::UnknownSkin {
            name: name.to_string(),
        }),
        None => skeleton
            .skin("default")
            .or_else(|| skeleton.skins.first())
            .ok_or_else(|| Error::UnknownSkin {
                name: "default".to_string(),
            }),
    }
}
