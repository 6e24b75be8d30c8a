use crate::{Diagnostic, Error};
use std::collections::HashMap;

/// Declared page size used when an atlas omits its `size:` line. Matches
/// the packer's common default.
pub const DEFAULT_PAGE_SIZE: u32 = 2048;

#[derive(Clone, Debug)]
pub struct Atlas {
    pub pages: Vec<AtlasPage>,
    pub regions: HashMap<String, AtlasRegion>,
}

impl Atlas {
    /// Parses the line-oriented atlas text. Regions missing any of the
    /// keys required for UV computation (`xy`, `size`, `orig`, `offset`)
    /// are skipped and reported through `diagnostics`.
    pub fn parse(input: &str, diagnostics: &mut Vec<Diagnostic>) -> Result<Self, Error> {
        parse_atlas(input, diagnostics)
    }

    pub fn region(&self, name: &str) -> Option<&AtlasRegion> {
        self.regions.get(name)
    }

    pub fn page(&self, index: usize) -> Option<&AtlasPage> {
        self.pages.get(index)
    }
}

#[derive(Clone, Debug)]
pub struct AtlasPage {
    pub name: String,
    /// Authored texture dimensions. These can drift from the shipped
    /// texture's real size; see `resolve::size_correction`.
    pub width: u32,
    pub height: u32,
}

/// One packed sub-image. Field values are kept exactly as authored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AtlasRegion {
    pub name: String,
    pub page: usize,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub original_width: u32,
    pub original_height: u32,
    pub offset_x: i32,
    pub offset_y: i32,
    pub rotated: bool,
    pub index: i32,
}

#[derive(Debug, Default)]
struct RegionBuilder {
    name: String,
    page: usize,
    rotated: bool,
    index: i32,
    xy: Option<(u32, u32)>,
    size: Option<(u32, u32)>,
    orig: Option<(u32, u32)>,
    offset: Option<(i32, i32)>,
}

impl RegionBuilder {
    fn new(name: &str, page: usize) -> Self {
        Self {
            name: name.to_string(),
            page,
            index: -1,
            ..Self::default()
        }
    }

    fn missing_key(&self) -> Option<&'static str> {
        if self.xy.is_none() {
            Some("xy")
        } else if self.size.is_none() {
            Some("size")
        } else if self.orig.is_none() {
            Some("orig")
        } else if self.offset.is_none() {
            Some("offset")
        } else {
            None
        }
    }

    fn finish(self, regions: &mut HashMap<String, AtlasRegion>, diagnostics: &mut Vec<Diagnostic>) {
        if let Some(key) = self.missing_key() {
            diagnostics.push(Diagnostic::AtlasRegionMissingKey {
                region: self.name,
                key: key.to_string(),
            });
            return;
        }
        let (x, y) = self.xy.unwrap_or_default();
        let (width, height) = self.size.unwrap_or_default();
        let (original_width, original_height) = self.orig.unwrap_or_default();
        let (offset_x, offset_y) = self.offset.unwrap_or_default();
        regions.insert(
            self.name.clone(),
            AtlasRegion {
                name: self.name,
                page: self.page,
                x,
                y,
                width,
                height,
                original_width,
                original_height,
                offset_x,
                offset_y,
                rotated: self.rotated,
                index: self.index,
            },
        );
    }
}

fn parse_atlas(input: &str, diagnostics: &mut Vec<Diagnostic>) -> Result<Atlas, Error> {
    let mut pages: Vec<AtlasPage> = Vec::new();
    let mut regions = HashMap::new();

    let mut current_page: Option<usize> = None;
    let mut current_region: Option<RegionBuilder> = None;
    let mut expect_new_page = true;
    let mut page_has_regions = false;

    for raw_line in input.lines() {
        let raw_line = raw_line.trim_end_matches(['\r', '\n']);
        if raw_line.trim().is_empty() {
            if let Some(region) = current_region.take() {
                region.finish(&mut regions, diagnostics);
                page_has_regions = true;
            }
            if current_page.is_some() && page_has_regions {
                expect_new_page = true;
            }
            continue;
        }

        let line = raw_line.trim();

        if current_page.is_none() || expect_new_page {
            pages.push(AtlasPage {
                name: line.to_string(),
                width: DEFAULT_PAGE_SIZE,
                height: DEFAULT_PAGE_SIZE,
            });
            current_page = Some(pages.len() - 1);
            current_region = None;
            expect_new_page = false;
            page_has_regions = false;
            continue;
        }

        let Some(page_index) = current_page else {
            continue;
        };

        if !line.contains(':') {
            if let Some(region) = current_region.take() {
                region.finish(&mut regions, diagnostics);
                page_has_regions = true;
            }
            current_region = Some(RegionBuilder::new(line, page_index));
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        if let Some(region) = current_region.as_mut() {
            match key {
                "rotate" => {
                    region.rotated = matches!(value, "true" | "90");
                }
                "xy" => {
                    region.xy = Some(parse_pair_u32(value).ok_or_else(|| Error::AtlasParse {
                        message: format!("invalid region xy: {value}"),
                    })?);
                }
                "size" => {
                    region.size = Some(parse_pair_u32(value).ok_or_else(|| Error::AtlasParse {
                        message: format!("invalid region size: {value}"),
                    })?);
                }
                "orig" => {
                    region.orig = Some(parse_pair_u32(value).ok_or_else(|| Error::AtlasParse {
                        message: format!("invalid region orig: {value}"),
                    })?);
                }
                "offset" => {
                    region.offset = Some(parse_pair_i32(value).ok_or_else(|| Error::AtlasParse {
                        message: format!("invalid region offset: {value}"),
                    })?);
                }
                "index" => {
                    region.index = value.parse().unwrap_or(-1);
                }
                // Unknown keys come from newer exporters and are ignored.
                _ => {}
            }
        } else {
            match key {
                "size" => {
                    let (w, h) = parse_pair_u32(value).ok_or_else(|| Error::AtlasParse {
                        message: format!("invalid page size: {value}"),
                    })?;
                    if let Some(page) = pages.get_mut(page_index) {
                        page.width = w;
                        page.height = h;
                    }
                }
                // format/filter/repeat/pma describe sampling, not geometry.
                _ => {}
            }
        }
    }

    if let Some(region) = current_region.take() {
        region.finish(&mut regions, diagnostics);
    }

    if pages.is_empty() {
        return Err(Error::AtlasParse {
            message: "empty atlas".to_string(),
        });
    }

    Ok(Atlas { pages, regions })
}

fn parse_pair_u32(value: &str) -> Option<(u32, u32)> {
    let (a, b) = value.split_once(',')?;
    let a = a.trim().parse().ok()?;
    let b = b.trim().parse().ok()?;
    Some((a, b))
}

fn parse_pair_i32(value: &str) -> Option<(i32, i32)> {
    let (a, b) = value.split_once(',')?;
    let a = a.trim().parse().ok()?;
    let b = b.trim().parse().ok()?;
    Some((a, b))
}
