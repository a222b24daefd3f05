use std::collections::{HashMap, HashSet};
use std::path::Path;

use image::{Rgba, RgbaImage};
use wgpu::util::DeviceExt;

/// Sprite name of the opaque white patch used for flat-colour quads.
pub const WHITE: &str = "white";

/// Row width of the packed atlas texture in pixels.
const ATLAS_WIDTH: u32 = 512;
/// Empty pixels kept between neighbouring sprites.
const PADDING: u32 = 1;

// ── SpriteData ───────────────────────────────────────────────────────────────

/// UV range of a single named sprite inside the atlas.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SpriteData {
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
}

// ── Shelf packing (pure, GPU-free) ───────────────────────────────────────────

/// One sprite's position inside the packed atlas.
#[derive(Debug, PartialEq)]
pub(crate) struct PlacedSprite {
    pub name: String,
    /// Top-left pixel coordinate inside the atlas.
    pub atlas_x: u32,
    pub atlas_y: u32,
    pub pixel_w: u32,
    pub pixel_h: u32,
}

/// Shelf-pack `(name, w, h)` items into rows at most `max_width` wide.
///
/// Taller items are placed first. Duplicate names keep their first
/// (tallest) occurrence; items wider than a row are skipped. Returns the
/// placements and the atlas size, both sides rounded up to a power of two.
pub(crate) fn pack(items: &[(String, u32, u32)], max_width: u32) -> (Vec<PlacedSprite>, u32, u32) {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| items[b].2.cmp(&items[a].2));

    let mut placed_names: HashSet<&str> = HashSet::new();
    let mut placements: Vec<PlacedSprite> = Vec::new();
    let mut cur_x = 0u32;
    let mut cur_y = 0u32;
    let mut row_h = 0u32;

    for &i in &order {
        let (ref name, w, h) = items[i];
        if !placed_names.insert(name.as_str()) {
            continue;
        }
        if w > max_width {
            tracing::warn!(sprite = %name, width = w, max_width, "sprite wider than the atlas; skipping");
            continue;
        }
        if cur_x > 0 && cur_x + w > max_width {
            cur_y += row_h + PADDING;
            cur_x = 0;
            row_h = 0;
        }

        placements.push(PlacedSprite {
            name: name.clone(),
            atlas_x: cur_x,
            atlas_y: cur_y,
            pixel_w: w,
            pixel_h: h,
        });
        cur_x += w + PADDING;
        row_h = row_h.max(h);
    }

    let used_h = cur_y + row_h;
    let atlas_h = used_h.next_power_of_two().max(1);
    let atlas_w = max_width.next_power_of_two();
    (placements, atlas_w, atlas_h)
}

// ── AtlasBuilder ─────────────────────────────────────────────────────────────

/// Collects named images, then composites them into one RGBA sheet.
#[derive(Default)]
pub struct AtlasBuilder {
    images: Vec<(String, RgbaImage)>,
}

impl AtlasBuilder {
    /// A builder that already holds the [`WHITE`] patch.
    pub fn new() -> Self {
        let mut builder = Self::default();
        builder.add(WHITE, RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255])));
        builder
    }

    pub fn add(&mut self, name: impl Into<String>, image: RgbaImage) {
        self.images.push((name.into(), image));
    }

    /// Add every `.png` under `path`, named by file stem. Unreadable files
    /// and repeated stems are skipped with a warning. Returns how many
    /// images were added.
    pub fn load_folder(&mut self, path: &Path) -> usize {
        let mut seen: HashSet<String> = self.images.iter().map(|(n, _)| n.clone()).collect();
        let mut added = 0;

        for entry in walkdir::WalkDir::new(path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let file_path = entry.path();
            if file_path.extension().and_then(|s| s.to_str()) != Some("png") {
                continue;
            }
            let name = match file_path.file_stem().and_then(|s| s.to_str()) {
                Some(n) if !n.is_empty() => n.to_string(),
                _ => continue,
            };
            if !seen.insert(name.clone()) {
                tracing::warn!(sprite = %name, path = %file_path.display(), "duplicate sprite name; skipping");
                continue;
            }
            match image::open(file_path) {
                Ok(img) => {
                    self.images.push((name, img.to_rgba8()));
                    added += 1;
                }
                Err(e) => tracing::warn!(path = %file_path.display(), error = %e, "failed to load sprite"),
            }
        }

        tracing::info!(path = %path.display(), sprites = added, "loaded sprite folder");
        added
    }

    /// Pack and composite everything added so far.
    pub fn build(self) -> AtlasImage {
        let dims: Vec<(String, u32, u32)> = self
            .images
            .iter()
            .map(|(name, img)| (name.clone(), img.width(), img.height()))
            .collect();
        let (placements, atlas_w, atlas_h) = pack(&dims, ATLAS_WIDTH);

        let lookup: HashMap<&str, &RgbaImage> = self.images.iter().map(|(n, i)| (n.as_str(), i)).collect();
        let mut image = RgbaImage::new(atlas_w, atlas_h);
        let mut sprites = HashMap::new();

        for p in &placements {
            let Some(src) = lookup.get(p.name.as_str()) else { continue };
            image::imageops::replace(&mut image, *src, p.atlas_x as i64, p.atlas_y as i64);

            let uv_min = [p.atlas_x as f32 / atlas_w as f32, p.atlas_y as f32 / atlas_h as f32];
            let uv_max = [
                (p.atlas_x + p.pixel_w) as f32 / atlas_w as f32,
                (p.atlas_y + p.pixel_h) as f32 / atlas_h as f32,
            ];
            sprites.insert(p.name.clone(), SpriteData { uv_min, uv_max });
        }

        AtlasImage { image, sprites: SpriteSheet { sprites } }
    }
}

/// A composited atlas not yet on the GPU.
pub struct AtlasImage {
    pub image: RgbaImage,
    pub sprites: SpriteSheet,
}

// ── SpriteSheet ──────────────────────────────────────────────────────────────

/// Name → UV lookup for everything packed into the atlas.
#[derive(Clone, Debug, Default)]
pub struct SpriteSheet {
    sprites: HashMap<String, SpriteData>,
}

impl SpriteSheet {
    pub fn get(&self, name: &str) -> Option<SpriteData> {
        self.sprites.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sprites.contains_key(name)
    }

    /// UVs of the white patch; flat-colour quads multiply it by their tint.
    pub fn white(&self) -> SpriteData {
        self.get(WHITE).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

// ── GPU texture ──────────────────────────────────────────────────────────────

pub struct Atlas {
    pub texture_view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl Atlas {
    pub fn upload(device: &wgpu::Device, queue: &wgpu::Queue, img: &RgbaImage) -> Self {
        let (w, h) = img.dimensions();
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("atlas"),
                size: wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            img.as_raw(),
        );
        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        Self { texture_view, sampler }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
