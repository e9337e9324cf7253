//! Gallery textures: loading, placeholders, content-addressed storage.
//!
//! Every gallery slot maps to one texture. Pixel data is stored once per
//! distinct content hash, so a gallery that repeats an image uploads it once.
//! The renderer consumes textures by slot, never by file path.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Content-addressed texture id computed from the pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub u64);

/// Metadata for one gallery slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureInfo {
    pub id: AssetId,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub source: Option<PathBuf>,
}

impl TextureInfo {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Errors from texture operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no images found in {0}")]
    EmptyDirectory(PathBuf),
    #[error("pixel data for {name} is {actual} bytes, expected {expected}")]
    BadPixelData {
        name: String,
        expected: usize,
        actual: usize,
    },
}

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Aspect ratios cycled through by generated placeholders.
const PLACEHOLDER_SHAPES: [(u32, u32); 4] = [(4, 3), (3, 4), (1, 1), (16, 9)];

/// Slot-ordered texture registry with deduplicated RGBA8 pixel storage.
#[derive(Debug, Clone, Default)]
pub struct TextureStore {
    slots: Vec<TextureInfo>,
    pixels: BTreeMap<AssetId, Vec<u8>>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a slot holding tightly packed RGBA8 pixels.
    pub fn push_rgba(
        &mut self,
        name: impl Into<String>,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
        source: Option<PathBuf>,
    ) -> Result<AssetId, AssetError> {
        let name = name.into();
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(AssetError::BadPixelData {
                name,
                expected,
                actual: pixels.len(),
            });
        }

        let id = content_hash(width, height, &pixels);
        self.pixels.entry(id).or_insert(pixels);
        self.slots.push(TextureInfo {
            id,
            name,
            width,
            height,
            source,
        });
        Ok(id)
    }

    /// Decode one image file into a new slot.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<AssetId, AssetError> {
        let path = path.as_ref();
        let rgba = image::open(path)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        tracing::debug!(%name, width, height, "decoded image");
        self.push_rgba(name, width, height, rgba.into_raw(), Some(path.to_path_buf()))
    }

    /// Load every PNG/JPEG in `dir`, ordered by file name.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, AssetError> {
        let dir = dir.as_ref();
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && has_image_extension(p))
            .collect();
        paths.sort();

        if paths.is_empty() {
            return Err(AssetError::EmptyDirectory(dir.to_path_buf()));
        }

        let mut store = Self::new();
        for path in &paths {
            store.load_file(path)?;
        }
        tracing::info!(
            dir = %dir.display(),
            slots = store.len(),
            unique = store.unique_count(),
            "loaded gallery images"
        );
        Ok(store)
    }

    /// Generated checkerboards in a few aspect ratios, `height` pixels tall.
    pub fn placeholders(count: usize, height: u32) -> Self {
        let mut store = Self::new();
        let height = height.max(8);
        for i in 0..count {
            let (aw, ah) = PLACEHOLDER_SHAPES[i % PLACEHOLDER_SHAPES.len()];
            let width = (height * aw / ah).max(1);
            let pixels = checkerboard(width, height, i);
            // Sizes and colours are derived from the slot, so the length always matches.
            if let Err(e) = store.push_rgba(format!("placeholder_{i}"), width, height, pixels, None) {
                tracing::warn!("skipping placeholder {i}: {e}");
            }
        }
        store
    }

    /// Number of gallery slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of distinct pixel buffers.
    pub fn unique_count(&self) -> usize {
        self.pixels.len()
    }

    pub fn info(&self, slot: usize) -> Option<&TextureInfo> {
        self.slots.get(slot)
    }

    pub fn slots(&self) -> &[TextureInfo] {
        &self.slots
    }

    /// RGBA8 pixels backing `slot`.
    pub fn pixels(&self, slot: usize) -> Option<&[u8]> {
        self.slots
            .get(slot)
            .and_then(|info| self.pixels.get(&info.id))
            .map(Vec::as_slice)
    }

    /// Width / height per slot, for laying the gallery out.
    pub fn aspects(&self) -> Vec<f32> {
        self.slots.iter().map(TextureInfo::aspect).collect()
    }

    /// Write slot metadata to a JSON manifest.
    pub fn save_manifest(&self, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, &self.slots)?;
        Ok(())
    }

    /// Read slot metadata back from a JSON manifest.
    pub fn load_manifest(path: impl AsRef<Path>) -> Result<Vec<TextureInfo>, AssetError> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn content_hash(width: u32, height: u32, pixels: &[u8]) -> AssetId {
    let mut hasher = Sha256::new();
    hasher.update(width.to_le_bytes());
    hasher.update(height.to_le_bytes());
    hasher.update(pixels);
    let result = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&result[..8]);
    AssetId(u64::from_le_bytes(bytes))
}

/// Two-tone checkerboard; the tones rotate around the hue circle per slot.
fn checkerboard(width: u32, height: u32, slot: usize) -> Vec<u8> {
    let hue = (slot as f32 * 0.618_034).fract();
    let light = hue_to_rgb(hue, 0.85);
    let dark = hue_to_rgb(hue, 0.45);
    let cell = 64;

    let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        for x in 0..width {
            let c = if (x / cell + y / cell) % 2 == 0 { light } else { dark };
            pixels.extend_from_slice(&[c[0], c[1], c[2], 255]);
        }
    }
    pixels
}

fn hue_to_rgb(hue: f32, value: f32) -> [u8; 3] {
    let channel = |offset: f32| {
        let k = (hue * 6.0 + offset) % 6.0;
        let v = value * (1.0 - (k.min(4.0 - k).clamp(0.0, 1.0)) * 0.6);
        (v * 255.0).round() as u8
    };
    [channel(5.0), channel(3.0), channel(1.0)]
}

pub fn crate_info() -> &'static str {
    "reveal-assets v0.1.0"
}
