//! crafting grid compositing.
//!
//! icons are fetched concurrently, then decoded, scaled and drawn over the template on
//! the blocking pool. a slot that can't be loaded is logged and left empty.

use std::{
    io::Cursor,
    path::{Path, PathBuf},
    sync::Arc,
};

use futures::future::join_all;
use image::{imageops, ImageFormat, Rgba, RgbaImage};

use crate::constants::grid::{DEFAULT_TEMPLATE_SIZE, SLOT_COORDS, SLOT_COUNT, SLOT_SIZE};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("expected {SLOT_COUNT} slots, got {0}")]
    WrongSlotCount(usize),
    #[error("failed to load template: {0}")]
    Template(#[source] image::ImageError),
    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),
    #[error("render task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, thiserror::Error)]
pub enum SlotError {
    #[error("request failed: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("server answered with {0}")]
    Status(reqwest::StatusCode),
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

#[derive(Clone)]
pub struct Renderer {
    template: Arc<RgbaImage>,
    client: reqwest::Client,
    asset_root: PathBuf,
}

impl Renderer {
    pub fn new(template: RgbaImage, client: reqwest::Client, asset_root: impl Into<PathBuf>) -> Self {
        Self {
            template: Arc::new(template),
            client,
            asset_root: asset_root.into(),
        }
    }

    /// draws `items` onto a copy of the template.
    #[tracing::instrument(skip_all)]
    pub async fn render(&self, items: &[Option<String>]) -> Result<RgbaImage, RenderError> {
        if items.len() != SLOT_COUNT {
            return Err(RenderError::WrongSlotCount(items.len()));
        }

        let fetches = items.iter().enumerate().filter_map(|(slot, item)| {
            let item = item.as_deref().map(str::trim).filter(|item| !item.is_empty())?;

            Some(async move {
                match self.fetch(item).await {
                    Ok(bytes) => Some((slot, bytes)),
                    Err(e) => {
                        tracing::warn!(err = ?e, slot, item, "an error occurred when loading slot image, skipping");
                        None
                    }
                }
            })
        });

        let icons: Vec<(usize, Vec<u8>)> = join_all(fetches).await.into_iter().flatten().collect();

        let template = self.template.clone();
        let canvas = tokio::task::spawn_blocking(move || compose(&template, icons)).await?;

        Ok(canvas)
    }

    async fn fetch(&self, item: &str) -> Result<Vec<u8>, SlotError> {
        if item.starts_with("http") {
            let resp = self.client.get(item).send().await?;

            if !resp.status().is_success() {
                return Err(SlotError::Status(resp.status()));
            }

            Ok(resp.bytes().await?.to_vec())
        } else {
            Ok(tokio::fs::read(self.resolve_path(item)).await?)
        }
    }

    fn resolve_path(&self, item: &str) -> PathBuf {
        let path = Path::new(item);

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.asset_root.join(path)
        }
    }
}

/// draws already fetched icons onto a copy of `template`. undecodable icons are skipped.
pub fn compose(template: &RgbaImage, icons: Vec<(usize, Vec<u8>)>) -> RgbaImage {
    let mut canvas = template.clone();

    for (slot, bytes) in icons {
        let Some(&(x, y)) = SLOT_COORDS.get(slot) else {
            tracing::warn!(slot, "slot index out of range, skipping");
            continue;
        };

        let icon = match image::load_from_memory(&bytes) {
            Ok(icon) => icon.to_rgba8(),
            Err(e) => {
                tracing::warn!(err = ?e, slot, "an error occurred when decoding slot image, skipping");
                continue;
            }
        };

        let icon = imageops::resize(&icon, SLOT_SIZE, SLOT_SIZE, imageops::FilterType::Nearest);
        imageops::overlay(&mut canvas, &icon, x as i64, y as i64);
    }

    canvas
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(RenderError::Encode)?;

    Ok(buf.into_inner())
}

/// writes `image` as `<uuid>.png` under `dir` and returns the file name.
pub async fn save_png(image: RgbaImage, dir: &Path) -> Result<String, RenderError> {
    let bytes = tokio::task::spawn_blocking(move || encode_png(&image)).await??;
    let file_name = format!("{}.png", uuid::Uuid::new_v4());

    tokio::fs::write(dir.join(&file_name), bytes)
        .await
        .inspect_err(|e| tracing::error!(err = ?e, "an error occurred when writing rendered image"))?;

    Ok(file_name)
}

/// loads the background template, drawing the built-in one if `path` doesn't exist.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub async fn load_template(path: impl AsRef<Path>) -> Result<RgbaImage, RenderError> {
    let path = path.as_ref();

    if !tokio::fs::try_exists(path).await? {
        tracing::warn!("template not found, using the built-in crafting grid.");
        return Ok(default_template());
    }

    let bytes = tokio::fs::read(path).await?;
    let template = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
        .await?
        .map_err(RenderError::Template)?;

    Ok(template.to_rgba8())
}

const PANEL: Rgba<u8> = Rgba([198, 198, 198, 255]);
const SHADOW: Rgba<u8> = Rgba([55, 55, 55, 255]);
const HIGHLIGHT: Rgba<u8> = Rgba([255, 255, 255, 255]);
const SLOT_FILL: Rgba<u8> = Rgba([139, 139, 139, 255]);

/// a plain inventory-style panel with nine recessed slots.
pub fn default_template() -> RgbaImage {
    let (width, height) = DEFAULT_TEMPLATE_SIZE;
    let mut template = RgbaImage::from_pixel(width, height, PANEL);

    for &(x, y) in SLOT_COORDS.iter() {
        let (left, top) = (x - 2, y - 2);
        let edge = SLOT_SIZE + 4;

        fill_rect(&mut template, left, top, edge, edge, HIGHLIGHT);
        fill_rect(&mut template, left, top, edge - 2, edge - 2, SHADOW);
        fill_rect(&mut template, x, y, SLOT_SIZE, SLOT_SIZE, SLOT_FILL);
    }

    template
}

fn fill_rect(image: &mut RgbaImage, x: u32, y: u32, width: u32, height: u32, color: Rgba<u8>) {
    for py in y..(y + height).min(image.height()) {
        for px in x..(x + width).min(image.width()) {
            image.put_pixel(px, py, color);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::presets::PresetTable;

    pub(crate) const RED: Rgba<u8> = Rgba([200, 30, 30, 255]);
    pub(crate) const CYAN: Rgba<u8> = Rgba([60, 220, 220, 255]);
    pub(crate) const BROWN: Rgba<u8> = Rgba([120, 80, 40, 255]);

    pub(crate) fn solid_png(color: Rgba<u8>) -> Vec<u8> {
        encode_png(&RgbaImage::from_pixel(16, 16, color)).unwrap()
    }

    pub(crate) fn slot_center(slot: usize) -> (u32, u32) {
        let (x, y) = SLOT_COORDS[slot];
        (x + SLOT_SIZE / 2, y + SLOT_SIZE / 2)
    }

    fn renderer(root: &Path) -> Renderer {
        Renderer::new(default_template(), reqwest::Client::new(), root)
    }

    #[test]
    fn default_template_has_empty_slots() {
        let template = default_template();

        assert_eq!(template.dimensions(), DEFAULT_TEMPLATE_SIZE);
        for slot in 0..SLOT_COUNT {
            let (cx, cy) = slot_center(slot);
            assert_eq!(*template.get_pixel(cx, cy), SLOT_FILL);
        }
    }

    #[test]
    fn compose_scales_icons_into_their_slot() {
        let template = default_template();
        let canvas = compose(&template, vec![(0, solid_png(RED)), (8, solid_png(CYAN))]);

        let (x, y) = SLOT_COORDS[0];
        assert_eq!(*canvas.get_pixel(x, y), RED);
        assert_eq!(*canvas.get_pixel(x + SLOT_SIZE - 1, y + SLOT_SIZE - 1), RED);
        assert_eq!(*canvas.get_pixel(x + SLOT_SIZE, y + SLOT_SIZE), *template.get_pixel(x + SLOT_SIZE, y + SLOT_SIZE));

        let (cx, cy) = slot_center(8);
        assert_eq!(*canvas.get_pixel(cx, cy), CYAN);

        let (cx, cy) = slot_center(4);
        assert_eq!(*canvas.get_pixel(cx, cy), SLOT_FILL);
    }

    #[test]
    fn compose_skips_undecodable_icons() {
        let template = default_template();
        let canvas = compose(
            &template,
            vec![(2, b"definitely not a png".to_vec()), (3, solid_png(RED))],
        );

        let (cx, cy) = slot_center(2);
        assert_eq!(*canvas.get_pixel(cx, cy), SLOT_FILL);
        let (cx, cy) = slot_center(3);
        assert_eq!(*canvas.get_pixel(cx, cy), RED);
    }

    #[tokio::test]
    async fn rejects_wrong_slot_count() {
        let dir = tempfile::TempDir::new().unwrap();
        let renderer = renderer(dir.path());

        for len in [0, 8, 10] {
            let result = renderer.render(&vec![None; len]).await;
            assert!(matches!(result, Err(RenderError::WrongSlotCount(n)) if n == len));
        }
    }

    #[tokio::test]
    async fn failing_slots_do_not_stop_the_others() {
        let dir = tempfile::TempDir::new().unwrap();
        tokio::fs::write(dir.path().join("red.png"), solid_png(RED)).await.unwrap();
        tokio::fs::write(dir.path().join("broken.png"), b"nope").await.unwrap();
        let renderer = renderer(dir.path());

        let mut items = vec![None; SLOT_COUNT];
        items[0] = Some("missing.png".to_string());
        items[1] = Some("broken.png".to_string());
        items[2] = Some("http://127.0.0.1:1/unreachable.png".to_string());
        for slot in 3..SLOT_COUNT {
            items[slot] = Some("red.png".to_string());
        }

        let canvas = renderer.render(&items).await.unwrap();

        for slot in 0..3 {
            let (cx, cy) = slot_center(slot);
            assert_eq!(*canvas.get_pixel(cx, cy), SLOT_FILL, "slot {slot}");
        }
        for slot in 3..SLOT_COUNT {
            let (cx, cy) = slot_center(slot);
            assert_eq!(*canvas.get_pixel(cx, cy), RED, "slot {slot}");
        }
    }

    #[tokio::test]
    async fn renders_diamond_sword_from_presets() {
        let dir = tempfile::TempDir::new().unwrap();
        let diamond = dir.path().join("diamond.png");
        let stick = dir.path().join("stick.png");
        tokio::fs::write(&diamond, solid_png(CYAN)).await.unwrap();
        tokio::fs::write(&stick, solid_png(BROWN)).await.unwrap();

        let presets = PresetTable::new([
            ("diamant", diamond.display().to_string()),
            ("baton", stick.display().to_string()),
        ]);
        let raw = [
            None,
            Some("diamant"),
            Some("null"),
            None,
            Some("diamant"),
            None,
            None,
            Some("baton"),
            None,
        ];
        let items: Vec<_> = raw.iter().map(|value| presets.resolve(*value)).collect();

        let canvas = renderer(Path::new("/nonexistent")).render(&items).await.unwrap();

        for slot in 0..SLOT_COUNT {
            let (cx, cy) = slot_center(slot);
            let expected = match slot {
                1 | 4 => CYAN,
                7 => BROWN,
                _ => SLOT_FILL,
            };
            assert_eq!(*canvas.get_pixel(cx, cy), expected, "slot {slot}");
        }
    }

    #[tokio::test]
    async fn saves_png_under_fresh_name() {
        let dir = tempfile::TempDir::new().unwrap();

        let first = save_png(default_template(), dir.path()).await.unwrap();
        let second = save_png(default_template(), dir.path()).await.unwrap();

        assert_ne!(first, second);
        assert!(first.ends_with(".png"));

        let bytes = tokio::fs::read(dir.path().join(&first)).await.unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded, default_template());
    }

    #[tokio::test]
    async fn loads_template_from_disk_or_falls_back() {
        let dir = tempfile::TempDir::new().unwrap();

        let fallback = load_template(dir.path().join("missing.png")).await.unwrap();
        assert_eq!(fallback, default_template());

        let path = dir.path().join("template.png");
        tokio::fs::write(&path, solid_png(BROWN)).await.unwrap();
        let loaded = load_template(&path).await.unwrap();
        assert_eq!(loaded.dimensions(), (16, 16));

        tokio::fs::write(&path, b"garbage").await.unwrap();
        assert!(matches!(
            load_template(&path).await,
            Err(RenderError::Template(_))
        ));
    }
}
