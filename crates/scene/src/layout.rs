use reveal_common::{Rect, Viewport};

use crate::config::GalleryConfig;

/// Something that owns a fixed set of elements with measurable boxes.
///
/// Boxes are reported in client space: relative to the viewport's top-left,
/// with the horizontal scroll offset already applied.
pub trait ElementSource {
    /// Number of tracked elements. Fixed for the lifetime of the source.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Client box of element `index` at the given viewport and scroll offset.
    fn client_rect(&self, index: usize, viewport: Viewport, scroll: f32) -> Option<Rect>;

    /// Largest useful horizontal scroll offset for this viewport.
    fn scroll_extent(&self, viewport: Viewport) -> f32;
}

/// Elements with fixed document-space boxes that do not react to the viewport.
#[derive(Debug, Clone, Default)]
pub struct FixedElements {
    rects: Vec<Rect>,
}

impl FixedElements {
    pub fn new(rects: Vec<Rect>) -> Self {
        Self { rects }
    }
}

impl ElementSource for FixedElements {
    fn len(&self) -> usize {
        self.rects.len()
    }

    fn client_rect(&self, index: usize, _viewport: Viewport, scroll: f32) -> Option<Rect> {
        self.rects.get(index).map(|r| r.offset_x(-scroll))
    }

    fn scroll_extent(&self, viewport: Viewport) -> f32 {
        let right = self.rects.iter().map(Rect::right).fold(0.0, f32::max);
        (right - viewport.width).max(0.0)
    }
}

/// Horizontal strip of images sized from their aspect ratios.
///
/// Items are dealt across `rows` in order: item `i` goes to row `i % rows`
/// and sits right of the previous item in that row. Rows are centred
/// vertically as a block.
#[derive(Debug, Clone)]
pub struct GalleryLayout {
    config: GalleryConfig,
    aspects: Vec<f32>,
}

impl GalleryLayout {
    /// `aspects` holds width / height per image. Unusable ratios fall back to square.
    pub fn new(config: GalleryConfig, aspects: Vec<f32>) -> Self {
        let aspects = aspects
            .into_iter()
            .map(|a| if a.is_finite() && a > 0.0 { a } else { 1.0 })
            .collect();
        Self { config, aspects }
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    fn rows(&self) -> usize {
        self.config.rows.max(1) as usize
    }

    fn item_height(&self, viewport: Viewport) -> f32 {
        let rows = self.rows() as f32;
        let block = viewport.height * self.config.item_height;
        ((block - self.config.gap * (rows - 1.0)) / rows).max(1.0)
    }

    /// Boxes for every item at scroll offset zero, plus the content width.
    pub fn document_rects(&self, viewport: Viewport) -> (Vec<Rect>, f32) {
        let rows = self.rows();
        let height = self.item_height(viewport);
        let block = height * rows as f32 + self.config.gap * (rows as f32 - 1.0);
        let block_top = (viewport.height - block) / 2.0;

        let mut cursors = vec![self.config.padding; rows];
        let mut rects = Vec::with_capacity(self.aspects.len());
        for (i, aspect) in self.aspects.iter().enumerate() {
            let row = i % rows;
            let width = height * aspect;
            let top = block_top + row as f32 * (height + self.config.gap);
            rects.push(Rect::new(top, cursors[row], width, height));
            cursors[row] += width + self.config.gap;
        }

        let widest = cursors.iter().copied().fold(self.config.padding, f32::max);
        let content_width = if rects.is_empty() {
            0.0
        } else {
            widest - self.config.gap + self.config.padding
        };
        (rects, content_width)
    }
}

impl ElementSource for GalleryLayout {
    fn len(&self) -> usize {
        self.aspects.len()
    }

    fn client_rect(&self, index: usize, viewport: Viewport, scroll: f32) -> Option<Rect> {
        let (rects, _) = self.document_rects(viewport);
        rects.get(index).map(|r| r.offset_x(-scroll))
    }

    fn scroll_extent(&self, viewport: Viewport) -> f32 {
        let (_, content_width) = self.document_rects(viewport);
        (content_width - viewport.width).max(0.0)
    }
}
