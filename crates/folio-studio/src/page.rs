//! Page layout: sections stacked vertically, one viewport tall each.

use folio_backdrop::Section;
use folio_engine::coords::{Rect, Viewport};

/// One full-height block of the page.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Block {
    Backdrop(Section),
    /// Plain section without an animated background.
    Contact,
}

impl Block {
    pub fn name(self) -> &'static str {
        match self {
            Block::Backdrop(section) => section.name(),
            Block::Contact => "contact",
        }
    }
}

/// Scrollable page.
///
/// Scroll is measured in blocks, so a resize keeps the same content on screen.
#[derive(Debug, Clone)]
pub struct Page {
    blocks: Vec<Block>,
    viewport: Viewport,
    scroll: f32,
}

impl Page {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks, viewport: Viewport::default(), scroll: 0.0 }
    }

    /// Hero, about, projects, skills, then contact.
    pub fn portfolio() -> Self {
        let mut blocks: Vec<Block> = Section::ALL.into_iter().map(Block::Backdrop).collect();
        blocks.push(Block::Contact);
        Self::new(blocks)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Scroll offset in blocks.
    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Scrolls by `dy` physical pixels (positive moves down the page).
    pub fn scroll_by(&mut self, dy: f32) {
        if !self.viewport.is_valid() || !dy.is_finite() {
            return;
        }
        self.scroll = self.clamp(self.scroll + dy / self.viewport.height);
    }

    pub fn scroll_to(&mut self, index: usize) {
        self.scroll = self.clamp(index as f32);
    }

    /// Block closest to the top of the screen.
    pub fn current(&self) -> usize {
        self.scroll.round() as usize
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        let name = if name.eq_ignore_ascii_case("home") { "hero" } else { name };
        self.blocks.iter().position(|b| b.name().eq_ignore_ascii_case(name))
    }

    /// Screen region of block `index` in physical pixels.
    pub fn region(&self, index: usize) -> Rect {
        let h = self.viewport.height;
        Rect::new(0.0, (index as f32 - self.scroll) * h, self.viewport.width, h)
    }

    /// Whether any part of block `index` is on screen.
    pub fn is_visible(&self, index: usize) -> bool {
        let screen = Rect::from_size(self.viewport.width, self.viewport.height);
        self.region(index).intersect(screen).is_some_and(|r| !r.is_empty())
    }

    fn clamp(&self, scroll: f32) -> f32 {
        let max = self.blocks.len().saturating_sub(1) as f32;
        scroll.clamp(0.0, max)
    }
}
