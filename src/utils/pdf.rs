//! PDF layout on top of printpdf
//!
//! Text is set in the bundled DejaVu Sans faces, embedded as CID fonts with
//! Identity-H encoding, so Cyrillic and the rest of the font's coverage come
//! out as written. Lines wrap at the right margin using the font's own
//! advance widths; a new A4 page starts at the bottom margin.

use printpdf::{IndirectFontRef, Mm, PdfDocumentReference, PdfLayerReference, Pt};
use ttf_parser::Face;

use crate::errors::{FoodgramError, Result};

pub static REGULAR_TTF: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
pub static BOLD_TTF: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;
/// 10 mm
const MARGIN_X: f32 = 28.35;
const MARGIN_TOP: f32 = 28.35;
/// 20 mm，和自动分页阈值一致
const MARGIN_BOTTOM: f32 = 56.69;
const LINE_SPACING: f32 = 1.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    /// Raw TrueType bytes of the face.
    pub fn data(self) -> &'static [u8] {
        match self {
            Font::Regular => REGULAR_TTF,
            Font::Bold => BOLD_TTF,
        }
    }
}

fn build_error(context: &str, e: impl std::fmt::Display) -> FoodgramError {
    FoodgramError::document_build(format!("{}: {}", context, e))
}

/// Advance widths of one face, in points.
pub struct Metrics {
    face: Face<'static>,
}

impl Metrics {
    pub fn load(font: Font) -> Result<Self> {
        let face = Face::parse(font.data(), 0)
            .map_err(|e| build_error("Failed to parse bundled font", e))?;
        Ok(Self { face })
    }

    /// Whether the face has a glyph for `c`. Missing glyphs are dropped
    /// from the output.
    pub fn covers(&self, c: char) -> bool {
        self.face.glyph_index(c).is_some()
    }

    pub fn char_width(&self, c: char, size: f32) -> f32 {
        let units = self
            .face
            .glyph_index(c)
            .and_then(|g| self.face.glyph_hor_advance(g))
            .unwrap_or(0);
        f32::from(units) * size / f32::from(self.face.units_per_em())
    }

    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        text.chars().map(|c| self.char_width(c, size)).sum()
    }

    /// Split text into lines no wider than `max_width`.
    ///
    /// Breaks on spaces; a single word wider than the line is cut by glyph.
    pub fn wrap(&self, text: &str, size: f32, max_width: f32) -> Vec<String> {
        let space = self.char_width(' ', size);
        let mut lines = Vec::new();
        let mut current = String::new();
        let mut current_width = 0.0;

        for word in text.split(' ').filter(|w| !w.is_empty()) {
            let word_width = self.text_width(word, size);
            let needed = if current.is_empty() {
                word_width
            } else {
                current_width + space + word_width
            };

            if needed <= max_width {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
                current_width = needed;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0.0;
            }

            if word_width <= max_width {
                current.push_str(word);
                current_width = word_width;
                continue;
            }

            for c in word.chars() {
                let w = self.char_width(c, size);
                if current_width + w > max_width && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0.0;
                }
                current.push(c);
                current_width += w;
            }
        }

        if !current.is_empty() || lines.is_empty() {
            lines.push(current);
        }
        lines
    }
}

fn mm(points: f32) -> Mm {
    Mm::from(Pt(points))
}

/// A document under construction.
///
/// The cursor moves down the page as lines are added and a new page starts
/// whenever the next line would cross the bottom margin.
pub struct PdfDocument {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    regular_metrics: Metrics,
    bold_metrics: Metrics,
    page_count: usize,
    cursor_y: f32,
}

impl PdfDocument {
    pub fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) = printpdf::PdfDocument::new(
            title,
            mm(PAGE_WIDTH),
            mm(PAGE_HEIGHT),
            "Page 1",
        );
        let regular = doc
            .add_external_font(REGULAR_TTF)
            .map_err(|e| build_error("Failed to embed font", e))?;
        let bold = doc
            .add_external_font(BOLD_TTF)
            .map_err(|e| build_error("Failed to embed font", e))?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            regular_metrics: Metrics::load(Font::Regular)?,
            bold_metrics: Metrics::load(Font::Bold)?,
            page_count: 1,
            cursor_y: PAGE_HEIGHT - MARGIN_TOP,
        })
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn metrics(&self, font: Font) -> &Metrics {
        match font {
            Font::Regular => &self.regular_metrics,
            Font::Bold => &self.bold_metrics,
        }
    }

    fn content_width() -> f32 {
        PAGE_WIDTH - 2.0 * MARGIN_X
    }

    fn ensure_room(&mut self, height: f32) {
        if self.cursor_y - height < MARGIN_BOTTOM {
            self.page_count += 1;
            let (page, layer) = self.doc.add_page(
                mm(PAGE_WIDTH),
                mm(PAGE_HEIGHT),
                format!("Page {}", self.page_count),
            );
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.cursor_y = PAGE_HEIGHT - MARGIN_TOP;
        }
    }

    fn place(&mut self, x: f32, line: &str, font: Font, size: f32) {
        let height = size * LINE_SPACING;
        self.ensure_room(height);
        let baseline = self.cursor_y - size;

        if !line.is_empty() {
            let font_ref = match font {
                Font::Regular => &self.regular,
                Font::Bold => &self.bold,
            };
            self.layer
                .use_text(line, size, mm(x), mm(baseline), font_ref);
        }
        self.cursor_y -= height;
    }

    /// Left-aligned text, wrapped at the right margin.
    pub fn text(&mut self, text: &str, font: Font, size: f32) {
        for raw in text.split('\n') {
            let raw = raw.replace(['\t', '\r'], " ");
            let lines = self.metrics(font).wrap(&raw, size, Self::content_width());
            for line in lines {
                self.place(MARGIN_X, &line, font, size);
            }
        }
    }

    /// One line centered between the margins.
    pub fn centered(&mut self, text: &str, font: Font, size: f32) {
        let width = self.metrics(font).text_width(text, size);
        if width > Self::content_width() {
            self.text(text, font, size);
            return;
        }
        let x = MARGIN_X + (Self::content_width() - width) / 2.0;
        self.place(x, text, font, size);
    }

    /// Vertical gap. Never starts a new page on its own.
    pub fn gap(&mut self, height: f32) {
        self.cursor_y = (self.cursor_y - height).max(MARGIN_BOTTOM);
    }

    /// Serialize the document.
    pub fn to_bytes(self) -> Result<Vec<u8>> {
        self.doc
            .save_to_bytes()
            .map_err(|e| build_error("Failed to write PDF", e))
    }
}
