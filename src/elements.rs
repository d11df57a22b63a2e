//! Extended element implementations built on top of `genpdf` primitives.
//!
//! `genpdf` measures vertical space in lines and has no notion of fills or page bookkeeping.
//! The elements in this module add those pieces: [`Spacer`], [`ShadedText`] and [`PageMarker`].
//! Everything here draws on the single layer `genpdf` gives each page, so fills are always
//! painted before the text that sits on them.

use std::cell::Cell;
use std::mem;
use std::rc::Rc;

use genpdf::error::Error;
use genpdf::style::{Color, Style};
use genpdf::{render, Element, Mm, Position, RenderResult, Size};

/// Distance between the strokes used to paint a solid fill, in millimetres.
///
/// Strokes are drawn with the default 1 pt line width, so any step below ~0.35 mm leaves no
/// visible gaps.
const FILL_STROKE_STEP_MM: f64 = 0.3;

pub(crate) fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

pub(crate) fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

/// Paints `size` at the origin of `area` with `color`.
///
/// `genpdf` can only stroke lines, so the fill is made of tightly packed horizontal strokes.
pub fn fill_background(area: &render::Area<'_>, size: Size, color: Color) {
    let style = Style::new().with_color(color);
    let height = mm_to_f64(size.height);
    let mut y = FILL_STROKE_STEP_MM / 2.0;
    while y < height {
        let offset = mm_from_f64(y);
        area.draw_line(
            vec![Position::new(0, offset), Position::new(size.width, offset)],
            style,
        );
        y += FILL_STROKE_STEP_MM;
    }
}

/// Empty vertical gap with a fixed height.
///
/// A spacer that does not fit is clipped to the remaining space instead of pushing content to
/// the next page.
#[derive(Clone, Copy, Debug)]
pub struct Spacer {
    height: Mm,
}

impl Spacer {
    /// Creates a spacer of `height_mm` millimetres.
    pub fn new(height_mm: f64) -> Self {
        Self {
            height: mm_from_f64(height_mm),
        }
    }
}

impl Element for Spacer {
    fn render(
        &mut self,
        _context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let available = area.size().height;
        let height = if self.height > available {
            available
        } else {
            self.height
        };

        let mut result = RenderResult::default();
        result.size = Size::new(0, height);
        Ok(result)
    }
}

/// Greedy word wrap of `text` into lines no wider than `max_width` when set in `style`.
///
/// Explicit `\n` breaks are kept. A single word wider than `max_width` gets a line of its own.
pub(crate) fn wrap_lines(
    context: &genpdf::Context,
    style: Style,
    text: &str,
    max_width: Mm,
) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if line.is_empty() {
                line.push_str(word);
                continue;
            }
            let candidate = format!("{} {}", line, word);
            if style.str_width(&context.font_cache, &candidate) <= max_width {
                line = candidate;
            } else {
                lines.push(mem::replace(&mut line, word.to_owned()));
            }
        }
        lines.push(line);
    }
    lines
}

/// Single-style text block painted on a solid background.
///
/// The lines are measured before anything is drawn, so the fill is painted first and the text
/// ends up on top of it. Text that does not fit continues on the next page.
pub struct ShadedText {
    text: String,
    background: Color,
    lines: Option<Vec<String>>,
    rendered: usize,
}

impl ShadedText {
    pub fn new(text: impl Into<String>, background: Color) -> Self {
        Self {
            text: text.into(),
            background,
            lines: None,
            rendered: 0,
        }
    }
}

impl Element for ShadedText {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let width = area.size().width;
        let text = &self.text;
        let lines = self
            .lines
            .get_or_insert_with(|| wrap_lines(context, style, text, width));

        let mut result = RenderResult::default();
        let line_height = style.line_height(&context.font_cache);
        let remaining = lines.len() - self.rendered;
        let fitting = (mm_to_f64(area.size().height) / mm_to_f64(line_height)).floor() as usize;
        let count = remaining.min(fitting);
        if count == 0 {
            result.has_more = remaining > 0;
            return Ok(result);
        }

        let height = line_height * count as f64;
        fill_background(&area, Size::new(width, height), self.background);
        for (index, line) in lines[self.rendered..self.rendered + count].iter().enumerate() {
            area.print_str(
                &context.font_cache,
                Position::new(0, line_height * index as f64),
                style,
                line,
            )?;
        }

        self.rendered += count;
        result.size = Size::new(width, height);
        result.has_more = self.rendered < lines.len();
        Ok(result)
    }
}

/// Shared page counter advanced by the page decorator.
#[derive(Clone, Debug, Default)]
pub struct PageTracker {
    current: Rc<Cell<usize>>,
}

impl PageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new page and returns its 1-based number.
    pub fn advance(&self) -> usize {
        let page = self.current.get() + 1;
        self.current.set(page);
        page
    }

    /// Number of the page currently being rendered, `0` before the first page.
    pub fn current(&self) -> usize {
        self.current.get()
    }

    /// Creates a marker element together with the slot it will write its page into.
    pub fn marker(&self) -> (PageMarker, PageSlot) {
        let slot = PageSlot::default();
        let marker = PageMarker {
            tracker: self.clone(),
            slot: slot.clone(),
        };
        (marker, slot)
    }
}

/// Page number recorded by a [`PageMarker`], readable after rendering.
#[derive(Clone, Debug, Default)]
pub struct PageSlot(Rc<Cell<Option<usize>>>);

impl PageSlot {
    pub fn get(&self) -> Option<usize> {
        self.0.get()
    }
}

/// Zero-size element recording the page it lands on.
pub struct PageMarker {
    tracker: PageTracker,
    slot: PageSlot,
}

impl Element for PageMarker {
    fn render(
        &mut self,
        _context: &genpdf::Context,
        _area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        if self.slot.0.get().is_none() {
            self.slot.0.set(Some(self.tracker.current()));
        }
        Ok(RenderResult::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mm_conversion_round_trips() {
        assert!((mm_to_f64(mm_from_f64(12.5)) - 12.5).abs() < 1e-9);
    }

    #[test]
    fn tracker_counts_pages() {
        let tracker = PageTracker::new();
        assert_eq!(tracker.current(), 0);
        assert_eq!(tracker.advance(), 1);
        assert_eq!(tracker.advance(), 2);
        assert_eq!(tracker.current(), 2);
    }

    #[test]
    fn marker_slot_starts_empty_and_shares_state() {
        let tracker = PageTracker::new();
        let (marker, slot) = tracker.marker();
        assert_eq!(slot.get(), None);

        marker.slot.0.set(Some(3));
        assert_eq!(slot.get(), Some(3));
    }
}
