//! Inline styled text fragments.
//!
//! A [`Span`] carries the inline decorations the plan uses inside otherwise uniformly styled
//! paragraphs: bold lead-ins ("**Scenario 1:** ..."), the italic closing line, and the red legal
//! warning label. Paragraph-level attributes (size, alignment, spacing) come from the
//! [`StyleSet`](crate::styles::StyleSet) instead.

use genpdf::style::{Color, Style, StyledString};

/// A slice of text together with inline style attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Span {
    text: String,
    bold: bool,
    italic: bool,
    color: Option<Color>,
}

impl Span {
    /// Creates a new span with the provided text and no styles applied.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_bold(&self) -> bool {
        self.bold
    }

    pub fn is_italic(&self) -> bool {
        self.italic
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Marks the span as bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Marks the span as italic.
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Overrides the paragraph color for this span.
    pub fn colored(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Converts the span into a [`StyledString`].
    ///
    /// Only the attributes set on the span end up in the style, so the paragraph style still
    /// supplies everything else when `genpdf` merges the two.
    pub fn to_styled_string(&self) -> StyledString {
        let mut style = Style::new();
        if let Some(color) = self.color {
            style.set_color(color);
        }
        if self.bold {
            style.set_bold();
        }
        if self.italic {
            style.set_italic();
        }
        StyledString::new(self.text.clone(), style)
    }
}

/// Concatenates the raw text of `spans`, dropping all styling.
pub fn plain_text(spans: &[Span]) -> String {
    spans.iter().map(Span::text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_to_style_reflects_flags() {
        let span = Span::new("LEGAL WARNING:")
            .bold()
            .colored(Color::Rgb(0xdc, 0x26, 0x26));
        let styled = span.to_styled_string();
        assert_eq!(styled.s, "LEGAL WARNING:");
        assert!(styled.style.is_bold());
        assert!(!styled.style.is_italic());
        assert_eq!(styled.style.color(), Some(Color::Rgb(0xdc, 0x26, 0x26)));
    }

    #[test]
    fn plain_span_leaves_style_unset() {
        let styled = Span::new("body").to_styled_string();
        assert!(!styled.style.is_bold());
        assert_eq!(styled.style.color(), None);
    }

    #[test]
    fn plain_text_joins_spans() {
        let spans = vec![
            Span::new("Vlastiti paket").bold(),
            Span::new(" - Your agency is the tour operator"),
        ];
        assert_eq!(
            plain_text(&spans),
            "Vlastiti paket - Your agency is the tour operator"
        );
    }
}
