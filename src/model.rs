//! Data structures describing the logical content of the plan document.
//!
//! The types here form the ordered, write-once content tree: a [`Cover`], followed by
//! [`Section`]s made of [`Block`]s. They reference styles by [`StyleName`] and never touch the
//! rendering crate, which keeps the plan content testable without fonts.

use crate::richtext::Span;
use crate::styles::StyleName;
use crate::table::TableBlock;

/// Horizontal alignment of a paragraph or table cell.
///
/// `genpdf` has no justified layout; [`HorizontalAlignment::Justified`] is kept in the model and
/// rendered flush left.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
    Justified,
}

impl From<HorizontalAlignment> for genpdf::Alignment {
    fn from(alignment: HorizontalAlignment) -> Self {
        match alignment {
            HorizontalAlignment::Left | HorizontalAlignment::Justified => genpdf::Alignment::Left,
            HorizontalAlignment::Center => genpdf::Alignment::Center,
            HorizontalAlignment::Right => genpdf::Alignment::Right,
        }
    }
}

/// Text paragraph rendered with one style role.
#[derive(Clone, Debug, PartialEq)]
pub struct RichParagraph {
    spans: Vec<Span>,
    style: StyleName,
}

impl RichParagraph {
    pub fn new(style: StyleName, spans: impl Into<Vec<Span>>) -> Self {
        Self {
            spans: spans.into(),
            style,
        }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn style(&self) -> StyleName {
        self.style
    }
}

/// Individual content blocks that make up sections and the cover.
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    /// Styled paragraph content.
    Paragraph(RichParagraph),
    /// Fixed vertical gap, in millimetres.
    Spacer(f64),
    /// Styled table.
    Table(TableBlock),
    /// Explicit page break request.
    PageBreak,
}

impl Block {
    /// Paragraph made of a single unstyled span.
    pub fn text(style: StyleName, text: impl Into<String>) -> Self {
        Self::Paragraph(RichParagraph::new(style, vec![Span::new(text)]))
    }

    /// Paragraph made of several spans.
    pub fn rich(style: StyleName, spans: impl Into<Vec<Span>>) -> Self {
        Self::Paragraph(RichParagraph::new(style, spans))
    }

    /// Body paragraph.
    pub fn body(text: impl Into<String>) -> Self {
        Self::text(StyleName::DocBody, text)
    }

    /// Body paragraph rendered entirely in bold, used as a lead-in line.
    pub fn bold_body(text: impl Into<String>) -> Self {
        Self::rich(StyleName::DocBody, vec![Span::new(text).bold()])
    }

    /// Bullet list entry prefixed with a bullet glyph.
    pub fn bullet(text: impl AsRef<str>) -> Self {
        Self::text(StyleName::BulletItem, format!("\u{2022} {}", text.as_ref()))
    }

    /// Bullet-styled line without a glyph, for nested or pre-formatted entries.
    pub fn bullet_line(spans: impl Into<Vec<Span>>) -> Self {
        Self::rich(StyleName::BulletItem, spans)
    }

    /// Subsection heading.
    pub fn subheading(text: impl Into<String>) -> Self {
        Self::text(StyleName::SubsectionHeader, text)
    }

    /// Vertical gap of `centimetres`.
    pub fn spacer_cm(centimetres: f64) -> Self {
        Self::Spacer(centimetres * 10.0)
    }

    pub fn table(table: TableBlock) -> Self {
        Self::Table(table)
    }

    /// Returns the table carried by this block, if any.
    pub fn as_table(&self) -> Option<&TableBlock> {
        match self {
            Block::Table(table) => Some(table),
            _ => None,
        }
    }
}

/// Title page of the document.
///
/// Rendered as a top gap, the title lines, the subtitle and then the trailing blocks.
#[derive(Clone, Debug, PartialEq)]
pub struct Cover {
    title_lines: Vec<String>,
    subtitle: Option<String>,
    blocks: Vec<Block>,
}

impl Cover {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title_lines: vec![title.into()],
            subtitle: None,
            blocks: Vec::new(),
        }
    }

    pub fn title_lines(&self) -> &[String] {
        &self.title_lines
    }

    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Adds another title line below the existing ones.
    pub fn with_title_line(mut self, line: impl Into<String>) -> Self {
        self.title_lines.push(line.into());
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<Option<String>>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }
}

/// Logical representation of a numbered document section.
#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    title: String,
    blocks: Vec<Block>,
}

impl Section {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Iterates over the tables of the section in document order.
    pub fn tables(&self) -> impl Iterator<Item = &TableBlock> {
        self.blocks.iter().filter_map(Block::as_table)
    }

    /// Whether rendering this section forces a new page first.
    pub fn starts_on_new_page(&self) -> bool {
        matches!(self.blocks.first(), Some(Block::PageBreak))
    }

    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn with_blocks<I>(mut self, blocks: I) -> Self
    where
        I: IntoIterator<Item = Block>,
    {
        self.blocks.extend(blocks);
        self
    }

    /// Creates a builder that can inject an initial page break.
    pub fn builder(title: impl Into<String>) -> SectionBuilder {
        SectionBuilder::new(title)
    }
}

/// Builder for [`Section`] values.
#[derive(Clone, Debug, Default)]
pub struct SectionBuilder {
    title: String,
    blocks: Vec<Block>,
    start_on_new_page: bool,
}

impl SectionBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Marks the section to start on a new page.
    pub fn start_on_new_page(mut self, start_on_new_page: bool) -> Self {
        self.start_on_new_page = start_on_new_page;
        self
    }

    pub fn push(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn extend<I>(mut self, blocks: I) -> Self
    where
        I: IntoIterator<Item = Block>,
    {
        self.blocks.extend(blocks);
        self
    }

    /// Builds the final section, injecting a leading page break when requested.
    pub fn build(mut self) -> Section {
        if self.start_on_new_page && !matches!(self.blocks.first(), Some(Block::PageBreak)) {
            self.blocks.insert(0, Block::PageBreak);
        }

        Section::new(self.title).with_blocks(self.blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::build_table;

    #[test]
    fn builder_inserts_page_break() {
        let section = Section::builder("1. Intro")
            .start_on_new_page(true)
            .push(Block::body("text"))
            .build();

        assert!(section.starts_on_new_page());
        assert_eq!(section.blocks().len(), 2);
    }

    #[test]
    fn builder_does_not_duplicate_page_break() {
        let section = Section::builder("1. Intro")
            .start_on_new_page(true)
            .push(Block::PageBreak)
            .build();

        assert!(section.starts_on_new_page());
        assert_eq!(section.blocks().len(), 1);
    }

    #[test]
    fn bullet_prefixes_glyph() {
        let Block::Paragraph(paragraph) = Block::bullet("Cash") else {
            panic!("bullet should produce a paragraph");
        };
        assert_eq!(paragraph.style(), StyleName::BulletItem);
        assert_eq!(paragraph.spans()[0].text(), "\u{2022} Cash");
    }

    #[test]
    fn section_lists_its_tables() {
        let table = build_table(vec![vec!["a", "b"], vec!["1", "2"]], vec![20.0, 20.0], true);
        let section = Section::new("2. Tables")
            .with_block(Block::body("intro"))
            .with_block(Block::table(table.clone()))
            .with_block(Block::spacer_cm(0.5));

        let tables: Vec<_> = section.tables().collect();
        assert_eq!(tables, vec![&table]);
    }

    #[test]
    fn justified_renders_left() {
        assert!(matches!(
            genpdf::Alignment::from(HorizontalAlignment::Justified),
            genpdf::Alignment::Left
        ));
    }
}
