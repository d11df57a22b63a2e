//! Document construction for the contracts_plan_pdf crate.
//!
//! [`DocumentBuilder`] prepares an empty `genpdf::Document` (fonts, paper size, margins, page
//! bookkeeping). [`PdfBuilder`] accumulates the content tree and turns it into PDF bytes in a
//! single pass.

use std::io;

use genpdf::elements::{PageBreak, Paragraph};
use genpdf::error::Error;
use genpdf::style;
use genpdf::{Element, Margins, PageDecorator, PaperSize, Size};
use log::{debug, info};

#[cfg(feature = "bookmarks")]
use crate::bookmarks::{self, BookmarkError};
use crate::elements::{mm_from_f64, PageSlot, PageTracker, ShadedText, Spacer};
use crate::fonts;
use crate::model::{Block, Cover, RichParagraph, Section};
use crate::richtext::{plain_text, Span};
use crate::styles::{build_styles, ParagraphStyle, StyleName, StyleSet};
use crate::table::TableBlock;

/// Page margin on every side, in millimetres.
pub const PAGE_MARGIN_MM: f64 = 20.0;

const COVER_TOP_GAP_MM: f64 = 30.0;
const COVER_TITLE_GAP_MM: f64 = 10.0;
const COVER_SUBTITLE_GAP_MM: f64 = 20.0;

/// Errors raised while turning the content tree into a PDF.
#[derive(Debug, thiserror::Error)]
pub enum PdfBuildError {
    /// No usable font family could be loaded.
    #[error("failed to load fonts")]
    FontLoad(#[source] Error),
    /// A table could not be laid out.
    #[error("failed to lay out table")]
    Layout(#[source] Error),
    /// `genpdf` failed while rendering pages.
    #[error("failed to render document")]
    Render(#[source] Error),
    /// The output file could not be written.
    #[error("failed to write output")]
    Io(#[from] io::Error),
    /// The section outline could not be embedded.
    #[cfg(feature = "bookmarks")]
    #[error("failed to add section bookmarks")]
    Bookmarks(#[from] BookmarkError),
}

/// Builder for `genpdf::Document` instances pre-configured with the crate defaults.
#[derive(Default)]
pub struct DocumentBuilder {
    paper_size: Option<Size>,
    margins: Option<Margins>,
    title: Option<String>,
    tracker: Option<PageTracker>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the paper size used for newly created documents.
    pub fn with_paper_size(mut self, paper_size: impl Into<Size>) -> Self {
        self.paper_size = Some(paper_size.into());
        self
    }

    /// Sets the margins applied through the page decorator.
    pub fn with_margins(mut self, margins: impl Into<Margins>) -> Self {
        self.margins = Some(margins.into());
        self
    }

    /// Sets the title stored in the PDF metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Shares `tracker` with the page decorator so elements can observe page numbers.
    pub fn with_page_tracker(mut self, tracker: PageTracker) -> Self {
        self.tracker = Some(tracker);
        self
    }

    /// Builds a fully configured `genpdf::Document` instance.
    pub fn build(self) -> Result<genpdf::Document, Error> {
        let font_family = fonts::default_font_family()?;
        let mut document = genpdf::Document::new(font_family);

        if let Some(paper_size) = self.paper_size {
            document.set_paper_size(paper_size);
        }
        if let Some(title) = self.title {
            document.set_title(title);
        }

        document.set_page_decorator(PlanPageDecorator {
            margins: self.margins,
            tracker: self.tracker.unwrap_or_default(),
        });

        Ok(document)
    }
}

struct PlanPageDecorator {
    margins: Option<Margins>,
    tracker: PageTracker,
}

impl PageDecorator for PlanPageDecorator {
    fn decorate_page<'a>(
        &mut self,
        _context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        _style: style::Style,
    ) -> Result<genpdf::render::Area<'a>, Error> {
        self.tracker.advance();
        if let Some(margins) = self.margins {
            area.add_margins(margins);
        }
        Ok(area)
    }
}

/// Page on which a section starts, as recorded during rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionPage {
    pub title: String,
    /// 1-based page number, `None` if the section was never reached.
    pub page: Option<usize>,
}

/// Output of a render pass.
#[derive(Clone, Debug)]
pub struct RenderedPdf {
    /// The serialized PDF file.
    pub bytes: Vec<u8>,
    /// Start page of every section, in document order.
    pub section_pages: Vec<SectionPage>,
    /// Total number of pages.
    pub page_count: usize,
}

/// Accumulates the cover, table of contents, sections and closing blocks of a document.
#[derive(Clone, Debug)]
pub struct PdfBuilder {
    styles: StyleSet,
    title: Option<String>,
    cover: Option<Cover>,
    toc_title: Option<String>,
    sections: Vec<Section>,
    epilogue: Vec<Block>,
}

impl Default for PdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfBuilder {
    /// Creates an empty builder using the standard style sheet.
    pub fn new() -> Self {
        Self {
            styles: build_styles(),
            title: None,
            cover: None,
            toc_title: None,
            sections: Vec::new(),
            epilogue: Vec::new(),
        }
    }

    /// Sets the document title stored in the PDF metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the title page. A page break always follows it.
    pub fn with_cover(mut self, cover: Cover) -> Self {
        self.cover = Some(cover);
        self
    }

    /// Enables a printed table of contents listing every section title.
    pub fn with_toc_title(mut self, title: Option<String>) -> Self {
        self.toc_title = title;
        self
    }

    pub fn add_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Appends a block rendered after the last section.
    pub fn add_epilogue_block(mut self, block: Block) -> Self {
        self.epilogue.push(block);
        self
    }

    pub fn styles(&self) -> &StyleSet {
        &self.styles
    }

    pub fn cover(&self) -> Option<&Cover> {
        self.cover.as_ref()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn epilogue(&self) -> &[Block] {
        &self.epilogue
    }

    /// Entries of the printed table of contents, empty when it is disabled.
    pub fn toc_entries(&self) -> Vec<&str> {
        if self.toc_title.is_none() {
            return Vec::new();
        }
        self.sections.iter().map(Section::title).collect()
    }

    /// Every table in the document, cover first.
    pub fn tables(&self) -> impl Iterator<Item = &TableBlock> {
        let cover_blocks = self.cover.iter().flat_map(|cover| cover.blocks());
        let section_blocks = self.sections.iter().flat_map(|section| section.blocks());
        cover_blocks
            .chain(section_blocks)
            .chain(self.epilogue.iter())
            .filter_map(Block::as_table)
    }

    /// Renders the document into PDF bytes.
    pub fn render(self) -> Result<RenderedPdf, PdfBuildError> {
        let tracker = PageTracker::new();
        let mut document_builder = DocumentBuilder::new()
            .with_paper_size(PaperSize::A4)
            .with_margins(Margins::trbl(
                mm_from_f64(PAGE_MARGIN_MM),
                mm_from_f64(PAGE_MARGIN_MM),
                mm_from_f64(PAGE_MARGIN_MM),
                mm_from_f64(PAGE_MARGIN_MM),
            ))
            .with_page_tracker(tracker.clone());
        if let Some(title) = &self.title {
            document_builder = document_builder.with_title(title.clone());
        }
        let mut document = document_builder.build().map_err(PdfBuildError::FontLoad)?;

        let slots = ContentWriter::new(&mut document, &self.styles, &tracker).write(&self)?;

        let mut bytes = Vec::new();
        document.render(&mut bytes).map_err(PdfBuildError::Render)?;

        let section_pages: Vec<SectionPage> = self
            .sections
            .iter()
            .zip(slots)
            .map(|(section, slot)| SectionPage {
                title: section.title().to_owned(),
                page: slot.get(),
            })
            .collect();
        for entry in &section_pages {
            debug!("Section '{}' starts on page {:?}", entry.title, entry.page);
        }

        let page_count = tracker.current();
        info!("Rendered {} pages ({} bytes)", page_count, bytes.len());

        Ok(RenderedPdf {
            bytes,
            section_pages,
            page_count,
        })
    }

    /// Renders the document and adds an outline entry for every section.
    #[cfg(feature = "bookmarks")]
    pub fn render_with_bookmarks(self) -> Result<RenderedPdf, PdfBuildError> {
        let rendered = self.render()?;
        let bytes = bookmarks::apply_section_bookmarks(&rendered.bytes, &rendered.section_pages)?;
        Ok(RenderedPdf { bytes, ..rendered })
    }
}

/// Pushes content blocks into a document in order.
struct ContentWriter<'a> {
    document: &'a mut genpdf::Document,
    styles: &'a StyleSet,
    tracker: &'a PageTracker,
    has_content: bool,
    at_page_top: bool,
}

impl<'a> ContentWriter<'a> {
    fn new(
        document: &'a mut genpdf::Document,
        styles: &'a StyleSet,
        tracker: &'a PageTracker,
    ) -> Self {
        Self {
            document,
            styles,
            tracker,
            has_content: false,
            at_page_top: true,
        }
    }

    fn write(mut self, builder: &PdfBuilder) -> Result<Vec<PageSlot>, PdfBuildError> {
        if let Some(cover) = &builder.cover {
            self.write_cover(cover)?;
            self.page_break();
        }

        if let Some(toc_title) = &builder.toc_title {
            self.text(StyleName::SectionHeader, toc_title);
            for entry in builder.toc_entries() {
                self.text(StyleName::BulletItem, entry);
            }
        }

        let mut slots = Vec::with_capacity(builder.sections.len());
        for section in &builder.sections {
            slots.push(self.write_section(section)?);
        }

        for block in &builder.epilogue {
            self.block(block)?;
        }

        Ok(slots)
    }

    fn write_cover(&mut self, cover: &Cover) -> Result<(), PdfBuildError> {
        self.push(Spacer::new(COVER_TOP_GAP_MM));
        for line in cover.title_lines() {
            self.text(StyleName::DocTitle, line);
        }
        if let Some(subtitle) = cover.subtitle() {
            self.push(Spacer::new(COVER_TITLE_GAP_MM));
            self.text(StyleName::DocSubtitle, subtitle);
            self.push(Spacer::new(COVER_SUBTITLE_GAP_MM));
        }
        for block in cover.blocks() {
            self.block(block)?;
        }
        Ok(())
    }

    fn write_section(&mut self, section: &Section) -> Result<PageSlot, PdfBuildError> {
        let mut blocks = section.blocks().iter().peekable();
        while let Some(Block::PageBreak) = blocks.peek() {
            self.page_break();
            blocks.next();
        }

        let (marker, slot) = self.tracker.marker();
        self.document.push(marker);
        self.text(StyleName::SectionHeader, section.title());

        for block in blocks {
            self.block(block)?;
        }
        Ok(slot)
    }

    fn block(&mut self, block: &Block) -> Result<(), PdfBuildError> {
        match block {
            Block::Paragraph(paragraph) => self.paragraph(paragraph),
            Block::Spacer(height_mm) => self.push(Spacer::new(*height_mm)),
            Block::Table(table) => {
                let element = table.to_element(self.styles).map_err(PdfBuildError::Layout)?;
                self.push(element);
            }
            Block::PageBreak => self.page_break(),
        }
        Ok(())
    }

    fn text(&mut self, style: StyleName, text: &str) {
        self.paragraph(&RichParagraph::new(style, vec![Span::new(text)]));
    }

    fn paragraph(&mut self, paragraph: &RichParagraph) {
        let style = self.styles.get(paragraph.style());
        let margins = paragraph_margins(style, self.at_page_top);
        match style.background {
            Some(color) => {
                let text = ShadedText::new(plain_text(paragraph.spans()), color);
                self.push(text.styled(style.text_style()).padded(margins));
            }
            None => self.push(paragraph_element(paragraph, style).padded(margins)),
        }
    }

    /// Page breaks before any content would only produce a blank first page.
    fn page_break(&mut self) {
        if self.has_content {
            self.document.push(PageBreak::new());
            self.at_page_top = true;
        }
    }

    fn push<E: Element + 'static>(&mut self, element: E) {
        self.has_content = true;
        self.at_page_top = false;
        self.document.push(element);
    }
}

fn paragraph_element(paragraph: &RichParagraph, style: &ParagraphStyle) -> impl Element {
    let mut element = Paragraph::default();
    for span in paragraph.spans() {
        element.push(span.to_styled_string());
    }
    element.set_alignment(style.alignment.into());
    element.styled(style.text_style())
}

/// Space around a paragraph. The space before is dropped when the paragraph opens a page.
fn paragraph_margins(style: &ParagraphStyle, at_page_top: bool) -> Margins {
    let space_before = if at_page_top { 0.0 } else { style.space_before };
    Margins::trbl(
        mm_from_f64(space_before),
        mm_from_f64(style.right_indent),
        mm_from_f64(style.space_after),
        mm_from_f64(style.left_indent),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::build_table;

    fn sample_builder() -> PdfBuilder {
        PdfBuilder::new()
            .with_cover(
                Cover::new("TRAK").with_block(Block::table(build_table(
                    vec![vec!["Status", "Draft"]],
                    vec![40.0, 100.0],
                    false,
                ))),
            )
            .with_toc_title(Some("Contents".to_string()))
            .add_section(
                Section::builder("1. First")
                    .start_on_new_page(true)
                    .push(Block::table(build_table(
                        vec![vec!["h1", "h2"], vec!["a", "b"]],
                        vec![50.0, 50.0],
                        true,
                    )))
                    .build(),
            )
            .add_section(Section::new("2. Second").with_block(Block::body("text")))
    }

    #[test]
    fn toc_lists_section_titles() {
        assert_eq!(sample_builder().toc_entries(), vec!["1. First", "2. Second"]);
    }

    #[test]
    fn toc_is_empty_when_disabled() {
        let builder = sample_builder().with_toc_title(None);
        assert!(builder.toc_entries().is_empty());
    }

    #[test]
    fn tables_include_cover_and_sections() {
        let builder = sample_builder();
        let tables: Vec<_> = builder.tables().collect();
        assert_eq!(tables.len(), 2);
        assert!(!tables[0].has_header());
        assert!(tables[1].has_header());
    }

    #[test]
    fn space_before_is_dropped_at_page_top() {
        let styles = build_styles();
        let header = styles.get(StyleName::SectionHeader);

        assert_eq!(
            paragraph_margins(header, true),
            Margins::trbl(
                mm_from_f64(0.0),
                mm_from_f64(0.0),
                mm_from_f64(header.space_after),
                mm_from_f64(0.0),
            )
        );
        assert_eq!(
            paragraph_margins(header, false),
            Margins::trbl(
                mm_from_f64(header.space_before),
                mm_from_f64(0.0),
                mm_from_f64(header.space_after),
                mm_from_f64(0.0),
            )
        );
    }

    #[test]
    fn indents_become_side_margins() {
        let styles = build_styles();
        let bullet = styles.get(StyleName::BulletItem);
        assert_eq!(
            paragraph_margins(bullet, false),
            Margins::trbl(
                mm_from_f64(bullet.space_before),
                mm_from_f64(bullet.right_indent),
                mm_from_f64(bullet.space_after),
                mm_from_f64(bullet.left_indent),
            )
        );
    }

    #[test]
    fn error_messages_are_stable() {
        let err = PdfBuildError::Io(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert_eq!(err.to_string(), "failed to write output");
        assert!(std::error::Error::source(&err).is_some());
    }
}
