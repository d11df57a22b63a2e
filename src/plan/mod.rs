//! The TRAK Contracts Implementation Plan.
//!
//! [`plan_builder`] assembles the literal document; [`build`] and [`build_to`] render it to disk.

mod sections;

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::builder::{PdfBuildError, PdfBuilder, RenderedPdf};
use crate::model::Block;
use crate::richtext::Span;
use crate::styles::StyleName;

pub use sections::{cover, sections};

/// Where [`build`] writes the document, resolved against the current working directory.
pub const DEFAULT_OUTPUT_PATH: &str = "docs/Contracts-Implementation-Plan.pdf";

/// Title stored in the PDF metadata.
pub const DOCUMENT_TITLE: &str = "TRAK - Contracts Implementation Plan";

/// Heading of the printed table of contents.
pub const TOC_TITLE: &str = "Table of Contents";

/// Assembles the complete plan: cover, table of contents, thirteen sections and closing line.
pub fn plan_builder() -> PdfBuilder {
    let mut builder = PdfBuilder::new()
        .with_title(DOCUMENT_TITLE)
        .with_cover(cover())
        .with_toc_title(Some(TOC_TITLE.to_string()));

    for section in sections() {
        builder = builder.add_section(section);
    }

    builder
        .add_epilogue_block(Block::spacer_cm(2.0))
        .add_epilogue_block(Block::rich(
            StyleName::DocSubtitle,
            vec![Span::new(
                "Document Version 2.0 | January 2026 | Based on AgTravelSoft analysis and My Travel contract example",
            )
            .italic()],
        ))
}

/// Renders the plan to [`DEFAULT_OUTPUT_PATH`] and returns the path.
pub fn build() -> Result<PathBuf, PdfBuildError> {
    build_to(DEFAULT_OUTPUT_PATH)
}

/// Renders the plan to `path`, replacing any existing file, and returns the path.
///
/// The parent directory is created when missing. With the `bookmarks` feature the file carries
/// an outline entry per section.
pub fn build_to(path: impl AsRef<Path>) -> Result<PathBuf, PdfBuildError> {
    #[cfg(feature = "bookmarks")]
    let rendered = plan_builder().render_with_bookmarks()?;
    #[cfg(not(feature = "bookmarks"))]
    let rendered = plan_builder().render()?;

    write_rendered(&rendered, path.as_ref())
}

/// Writes `rendered` to `path`, creating the parent directory if needed.
pub fn write_rendered(rendered: &RenderedPdf, path: &Path) -> Result<PathBuf, PdfBuildError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, &rendered.bytes)?;
    info!(
        "Wrote {} ({} pages, {} bytes)",
        path.display(),
        rendered.page_count,
        rendered.bytes.len()
    );
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_has_thirteen_sections_in_toc() {
        let builder = plan_builder();
        assert_eq!(builder.sections().len(), 13);
        assert_eq!(builder.toc_entries().len(), 13);
        assert_eq!(builder.toc_entries()[0], "1. Executive Summary");
        assert_eq!(builder.toc_entries()[12], "13. Technical Specifications");
    }

    #[test]
    fn plan_defines_twenty_tables() {
        let builder = plan_builder();
        let tables: Vec<_> = builder.tables().collect();
        assert_eq!(tables.len(), 20);
        assert!(!tables[0].has_header());
        assert!(tables[1..].iter().all(|table| table.has_header()));
    }

    #[test]
    fn default_output_path_is_relative() {
        let path = Path::new(DEFAULT_OUTPUT_PATH);
        assert!(path.is_relative());
        assert!(path.ends_with("docs/Contracts-Implementation-Plan.pdf"));
    }

    #[test]
    fn epilogue_closes_with_version_line() {
        let builder = plan_builder();
        let Some(Block::Paragraph(line)) = builder.epilogue().last() else {
            panic!("epilogue should end with a paragraph");
        };
        assert_eq!(line.style(), StyleName::DocSubtitle);
        assert!(line.spans()[0].is_italic());
        assert!(line.spans()[0].text().starts_with("Document Version 2.0"));
    }
}
