//! The fixed style sheet of the plan document.
//!
//! Every paragraph and table cell in the document references one of the [`StyleName`] roles. The
//! presets are built once by [`build_styles`] and never mutated afterwards. Sizes are expressed in
//! points, spacing and indentation in millimetres.

use genpdf::style::{Color, Style};

use crate::model::HorizontalAlignment;

/// Brand blue used for titles, section headers and table header rows.
pub const PRIMARY_COLOR: Color = Color::Rgb(0x1e, 0x40, 0xaf);
/// Lighter blue accent.
pub const SECONDARY_COLOR: Color = Color::Rgb(0x3b, 0x82, 0xf6);
/// Green accent.
pub const SUCCESS_COLOR: Color = Color::Rgb(0x16, 0xa3, 0x4a);
/// Red accent used for legal warnings.
pub const WARNING_COLOR: Color = Color::Rgb(0xdc, 0x26, 0x26);
/// Muted gray for subtitles and table grid lines.
pub const GRAY_COLOR: Color = Color::Rgb(0x6b, 0x72, 0x80);
/// Background of alternate table rows and code blocks.
pub const LIGHT_GRAY: Color = Color::Rgb(0xf3, 0xf4, 0xf6);
/// Default text color.
pub const DARK_COLOR: Color = Color::Rgb(0x1f, 0x29, 0x37);
/// Text color of table header rows.
pub const WHITE: Color = Color::Rgb(0xff, 0xff, 0xff);
/// Text color of table body cells.
pub const BLACK: Color = Color::Rgb(0x00, 0x00, 0x00);

/// Millimetres per typographic point.
pub const MM_PER_PT: f64 = 25.4 / 72.0;

/// Leading applied when a style does not set one, as a multiple of the font size.
const DEFAULT_LEADING_FACTOR: f64 = 1.2;

/// Converts a length in points to millimetres.
pub fn pt(points: f64) -> f64 {
    points * MM_PER_PT
}

/// The roles a block can be styled with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StyleName {
    DocTitle,
    DocSubtitle,
    SectionHeader,
    SubsectionHeader,
    DocBody,
    BulletItem,
    CodeBlock,
    TableHeader,
    TableCell,
}

impl StyleName {
    /// All roles in declaration order.
    pub const ALL: [StyleName; 9] = [
        StyleName::DocTitle,
        StyleName::DocSubtitle,
        StyleName::SectionHeader,
        StyleName::SubsectionHeader,
        StyleName::DocBody,
        StyleName::BulletItem,
        StyleName::CodeBlock,
        StyleName::TableHeader,
        StyleName::TableCell,
    ];

    /// Name of the preset as it appears in the style sheet.
    pub fn as_str(self) -> &'static str {
        match self {
            StyleName::DocTitle => "DocTitle",
            StyleName::DocSubtitle => "DocSubtitle",
            StyleName::SectionHeader => "SectionHeader",
            StyleName::SubsectionHeader => "SubsectionHeader",
            StyleName::DocBody => "DocBody",
            StyleName::BulletItem => "BulletItem",
            StyleName::CodeBlock => "CodeBlock",
            StyleName::TableHeader => "TableHeader",
            StyleName::TableCell => "TableCell",
        }
    }
}

/// Visual attributes applied to every block of one role.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParagraphStyle {
    /// Font size in points.
    pub font_size: u8,
    /// Distance between baselines in points, if it differs from the default.
    pub leading: Option<f64>,
    pub text_color: Color,
    pub background: Option<Color>,
    /// Vertical space above the block, in millimetres.
    pub space_before: f64,
    /// Vertical space below the block, in millimetres.
    pub space_after: f64,
    pub alignment: HorizontalAlignment,
    /// Left indentation in millimetres.
    pub left_indent: f64,
    /// Right indentation in millimetres.
    pub right_indent: f64,
    pub bold: bool,
    pub italic: bool,
}

impl ParagraphStyle {
    fn sized(font_size: u8, text_color: Color) -> Self {
        Self {
            font_size,
            leading: None,
            text_color,
            background: None,
            space_before: 0.0,
            space_after: 0.0,
            alignment: HorizontalAlignment::Left,
            left_indent: 0.0,
            right_indent: 0.0,
            bold: false,
            italic: false,
        }
    }

    fn spaced(mut self, before_pt: f64, after_pt: f64) -> Self {
        self.space_before = pt(before_pt);
        self.space_after = pt(after_pt);
        self
    }

    fn indented(mut self, left_pt: f64, right_pt: f64) -> Self {
        self.left_indent = pt(left_pt);
        self.right_indent = pt(right_pt);
        self
    }

    fn aligned(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Builds the `genpdf` text style carrying font size, color, weight and leading.
    pub fn text_style(&self) -> Style {
        let mut style = Style::new()
            .with_font_size(self.font_size)
            .with_color(self.text_color);
        if let Some(leading) = self.leading {
            let natural = f64::from(self.font_size) * DEFAULT_LEADING_FACTOR;
            style.set_line_spacing(leading / natural);
        }
        if self.bold {
            style.set_bold();
        }
        if self.italic {
            style.set_italic();
        }
        style
    }
}

/// The complete, immutable style sheet.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleSet {
    doc_title: ParagraphStyle,
    doc_subtitle: ParagraphStyle,
    section_header: ParagraphStyle,
    subsection_header: ParagraphStyle,
    doc_body: ParagraphStyle,
    bullet_item: ParagraphStyle,
    code_block: ParagraphStyle,
    table_header: ParagraphStyle,
    table_cell: ParagraphStyle,
}

impl StyleSet {
    /// Returns the preset registered for `name`.
    pub fn get(&self, name: StyleName) -> &ParagraphStyle {
        match name {
            StyleName::DocTitle => &self.doc_title,
            StyleName::DocSubtitle => &self.doc_subtitle,
            StyleName::SectionHeader => &self.section_header,
            StyleName::SubsectionHeader => &self.subsection_header,
            StyleName::DocBody => &self.doc_body,
            StyleName::BulletItem => &self.bullet_item,
            StyleName::CodeBlock => &self.code_block,
            StyleName::TableHeader => &self.table_header,
            StyleName::TableCell => &self.table_cell,
        }
    }
}

impl Default for StyleSet {
    fn default() -> Self {
        build_styles()
    }
}

/// Returns the fixed mapping of style names to visual attributes.
pub fn build_styles() -> StyleSet {
    let mut doc_body = ParagraphStyle::sized(10, DARK_COLOR)
        .spaced(0.0, 8.0)
        .aligned(HorizontalAlignment::Justified);
    doc_body.leading = Some(14.0);

    let mut code_block = ParagraphStyle::sized(8, DARK_COLOR)
        .spaced(0.0, 8.0)
        .indented(10.0, 10.0);
    code_block.background = Some(LIGHT_GRAY);

    StyleSet {
        doc_title: ParagraphStyle::sized(24, PRIMARY_COLOR)
            .spaced(0.0, 20.0)
            .aligned(HorizontalAlignment::Center)
            .bold(),
        doc_subtitle: ParagraphStyle::sized(12, GRAY_COLOR)
            .spaced(0.0, 30.0)
            .aligned(HorizontalAlignment::Center),
        section_header: ParagraphStyle::sized(16, PRIMARY_COLOR)
            .spaced(20.0, 12.0)
            .bold(),
        subsection_header: ParagraphStyle::sized(13, DARK_COLOR)
            .spaced(15.0, 8.0)
            .bold(),
        doc_body,
        bullet_item: ParagraphStyle::sized(10, DARK_COLOR)
            .spaced(0.0, 4.0)
            .indented(15.0, 0.0),
        code_block,
        table_header: ParagraphStyle::sized(9, WHITE)
            .aligned(HorizontalAlignment::Center)
            .bold(),
        table_cell: ParagraphStyle::sized(9, BLACK),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn styles_are_deterministic() {
        assert_eq!(build_styles(), build_styles());
    }

    #[test]
    fn title_is_large_centered_primary() {
        let styles = build_styles();
        let title = styles.get(StyleName::DocTitle);
        assert_eq!(title.font_size, 24);
        assert_eq!(title.text_color, PRIMARY_COLOR);
        assert_eq!(title.alignment, HorizontalAlignment::Center);
        assert!(title.bold);
        assert_close(title.space_after, pt(20.0));
    }

    #[test]
    fn body_is_justified_with_leading() {
        let styles = build_styles();
        let body = styles.get(StyleName::DocBody);
        assert_eq!(body.font_size, 10);
        assert_eq!(body.leading, Some(14.0));
        assert_eq!(body.alignment, HorizontalAlignment::Justified);
        assert_close(body.space_after, pt(8.0));
    }

    #[test]
    fn bullets_are_indented() {
        let styles = build_styles();
        assert_close(styles.get(StyleName::BulletItem).left_indent, pt(15.0));
        assert_close(styles.get(StyleName::BulletItem).right_indent, 0.0);
    }

    #[test]
    fn only_code_blocks_carry_a_background() {
        let styles = build_styles();
        let shaded: Vec<_> = StyleName::ALL
            .into_iter()
            .filter(|name| styles.get(*name).background.is_some())
            .collect();
        assert_eq!(shaded, vec![StyleName::CodeBlock]);
        assert_eq!(
            styles.get(StyleName::CodeBlock).background,
            Some(LIGHT_GRAY)
        );
    }

    #[test]
    fn table_header_text_is_white_and_bold() {
        let styles = build_styles();
        let header = styles.get(StyleName::TableHeader);
        assert_eq!(header.text_color, WHITE);
        assert!(header.bold);
        assert_eq!(header.font_size, 9);
        assert_eq!(styles.get(StyleName::TableCell).font_size, 9);
    }

    #[test]
    fn table_body_text_is_black() {
        let styles = build_styles();
        assert_eq!(styles.get(StyleName::TableCell).text_color, BLACK);
        assert_eq!(
            styles.get(StyleName::TableCell).text_style().color(),
            Some(BLACK)
        );
    }

    #[test]
    fn text_style_reflects_preset() {
        let styles = build_styles();
        let style = styles.get(StyleName::SectionHeader).text_style();
        assert_eq!(style.font_size(), 16);
        assert!(style.is_bold());
        assert!(!style.is_italic());
        assert_eq!(style.color(), Some(PRIMARY_COLOR));
    }

    #[test]
    fn every_role_has_a_distinct_name() {
        let mut names: Vec<_> = StyleName::ALL.iter().map(|n| n.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), StyleName::ALL.len());
    }
}
