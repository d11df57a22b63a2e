//! Styled data tables.
//!
//! [`build_table`] turns a grid of literal cell values into a [`TableBlock`]: the row contents,
//! the column widths and one [`RowStyle`] per row. The block is plain data until
//! [`TableBlock::to_element`] turns it into a [`GridTable`], which lays out, shades and frames
//! the cells itself.

use genpdf::error::{Error, ErrorKind};
use genpdf::style::{Color, Style};
use genpdf::{render, Alignment, Element, Mm, Position, RenderResult, Size};
use log::warn;

use crate::elements::{fill_background, mm_from_f64, mm_to_f64, wrap_lines};
use crate::styles::{pt, StyleName, StyleSet, GRAY_COLOR, LIGHT_GRAY, PRIMARY_COLOR};

/// Horizontal cell padding in points.
const CELL_PADDING_X_PT: f64 = 8.0;
/// Vertical cell padding in points.
const CELL_PADDING_Y_PT: f64 = 6.0;

/// Presentation of a single table row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RowStyle {
    /// Fill color behind the row, `None` for the page background.
    pub background: Option<Color>,
    /// Style role used for the cell text.
    pub text: StyleName,
}

impl RowStyle {
    const HEADER: RowStyle = RowStyle {
        background: Some(PRIMARY_COLOR),
        text: StyleName::TableHeader,
    };
    const BODY: RowStyle = RowStyle {
        background: None,
        text: StyleName::TableCell,
    };
    const ALTERNATE: RowStyle = RowStyle {
        background: Some(LIGHT_GRAY),
        text: StyleName::TableCell,
    };

    /// Whether the row carries the header treatment.
    pub fn is_header(&self) -> bool {
        self.text == StyleName::TableHeader
    }
}

/// A table ready to be placed into the document.
#[derive(Clone, Debug, PartialEq)]
pub struct TableBlock {
    rows: Vec<Vec<String>>,
    column_widths: Vec<f64>,
    row_styles: Vec<RowStyle>,
    has_header: bool,
}

impl TableBlock {
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns, as defined by the column widths.
    pub fn column_count(&self) -> usize {
        self.column_widths.len()
    }

    /// Column widths in millimetres.
    pub fn column_widths(&self) -> &[f64] {
        &self.column_widths
    }

    /// Sum of all column widths in millimetres.
    pub fn total_width(&self) -> f64 {
        self.column_widths.iter().sum()
    }

    pub fn has_header(&self) -> bool {
        self.has_header
    }

    /// Style applied to row `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn row_style(&self, index: usize) -> &RowStyle {
        &self.row_styles[index]
    }

    pub fn row_styles(&self) -> &[RowStyle] {
        &self.row_styles
    }

    /// Whether every row has exactly one cell per column.
    pub fn is_rectangular(&self) -> bool {
        let columns = self.column_count();
        self.rows.iter().all(|row| row.len() == columns)
    }

    /// Builds the `genpdf` element for this table, centered within the page body.
    ///
    /// Rows that do not match the column count are padded with empty cells or truncated so the
    /// grid stays aligned; such tables are reported through `log::warn!`.
    pub fn to_element(&self, styles: &StyleSet) -> Result<GridTable, Error> {
        let columns = self.column_count();
        if columns == 0 || self.column_widths.iter().any(|width| *width <= 0.0) {
            return Err(Error::new(
                format!("invalid table column widths {:?}", self.column_widths),
                ErrorKind::InvalidData,
            ));
        }
        if !self.is_rectangular() {
            warn!(
                "table with {} rows is not rectangular; normalizing rows to {} columns",
                self.rows.len(),
                columns
            );
        }

        let rows = self
            .rows
            .iter()
            .zip(&self.row_styles)
            .map(|(cells, row_style)| GridRow {
                cells: (0..columns)
                    .map(|column| cells.get(column).cloned().unwrap_or_default())
                    .collect(),
                text_style: styles.get(row_style.text).text_style(),
                background: row_style.background,
                alignment: if row_style.is_header() {
                    Alignment::Center
                } else {
                    Alignment::Left
                },
            })
            .collect();

        Ok(GridTable {
            rows,
            column_widths: self.column_widths.iter().copied().map(mm_from_f64).collect(),
            padding_x: mm_from_f64(pt(CELL_PADDING_X_PT)),
            padding_y: mm_from_f64(pt(CELL_PADDING_Y_PT)),
            line_color: GRAY_COLOR,
            next_row: 0,
        })
    }
}

/// Creates a styled table from a rectangular grid of cell values.
///
/// `column_widths` are in millimetres. With `has_header`, row 0 gets the primary background and
/// white bold centered text, and every even body row (2, 4, ...) is shaded light gray. Without it
/// all rows use the plain cell style.
pub fn build_table<R, C>(
    rows: impl IntoIterator<Item = R>,
    column_widths: impl Into<Vec<f64>>,
    has_header: bool,
) -> TableBlock
where
    R: IntoIterator<Item = C>,
    C: Into<String>,
{
    let rows: Vec<Vec<String>> = rows
        .into_iter()
        .map(|row| row.into_iter().map(Into::into).collect())
        .collect();

    let row_styles = (0..rows.len())
        .map(|index| match (has_header, index) {
            (false, _) => RowStyle::BODY,
            (true, 0) => RowStyle::HEADER,
            (true, i) if i % 2 == 0 => RowStyle::ALTERNATE,
            (true, _) => RowStyle::BODY,
        })
        .collect();

    TableBlock {
        rows,
        column_widths: column_widths.into(),
        row_styles,
        has_header,
    }
}

struct GridRow {
    cells: Vec<String>,
    text_style: Style,
    background: Option<Color>,
    alignment: Alignment,
}

/// Wrapped lines of every cell in a row, plus the row height including padding.
struct RowLayout {
    cells: Vec<Vec<String>>,
    line_height: Mm,
    height: Mm,
}

/// Table element with fixed column widths, per-row fills and a uniform gray grid.
///
/// Each row is measured before it is drawn: the fill goes down first, then the cell text, then
/// the grid lines. Rows are never split; a row that does not fit moves to the next page.
pub struct GridTable {
    rows: Vec<GridRow>,
    column_widths: Vec<Mm>,
    padding_x: Mm,
    padding_y: Mm,
    line_color: Color,
    next_row: usize,
}

impl GridTable {
    /// Cell values per row after normalization to the column count.
    pub fn cells(&self) -> Vec<&[String]> {
        self.rows.iter().map(|row| row.cells.as_slice()).collect()
    }

    /// Fill color of every row, in order.
    pub fn row_backgrounds(&self) -> Vec<Option<Color>> {
        self.rows.iter().map(|row| row.background).collect()
    }

    /// Column widths, scaled down proportionally when the table is wider than `available`.
    fn fitted_widths(&self, available: Mm) -> Vec<Mm> {
        let total: Mm = self.column_widths.iter().copied().sum();
        if total > available {
            let factor = mm_to_f64(available) / mm_to_f64(total);
            self.column_widths.iter().map(|width| *width * factor).collect()
        } else {
            self.column_widths.clone()
        }
    }

    fn layout_row(
        &self,
        context: &genpdf::Context,
        row: &GridRow,
        widths: &[Mm],
        style: Style,
    ) -> RowLayout {
        let line_height = style.line_height(&context.font_cache);
        let cells: Vec<Vec<String>> = row
            .cells
            .iter()
            .zip(widths)
            .map(|(value, width)| {
                wrap_lines(context, style, value, *width - self.padding_x - self.padding_x)
            })
            .collect();
        let max_lines = cells.iter().map(Vec::len).max().unwrap_or(1);
        RowLayout {
            cells,
            line_height,
            height: line_height * max_lines as f64 + self.padding_y + self.padding_y,
        }
    }

    fn draw_row(
        &self,
        context: &genpdf::Context,
        area: &render::Area<'_>,
        row: &GridRow,
        widths: &[Mm],
        layout: &RowLayout,
        style: Style,
    ) -> Result<(), Error> {
        let table_width: Mm = widths.iter().copied().sum();
        if let Some(color) = row.background {
            fill_background(area, Size::new(table_width, layout.height), color);
        }

        let grid_style = Style::new().with_color(self.line_color);
        let mut x = Mm::default();
        for (lines, width) in layout.cells.iter().zip(widths) {
            let inner_width = *width - self.padding_x - self.padding_x;
            for (index, line) in lines.iter().enumerate() {
                let slack = inner_width - style.str_width(&context.font_cache, line);
                let offset = match row.alignment {
                    Alignment::Left => Mm::default(),
                    Alignment::Center => slack / 2.0,
                    Alignment::Right => slack,
                };
                let position = Position::new(
                    x + self.padding_x + offset.max(Mm::default()),
                    self.padding_y + layout.line_height * index as f64,
                );
                area.print_str(&context.font_cache, position, style, line)?;
            }

            let right = x + *width;
            area.draw_line(
                vec![
                    Position::new(x, 0),
                    Position::new(right, 0),
                    Position::new(right, layout.height),
                    Position::new(x, layout.height),
                    Position::new(x, 0),
                ],
                grid_style,
            );
            x = right;
        }
        Ok(())
    }
}

impl Element for GridTable {
    fn render(
        &mut self,
        context: &genpdf::Context,
        mut area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let mut result = RenderResult::default();
        let widths = self.fitted_widths(area.size().width);
        let table_width: Mm = widths.iter().copied().sum();
        area.add_offset(Position::new((area.size().width - table_width) / 2.0, 0));
        area.set_width(table_width);

        while self.next_row < self.rows.len() {
            let row = &self.rows[self.next_row];
            let row_style = style.and(row.text_style);
            let layout = self.layout_row(context, row, &widths, row_style);
            if layout.height > area.size().height {
                result.has_more = true;
                break;
            }

            let mut row_area = area.clone();
            row_area.set_height(layout.height);
            self.draw_row(context, &row_area, row, &widths, &layout, row_style)?;

            area.add_offset(Position::new(0, layout.height));
            result.size.width = table_width;
            result.size.height += layout.height;
            self.next_row += 1;
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles::build_styles;

    fn grid(rows: usize, columns: usize) -> Vec<Vec<String>> {
        (0..rows)
            .map(|r| (0..columns).map(|c| format!("r{r}c{c}")).collect())
            .collect()
    }

    #[test]
    fn header_table_styles_header_and_even_rows() {
        let table = build_table(grid(3, 3), vec![30.0, 30.0, 30.0], true);

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 3);
        assert!(table.row_style(0).is_header());
        assert_eq!(table.row_style(0).background, Some(PRIMARY_COLOR));
        assert_eq!(table.row_style(1).background, None);
        assert_eq!(table.row_style(2).background, Some(LIGHT_GRAY));
        assert!(!table.row_style(2).is_header());
    }

    #[test]
    fn headerless_table_is_never_styled() {
        let table = build_table(grid(6, 2), vec![40.0, 100.0], false);

        assert!(!table.has_header());
        assert!(table
            .row_styles()
            .iter()
            .all(|style| *style == RowStyle::BODY));
    }

    #[test]
    fn alternate_shading_follows_even_indices() {
        let table = build_table(grid(7, 2), vec![50.0, 110.0], true);
        let shaded: Vec<usize> = table
            .row_styles()
            .iter()
            .enumerate()
            .filter(|(_, style)| style.background == Some(LIGHT_GRAY))
            .map(|(index, _)| index)
            .collect();
        assert_eq!(shaded, vec![2, 4, 6]);
    }

    #[test]
    fn total_width_sums_columns() {
        let table = build_table(grid(2, 3), vec![40.0, 25.0, 50.0], true);
        assert!((table.total_width() - 115.0).abs() < f64::EPSILON);
    }

    #[test]
    fn element_rows_follow_row_styles() {
        let styles = build_styles();
        let header = build_table(grid(3, 3), vec![30.0, 30.0, 30.0], true)
            .to_element(&styles)
            .expect("header table element");
        assert_eq!(
            header.row_backgrounds(),
            vec![Some(PRIMARY_COLOR), None, Some(LIGHT_GRAY)]
        );

        let plain = build_table(grid(3, 3), vec![30.0, 30.0, 30.0], false)
            .to_element(&styles)
            .expect("headerless table element");
        assert_eq!(plain.row_backgrounds(), vec![None, None, None]);
    }

    #[test]
    fn ragged_rows_are_padded_and_truncated() {
        let table = build_table(
            vec![vec!["a", "b"], vec!["only"], vec!["x", "y", "z"]],
            vec![20.0, 20.0],
            true,
        );
        let element = table.to_element(&build_styles()).expect("ragged table element");

        let cells = element.cells();
        assert_eq!(cells.len(), 3);
        assert!(cells.iter().all(|row| row.len() == 2));
        assert_eq!(cells[1], ["only".to_string(), String::new()]);
        assert_eq!(cells[2], ["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn fitted_widths_shrink_to_available_space() {
        let element = build_table(grid(1, 2), vec![100.0, 100.0], false)
            .to_element(&build_styles())
            .expect("wide table element");

        let fitted = element.fitted_widths(mm_from_f64(100.0));
        let total: f64 = fitted.into_iter().map(mm_to_f64).sum();
        assert!((total - 100.0).abs() < 1e-9);

        let narrow = element.fitted_widths(mm_from_f64(300.0));
        assert_eq!(narrow, vec![mm_from_f64(100.0), mm_from_f64(100.0)]);
    }

    #[test]
    fn zero_width_columns_are_rejected() {
        let table = build_table(grid(2, 2), vec![20.0, 0.0], true);
        assert!(table.to_element(&build_styles()).is_err());
    }

    #[test]
    fn ragged_grid_is_detected() {
        let table = build_table(
            vec![vec!["a", "b", "c"], vec!["only one"]],
            vec![20.0, 20.0, 20.0],
            true,
        );
        assert!(!table.is_rectangular());
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn rectangular_grid_passes_check() {
        let table = build_table(grid(4, 4), vec![10.0; 4], false);
        assert!(table.is_rectangular());
    }

    #[test]
    fn empty_grid_has_no_rows() {
        let table = build_table(Vec::<Vec<String>>::new(), vec![10.0], true);
        assert_eq!(table.row_count(), 0);
        assert!(table.row_styles().is_empty());
    }
}
