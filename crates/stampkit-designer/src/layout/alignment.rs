//! Horizontal and vertical alignment of packed rows

use super::{LayoutPolicy, Row};
use stampkit_core::{HAlign, PageSpec, StampFont, VAlign};

/// Apply both alignments from the policy
pub fn align_rows(rows: &mut [Row], page: &PageSpec, policy: &LayoutPolicy, font: &StampFont) {
    for row in rows.iter_mut() {
        align_horizontal(row, page, policy.h_align);
    }
    align_vertical(
        rows,
        page,
        policy.row_pitch(font),
        font.size.height,
        policy.v_align,
    );
}

/// Shift the cells of one row within the usable width
///
/// Justified rows spread the free space evenly between cells so the last
/// cell's right edge lands on the right border. A row with a single cell
/// stays left-aligned.
pub fn align_horizontal(row: &mut Row, page: &PageSpec, align: HAlign) {
    if row.is_empty() {
        return;
    }
    let free = page.usable_width() - row.width();

    match align {
        HAlign::Left => {}
        HAlign::Right => row.shift_x(free),
        HAlign::Center => row.shift_x(free / 2.0),
        HAlign::Justified => {
            let gaps = row.cells.len() - 1;
            if gaps == 0 {
                return;
            }
            let spacing = free / gaps as f64;
            for (index, cell) in row.cells.iter_mut().enumerate() {
                cell.left += index as f64 * spacing;
            }
        }
    }
}

/// Shift rows within the usable height
///
/// `leftover` is the space between the bottom of the last stamp and the
/// bottom border when the rows sit at the top. `Fill` spreads it between rows
/// and behaves as `Top` for a single row.
pub fn align_vertical(rows: &mut [Row], page: &PageSpec, pitch: f64, glyph_height: f64, align: VAlign) {
    if rows.is_empty() {
        return;
    }
    let leftover = page.usable_height() - (rows.len() - 1) as f64 * pitch - glyph_height;

    match align {
        VAlign::Top => {}
        VAlign::Bottom => rows.iter_mut().for_each(|row| row.top += leftover),
        VAlign::Middle => rows.iter_mut().for_each(|row| row.top += leftover / 2.0),
        VAlign::Fill => {
            if rows.len() < 2 {
                return;
            }
            let spacing = leftover / (rows.len() - 1) as f64;
            for (index, row) in rows.iter_mut().enumerate() {
                row.top += index as f64 * spacing;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Cell;
    use stampkit_core::Border;

    fn page() -> PageSpec {
        PageSpec::new(100.0, 100.0, Border::uniform(10.0))
    }

    fn row(widths: &[f64]) -> Row {
        let mut left = 10.0;
        let cells = widths
            .iter()
            .map(|&width| {
                let cell = Cell {
                    symbol: "A".to_string(),
                    left,
                    width,
                    x_nudge: 0.0,
                    y_nudge: 0.0,
                    separator: false,
                };
                left += width;
                cell
            })
            .collect();
        Row::new(cells, 10.0)
    }

    #[test]
    fn test_horizontal_modes() {
        let mut right = row(&[10.0, 10.0]);
        align_horizontal(&mut right, &page(), HAlign::Right);
        assert_eq!(right.cells[1].right(), 90.0);

        let mut center = row(&[10.0, 10.0]);
        align_horizontal(&mut center, &page(), HAlign::Center);
        assert_eq!(center.cells[0].left - 10.0, 90.0 - center.cells[1].right());
    }

    #[test]
    fn test_justified_ends_on_right_border() {
        let mut justified = row(&[10.0, 5.0, 10.0, 5.0]);
        align_horizontal(&mut justified, &page(), HAlign::Justified);
        assert_eq!(justified.cells[0].left, 10.0);
        assert!((justified.cells[3].right() - 90.0).abs() < 1e-9);

        let mut single = row(&[10.0]);
        align_horizontal(&mut single, &page(), HAlign::Justified);
        assert_eq!(single.cells[0].left, 10.0);
    }

    #[test]
    fn test_vertical_modes() {
        let make = || vec![row(&[5.0]), row(&[5.0]), row(&[5.0])];
        let place = |rows: &mut Vec<Row>| {
            for (i, r) in rows.iter_mut().enumerate() {
                r.top = 10.0 + i as f64 * 10.0;
            }
        };

        let mut rows = make();
        place(&mut rows);
        align_vertical(&mut rows, &page(), 10.0, 10.0, VAlign::Bottom);
        assert_eq!(rows[2].top + 10.0, 90.0);

        let mut rows = make();
        place(&mut rows);
        align_vertical(&mut rows, &page(), 10.0, 10.0, VAlign::Middle);
        assert_eq!(rows[0].top, 35.0);

        let mut rows = make();
        place(&mut rows);
        align_vertical(&mut rows, &page(), 10.0, 10.0, VAlign::Fill);
        assert_eq!(rows[0].top, 10.0);
        assert_eq!(rows[2].top + 10.0, 90.0);

        let mut single = vec![row(&[5.0])];
        align_vertical(&mut single, &page(), 10.0, 10.0, VAlign::Fill);
        assert_eq!(single[0].top, 10.0);
    }
}
