#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Render an org-mode style table:
///
/// ```text
/// | Name   |   Rank |
/// |--------+--------|
/// | Total  | 12 345 |
/// ```
///
/// Every row must have one cell per header.
pub fn render_table(headers: &[&str], aligns: &[Align], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(render_line(headers.iter().copied(), aligns, &widths));

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
    lines.push(format!("|{}|", rule.join("+")));

    for row in rows {
        lines.push(render_line(row.iter().map(String::as_str), aligns, &widths));
    }

    lines.join("\n")
}

fn render_line<'a>(
    cells: impl Iterator<Item = &'a str>,
    aligns: &[Align],
    widths: &[usize],
) -> String {
    let padded: Vec<String> = cells
        .zip(aligns.iter().zip(widths))
        .map(|(cell, (align, width))| match align {
            Align::Left => format!("{cell:<width$}"),
            Align::Right => format!("{cell:>width$}"),
        })
        .collect();

    format!("| {} |", padded.join(" | "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_columns_to_widest_cell() {
        let rows = vec![
            vec!["Total".to_string(), "1 234".to_string()],
            vec!["Attack".to_string(), "5".to_string()],
        ];
        let table = render_table(&["Name", "Rank"], &[Align::Left, Align::Right], &rows);

        let expected = "\
| Name   |  Rank |
|--------+-------|
| Total  | 1 234 |
| Attack |     5 |";
        assert_eq!(table, expected);
    }

    #[test]
    fn empty_table_keeps_header_and_rule() {
        let table = render_table(&["Name", "Amount"], &[Align::Left, Align::Right], &[]);
        assert_eq!(table, "| Name | Amount |\n|------+--------|");
    }
}
