use super::Table;

const LINE_END: &str = "\r\n";

/// Render `table` as CSV, optionally preceded by a row of field labels.
pub fn render(table: &Table<'_>, include_headers: bool) -> String {
    let mut out = String::new();

    if include_headers {
        write_row(&mut out, table.fields.iter().map(|field| field.label.as_str()));
    }
    for row in &table.rows {
        write_row(&mut out, row.iter().map(String::as_str));
    }

    out
}

fn write_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>) {
    for (i, cell) in cells.enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_escaped(out, cell);
    }
    out.push_str(LINE_END);
}

/// Quote a cell when it contains a delimiter, quote or line break.
fn push_escaped(out: &mut String, cell: &str) {
    if cell.contains([',', '"', '\r', '\n']) {
        out.push('"');
        out.push_str(&cell.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(cell);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::ExportField;

    #[test]
    fn test_quoting() {
        let mut out = String::new();
        push_escaped(&mut out, "plain");
        out.push('|');
        push_escaped(&mut out, "Yankees, NY");
        out.push('|');
        push_escaped(&mut out, "the \"over\"");
        assert_eq!(out, "plain|\"Yankees, NY\"|\"the \"\"over\"\"\"");
    }

    #[test]
    fn test_render_with_and_without_headers() {
        let sport = ExportField::text("sport", "Sport");
        let roi = ExportField::number("roi", "ROI %");
        let table = Table {
            fields: vec![&sport, &roi],
            rows: vec![
                vec!["MLB".into(), "2.00".into()],
                vec!["NFL".into(), "".into()],
            ],
        };

        assert_eq!(render(&table, true), "Sport,ROI %\r\nMLB,2.00\r\nNFL,\r\n");
        assert_eq!(render(&table, false), "MLB,2.00\r\nNFL,\r\n");
    }
}
