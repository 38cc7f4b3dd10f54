use super::{Metadata, Table};
use std::fmt::Write;

const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Render `table` as an XML document rooted at `<export>`.
pub fn render(table: &Table<'_>, metadata: &Metadata, include_metadata: bool) -> String {
    let mut out = String::new();
    out.push_str(DECLARATION);
    out.push_str("\n<export>\n");

    if include_metadata {
        out.push_str("  <metadata>\n");
        let _ = writeln!(out, "    <total_records>{}</total_records>", table.rows.len());
        let _ = writeln!(
            out,
            "    <export_date>{}</export_date>",
            metadata.exported_at.to_rfc3339()
        );
        let _ = writeln!(out, "    <format>{}</format>", metadata.format);
        if let Some(title) = &metadata.title {
            let _ = writeln!(out, "    <title>{}</title>", escape(title));
        }
        out.push_str("    <fields>\n");
        for field in &table.fields {
            let _ = writeln!(
                out,
                "      <field key=\"{}\" type=\"{}\">{}</field>",
                escape(&field.key),
                field.kind,
                escape(&field.label)
            );
        }
        out.push_str("    </fields>\n");
        out.push_str("  </metadata>\n");
    }

    out.push_str("  <data>\n");
    for row in &table.rows {
        out.push_str("    <record>\n");
        for (field, cell) in table.cells(row) {
            let tag = element_name(&field.key);
            let _ = writeln!(out, "      <{tag}>{}</{tag}>", escape(cell));
        }
        out.push_str("    </record>\n");
    }
    out.push_str("  </data>\n");
    out.push_str("</export>\n");

    out
}

/// Escape the five XML special characters.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Field keys become element names: anything outside `[A-Za-z0-9_.-]` maps
/// to `_`, and a leading digit, dot or dash gets a `_` prefix.
fn element_name(key: &str) -> String {
    let mut name: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if name
        .chars()
        .next()
        .is_none_or(|c| c.is_ascii_digit() || c == '-' || c == '.')
    {
        name.insert(0, '_');
    }
    name
}
