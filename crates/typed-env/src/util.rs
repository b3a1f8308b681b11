/// Wrap a value in single quotes as a TypeScript string literal.
///
/// Backslashes, single quotes and line breaks are escaped; everything else
/// is emitted verbatim.
pub fn quote_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

/// Format a block of documentation as a single line.
pub fn format_doc(doc: Option<&str>) -> Option<String> {
    doc.map(|d| {
        d.split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    })
}
