//! BibTeX formatting module
//!
//! Converts [`Entry`] structures back to BibTeX text.

use crate::entry::Entry;

/// Format a single entry
pub fn format_entry(entry: &Entry) -> String {
    let mut result = format!("@{}{{{},\n", entry.entry_type.as_str(), entry.cite_key);

    for field in &entry.fields {
        result.push_str("    ");
        result.push_str(&field.key);
        result.push_str(" = ");
        result.push_str(&format_value(&field.value));
        result.push_str(",\n");
    }

    result.push('}');
    result
}

/// Format entries separated by blank lines
pub fn format_entries(entries: &[Entry]) -> String {
    entries
        .iter()
        .map(format_entry)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Numbers are written bare, everything else in braces
fn format_value(value: &str) -> String {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        return value.to_string();
    }

    if braces_balanced(value) {
        format!("{{{value}}}")
    } else {
        format!("{{{}}}", value.replace('{', "\\{").replace('}', "\\}"))
    }
}

fn braces_balanced(value: &str) -> bool {
    let mut depth = 0i32;
    let mut escaped = false;
    for c in value.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}
