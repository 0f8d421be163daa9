//! `{doc[key]}` placeholders in header formats and `cmd` command lines

use imbib_library::Document;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref PLACEHOLDER: Regex =
        Regex::new(r#"\{doc\[\s*['"]?([^\]'"]+?)['"]?\s*\]\}"#).unwrap();
}

/// Replace every `{doc[key]}` with the document's field; missing fields
/// become empty. The key may be quoted: `{doc['title']}`.
pub fn render(template: &str, doc: &Document) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            doc.get(&caps[1]).unwrap_or_default()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Document {
        Document::from_value(json!({
            "title": "Computing Machinery and Intelligence",
            "author": "Turing, Alan",
            "year": 1950,
            "doi": "10.1093/mind/LIX.236.433",
        }))
        .unwrap()
    }

    #[test]
    fn test_render_fields() {
        assert_eq!(
            render("{doc[title]} - {doc[author]} ({doc[year]})", &doc()),
            "Computing Machinery and Intelligence - Turing, Alan (1950)"
        );
    }

    #[test]
    fn test_render_quoted_keys_and_missing_fields() {
        assert_eq!(
            render("scihub {doc['doi']} {doc[\"journal\"]}!", &doc()),
            "scihub 10.1093/mind/LIX.236.433 !"
        );
    }

    #[test]
    fn test_render_leaves_other_braces() {
        assert_eq!(render("echo {} {doc[year]}", &doc()), "echo {} 1950");
    }
}
