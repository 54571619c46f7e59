//! storage::codec
//!
//! The plain-text field codec.
//!
//! # Format
//!
//! Fields are stored as `Key: value` blocks separated by a `----` divider
//! line surrounded by blank lines:
//!
//! ```text
//! Title: Home
//!
//! ----
//!
//! Text: First paragraph
//! Second paragraph
//! ```
//!
//! Keys are written with an upper-cased first letter and lower-cased on
//! read. Null values are skipped at write time; a read therefore never
//! yields nulls. Value lines that would be mistaken for the divider are
//! escaped with a leading backslash.
//!
//! Values round-trip exactly when they carry no leading or trailing
//! whitespace; decoding trims each value, matching how the files are
//! edited by hand.
//!
//! Decoding is permissive: blocks without a `:` separator or with a
//! multi-line key part are ignored.

use crate::fields::Fields;

/// Serialize a field map to the plain-text format.
///
/// Null values are skipped; the on-disk file only ever contains stored
/// values.
pub fn encode(fields: &Fields) -> String {
    let blocks: Vec<String> = fields
        .iter()
        .filter_map(|(key, value)| value.map(|v| format!("{}: {}", ucfirst(key), escape(v))))
        .collect();

    let mut text = blocks.join("\n\n----\n\n");
    if !text.is_empty() {
        text.push('\n');
    }
    text
}

/// Parse a field map from the plain-text format.
///
/// All parsed values are non-null; keys are lower-cased by the field map.
pub fn decode(text: &str) -> Fields {
    let mut fields = Fields::new();

    for block in split_blocks(text) {
        let Some((key, value)) = block.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() || key.contains('\n') {
            continue;
        }
        fields.insert(key, Some(unescape(value.trim())));
    }

    fields
}

/// Split the file into blocks at divider lines.
fn split_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for line in text.lines() {
        if line.trim_end() == "----" {
            blocks.push(current.join("\n"));
            current = Vec::new();
        } else {
            current.push(line);
        }
    }
    blocks.push(current.join("\n"));

    blocks
        .into_iter()
        .map(|b| b.trim().to_string())
        .filter(|b| !b.is_empty())
        .collect()
}

/// Upper-case the first character of a key for display.
fn ucfirst(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Check whether a line would read as the divider once unescaped.
fn divider_like(line: &str) -> bool {
    line.trim_start_matches('\\').trim_end() == "----"
}

/// Escape value lines that would be mistaken for the divider.
fn escape(value: &str) -> String {
    if !value.lines().any(divider_like) {
        return value.to_string();
    }

    value
        .lines()
        .map(|line| {
            if divider_like(line) {
                format!("\\{line}")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Undo [`escape`].
fn unescape(value: &str) -> String {
    if !value.lines().any(|l| l.starts_with('\\') && divider_like(l)) {
        return value.to_string();
    }

    value
        .lines()
        .map(|line| {
            if line.starts_with('\\') && divider_like(line) {
                line[1..].to_string()
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> Fields {
        pairs.iter().copied().collect()
    }

    #[test]
    fn encode_simple_fields() {
        let encoded = encode(&fields(&[("title", "Home"), ("text", "Hello")]));
        assert_eq!(encoded, "Title: Home\n\n----\n\nText: Hello\n");
    }

    #[test]
    fn encode_skips_nulls() {
        let mut f = fields(&[("title", "Home")]);
        f.insert("uuid", None);

        let encoded = encode(&f);
        assert!(!encoded.contains("Uuid"));
        assert_eq!(decode(&encoded).len(), 1);
    }

    #[test]
    fn encode_empty_map_is_empty_file() {
        assert_eq!(encode(&Fields::new()), "");
        assert!(decode("").is_empty());
    }

    #[test]
    fn decode_lowercases_keys() {
        let decoded = decode("Title: Home\n");
        assert_eq!(decoded.value("title"), Some("Home"));
    }

    #[test]
    fn roundtrip_multiline_value() {
        let f = fields(&[("text", "First paragraph\n\nSecond paragraph"), ("title", "Home")]);
        let decoded = decode(&encode(&f));

        assert_eq!(decoded.value("text"), Some("First paragraph\n\nSecond paragraph"));
        assert_eq!(decoded.value("title"), Some("Home"));
    }

    #[test]
    fn roundtrip_divider_lines_in_values() {
        let f = fields(&[("text", "before\n----\nafter"), ("title", "Home")]);
        let encoded = encode(&f);
        assert!(encoded.contains("\\----"));

        let decoded = decode(&encoded);
        assert_eq!(decoded.value("text"), Some("before\n----\nafter"));
        assert_eq!(decoded.value("title"), Some("Home"));
    }

    #[test]
    fn roundtrip_already_escaped_divider() {
        let f = fields(&[("text", "\\----")]);
        let decoded = decode(&encode(&f));
        assert_eq!(decoded.value("text"), Some("\\----"));
    }

    #[test]
    fn decode_ignores_malformed_blocks() {
        let decoded = decode("no separator here\n\n----\n\nTitle: Home\n");
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded.value("title"), Some("Home"));
    }

    #[test]
    fn decode_empty_value() {
        let decoded = decode("Subtitle:\n\n----\n\nTitle: Home\n");
        assert_eq!(decoded.get("subtitle"), Some(Some("")));
    }

    #[test]
    fn decode_trims_values() {
        let decoded = decode("Title:   Home  \n");
        assert_eq!(decoded.value("title"), Some("Home"));
    }

    #[test]
    fn last_write_wins_for_duplicate_keys() {
        let decoded = decode("Title: One\n\n----\n\nTitle: Two\n");
        assert_eq!(decoded.value("title"), Some("Two"));
        assert_eq!(decoded.len(), 1);
    }
}
