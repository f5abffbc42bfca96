//! Stateless inline Markdown helpers.
//!
//! None of these validate Markdown; they only wrap strings.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::list::ListMarker;
use crate::utils::clean_doc;

/// Characters left unescaped in badge query values: `A-Z a-z 0-9 _ . - ~ /`.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

const SHIELDS_IO: &str = "https://shields.io/";
const SHIELDS_IO_STATIC: &str = "https://img.shields.io/static/v1";

/// Column width list markers are padded to.
pub const LIST_MARKER_WIDTH: usize = 4;

/// `**text**`
pub fn bold(text: &str) -> String {
    format!("**{text}**")
}

/// `_text_`
pub fn italic(text: &str) -> String {
    format!("_{text}_")
}

/// `~~text~~`
pub fn strikethrough(text: &str) -> String {
    format!("~~{text}~~")
}

/// `` `text` ``
pub fn code(text: &str) -> String {
    format!("`{text}`")
}

/// An ATX heading. `level` is not range checked.
pub fn header(text: &str, level: usize) -> String {
    format!("{} {text}", "#".repeat(level))
}

/// `[text](uri "title")`.
///
/// The link text falls back to the URI when `text` is missing or empty.
///
/// ```rust
/// # use markdown_toolkit::link;
/// assert_eq!(link("https://example.com", None, None), "[https://example.com](https://example.com)");
/// assert_eq!(link("https://example.com", Some("abc"), Some("def")), r#"[abc](https://example.com "def")"#);
/// ```
pub fn link(uri: &str, text: Option<&str>, title: Option<&str>) -> String {
    let text = text.filter(|t| !t.is_empty()).unwrap_or(uri);
    match title.filter(|t| !t.is_empty()) {
        Some(title) => format!(r#"[{text}]({uri} "{title}")"#),
        None => format!("[{text}]({uri})"),
    }
}

/// A [`link`] prefixed with `!`.
pub fn image(uri: &str, text: Option<&str>, title: Option<&str>) -> String {
    format!("!{}", link(uri, text, title))
}

/// Block quote `text`.
///
/// The text is cleaned with [`clean_doc`]. Only the first line is prefixed with `> `
/// unless `quote_all_lines` is set; the remaining lines then rely on Markdown's lazy
/// continuation.
pub fn quote(text: &str, quote_all_lines: bool) -> String {
    clean_doc(text)
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            if i == 0 || quote_all_lines {
                format!("> {line}")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// A [shields.io](https://shields.io/) static badge linking back to shields.io.
///
/// `label`, `color` and `message` are percent-encoded into the badge URL. An empty
/// `alt` makes the image text fall back to the badge URL.
pub fn badge(label: &str, color: &str, message: Option<&str>, alt: &str) -> String {
    let mut badge_url = format!(
        "{SHIELDS_IO_STATIC}?label={}&color={}",
        utf8_percent_encode(label, QUERY_VALUE),
        utf8_percent_encode(color, QUERY_VALUE),
    );
    if let Some(message) = message.filter(|m| !m.is_empty()) {
        badge_url.push_str("&message=");
        badge_url.extend(utf8_percent_encode(message, QUERY_VALUE));
    }
    link(SHIELDS_IO, Some(&image(&badge_url, Some(alt), None)), None)
}

/// A single list item line: the marker padded to four columns, then the cleaned text.
///
/// `prefix` overrides the default `*` / `1.` marker.
///
/// ```rust
/// # use markdown_toolkit::list_item;
/// assert_eq!(list_item("One", false, None), "*   One");
/// assert_eq!(list_item("One", true, None), "1.  One");
/// assert_eq!(list_item("One", false, Some("-")), "-   One");
/// ```
pub fn list_item(item: &str, ordered: bool, prefix: Option<&str>) -> String {
    let marker = match prefix {
        Some(prefix) if !prefix.is_empty() => ListMarker::from(prefix),
        _ => ListMarker::new(ordered),
    };
    marker.render_item(item, LIST_MARKER_WIDTH)
}
