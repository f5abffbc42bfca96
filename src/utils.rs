use std::{fs, path::Path, sync::LazyLock};

use itertools::Itertools;
use regex::Regex;

use crate::Error;

static UPPERCASE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new("([A-Z]+)").unwrap());
static CAPITALISED_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("([A-Z][a-z]+)").unwrap());

/// Normalise multi-line source text the way a docstring is cleaned.
///
/// Leading whitespace is stripped from the first line, the indentation common to the
/// remaining lines is removed, and blank lines are trimmed from both ends. This lets
/// callers write indented raw string literals without the indentation leaking into the
/// document.
///
/// ```rust
/// # use markdown_toolkit::clean_doc;
/// let text = "
///     First line
///       nested
///     Last line
/// ";
/// assert_eq!(clean_doc(text), "First line\n  nested\nLast line");
/// ```
pub fn clean_doc(text: &str) -> String {
    let mut lines = text.lines();
    let first = lines.next().unwrap_or_default().trim_start();
    let rest = textwrap::dedent(&lines.join("\n"));

    let cleaned = std::iter::once(first)
        .chain(rest.lines())
        .collect::<Vec<_>>();
    let is_blank = |line: &&str| line.trim().is_empty();
    let Some(start) = cleaned.iter().position(|l| !is_blank(l)) else {
        return String::new();
    };
    let end = cleaned.iter().rposition(|l| !is_blank(l)).unwrap_or(start);
    cleaned[start..=end].join("\n")
}

/// Convert an arbitrary label into a lower-case, underscore separated key.
///
/// Camel case humps and runs of capitals start a new word, and every run of
/// non-alphanumeric characters collapses into a single `_`. Table columns and anchor
/// names are looked up by this key.
///
/// ```rust
/// # use markdown_toolkit::sanitise_attribute;
/// assert_eq!(sanitise_attribute("Apple Type"), "apple_type");
/// assert_eq!(sanitise_attribute("Dynamic-Block"), "dynamic_block");
/// assert_eq!(sanitise_attribute("HTTPServer.port"), "http_server_port");
/// ```
pub fn sanitise_attribute(name: &str) -> String {
    let spaced = UPPERCASE_RUN.replace_all(name, " ${1}");
    let spaced = CAPITALISED_WORD.replace_all(&spaced, " ${1}");
    spaced
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .join("_")
        .to_lowercase()
}

/// Read lines `start..=end` (1-based) of a file, keeping their line endings.
///
/// `end` of `None` reads to the end of the file. Used to pull source fragments into
/// code blocks.
pub fn from_file<P: AsRef<Path>>(path: P, start: usize, end: Option<usize>) -> Result<String, Error> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
    let skip = start.saturating_sub(1);
    let take = end.map_or(usize::MAX, |end| end.saturating_sub(skip));
    tracing::trace!(path = %path.display(), skip, take, "from_file");
    Ok(contents
        .split_inclusive('\n')
        .skip(skip)
        .take(take)
        .collect())
}
