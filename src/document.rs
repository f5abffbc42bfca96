use std::{fmt, fs, io, path::Path};

use itertools::Itertools;
use textwrap::Options as TextWrapOptions;

use crate::{
    config::Config,
    inline::header,
    list::ListMarker,
    scope::{Exit, Scope},
    table::{Table, TableScope},
    utils::clean_doc,
    Error,
};

const CODE_FENCE: &str = "```";
const HORIZONTAL_LINE: &str = "----";

/// An append-only Markdown document.
///
/// Lines are written in call order. Headings, lists and the other block constructs
/// return a [`Scope`] guard: while the guard lives the document's heading or indent
/// level is shifted, and dropping the guard restores it. Because the guard derefs to
/// the document, nested content is written through it.
///
/// ```rust
/// # use markdown_toolkit::MarkdownDocument;
/// let mut doc = MarkdownDocument::default();
/// {
///     let mut title = doc.heading("Title");
///     title.paragraph("Some text.");
///     let mut item = title.list("One");
///     item.list("Child");
/// }
/// doc.list("Two");
///
/// assert_eq!(
///     doc.render(),
///     "# Title\n\nSome text.\n\n*   One\n    *   Child\n*   Two"
/// );
/// ```
#[derive(Clone, Debug, Default)]
pub struct MarkdownDocument {
    lines: Vec<String>,
    /// Depth of the innermost open heading.
    pub(crate) heading_level: usize,
    /// Number of open list items and indent blocks.
    pub(crate) indent_level: usize,
    /// Number of open list items.
    pub(crate) list_level: usize,
    config: Config,
}

impl MarkdownDocument {
    /// An empty document with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty document with custom [`Config`].
    ///
    /// ```rust
    /// # use markdown_toolkit::{Config, MarkdownDocument};
    /// let mut doc = MarkdownDocument::with_config(Config {
    ///     heading_level: 1,
    ///     ..Default::default()
    /// });
    /// doc.heading("Section");
    /// assert_eq!(doc.render(), "## Section\n");
    /// ```
    pub fn with_config(config: Config) -> Self {
        Self {
            heading_level: config.heading_level,
            config,
            ..Default::default()
        }
    }

    /// The document's settings.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Depth of the innermost open heading; the next heading renders one deeper.
    pub fn heading_level(&self) -> usize {
        self.heading_level
    }

    /// Number of open list items and indent blocks. `0` means no indentation.
    pub fn indent_level(&self) -> usize {
        self.indent_level
    }

    /// Number of open list items.
    pub fn list_level(&self) -> usize {
        self.list_level
    }

    /// Lines written so far.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn indent(&self) -> String {
        self.config.indentation.repeat(self.indent_level)
    }

    fn push(&mut self, line: String) {
        tracing::trace!(line = line.as_str(), "push");
        self.lines.push(line);
    }

    /// Append one line, indented to the current list depth.
    pub fn text(&mut self, text: &str) -> &mut Self {
        let line = format!("{}{text}", self.indent());
        self.push(line);
        self
    }

    /// Append one line exactly as given.
    pub fn add(&mut self, text: &str) -> &mut Self {
        self.push(text.to_string());
        self
    }

    /// Append an empty line.
    pub fn linebreak(&mut self) -> &mut Self {
        self.push(String::new());
        self
    }

    /// Append a paragraph followed by one empty line.
    ///
    /// See [`paragraph_with_linebreaks`](Self::paragraph_with_linebreaks).
    pub fn paragraph(&mut self, text: &str) -> &mut Self {
        self.paragraph_with_linebreaks(text, 1)
    }

    /// Append multi-line text followed by `linebreaks` empty lines.
    ///
    /// The text is cleaned with [`clean_doc`] and every line is written with
    /// [`text`](Self::text). When [`Config::max_width`] is set the text is re-wrapped
    /// to fit beside the current indentation.
    pub fn paragraph_with_linebreaks(&mut self, text: &str, linebreaks: usize) -> &mut Self {
        let mut cleaned = clean_doc(text);
        if let Some(max_width) = self.config.max_width {
            let width = max_width.saturating_sub(self.indent().len()).max(1);
            cleaned = wrap_paragraph(&cleaned, width);
        }
        self.block(&cleaned, linebreaks)
    }

    /// Write every line of `block` with [`text`](Self::text), then `linebreaks` empty
    /// lines.
    pub(crate) fn block(&mut self, block: &str, linebreaks: usize) -> &mut Self {
        for line in block.split('\n') {
            self.text(line);
        }
        for _ in 0..linebreaks {
            self.linebreak();
        }
        self
    }

    /// Append a thematic break surrounded by empty lines.
    pub fn horizontal_line(&mut self) -> &mut Self {
        self.linebreak().text(HORIZONTAL_LINE).linebreak()
    }

    fn open_heading(&mut self, text: Option<&str>, level: Option<usize>) -> Scope<'_> {
        let previous = self.heading_level;
        let level = level.unwrap_or(previous + 1);
        if let Some(text) = text {
            if !(1..=6).contains(&level) {
                tracing::warn!(level, text, "heading level outside of 1-6");
            }
            self.push(header(text, level));
            self.linebreak();
        }
        self.heading_level = level;
        tracing::debug!(previous, level, silent = text.is_none(), "enter heading");
        Scope::new(self, Exit::Heading { previous })
    }

    /// Write a heading one level below the current one, followed by an empty line.
    ///
    /// Headings opened while the returned guard lives are nested below it.
    pub fn heading(&mut self, text: &str) -> Scope<'_> {
        self.open_heading(Some(text), None)
    }

    /// Write a heading at an explicit `level`.
    ///
    /// Headings nested in the returned guard continue from `level`. Once the guard is
    /// dropped the previous level is restored, so later siblings are unaffected by the
    /// override.
    ///
    /// ```rust
    /// # use markdown_toolkit::MarkdownDocument;
    /// let mut doc = MarkdownDocument::default();
    /// {
    ///     let mut customers = doc.heading_at("Customers", 3);
    ///     customers.heading("Active");
    /// }
    /// doc.heading("Next");
    /// assert_eq!(doc.render(), "### Customers\n\n#### Active\n\n# Next\n");
    /// ```
    pub fn heading_at(&mut self, text: &str, level: usize) -> Scope<'_> {
        self.open_heading(Some(text), Some(level))
    }

    /// Nest one heading level deeper without writing anything.
    pub fn silent_heading(&mut self) -> Scope<'_> {
        self.open_heading(None, None)
    }

    /// Continue nesting from `level` without writing anything.
    pub fn silent_heading_at(&mut self, level: usize) -> Scope<'_> {
        self.open_heading(None, Some(level))
    }

    /// Write an unordered (`*`) list item.
    ///
    /// Content written while the returned guard lives is indented beneath the item.
    pub fn list(&mut self, item: &str) -> Scope<'_> {
        self.list_with_marker(item, ListMarker::default())
    }

    /// Write an ordered (`1.`) list item.
    pub fn ordered_list(&mut self, item: &str) -> Scope<'_> {
        self.list_with_marker(item, ListMarker::ordered())
    }

    /// Write a list item behind any [`ListMarker`], e.g. `"-"` or `"- [ ]"`.
    pub fn list_with_marker(&mut self, item: &str, marker: impl Into<ListMarker>) -> Scope<'_> {
        let line = marker.into().render_item(item, self.config.marker_width);
        self.text(&line);
        let exit = Exit::List {
            indent: self.indent_level,
            list: self.list_level,
        };
        self.indent_level += 1;
        self.list_level += 1;
        tracing::debug!(indent_level = self.indent_level, "enter list");
        Scope::new(self, exit)
    }

    /// Indent content by one level without opening a list item.
    pub fn indentblock(&mut self) -> Scope<'_> {
        let previous = self.indent_level;
        self.indent_level += 1;
        Scope::new(self, Exit::Indent { previous })
    }

    /// Open a fenced code block tagged with `language`, which may be empty.
    pub fn codeblock(&mut self, language: &str) -> Scope<'_> {
        self.text(&format!("{CODE_FENCE}{language}"));
        Scope::new(self, Exit::CodeBlock)
    }

    /// Wrap content in a `<details>` disclosure block with the given summary.
    pub fn collapsed(&mut self, summary: &str) -> Scope<'_> {
        self.text("<details>")
            .text(&format!("<summary>{summary}</summary>"))
            .linebreak();
        Scope::new(self, Exit::Collapsed)
    }

    /// Surround content with the start and end sentinels of `anchor`, so the document
    /// can later be updated by a [`MarkdownInjector`](crate::MarkdownInjector).
    pub fn injector(&mut self, anchor: &str) -> Scope<'_> {
        let style = self.config.anchor_style;
        self.text(&style.start_sentinel(anchor));
        Scope::new(
            self,
            Exit::Injector {
                end_sentinel: style.end_sentinel(anchor),
            },
        )
    }

    pub(crate) fn close(&mut self, exit: &Exit) {
        tracing::debug!(?exit, "exit scope");
        match exit {
            Exit::Heading { previous } => self.heading_level = *previous,
            Exit::List { indent, list } => {
                self.indent_level = *indent;
                self.list_level = *list;
            }
            Exit::Indent { previous } => self.indent_level = *previous,
            Exit::CodeBlock => {
                self.text(CODE_FENCE);
            }
            Exit::Collapsed => {
                self.linebreak().text("</details>").linebreak();
            }
            Exit::Injector { end_sentinel } => {
                self.text(end_sentinel);
            }
        }
    }

    /// Start a table with the given column titles, optionally sorted by one of them.
    ///
    /// Rows are added through the returned guard and the table is written, followed by
    /// an empty line, when the guard is dropped.
    ///
    /// ```rust
    /// # use markdown_toolkit::MarkdownDocument;
    /// let mut doc = MarkdownDocument::default();
    /// {
    ///     let mut table = doc.table(["Apple Type", "Grown Count"], Some("Grown Count"))?;
    ///     table.add_row([("apple_type", "Granny Smith"), ("grown_count", "3")])?;
    ///     table.add_row([("apple_type", "Golden Delicious"), ("grown_count", "2")])?;
    /// }
    /// assert_eq!(
    ///     doc.render(),
    ///     "| Apple Type | Grown Count |\n\
    ///      | --- | --- |\n\
    ///      | Golden Delicious | 2 |\n\
    ///      | Granny Smith | 3 |\n"
    /// );
    /// # Ok::<(), markdown_toolkit::Error>(())
    /// ```
    pub fn table<I, S>(&mut self, titles: I, sort_by: Option<&str>) -> Result<TableScope<'_>, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Table::new(titles)?;
        if let Some(column) = sort_by {
            table.sort_by(column)?;
        }
        Ok(TableScope::new(self, table))
    }

    /// Write a table built from uniform rows in one go.
    ///
    /// The titles are every key seen across the rows, in first-seen order. Rows
    /// missing a key get an empty cell. Nothing is written when `rows` is empty.
    pub fn table_from_rows<R, C, K, V>(&mut self, rows: R, sort_by: Option<&str>) -> Result<&mut Self, Error>
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        let mut table = Table::from_rows(rows)?;
        if table.titles().is_empty() {
            tracing::debug!("no rows, skipping table");
            return Ok(self);
        }
        if let Some(column) = sort_by {
            table.sort_by(column)?;
        }
        Ok(self.insert_table(&table))
    }

    /// Write a finished [`Table`] followed by an empty line.
    pub fn insert_table(&mut self, table: &Table) -> &mut Self {
        let rendered = table.render();
        self.block(&rendered, 1)
    }

    /// Join every line with `\n`.
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }

    /// [`render`](Self::render) followed by a final `\n`.
    pub fn render_with_trailing_newline(&self) -> String {
        let mut output = self.render();
        output.push('\n');
        output
    }

    fn output(&self) -> String {
        if self.config.trailing_newline {
            self.render_with_trailing_newline()
        } else {
            self.render()
        }
    }

    /// Write the rendered document to an open stream.
    ///
    /// Ends with `\n` when [`Config::trailing_newline`] is set.
    pub fn write<W: io::Write>(&self, mut writer: W) -> Result<(), Error> {
        writer.write_all(self.output().as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Create or truncate `path` and write the rendered document to it.
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), lines = self.lines.len(), "writing document");
        fs::write(path, self.output()).map_err(|err| Error::io(path, err))
    }
}

impl fmt::Display for MarkdownDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Reflow `text` to `width` columns when any line is too long.
///
/// Blocks separated by an empty line are wrapped independently.
fn wrap_paragraph(text: &str, width: usize) -> String {
    let fits = text
        .lines()
        .all(|l| textwrap::core::display_width(l) <= width);
    if fits {
        return text.to_string();
    }

    let wrap_options = TextWrapOptions::new(width)
        .break_words(false)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
        .wrap_algorithm(textwrap::WrapAlgorithm::FirstFit);

    text.split("\n\n")
        .map(|block| {
            let joined = block.lines().map(str::trim).join(" ");
            textwrap::fill(&joined, wrap_options.clone())
        })
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn linebreak() {
        let mut doc = MarkdownDocument::new();
        doc.add("test").linebreak().add("linebreak");
        assert_eq!(doc.render(), "test\n\nlinebreak");
    }

    #[test]
    fn text_lines() {
        let mut doc = MarkdownDocument::new();
        doc.text("Example line of text.")
            .text("Without padding between lines.")
            .text("Just newline breaks.");
        assert_eq!(
            doc.render(),
            "Example line of text.\nWithout padding between lines.\nJust newline breaks."
        );
    }

    #[test]
    fn horizontal_line() {
        let mut doc = MarkdownDocument::new();
        doc.text("First Section");
        doc.horizontal_line();
        doc.text("New Section");
        assert_eq!(doc.render(), "First Section\n\n----\n\nNew Section");
    }

    #[test]
    fn paragraphs() {
        let mut doc = MarkdownDocument::new();
        doc.paragraph("Lorem ipsum dolor sit amet.");
        doc.paragraph(
            "
            Interdum et malesuada fames
            ac ante ipsum primis in faucibus.
            ",
        );
        doc.add("EOF");
        assert_eq!(
            doc.render(),
            "Lorem ipsum dolor sit amet.\n\nInterdum et malesuada fames\nac ante ipsum primis in faucibus.\n\nEOF"
        );
    }

    #[test]
    fn paragraph_linebreak_count() {
        let mut doc = MarkdownDocument::new();
        doc.paragraph_with_linebreaks("no gap", 0);
        doc.paragraph_with_linebreaks("two gaps", 2);
        doc.add("EOF");
        assert_eq!(doc.render(), "no gap\ntwo gaps\n\n\nEOF");
    }

    #[test]
    fn paragraph_wraps_to_max_width() {
        let mut doc = MarkdownDocument::with_config(Config {
            max_width: Some(20),
            ..Default::default()
        });
        doc.paragraph("The quick brown fox jumps over the lazy dog");
        {
            let mut item = doc.list("Item");
            item.paragraph("The quick brown fox jumps over");
        }
        assert_eq!(
            doc.render(),
            "The quick brown fox\njumps over the lazy\ndog\n\n*   Item\n    The quick brown\n    fox jumps over\n"
        );
    }

    #[test]
    fn paragraph_within_width_is_untouched() {
        let mut doc = MarkdownDocument::with_config(Config {
            max_width: Some(80),
            ..Default::default()
        });
        doc.paragraph_with_linebreaks("short\nlines\nstay", 0);
        assert_eq!(doc.render(), "short\nlines\nstay");
    }

    #[test]
    fn render_is_idempotent() {
        let mut doc = MarkdownDocument::new();
        doc.heading("Title");
        doc.list("One");
        let first = doc.render();
        assert_eq!(first, doc.render());
        assert_eq!(doc.to_string(), first);
    }

    #[test]
    fn trailing_newline() {
        let mut doc = MarkdownDocument::new();
        doc.text("a").text("b");
        assert_eq!(doc.render_with_trailing_newline(), format!("{}\n", doc.render()));

        let empty = MarkdownDocument::new();
        assert_eq!(empty.render(), "");
        assert_eq!(empty.render_with_trailing_newline(), "\n");
    }

    #[test]
    fn write_to_stream_honours_config() {
        let mut doc = MarkdownDocument::new();
        doc.text("body");
        let mut out = Vec::new();
        doc.write(&mut out).unwrap();
        assert_eq!(out, b"body");

        let mut doc = MarkdownDocument::with_config(Config::readme());
        doc.text("body");
        let mut out = Vec::new();
        doc.write(&mut out).unwrap();
        assert_eq!(out, b"body\n");
    }

    #[test]
    fn write_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("README.md");
        let mut doc = MarkdownDocument::new();
        doc.heading("Title");
        doc.write_file(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "# Title\n");
    }

    #[test]
    fn write_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("README.md");
        let err = MarkdownDocument::new().write_file(&path).unwrap_err();
        assert!(matches!(err, Error::Io { path: Some(ref p), .. } if *p == path));
    }
}
