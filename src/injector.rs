use std::{fmt, fs, io, path::Path, str::FromStr};

use indexmap::IndexMap;

use crate::{
    anchor::{self, Anchor, Region},
    config::{AnchorStyle, Config},
    utils::sanitise_attribute,
    Error, ValidationError,
};

/// Replaces the content between anchor sentinels in an existing document.
///
/// Anchors are discovered and validated once, at construction: every anchor name must
/// appear on exactly one opening and one closing sentinel, no two names may normalise
/// to the same key, and no two regions may overlap. Regions are then looked up by name
/// or by their [`sanitise_attribute`] key, and are re-located on every access so edits
/// to one region never invalidate another.
///
/// ```rust
/// # use markdown_toolkit::MarkdownInjector;
/// let source = "\
/// Intro
/// <!--- markdown-toolkit:Dynamic-Block --->
/// stale
/// <!--- markdown-toolkit:Dynamic-Block --->
/// ";
/// let mut injector = MarkdownInjector::new(source)?;
/// injector.set_value("dynamic_block", "fresh\ncontent")?;
/// assert_eq!(injector.value("Dynamic-Block")?, "fresh\ncontent");
/// assert_eq!(
///     injector.render_with_trailing_newline(),
///     "Intro\n<!--- markdown-toolkit:Dynamic-Block --->\nfresh\ncontent\n<!--- markdown-toolkit:Dynamic-Block --->\n"
/// );
/// # Ok::<(), markdown_toolkit::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct MarkdownInjector {
    lines: Vec<String>,
    anchors: IndexMap<String, Anchor>,
    style: AnchorStyle,
    trailing_newline: bool,
}

impl MarkdownInjector {
    /// Parse `source` using [`AnchorStyle::Paired`] sentinels.
    pub fn new(source: &str) -> Result<Self, Error> {
        Self::with_style(source, AnchorStyle::default())
    }

    /// Parse `source` using the anchor style of `config`.
    pub fn with_config(source: &str, config: &Config) -> Result<Self, Error> {
        Self::with_style(source, config.anchor_style)
    }

    /// Parse `source` using the given sentinel convention.
    pub fn with_style(source: &str, style: AnchorStyle) -> Result<Self, Error> {
        let lines = source.lines().map(str::to_string).collect::<Vec<_>>();
        let anchors = anchor::locate_all(&lines, style)?
            .into_iter()
            .map(|(key, (anchor, _))| (key, anchor))
            .collect::<IndexMap<_, _>>();
        tracing::debug!(lines = lines.len(), anchors = anchors.len(), ?style, "parsed document");
        Ok(Self {
            lines,
            anchors,
            style,
            trailing_newline: source.ends_with('\n'),
        })
    }

    /// Read and parse a whole stream.
    pub fn from_reader<R: io::Read>(mut reader: R, style: AnchorStyle) -> Result<Self, Error> {
        let mut source = String::new();
        reader.read_to_string(&mut source)?;
        Self::with_style(&source, style)
    }

    /// Read and parse a file.
    pub fn from_path<P: AsRef<Path>>(path: P, style: AnchorStyle) -> Result<Self, Error> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
        Self::with_style(&source, style)
    }

    /// The sentinel convention this document was parsed with.
    pub fn style(&self) -> AnchorStyle {
        self.style
    }

    /// The current lines of the document.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Every anchor, in the order its opening sentinel appears.
    pub fn anchors(&self) -> impl Iterator<Item = &Anchor> + '_ {
        self.anchors.values()
    }

    /// Whether `name` resolves to an anchor.
    pub fn contains(&self, name: &str) -> bool {
        self.anchors.contains_key(&sanitise_attribute(name))
    }

    /// Look up an anchor by its written name or its key.
    pub fn anchor(&self, name: &str) -> Result<&Anchor, Error> {
        self.anchors
            .get(&sanitise_attribute(name))
            .ok_or_else(|| ValidationError::UnknownAnchor(name.to_string()).into())
    }

    /// Locate the anchor's sentinels in the current text.
    pub fn region(&self, name: &str) -> Result<Region, Error> {
        let found = self.anchor(name)?;
        Ok(anchor::locate(&self.lines, self.style, found.name())?)
    }

    /// The lines between the anchor's sentinels joined with `\n`, exactly as they
    /// appear in the document.
    pub fn value(&self, name: &str) -> Result<String, Error> {
        let region = self.region(name)?;
        Ok(self.lines[region.interior()].join("\n"))
    }

    /// Replace everything between the anchor's sentinels with `text`.
    ///
    /// Each non-empty line of `text` is indented like the opening sentinel, so content
    /// injected into a list item stays inside it. Empty text leaves the region empty.
    /// Text containing a sentinel line of this document's style is rejected with
    /// [`ValidationError::SentinelInContent`] and the document is left unchanged.
    pub fn set_value(&mut self, name: &str, text: &str) -> Result<&mut Self, Error> {
        let written = self.anchor(name)?.name().to_string();
        if let Some(line) = text
            .lines()
            .position(|line| self.style.parse_sentinel(line).is_some())
        {
            return Err(ValidationError::SentinelInContent {
                anchor: written,
                line: line + 1,
            }
            .into());
        }

        let region = anchor::locate(&self.lines, self.style, &written)?;
        let replacement = text.lines().map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{line}", region.indent)
            }
        });

        let tail = self.lines.split_off(region.end);
        let removed = self.lines.len() - (region.start + 1);
        self.lines.truncate(region.start + 1);
        self.lines.extend(replacement);
        let inserted = self.lines.len() - (region.start + 1);
        self.lines.extend(tail);
        tracing::debug!(anchor = written.as_str(), removed, inserted, "injected");
        Ok(self)
    }

    /// Empty the anchor's region, keeping its sentinels.
    pub fn clear(&mut self, name: &str) -> Result<&mut Self, Error> {
        self.set_value(name, "")
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

    /// The rendered document, ending with `\n` only if the parsed source did.
    pub fn output(&self) -> String {
        if self.trailing_newline {
            self.render_with_trailing_newline()
        } else {
            self.render()
        }
    }

    /// Write [`output`](Self::output) to an open stream.
    pub fn write<W: io::Write>(&self, mut writer: W) -> Result<(), Error> {
        writer.write_all(self.output().as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Create or truncate `path` and write [`output`](Self::output) to it.
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "writing injected document");
        fs::write(path, self.output()).map_err(|err| Error::io(path, err))
    }
}

impl FromStr for MarkdownInjector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for MarkdownInjector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
