use std::borrow::Cow;

use crate::inline::LIST_MARKER_WIDTH;

/// Document and injector settings.
#[derive(Clone, Debug)]
pub struct Config {
    /// Depth the document starts at. The first heading opened without an explicit
    /// level renders at `heading_level + 1`.
    pub heading_level: usize,
    /// One unit of list indentation.
    pub indentation: Cow<'static, str>,
    /// Column width list markers are padded to.
    pub marker_width: usize,
    /// When set, [`paragraph`](crate::MarkdownDocument::paragraph) re-wraps its text
    /// to this width, less the current indentation.
    pub max_width: Option<usize>,
    /// Sentinel comment convention for anchors.
    pub anchor_style: AnchorStyle,
    /// Whether [`write`](crate::MarkdownDocument::write) ends the output with `\n`.
    pub trailing_newline: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            heading_level: 0,
            indentation: "    ".into(),
            marker_width: LIST_MARKER_WIDTH,
            max_width: None,
            anchor_style: AnchorStyle::default(),
            trailing_newline: false,
        }
    }
}

impl Config {
    /// Settings for a document that will be written to disk as a README: headings
    /// start at `#`, output ends with a newline and anchors use explicit start and
    /// end sentinels.
    pub fn readme() -> Self {
        Self {
            anchor_style: AnchorStyle::StartEnd,
            trailing_newline: true,
            ..Self::default()
        }
    }

    /// Paragraph wrapping width.
    pub fn max_width(&self) -> Option<usize> {
        self.max_width
    }

    /// Set the paragraph wrapping width.
    pub fn set_max_width(&mut self, value: Option<usize>) -> &mut Self {
        self.max_width = value;
        self
    }

    /// Set the base heading depth.
    pub fn set_heading_level(&mut self, value: usize) -> &mut Self {
        self.heading_level = value;
        self
    }

    /// Set the anchor sentinel convention.
    pub fn set_anchor_style(&mut self, value: AnchorStyle) -> &mut Self {
        self.anchor_style = value;
        self
    }

    /// Set whether written output ends with a newline.
    pub fn set_trailing_newline(&mut self, value: bool) -> &mut Self {
        self.trailing_newline = value;
        self
    }

    /// Internal setter for config options. Used for testing
    #[cfg(test)]
    pub(crate) fn set(&mut self, field: &str, value: &str) {
        match field {
            "max_width" => self.max_width = Some(value.parse().unwrap()),
            "heading_level" => self.heading_level = value.parse().unwrap(),
            "marker_width" => self.marker_width = value.parse().unwrap(),
            "trailing_newline" => self.trailing_newline = value.parse().unwrap(),
            "anchor_style" => {
                self.anchor_style = match value {
                    "paired" => AnchorStyle::Paired,
                    "start_end" => AnchorStyle::StartEnd,
                    _ => panic!("unknown anchor style {value}"),
                }
            }
            _ => panic!("unknown configuration {field}"),
        }
    }
}

/// How anchor sentinels are written.
///
/// The two conventions are not interchangeable within one document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnchorStyle {
    /// `<!--- markdown-toolkit:{anchor} --->` twice; the first occurrence opens.
    #[default]
    Paired,
    /// `<!--- markdown-toolkit:start:{anchor} --->` then
    /// `<!--- markdown-toolkit:end:{anchor} --->`.
    StartEnd,
}
