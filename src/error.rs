use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised by the document builder and the anchor injector.
#[derive(Debug, Error)]
pub enum Error {
    /// The input or the caller broke one of the builder's or injector's rules.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A file or stream could not be read or written.
    #[error("I/O error{}: {source}", .path.as_ref().map(|p| format!(" on `{}`", p.display())).unwrap_or_default())]
    Io {
        /// The path being accessed, when the caller supplied one.
        path: Option<PathBuf>,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: Some(path.into()),
            source,
        }
    }

    /// Returns the validation error, if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Io { .. } => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(source: io::Error) -> Self {
        Self::Io { path: None, source }
    }
}

/// Programmer or input errors. These are never retried or recovered from.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A row referenced a column the table does not declare.
    #[error("column `{0}` not found in table headers")]
    ColumnNotFound(String),

    /// A row was added without any cells.
    #[error("no data submitted for table row")]
    NoData,

    /// The requested sort column is not one of the table's titles.
    #[error("sort column `{0}` not found in table headers")]
    SortColumnNotFound(String),

    /// Two titles normalise to the same column key.
    #[error("columns `{first}` and `{second}` both normalise to `{key}`")]
    DuplicateColumn {
        /// The normalised key.
        key: String,
        /// The title seen first.
        first: String,
        /// The title that collided with it.
        second: String,
    },

    /// An anchor name did not appear on exactly one opening and one closing sentinel.
    #[error("anchor `{name}` needs exactly one opening and one closing sentinel, found {} on line(s) {lines:?}", .lines.len())]
    AnchorCardinality {
        /// Anchor name as written in the document.
        name: String,
        /// 1-based line numbers of every sentinel seen for the anchor.
        lines: Vec<usize>,
    },

    /// An explicit end sentinel appeared before its start sentinel.
    #[error("anchor `{name}` ends on line {line} before it starts")]
    MisorderedAnchor {
        /// Anchor name as written in the document.
        name: String,
        /// 1-based line number of the offending end sentinel.
        line: usize,
    },

    /// Two anchor regions share at least one line.
    #[error("anchor `{first}` (lines {}-{}) overlaps anchor `{second}` (lines {}-{})", .first_lines.0, .first_lines.1, .second_lines.0, .second_lines.1)]
    OverlappingAnchors {
        /// The anchor that starts first.
        first: String,
        /// 1-based sentinel lines of `first`.
        first_lines: (usize, usize),
        /// The anchor it overlaps with.
        second: String,
        /// 1-based sentinel lines of `second`.
        second_lines: (usize, usize),
    },

    /// Two anchor names normalise to the same lookup key.
    #[error("anchors `{first}` and `{second}` both normalise to `{key}`")]
    DuplicateAnchor {
        /// The normalised key.
        key: String,
        /// The anchor seen first.
        first: String,
        /// The anchor that collided with it.
        second: String,
    },

    /// No anchor with this name exists in the document.
    #[error("no anchor named `{0}`")]
    UnknownAnchor(String),

    /// Text injected into a region contained a sentinel line.
    #[error("content injected into anchor `{anchor}` contains a sentinel on its line {line}")]
    SentinelInContent {
        /// The anchor being written.
        anchor: String,
        /// 1-based line within the injected content.
        line: usize,
    },
}
