use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::document::MarkdownDocument;

/// What a [`Scope`] undoes when it is dropped.
#[derive(Debug)]
pub(crate) enum Exit {
    Heading { previous: usize },
    List { indent: usize, list: usize },
    Indent { previous: usize },
    CodeBlock,
    Collapsed,
    Injector { end_sentinel: String },
}

/// A guard over an open block of a [`MarkdownDocument`].
///
/// Returned by [`heading`](MarkdownDocument::heading), [`list`](MarkdownDocument::list),
/// [`codeblock`](MarkdownDocument::codeblock) and the other block constructors. The
/// guard derefs to the document so nested content is written through it. Dropping it
/// writes any closing lines (a code fence, `</details>`, an end sentinel) and restores
/// the heading and indent levels that were current when the block was opened. This
/// also happens when the enclosing code returns early with `?` or unwinds.
///
/// A guard that is never bound is dropped at the end of the statement, which is how a
/// leaf list item or heading is written:
///
/// ```rust
/// # use markdown_toolkit::MarkdownDocument;
/// let mut doc = MarkdownDocument::default();
/// doc.list("One");
/// doc.list("Two");
/// assert_eq!(doc.render(), "*   One\n*   Two");
/// ```
pub struct Scope<'a> {
    doc: &'a mut MarkdownDocument,
    exit: Exit,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(doc: &'a mut MarkdownDocument, exit: Exit) -> Self {
        Self { doc, exit }
    }
}

impl Deref for Scope<'_> {
    type Target = MarkdownDocument;

    fn deref(&self) -> &Self::Target {
        self.doc
    }
}

impl DerefMut for Scope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.doc
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        self.doc.close(&self.exit);
    }
}

impl fmt::Debug for Scope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("exit", &self.exit)
            .field("heading_level", &self.doc.heading_level)
            .field("indent_level", &self.doc.indent_level)
            .finish()
    }
}
