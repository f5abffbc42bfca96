//! Build Markdown documents in code and keep generated sections of existing Markdown
//! files up to date.
//!
//! [`MarkdownDocument`] is an append-only line buffer. Its block constructs return
//! guards that shift the heading depth or list indentation until they are dropped, so
//! the nesting of the generated Markdown follows the nesting of the code that builds
//! it. [`MarkdownInjector`] finds regions delimited by anchor comments in an existing
//! file and replaces their content, leaving everything else untouched.
//!
//! # Building a document
//!
//! ```rust
//! use markdown_toolkit::{bold, MarkdownDocument};
//!
//! let mut doc = MarkdownDocument::default();
//! {
//!     let mut title = doc.heading("Shopping");
//!     title.paragraph(&format!("Things to buy {}.", bold("today")));
//!     {
//!         let mut fruit = title.list("Fruit");
//!         fruit.ordered_list("Apples");
//!         fruit.ordered_list("Pears");
//!     }
//!     let mut code = title.codeblock("sh");
//!     code.text("open shop");
//! }
//!
//! assert_eq!(
//!     doc.render(),
//!     "# Shopping\n\nThings to buy **today**.\n\n\
//!      *   Fruit\n    1.  Apples\n    1.  Pears\n\
//!      ```sh\nopen shop\n```"
//! );
//! ```
//!
//! # Injecting into an existing file
//!
//! Content between two identical anchor comments is owned by the generator:
//!
//! ```rust
//! use markdown_toolkit::{MarkdownDocument, MarkdownInjector};
//!
//! let readme = "\
//! My Project
//! ==========
//!
//! <!--- markdown-toolkit:Usage --->
//! <!--- markdown-toolkit:Usage --->
//! ";
//!
//! let mut usage = MarkdownDocument::default();
//! usage.list("Run `make`");
//!
//! let mut injector = MarkdownInjector::new(readme)?;
//! injector.set_value("usage", &usage.render())?;
//! assert_eq!(injector.value("Usage")?, "*   Run `make`");
//! # Ok::<(), markdown_toolkit::Error>(())
//! ```

mod anchor;
mod config;
mod document;
mod error;
mod injector;
mod inline;
mod list;
mod scope;
mod table;
mod utils;

pub use crate::anchor::{Anchor, Region};
pub use crate::config::{AnchorStyle, Config};
pub use crate::document::MarkdownDocument;
pub use crate::error::{Error, ValidationError};
pub use crate::injector::MarkdownInjector;
pub use crate::inline::{
    badge, bold, code, header, image, italic, link, list_item, quote, strikethrough,
    LIST_MARKER_WIDTH,
};
pub use crate::list::{InvalidMarker, ListMarker, OrderedListMarker, UnorderedListMarker};
pub use crate::scope::Scope;
pub use crate::table::{Table, TableScope};
pub use crate::utils::{clean_doc, from_file, sanitise_attribute};
