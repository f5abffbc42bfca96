use std::fmt;
use std::ops::{Deref, DerefMut};

use indexmap::IndexMap;
use itertools::Itertools;

use crate::document::MarkdownDocument;
use crate::utils::sanitise_attribute;
use crate::ValidationError;

/// A pipe table collected row by row.
///
/// Columns are addressed by the [`sanitise_attribute`] key of their title, so a column
/// titled `"Apple Type"` accepts cells keyed `"apple_type"` or `"Apple Type"`. Rows
/// keep insertion order unless a sort column is set, in which case rendering orders
/// them by that column's text. The sort is lexicographic and stable: `"10"` sorts
/// before `"9"`, and rows with equal cells keep their insertion order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table {
    titles: Vec<String>,
    keys: Vec<String>,
    rows: Vec<Vec<String>>,
    sort_column: Option<usize>,
}

impl Table {
    /// Create a table with the given column titles.
    ///
    /// Fails with [`ValidationError::DuplicateColumn`] when two titles normalise to the
    /// same key.
    pub fn new<I, S>(titles: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let titles = titles.into_iter().map(Into::into).collect::<Vec<String>>();
        let mut keys = Vec::with_capacity(titles.len());
        for (i, title) in titles.iter().enumerate() {
            let key = sanitise_attribute(title);
            if let Some(first) = keys.iter().position(|k| *k == key) {
                return Err(ValidationError::DuplicateColumn {
                    key,
                    first: titles[first].clone(),
                    second: titles[i].clone(),
                });
            }
            keys.push(key);
        }
        Ok(Self {
            titles,
            keys,
            rows: Vec::new(),
            sort_column: None,
        })
    }

    /// Build a table from rows of `(title, value)` pairs.
    ///
    /// The titles are the union of every row's keys in first-seen order. Missing cells
    /// are left empty.
    ///
    /// ```rust
    /// # use markdown_toolkit::Table;
    /// let table = Table::from_rows([
    ///     vec![("Name", "Ada"), ("Role", "Engineer")],
    ///     vec![("Name", "Grace"), ("Rank", "Admiral")],
    /// ])?;
    /// assert_eq!(
    ///     table.render(),
    ///     "| Name | Role | Rank |\n\
    ///      | --- | --- | --- |\n\
    ///      | Ada | Engineer |  |\n\
    ///      | Grace |  | Admiral |"
    /// );
    /// # Ok::<(), markdown_toolkit::ValidationError>(())
    /// ```
    pub fn from_rows<R, C, K, V>(rows: R) -> Result<Self, ValidationError>
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|(k, v)| (k.into(), v.to_string()))
                    .collect::<IndexMap<String, String>>()
            })
            .collect::<Vec<_>>();
        let titles = rows
            .iter()
            .flat_map(IndexMap::keys)
            .unique()
            .cloned()
            .collect::<Vec<_>>();

        let mut table = Self::new(titles)?;
        for row in &rows {
            let cells = table
                .titles
                .iter()
                .map(|title| row.get(title).cloned().unwrap_or_default())
                .collect();
            table.rows.push(cells);
        }
        tracing::debug!(columns = table.titles.len(), rows = table.rows.len(), "built table");
        Ok(table)
    }

    /// Order rendered rows by `column`, given as a title or its key.
    pub fn sort_by(&mut self, column: &str) -> Result<&mut Self, ValidationError> {
        let index = self
            .titles
            .iter()
            .position(|title| title == column)
            .or_else(|| {
                let key = sanitise_attribute(column);
                self.keys.iter().position(|k| *k == key)
            })
            .ok_or_else(|| ValidationError::SortColumnNotFound(column.to_string()))?;
        self.sort_column = Some(index);
        Ok(self)
    }

    /// Index of the column rows are sorted by, if any.
    pub fn sort_column(&self) -> Option<usize> {
        self.sort_column
    }

    /// Column titles as given.
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// Normalised column keys, parallel to [`titles`](Self::titles).
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Rows in insertion order.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no rows have been added.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Add a row from `(column, value)` cells.
    ///
    /// Columns are matched by key and may be given in any order. Columns left out get
    /// an empty cell; when a column is given twice the last value wins. An empty row
    /// fails with [`ValidationError::NoData`] and an unknown column with
    /// [`ValidationError::ColumnNotFound`]. A failed row leaves the table unchanged.
    pub fn add_row<I, K, V>(&mut self, cells: I) -> Result<&mut Self, ValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToString,
    {
        let mut row = vec![String::new(); self.keys.len()];
        let mut seen = false;
        for (column, value) in cells {
            seen = true;
            let column = column.as_ref();
            let key = sanitise_attribute(column);
            let index = self
                .keys
                .iter()
                .position(|k| *k == key)
                .ok_or_else(|| ValidationError::ColumnNotFound(column.to_string()))?;
            row[index] = value.to_string();
        }
        if !seen {
            return Err(ValidationError::NoData);
        }
        self.rows.push(row);
        Ok(self)
    }

    /// Render the header, the `---` separator and every row, without a trailing
    /// newline.
    pub fn render(&self) -> String {
        let mut rows = self.rows.iter().collect::<Vec<_>>();
        if let Some(column) = self.sort_column {
            rows.sort_by(|a, b| a[column].cmp(&b[column]));
        }

        let header = render_row(self.titles.iter().map(String::as_str));
        let separator = render_row(self.titles.iter().map(|_| "---"));
        [header, separator]
            .into_iter()
            .chain(rows.into_iter().map(|row| render_row(row.iter().map(String::as_str))))
            .join("\n")
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn render_row<'a>(cells: impl Iterator<Item = &'a str>) -> String {
    format!("| {} |", cells.format(" | "))
}

/// A [`Table`] being filled inside a [`MarkdownDocument`].
///
/// Returned by [`MarkdownDocument::table`]. Derefs to the table so rows are added
/// through it. The table is written to the document, followed by an empty line, when
/// the guard is dropped.
pub struct TableScope<'a> {
    doc: &'a mut MarkdownDocument,
    table: Table,
}

impl<'a> TableScope<'a> {
    pub(crate) fn new(doc: &'a mut MarkdownDocument, table: Table) -> Self {
        Self { doc, table }
    }
}

impl Deref for TableScope<'_> {
    type Target = Table;

    fn deref(&self) -> &Self::Target {
        &self.table
    }
}

impl DerefMut for TableScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.table
    }
}

impl Drop for TableScope<'_> {
    fn drop(&mut self) {
        tracing::debug!(rows = self.table.len(), "exit table");
        self.doc.insert_table(&self.table);
    }
}

impl fmt::Debug for TableScope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableScope")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}
