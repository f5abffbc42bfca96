use std::borrow::Cow;
use std::fmt;

use crate::utils::clean_doc;

/// The prefix written in front of a list item.
///
/// Ordered items are not auto-numbered: every item of an ordered list is written with
/// the same number and Markdown renderers do the counting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListMarker {
    /// `1.`, `1)`, ...
    Ordered {
        /// Number written in the marker.
        number: usize,
        /// Character following the number.
        marker: OrderedListMarker,
    },
    /// `*`, `+` or `-`.
    Unordered(UnorderedListMarker),
    /// A literal prefix supplied by the caller, e.g. `- [ ]`.
    Custom(Cow<'static, str>),
}

impl Default for ListMarker {
    fn default() -> Self {
        ListMarker::Unordered(UnorderedListMarker::Asterisk)
    }
}

impl ListMarker {
    /// The default marker for an ordered (`1.`) or unordered (`*`) list.
    pub fn new(ordered: bool) -> Self {
        if ordered {
            Self::ordered()
        } else {
            Self::default()
        }
    }

    /// `1.`
    pub fn ordered() -> Self {
        ListMarker::Ordered {
            number: 1,
            marker: OrderedListMarker::Period,
        }
    }

    /// A literal prefix.
    pub fn custom(prefix: impl Into<Cow<'static, str>>) -> Self {
        ListMarker::Custom(prefix.into())
    }

    /// Render `item` behind this marker, padding the marker to `width` columns.
    ///
    /// The item text is cleaned with [`clean_doc`] first so indentation from the
    /// caller's source does not leak into the document. A marker wider than `width`
    /// is written as is.
    pub fn render_item(&self, item: &str, width: usize) -> String {
        format!("{:<width$}{}", self.to_string(), clean_doc(item))
    }
}

impl fmt::Display for ListMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ordered { number, marker } => write!(f, "{number}{}", char::from(marker)),
            Self::Unordered(marker) => write!(f, "{}", char::from(marker)),
            Self::Custom(prefix) => f.write_str(prefix),
        }
    }
}

/// Character following the number of an ordered list item.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum OrderedListMarker {
    /// `1.`
    Period,
    /// `1)`
    Parenthesis,
}

impl From<&OrderedListMarker> for char {
    fn from(value: &OrderedListMarker) -> Self {
        match value {
            OrderedListMarker::Period => '.',
            OrderedListMarker::Parenthesis => ')',
        }
    }
}

/// A character that is not a valid list marker.
#[repr(transparent)]
#[derive(Debug, PartialEq, Eq)]
pub struct InvalidMarker(char);

impl TryFrom<char> for OrderedListMarker {
    type Error = InvalidMarker;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '.' => Ok(OrderedListMarker::Period),
            ')' => Ok(OrderedListMarker::Parenthesis),
            _ => Err(InvalidMarker(value)),
        }
    }
}

/// Bullet character of an unordered list item.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum UnorderedListMarker {
    /// `*`
    Asterisk,
    /// `+`
    Plus,
    /// `-`
    Hyphen,
}

impl From<&UnorderedListMarker> for char {
    fn from(value: &UnorderedListMarker) -> Self {
        match value {
            UnorderedListMarker::Asterisk => '*',
            UnorderedListMarker::Plus => '+',
            UnorderedListMarker::Hyphen => '-',
        }
    }
}

impl TryFrom<char> for UnorderedListMarker {
    type Error = InvalidMarker;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '*' => Ok(UnorderedListMarker::Asterisk),
            '+' => Ok(UnorderedListMarker::Plus),
            '-' => Ok(UnorderedListMarker::Hyphen),
            _ => Err(InvalidMarker(value)),
        }
    }
}

impl From<&str> for ListMarker {
    /// Recognise the standard markers so they compare equal to their structured form,
    /// anything else becomes [`ListMarker::Custom`].
    fn from(s: &str) -> Self {
        let mut chars = s.chars();
        if let (Some(first), None) = (chars.next(), chars.next()) {
            if let Ok(marker) = UnorderedListMarker::try_from(first) {
                return ListMarker::Unordered(marker);
            }
        }

        // An ordered list marker is 1-9 arabic digits followed by `.` or `)`.
        let digits = s.bytes().take_while(u8::is_ascii_digit).count();
        if (1..=9).contains(&digits) && s.len() == digits + 1 {
            let marker = s[digits..].chars().next().map(OrderedListMarker::try_from);
            if let (Ok(number), Some(Ok(marker))) = (s[..digits].parse(), marker) {
                return ListMarker::Ordered { number, marker };
            }
        }

        ListMarker::Custom(s.to_string().into())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(ListMarker::default(), "*")]
    #[case(ListMarker::ordered(), "1.")]
    #[case(ListMarker::Ordered { number: 3, marker: OrderedListMarker::Parenthesis }, "3)")]
    #[case(ListMarker::Unordered(UnorderedListMarker::Hyphen), "-")]
    #[case(ListMarker::custom("- [ ]"), "- [ ]")]
    fn display(#[case] marker: ListMarker, #[case] expected: &str) {
        assert_eq!(marker.to_string(), expected);
    }

    #[rstest]
    #[case("+", ListMarker::Unordered(UnorderedListMarker::Plus))]
    #[case("12.", ListMarker::Ordered { number: 12, marker: OrderedListMarker::Period })]
    #[case("2)", ListMarker::Ordered { number: 2, marker: OrderedListMarker::Parenthesis })]
    #[case("1234567890.", ListMarker::custom("1234567890."))]
    #[case("->", ListMarker::custom("->"))]
    #[case("1:", ListMarker::custom("1:"))]
    fn from_str(#[case] input: &str, #[case] expected: ListMarker) {
        assert_eq!(ListMarker::from(input), expected);
    }

    #[test]
    fn render_item_pads_marker() {
        assert_eq!(ListMarker::default().render_item("One", 4), "*   One");
        assert_eq!(ListMarker::ordered().render_item("One", 4), "1.  One");
        assert_eq!(ListMarker::custom("[x]").render_item("Done", 4), "[x] Done");
        assert_eq!(ListMarker::custom("TODO:").render_item("Later", 4), "TODO:Later");
    }

    #[test]
    fn render_item_cleans_text() {
        let item = "
            Spans
              two lines
        ";
        assert_eq!(ListMarker::default().render_item(item, 4), "*   Spans\n  two lines");
    }
}
