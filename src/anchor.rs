//! Anchor sentinels and the scan that pairs them into regions.

use std::{fmt, ops::Range, sync::LazyLock};

use indexmap::{map::Entry, IndexMap};
use itertools::Itertools;
use regex::Regex;

use crate::{config::AnchorStyle, utils::sanitise_attribute, ValidationError};

static PAIRED_SENTINEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)<!---\s?markdown-toolkit:\s*(\S.*?)\s*--->\s*$").unwrap()
});
static START_END_SENTINEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)<!---\s?markdown-toolkit:(start|end):\s*(\S.*?)\s*--->\s*$").unwrap()
});

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SentinelKind {
    /// Either end of a [`AnchorStyle::Paired`] anchor; position decides which.
    Either,
    Start,
    End,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Sentinel<'a> {
    pub(crate) indent: &'a str,
    pub(crate) kind: SentinelKind,
    pub(crate) name: &'a str,
}

impl AnchorStyle {
    /// The line that opens `anchor`.
    pub fn start_sentinel(self, anchor: &str) -> String {
        match self {
            Self::Paired => format!("<!--- markdown-toolkit:{anchor} --->"),
            Self::StartEnd => format!("<!--- markdown-toolkit:start:{anchor} --->"),
        }
    }

    /// The line that closes `anchor`.
    pub fn end_sentinel(self, anchor: &str) -> String {
        match self {
            Self::Paired => format!("<!--- markdown-toolkit:{anchor} --->"),
            Self::StartEnd => format!("<!--- markdown-toolkit:end:{anchor} --->"),
        }
    }

    pub(crate) fn parse_sentinel(self, line: &str) -> Option<Sentinel<'_>> {
        match self {
            Self::Paired => {
                let caps = PAIRED_SENTINEL.captures(line)?;
                Some(Sentinel {
                    indent: caps.get(1)?.as_str(),
                    kind: SentinelKind::Either,
                    name: caps.get(2)?.as_str(),
                })
            }
            Self::StartEnd => {
                let caps = START_END_SENTINEL.captures(line)?;
                let kind = match caps.get(2)?.as_str() {
                    "start" => SentinelKind::Start,
                    _ => SentinelKind::End,
                };
                Some(Sentinel {
                    indent: caps.get(1)?.as_str(),
                    kind,
                    name: caps.get(3)?.as_str(),
                })
            }
        }
    }
}

/// The lines an anchor occupies, found by a fresh scan of the document.
///
/// `start` and `end` are the 0-based indices of the two sentinel lines; the region's
/// content is the lines strictly between them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    /// Index of the opening sentinel.
    pub start: usize,
    /// Index of the closing sentinel.
    pub end: usize,
    /// Leading whitespace of the opening sentinel.
    pub indent: String,
}

impl Region {
    /// Indices of the lines between the sentinels.
    pub fn interior(&self) -> Range<usize> {
        self.start + 1..self.end
    }

    /// 1-based line numbers of both sentinels.
    pub fn line_numbers(&self) -> (usize, usize) {
        (self.start + 1, self.end + 1)
    }

    /// Whether the two regions share any line, sentinels included.
    pub fn overlaps(&self, other: &Region) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// A named anchor discovered in an injectable document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Anchor {
    name: String,
    key: String,
}

impl Anchor {
    /// The anchor name exactly as written in the sentinel.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The [`sanitise_attribute`] form the anchor is looked up by.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Per-anchor progress through the scan.
#[derive(Debug)]
enum ScanState {
    Unseen,
    SawOne { start: usize, indent: String },
    SawTwo(Region),
    Invalid,
}

#[derive(Debug)]
struct Tracker {
    state: ScanState,
    lines: Vec<usize>,
}

impl Tracker {
    fn new() -> Self {
        Self {
            state: ScanState::Unseen,
            lines: vec![],
        }
    }

    fn feed(&mut self, idx: usize, sentinel: &Sentinel<'_>) -> Result<(), ValidationError> {
        self.lines.push(idx + 1);
        let state = std::mem::replace(&mut self.state, ScanState::Invalid);
        self.state = match (state, sentinel.kind) {
            (ScanState::Unseen, SentinelKind::End) => {
                return Err(ValidationError::MisorderedAnchor {
                    name: sentinel.name.to_string(),
                    line: idx + 1,
                });
            }
            (ScanState::Unseen, _) => ScanState::SawOne {
                start: idx,
                indent: sentinel.indent.to_string(),
            },
            (ScanState::SawOne { start, indent }, SentinelKind::Either | SentinelKind::End) => {
                ScanState::SawTwo(Region {
                    start,
                    end: idx,
                    indent,
                })
            }
            _ => ScanState::Invalid,
        };
        Ok(())
    }

    fn finish(self, name: &str) -> Result<Region, ValidationError> {
        match self.state {
            ScanState::SawTwo(region) => Ok(region),
            _ => Err(ValidationError::AnchorCardinality {
                name: name.to_string(),
                lines: self.lines,
            }),
        }
    }
}

/// Scan every sentinel in `lines`, validate pairing, key uniqueness and overlap, and
/// return the anchors in document order.
pub(crate) fn locate_all<S: AsRef<str>>(
    lines: &[S],
    style: AnchorStyle,
) -> Result<IndexMap<String, (Anchor, Region)>, ValidationError> {
    let mut trackers: IndexMap<&str, Tracker> = IndexMap::new();
    for (idx, line) in lines.iter().enumerate() {
        let Some(sentinel) = style.parse_sentinel(line.as_ref()) else {
            continue;
        };
        tracing::trace!(line = idx + 1, name = sentinel.name, kind = ?sentinel.kind, "sentinel");
        trackers
            .entry(sentinel.name)
            .or_insert_with(Tracker::new)
            .feed(idx, &sentinel)?;
    }

    let mut anchors: IndexMap<String, (Anchor, Region)> = IndexMap::with_capacity(trackers.len());
    for (name, tracker) in trackers {
        let region = tracker.finish(name)?;
        let anchor = Anchor {
            name: name.to_string(),
            key: sanitise_attribute(name),
        };
        match anchors.entry(anchor.key.clone()) {
            Entry::Occupied(existing) => {
                return Err(ValidationError::DuplicateAnchor {
                    key: anchor.key,
                    first: existing.get().0.name.clone(),
                    second: anchor.name,
                });
            }
            Entry::Vacant(slot) => {
                tracing::debug!(anchor = %anchor, start = region.start, end = region.end, "located anchor");
                slot.insert((anchor, region));
            }
        }
    }

    if let Some(((first, first_region), (second, second_region))) = anchors
        .values()
        .sorted_by_key(|(_, region)| region.start)
        .tuple_combinations()
        .find(|((_, a), (_, b))| a.overlaps(b))
    {
        return Err(ValidationError::OverlappingAnchors {
            first: first.name.clone(),
            first_lines: first_region.line_numbers(),
            second: second.name.clone(),
            second_lines: second_region.line_numbers(),
        });
    }

    Ok(anchors)
}

/// Re-locate one anchor by its written name.
pub(crate) fn locate<S: AsRef<str>>(
    lines: &[S],
    style: AnchorStyle,
    name: &str,
) -> Result<Region, ValidationError> {
    let mut tracker = Tracker::new();
    for (idx, line) in lines.iter().enumerate() {
        match style.parse_sentinel(line.as_ref()) {
            Some(sentinel) if sentinel.name == name => tracker.feed(idx, &sentinel)?,
            _ => {}
        }
    }
    tracker.finish(name)
}
