//! Outline loading: org headings and their clock logs.
//!
//! The loader understands the subset of org syntax needed to recover clocked
//! time: headings (with TODO keywords, priority cookies and tags stripped),
//! `#+TODO:` keyword settings, and `CLOCK:` lines, whether or not they sit in
//! a `:LOGBOOK:` drawer. Everything else in a heading's body is ignored.
//!
//! # Tree layout
//!
//! [`OutlineTree`] owns every node in a flat vector. Index 0 is a synthetic
//! root at level 0 with an empty heading; the remaining nodes are headings in
//! document order, so a heading is followed by its descendants before its
//! next sibling. Parents are stored as indices into the same vector.
//!
//! # Ancestors across skipped levels
//!
//! A heading may skip levels (`*` directly followed by `***`). The ancestor
//! "at level n" is the nearest enclosing heading whose level is at most `n`,
//! falling back to the root. Each node's ancestor heading chain is resolved
//! once while loading.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::error::ConvertError;

/// Heading line: one or more stars followed by whitespace.
static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\*+)[ \t]+(.*)$").unwrap());

/// Trailing tag block, e.g. `  :work:urgent:`.
static TAGS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[ \t]+)(:[\w@#%]+)+:[ \t]*$").unwrap());

/// Priority cookie at the start of a heading, e.g. `[#A]`.
static PRIORITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[#[A-Za-z0-9]\][ \t]*").unwrap());

/// In-buffer TODO keyword settings.
static TODO_SETTING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^#\+(?:SEQ_|TYP_)?TODO:[ \t]*(.*)$").unwrap());

/// Closed or running clock line, trimmed. Duration after `=>` is optional.
static CLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^CLOCK:[ \t]*\[([^\]]*)\](?:--\[([^\]]*)\])?(?:[ \t]*=>[ \t]*-?\d+:\d{2})?[ \t]*$")
        .unwrap()
});

/// Inactive timestamp body with a time of day; the weekday name is optional.
static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})-(\d{2})-(\d{2})(?:[ \t]+[^\s\d]+)?[ \t]+(\d{1,2}):(\d{2})$").unwrap()
});

/// Keywords recognised when a document declares none.
const DEFAULT_TODO_KEYWORDS: [&str; 2] = ["TODO", "DONE"];

/// A logged `(start, end)` pair under a heading.
///
/// `start <= end` is not checked; an inverted interval is exported as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockInterval {
    /// When the clock was started.
    pub start: NaiveDateTime,
    /// When the clock was stopped.
    pub end: NaiveDateTime,
}

impl ClockInterval {
    /// Creates an interval from its endpoints.
    pub const fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Calendar date of the start timestamp.
    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }
}

/// One heading of the outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineNode {
    heading: String,
    level: usize,
    clocks: Vec<ClockInterval>,
    parent: Option<usize>,
    ancestor_headings: Vec<String>,
}

impl OutlineNode {
    fn root() -> Self {
        Self {
            heading: String::new(),
            level: 0,
            clocks: Vec::new(),
            parent: None,
            ancestor_headings: Vec::new(),
        }
    }

    /// Heading text without TODO keyword, priority or tags.
    pub fn heading(&self) -> &str {
        &self.heading
    }

    /// Number of stars; 0 for the synthetic root.
    pub const fn level(&self) -> usize {
        self.level
    }

    /// Completed clock intervals in document order.
    pub fn clocks(&self) -> &[ClockInterval] {
        &self.clocks
    }

    /// Index of the enclosing node, `None` for the root.
    pub const fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Headings of the ancestors at levels `1..level`, outermost first,
    /// followed by this node's own heading.
    pub fn ancestor_headings(&self) -> &[String] {
        &self.ancestor_headings
    }
}

/// A parsed outline document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineTree {
    nodes: Vec<OutlineNode>,
}

/// Loads and parses the outline at `path`.
pub fn load(path: &Path) -> Result<OutlineTree, ConvertError> {
    let bytes = fs::read(path).map_err(|e| ConvertError::file_access(path, e))?;
    let text = String::from_utf8(bytes).map_err(|e| {
        let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
        let line = valid.iter().filter(|&&b| b == b'\n').count() + 1;
        ConvertError::Parse {
            line,
            message: "invalid UTF-8".to_string(),
        }
    })?;

    let tree = OutlineTree::parse(&text)?;
    tracing::debug!(
        path = %path.display(),
        headings = tree.len(),
        "loaded outline"
    );
    Ok(tree)
}

impl OutlineTree {
    /// Parses outline text.
    pub fn parse(text: &str) -> Result<Self, ConvertError> {
        let keywords = todo_keywords(text);
        let mut nodes = vec![OutlineNode::root()];
        // Indices of the open headings, outermost first. The root never pops.
        let mut open: Vec<usize> = vec![0];

        for (line_idx, line) in text.lines().enumerate() {
            let line_no = line_idx + 1;

            if let Some(caps) = HEADING_RE.captures(line) {
                let level = caps[1].len();
                let raw = &caps[2];

                while open.len() > 1 && nodes[open[open.len() - 1]].level >= level {
                    open.pop();
                }
                let parent = open.last().copied();

                let index = nodes.len();
                nodes.push(OutlineNode {
                    heading: clean_heading(raw, &keywords),
                    level,
                    clocks: Vec::new(),
                    parent,
                    ancestor_headings: Vec::new(),
                });
                open.push(index);
                continue;
            }

            let trimmed = line.trim();
            if !trimmed.starts_with("CLOCK:") {
                continue;
            }

            let current = open[open.len() - 1];
            if let Some(interval) = parse_clock(trimmed, line_no)? {
                nodes[current].clocks.push(interval);
            }
        }

        let mut tree = Self { nodes };
        for index in 1..tree.nodes.len() {
            let level = tree.nodes[index].level;
            let mut chain: Vec<String> = (1..level)
                .filter_map(|n| tree.ancestor(index, n))
                .map(|node| node.heading.clone())
                .collect();
            chain.push(tree.nodes[index].heading.clone());
            tree.nodes[index].ancestor_headings = chain;
        }

        Ok(tree)
    }

    /// The synthetic level-0 root.
    pub fn root(&self) -> &OutlineNode {
        &self.nodes[0]
    }

    /// All headings in document order, root excluded.
    pub fn headings(&self) -> impl Iterator<Item = &OutlineNode> {
        self.nodes.iter().skip(1)
    }

    /// Node at `index`; index 0 is the root.
    pub fn node(&self, index: usize) -> Option<&OutlineNode> {
        self.nodes.get(index)
    }

    /// Number of headings, root excluded.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Whether the document has no headings.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ancestor of the node at `index` resolved at `level`.
    ///
    /// Returns the nearest enclosing node whose level is at most `level`.
    /// `None` unless `1 <= level < node.level()`.
    pub fn ancestor(&self, index: usize, level: usize) -> Option<&OutlineNode> {
        let node = self.nodes.get(index)?;
        if level == 0 || level >= node.level {
            return None;
        }

        let mut cursor = node.parent;
        while let Some(parent_idx) = cursor {
            let parent = &self.nodes[parent_idx];
            if parent.level <= level {
                return Some(parent);
            }
            cursor = parent.parent;
        }
        None
    }
}

/// Collects TODO keywords declared anywhere in the document.
fn todo_keywords(text: &str) -> HashSet<String> {
    let mut keywords: HashSet<String> = HashSet::new();
    for line in text.lines() {
        let Some(caps) = TODO_SETTING_RE.captures(line.trim_start()) else {
            continue;
        };
        for word in caps[1].split_whitespace().filter(|w| *w != "|") {
            // Strip fast-access keys and logging flags: `WAIT(w@/!)` -> `WAIT`
            let keyword = word.split('(').next().unwrap_or(word);
            if !keyword.is_empty() {
                keywords.insert(keyword.to_string());
            }
        }
    }

    if keywords.is_empty() {
        keywords.extend(DEFAULT_TODO_KEYWORDS.iter().map(|k| (*k).to_string()));
    }
    keywords
}

fn clean_heading(raw: &str, keywords: &HashSet<String>) -> String {
    let mut text = raw.trim();

    if let Some((first, rest)) = text.split_once(char::is_whitespace) {
        if keywords.contains(first) {
            text = rest.trim_start();
        }
    } else if keywords.contains(text) {
        text = "";
    }

    if let Some(m) = PRIORITY_RE.find(text) {
        text = &text[m.end()..];
    }

    if let Some(m) = TAGS_RE.find(text) {
        text = &text[..m.start()];
    }

    text.trim().to_string()
}

/// Parses a trimmed `CLOCK:` line.
///
/// Running clocks and prose that merely starts with `CLOCK:` yield
/// `Ok(None)`.
fn parse_clock(line: &str, line_no: usize) -> Result<Option<ClockInterval>, ConvertError> {
    let Some(caps) = CLOCK_RE.captures(line) else {
        tracing::debug!(line = line_no, "skipping text that is not a clock entry");
        return Ok(None);
    };

    let start = parse_timestamp(&caps[1], line_no)?;
    let Some(end) = caps.get(2) else {
        tracing::debug!(line = line_no, "skipping running clock");
        return Ok(None);
    };
    let end = parse_timestamp(end.as_str(), line_no)?;

    Ok(Some(ClockInterval::new(start, end)))
}

/// Parses the body of an inactive timestamp, e.g. `2020-08-17 Mon 09:30`.
fn parse_timestamp(value: &str, line_no: usize) -> Result<NaiveDateTime, ConvertError> {
    let malformed = || ConvertError::MalformedTimestamp {
        line: line_no,
        value: value.to_string(),
    };

    let caps = TIMESTAMP_RE.captures(value.trim()).ok_or_else(malformed)?;
    let number = |i: usize| caps[i].parse::<u32>().map_err(|_| malformed());

    let year = caps[1].parse::<i32>().map_err(|_| malformed())?;
    let date = NaiveDate::from_ymd_opt(year, number(2)?, number(3)?).ok_or_else(malformed)?;
    let time = NaiveTime::from_hms_opt(number(4)?, number(5)?, 0).ok_or_else(malformed)?;

    Ok(date.and_time(time))
}
