use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const FENCE: &str = "---";
const LIST_ITEM_PREFIX: &str = "  -";

/// A page split into its raw header and body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitContent<'a> {
    /// Text between the `---` fences, trimmed. Empty when there is no header.
    pub frontmatter: &'a str,
    /// Page body. Trimmed when a header was present, untouched otherwise.
    pub body: &'a str,
    /// Number of source lines that precede the first line of `body`.
    pub body_line_offset: usize,
    /// Characters of indentation trimmed off the first line of `body`.
    pub body_column_offset: usize,
}

/// A single frontmatter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrontmatterValue {
    /// `key: value`
    Text(String),
    /// `key:` followed by `  - item` lines.
    List(Vec<String>),
}

impl FrontmatterValue {
    /// Returns the string value, if this is a `Text` entry.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FrontmatterValue::Text(value) => Some(value),
            FrontmatterValue::List(_) => None,
        }
    }

    /// Returns the items, if this is a `List` entry.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FrontmatterValue::Text(_) => None,
            FrontmatterValue::List(items) => Some(items),
        }
    }
}

/// Flat key → value mapping parsed from a page header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frontmatter {
    entries: BTreeMap<String, FrontmatterValue>,
}

impl Frontmatter {
    /// Get the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&FrontmatterValue> {
        self.entries.get(key)
    }

    /// Get a `Text` value stored under `key`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FrontmatterValue::as_str)
    }

    /// Get a `List` value stored under `key`.
    pub fn get_list(&self, key: &str) -> Option<&[String]> {
        self.get(key).and_then(FrontmatterValue::as_list)
    }

    /// Sets `key`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: FrontmatterValue) {
        self.entries.insert(key.into(), value);
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FrontmatterValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no keys were parsed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, FrontmatterValue)> for Frontmatter {
    fn from_iter<T: IntoIterator<Item = (String, FrontmatterValue)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Splits a page into its `---` fenced header and its body.
///
/// The header must open on the very first line. Without a complete fenced
/// block the whole input is returned as the body.
///
/// # Examples
///
/// ```
/// use leger_core::split_content;
///
/// let split = split_content("---\ntitle: Hello World\n---\n      \ntext()");
/// assert_eq!(split.frontmatter, "title: Hello World");
/// assert_eq!(split.body, "text()");
///
/// let split = split_content("text()");
/// assert_eq!(split.frontmatter, "");
/// assert_eq!(split.body, "text()");
/// ```
pub fn split_content(input: &str) -> SplitContent<'_> {
    let input = strip_bom(input);
    match find_fenced_block(input) {
        Some((block, body_start)) => {
            let rest = &input[body_start..];
            let leading = &rest[..rest.len() - rest.trim_start().len()];
            let first_line_indent = leading.rsplit('\n').next().unwrap_or(leading);
            SplitContent {
                frontmatter: block.trim(),
                body: rest.trim(),
                body_line_offset: count_lines(&input[..body_start]) + count_lines(leading),
                body_column_offset: first_line_indent.chars().count(),
            }
        }
        None => SplitContent {
            frontmatter: "",
            body: input,
            body_line_offset: 0,
            body_column_offset: 0,
        },
    }
}

/// Parses header text into a flat mapping.
///
/// `key: value` lines set a text value (an empty value starts a list), and
/// `  - item` lines append to the list of the previous key. Anything else is
/// ignored.
pub fn parse_frontmatter(input: &str) -> Frontmatter {
    let mut frontmatter = Frontmatter::default();
    let mut previous_key: Option<String> = None;

    for line in input.lines() {
        if let Some(item) = line.strip_prefix(LIST_ITEM_PREFIX) {
            let item = item.trim().to_string();
            match previous_key.as_deref() {
                Some(key) => match frontmatter.entries.get_mut(key) {
                    Some(FrontmatterValue::List(items)) => items.push(item),
                    _ => warn!("Ignoring list item under non-list frontmatter key '{key}': {item}"),
                },
                None => warn!("Ignoring frontmatter list item with no preceding key: {item}"),
            }
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            if !line.trim().is_empty() {
                debug!("Skipping frontmatter line without a key: {line}");
            }
            continue;
        };

        let key = key.trim();
        if key.is_empty() {
            debug!("Skipping frontmatter line with an empty key: {line}");
            continue;
        }

        let value = value.trim();
        let entry = if value.is_empty() {
            FrontmatterValue::List(Vec::new())
        } else {
            FrontmatterValue::Text(value.to_string())
        };
        frontmatter.insert(key, entry);
        previous_key = Some(key.to_string());
    }

    frontmatter
}

fn find_fenced_block(input: &str) -> Option<(&str, usize)> {
    let (first, mut cursor) = next_line(input, 0)?;
    if !is_fence(first) {
        return None;
    }

    let block_start = cursor;
    while let Some((line, next_cursor)) = next_line(input, cursor) {
        if is_fence(line) {
            return Some((&input[block_start..cursor], next_cursor));
        }
        cursor = next_cursor;
    }
    None
}

fn strip_bom(input: &str) -> &str {
    input.strip_prefix('\u{feff}').unwrap_or(input)
}

fn next_line(input: &str, start: usize) -> Option<(&str, usize)> {
    if start >= input.len() {
        return None;
    }

    let bytes = &input.as_bytes()[start..];
    if let Some(pos) = bytes.iter().position(|b| *b == b'\n') {
        let line_end = start + pos;
        Some((&input[start..line_end], line_end + 1))
    } else {
        Some((&input[start..], input.len()))
    }
}

fn is_fence(line: &str) -> bool {
    line.trim_end_matches('\r') == FENCE
}

fn count_lines(text: &str) -> usize {
    text.bytes().filter(|b| *b == b'\n').count()
}
