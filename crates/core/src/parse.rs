//! Page parsing: header plus indentation-nested component lines.
//!
//! Each non-empty body line has the shape
//!
//! ```text
//! <indent><keyword>(<key>=<value>, ...) trailing text
//! ```
//!
//! The property list and trailing text are optional. A line nests under the
//! closest preceding line with a strictly smaller indentation.

use crate::error::LegerError;
use crate::frontmatter::{Frontmatter, parse_frontmatter, split_content};
use crate::registry::ComponentRegistry;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A parsed component line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Component keyword (registry key).
    #[serde(rename = "type")]
    pub kind: String,
    /// Property values keyed by property name.
    #[serde(default)]
    pub props: BTreeMap<String, String>,
    /// Nested component lines.
    #[serde(default)]
    pub children: Vec<Node>,
    /// Trailing text. Takes precedence over `children` when rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Node {
    /// Creates a node with no props, children, or content.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Default::default()
        }
    }

    /// Sets a property, builder style.
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    /// Appends a child, builder style.
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Sets the inline content, builder style.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

/// Result of parsing a whole page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Header mapping (empty when the page has no header).
    pub frontmatter: Frontmatter,
    /// Root nodes in document order.
    pub nodes: Vec<Node>,
}

/// Page parser bound to a component registry.
#[derive(Debug, Clone)]
pub struct Parser<'r> {
    registry: &'r ComponentRegistry,
    file: Option<String>,
}

impl<'r> Parser<'r> {
    /// Create a parser validating against `registry`.
    pub fn new(registry: &'r ComponentRegistry) -> Self {
        Self {
            registry,
            file: None,
        }
    }

    /// Attribute error locations to `file`.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Parse a whole page (optional header plus body).
    ///
    /// Error line numbers refer to the full input, header included.
    pub fn parse(&self, input: &str) -> Result<ParsedDocument, LegerError> {
        let split = split_content(input);
        let frontmatter = parse_frontmatter(split.frontmatter);
        let nodes = parse_lines(split.body, self.registry)
            .map_err(|err| {
                err.relocate(
                    split.body_line_offset,
                    split.body_column_offset,
                    self.file.as_deref(),
                )
            })?;
        Ok(ParsedDocument { frontmatter, nodes })
    }

    /// Parse body text only (no header detection).
    pub fn parse_body(&self, input: &str) -> Result<Vec<Node>, LegerError> {
        parse_lines(input, self.registry).map_err(|err| err.relocate(0, 0, self.file.as_deref()))
    }
}

/// Parse a whole page against `registry`.
///
/// # Example
///
/// ```
/// use leger_core::{default_registry, parse};
///
/// let doc = parse("---\ntitle: Home\n---\nsection()\n  text(size=large) Hello", &default_registry())?;
/// assert_eq!(doc.frontmatter.get_str("title"), Some("Home"));
/// assert_eq!(doc.nodes[0].children[0].content.as_deref(), Some("Hello"));
/// # Ok::<(), leger_core::LegerError>(())
/// ```
pub fn parse(input: &str, registry: &ComponentRegistry) -> Result<ParsedDocument, LegerError> {
    Parser::new(registry).parse(input)
}

/// Parse body text into a forest of nodes.
pub fn parse_body(input: &str, registry: &ComponentRegistry) -> Result<Vec<Node>, LegerError> {
    Parser::new(registry).parse_body(input)
}

struct Frame {
    indent: usize,
    node: Node,
}

/// One body line broken into its parts.
struct LineMatch<'a> {
    indent: usize,
    keyword: &'a str,
    /// Property list and its byte offset inside the line.
    props: Option<(&'a str, usize)>,
    trailing: &'a str,
}

fn parse_lines(input: &str, registry: &ComponentRegistry) -> Result<Vec<Node>, LegerError> {
    let mut roots = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    for (index, raw_line) in input.split('\n').enumerate() {
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
        if line.is_empty() {
            continue;
        }
        let line_number = index + 1;

        let Some(matched) = match_line(line) else {
            debug!("Skipping line {line_number}: not a component line");
            continue;
        };

        let Some(descriptor) = registry.get(matched.keyword) else {
            return Err(LegerError::unknown_component(
                matched.keyword,
                line_number,
                matched.indent + 1,
            ));
        };

        let mut node = Node::new(matched.keyword);
        if let Some((raw_props, props_offset)) = matched.props {
            for (offset, key, value) in split_props(raw_props) {
                if !descriptor.allows(key) {
                    let column = line[..props_offset + offset].chars().count() + 1;
                    return Err(LegerError::unknown_property(
                        matched.keyword,
                        key,
                        line_number,
                        column,
                    ));
                }
                node.props.insert(key.to_string(), value.to_string());
            }
        }
        if !matched.trailing.is_empty() {
            node.content = Some(matched.trailing.to_string());
        }

        while let Some(frame) = stack.pop_if(|frame| frame.indent >= matched.indent) {
            attach(&mut stack, &mut roots, frame.node);
        }
        stack.push(Frame {
            indent: matched.indent,
            node,
        });
    }

    while let Some(frame) = stack.pop() {
        attach(&mut stack, &mut roots, frame.node);
    }

    Ok(roots)
}

/// Hands a finished node to the frame below it, or to the roots.
fn attach(stack: &mut [Frame], roots: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.node.children.push(node),
        None => roots.push(node),
    }
}

fn match_line(line: &str) -> Option<LineMatch<'_>> {
    let rest = line.trim_start();
    let leading = &line[..line.len() - rest.len()];
    // Raw character count: tabs and spaces weigh the same.
    let indent = leading.chars().count();

    let keyword_len = rest.bytes().take_while(|b| is_keyword_byte(*b)).count();
    if keyword_len == 0 {
        return None;
    }
    let keyword = &rest[..keyword_len];
    let mut after = &rest[keyword_len..];

    let mut props = None;
    if let Some(inner) = after.strip_prefix('(')
        && let Some(close) = inner.find(')')
    {
        let props_offset = line.len() - inner.len();
        props = Some((&inner[..close], props_offset));
        after = &inner[close + 1..];
    }

    Some(LineMatch {
        indent,
        keyword,
        props,
        trailing: after.trim(),
    })
}

fn is_keyword_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'+'
}

/// Splits `a=1, b='2'` into `(byte offset of key, key, value)` triples.
///
/// Pairs without `=`, with an empty key, or with an empty value are dropped.
fn split_props(raw: &str) -> impl Iterator<Item = (usize, &str, &str)> {
    let mut offset = 0;
    raw.split(',').filter_map(move |pair| {
        let start = offset;
        offset += pair.len() + 1;

        let (key, value) = pair.split_once('=')?;
        let trimmed_key = key.trim();
        let value = value.trim();
        if trimmed_key.is_empty() || value.is_empty() {
            return None;
        }
        let key_start = start + key.len() - key.trim_start().len();
        Some((key_start, trimmed_key, strip_quotes(value)))
    })
}

fn strip_quotes(value: &str) -> &str {
    let value = value.strip_prefix(['"', '\'']).unwrap_or(value);
    value.strip_suffix(['"', '\'']).unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontmatter::FrontmatterValue;
    use crate::registry::default_registry;

    fn registry() -> ComponentRegistry {
        default_registry()
    }

    fn body(input: &str) -> Vec<Node> {
        parse_body(input, &registry()).expect("body should parse")
    }

    #[test]
    fn detects_component_keywords() {
        let tree = body("text()");
        assert_eq!(tree, vec![Node::new("text")]);
    }

    #[test]
    fn keyword_without_parentheses() {
        let tree = body("section");
        assert_eq!(tree, vec![Node::new("section")]);
    }

    #[test]
    fn detects_component_props() {
        let tree = body("text(size=small)");
        assert_eq!(tree[0].props.get("size").map(String::as_str), Some("small"));
        assert_eq!(tree[0].content, None);
        assert!(tree[0].children.is_empty());
    }

    #[test]
    fn strips_one_layer_of_quotes() {
        assert_eq!(body("text(size=\"big\")")[0].props["size"], "big");
        assert_eq!(body("text(size='big')")[0].props["size"], "big");
        assert_eq!(body("text(size=\"'big'\")")[0].props["size"], "'big'");
    }

    #[test]
    fn value_keeps_text_after_first_equals() {
        assert_eq!(body("text(size=a=b)")[0].props["size"], "a=b");
    }

    #[test]
    fn ignores_pairs_without_value() {
        let tree = body("text(size, color=, =red)");
        assert!(tree[0].props.is_empty());
    }

    #[test]
    fn trailing_text_becomes_content() {
        let tree = body("text() Some trailing text as content");
        assert_eq!(
            tree[0].content.as_deref(),
            Some("Some trailing text as content")
        );
    }

    #[test]
    fn unclosed_parenthesis_is_content() {
        let tree = body("text(size=small");
        assert!(tree[0].props.is_empty());
        assert_eq!(tree[0].content.as_deref(), Some("(size=small"));
    }

    #[test]
    fn nests_by_indentation() {
        let tree = body("\n        text()\n            text()\n        ");
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].children.len(), 1);
        assert_eq!(tree[0].children[0].kind, "text");
    }

    #[test]
    fn equal_indentation_makes_siblings() {
        assert_eq!(body("text()\ntext()").len(), 2);

        let tree = body("section()\n  text()");
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].children, vec![Node::new("text")]);
    }

    #[test]
    fn dedent_closes_scopes() {
        let input = "section()\n    text() a\n  section()\n      text() b\n  text() c\ntext() d";
        let tree = body(input);
        assert_eq!(tree.len(), 2);
        let first = &tree[0];
        assert_eq!(first.children.len(), 3);
        assert_eq!(first.children[0].content.as_deref(), Some("a"));
        assert_eq!(first.children[1].kind, "section");
        assert_eq!(first.children[1].children[0].content.as_deref(), Some("b"));
        assert_eq!(first.children[2].content.as_deref(), Some("c"));
        assert_eq!(tree[1].content.as_deref(), Some("d"));
    }

    #[test]
    fn blank_lines_do_not_close_scopes() {
        let tree = body("section()\n\n  text()\n\n  text()");
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].children.len(), 2);
    }

    #[test]
    fn tabs_count_as_single_characters() {
        // One tab is narrower than two spaces, so it closes the two-space scope.
        let tree = body("section()\n  section()\n\ttext()");
        assert_eq!(tree[0].children.len(), 2);
    }

    #[test]
    fn skips_lines_that_are_not_components() {
        let tree = body("# heading\ntext()\n   \n- item");
        assert_eq!(tree, vec![Node::new("text")]);
    }

    #[test]
    fn unknown_component_fails() {
        let err = parse_body("text()\n  notAComponent(a=b)", &registry()).unwrap_err();
        assert!(err.is_unknown_component());
        assert!(err.to_string().contains("notAComponent"));
        assert_eq!(err.location().line, 2);
        assert_eq!(err.location().column, 3);
    }

    #[test]
    fn unknown_property_fails() {
        let err = parse_body("text(notAProps=a)", &registry()).unwrap_err();
        assert_eq!(
            err,
            LegerError::unknown_property("text", "notAProps", 1, 6)
        );
        assert!(
            err.to_string()
                .contains("Unknown property for component 'text'")
        );
        assert!(err.to_string().contains("notAProps"));
    }

    #[test]
    fn unknown_property_column_points_at_key() {
        let err = parse_body("  text(size=a,  color=b)", &registry()).unwrap_err();
        assert_eq!(err.location().column, 17);
    }

    #[test]
    fn parse_returns_frontmatter_and_nodes() {
        let doc = parse("---\ntitle: Some title\n---\n      \ntext()", &registry()).unwrap();
        assert_eq!(
            doc.frontmatter.get("title"),
            Some(&FrontmatterValue::Text("Some title".into()))
        );
        assert_eq!(doc.nodes, vec![Node::new("text")]);
    }

    #[test]
    fn parse_with_empty_frontmatter() {
        let doc = parse("text()", &registry()).unwrap();
        assert!(doc.frontmatter.is_empty());
        assert_eq!(doc.nodes, vec![Node::new("text")]);
    }

    #[test]
    fn errors_report_file_lines() {
        let err = Parser::new(&registry())
            .with_file("about.leg")
            .parse("---\ntitle: x\n---\n\ntext()\nbogus()")
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown component at about.leg:6:1: bogus");
    }

    #[test]
    fn first_body_line_keeps_source_column() {
        let err = parse("---\ntitle: x\n---\n    bogus()", &registry()).unwrap_err();
        assert_eq!(err.to_string(), "Unknown component at 4:5: bogus");

        let err = parse("---\ntitle: x\n---\n  text(color=red)", &registry()).unwrap_err();
        assert_eq!(err.location(), &crate::SourceLocation::new(4, 8));
    }

    #[test]
    fn duplicate_props_keep_the_last_value() {
        let tree = body("text(size=a, size=b)");
        assert_eq!(tree[0].props.len(), 1);
        assert_eq!(tree[0].props["size"], "b");
    }

    #[test]
    fn node_serializes_like_a_plain_object() {
        let json = serde_json::to_value(Node::new("text")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "type": "text", "props": {}, "children": [] })
        );

        let json = serde_json::to_value(Node::new("text").with_content("")).unwrap();
        assert_eq!(json["content"], "");
    }

    #[test]
    fn parsing_is_deterministic() {
        let input = "section()\n  text(size=large) Hello, world!\n  text() Bye";
        assert_eq!(body(input), body(input));
    }
}
