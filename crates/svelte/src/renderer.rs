//! Renders a parsed node forest into nested component markup.
//!
//! Rendering is a fold over the tree: every subtree produces its own markup
//! and used-component set, and the parent merges them. Nothing is shared or
//! mutated across calls, so one registry can serve any number of threads.

use leger_core::{ComponentRegistry, Node};
use log::error;
use serde::Serialize;
use std::fmt::Write as FmtWrite;

/// Indentation emitted per nesting level.
const INDENT: &str = "  ";

/// Deduplicated component keywords, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UsedComponents {
    keywords: Vec<String>,
}

impl UsedComponents {
    /// Records a keyword. Returns `false` if it was already present.
    pub fn insert(&mut self, keyword: &str) -> bool {
        if self.contains(keyword) {
            return false;
        }
        self.keywords.push(keyword.to_string());
        true
    }

    /// Adds every keyword of `other` that is not yet present.
    pub fn merge(&mut self, other: UsedComponents) {
        for keyword in other.keywords {
            if !self.contains(&keyword) {
                self.keywords.push(keyword);
            }
        }
    }

    /// Check if a keyword was used.
    pub fn contains(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    /// Iterates keywords in order of first appearance.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    /// Number of distinct keywords.
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// Check if no component was used.
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Consumes the set, returning the keywords in order of first appearance.
    pub fn into_vec(self) -> Vec<String> {
        self.keywords
    }

    fn collect_from(&mut self, nodes: &[Node]) {
        for node in nodes {
            self.insert(&node.kind);
            self.collect_from(&node.children);
        }
    }
}

impl<'a> FromIterator<&'a str> for UsedComponents {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        let mut used = UsedComponents::default();
        for keyword in iter {
            used.insert(keyword);
        }
        used
    }
}

/// Rendered markup plus the component kinds it references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResult {
    /// Nested markup, two spaces of indentation per level.
    pub content: String,
    /// Every component keyword appearing in the forest.
    pub used_components: UsedComponents,
}

/// Renders `nodes` to markup using the tag names from `registry`.
///
/// A node's `content` (even an empty string) wins over its children; children
/// are only rendered when `content` is absent.
///
/// # Example
///
/// ```
/// use leger_core::{ComponentRegistry, Node};
/// use leger_svelte::render;
///
/// let registry = ComponentRegistry::new()
///     .with_component("section", "Section", Vec::<String>::new())
///     .with_component("text", "Text", ["size"]);
/// let nodes = vec![
///     Node::new("section").with_child(
///         Node::new("text").with_prop("size", "large").with_content("Hello, world!"),
///     ),
/// ];
///
/// let result = render(&nodes, &registry);
/// assert_eq!(
///     result.content,
///     "<Section>\n  <Text size=\"large\">Hello, world!</Text>\n</Section>"
/// );
/// assert_eq!(result.used_components.iter().collect::<Vec<_>>(), ["section", "text"]);
/// ```
pub fn render(nodes: &[Node], registry: &ComponentRegistry) -> RenderResult {
    render_level(nodes, registry, 0)
}

fn render_level(nodes: &[Node], registry: &ComponentRegistry, level: usize) -> RenderResult {
    let indent = INDENT.repeat(level);
    let mut used = UsedComponents::default();
    let mut rendered = Vec::with_capacity(nodes.len());

    for node in nodes {
        used.insert(&node.kind);
        let tag = tag_name(node, registry);

        let inner = match &node.content {
            Some(content) => {
                // Hidden children still count as used.
                used.collect_from(&node.children);
                content.clone()
            }
            None if !node.children.is_empty() => {
                let nested = render_level(&node.children, registry, level + 1);
                used.merge(nested.used_components);
                format!("\n{}\n{}", nested.content, indent)
            }
            None => String::new(),
        };

        let mut markup = String::with_capacity(indent.len() + tag.len() * 2 + inner.len() + 5);
        markup.push_str(&indent);
        markup.push('<');
        markup.push_str(tag);
        for (key, value) in &node.props {
            let _ = write!(markup, " {}=\"{}\"", key, value);
        }
        markup.push('>');
        markup.push_str(&inner);
        let _ = write!(markup, "</{}>", tag);
        rendered.push(markup);
    }

    RenderResult {
        content: rendered.join("\n"),
        used_components: used,
    }
}

fn tag_name<'a>(node: &'a Node, registry: &'a ComponentRegistry) -> &'a str {
    match registry.tag_name(&node.kind) {
        Some(name) => name,
        None => {
            error!(
                "Rendering unregistered component '{}'; emitting it verbatim",
                node.kind
            );
            &node.kind
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ComponentRegistry {
        leger_core::default_registry()
    }

    #[test]
    fn renders_a_component() {
        let result = render(&[Node::new("text")], &registry());
        assert_eq!(result.content, "<Text></Text>");
    }

    #[test]
    fn adds_props() {
        let nodes = [Node::new("text")
            .with_prop("props1", "a")
            .with_prop("props2", "b")];
        let result = render(&nodes, &registry());
        assert_eq!(result.content, "<Text props1=\"a\" props2=\"b\"></Text>");
    }

    #[test]
    fn renders_content() {
        let nodes = [Node::new("text").with_content("Some inner content")];
        let result = render(&nodes, &registry());
        assert_eq!(result.content, "<Text>Some inner content</Text>");
    }

    #[test]
    fn renders_nested_components() {
        let nodes = [Node::new("text").with_child(Node::new("text").with_content("Some content inside"))];
        let result = render(&nodes, &registry());
        let lines: Vec<&str> = result.content.split('\n').collect();
        assert_eq!(
            lines,
            ["<Text>", "  <Text>Some content inside</Text>", "</Text>"]
        );
    }

    #[test]
    fn content_wins_over_children() {
        let nodes = [Node::new("section")
            .with_content("only this")
            .with_child(Node::new("text").with_content("hidden"))];
        let result = render(&nodes, &registry());
        assert_eq!(result.content, "<Section>only this</Section>");
    }

    #[test]
    fn empty_content_still_wins() {
        let nodes = [Node::new("section")
            .with_content("")
            .with_child(Node::new("text"))];
        let result = render(&nodes, &registry());
        assert_eq!(result.content, "<Section></Section>");
    }

    #[test]
    fn siblings_share_indentation() {
        let nodes = [Node::new("section")
            .with_child(Node::new("text").with_content("a"))
            .with_child(Node::new("section").with_child(Node::new("text")))];
        let result = render(&nodes, &registry());
        assert_eq!(
            result.content,
            "<Section>\n  <Text>a</Text>\n  <Section>\n    <Text></Text>\n  </Section>\n</Section>"
        );
    }

    #[test]
    fn returns_used_components_once() {
        let nodes = [
            Node::new("section").with_child(Node::new("text").with_content("Some content inside")),
            Node::new("text"),
            Node::new("section"),
        ];
        let result = render(&nodes, &registry());
        assert_eq!(
            result.used_components.into_vec(),
            vec!["section".to_string(), "text".to_string()]
        );
    }

    #[test]
    fn used_components_include_hidden_children() {
        let nodes = [Node::new("section")
            .with_content("shown")
            .with_child(Node::new("text"))];
        let result = render(&nodes, &registry());
        assert!(result.used_components.contains("text"));
        assert_eq!(result.used_components.len(), 2);
    }

    #[test]
    fn empty_forest_renders_nothing() {
        let result = render(&[], &registry());
        assert_eq!(result.content, "");
        assert!(result.used_components.is_empty());
    }

    #[test]
    fn unregistered_kind_falls_back_to_keyword() {
        let result = render(&[Node::new("mystery")], &registry());
        assert_eq!(result.content, "<mystery></mystery>");
    }

    #[test]
    fn merge_keeps_first_appearance_order() {
        let mut used: UsedComponents = ["b", "a"].into_iter().collect();
        used.merge(["a", "c"].into_iter().collect());
        assert_eq!(used.iter().collect::<Vec<_>>(), ["b", "a", "c"]);
        assert!(!used.insert("c"));
    }
}
