//! NAPI-exposed data structures.

use napi_derive::napi;
use serde_json::Value as JsonValue;

/// Options passed to the compiler constructor and the one-shot helpers.
#[napi(object)]
#[derive(Debug, Clone, Default)]
pub struct CompilerConfig {
    /// Component registry as a generated component map
    /// (`{ keyword: { name, props } }`). Defaults to the built-in registry.
    pub registry: Option<JsonValue>,
    /// Output flavour: `"svelte"` (default) or `"html"`.
    pub target: Option<String>,
    /// Import prefix for Svelte component files (default `$lib/components`).
    pub components_dir: Option<String>,
}

/// Parsed page: frontmatter mapping plus node forest.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Flat frontmatter mapping.
    pub frontmatter: JsonValue,
    /// Root nodes (`{ type, props, children, content? }`).
    pub nodes: JsonValue,
}

/// Rendered markup plus the component kinds it references.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct RenderOutput {
    /// Nested component markup.
    pub content: String,
    /// Distinct component keywords, in order of first appearance.
    pub used_components: Vec<String>,
}

/// A fully compiled page.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct CompileResult {
    /// Generated page source (Svelte component or HTML document).
    pub code: String,
    /// Head markup built from the frontmatter.
    pub head: String,
    /// Flat frontmatter mapping.
    pub frontmatter: JsonValue,
    /// Distinct component keywords, in order of first appearance.
    pub used_components: Vec<String>,
}
