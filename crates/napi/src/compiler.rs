//! The stateful compiler and its configuration.

use crate::batch::{BatchInput, BatchOptions, BatchProcessingResult, run_batch};
use crate::types::*;
use crate::utils::{compile_result, leger_error, page_options, resolve_registry, to_json};
use leger_core::{ComponentRegistry, Node, Parser};
use leger_svelte::{PageOptions, compile_page, render};
use napi::{Error, Status};
use napi_derive::napi;
use serde_json::Value as JsonValue;

/// Registry and page options resolved once from a `CompilerConfig`.
#[derive(Debug, Clone)]
pub(crate) struct InternalCompilerConfig {
    pub(crate) registry: ComponentRegistry,
    pub(crate) options: PageOptions,
}

impl InternalCompilerConfig {
    pub(crate) fn new(config: Option<CompilerConfig>) -> napi::Result<Self> {
        let cfg = config.unwrap_or_default();
        let options = page_options(&cfg)?;
        let registry = resolve_registry(cfg.registry)?;
        Ok(Self { registry, options })
    }

    pub(crate) fn parse(&self, source: &str) -> napi::Result<ParseResult> {
        let document = Parser::new(&self.registry)
            .parse(source)
            .map_err(leger_error)?;
        Ok(ParseResult {
            frontmatter: to_json(&document.frontmatter)?,
            nodes: to_json(&document.nodes)?,
        })
    }

    pub(crate) fn render(&self, nodes: JsonValue) -> napi::Result<RenderOutput> {
        let nodes: Vec<Node> = serde_json::from_value(nodes)
            .map_err(|e| Error::new(Status::InvalidArg, format!("Invalid nodes: {}", e)))?;
        let rendered = render(&nodes, &self.registry);
        Ok(RenderOutput {
            content: rendered.content,
            used_components: rendered.used_components.into_vec(),
        })
    }

    pub(crate) fn compile(
        &self,
        source: &str,
        filepath: Option<String>,
    ) -> napi::Result<CompileResult> {
        let options = PageOptions {
            file: filepath,
            ..self.options.clone()
        };
        let page = compile_page(source, &self.registry, &options).map_err(leger_error)?;
        compile_result(page)
    }
}

/// Reusable compiler holding a registry loaded once.
#[napi]
pub struct LegerCompiler {
    pub(crate) config: InternalCompilerConfig,
}

#[napi]
impl LegerCompiler {
    #[napi(constructor)]
    /// Creates a compiler that can be reused across many pages.
    pub fn new(config: Option<CompilerConfig>) -> napi::Result<Self> {
        Ok(Self {
            config: InternalCompilerConfig::new(config)?,
        })
    }

    /// Parses a page into its frontmatter and node forest.
    #[napi]
    pub fn parse(&self, source: String) -> napi::Result<ParseResult> {
        self.config.parse(&source)
    }

    /// Renders a node forest into component markup.
    #[napi]
    pub fn render(&self, nodes: JsonValue) -> napi::Result<RenderOutput> {
        self.config.render(nodes)
    }

    /// Compiles a page into a Svelte component or HTML document.
    #[napi]
    pub fn compile(&self, source: String, filepath: Option<String>) -> napi::Result<CompileResult> {
        self.config.compile(&source, filepath)
    }

    /// Compiles many pages in parallel using Rayon.
    ///
    /// Any `config` inside `options` is ignored in favour of the compiler's own.
    #[napi(js_name = "compileBatch")]
    pub fn compile_batch(
        &self,
        inputs: Vec<BatchInput>,
        options: Option<BatchOptions>,
    ) -> BatchProcessingResult {
        run_batch(&self.config, inputs, &options.unwrap_or_default())
    }

    /// Registered component keywords.
    #[napi(getter)]
    pub fn components(&self) -> Vec<String> {
        self.config
            .registry
            .keywords()
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_returns_json_tree() {
        let config = InternalCompilerConfig::new(None).unwrap();
        let result = config.parse("text()").unwrap();
        assert_eq!(result.frontmatter, json!({}));
        assert_eq!(
            result.nodes,
            json!([{ "type": "text", "props": {}, "children": [] }])
        );
    }

    #[test]
    fn render_accepts_json_nodes() {
        let config = InternalCompilerConfig::new(None).unwrap();
        let output = config
            .render(json!([{ "type": "text", "props": { "size": "small" }, "content": "Hi" }]))
            .unwrap();
        assert_eq!(output.content, "<Text size=\"small\">Hi</Text>");
        assert_eq!(output.used_components, ["text"]);
    }

    #[test]
    fn custom_registry_and_target() {
        let config = InternalCompilerConfig::new(Some(CompilerConfig {
            registry: Some(json!({ "card": { "name": "leger-card", "props": ["title"] } })),
            target: Some("html".into()),
            components_dir: None,
        }))
        .unwrap();
        let result = config.compile("card(title=Hello)", None).unwrap();
        assert!(result.code.starts_with("<!DOCTYPE html>"));
        assert!(result.code.contains("<leger-card title=\"Hello\"></leger-card>"));
        assert!(config.compile("text()", None).is_err());
    }

    #[test]
    fn rejects_unknown_target() {
        let err = InternalCompilerConfig::new(Some(CompilerConfig {
            target: Some("react".into()),
            ..Default::default()
        }))
        .unwrap_err();
        assert!(err.reason.contains("react"));
    }

    #[test]
    fn compile_errors_carry_location() {
        let config = InternalCompilerConfig::new(None).unwrap();
        let err = config
            .compile("text(bad=1)", Some("pages/index.leg".into()))
            .unwrap_err();
        assert_eq!(
            err.reason,
            "Unknown property for component 'text' at pages/index.leg:1:6: bad"
        );
    }
}
