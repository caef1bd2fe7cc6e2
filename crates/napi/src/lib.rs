#![deny(missing_docs)]
//! Node.js bindings that surface leger's Rust implementation.

use napi_derive::napi;
use serde_json::Value as JsonValue;

/// Batch processing types and functions.
pub mod batch;
/// The stateful compiler and its configuration.
pub mod compiler;
/// NAPI-exposed data structures.
pub mod types;
/// Utility helpers.
mod utils;

pub use batch::*;
pub use compiler::LegerCompiler;
pub use types::*;

use compiler::InternalCompilerConfig;

/// Parses a page into `{ frontmatter, nodes }`.
///
/// `registry` is a generated component map; the built-in registry is used
/// when it is omitted.
#[napi]
pub fn parse(source: String, registry: Option<JsonValue>) -> napi::Result<ParseResult> {
    let config = InternalCompilerConfig::new(Some(CompilerConfig {
        registry,
        ..Default::default()
    }))?;
    config.parse(&source)
}

/// Renders a node forest into `{ content, usedComponents }`.
#[napi]
pub fn render(nodes: JsonValue, registry: Option<JsonValue>) -> napi::Result<RenderOutput> {
    let config = InternalCompilerConfig::new(Some(CompilerConfig {
        registry,
        ..Default::default()
    }))?;
    config.render(nodes)
}

/// Renders head markup (title, site name, description) from a frontmatter mapping.
#[napi(js_name = "renderFrontmatter")]
pub fn render_frontmatter(frontmatter: JsonValue) -> napi::Result<String> {
    let frontmatter: leger_core::Frontmatter = serde_json::from_value(frontmatter)
        .map_err(|e| napi::Error::from_reason(format!("Invalid frontmatter: {}", e)))?;
    Ok(leger_svelte::render_frontmatter(&frontmatter))
}

/// Compiles a single page into a Svelte component or HTML document.
///
/// # Example (JavaScript)
///
/// ```javascript
/// const { compile } = require('leger-napi');
///
/// const { code, usedComponents } = compile('section()\n  text(size=large) Hello', 'index.leg');
/// // usedComponents = ['section', 'text']
/// ```
#[napi]
pub fn compile(
    source: String,
    filepath: Option<String>,
    config: Option<CompilerConfig>,
) -> napi::Result<CompileResult> {
    InternalCompilerConfig::new(config)?.compile(&source, filepath)
}

/// Compiles multiple pages in parallel using Rayon.
///
/// # Example (JavaScript)
///
/// ```javascript
/// const { compileBatch } = require('leger-napi');
///
/// const inputs = [
///   { id: 'index.leg', source: 'text() Hello' },
///   { id: 'about.leg', source: 'text() About' },
/// ];
///
/// const result = compileBatch(inputs, { continueOnError: true });
/// console.log(`Processed ${result.stats.total} files in ${result.stats.processingTimeMs}ms`);
/// ```
#[napi(js_name = "compileBatch")]
pub fn compile_batch(
    inputs: Vec<BatchInput>,
    options: Option<BatchOptions>,
) -> napi::Result<BatchProcessingResult> {
    let opts = options.unwrap_or_default();
    let config = InternalCompilerConfig::new(opts.config.clone())?;
    Ok(batch::run_batch(&config, inputs, &opts))
}
