#![deny(missing_docs)]
//! Leger Svelte engine: markup rendering, head generation, and page codegen.

/// Page code generation (imports, templates, output paths).
pub mod codegen;
/// Head markup built from frontmatter.
pub mod head;
/// Node forest → nested component markup.
pub mod renderer;

pub use codegen::{
    CompiledPage, PageOptions, PageTarget, compile_page, html_document, is_source_file,
    output_path, route_page_path, svelte_head, svelte_imports,
};
pub use head::{DEFAULT_TITLE, render_frontmatter};
pub use renderer::{RenderResult, UsedComponents, render};
