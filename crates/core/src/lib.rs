#![deny(missing_docs)]
//! Leger core: component registry, frontmatter extraction, and page parsing.

/// Core error types.
pub mod error;
/// Frontmatter splitting and parsing.
pub mod frontmatter;
/// Indentation-based page body parser.
pub mod parse;
/// Component registry (keyword → tag name and allowed props).
pub mod registry;

pub use error::{LegerError, RegistryError, SourceLocation};
pub use frontmatter::{
    Frontmatter, FrontmatterValue, SplitContent, parse_frontmatter, split_content,
};
pub use parse::{Node, ParsedDocument, Parser, parse, parse_body};
pub use registry::{ComponentDescriptor, ComponentRegistry, default_registry};
