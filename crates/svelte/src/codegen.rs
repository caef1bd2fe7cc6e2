//! Page code generation: import blocks, document templates, and output paths.
//!
//! This is the glue between the parser/renderer and whatever writes files or
//! serves pages. Everything here is a pure function of its inputs.

use crate::head::render_frontmatter;
use crate::renderer::{UsedComponents, render};
use leger_core::{ComponentRegistry, Frontmatter, LegerError, Parser};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt::Write as FmtWrite;
use std::path::{Path, PathBuf};

/// Extension of source pages.
pub const SOURCE_EXTENSION: &str = "leg";

/// Default import prefix for Svelte component files.
pub const DEFAULT_COMPONENTS_DIR: &str = "$lib/components";

/// Custom-element bundle referenced by HTML pages.
pub const COMPONENTS_SCRIPT_PATH: &str = "/scripts/components.iife.js";

/// Stylesheet referenced by HTML pages.
pub const STYLESHEET_PATH: &str = "styles/style.css";

/// Output flavour of a compiled page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageTarget {
    /// A Svelte page component importing the used components.
    #[default]
    Svelte,
    /// A standalone HTML document using the custom-element bundle.
    Html,
}

impl PageTarget {
    /// File extension written for this target.
    pub fn extension(self) -> &'static str {
        match self {
            PageTarget::Svelte => "svelte",
            PageTarget::Html => "html",
        }
    }
}

/// Options for [`compile_page`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageOptions {
    /// Output flavour.
    pub target: PageTarget,
    /// Import prefix for Svelte component files.
    pub components_dir: String,
    /// File name used in error locations.
    pub file: Option<String>,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            target: PageTarget::default(),
            components_dir: DEFAULT_COMPONENTS_DIR.to_string(),
            file: None,
        }
    }
}

/// A fully generated page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledPage {
    /// Generated page source.
    pub code: String,
    /// Head markup built from the frontmatter.
    pub head: String,
    /// Parsed frontmatter.
    pub frontmatter: Frontmatter,
    /// Component keywords referenced by the page.
    pub used_components: UsedComponents,
}

/// Builds the `<script>` block importing every used component.
///
/// # Example
///
/// ```
/// use leger_core::default_registry;
/// use leger_svelte::{UsedComponents, svelte_imports};
///
/// let used: UsedComponents = ["section", "text"].into_iter().collect();
/// assert_eq!(
///     svelte_imports(&used, &default_registry(), "$lib/components"),
///     "<script>\n    import Section from '$lib/components/Section.svelte';\n    import Text from '$lib/components/Text.svelte';\n</script>"
/// );
/// ```
pub fn svelte_imports(
    used: &UsedComponents,
    registry: &ComponentRegistry,
    components_dir: &str,
) -> String {
    let components_dir = components_dir.trim_end_matches('/');
    let mut code = String::from("<script>\n");
    let imports: Vec<String> = used
        .iter()
        .map(|keyword| {
            let name = registry.tag_name(keyword).unwrap_or(keyword);
            format!("    import {name} from '{components_dir}/{name}.svelte';")
        })
        .collect();
    code.push_str(&imports.join("\n"));
    code.push_str("\n</script>");
    code
}

/// Wraps head markup for a Svelte page.
pub fn svelte_head(head: &str) -> String {
    format!("<svelte:head>\n{}\n</svelte:head>", indent_lines(head, "  "))
}

/// Wraps rendered markup in the standalone HTML document template.
pub fn html_document(head: &str, body: &str) -> String {
    let mut code = String::new();
    let _ = writeln!(code, "<!DOCTYPE html>");
    let _ = writeln!(code, "<html lang=\"en\">");
    let _ = writeln!(code, "<head>");
    let _ = writeln!(code, "  <meta charset=\"UTF-8\" />");
    let _ = writeln!(code, "{}", indent_lines(head, "  "));
    let _ = writeln!(
        code,
        "  <link rel=\"stylesheet\" href=\"{}\" />",
        STYLESHEET_PATH
    );
    let _ = writeln!(code, "</head>");
    let _ = writeln!(code, "<body>");
    let _ = writeln!(code, "{}", body);
    let _ = writeln!(code);
    let _ = writeln!(
        code,
        "  <script src=\"{}\" type=\"module\"></script>",
        COMPONENTS_SCRIPT_PATH
    );
    let _ = writeln!(code, "</body>");
    let _ = write!(code, "</html>");
    code
}

/// Parses, renders, and wraps one page.
///
/// Svelte pages are the import block, the `<svelte:head>` block, and the body
/// separated by blank lines. HTML pages are a full document.
pub fn compile_page(
    source: &str,
    registry: &ComponentRegistry,
    options: &PageOptions,
) -> Result<CompiledPage, LegerError> {
    let mut parser = Parser::new(registry);
    if let Some(file) = &options.file {
        parser = parser.with_file(file.clone());
    }

    let document = parser.parse(source)?;
    let rendered = render(&document.nodes, registry);
    let head = render_frontmatter(&document.frontmatter);

    let code = match options.target {
        PageTarget::Svelte => [
            svelte_imports(
                &rendered.used_components,
                registry,
                &options.components_dir,
            ),
            svelte_head(&head),
            rendered.content,
        ]
        .join("\n\n"),
        PageTarget::Html => html_document(&head, &rendered.content),
    };

    debug!(
        "Compiled {} ({} component kinds)",
        options.file.as_deref().unwrap_or("<inline>"),
        rendered.used_components.len()
    );

    Ok(CompiledPage {
        code,
        head,
        frontmatter: document.frontmatter,
        used_components: rendered.used_components,
    })
}

/// Check if `path` is a source page.
pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == SOURCE_EXTENSION)
}

/// Output file for `source` inside `out_dir`: same stem, target extension.
///
/// ```
/// use leger_svelte::{PageTarget, output_path};
/// use std::path::Path;
///
/// assert_eq!(
///     output_path(Path::new("pages/about.leg"), Path::new("out"), PageTarget::Svelte),
///     Path::new("out/about.svelte")
/// );
/// ```
pub fn output_path(source: &Path, out_dir: &Path, target: PageTarget) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    out_dir.join(format!("{}.{}", stem, target.extension()))
}

/// SvelteKit route file for a page named `name` (`index` maps to the root).
pub fn route_page_path(name: &str, routes_dir: &Path) -> PathBuf {
    if name == "index" {
        routes_dir.join("+page.svelte")
    } else {
        routes_dir.join(name).join("+page.svelte")
    }
}

fn indent_lines(text: &str, indent: &str) -> String {
    text.lines()
        .map(|line| format!("{indent}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use leger_core::default_registry;

    #[test]
    fn imports_block_without_components() {
        let used = UsedComponents::default();
        assert_eq!(
            svelte_imports(&used, &default_registry(), DEFAULT_COMPONENTS_DIR),
            "<script>\n\n</script>"
        );
    }

    #[test]
    fn imports_respect_custom_dir() {
        let used: UsedComponents = ["text"].into_iter().collect();
        assert_eq!(
            svelte_imports(&used, &default_registry(), "./components/"),
            "<script>\n    import Text from './components/Text.svelte';\n</script>"
        );
    }

    #[test]
    fn svelte_head_indents_lines() {
        assert_eq!(
            svelte_head("<title>A</title>\n<meta name=\"description\" content=\"B\">"),
            "<svelte:head>\n  <title>A</title>\n  <meta name=\"description\" content=\"B\">\n</svelte:head>"
        );
    }

    #[test]
    fn compile_page_reports_file_in_errors() {
        let options = PageOptions {
            file: Some("pages/index.leg".into()),
            ..Default::default()
        };
        let err = compile_page("text(color=red)", &default_registry(), &options).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown property for component 'text' at pages/index.leg:1:6: color"
        );
    }

    #[test]
    fn compile_page_exposes_frontmatter_and_components() {
        let page = compile_page(
            "---\ntitle: Home\n---\nsection()\n  text() Hi",
            &default_registry(),
            &PageOptions::default(),
        )
        .unwrap();
        assert_eq!(page.frontmatter.get_str("title"), Some("Home"));
        assert_eq!(page.head, "<title>Home</title>");
        assert_eq!(page.used_components.iter().collect::<Vec<_>>(), ["section", "text"]);
        assert!(page.code.starts_with("<script>\n    import Section"));
    }

    #[test]
    fn detects_source_files() {
        assert!(is_source_file(Path::new("pages/index.leg")));
        assert!(!is_source_file(Path::new("pages/index.svelte")));
        assert!(!is_source_file(Path::new("pages/leg")));
    }

    #[test]
    fn output_path_swaps_extension() {
        assert_eq!(
            output_path(Path::new("/site/pages/index.leg"), Path::new("/tmp/out"), PageTarget::Html),
            PathBuf::from("/tmp/out/index.html")
        );
    }

    #[test]
    fn route_paths() {
        let routes = Path::new("src/routes");
        assert_eq!(route_page_path("index", routes), routes.join("+page.svelte"));
        assert_eq!(
            route_page_path("about", routes),
            routes.join("about").join("+page.svelte")
        );
    }

    #[test]
    fn page_options_deserialize_with_defaults() {
        let options: PageOptions = serde_json::from_str(r#"{ "target": "html" }"#).unwrap();
        assert_eq!(options.target, PageTarget::Html);
        assert_eq!(options.components_dir, DEFAULT_COMPONENTS_DIR);
        assert_eq!(options.file, None);
    }
}
