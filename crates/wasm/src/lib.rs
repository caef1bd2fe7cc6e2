use leger_core::{ComponentRegistry, Frontmatter, Node, Parser, default_registry};
use leger_svelte::{PageOptions, PageTarget, compile_page};
use serde::Serialize;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

// ============================================================================
// Compiler Config
// ============================================================================

/// Configuration accepted by the WASM compile function.
/// Mirrors the NAPI `CompilerConfig` for parity.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct WasmCompilerConfig {
    #[serde(default)]
    pub registry: Option<ComponentRegistry>,
    #[serde(default)]
    pub target: Option<PageTarget>,
    #[serde(default, alias = "componentsDir")]
    pub components_dir: Option<String>,
}

fn parse_config(config: JsValue) -> Result<WasmCompilerConfig, JsError> {
    if config.is_undefined() || config.is_null() {
        return Ok(WasmCompilerConfig::default());
    }
    serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))
}

fn parse_registry(registry: JsValue) -> Result<ComponentRegistry, JsError> {
    if registry.is_undefined() || registry.is_null() {
        return Ok(default_registry());
    }
    serde_wasm_bindgen::from_value(registry)
        .map_err(|e| JsError::new(&format!("Invalid registry: {}", e)))
}

/// Plain objects instead of JS `Map`s for props and frontmatter.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

// ============================================================================
// Parse / Render API
// ============================================================================

/// Parses a page into `{ frontmatter, nodes }`.
///
/// # Example (JavaScript)
///
/// ```javascript
/// import { parse } from './leger_wasm';
///
/// const { frontmatter, nodes } = parse('---\ntitle: Home\n---\ntext() Hello');
/// // nodes = [{ type: "text", props: {}, children: [], content: "Hello" }]
/// ```
#[wasm_bindgen]
pub fn parse(source: &str, registry: JsValue) -> Result<JsValue, JsError> {
    let registry = parse_registry(registry)?;
    let document = Parser::new(&registry)
        .parse(source)
        .map_err(|e| JsError::new(&e.to_string()))?;
    to_js(&document)
}

/// Renders a node forest into `{ content, usedComponents }`.
#[wasm_bindgen]
pub fn render(nodes: JsValue, registry: JsValue) -> Result<JsValue, JsError> {
    let registry = parse_registry(registry)?;
    let nodes: Vec<Node> = serde_wasm_bindgen::from_value(nodes)
        .map_err(|e| JsError::new(&format!("Invalid nodes: {}", e)))?;
    to_js(&leger_svelte::render(&nodes, &registry))
}

/// Renders head markup from a frontmatter mapping.
#[wasm_bindgen(js_name = renderFrontmatter)]
pub fn render_frontmatter(frontmatter: JsValue) -> Result<String, JsError> {
    let frontmatter: Frontmatter = if frontmatter.is_undefined() || frontmatter.is_null() {
        Frontmatter::default()
    } else {
        serde_wasm_bindgen::from_value(frontmatter)
            .map_err(|e| JsError::new(&format!("Invalid frontmatter: {}", e)))?
    };
    Ok(leger_svelte::render_frontmatter(&frontmatter))
}

/// Lists the keywords of a registry (the built-in one when omitted).
#[wasm_bindgen]
pub fn components(registry: JsValue) -> Result<js_sys::Array, JsError> {
    let registry = parse_registry(registry)?;
    Ok(registry.keywords().map(JsValue::from_str).collect())
}

// ============================================================================
// Compile API
// ============================================================================

/// Compiles a page into a Svelte component or an HTML document.
///
/// # Arguments
///
/// * `source` - The page source
/// * `filepath` - Optional file path used in error messages
/// * `config` - Optional `{ registry, target, componentsDir }`
///
/// # Returns
///
/// Returns `{ code, head, frontmatter, usedComponents }`.
#[wasm_bindgen]
pub fn compile(source: &str, filepath: Option<String>, config: JsValue) -> Result<JsValue, JsError> {
    let cfg = parse_config(config)?;
    let registry = cfg.registry.unwrap_or_else(default_registry);

    let mut options = PageOptions {
        target: cfg.target.unwrap_or_default(),
        file: filepath,
        ..Default::default()
    };
    if let Some(dir) = cfg.components_dir {
        options.components_dir = dir;
    }

    let page = compile_page(source, &registry, &options).map_err(|e| JsError::new(&e.to_string()))?;
    to_js(&page)
}
