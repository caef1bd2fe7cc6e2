//! Shared conversion helpers.

use crate::types::{CompileResult, CompilerConfig};
use leger_core::{ComponentRegistry, LegerError, default_registry};
use leger_svelte::{CompiledPage, PageOptions, PageTarget};
use napi::{Error, Status};
use serde_json::Value as JsonValue;

pub(crate) fn leger_error(err: LegerError) -> Error {
    Error::new(Status::InvalidArg, err.to_string())
}

pub(crate) fn resolve_registry(value: Option<JsonValue>) -> napi::Result<ComponentRegistry> {
    match value {
        None | Some(JsonValue::Null) => Ok(default_registry()),
        Some(value) => serde_json::from_value(value)
            .map_err(|e| Error::new(Status::InvalidArg, format!("Invalid registry: {}", e))),
    }
}

pub(crate) fn parse_target(target: Option<&str>) -> napi::Result<PageTarget> {
    match target {
        None | Some("svelte") => Ok(PageTarget::Svelte),
        Some("html") => Ok(PageTarget::Html),
        Some(other) => Err(Error::new(
            Status::InvalidArg,
            format!("Unknown target '{}': expected 'svelte' or 'html'", other),
        )),
    }
}

pub(crate) fn page_options(config: &CompilerConfig) -> napi::Result<PageOptions> {
    let mut options = PageOptions {
        target: parse_target(config.target.as_deref())?,
        ..Default::default()
    };
    if let Some(dir) = &config.components_dir {
        options.components_dir = dir.clone();
    }
    Ok(options)
}

pub(crate) fn to_json<T: serde::Serialize>(value: &T) -> napi::Result<JsonValue> {
    serde_json::to_value(value).map_err(|e| Error::from_reason(e.to_string()))
}

pub(crate) fn compile_result(page: CompiledPage) -> napi::Result<CompileResult> {
    Ok(CompileResult {
        frontmatter: to_json(&page.frontmatter)?,
        code: page.code,
        head: page.head,
        used_components: page.used_components.into_vec(),
    })
}
