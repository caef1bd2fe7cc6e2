//! Component registry: keyword → rendered tag name and allowed properties.
//!
//! The registry is plain configuration data. It is built once (from the
//! built-in defaults or a generated component map) and then handed by
//! reference to the parser, the renderer, and code generation.

use crate::error::RegistryError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// A single registered component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    /// Rendered tag name (e.g., "Text", "Section").
    pub name: String,
    /// Property names the component accepts.
    #[serde(default)]
    pub props: BTreeSet<String>,
}

impl ComponentDescriptor {
    /// Creates a descriptor from a tag name and its allowed properties.
    pub fn new<I, S>(name: impl Into<String>, props: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            props: props.into_iter().map(Into::into).collect(),
        }
    }

    /// Check if a property name is accepted by this component.
    pub fn allows(&self, prop: &str) -> bool {
        self.props.contains(prop)
    }
}

/// Keyword → descriptor table.
///
/// Serialized as the generated component map:
///
/// ```json
/// { "text": { "name": "Text", "props": ["size"] } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentRegistry {
    components: BTreeMap<String, ComponentDescriptor>,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a component, builder style.
    ///
    /// # Example
    ///
    /// ```
    /// use leger_core::ComponentRegistry;
    ///
    /// let registry = ComponentRegistry::new()
    ///     .with_component("section", "Section", Vec::<String>::new())
    ///     .with_component("text", "Text", ["size"]);
    /// assert_eq!(registry.tag_name("text"), Some("Text"));
    /// assert!(registry.allows_prop("text", "size"));
    /// assert!(!registry.allows_prop("section", "size"));
    /// ```
    pub fn with_component<I, S>(
        mut self,
        keyword: impl Into<String>,
        name: impl Into<String>,
        props: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(keyword, ComponentDescriptor::new(name, props));
        self
    }

    /// Adds (or replaces) a component.
    pub fn insert(&mut self, keyword: impl Into<String>, descriptor: ComponentDescriptor) {
        self.components.insert(keyword.into(), descriptor);
    }

    /// Parses a generated component map in JSON form.
    pub fn from_json_str(input: &str) -> Result<Self, RegistryError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Parses a component map in YAML form.
    pub fn from_yaml_str(input: &str) -> Result<Self, RegistryError> {
        Ok(serde_yaml::from_str(input)?)
    }

    /// Loads a component map from disk, picking the format from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&raw),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&raw),
            _ => Err(RegistryError::UnsupportedFormat(
                path.display().to_string(),
            )),
        }
    }

    /// Get the descriptor registered for a keyword.
    pub fn get(&self, keyword: &str) -> Option<&ComponentDescriptor> {
        self.components.get(keyword)
    }

    /// Check if a keyword is registered.
    pub fn contains(&self, keyword: &str) -> bool {
        self.components.contains_key(keyword)
    }

    /// Get the rendered tag name for a keyword.
    pub fn tag_name(&self, keyword: &str) -> Option<&str> {
        self.get(keyword).map(|c| c.name.as_str())
    }

    /// Check if `prop` is allowed on `keyword`. Unknown keywords allow nothing.
    pub fn allows_prop(&self, keyword: &str, prop: &str) -> bool {
        self.get(keyword).is_some_and(|c| c.allows(prop))
    }

    /// Registered keywords in sorted order.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    /// Number of registered components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Check if the registry has no components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Creates the built-in registry shipped with the bundled components.
///
/// - `section` → `Section`, no properties
/// - `text` → `Text`, accepts `size`
pub fn default_registry() -> ComponentRegistry {
    ComponentRegistry::new()
        .with_component("section", "Section", Vec::<String>::new())
        .with_component("text", "Text", ["size"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_registry_has_text_and_section() {
        let registry = default_registry();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.tag_name("text"), Some("Text"));
        assert_eq!(registry.tag_name("section"), Some("Section"));
        assert!(registry.allows_prop("text", "size"));
        assert!(!registry.allows_prop("text", "color"));
        assert!(!registry.allows_prop("missing", "size"));
        assert_eq!(registry.keywords().collect::<Vec<_>>(), ["section", "text"]);
    }

    #[test]
    fn parses_generated_json_map() {
        let json = r#"{
            "button": { "name": "Button", "props": ["href", "variant"] },
            "divider": { "name": "Divider" }
        }"#;
        let registry = ComponentRegistry::from_json_str(json).unwrap();
        assert_eq!(registry.tag_name("button"), Some("Button"));
        assert!(registry.allows_prop("button", "variant"));
        assert!(registry.get("divider").unwrap().props.is_empty());
    }

    #[test]
    fn parses_yaml_map() {
        let yaml = "card:\n  name: Card\n  props:\n    - title\n";
        let registry = ComponentRegistry::from_yaml_str(yaml).unwrap();
        assert!(registry.allows_prop("card", "title"));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = ComponentRegistry::from_json_str("{ \"text\": 3 }").unwrap_err();
        assert!(matches!(err, RegistryError::Json(_)), "{err:?}");
    }

    #[test]
    fn from_path_dispatches_on_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"text": {{"name": "Text", "props": ["size"]}}}}"#).unwrap();
        let registry = ComponentRegistry::from_path(file.path()).unwrap();
        assert_eq!(registry.tag_name("text"), Some("Text"));

        let other = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        let err = ComponentRegistry::from_path(other.path()).unwrap_err();
        assert!(matches!(err, RegistryError::UnsupportedFormat(_)));
    }
}
