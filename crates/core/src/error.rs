use thiserror::Error;

/// Source location information for error reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Optional file path
    pub file: Option<String>,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            file: None,
            line,
            column,
        }
    }

    /// Create a source location with file information
    pub fn with_file(file: String, line: usize, column: usize) -> Self {
        Self {
            file: Some(file),
            line,
            column,
        }
    }

    /// Maps a body-relative location back onto the page.
    ///
    /// Lines shift down by `lines`; columns on the first body line shift right
    /// by `first_line_columns` (indentation trimmed off that line).
    pub(crate) fn relocate(
        mut self,
        lines: usize,
        first_line_columns: usize,
        file: Option<&str>,
    ) -> Self {
        if self.line == 1 {
            self.column += first_line_columns;
        }
        self.line += lines;
        if let Some(file) = file {
            self.file = Some(file.to_string());
        }
        self
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}:{}:{}", file, self.line, self.column)
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

/// Errors raised while parsing a page body.
///
/// Both variants abort the parse of the current document; nothing is
/// collected or recovered internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LegerError {
    /// A line names a keyword that is not in the component registry.
    #[error("Unknown component at {location}: {name}")]
    UnknownComponent {
        /// Keyword as written in the source
        name: String,
        /// Source location
        location: SourceLocation,
    },
    /// A line passes a property the component does not declare.
    #[error("Unknown property for component '{component}' at {location}: {property}")]
    UnknownProperty {
        /// Component keyword
        component: String,
        /// Offending property key
        property: String,
        /// Source location
        location: SourceLocation,
    },
}

impl LegerError {
    /// Create an unknown component error with location
    pub fn unknown_component(name: impl Into<String>, line: usize, column: usize) -> Self {
        Self::UnknownComponent {
            name: name.into(),
            location: SourceLocation::new(line, column),
        }
    }

    /// Create an unknown property error with location
    pub fn unknown_property(
        component: impl Into<String>,
        property: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self::UnknownProperty {
            component: component.into(),
            property: property.into(),
            location: SourceLocation::new(line, column),
        }
    }

    /// Get the location of this error
    pub fn location(&self) -> &SourceLocation {
        match self {
            LegerError::UnknownComponent { location, .. } => location,
            LegerError::UnknownProperty { location, .. } => location,
        }
    }

    /// Check if this is an unknown component error
    pub fn is_unknown_component(&self) -> bool {
        matches!(self, LegerError::UnknownComponent { .. })
    }

    /// Check if this is an unknown property error
    pub fn is_unknown_property(&self) -> bool {
        matches!(self, LegerError::UnknownProperty { .. })
    }

    pub(crate) fn relocate(
        self,
        lines: usize,
        first_line_columns: usize,
        file: Option<&str>,
    ) -> Self {
        match self {
            LegerError::UnknownComponent { name, location } => LegerError::UnknownComponent {
                name,
                location: location.relocate(lines, first_line_columns, file),
            },
            LegerError::UnknownProperty {
                component,
                property,
                location,
            } => LegerError::UnknownProperty {
                component,
                property,
                location: location.relocate(lines, first_line_columns, file),
            },
        }
    }
}

/// Errors emitted while loading a component registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// IO error while reading the registry file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON registry failed to parse.
    #[error("Registry JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// YAML registry failed to parse.
    #[error("Registry YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// The registry file extension is neither JSON nor YAML.
    #[error("Unsupported registry file: {0}")]
    UnsupportedFormat(String),
}
