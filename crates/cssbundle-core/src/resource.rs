/*
 * resource.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Stylesheet resources and their classification.
 */

use std::fmt;

/// Content type of a stylesheet resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResourceType {
    /// Plain CSS
    #[default]
    Css,
    /// Sass, either SCSS or indented syntax
    Scss,
}

impl ResourceType {
    /// Classify a file extension (without the leading dot).
    pub fn from_extension(ext: &str) -> Self {
        if ext.eq_ignore_ascii_case("scss") || ext.eq_ignore_ascii_case("sass") {
            ResourceType::Scss
        } else {
            ResourceType::Css
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Css => "css",
            ResourceType::Scss => "scss",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stylesheet identified by its uri.
///
/// Resources are immutable once created. Two resources are equal when both
/// their uri and their type match, which is what duplicate-import detection
/// relies on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Resource {
    uri: String,
    kind: ResourceType,
}

impl Resource {
    pub fn new(uri: impl Into<String>, kind: ResourceType) -> Self {
        Self {
            uri: uri.into(),
            kind,
        }
    }

    /// Create a CSS resource.
    pub fn css(uri: impl Into<String>) -> Self {
        Self::new(uri, ResourceType::Css)
    }

    /// Create a SCSS resource.
    pub fn scss(uri: impl Into<String>) -> Self {
        Self::new(uri, ResourceType::Scss)
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn kind(&self) -> ResourceType {
        self.kind
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

/// Decides which [`ResourceType`] a locator denotes.
///
/// The resolver uses this when it builds [`Resource`] values for discovered
/// imports.
pub trait ResourceClassifier: Send + Sync {
    fn classify(&self, uri: &str) -> ResourceType;
}

/// Classifies resources by the extension of their path.
///
/// Query strings and fragments are ignored, so `theme.scss?v=2` is SCSS.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionClassifier;

impl ResourceClassifier for ExtensionClassifier {
    fn classify(&self, uri: &str) -> ResourceType {
        let path = uri.split(['?', '#']).next().unwrap_or(uri);
        let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
        match file_name.rsplit_once('.') {
            Some((_, ext)) => ResourceType::from_extension(ext),
            None => ResourceType::Css,
        }
    }
}
