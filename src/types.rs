//! Strongly-typed string wrappers
//!
//! Anchors and fragment file names travel side by side through the writer,
//! the TOC and the assembler. Distinct types keep one from being passed
//! where the other is expected.
//!
//! - [`Anchor`] - URL fragment identifier (e.g., "pod-v1-core")
//! - [`FragmentName`] - file name inside the includes directory (e.g., "_overview.html")

use serde::Serialize;
use std::fmt;

/// URL fragment identifier, unique within the assembled document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Anchor(String);

impl Anchor {
    /// Wrap an already URL-safe identifier.
    ///
    /// Use [`crate::make_anchor`] to derive one from a display string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Anchor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Name of a fragment file relative to the includes directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FragmentName(String);

impl FragmentName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FragmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FragmentName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
