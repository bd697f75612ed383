//! Newtype wrappers for resource ids and anchor names
//!
//! These types keep font slots, image slots and anchor names from being mixed
//! up with each other or with plain integers/strings.

use std::fmt;
use std::sync::Arc;

/// Slot of a registered font. Assigned once, never reused within a document.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct FontId(pub(crate) u32);

impl FontId {
    pub fn new(slot: u32) -> Self {
        Self(slot)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Name used for this font in a page's resource dictionary.
    pub fn resource_name(self) -> String {
        format!("F{}", self.0)
    }
}

impl fmt::Display for FontId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{}", self.0)
    }
}

/// Slot of a registered image. Assigned once, never reused within a document.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub(crate) u32);

impl ImageId {
    pub fn new(slot: u32) -> Self {
        Self(slot)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Name used for this image in a page's resource dictionary.
    pub fn resource_name(self) -> String {
        format!("Im{}", self.0)
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Im{}", self.0)
    }
}

/// The name of a document anchor (target of internal links).
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct AnchorName(Arc<str>);

impl AnchorName {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for AnchorName {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for AnchorName {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl AsRef<str> for AnchorName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnchorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
