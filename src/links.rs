//! Anchors and hyperlinks.
//!
//! Links are recorded while the document is built, possibly before their
//! anchor exists. Resolution is a separate, side-effect free pass run when the
//! document is finished.

use crate::error::{Error, Result};
use folio_types::{AnchorName, Rect};
use std::collections::HashMap;

/// A resolved anchor position: 1-based page index and page-local y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub page: usize,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LinkTarget {
    Anchor(AnchorName),
    Uri(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingLink {
    pub page: usize,
    pub rect: Rect,
    pub target: LinkTarget,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Destination {
    Page { page: usize, y: f32 },
    Uri(String),
}

/// A link ready to be written as a `/Link` annotation on `page`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkAnnotation {
    pub page: usize,
    pub rect: Rect,
    pub destination: Destination,
}

#[derive(Debug, Default, Clone)]
pub struct LinkResolver {
    anchors: HashMap<AnchorName, Anchor>,
    pending: Vec<PendingLink>,
}

impl LinkResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines (or silently redefines) `name`.
    pub fn define_anchor(&mut self, name: impl Into<AnchorName>, page: usize, y: f32) {
        let name = name.into();
        if let Some(previous) = self.anchors.insert(name.clone(), Anchor { page, y }) {
            log::debug!(
                "Anchor '{}' moved from page {} to page {}",
                name,
                previous.page,
                page
            );
        }
    }

    pub fn anchor(&self, name: &str) -> Option<Anchor> {
        self.anchors.get(&AnchorName::from(name)).copied()
    }

    pub fn record_internal_link(&mut self, anchor: impl Into<AnchorName>, page: usize, rect: Rect) {
        self.pending.push(PendingLink {
            page,
            rect,
            target: LinkTarget::Anchor(anchor.into()),
        });
    }

    pub fn record_external_link(&mut self, uri: impl Into<String>, page: usize, rect: Rect) {
        self.pending.push(PendingLink {
            page,
            rect,
            target: LinkTarget::Uri(uri.into()),
        });
    }

    pub fn pending(&self) -> &[PendingLink] {
        &self.pending
    }

    /// Builds the annotation list. Links to undefined anchors are dropped.
    /// Calling this repeatedly yields the same list.
    pub fn resolve(&self) -> Vec<LinkAnnotation> {
        self.pending
            .iter()
            .filter_map(|link| {
                let destination = match &link.target {
                    LinkTarget::Uri(uri) => Destination::Uri(uri.clone()),
                    LinkTarget::Anchor(name) => match self.anchors.get(name) {
                        Some(anchor) => Destination::Page {
                            page: anchor.page,
                            y: anchor.y,
                        },
                        None => {
                            log::debug!(
                                "Dropping link on page {} to undefined anchor '{}'",
                                link.page,
                                name
                            );
                            return None;
                        }
                    },
                };
                Some(LinkAnnotation {
                    page: link.page,
                    rect: link.rect,
                    destination,
                })
            })
            .collect()
    }

    /// Like [`resolve`](Self::resolve), but fails on the first link whose
    /// anchor was never defined.
    pub fn resolve_strict(&self) -> Result<Vec<LinkAnnotation>> {
        if let Some(name) = self.unresolved().next() {
            return Err(Error::UnresolvedAnchor(name.clone()));
        }
        Ok(self.resolve())
    }

    pub fn unresolved(&self) -> impl Iterator<Item = &AnchorName> {
        self.pending.iter().filter_map(|link| match &link.target {
            LinkTarget::Anchor(name) if !self.anchors.contains_key(name) => Some(name),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Rect {
        Rect::new(72.0, 100.0, 50.0, 14.0)
    }

    #[test]
    fn forward_references_resolve() {
        let mut links = LinkResolver::new();
        links.record_internal_link("toc", 1, rect());
        links.define_anchor("toc", 2, 300.0);

        let annotations = links.resolve();
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].page, 1);
        assert_eq!(annotations[0].destination, Destination::Page { page: 2, y: 300.0 });
    }

    #[test]
    fn missing_anchors_are_dropped() {
        let mut links = LinkResolver::new();
        links.record_internal_link("nowhere", 1, rect());
        links.record_external_link("https://example.com", 1, rect());

        let annotations = links.resolve();
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].destination, Destination::Uri("https://example.com".into()));
        assert!(matches!(links.resolve_strict(), Err(Error::UnresolvedAnchor(name)) if name.as_str() == "nowhere"));
    }

    #[test]
    fn later_definitions_win() {
        let mut links = LinkResolver::new();
        links.define_anchor("a", 1, 10.0);
        links.define_anchor("a", 3, 20.0);
        assert_eq!(links.anchor("a"), Some(Anchor { page: 3, y: 20.0 }));
    }

    #[test]
    fn resolve_is_repeatable() {
        let mut links = LinkResolver::new();
        links.define_anchor("x", 1, 0.0);
        links.record_internal_link("x", 2, rect());
        assert_eq!(links.resolve(), links.resolve());
        assert_eq!(links.pending().len(), 1);
    }
}
