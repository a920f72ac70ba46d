//! Table of contents built while fragments are written.
//!
//! Nodes live in an arena and refer to their children by index. Top-level
//! sections are kept in the order they were opened; that order, walked
//! depth-first, is the order the assembler concatenates fragments in.
//!
//! The most recently opened section acts as the default parent for child
//! entries, so call sites that don't hold a [`SectionId`] still attach to the
//! section they logically belong to.

use crate::types::{Anchor, FragmentName};
use crate::{Error, Result};
use serde::Serialize;
use std::collections::HashSet;

/// Index of a node in the TOC arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Handle to a top-level section, usable as an explicit parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionId(NodeId);

impl SectionId {
    pub fn node(self) -> NodeId {
        self.0
    }
}

/// What a TOC entry stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TocKind {
    /// Top-level section heading
    Section,
    Resource,
    Operation,
    /// Type definition; assembled into the body but kept out of the nav
    Definition,
    /// In-page outline entry without a fragment of its own
    Outline,
}

/// One entry in the table of contents.
#[derive(Debug, Clone)]
pub struct TocNode {
    /// Nesting depth (1 for top-level sections)
    pub level: u8,
    /// Display title; may contain markup
    pub title: String,
    pub anchor: Anchor,
    /// Fragment file holding this entry's content, if it has one
    pub file: Option<FragmentName>,
    pub kind: TocKind,
    children: Vec<NodeId>,
}

impl TocNode {
    pub fn new(level: u8, title: impl Into<String>, anchor: Anchor, kind: TocKind) -> Self {
        Self {
            level,
            title: title.into(),
            anchor,
            file: None,
            kind,
            children: Vec::new(),
        }
    }

    pub fn with_file(mut self, file: FragmentName) -> Self {
        self.file = Some(file);
        self
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// The document root: title, node arena and top-level sections.
#[derive(Debug, Clone)]
pub struct Toc {
    title: String,
    nodes: Vec<TocNode>,
    sections: Vec<NodeId>,
    current: Option<SectionId>,
    anchors: HashSet<Anchor>,
}

impl Toc {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            nodes: Vec::new(),
            sections: Vec::new(),
            current: None,
            anchors: HashSet::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Append a top-level section and make it the current one.
    pub fn open_section(&mut self, node: TocNode) -> Result<SectionId> {
        let id = self.push(node)?;
        self.sections.push(id);
        let section = SectionId(id);
        self.current = Some(section);
        Ok(section)
    }

    /// The section children attach to when no parent is given.
    pub fn current_section(&self) -> Option<SectionId> {
        self.current
    }

    /// Resolve an optional parent to a section, defaulting to the current
    /// one. `what` names the entry being written, for the error message.
    pub fn resolve_parent(
        &self,
        parent: Option<SectionId>,
        what: &'static str,
    ) -> Result<SectionId> {
        match parent {
            Some(section) if self.sections.contains(&section.0) => Ok(section),
            Some(section) => Err(Error::UnknownSection(section.0.0)),
            None => self.current.ok_or(Error::NoOpenSection { what }),
        }
    }

    /// Attach a child to `parent`, or to the current section when `None`.
    pub fn attach(
        &mut self,
        parent: Option<SectionId>,
        node: TocNode,
        what: &'static str,
    ) -> Result<NodeId> {
        let section = self.resolve_parent(parent, what)?;
        self.attach_to(section.0, node)
    }

    /// Attach a child below any existing node of this TOC.
    pub fn attach_to(&mut self, parent: NodeId, node: TocNode) -> Result<NodeId> {
        if parent.0 >= self.nodes.len() {
            return Err(Error::UnknownSection(parent.0));
        }
        let id = self.push(node)?;
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    fn push(&mut self, node: TocNode) -> Result<NodeId> {
        if !self.anchors.insert(node.anchor.clone()) {
            return Err(Error::DuplicateAnchor(node.anchor));
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        Ok(id)
    }

    pub fn node(&self, id: NodeId) -> &TocNode {
        &self.nodes[id.0]
    }

    /// Top-level sections in the order they were opened.
    pub fn sections(&self) -> impl Iterator<Item = &TocNode> {
        self.sections.iter().map(|id| self.node(*id))
    }

    /// Every anchor registered so far.
    pub fn anchors(&self) -> &HashSet<Anchor> {
        &self.anchors
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth-first pre-order walk over all nodes, to any depth.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            toc: self,
            stack: self.sections.iter().rev().copied().collect(),
        }
    }

    /// Navigation view of the tree, leaving out definitions.
    pub fn nav(&self) -> Nav<'_> {
        Nav {
            title: &self.title,
            sections: self.nav_items(&self.sections),
        }
    }

    fn nav_items(&self, ids: &[NodeId]) -> Vec<NavItem<'_>> {
        ids.iter()
            .map(|id| self.node(*id))
            .filter(|node| node.kind != TocKind::Definition)
            .map(|node| NavItem {
                level: node.level,
                title: &node.title,
                anchor: &node.anchor,
                kind: node.kind,
                children: self.nav_items(&node.children),
            })
            .collect()
    }
}

/// Pre-order iterator returned by [`Toc::walk`].
pub struct Walk<'a> {
    toc: &'a Toc,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a TocNode;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.toc.node(id);
        self.stack.extend(node.children.iter().rev().copied());
        Some(node)
    }
}

/// Navigation tree handed to the index template.
#[derive(Debug, Serialize)]
pub struct Nav<'a> {
    pub title: &'a str,
    pub sections: Vec<NavItem<'a>>,
}

#[derive(Debug, Serialize)]
pub struct NavItem<'a> {
    pub level: u8,
    pub title: &'a str,
    pub anchor: &'a Anchor,
    pub kind: TocKind,
    pub children: Vec<NavItem<'a>>,
}
