//! Browse node (category) views.

use crate::amazon::models::BrowseNodeSummary;
use crate::amazon::xml::Element;

/// A node in the catalog's category tree.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowseNode {
    element: Element,
}

impl BrowseNode {
    pub fn new(element: Element) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn id(&self) -> Option<u64> {
        self.element.find_text("BrowseNodeId")?.parse().ok()
    }

    pub fn name(&self) -> Option<&str> {
        self.element.find_text("Name")
    }

    pub fn is_category_root(&self) -> bool {
        matches!(self.element.find_text("IsCategoryRoot"), Some("1") | Some("true") | Some("True"))
    }

    /// The immediate parent node.
    pub fn ancestor(&self) -> Option<BrowseNode> {
        self.element.find("Ancestors.BrowseNode").cloned().map(BrowseNode::new)
    }

    /// Every ancestor, nearest first.
    pub fn ancestors(&self) -> Vec<BrowseNode> {
        let mut ancestors = Vec::new();
        let mut node = self.ancestor();
        while let Some(current) = node {
            node = current.ancestor();
            ancestors.push(current);
        }
        ancestors
    }

    pub fn children(&self) -> Vec<BrowseNode> {
        self.element
            .find_all("Children.BrowseNode")
            .into_iter()
            .cloned()
            .map(BrowseNode::new)
            .collect()
    }

    pub fn summary(&self) -> BrowseNodeSummary {
        let names = |nodes: Vec<BrowseNode>| {
            nodes.iter().filter_map(|n| n.name().map(str::to_string)).collect::<Vec<_>>()
        };
        BrowseNodeSummary {
            id: self.id(),
            name: self.name().map(str::to_string),
            is_category_root: self.is_category_root(),
            ancestors: names(self.ancestors()),
            children: names(self.children()),
        }
    }
}
