//! Read-only access to the content tree.
//!
//! The factory never owns or mutates the tree. Everything it needs goes
//! through [`ContentTree`], which the in-memory [`Site`](crate::site::Site)
//! implements and which a host application can implement over its own store.

use crate::types::{ElementKind, Locale, NodeId, OutputFormat};

pub trait ContentTree {
    /// The tree's root folder.
    fn root(&self) -> NodeId;

    /// Parent of `node`; `None` for the root and for unknown nodes.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Kind of `node`; `None` if the tree has no such node.
    fn kind(&self, node: NodeId) -> Option<ElementKind>;

    /// Machine-readable short name. Present for every node of the tree.
    fn uid(&self, node: NodeId) -> Option<&str>;

    /// Display name of `node` in `locale`, if one is set.
    fn display_name(&self, node: NodeId, locale: &Locale) -> Option<&str>;

    /// The project's master language, the last locale fallback.
    fn master_locale(&self) -> &Locale;

    /// Output formats in project order.
    fn output_formats(&self) -> &[OutputFormat];

    /// Designated start page of `folder`.
    fn start_node(&self, folder: NodeId) -> Option<NodeId>;

    /// File extension of `node` rendered in `format`.
    fn extension(&self, _node: NodeId, format: &OutputFormat) -> String {
        format.extension.clone()
    }

    fn is_root(&self, node: NodeId) -> bool {
        node == self.root()
    }
}
