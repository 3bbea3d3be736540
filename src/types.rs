//! Shared types used by the tree, naming, and media modules.
//!
//! These are plain data: identifiers, locales, output formats, resolutions and
//! the per-request page parameters. The site document ([`crate::site`])
//! deserializes into most of them directly.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entity::Entity;

/// Identifier of a node in the content tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a node is. Only page references take part in content projection,
/// only media nodes have binary data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Folder,
    PageRef,
    Media,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::Folder => "folder",
            ElementKind::PageRef => "page ref",
            ElementKind::Media => "media",
        };
        f.write_str(name)
    }
}

/// A project language.
///
/// The abbreviation is what locale-specific record fields are suffixed with
/// (`title_EN`). Two locales are the same locale when their ids match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Locale {
    pub id: String,
    pub abbreviation: String,
}

impl Locale {
    pub fn new(id: impl Into<String>, abbreviation: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            abbreviation: abbreviation.into(),
        }
    }
}

impl PartialEq for Locale {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Locale {}

/// A rendering target ("template set") and the file extension it produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputFormat {
    pub id: String,
    pub extension: String,
}

impl OutputFormat {
    pub fn new(id: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            extension: extension.into(),
        }
    }
}

impl PartialEq for OutputFormat {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for OutputFormat {}

/// A named picture variant (`thumb`, `teaser`, ...).
///
/// The original resolution is the uploaded picture itself and never puts a
/// resolution token into the file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub uid: String,
    #[serde(default)]
    pub original: bool,
}

impl Resolution {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            original: false,
        }
    }

    pub fn original(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            original: true,
        }
    }
}

/// Records bound to a page for content projection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentProjection {
    /// Records rendered on this page. Projection naming needs exactly one.
    pub records: Vec<Entity>,
    /// Dot-separated path into the record (`author.name`), optionally
    /// suffixed with `*`.
    pub sitemap_variable: Option<String>,
}

/// Per-request page parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageParams {
    /// Zero for the first logical page of a node.
    pub index: usize,
    /// Appended as `_<suffix>` to the page name when non-empty.
    pub page_suffix: String,
    /// Set for content projection requests.
    pub projection: Option<ContentProjection>,
}

impl PageParams {
    /// Parameters for the first page of a plain (non-projected) node.
    pub fn first() -> Self {
        Self::default()
    }

    /// Parameters for one page of a multi-page node.
    pub fn page(index: usize, page_suffix: impl Into<String>) -> Self {
        Self {
            index,
            page_suffix: page_suffix.into(),
            projection: None,
        }
    }

    /// Parameters for a page projecting a single record.
    pub fn projected(record: Entity, sitemap_variable: impl Into<String>) -> Self {
        Self {
            index: 0,
            page_suffix: String::new(),
            projection: Some(ContentProjection {
                records: vec![record],
                sitemap_variable: Some(sitemap_variable.into()),
            }),
        }
    }

    /// The single record and variable name when this request qualifies for
    /// projection naming.
    pub(crate) fn single_projection(&self) -> Option<(&Entity, &str)> {
        let projection = self.projection.as_ref()?;
        if projection.records.len() != 1 {
            return None;
        }
        let variable = projection.sitemap_variable.as_deref()?;
        Some((&projection.records[0], variable))
    }
}
