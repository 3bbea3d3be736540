//! Shared test utilities.
//!
//! [`SiteBuilder`] assembles small sites node by node without writing JSON:
//!
//! ```rust
//! let site = SiteBuilder::new()
//!     .folder(2, 1, "products", &[("EN", "Products")])
//!     .page(3, 2, "shoes", &[("EN", "Shoes")])
//!     .start(2, 3)
//!     .build();
//! ```
//!
//! Every builder starts with locales `EN` (master) and `DE`, the formats
//! `html`, `print` (both `.html`) and `xml`, the resolutions `ORIGINAL`
//! (original) and `thumb`, and a root folder with id 1.

use std::collections::{BTreeMap, HashMap};

use crate::config::UrlPolicy;
use crate::media::{FileInfo, PictureData, PictureMeta};
use crate::site::{MediaRecord, NodeRecord, Site, SiteDocument};
use crate::types::{ElementKind, Locale, NodeId, OutputFormat, Resolution};

pub fn en() -> Locale {
    Locale::new("EN", "EN")
}

pub fn de() -> Locale {
    Locale::new("DE", "DE")
}

pub fn html() -> OutputFormat {
    OutputFormat::new("html", "html")
}

pub fn print() -> OutputFormat {
    OutputFormat::new("print", "html")
}

pub fn xml() -> OutputFormat {
    OutputFormat::new("xml", "xml")
}

/// Policy from `(key, value)` settings pairs.
pub fn policy(pairs: &[(&str, &str)]) -> UrlPolicy {
    let settings: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    UrlPolicy::from_settings(&settings)
}

pub struct SiteBuilder {
    document: SiteDocument,
}

impl SiteBuilder {
    pub fn new() -> Self {
        Self {
            document: SiteDocument {
                locales: vec![en(), de()],
                master_locale: "EN".to_string(),
                formats: vec![html(), print(), xml()],
                resolutions: vec![Resolution::original("ORIGINAL"), Resolution::new("thumb")],
                root: NodeId(1),
                nodes: vec![record(1, None, ElementKind::Folder, "root", &[])],
                overrides: Vec::new(),
            },
        }
    }

    pub fn formats(mut self, formats: Vec<OutputFormat>) -> Self {
        self.document.formats = formats;
        self
    }

    pub fn folder(self, id: u64, parent: u64, uid: &str, names: &[(&str, &str)]) -> Self {
        self.push(record(id, Some(parent), ElementKind::Folder, uid, names))
    }

    pub fn page(self, id: u64, parent: u64, uid: &str, names: &[(&str, &str)]) -> Self {
        self.push(record(id, Some(parent), ElementKind::PageRef, uid, names))
    }

    /// A node with no parent that is not the root.
    pub fn detached(self, id: u64, uid: &str) -> Self {
        self.push(record(id, None, ElementKind::Folder, uid, &[]))
    }

    /// Make `page` the start node of `folder`.
    pub fn start(mut self, folder: u64, page: u64) -> Self {
        if let Some(node) = self.document.nodes.iter_mut().find(|n| n.id == NodeId(folder)) {
            node.start_node = Some(NodeId(page));
        }
        self
    }

    /// A file asset with one extension per locale key.
    pub fn file(self, id: u64, parent: u64, uid: &str, files: &[(&str, &str)]) -> Self {
        let files = files
            .iter()
            .map(|(locale, ext)| {
                (
                    locale.to_string(),
                    FileInfo {
                        extension: ext.to_string(),
                    },
                )
            })
            .collect();
        let mut node = record(id, Some(parent), ElementKind::Media, uid, &[]);
        node.media = Some(MediaRecord::File { files });
        self.push(node)
    }

    /// A picture asset with `(resolution, extension)` pairs per locale key.
    pub fn picture(
        self,
        id: u64,
        parent: u64,
        uid: &str,
        pictures: &[(&str, &[(&str, &str)])],
    ) -> Self {
        let pictures = pictures
            .iter()
            .map(|(locale, variants)| {
                let variants: BTreeMap<String, PictureMeta> = variants
                    .iter()
                    .map(|(res, ext)| {
                        (
                            res.to_string(),
                            PictureMeta {
                                extension: ext.to_string(),
                            },
                        )
                    })
                    .collect();
                (locale.to_string(), PictureData(variants))
            })
            .collect();
        let mut node = record(id, Some(parent), ElementKind::Media, uid, &[]);
        node.media = Some(MediaRecord::Picture { pictures });
        self.push(node)
    }

    /// Set display names of an existing node.
    pub fn names(mut self, id: u64, names: &[(&str, &str)]) -> Self {
        if let Some(node) = self.document.nodes.iter_mut().find(|n| n.id == NodeId(id)) {
            node.names = names_map(names);
        }
        self
    }

    pub fn build(self) -> Site {
        Site::from_document(self.document).unwrap_or_else(|e| panic!("invalid test site: {e}"))
    }

    fn push(mut self, node: NodeRecord) -> Self {
        self.document.nodes.push(node);
        self
    }
}

fn names_map(names: &[(&str, &str)]) -> BTreeMap<String, String> {
    names
        .iter()
        .map(|(locale, name)| (locale.to_string(), name.to_string()))
        .collect()
}

fn record(
    id: u64,
    parent: Option<u64>,
    kind: ElementKind,
    uid: &str,
    names: &[(&str, &str)],
) -> NodeRecord {
    NodeRecord {
        id: NodeId(id),
        kind,
        uid: uid.to_string(),
        parent: parent.map(NodeId),
        names: names_map(names),
        start_node: None,
        media: None,
    }
}

/// A linear chain of `depth` folders under the root, ids `2..=depth + 1`,
/// each named `level<n>`. Returns the site and the deepest folder's id.
pub fn deep_site(depth: u64) -> (Site, NodeId) {
    let mut builder = SiteBuilder::new();
    for level in 1..=depth {
        let name = format!("level{level}");
        builder = builder.folder(level + 1, level, &name, &[]);
    }
    (builder.build(), NodeId(depth + 1))
}
