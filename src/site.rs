//! In-memory site model loaded from JSON.
//!
//! A site document describes the whole tree: languages, output formats,
//! nodes, media binaries and path overrides.
//!
//! ```json
//! {
//!   "locales": [{"id": "EN", "abbreviation": "EN"}, {"id": "DE", "abbreviation": "DE"}],
//!   "master_locale": "EN",
//!   "formats": [{"id": "html", "extension": "html"}],
//!   "resolutions": [{"uid": "ORIGINAL", "original": true}, {"uid": "thumb"}],
//!   "root": 1,
//!   "nodes": [
//!     {"id": 1, "kind": "folder", "uid": "root", "start_node": 3},
//!     {"id": 2, "kind": "folder", "uid": "products", "parent": 1, "names": {"EN": "Products"}},
//!     {"id": 3, "kind": "page_ref", "uid": "home", "parent": 1, "names": {"EN": "Home"}},
//!     {"id": 4, "kind": "media", "uid": "logo", "parent": 1,
//!      "media": {"type": "picture", "pictures": {"*": {"thumb": {"extension": "jpg"}}}}}
//!   ],
//!   "overrides": [{"node": 2, "path": "shop", "locale": "EN"}]
//! }
//! ```
//!
//! Media entries keyed `*` are language independent and are used when the
//! requested locale has no entry of its own.
//!
//! ## Validation
//!
//! Loading rejects documents the factory could loop on or misreport:
//! duplicate ids, a missing or parented root, dangling parents, parent
//! cycles, undeclared master locale, start nodes outside their folder,
//! media nodes without media data, and overrides naming unknown nodes,
//! locales or formats. Parentless nodes other than the root are allowed;
//! asking for their URL fails with [`UrlError::Detached`](crate::error::UrlError::Detached).

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::lookup::PathOverrides;
use crate::media::{FileInfo, MediaKind, MediaStore, Picture, PictureData};
use crate::tree::ContentTree;
use crate::types::{ElementKind, Locale, NodeId, OutputFormat, Resolution};

/// Media entry key for language-independent binaries.
pub const ANY_LOCALE: &str = "*";

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Duplicate node id {0}")]
    DuplicateNode(NodeId),
    #[error("Root node {0} does not exist")]
    MissingRoot(NodeId),
    #[error("Root node {0} must not have a parent")]
    RootHasParent(NodeId),
    #[error("Node {node} has unknown parent {parent}")]
    UnknownParent { node: NodeId, parent: NodeId },
    #[error("Parent chain of node {0} contains a cycle")]
    Cycle(NodeId),
    #[error("Master locale {0} is not a declared locale")]
    UnknownMasterLocale(String),
    #[error("Start node {start} of folder {folder} is not one of its children")]
    StartNodeNotChild { folder: NodeId, start: NodeId },
    #[error("Media node {0} has no media data")]
    MissingMedia(NodeId),
    #[error("Override refers to unknown node {0}")]
    UnknownOverrideNode(NodeId),
    #[error("Unknown locale: {0}")]
    UnknownLocale(String),
    #[error("Unknown output format: {0}")]
    UnknownFormat(String),
}

/// The serialized form of a site.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteDocument {
    pub locales: Vec<Locale>,
    pub master_locale: String,
    pub formats: Vec<OutputFormat>,
    #[serde(default)]
    pub resolutions: Vec<Resolution>,
    pub root: NodeId,
    pub nodes: Vec<NodeRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<OverrideRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeRecord {
    pub id: NodeId,
    pub kind: ElementKind,
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
    /// Display names by locale id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub names: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_node: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaRecord>,
}

/// Binaries of a media node, keyed by locale id or [`ANY_LOCALE`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MediaRecord {
    File {
        files: BTreeMap<String, FileInfo>,
    },
    Picture {
        pictures: BTreeMap<String, PictureData>,
    },
}

impl MediaRecord {
    fn kind(&self) -> MediaKind {
        match self {
            MediaRecord::File { .. } => MediaKind::File,
            MediaRecord::Picture { .. } => MediaKind::Picture,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverrideRecord {
    pub node: NodeId,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// A validated, read-only content tree.
#[derive(Debug, Clone)]
pub struct Site {
    locales: Vec<Locale>,
    master: Locale,
    formats: Vec<OutputFormat>,
    resolutions: Vec<Resolution>,
    root: NodeId,
    nodes: HashMap<NodeId, NodeRecord>,
    overrides: Vec<OverrideRecord>,
}

impl Site {
    pub fn load(path: &Path) -> Result<Self, SiteError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, SiteError> {
        let document: SiteDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    pub fn from_document(document: SiteDocument) -> Result<Self, SiteError> {
        let master = document
            .locales
            .iter()
            .find(|l| l.id == document.master_locale)
            .cloned()
            .ok_or_else(|| SiteError::UnknownMasterLocale(document.master_locale.clone()))?;

        let mut nodes = HashMap::with_capacity(document.nodes.len());
        for node in document.nodes {
            let id = node.id;
            if nodes.insert(id, node).is_some() {
                return Err(SiteError::DuplicateNode(id));
            }
        }

        let site = Self {
            locales: document.locales,
            master,
            formats: document.formats,
            resolutions: document.resolutions,
            root: document.root,
            nodes,
            overrides: document.overrides,
        };
        site.validate()?;
        Ok(site)
    }

    fn validate(&self) -> Result<(), SiteError> {
        let root = self
            .nodes
            .get(&self.root)
            .ok_or(SiteError::MissingRoot(self.root))?;
        if root.parent.is_some() {
            return Err(SiteError::RootHasParent(self.root));
        }

        for node in self.nodes.values() {
            if let Some(parent) = node.parent {
                if !self.nodes.contains_key(&parent) {
                    return Err(SiteError::UnknownParent {
                        node: node.id,
                        parent,
                    });
                }
            }
            if let Some(start) = node.start_node {
                let is_child = self
                    .nodes
                    .get(&start)
                    .is_some_and(|s| s.parent == Some(node.id));
                if !is_child {
                    return Err(SiteError::StartNodeNotChild {
                        folder: node.id,
                        start,
                    });
                }
            }
            if node.kind == ElementKind::Media && node.media.is_none() {
                return Err(SiteError::MissingMedia(node.id));
            }
            self.check_acyclic(node.id)?;
        }

        for entry in &self.overrides {
            if !self.nodes.contains_key(&entry.node) {
                return Err(SiteError::UnknownOverrideNode(entry.node));
            }
            if let Some(locale) = &entry.locale {
                self.locale(locale)
                    .ok_or_else(|| SiteError::UnknownLocale(locale.clone()))?;
            }
            if let Some(format) = &entry.format {
                self.format(format)
                    .ok_or_else(|| SiteError::UnknownFormat(format.clone()))?;
            }
        }
        Ok(())
    }

    fn check_acyclic(&self, start: NodeId) -> Result<(), SiteError> {
        let mut current = start;
        for _ in 0..=self.nodes.len() {
            match self.nodes.get(&current).and_then(|n| n.parent) {
                Some(parent) => current = parent,
                None => return Ok(()),
            }
        }
        Err(SiteError::Cycle(start))
    }

    pub fn locales(&self) -> &[Locale] {
        &self.locales
    }

    pub fn locale(&self, id: &str) -> Option<&Locale> {
        self.locales.iter().find(|l| l.id == id)
    }

    pub fn format(&self, id: &str) -> Option<&OutputFormat> {
        self.formats.iter().find(|f| f.id == id)
    }

    pub fn resolutions(&self) -> &[Resolution] {
        &self.resolutions
    }

    /// Path overrides as declared in the document.
    pub fn override_records(&self) -> &[OverrideRecord] {
        &self.overrides
    }

    /// Project resolution by uid; unknown uids are treated as non-original.
    pub fn resolution(&self, uid: &str) -> Resolution {
        self.resolutions
            .iter()
            .find(|r| r.uid == uid)
            .cloned()
            .unwrap_or_else(|| Resolution::new(uid))
    }

    /// All node ids in ascending order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeRecord> {
        self.nodes.get(&id)
    }

    /// Project resolutions a picture has data for in `locale`, in project order.
    pub fn picture_resolutions(&self, media: NodeId, locale: &Locale) -> Vec<Resolution> {
        let Some(MediaRecord::Picture { pictures }) = self.media_record(media) else {
            return Vec::new();
        };
        let Some(picture) = by_locale(pictures, locale) else {
            return Vec::new();
        };
        self.resolutions
            .iter()
            .filter(|r| picture.0.contains_key(&r.uid))
            .cloned()
            .collect()
    }

    /// Path overrides from the document, plus the `/` root sentinel.
    pub fn overrides(&self) -> PathOverrides {
        let mut overrides = PathOverrides::with_root(self.root);
        for entry in &self.overrides {
            let locale = entry.locale.as_deref().and_then(|id| self.locale(id));
            let format = entry.format.as_deref().and_then(|id| self.format(id));
            let path = entry.path.clone();
            match (locale, format) {
                (Some(locale), format) => overrides.set_scoped(entry.node, locale, format, path),
                (None, Some(format)) => overrides.set_for_format(entry.node, format, path),
                (None, None) => overrides.set(entry.node, path),
            };
        }
        overrides
    }

    fn media_record(&self, media: NodeId) -> Option<&MediaRecord> {
        self.nodes.get(&media).and_then(|n| n.media.as_ref())
    }
}

fn by_locale<'a, V>(entries: &'a BTreeMap<String, V>, locale: &Locale) -> Option<&'a V> {
    entries.get(&locale.id).or_else(|| entries.get(ANY_LOCALE))
}

impl ContentTree for Site {
    fn root(&self) -> NodeId {
        self.root
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|n| n.parent)
    }

    fn kind(&self, node: NodeId) -> Option<ElementKind> {
        self.nodes.get(&node).map(|n| n.kind)
    }

    fn uid(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(&node).map(|n| n.uid.as_str())
    }

    fn display_name(&self, node: NodeId, locale: &Locale) -> Option<&str> {
        self.nodes
            .get(&node)
            .and_then(|n| n.names.get(&locale.id))
            .map(String::as_str)
    }

    fn master_locale(&self) -> &Locale {
        &self.master
    }

    fn output_formats(&self) -> &[OutputFormat] {
        &self.formats
    }

    fn start_node(&self, folder: NodeId) -> Option<NodeId> {
        self.nodes.get(&folder).and_then(|n| n.start_node)
    }
}

impl MediaStore for Site {
    fn media_kind(&self, media: NodeId) -> Option<MediaKind> {
        self.media_record(media).map(MediaRecord::kind)
    }

    fn file(&self, media: NodeId, locale: &Locale) -> Option<FileInfo> {
        match self.media_record(media)? {
            MediaRecord::File { files } => by_locale(files, locale).cloned(),
            MediaRecord::Picture { .. } => None,
        }
    }

    fn picture(&self, media: NodeId, locale: &Locale) -> Option<&dyn Picture> {
        match self.media_record(media)? {
            MediaRecord::Picture { pictures } => {
                by_locale(pictures, locale).map(|p| p as &dyn Picture)
            }
            MediaRecord::File { .. } => None,
        }
    }
}
