//! Whole-site URL listing.
//!
//! [`build_sitemap`] resolves the URL of every page ref and media node of a
//! [`Site`] for one locale and format. Nodes are independent, so the work is
//! spread over rayon's thread pool; entries come back in node id order
//! regardless of scheduling.
//!
//! Pictures get one entry per project resolution they have data for in the
//! locale. Files get a single entry. Folders get none. Failures stay on
//! their entry so one broken asset does not hide the rest of the listing.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::UrlError;
use crate::factory::UrlFactory;
use crate::lookup::PathLookup;
use crate::media::{MediaError, MediaKind, MediaStore};
use crate::site::Site;
use crate::tree::ContentTree;
use crate::types::{ElementKind, Locale, NodeId, OutputFormat, PageParams, Resolution};

/// One resolved (or failed) URL.
#[derive(Debug)]
pub struct SitemapEntry {
    pub node: NodeId,
    pub kind: ElementKind,
    /// Resolution uid for picture entries.
    pub resolution: Option<String>,
    pub url: Result<String, UrlError>,
}

impl SitemapEntry {
    pub fn is_ok(&self) -> bool {
        self.url.is_ok()
    }
}

/// Serializable view of an entry, for `--json` output.
#[derive(Debug, Serialize)]
pub struct SitemapRecord<'a> {
    pub node: NodeId,
    pub kind: ElementKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<'a> From<&'a SitemapEntry> for SitemapRecord<'a> {
    fn from(entry: &'a SitemapEntry) -> Self {
        let (url, error) = match &entry.url {
            Ok(url) => (Some(url.as_str()), None),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            node: entry.node,
            kind: entry.kind,
            resolution: entry.resolution.as_deref(),
            url,
            error,
        }
    }
}

/// Work item: a node plus the resolution to render it in, if any.
struct Target {
    node: NodeId,
    kind: ElementKind,
    resolution: Option<Resolution>,
    /// A picture with no data in the requested locale.
    missing_picture: bool,
}

impl Target {
    fn new(node: NodeId, kind: ElementKind, resolution: Option<Resolution>) -> Self {
        Self {
            node,
            kind,
            resolution,
            missing_picture: false,
        }
    }
}

/// Resolve every page ref and media URL of `site` in `locale` and `format`.
pub fn build_sitemap<L>(
    factory: &UrlFactory<L>,
    site: &Site,
    locale: &Locale,
    format: &OutputFormat,
) -> Vec<SitemapEntry>
where
    L: PathLookup + Sync,
{
    let targets = targets(site, locale);
    debug!(targets = targets.len(), locale = %locale.id, format = %format.id, "building sitemap");

    let entries: Vec<SitemapEntry> = targets
        .into_par_iter()
        .map(|target| resolve(factory, site, locale, format, target))
        .collect();

    let failed = entries.iter().filter(|e| !e.is_ok()).count();
    if failed > 0 {
        warn!(failed, total = entries.len(), "some URLs could not be resolved");
    }
    entries
}

fn targets(site: &Site, locale: &Locale) -> Vec<Target> {
    let mut targets = Vec::new();
    for node in site.node_ids() {
        let Some(kind) = site.kind(node) else {
            continue;
        };
        match kind {
            ElementKind::Folder => {}
            ElementKind::PageRef => targets.push(Target::new(node, kind, None)),
            ElementKind::Media => match site.media_kind(node) {
                Some(MediaKind::Picture) => {
                    let resolutions = site.picture_resolutions(node, locale);
                    if resolutions.is_empty() {
                        targets.push(Target {
                            missing_picture: true,
                            ..Target::new(node, kind, None)
                        });
                    }
                    targets.extend(
                        resolutions
                            .into_iter()
                            .map(|resolution| Target::new(node, kind, Some(resolution))),
                    );
                }
                _ => targets.push(Target::new(node, kind, None)),
            },
        }
    }
    targets
}

fn resolve<L: PathLookup>(
    factory: &UrlFactory<L>,
    site: &Site,
    locale: &Locale,
    format: &OutputFormat,
    target: Target,
) -> SitemapEntry {
    let url = if target.missing_picture {
        let uid = site.uid(target.node).unwrap_or_default().to_string();
        Err(MediaError::MissingPicture {
            uid,
            id: target.node,
        }
        .into())
    } else if target.kind == ElementKind::Media {
        factory.media_url(site, target.node, locale, target.resolution.as_ref())
    } else {
        factory.page_url(site, target.node, format, locale, &PageParams::first())
    };
    SitemapEntry {
        node: target.node,
        kind: target.kind,
        resolution: target.resolution.map(|r| r.uid),
        url,
    }
}
