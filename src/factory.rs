//! The URL factory: public entry points.
//!
//! A [`UrlFactory`] is built once from settings and a [`PathLookup`], then
//! answers any number of URL requests against any tree:
//!
//! ```text
//! page_url(node, format, locale, params)   →  /Products/Shoes.html
//! media_url(node, locale, resolution)      →  /Images/Logo_thumb.jpg
//! ```
//!
//! Page URLs are `<folder path><page name>.<extension>`; media URLs add
//! `_<resolution>` for non-original picture resolutions. Folder paths come
//! from [`collect_path`], names from [`crate::naming`], extensions from the
//! tree or [`crate::media`].
//!
//! The factory holds no mutable state. One instance can serve many threads
//! as long as the tree and lookup are `Sync`.

use std::collections::HashMap;
use tracing::debug;

use crate::config::UrlPolicy;
use crate::error::UrlError;
use crate::lookup::PathLookup;
use crate::media::{MediaStore, media_extension, resolution_token};
use crate::naming::{locale_name, page_name};
use crate::path::collect_path;
use crate::tree::ContentTree;
use crate::types::{ElementKind, Locale, NodeId, OutputFormat, PageParams, Resolution};

#[derive(Debug, Clone)]
pub struct UrlFactory<L> {
    policy: UrlPolicy,
    lookup: L,
}

impl<L: PathLookup> UrlFactory<L> {
    /// Build a factory from a flat settings map (see [`crate::config`]).
    pub fn new(settings: &HashMap<String, String>, lookup: L) -> Self {
        Self::with_policy(UrlPolicy::from_settings(settings), lookup)
    }

    pub fn with_policy(policy: UrlPolicy, lookup: L) -> Self {
        Self { policy, lookup }
    }

    pub fn policy(&self) -> &UrlPolicy {
        &self.policy
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// URL of a page rendered in `format` and `locale`.
    pub fn page_url<T>(
        &self,
        tree: &T,
        node: NodeId,
        format: &OutputFormat,
        locale: &Locale,
        params: &PageParams,
    ) -> Result<String, UrlError>
    where
        T: ContentTree + ?Sized,
    {
        let name = page_name(tree, &self.policy, node, format, locale, params)?;
        let extension = self.policy.adjust_case(&tree.extension(node, format));
        let parent = parent_not_null(tree, node)?;

        let mut url = collect_path(tree, &self.lookup, &self.policy, parent, locale, Some(format))?;
        url.push_str(&name);
        if !extension.is_empty() {
            url.push('.');
            url.push_str(&extension);
        }
        debug!(%node, locale = %locale.id, format = %format.id, url = %url, "page url");
        Ok(url)
    }

    /// URL of a media asset in `locale`.
    ///
    /// Pictures need a `resolution`; files ignore it.
    pub fn media_url<T>(
        &self,
        tree: &T,
        node: NodeId,
        locale: &Locale,
        resolution: Option<&Resolution>,
    ) -> Result<String, UrlError>
    where
        T: ContentTree + MediaStore + ?Sized,
    {
        let kind = tree.kind(node).ok_or(UrlError::UnknownNode(node))?;
        if kind != ElementKind::Media {
            return Err(UrlError::NotMedia(node));
        }
        let media_kind = tree.media_kind(node).ok_or(UrlError::NotMedia(node))?;

        let name = self.policy.adjust_case(&locale_name(tree, node, locale)?);
        let token = resolution_token(&self.policy, media_kind, resolution, locale);
        let extension = media_extension(tree, node, media_kind, locale, resolution)?;
        let extension = self.policy.adjust_case(&extension);
        let parent = parent_not_null(tree, node)?;

        let mut url = collect_path(tree, &self.lookup, &self.policy, parent, locale, None)?;
        url.push_str(&name);
        if let Some(token) = token {
            url.push('_');
            url.push_str(&token);
        }
        if !extension.is_empty() {
            url.push('.');
            url.push_str(&extension);
        }
        debug!(%node, locale = %locale.id, url = %url, "media url");
        Ok(url)
    }

    /// Folder path of `node` itself; see [`collect_path`].
    pub fn folder_path<T>(
        &self,
        tree: &T,
        node: NodeId,
        locale: &Locale,
        format: Option<&OutputFormat>,
    ) -> Result<String, UrlError>
    where
        T: ContentTree + ?Sized,
    {
        collect_path(tree, &self.lookup, &self.policy, node, locale, format)
    }
}

fn parent_not_null<T>(tree: &T, node: NodeId) -> Result<NodeId, UrlError>
where
    T: ContentTree + ?Sized,
{
    match tree.parent(node) {
        Some(parent) => Ok(parent),
        None => {
            let kind = tree.kind(node).ok_or(UrlError::UnknownNode(node))?;
            Err(UrlError::Detached { kind, id: node })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::{NoOverrides, PathOverrides};
    use crate::media::{MediaError, MediaKind, Picture, PictureMeta};
    use crate::site::Site;
    use crate::test_helpers::{SiteBuilder, de, en, html, print, xml};
    use serde_json::json;
    use std::io;

    fn settings(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// root → Products → Shoes, plus a start page and some media.
    fn shop_builder() -> SiteBuilder {
        SiteBuilder::new()
            .folder(2, 1, "products", &[("EN", "Products")])
            .page(3, 2, "shoes", &[("EN", "Shoes")])
            .page(4, 2, "overview", &[("EN", "Overview"), ("DE", "Übersicht")])
            .start(2, 4)
            .folder(5, 1, "images", &[("EN", "Images")])
            .picture(6, 5, "logo", &[("EN", &[("thumb", "JPG"), ("ORIGINAL", "png")])])
            .file(7, 5, "manual", &[("*", "pdf")])
    }

    fn shop() -> Site {
        shop_builder().build()
    }

    fn factory(pairs: &[(&str, &str)], site: &Site) -> UrlFactory<PathOverrides> {
        UrlFactory::new(&settings(pairs), site.overrides())
    }

    // =========================================================================
    // page_url
    // =========================================================================

    #[test]
    fn end_to_end_page_url() {
        let site = shop();
        let f = factory(&[("usewelcomefilenames", "no")], &site);
        let url = f.page_url(&site, NodeId(3), &html(), &en(), &PageParams::first());
        assert_eq!(url.unwrap(), "/Products/Shoes.html");
    }

    #[test]
    fn page_url_without_root_sentinel_is_relative() {
        let site = shop();
        let f = UrlFactory::new(&settings(&[]), NoOverrides);
        let url = f.page_url(&site, NodeId(3), &html(), &en(), &PageParams::first());
        assert_eq!(url.unwrap(), "Products/Shoes.html");
    }

    #[test]
    fn start_page_is_index_in_first_html_format_only() {
        let site = shop();
        let f = factory(&[], &site);
        let first = PageParams::first();
        assert_eq!(
            f.page_url(&site, NodeId(4), &html(), &en(), &first).unwrap(),
            "/Products/index.html"
        );
        assert_eq!(
            f.page_url(&site, NodeId(4), &print(), &en(), &first).unwrap(),
            "/Products/Overview.html"
        );
        assert_eq!(
            f.page_url(&site, NodeId(4), &xml(), &en(), &first).unwrap(),
            "/Products/Overview.xml"
        );
    }

    #[test]
    fn start_page_is_index_in_every_format_with_all() {
        let site = shop();
        let f = factory(&[("usewelcomefilenames", "all")], &site);
        for format in [html(), print(), xml()] {
            let url = f.page_url(&site, NodeId(4), &format, &en(), &PageParams::first());
            assert_eq!(url.unwrap(), format!("/Products/index.{}", format.extension));
        }
    }

    #[test]
    fn start_page_with_unlisted_format_keeps_name() {
        let site = shop();
        let f = factory(&[("usewelcomefilenames", "print")], &site);
        let first = PageParams::first();
        assert_eq!(
            f.page_url(&site, NodeId(4), &html(), &en(), &first).unwrap(),
            "/Products/Overview.html"
        );
        assert_eq!(
            f.page_url(&site, NodeId(4), &print(), &en(), &first).unwrap(),
            "/Products/index.html"
        );
    }

    #[test]
    fn first_html_format_follows_tree_order() {
        let site = SiteBuilder::new()
            .formats(vec![print(), html()])
            .folder(2, 1, "products", &[("EN", "Products")])
            .page(4, 2, "overview", &[("EN", "Overview")])
            .start(2, 4)
            .build();
        let f = factory(&[], &site);
        let first = PageParams::first();
        assert_eq!(
            f.page_url(&site, NodeId(4), &print(), &en(), &first).unwrap(),
            "/Products/index.html"
        );
        assert_eq!(
            f.page_url(&site, NodeId(4), &html(), &en(), &first).unwrap(),
            "/Products/Overview.html"
        );
    }

    #[test]
    fn lower_case_applies_to_names_and_extension() {
        let site = SiteBuilder::new()
            .formats(vec![OutputFormat::new("html", "HTML")])
            .folder(2, 1, "products", &[("EN", "Products")])
            .page(3, 2, "shoes", &[("EN", "Shoes")])
            .build();
        let f = factory(&[("uselowercase", "true")], &site);
        let format = OutputFormat::new("html", "HTML");
        let url = f.page_url(&site, NodeId(3), &format, &en(), &PageParams::first());
        assert_eq!(url.unwrap(), "/products/shoes.html");
    }

    #[test]
    fn casing_untouched_by_default() {
        let site = SiteBuilder::new()
            .formats(vec![OutputFormat::new("html", "HTML")])
            .folder(2, 1, "products", &[("EN", "Products")])
            .page(3, 2, "shoes", &[("EN", "Shoes")])
            .build();
        let f = factory(&[], &site);
        let format = OutputFormat::new("html", "HTML");
        let url = f.page_url(&site, NodeId(3), &format, &en(), &PageParams::first());
        assert_eq!(url.unwrap(), "/Products/Shoes.HTML");
    }

    #[test]
    fn empty_extension_emits_no_dot() {
        let site = shop();
        let f = factory(&[], &site);
        let bare = OutputFormat::new("bare", "");
        let url = f.page_url(&site, NodeId(3), &bare, &en(), &PageParams::first());
        assert_eq!(url.unwrap(), "/Products/Shoes");
    }

    #[test]
    fn german_page_falls_back_per_level() {
        let site = shop();
        let f = factory(&[("usewelcomefilenames", "false")], &site);
        let first = PageParams::first();
        assert_eq!(
            f.page_url(&site, NodeId(4), &html(), &de(), &first).unwrap(),
            "/Products/Übersicht.html"
        );
        assert_eq!(
            f.page_url(&site, NodeId(3), &html(), &de(), &first).unwrap(),
            "/Products/Shoes.html"
        );
    }

    #[test]
    fn projected_page_url() {
        let site = shop();
        let f = factory(&[], &site);
        let record = crate::entity::Entity::from_value(json!({"title": "Hello World"})).unwrap();
        let params = PageParams::projected(record, "title");
        let url = f.page_url(&site, NodeId(3), &html(), &en(), &params);
        assert_eq!(url.unwrap(), "/Products/Hello-World.html");
    }

    #[test]
    fn multi_page_suffix() {
        let site = shop();
        let f = factory(&[], &site);
        let url = f.page_url(&site, NodeId(3), &html(), &en(), &PageParams::page(1, "2"));
        assert_eq!(url.unwrap(), "/Products/Shoes_2.html");
    }

    #[test]
    fn scoped_override_applies_to_page_format() {
        let site = shop();
        let mut overrides = site.overrides();
        overrides.set_scoped(NodeId(2), &en(), Some(&print()), "print/products");
        let f = UrlFactory::new(&settings(&[("usewelcomefilenames", "no")]), overrides);
        let first = PageParams::first();
        assert_eq!(
            f.page_url(&site, NodeId(3), &print(), &en(), &first).unwrap(),
            "print/products/Shoes.html"
        );
        assert_eq!(
            f.page_url(&site, NodeId(3), &html(), &en(), &first).unwrap(),
            "/Products/Shoes.html"
        );
    }

    #[test]
    fn root_page_is_detached() {
        let site = shop();
        let f = factory(&[], &site);
        let err = f
            .page_url(&site, NodeId(1), &html(), &en(), &PageParams::first())
            .unwrap_err();
        assert!(matches!(err, UrlError::Detached { id: NodeId(1), .. }));
    }

    #[test]
    fn unknown_page_is_an_error() {
        let site = shop();
        let f = factory(&[], &site);
        let err = f
            .page_url(&site, NodeId(404), &html(), &en(), &PageParams::first())
            .unwrap_err();
        assert!(matches!(err, UrlError::UnknownNode(NodeId(404))));
    }

    // =========================================================================
    // media_url
    // =========================================================================

    #[test]
    fn picture_url_with_resolution_token() {
        let site = shop();
        let f = factory(&[], &site);
        let url = f.media_url(&site, NodeId(6), &en(), Some(&Resolution::new("thumb")));
        assert_eq!(url.unwrap(), "/Images/logo_thumb.JPG");
    }

    #[test]
    fn picture_url_with_display_name() {
        let site = shop_builder().names(6, &[("EN", "Logo")]).build();
        let f = factory(&[], &site);
        let url = f.media_url(&site, NodeId(6), &en(), Some(&Resolution::new("thumb")));
        assert_eq!(url.unwrap(), "/Images/Logo_thumb.JPG");
    }

    #[test]
    fn original_resolution_has_no_token() {
        let site = shop();
        let f = factory(&[], &site);
        let original = Resolution::original("ORIGINAL");
        let url = f.media_url(&site, NodeId(6), &en(), Some(&original));
        assert_eq!(url.unwrap(), "/Images/logo.png");
    }

    #[test]
    fn lower_case_media_url() {
        let site = shop();
        let f = factory(&[("uselowercase", "yes")], &site);
        let url = f.media_url(&site, NodeId(6), &en(), Some(&Resolution::new("Thumb")));
        // Resolution uids are matched exactly, so "Thumb" has no metadata.
        assert!(matches!(url, Err(UrlError::Media(MediaError::MissingPicture { .. }))));

        let url = f.media_url(&site, NodeId(6), &en(), Some(&Resolution::new("thumb")));
        assert_eq!(url.unwrap(), "/images/logo_thumb.jpg");
    }

    #[test]
    fn file_url_uses_language_independent_data() {
        let site = shop();
        let f = factory(&[], &site);
        assert_eq!(f.media_url(&site, NodeId(7), &de(), None).unwrap(), "/Images/manual.pdf");
    }

    #[test]
    fn picture_without_resolution_fails() {
        let site = shop();
        let f = factory(&[], &site);
        let err = f.media_url(&site, NodeId(6), &en(), None).unwrap_err();
        assert!(matches!(err, UrlError::Media(MediaError::ResolutionRequired { .. })));
    }

    #[test]
    fn missing_picture_locale_names_asset() {
        let site = shop();
        let f = factory(&[], &site);
        let err = f
            .media_url(&site, NodeId(6), &de(), Some(&Resolution::new("thumb")))
            .unwrap_err();
        assert_eq!(err.to_string(), "no picture data found for media \"logo\" (id=6)");
    }

    #[test]
    fn media_url_of_page_is_rejected() {
        let site = shop();
        let f = factory(&[], &site);
        let err = f.media_url(&site, NodeId(3), &en(), None).unwrap_err();
        assert!(matches!(err, UrlError::NotMedia(NodeId(3))));
    }

    #[test]
    fn media_lookup_gets_no_format() {
        let site = shop();
        let mut overrides = site.overrides();
        overrides.set_scoped(NodeId(5), &en(), Some(&html()), "html-only");
        overrides.set_scoped(NodeId(5), &en(), None, "assets");
        let f = UrlFactory::new(&settings(&[]), overrides);
        let url = f.media_url(&site, NodeId(7), &en(), None).unwrap();
        assert_eq!(url, "assets/manual.pdf");
    }

    // =========================================================================
    // I/O failures from a media store
    // =========================================================================

    struct BrokenPicture;

    impl Picture for BrokenPicture {
        fn metadata(&self, _: &Resolution) -> io::Result<Option<PictureMeta>> {
            Err(io::Error::other("metadata unavailable"))
        }
    }

    /// A site whose pictures cannot be read.
    struct BrokenStore(Site);

    impl ContentTree for BrokenStore {
        fn root(&self) -> NodeId {
            self.0.root()
        }
        fn parent(&self, node: NodeId) -> Option<NodeId> {
            self.0.parent(node)
        }
        fn kind(&self, node: NodeId) -> Option<ElementKind> {
            self.0.kind(node)
        }
        fn uid(&self, node: NodeId) -> Option<&str> {
            self.0.uid(node)
        }
        fn display_name(&self, node: NodeId, locale: &Locale) -> Option<&str> {
            self.0.display_name(node, locale)
        }
        fn master_locale(&self) -> &Locale {
            self.0.master_locale()
        }
        fn output_formats(&self) -> &[OutputFormat] {
            self.0.output_formats()
        }
        fn start_node(&self, folder: NodeId) -> Option<NodeId> {
            self.0.start_node(folder)
        }
    }

    impl MediaStore for BrokenStore {
        fn media_kind(&self, _: NodeId) -> Option<MediaKind> {
            Some(MediaKind::Picture)
        }
        fn file(&self, _: NodeId, _: &Locale) -> Option<crate::media::FileInfo> {
            None
        }
        fn picture(&self, _: NodeId, _: &Locale) -> Option<&dyn Picture> {
            Some(&BrokenPicture)
        }
    }

    #[test]
    fn metadata_io_failure_is_wrapped() {
        let store = BrokenStore(shop());
        let f = factory(&[], &store.0);
        let err = f
            .media_url(&store, NodeId(6), &en(), Some(&Resolution::new("thumb")))
            .unwrap_err();
        match err {
            UrlError::Media(MediaError::Io(cause)) => {
                assert_eq!(cause.to_string(), "metadata unavailable");
            }
            other => panic!("expected wrapped IO error, got {other:?}"),
        }
    }
}
