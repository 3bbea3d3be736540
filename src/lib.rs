//! # SEO Paths
//!
//! Readable, search-engine-friendly URLs for the pages and media of a
//! hierarchical, multilingual content tree. Every URL is spelled out of the
//! display names along the node's ancestry:
//!
//! ```text
//! root               (contributes nothing, or "/" via override)
//! └── Products       →  Products/
//!     └── Shoes      →  Products/Shoes.html
//! ```
//!
//! # Architecture: Names, Paths, URLs
//!
//! URL construction is split into three layers, each usable on its own:
//!
//! ```text
//! 1. Name     node      →  "Running-Shoes"     (locale fallback + cleanup)
//! 2. Path     ancestry  →  "/Products/Shoes/"  (names or overrides, root first)
//! 3. URL      path + name + extension → "/Products/Shoes/Trail.html"
//! ```
//!
//! The tree itself is never owned by this crate. Callers describe it through
//! the [`ContentTree`] and [`MediaStore`] traits and supply overrides through
//! [`PathLookup`]; [`site::Site`] is a ready-made in-memory implementation
//! loaded from JSON.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`factory`] | Public entry points: [`UrlFactory::page_url`], [`UrlFactory::media_url`] |
//! | [`path`] | Folder path collection, override handling, root rule |
//! | [`naming`] | Locale name fallback, welcome files, content projection |
//! | [`cleanup`] | Reduces display names to URL-safe segments |
//! | [`media`] | Media store abstraction, extensions and resolution tokens |
//! | [`lookup`] | Path override abstraction and the in-memory override table |
//! | [`config`] | Settings loading and the resulting [`UrlPolicy`] |
//! | [`tree`] | The [`ContentTree`] abstraction |
//! | [`site`] | JSON-backed, validated in-memory site |
//! | [`sitemap`] | Parallel whole-site URL listing |
//! | [`types`] | Shared value types (`NodeId`, `Locale`, `OutputFormat`, ...) |
//! | [`entity`] | Content records used for projection |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | `tracing` subscriber setup for the binary |
//!
//! # Design Decisions
//!
//! ## Errors, Not Panics
//!
//! A node other than the root without a parent, a picture URL without a
//! resolution, or an id the tree does not know are caller mistakes. They are
//! still reported as [`UrlError`] values, because a content tree is usually
//! data the caller did not write.
//!
//! ## Absolute URLs via Overrides
//!
//! The root folder contributes an empty segment, so plain paths are relative
//! (`Products/Shoes.html`). Registering `/` as the root's override, which
//! [`site::Site::overrides`] and [`lookup::PathOverrides::with_root`] do,
//! turns every URL absolute (`/Products/Shoes.html`) without special cases
//! in the path walk.
//!
//! ## Case Policy Applied Late
//!
//! Lower-casing is applied to each generated segment, never to overrides.
//! Overrides are literal paths chosen by an editor and pass through untouched.

pub mod cleanup;
pub mod config;
pub mod entity;
pub mod error;
pub mod factory;
pub mod logging;
pub mod lookup;
pub mod media;
pub mod naming;
pub mod output;
pub mod path;
pub mod site;
pub mod sitemap;
pub mod tree;
pub mod types;

pub use config::UrlPolicy;
pub use error::UrlError;
pub use factory::UrlFactory;
pub use lookup::PathLookup;
pub use media::MediaStore;
pub use tree::ContentTree;

#[cfg(test)]
pub(crate) mod test_helpers;
