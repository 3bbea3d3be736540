//! User-defined path overrides.
//!
//! A [`PathLookup`] may replace the path of any tree level. What it returns
//! decides how the collector continues:
//!
//! | Lookup result | Emitted | Ascends further |
//! |---------------|---------|-----------------|
//! | `None` | resolved name + `/` | yes |
//! | `Some("/")` | `/` (absolute root) | no |
//! | `Some("")` | `/` (this level, no segment) | no |
//! | `Some(path)` | `path` + `/` | no |
//!
//! `Some("/")` and `Some("")` print the same but mean different things, so
//! they stay separate cases.

use std::collections::HashMap;

use crate::types::{Locale, NodeId, OutputFormat};

/// The root sentinel override.
pub const ROOT_PATH: &str = "/";

pub trait PathLookup {
    /// Override for `node`. `format` is `None` for media lookups.
    fn lookup_path(
        &self,
        node: NodeId,
        locale: &Locale,
        format: Option<&OutputFormat>,
    ) -> Option<String>;
}

/// A lookup with no overrides at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOverrides;

impl PathLookup for NoOverrides {
    fn lookup_path(&self, _: NodeId, _: &Locale, _: Option<&OutputFormat>) -> Option<String> {
        None
    }
}

/// Overrides held in memory.
///
/// An entry may be scoped to a locale, a format, both, or neither. The most
/// specific entry wins, locale before format:
///
/// ```text
/// (locale, format) → (locale, any) → (any, format) → (any, any)
/// ```
#[derive(Debug, Clone, Default)]
pub struct PathOverrides {
    entries: HashMap<OverrideKey, String>,
}

/// Node plus optional locale id and format id.
type OverrideKey = (NodeId, Option<String>, Option<String>);

impl PathOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides that map `root` to the `/` sentinel, so every collected
    /// path is absolute.
    pub fn with_root(root: NodeId) -> Self {
        let mut overrides = Self::new();
        overrides.set(root, ROOT_PATH);
        overrides
    }

    /// Override `node` for every locale and format.
    pub fn set(&mut self, node: NodeId, path: impl Into<String>) -> &mut Self {
        self.entries.insert((node, None, None), path.into());
        self
    }

    /// Override `node` for one locale, and one format if given.
    pub fn set_scoped(
        &mut self,
        node: NodeId,
        locale: &Locale,
        format: Option<&OutputFormat>,
        path: impl Into<String>,
    ) -> &mut Self {
        let key = (node, Some(locale.id.clone()), format.map(|f| f.id.clone()));
        self.entries.insert(key, path.into());
        self
    }

    /// Override `node` for one format in every locale.
    pub fn set_for_format(
        &mut self,
        node: NodeId,
        format: &OutputFormat,
        path: impl Into<String>,
    ) -> &mut Self {
        self.entries
            .insert((node, None, Some(format.id.clone())), path.into());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PathLookup for PathOverrides {
    fn lookup_path(
        &self,
        node: NodeId,
        locale: &Locale,
        format: Option<&OutputFormat>,
    ) -> Option<String> {
        let locale = Some(locale.id.clone());
        let format = format.map(|f| f.id.clone());

        let mut candidates = Vec::with_capacity(4);
        if format.is_some() {
            candidates.push((node, locale.clone(), format.clone()));
        }
        candidates.push((node, locale, None));
        if format.is_some() {
            candidates.push((node, None, format));
        }
        candidates.push((node, None, None));

        candidates
            .iter()
            .find_map(|key| self.entries.get(key))
            .cloned()
    }
}
