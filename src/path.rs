//! Folder path collection.
//!
//! [`collect_path`] turns a node and its ancestors into a `/`-delimited
//! folder path, root first: `Products/Shoes/`. Each level is either named by
//! the [locale fallback](crate::naming::locale_name) or replaced by a
//! [`PathLookup`] override, which also stops the ascent (see
//! [`crate::lookup`] for the exact cases).
//!
//! The root contributes nothing unless an override says otherwise; sites
//! usually register `/` for it to get absolute paths.
//!
//! The ascent is a loop, not recursion, so tree depth is bounded by memory
//! rather than stack size.

use tracing::trace;

use crate::config::UrlPolicy;
use crate::error::UrlError;
use crate::lookup::{PathLookup, ROOT_PATH};
use crate::naming::locale_name;
use crate::tree::ContentTree;
use crate::types::{Locale, NodeId, OutputFormat};

/// Path of `node` and its ancestors, ending in `/` unless empty.
///
/// Fails with [`UrlError::Detached`] when the ascent reaches a parentless
/// node that is not the root and no override stopped it earlier.
pub fn collect_path<T, L>(
    tree: &T,
    lookup: &L,
    policy: &UrlPolicy,
    node: NodeId,
    locale: &Locale,
    format: Option<&OutputFormat>,
) -> Result<String, UrlError>
where
    T: ContentTree + ?Sized,
    L: PathLookup + ?Sized,
{
    let mut segments: Vec<String> = Vec::new();
    let mut current = node;

    let prefix = loop {
        if let Some(path) = lookup.lookup_path(current, locale, format) {
            trace!(node = %current, path = %path, "path override");
            break if path == ROOT_PATH {
                ROOT_PATH.to_string()
            } else if path.is_empty() {
                "/".to_string()
            } else {
                format!("{path}/")
            };
        }
        if tree.is_root(current) {
            break String::new();
        }

        segments.push(policy.adjust_case(&locale_name(tree, current, locale)?));
        current = match tree.parent(current) {
            Some(parent) => parent,
            None => {
                let kind = tree.kind(current).ok_or(UrlError::UnknownNode(current))?;
                return Err(UrlError::Detached { kind, id: current });
            }
        };
    };

    let len = prefix.len() + segments.iter().map(|s| s.len() + 1).sum::<usize>();
    let mut collected = String::with_capacity(len);
    collected.push_str(&prefix);
    for segment in segments.iter().rev() {
        collected.push_str(segment);
        collected.push('/');
    }
    Ok(collected)
}
