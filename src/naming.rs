//! Base names for tree nodes.
//!
//! Every node contributes one name to a URL. For a page the name is chosen
//! by the first rule that applies:
//!
//! 1. **Content projection**: a page ref rendering exactly one record, with a
//!    sitemap variable, is named after that record's field (`Hello-World`).
//! 2. **Welcome file**: the start page of a folder, on its first page and in
//!    a format the welcome policy accepts, is named `index`.
//! 3. **Display name**: the locale display name (see below), plus
//!    `_<page suffix>` on multi-page nodes.
//!
//! ## Locale fallback
//!
//! Folders, media and pages without a better name use the first non-empty
//! cleaned value of:
//!
//! ```text
//! display name in requested locale → display name in master locale → uid
//! ```
//!
//! Missing names are not errors; the chain simply moves on.

use serde_json::Value;
use tracing::trace;

use crate::cleanup::cleanup;
use crate::config::{UrlPolicy, WelcomeFileMode};
use crate::entity::{Entity, value_text};
use crate::error::UrlError;
use crate::tree::ContentTree;
use crate::types::{ElementKind, Locale, NodeId, OutputFormat, PageParams};

/// Name used for folder start pages when welcome files are on.
pub const WELCOME_FILE_NAME: &str = "index";

/// Cleaned, locale-dependent name of `node`. Case policy is not applied.
pub fn locale_name<T>(tree: &T, node: NodeId, locale: &Locale) -> Result<String, UrlError>
where
    T: ContentTree + ?Sized,
{
    if let Some(name) = tree.display_name(node, locale) {
        let cleaned = cleanup(name, locale);
        if !cleaned.is_empty() {
            return Ok(cleaned);
        }
    }

    let master = tree.master_locale();
    if master != locale {
        if let Some(name) = tree.display_name(node, master) {
            let cleaned = cleanup(name, locale);
            if !cleaned.is_empty() {
                trace!(%node, locale = %locale.id, master = %master.id, "using master locale name");
                return Ok(cleaned);
            }
        }
    }

    let uid = tree.uid(node).ok_or(UrlError::UnknownNode(node))?;
    trace!(%node, uid, "using uid as name");
    Ok(cleanup(uid, locale))
}

/// Base name of a page rendered in `format` and `locale`, extension excluded.
pub fn page_name<T>(
    tree: &T,
    policy: &UrlPolicy,
    node: NodeId,
    format: &OutputFormat,
    locale: &Locale,
    params: &PageParams,
) -> Result<String, UrlError>
where
    T: ContentTree + ?Sized,
{
    let kind = tree.kind(node).ok_or(UrlError::UnknownNode(node))?;

    if kind == ElementKind::PageRef {
        if let Some((record, variable)) = params.single_projection() {
            match projected_name(record, variable, locale) {
                Some(raw) => return Ok(cleanup(&policy.adjust_case(&raw), locale)),
                None => trace!(%node, variable, "projection gave no name, falling back"),
            }
        }
    }

    if policy.welcome_files != WelcomeFileMode::Disabled
        && params.index == 0
        && params.projection.is_none()
        && is_start_node(tree, node)
        && policy.welcome_file_for(format, tree.output_formats())
    {
        return Ok(policy.adjust_case(WELCOME_FILE_NAME));
    }

    let mut name = locale_name(tree, node, locale)?;
    if !params.page_suffix.is_empty() {
        name.push('_');
        name.push_str(&params.page_suffix);
    }
    Ok(policy.adjust_case(&name))
}

fn is_start_node<T>(tree: &T, node: NodeId) -> bool
where
    T: ContentTree + ?Sized,
{
    tree.parent(node)
        .and_then(|folder| tree.start_node(folder))
        .is_some_and(|start| start == node)
}

/// Raw value of `variable` in `record`, or `None` to fall back to the
/// display name.
///
/// `variable` is a dot-separated path (`author.name`), with an optional
/// trailing `*`. Every segment but the last must hold a nested record;
/// trailing empty segments do not count. A variable with a single segment
/// is used as the attribute name as written, so `title.` is not `title`. If the
/// record does not declare the last segment, `<segment>_<abbreviation>` is
/// tried instead, so `title` finds `title_EN`.
pub fn projected_name(record: &Entity, variable: &str, locale: &Locale) -> Option<String> {
    let variable = variable.strip_suffix('*').unwrap_or(variable);

    let mut segments: Vec<&str> = variable.split('.').collect();
    while segments.last() == Some(&"") {
        segments.pop();
    }

    let mut fields = record.fields();
    let attribute = if segments.len() > 1 {
        let attribute = segments.pop()?;
        for segment in segments {
            match fields.get(segment) {
                Some(Value::Object(nested)) => fields = nested,
                _ => return None,
            }
        }
        attribute
    } else {
        // A single segment is looked up verbatim, dots included.
        variable
    };

    let value = if fields.contains_key(attribute) {
        fields.get(attribute)
    } else {
        fields.get(&format!("{attribute}_{}", locale.abbreviation))
    };
    value.and_then(value_text)
}
