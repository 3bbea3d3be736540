//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Sitemap
//!
//! One line per entry, node id first, URL after the arrow. Picture entries
//! carry their resolution in brackets. Failures keep their place in the list:
//!
//! ```text
//! 3 page ref → /Products/Shoes.html
//! 6 media [thumb] → /Images/logo_thumb.jpg
//! 7 media → error: no file data found for media "manual" (id=7)
//!
//! 3 URLs, 1 failed
//! ```
//!
//! ## Check
//!
//! ```text
//! Site
//!     Root: 1
//!     Nodes: 2 folders, 2 page refs, 1 media
//!
//! Locales
//!     EN (master)
//!     DE
//!
//! Formats
//!     html → .html
//!     xml → .xml
//!
//! Resolutions
//!     ORIGINAL (original)
//!     thumb
//!
//! Overrides
//!     2 → /catalog
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::site::Site;
use crate::sitemap::SitemapEntry;
use crate::tree::ContentTree;
use crate::types::ElementKind;

const INDENT: &str = "    ";

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

// ============================================================================
// Sitemap
// ============================================================================

fn entry_line(entry: &SitemapEntry) -> String {
    let resolution = entry
        .resolution
        .as_deref()
        .map(|r| format!(" [{r}]"))
        .unwrap_or_default();
    let target = match &entry.url {
        Ok(url) => url.clone(),
        Err(e) => format!("error: {e}"),
    };
    format!("{} {}{} → {}", entry.node, entry.kind, resolution, target)
}

pub fn format_sitemap(entries: &[SitemapEntry]) -> Vec<String> {
    let mut lines: Vec<String> = entries.iter().map(entry_line).collect();
    let failed = entries.iter().filter(|e| !e.is_ok()).count();
    let mut summary = plural(entries.len(), "URL", "URLs");
    if failed > 0 {
        summary.push_str(&format!(", {failed} failed"));
    }
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(summary);
    lines
}

pub fn print_sitemap(entries: &[SitemapEntry]) {
    for line in format_sitemap(entries) {
        println!("{line}");
    }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check(site: &Site) -> Vec<String> {
    let mut folders = 0;
    let mut pages = 0;
    let mut media = 0;
    for node in site.node_ids() {
        match site.kind(node) {
            Some(ElementKind::Folder) => folders += 1,
            Some(ElementKind::PageRef) => pages += 1,
            Some(ElementKind::Media) => media += 1,
            None => {}
        }
    }

    let mut lines = vec![
        "Site".to_string(),
        format!("{INDENT}Root: {}", site.root()),
        format!(
            "{INDENT}Nodes: {}, {}, {media} media",
            plural(folders, "folder", "folders"),
            plural(pages, "page ref", "page refs"),
        ),
    ];

    lines.push(String::new());
    lines.push("Locales".to_string());
    let master = site.master_locale();
    for locale in site.locales() {
        if locale == master {
            lines.push(format!("{INDENT}{} (master)", locale.id));
        } else {
            lines.push(format!("{INDENT}{}", locale.id));
        }
    }

    lines.push(String::new());
    lines.push("Formats".to_string());
    for format in site.output_formats() {
        if format.extension.is_empty() {
            lines.push(format!("{INDENT}{} (no extension)", format.id));
        } else {
            lines.push(format!("{INDENT}{} → .{}", format.id, format.extension));
        }
    }

    if !site.resolutions().is_empty() {
        lines.push(String::new());
        lines.push("Resolutions".to_string());
        for resolution in site.resolutions() {
            if resolution.original {
                lines.push(format!("{INDENT}{} (original)", resolution.uid));
            } else {
                lines.push(format!("{INDENT}{}", resolution.uid));
            }
        }
    }

    let overrides = site.override_records();
    if !overrides.is_empty() {
        lines.push(String::new());
        lines.push("Overrides".to_string());
        for entry in overrides {
            let scope = match (&entry.locale, &entry.format) {
                (Some(locale), Some(format)) => format!(" ({locale}, {format})"),
                (Some(locale), None) => format!(" ({locale})"),
                _ => String::new(),
            };
            lines.push(format!("{INDENT}{}{scope} → {}", entry.node, entry.path));
        }
    }

    lines
}

pub fn print_check(site: &Site) {
    for line in format_check(site) {
        println!("{line}");
    }
}
