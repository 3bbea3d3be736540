//! URL policy configuration.
//!
//! The factory is configured from a flat map of string settings. The map
//! usually comes from a small TOML file:
//!
//! ```toml
//! uselowercase = "yes"
//! usewelcomefilenames = "html, mobile"
//! ```
//!
//! ## Settings
//!
//! | Key | Values | Effect |
//! |-----|--------|--------|
//! | `uselowercase` | `yes`/`true` | Lower-case every segment, extension and resolution token |
//! | | anything else, absent | Keep names as they are |
//! | `usewelcomefilenames` | absent, `yes`/`true` | `index` for folder start pages in the first HTML format |
//! | | `all` | `index` in every format |
//! | | empty, `no`/`false` | Never emit `index` |
//! | | `a, b, c` | `index` only in the listed output formats |
//!
//! Values are compared case-insensitively. Nothing here fails on odd values:
//! a misspelt `usewelcomefilenames` is read as a format list that matches
//! nothing, which switches welcome files off without complaint.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::types::OutputFormat;

pub const USE_LOWER_CASE: &str = "uselowercase";
pub const USE_WELCOME_FILE_NAMES: &str = "usewelcomefilenames";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Whether generated names are lower-cased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseMode {
    #[default]
    Preserve,
    Lower,
}

/// When a folder's start page is named `index`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WelcomeFileMode {
    Disabled,
    /// Only in the first output format whose extension is `html`.
    #[default]
    FirstHtmlFormat,
    AllHtmlFormats,
    /// Only in the output formats with these ids.
    SelectedFormats(BTreeSet<String>),
}

/// Immutable naming policy, built once from settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlPolicy {
    pub case_mode: CaseMode,
    pub welcome_files: WelcomeFileMode,
}

impl UrlPolicy {
    pub fn from_settings(settings: &HashMap<String, String>) -> Self {
        let welcome = setting(settings, USE_WELCOME_FILE_NAMES);
        let welcome_files = if bool_value(welcome, true) {
            WelcomeFileMode::FirstHtmlFormat
        } else if welcome.is_some_and(|v| v.eq_ignore_ascii_case("all")) {
            WelcomeFileMode::AllHtmlFormats
        } else {
            match welcome {
                Some(value) if !false_or_empty(value) => {
                    WelcomeFileMode::SelectedFormats(format_list(value))
                }
                _ => WelcomeFileMode::Disabled,
            }
        };

        let case_mode = if bool_value(setting(settings, USE_LOWER_CASE), false) {
            CaseMode::Lower
        } else {
            CaseMode::Preserve
        };

        let policy = Self {
            case_mode,
            welcome_files,
        };
        debug!(?policy, "url policy initialised");
        policy
    }

    pub fn lower_case(&self) -> bool {
        self.case_mode == CaseMode::Lower
    }

    /// Apply the case policy to a generated name, extension or token.
    pub fn adjust_case(&self, value: &str) -> String {
        match self.case_mode {
            CaseMode::Lower => value.to_lowercase(),
            CaseMode::Preserve => value.to_string(),
        }
    }

    /// Whether a start page rendered in `format` gets the welcome file name.
    ///
    /// `formats` is the tree's ordered format collection, consulted only in
    /// [`WelcomeFileMode::FirstHtmlFormat`].
    pub fn welcome_file_for(&self, format: &OutputFormat, formats: &[OutputFormat]) -> bool {
        match &self.welcome_files {
            WelcomeFileMode::Disabled => false,
            WelcomeFileMode::AllHtmlFormats => true,
            WelcomeFileMode::SelectedFormats(ids) => ids.contains(&format.id),
            WelcomeFileMode::FirstHtmlFormat => formats
                .iter()
                .find(|f| f.extension == "html")
                .is_some_and(|first| first == format),
        }
    }
}

/// Value of `key`, matched case-insensitively. An exact (lower-case) key wins;
/// among other spellings the smallest key wins, so the map order never matters.
fn setting<'a>(settings: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    if let Some(value) = settings.get(key) {
        return Some(value.as_str());
    }
    settings
        .iter()
        .filter(|(k, _)| k.eq_ignore_ascii_case(key))
        .min_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, v)| v.as_str())
}

fn bool_value(value: Option<&str>, default: bool) -> bool {
    match value {
        None => default,
        Some(v) => v.eq_ignore_ascii_case("yes") || v.eq_ignore_ascii_case("true"),
    }
}

fn false_or_empty(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case("no") || value.eq_ignore_ascii_case("false")
}

fn format_list(value: &str) -> BTreeSet<String> {
    value.split(',').map(|id| id.trim().to_string()).collect()
}

// =============================================================================
// Settings files
// =============================================================================

/// Load a flat settings map from a TOML file.
///
/// Returns an empty map if the file does not exist, so every setting takes
/// its default. Keys are lower-cased; strings, booleans, integers and floats
/// are stringified. Tables and arrays are rejected.
pub fn load_settings(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let content = fs::read_to_string(path)?;
    parse_settings(&content)
}

/// Parse settings TOML text into a flat map. See [`load_settings`].
pub fn parse_settings(content: &str) -> Result<HashMap<String, String>, ConfigError> {
    let table: toml::Table = toml::from_str(content)?;
    let mut settings = HashMap::with_capacity(table.len());
    for (key, value) in table {
        let text = match value {
            toml::Value::String(s) => s,
            toml::Value::Boolean(b) => b.to_string(),
            toml::Value::Integer(i) => i.to_string(),
            toml::Value::Float(f) => f.to_string(),
            toml::Value::Datetime(_) | toml::Value::Array(_) | toml::Value::Table(_) => {
                return Err(ConfigError::Validation(format!(
                    "setting '{key}' must be a string, boolean or number"
                )));
            }
        };
        settings.insert(key.to_lowercase(), text);
    }
    Ok(settings)
}

/// Returns a commented settings file holding the default values.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# seo-paths settings
# ==================
# All settings are optional. Values below are the defaults.

# Lower-case every generated path segment, extension and resolution token.
#   "yes" / "true"  -> lower-case
#   anything else   -> keep names as they are
uselowercase = "no"

# Name the start page of every folder "index".
#   "yes" / "true"  -> only in the first output format with extension "html"
#   "all"           -> in every output format
#   "no" / "false"  -> never
#   "html, mobile"  -> only in the listed output formats (by id)
usewelcomefilenames = "yes"
"##
}
