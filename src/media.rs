//! Media assets: extensions and resolution tokens.
//!
//! Media nodes come in two kinds:
//!
//! - **File**: one binary per locale, with one extension.
//! - **Picture**: one picture per locale, rendered in named resolutions that
//!   may each have their own extension (`thumb` as `jpg`, `original` as `png`).
//!
//! Asset URLs look like `<folders>/<name>[_<resolution>].<extension>`. The
//! resolution token is only emitted for pictures and never for the
//! original resolution.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io;
use thiserror::Error;

use crate::cleanup::cleanup;
use crate::config::UrlPolicy;
use crate::tree::ContentTree;
use crate::types::{Locale, NodeId, Resolution};

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("no file data found for media \"{uid}\" (id={id})")]
    MissingFile { uid: String, id: NodeId },
    #[error("no picture data found for media \"{uid}\" (id={id})")]
    MissingPicture { uid: String, id: NodeId },
    /// Pictures are only addressable through one of their resolutions.
    #[error("picture media \"{uid}\" (id={id}) requires a resolution")]
    ResolutionRequired { uid: String, id: NodeId },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    File,
    Picture,
}

/// Binary data of a file asset in one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub extension: String,
}

/// Metadata of one picture resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PictureMeta {
    pub extension: String,
}

/// A picture in one locale.
pub trait Picture {
    /// Metadata for `resolution`, `None` if the picture has no such variant.
    /// Stores that load metadata lazily report read failures as `Err`.
    fn metadata(&self, resolution: &Resolution) -> io::Result<Option<PictureMeta>>;
}

/// Picture resolutions held in memory, keyed by resolution uid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PictureData(pub BTreeMap<String, PictureMeta>);

impl Picture for PictureData {
    fn metadata(&self, resolution: &Resolution) -> io::Result<Option<PictureMeta>> {
        Ok(self.0.get(&resolution.uid).cloned())
    }
}

/// Read-only access to media binaries.
pub trait MediaStore {
    fn media_kind(&self, media: NodeId) -> Option<MediaKind>;

    fn file(&self, media: NodeId, locale: &Locale) -> Option<FileInfo>;

    fn picture(&self, media: NodeId, locale: &Locale) -> Option<&dyn Picture>;
}

/// Extension of `media` in `locale`, for `resolution` if it is a picture.
pub fn media_extension<S>(
    store: &S,
    media: NodeId,
    kind: MediaKind,
    locale: &Locale,
    resolution: Option<&Resolution>,
) -> Result<String, MediaError>
where
    S: MediaStore + ContentTree + ?Sized,
{
    let uid = || store.uid(media).unwrap_or_default().to_string();
    match kind {
        MediaKind::File => store
            .file(media, locale)
            .map(|file| file.extension)
            .ok_or_else(|| MediaError::MissingFile { uid: uid(), id: media }),
        MediaKind::Picture => {
            let resolution =
                resolution.ok_or_else(|| MediaError::ResolutionRequired { uid: uid(), id: media })?;
            let picture = store
                .picture(media, locale)
                .ok_or_else(|| MediaError::MissingPicture { uid: uid(), id: media })?;
            picture
                .metadata(resolution)?
                .map(|meta| meta.extension)
                .ok_or_else(|| MediaError::MissingPicture { uid: uid(), id: media })
        }
    }
}

/// The `_<token>` part of a picture file name, without the underscore.
pub fn resolution_token(
    policy: &UrlPolicy,
    kind: MediaKind,
    resolution: Option<&Resolution>,
    locale: &Locale,
) -> Option<String> {
    match resolution {
        Some(res) if kind == MediaKind::Picture && !res.original => {
            Some(policy.adjust_case(&cleanup(&res.uid, locale)))
        }
        _ => None,
    }
}
