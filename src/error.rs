use thiserror::Error;

use crate::media::MediaError;
use crate::types::{ElementKind, NodeId};

/// Failure to build a URL.
#[derive(Error, Debug)]
pub enum UrlError {
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),
    /// A node other than the root has no parent and no override resolved it.
    #[error("{kind}, id={id} has no parent")]
    Detached { kind: ElementKind, id: NodeId },
    #[error("node {0} is not a media asset")]
    NotMedia(NodeId),
    #[error(transparent)]
    Media(#[from] MediaError),
}
