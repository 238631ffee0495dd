//! Errors raised by the document collaborators.
//!
//! The fitting core never fails; everything here comes from reading,
//! parsing, writing or rasterizing files.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("XML parsing failed: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("document has no <{0}> root element")]
    MissingRoot(&'static str),

    #[error("SVG to PNG conversion failed: {0}")]
    Raster(String),

    #[error("failed to encode PNG: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to serialize report: {0}")]
    Report(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}
