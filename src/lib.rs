//! apiref - API reference generator
//!
//! Renders a grouped API model (resources, operations, definitions) into one
//! HTML fragment per entity, records every fragment in a table of contents as
//! it is written, and finally stitches the fragments back together in TOC
//! order into a single `index.html` with a navigation sidebar.
//!
//! ```text
//! let renderer = Renderer::new()?;
//! let mut writer = HtmlWriter::new(&config, &renderer)?;
//! let summary = generate(&mut writer, &spec)?;
//! ```

pub mod anchor;
pub mod assemble;
pub mod config;
pub mod generate;
pub mod link_checker;
pub mod logging;
pub mod model;
pub mod render;
pub mod toc;
pub mod types;
pub mod writer;

pub use anchor::{gvk_badge, make_anchor};
pub use assemble::{Assembly, assemble, release_tag, spec_link};
pub use config::ResolvedConfig;
pub use generate::generate;
pub use model::ApiSpec;
pub use render::Renderer;
pub use toc::{NodeId, SectionId, Toc, TocKind, TocNode};
pub use types::{Anchor, FragmentName};
pub use writer::{BuildSummary, DocWriter, HtmlWriter};

use camino::Utf8PathBuf;

/// Error type for apiref operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A template failed to render (missing template or data shape mismatch)
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Filesystem operation failed
    #[error("i/o error on {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The serialized API model could not be decoded
    #[error("invalid API model in {path}: {source}")]
    SpecModel {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A child entry was written before any top-level section was opened
    #[error("cannot write {what}: no top-level section is open")]
    NoOpenSection { what: &'static str },

    /// A parent handle is not a top-level section, or not a node of this TOC
    #[error("node {0} cannot be used as a parent here")]
    UnknownSection(usize),

    /// Two entities computed the same fragment file name
    #[error("duplicate fragment file name: {0}")]
    DuplicateFragment(FragmentName),

    /// Two TOC entries computed the same anchor
    #[error("duplicate anchor: #{0}")]
    DuplicateAnchor(Anchor),
}

impl Error {
    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for apiref operations.
pub type Result<T> = std::result::Result<T, Error>;
