use std::path::PathBuf;

/// Errors raised while building the museum from files.
///
/// Geometry queries and movement never fail; only loading does.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load OBJ file {path}: {source}")]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("invalid scene descriptor: {0}")]
    Descriptor(#[from] toml::de::Error),

    #[error("vertex index {index} out of range for a mesh with {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("invalid camera settings: {reason}")]
    InvalidCamera { reason: &'static str },

    #[error("invalid player settings: {reason}")]
    InvalidPlayer { reason: &'static str },

    #[error("exhibit `{name}` has no clickable triangles")]
    EmptyBody { name: String },

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
}
