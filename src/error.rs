use std::{io, path::PathBuf};

/// Errors raised while configuring or building the site.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to read config {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("failed to load templates from {dir}")]
    Templates { dir: PathBuf, source: tera::Error },

    #[error("root template '{name}' not found in {dir}")]
    MissingRoot { dir: PathBuf, name: String },

    #[error("directory not found: {0}")]
    MissingDir(PathBuf),

    #[error("failed to clean output directory {path}")]
    Clean { path: PathBuf, source: io::Error },

    #[error("failed to copy assets into {path}")]
    Assets { path: PathBuf, source: io::Error },

    #[error("failed to walk content directory")]
    Walk(#[from] walkdir::Error),

    #[error("failed to read {path}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to convert {path}: {message}")]
    Convert { path: PathBuf, message: String },

    #[error("failed to render {path}")]
    Render { path: PathBuf, source: tera::Error },

    #[error("failed to write {path}")]
    Write { path: PathBuf, source: io::Error },
}

pub type Result<T, E = BuildError> = std::result::Result<T, E>;
