use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    error::{BuildError, Result},
    server::ServerConfig,
};

/// One layer of settings: the command line or a TOML file. Unset keys fall
/// through to the next layer.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct Layer {
    pub content: Option<PathBuf>,
    pub templates: Option<PathBuf>,
    #[serde(rename = "static")]
    pub static_dir: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub listing: Option<bool>,
}

impl Layer {
    pub fn from_file(path: &Path) -> Result<Self> {
        let fail = |message: String| BuildError::Config {
            path: path.to_path_buf(),
            message,
        };

        let text = fs::read_to_string(path).map_err(|e| fail(e.to_string()))?;

        toml::from_str(&text).map_err(|e| fail(e.to_string()))
    }

    /// Fills every key unset in `self` from `lower`.
    pub fn or(self, lower: Layer) -> Layer {
        Layer {
            content: self.content.or(lower.content),
            templates: self.templates.or(lower.templates),
            static_dir: self.static_dir.or(lower.static_dir),
            out: self.out.or(lower.out),
            host: self.host.or(lower.host),
            port: self.port.or(lower.port),
            listing: self.listing.or(lower.listing),
        }
    }
}

/// Source and output directories of a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitePaths {
    pub content: PathBuf,
    pub templates: PathBuf,
    pub static_dir: PathBuf,
    pub out: PathBuf,
}

impl Default for SitePaths {
    fn default() -> Self {
        Self {
            content: PathBuf::from("content"),
            templates: PathBuf::from("templates"),
            static_dir: PathBuf::from("static"),
            out: PathBuf::from("public"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub paths: SitePaths,
    pub server: ServerConfig,
}

impl From<Layer> for Config {
    fn from(layer: Layer) -> Self {
        let paths = SitePaths::default();
        let server = ServerConfig::default();

        let paths = SitePaths {
            content: layer.content.unwrap_or(paths.content),
            templates: layer.templates.unwrap_or(paths.templates),
            static_dir: layer.static_dir.unwrap_or(paths.static_dir),
            out: layer.out.unwrap_or(paths.out),
        };

        let server = ServerConfig {
            root: paths.out.clone(),
            host: layer.host.unwrap_or(server.host),
            port: layer.port.unwrap_or(server.port),
            listing: layer.listing.unwrap_or(server.listing),
        };

        Config { paths, server }
    }
}
