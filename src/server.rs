use std::{
    io,
    path::{Component, Path, PathBuf},
    sync::Arc,
};

use axum::{
    extract::State,
    handler::Handler,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Router,
};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub root: PathBuf,
    pub host: String,
    pub port: u16,
    /// List directories that have no index.html
    pub listing: bool,
}

// unreserved characters stay readable in listing links
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("public"),
            host: "0.0.0.0".to_string(),
            port: 8080,
            listing: true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind to {addr}")]
    Bind { addr: String, source: io::Error },

    #[error("server stopped")]
    Serve(#[source] io::Error),
}

pub struct StaticServer {
    config: ServerConfig,
}

impl StaticServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn router(&self) -> Router {
        let serve_dir = ServeDir::new(&self.config.root);

        if self.config.listing {
            let listing = list_directory.with_state(Arc::new(self.config.root.clone()));
            Router::new().fallback_service(serve_dir.fallback(listing))
        } else {
            Router::new().fallback_service(serve_dir)
        }
    }

    /// Binds the configured address and serves until the process ends.
    pub async fn run(self) -> Result<(), ServerError> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        tracing::info!("Serving site at http://localhost:{}", self.config.port);

        self.serve(listener).await
    }

    pub async fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        axum::serve(listener, self.router())
            .await
            .map_err(ServerError::Serve)
    }
}

/// Maps a request path onto `root`, refusing anything that would leave it.
fn resolve(root: &Path, request_path: &str) -> Option<PathBuf> {
    let mut path = root.to_path_buf();

    for segment in request_path.split('/').filter(|s| !s.is_empty()) {
        let segment = percent_decode_str(segment).decode_utf8().ok()?;
        let mut components = Path::new(segment.as_ref()).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => path.push(name),
            _ => return None,
        }
    }

    Some(path)
}

/// Reached when `ServeDir` finds no file, including directories without an
/// index.html.
async fn list_directory(State(root): State<Arc<PathBuf>>, uri: Uri) -> Response {
    let Some(dir) = resolve(&root, uri.path()) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    if !dir.is_dir() {
        return StatusCode::NOT_FOUND.into_response();
    }

    match read_entries(&dir).await {
        Ok(entries) => Html(render_listing(&entries)).into_response(),
        Err(e) => {
            tracing::warn!("failed to list {}: {}", dir.display(), e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    name: String,
    is_dir: bool,
}

/// Entries of `dir` sorted by name.
async fn read_entries(dir: &Path) -> io::Result<Vec<Entry>> {
    let mut entries = vec![];

    let mut read_dir = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = read_dir.next_entry().await? {
        entries.push(Entry {
            name: entry.file_name().to_string_lossy().to_string(),
            is_dir: entry.file_type().await?.is_dir(),
        });
    }

    entries.sort();
    Ok(entries)
}

/// Directories get a trailing slash, added after escaping the name.
fn render_listing(entries: &[Entry]) -> String {
    let mut html = String::from(
        "<!doctype html>\n<meta name=\"viewport\" content=\"width=device-width\">\n<pre>\n",
    );

    for entry in entries {
        let slash = if entry.is_dir { "/" } else { "" };
        let href = utf8_percent_encode(&entry.name, SEGMENT);
        let text = tera::escape_html(&entry.name);
        html.push_str(&format!("<a href=\"{href}{slash}\">{text}{slash}</a>\n"));
    }

    html.push_str("</pre>\n");
    html
}
