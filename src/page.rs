use std::path::Path;

/// One rendered output unit. `content` is already HTML and is embedded verbatim.
#[derive(Clone, Debug)]
pub struct Page {
    pub title: String,
    pub content: String,
}

/// Splits a file name at its last dot. A name starting with its only dot,
/// like `.md`, is all extension.
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(i) => (&name[..i], Some(&name[i + 1..])),
        None => (name, None),
    }
}

/// Title for a page: the file name of `path` without its extension.
pub fn derive_title<P: AsRef<Path>>(path: P) -> String {
    let name = path
        .as_ref()
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    split_extension(&name).0.to_string()
}
