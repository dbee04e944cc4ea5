use std::{
    fs, io,
    path::{Path, PathBuf},
};

use walkdir::WalkDir;

use crate::{
    assets,
    config::SitePaths,
    error::{BuildError, Result},
    markdown::Converter,
    page::{derive_title, split_extension, Page},
    templates::Templates,
};

pub const MARKUP_EXTENSION: &str = "md";
pub const PAGE_EXTENSION: &str = "html";

/// A document that could not be generated.
#[derive(Debug)]
pub struct Failure {
    pub path: PathBuf,
    pub error: BuildError,
}

/// Outcome of a build that got past its fatal steps.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub pages: usize,
    pub assets: usize,
    pub failures: Vec<Failure>,
}

impl BuildReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, path: PathBuf, error: BuildError) {
        let mut message = error.to_string();
        let mut cause = std::error::Error::source(&error);
        while let Some(e) = cause {
            message = format!("{message}: {e}");
            cause = e.source();
        }
        tracing::error!("{message}");
        self.failures.push(Failure { path, error });
    }
}

pub struct SiteBuilder {
    paths: SitePaths,
    templates: Templates,
    converter: Converter,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Whether `path` is a document to convert. `.md` itself counts.
pub fn is_markup(path: &Path) -> bool {
    split_extension(&file_name(path)).1 == Some(MARKUP_EXTENSION)
}

/// Output location of a document, relative to the output root.
pub fn output_path(relative_path: &Path) -> PathBuf {
    let name = file_name(relative_path);
    let (stem, _) = split_extension(&name);
    relative_path.with_file_name(format!("{stem}.{PAGE_EXTENSION}"))
}

impl SiteBuilder {
    pub fn new(paths: SitePaths, templates: Templates, converter: Converter) -> Self {
        Self {
            paths,
            templates,
            converter,
        }
    }

    /// Rebuilds the whole output tree.
    ///
    /// Cleaning the output directory, copying assets and finding the content
    /// root are fatal. A failing document is logged and recorded in the report
    /// and the walk moves on to the next one.
    pub fn build(&self) -> Result<BuildReport> {
        self.clean_output_dir()?;

        let mut report = BuildReport {
            assets: assets::mirror(&self.paths.static_dir, &self.paths.out)?,
            ..Default::default()
        };

        let content_dir = &self.paths.content;
        if !content_dir.is_dir() {
            return Err(BuildError::MissingDir(content_dir.clone()));
        }

        for entry in WalkDir::new(content_dir)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(content_dir.as_path()).to_path_buf();
                    report.record(path, e.into());
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            if !is_markup(entry.path()) {
                tracing::debug!("skipping {}", entry.path().display());
                continue;
            }

            match self.build_page(entry.path()) {
                Ok(output) => {
                    tracing::info!("Generated {}", output.display());
                    report.pages += 1;
                }
                Err(error) => report.record(entry.path().to_path_buf(), error),
            }
        }

        if report.is_clean() {
            tracing::info!(
                "built {} pages and copied {} assets into {}",
                report.pages,
                report.assets,
                self.paths.out.display()
            );
        } else {
            tracing::warn!(
                "built {} pages and copied {} assets into {}; {} documents failed",
                report.pages,
                report.assets,
                self.paths.out.display(),
                report.failures.len()
            );
        }

        Ok(report)
    }

    fn clean_output_dir(&self) -> Result<()> {
        let out = &self.paths.out;
        let fail = |source| BuildError::Clean {
            path: out.clone(),
            source,
        };

        match fs::remove_dir_all(out) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(fail(e)),
            _ => {}
        }

        fs::create_dir_all(out).map_err(fail)
    }

    fn build_page(&self, path: &Path) -> Result<PathBuf> {
        let input = fs::read(path).map_err(|source| BuildError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let content = self
            .converter
            .convert(&input)
            .map_err(|e| BuildError::Convert {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let relative = path.strip_prefix(&self.paths.content).unwrap_or(path);
        let output = self.paths.out.join(output_path(relative));

        let write_error = |source| BuildError::Write {
            path: output.clone(),
            source,
        };

        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }

        let page = Page {
            title: derive_title(relative),
            content,
        };

        // a failed render must not leave a partial file
        let mut rendered = Vec::new();
        self.templates
            .render(&page, &mut rendered)
            .map_err(|source| BuildError::Render {
                path: path.to_path_buf(),
                source,
            })?;

        fs::write(&output, rendered).map_err(write_error)?;

        Ok(output)
    }
}
