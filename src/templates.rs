use std::{io::Write, path::Path};

use serde::Serialize;
use tera::Tera;

use crate::{
    error::{BuildError, Result},
    functions::markdown::Markdown,
    markdown::Converter,
    page::Page,
};

pub const ROOT_TEMPLATE: &str = "base.html";
const TEMPLATE_PATTERN: &str = "*.html";

/// Immutable set of templates shared by every page of a build.
pub struct Templates {
    tera: Tera,
    root: String,
}

#[derive(Serialize)]
struct PageView<'a> {
    title: String,
    content: &'a str,
}

impl Templates {
    /// Loads every `*.html` file in `dir`. The `root` template must be among them.
    pub fn load(dir: &Path, root: &str, converter: Converter) -> Result<Self> {
        if !dir.is_dir() {
            return Err(BuildError::MissingDir(dir.to_path_buf()));
        }

        let pattern = dir.join(TEMPLATE_PATTERN);

        let mut tera =
            Tera::new(&pattern.to_string_lossy()).map_err(|source| BuildError::Templates {
                dir: dir.to_path_buf(),
                source,
            })?;

        // content is pre-rendered HTML; titles are escaped by hand in render
        tera.autoescape_on(vec![]);
        tera.register_filter("markdown", Markdown::new(converter));

        tracing::debug!(
            "loaded templates: {:?}",
            tera.get_template_names().collect::<Vec<_>>()
        );

        if !tera.get_template_names().any(|name| name == root) {
            return Err(BuildError::MissingRoot {
                dir: dir.to_path_buf(),
                name: root.to_string(),
            });
        }

        Ok(Self {
            tera,
            root: root.to_string(),
        })
    }

    /// Renders `page` through the root template into `out`.
    pub fn render<W: Write>(&self, page: &Page, out: W) -> tera::Result<()> {
        let view = PageView {
            title: tera::escape_html(&page.title),
            content: &page.content,
        };

        let mut ctx = tera::Context::new();
        ctx.insert("title", &view.title);
        ctx.insert("content", view.content);
        ctx.insert("page", &view);

        self.tera.render_to(&self.root, &ctx, out)
    }
}

/// Template directory with a fixed layout, for tests in other modules.
#[cfg(test)]
pub(crate) fn write_test_templates(dir: &Path, base: &str) -> std::path::PathBuf {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join(ROOT_TEMPLATE), base).unwrap();
    dir.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "<title>{{ title }}</title><main>{{ content }}</main>";

    fn page(title: &str, content: &str) -> Page {
        Page {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    fn render(templates: &Templates, page: &Page) -> String {
        let mut out = Vec::new();
        templates.render(page, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn embeds_content_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let dir = write_test_templates(dir.path(), BASE);

        let templates = Templates::load(&dir, ROOT_TEMPLATE, Converter::new()).unwrap();
        let html = render(&templates, &page("hello", "<h1>Hi</h1>\n"));

        assert_eq!(html, "<title>hello</title><main><h1>Hi</h1>\n</main>");
    }

    #[test]
    fn escapes_title_once() {
        let dir = tempfile::tempdir().unwrap();
        let dir = write_test_templates(dir.path(), BASE);

        let templates = Templates::load(&dir, ROOT_TEMPLATE, Converter::new()).unwrap();
        let html = render(&templates, &page("a<b", ""));

        assert!(html.contains("<title>a&lt;b</title>"));
    }

    #[test]
    fn exposes_page_object_and_markdown_filter() {
        let dir = tempfile::tempdir().unwrap();
        let dir = write_test_templates(
            dir.path(),
            "{{ page.title }}|{{ page.content }}|{{ \"*x*\" | markdown }}",
        );

        let templates = Templates::load(&dir, ROOT_TEMPLATE, Converter::new()).unwrap();
        let html = render(&templates, &page("t", "<p>c</p>"));

        assert_eq!(html, "t|<p>c</p>|<p><em>x</em></p>\n");
    }

    #[test]
    fn loads_partials_alongside_root() {
        let dir = tempfile::tempdir().unwrap();
        let dir = write_test_templates(
            dir.path(),
            "{% include \"header.html\" %}{{ content }}",
        );
        std::fs::write(dir.join("header.html"), "<header>{{ title }}</header>").unwrap();

        let templates = Templates::load(&dir, ROOT_TEMPLATE, Converter::new()).unwrap();
        let html = render(&templates, &page("home", "<p>hi</p>"));

        assert_eq!(html, "<header>home</header><p>hi</p>");
    }

    #[test]
    fn missing_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("other.html"), "x").unwrap();

        let result = Templates::load(dir.path(), ROOT_TEMPLATE, Converter::new());

        assert!(matches!(result, Err(BuildError::MissingRoot { .. })));
    }

    #[test]
    fn malformed_template_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let dir = write_test_templates(dir.path(), "{{ oops");

        let result = Templates::load(&dir, ROOT_TEMPLATE, Converter::new());

        assert!(matches!(result, Err(BuildError::Templates { .. })));
    }

    #[test]
    fn execution_error_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let dir = write_test_templates(dir.path(), "{{ missing_value }}");

        let templates = Templates::load(&dir, ROOT_TEMPLATE, Converter::new()).unwrap();

        assert!(templates.render(&page("t", ""), &mut Vec::<u8>::new()).is_err());
    }
}
